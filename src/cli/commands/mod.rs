pub mod fix_metadata;
pub mod seed_types;
