pub mod prelude;

pub mod document_types;
pub mod documents;
pub mod onboarding_progress;
pub mod personal_details;
pub mod users;
