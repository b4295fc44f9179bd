use crate::config::Config;
use crate::db::{Store, seed};

/// `vettra seed-types` - upsert the default document-type catalog.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let report = seed::seed_document_types(&store.conn).await?;

    println!("Document types setup complete!");
    println!("Created: {}", report.created);
    println!("Updated: {}", report.updated);

    Ok(())
}
