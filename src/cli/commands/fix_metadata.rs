use crate::config::Config;
use crate::state::SharedState;

/// `vettra fix-metadata` - backfill missing document file metadata.
///
/// Unreadable blobs are logged and recorded with size 0 rather than
/// failing the batch.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;

    let report = shared.document_service.fix_metadata().await?;

    println!("Scanned {} documents", report.scanned);
    println!("Fixed {} documents", report.fixed);

    Ok(())
}
