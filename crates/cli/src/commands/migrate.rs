//! Apply the schema without starting the server.

use onyx_ext_core::AppConfig;
use onyx_ext_storage::PgStorage;

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let storage = PgStorage::connect(&config.database).await?;
    storage.migrate().await?;
    println!("migrations applied");
    Ok(())
}
