use std::path::Path;

use chrono::Local;
use env_logger::Env;
use sweep::{
    configuration::get_configuration,
    services::{harvest, write_records, Droid},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration()?;
    let application = &configuration.application;

    let droid = Droid::new(&configuration.webdriver).await?;

    let outcome = match harvest(&droid, &configuration).await {
        Ok(records) => write_records(
            &records,
            Path::new(&application.output_dir),
            &application.output_prefix,
            &Local::now(),
        )
        .map(|_| ()),
        Err(e) => Err(e),
    };

    tokio::time::sleep(application.close_delay()).await;
    if let Err(e) = droid.quit().await {
        log::error!("Failed to close the browser: {:?}", e);
    }

    outcome
}
