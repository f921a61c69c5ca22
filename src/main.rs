use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpStream;

use mgnss_harvest::config::HarvestConfig;
use mgnss_harvest::logging;
use mgnss_harvest::module::fetch::HttpFetcher;
use mgnss_harvest::module::schedule::{self, ScheduleBoard};
use mgnss_harvest::module::sink::FileSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Failing to load the source table is the only fatal condition.
    let config = match std::env::args().nth(1) {
        Some(path) => HarvestConfig::from_file(&path)?,
        None => HarvestConfig::default(),
    };

    let _logging_guard = logging::init_logging("logs", "mgnss-harvest", &config.log_level);

    tracing::info!(
        "mgnss-harvest starting: {} sources, data dir {}",
        config.sources.len(),
        config.data_dir.display()
    );

    wait_for_network().await;
    tracing::info!("Network is available");

    let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let sink = FileSink::new(&config);

    // Every slot is armed at startup, so the first pass harvests all
    // sources immediately.
    let board = ScheduleBoard::new(config.sources.clone(), chrono::Utc::now());
    schedule::run(board, &fetcher, &sink).await;

    Ok(())
}

/// Blocks until a probe connection to a public DNS server succeeds. The
/// harvester is typically started at boot, before the uplink is up.
async fn wait_for_network() {
    const PROBE_ADDR: &str = "8.8.8.8:53";
    const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
    const RETRY_INTERVAL: Duration = Duration::from_secs(5);

    loop {
        match tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect(PROBE_ADDR)).await {
            Ok(Ok(_)) => return,
            Ok(Err(_)) | Err(_) => {
                tracing::info!("Waiting for network...");
                tokio::time::sleep(RETRY_INTERVAL).await;
            }
        }
    }
}
