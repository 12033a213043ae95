use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use zelo_domain::config::LoggingConfig;
use zelo_logger::Logger;

#[test]
fn json_file_logging_writes_records() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        level: "debug".to_owned(),
        console: false,
        dir: Some(log_dir.clone()),
        json: true,
        ..LoggingConfig::default()
    };
    let logger = Logger::from_config("integration-file-logging", &config)?;

    tracing::info!(kind = "tank_dilution", "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let first = contents.lines().next().expect("log file should not be empty");
    let record: serde_json::Value = serde_json::from_str(first)?;
    assert_eq!(record["fields"]["kind"], "tank_dilution");

    Ok(())
}
