use sitelens::config::LoggingConfig;
use sitelens::logger::{self, Logger};

#[test]
fn test_init_is_idempotent_and_feeds_buffer() {
    let buffer = Logger::new();
    let config = LoggingConfig {
        enabled: false,
        level: "info".to_string(),
    };

    logger::init(&config, &buffer).unwrap();
    // Second call keeps the first dispatch
    logger::init(&config, &Logger::new()).unwrap();

    log::info!("buffer smoke test");
    log::debug!("below the configured level");

    let logs = buffer.get_logs();
    assert!(logs.iter().any(|line| line.contains("buffer smoke test")));
    assert!(!logs.iter().any(|line| line.contains("below the configured level")));
}

#[test]
fn test_log_file_path_is_under_sitelens_dir() {
    if let Ok(path) = logger::get_log_file_path() {
        assert!(path.ends_with("sitelens/sitelens.log"));
    }
}
