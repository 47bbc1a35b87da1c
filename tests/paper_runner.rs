use std::fs;
use std::path::Path;

use infinite_grid::strategy::default_registry;
use infinite_grid::{BotRunner, GridError};

fn write_config(dir: &Path, strategy_type: &str, tape: &str) -> std::path::PathBuf {
    let tape_path = dir.join("prices.txt");
    fs::write(&tape_path, tape).unwrap();

    let config_path = dir.join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[strategy]
type = "{}"
symbol = "BTCUSDT"

[strategy.params]
budget = "1000"
floor_price = "90"
margin = "0.01"
quantity = "1"
grid_count = 4
count_of_more_orders = 2

[log]
level = "warn"

[paper]
quote_currency = "USDT"
initial_balance = "10000"
price_file = "{}"
tick_interval_ms = 1
"#,
            strategy_type,
            tape_path.display()
        ),
    )
    .unwrap();
    config_path
}

#[tokio::test]
async fn test_paper_run_trades_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "infinitegrid",
        "# seed at 100\n100\n99\n98\n99.5\n101\n102.5\n100\n",
    );

    let summary = BotRunner::new(&config, default_registry())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.ticks, 7);
    assert!(summary.fills > 0);
    // Shutdown cancels everything left on the paper book.
    assert_eq!(summary.resting, 0);
}

#[tokio::test]
async fn test_unknown_strategy_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "martingale", "100\n");

    let err = BotRunner::new(&config, default_registry())
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, GridError::UnknownStrategy(_)));
}

#[tokio::test]
async fn test_missing_tape_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "infinitegrid", "100\n");
    fs::remove_file(dir.path().join("prices.txt")).unwrap();

    let err = BotRunner::new(&config, default_registry())
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, GridError::PriceTape(_)));
}
