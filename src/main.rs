mod api;
mod config;
mod dispatch;
mod format;
mod poll;
mod render;
mod ui;

use tracing_appender::rolling;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

use crate::api::client::ApiClient;
use crate::config::Config;
use crate::dispatch::{parse_command, Dispatcher, HELP};
use crate::ui::Console;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_file("config.toml").or_else(|e| {
        println!("Config file not found. Creating example config.toml...");
        Config::save_example("config.toml")?;
        println!("Please edit config.toml with your settings and restart the application.");
        Err(e)
    })?;

    // Directory for logs
    let log_dir = &config.logging.directory;

    // One file per level
    let debug_file = rolling::daily(log_dir, &config.logging.debug_file);
    let info_file = rolling::daily(log_dir, &config.logging.info_file);
    let warn_file = rolling::daily(log_dir, &config.logging.warn_file);
    let error_file = rolling::daily(log_dir, &config.logging.error_file);

    // Build layers, filtering each level
    let debug_layer = fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(EnvFilter::new("debug"));

    let info_layer = fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::INFO);

    let warn_layer = fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let error_layer = fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

    // Console logging stays quiet by default so it does not fight the
    // dashboard redraws
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(&config.logging.console_level));

    // Compose subscriber
    tracing_subscriber::registry()
        .with(console_layer)
        .with(debug_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    let api = ApiClient::new(&config.server.base_url);
    let console = Console::stdout();

    // Forced-refresh channel: the dispatcher pushes, the poll loop pulls
    let (refresh_tx, refresh_rx) = mpsc::channel::<()>(16);

    let poll_api = api.clone();
    let poll_console = console.clone();
    let period = Duration::from_secs(config.intervals.poll_seconds.max(1));
    tokio::spawn(async move {
        poll::run(poll_api, poll_console, refresh_rx, period).await;
    });

    let mut dispatcher = Dispatcher::new(
        api,
        refresh_tx,
        console.clone(),
        config.grafana.clone(),
        config.server.pin.clone(),
    );

    console.line(HELP);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Some(command) => {
                if !dispatcher.handle(command).await {
                    break;
                }
            }
            None => console.toast(&format!("unknown command: {} (try \"help\")", line)),
        }
    }

    Ok(())
}
