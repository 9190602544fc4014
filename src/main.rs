use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use streamscribe::audio::list_devices;
use streamscribe::cli::{Cli, Commands};
use streamscribe::config::Config;
use streamscribe::server::{self, AppState};
use streamscribe::stt::{NullTranscriber, Transcriber};
use streamscribe::client;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?.with_env_overrides();

    match cli.command {
        Commands::Serve { bind, tick, window } => {
            let mut config = config;
            if let Some(tick) = tick {
                config.stream.tick_ms = tick;
            }
            if let Some(window) = window {
                config.stream.window_secs = window;
            }
            let bind = bind.unwrap_or_else(|| config.server.bind_addr.clone());

            // The real speech-to-text engine is plugged in behind the
            // Transcriber trait; the built-in placeholder reports window
            // occupancy so the pipeline is observable end to end.
            let engine: Arc<dyn Transcriber> = Arc::new(NullTranscriber::new());
            let state = AppState::new(engine, &config);
            server::serve(&bind, state).await?;
        }
        Commands::Stream { url, device, mode } => {
            let mut config = config;
            if let Some(device) = device {
                config.audio.device = Some(device);
            }
            let base = url.unwrap_or_else(|| config.server.url.clone());
            // The mode rides on the endpoint path; without one the server
            // defaults to optimized.
            let url = match mode {
                Some(mode) => format!("{}/{}", base.trim_end_matches('/'), mode),
                None => base,
            };
            client::run(&url, &config).await?;
        }
        Commands::Devices => {
            for device in list_devices()? {
                println!("{}", device);
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
