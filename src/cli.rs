//! Command-line interface for streamscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Live microphone transcription over WebSocket
#[derive(Parser, Debug)]
#[command(name = "streamscribe", version, about = "Live microphone transcription over WebSocket")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the transcription server
    Serve {
        /// Address to listen on (host:port)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Inference tick period in milliseconds
        #[arg(long, value_name = "MS")]
        tick: Option<u64>,

        /// Rolling window duration in seconds
        #[arg(long, value_name = "SECONDS")]
        window: Option<u32>,
    },

    /// Stream the microphone to a server and display results
    Stream {
        /// WebSocket URL to connect to
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Audio input device name (see `devices`)
        #[arg(long, value_name = "DEVICE")]
        device: Option<String>,

        /// Engine performance mode (standard | optimized)
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
    },

    /// List available audio input devices
    Devices,
}
