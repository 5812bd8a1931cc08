/*!
 * VoiceDev Server
 *
 * Runs the voice-to-code engine behind its HTTP surface: command
 * submission, code generation, translation, and record listing/patching.
 */

use std::sync::Arc;

use clap::{Parser, Subcommand};

use voicedev_core::config::AppConfig;
use voicedev_core::generate::CodeGenerator;
use voicedev_core::server::{start_server, AppState};
use voicedev_core::store::RecordStore;
use voicedev_core::structured_log::{init_logger, LogConfig, LogLevel};
use voicedev_core::VoiceAssistant;

#[derive(Parser)]
#[command(name = "voicedev_server")]
#[command(about = "VoiceDev - voice-to-code assistant server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Log debug-level events
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, verbose } => {
            init_logger(LogConfig {
                file_path: None,
                min_level: if verbose { LogLevel::Debug } else { LogLevel::Info },
            });

            let config = AppConfig::load();
            let port = port.unwrap_or(config.server_port);

            let store = Arc::new(RecordStore::new());
            let state = Arc::new(AppState {
                assistant: VoiceAssistant::new(config.clone()).with_store(store.clone()),
                generator: CodeGenerator::new(config).with_store(store.clone()),
                store,
            });

            let greeting = state.assistant.greeting();
            println!("{}", greeting.message);

            if let Err(e) = start_server(port, state).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("voicedev_server v{}", env!("CARGO_PKG_VERSION"));
            println!("VoiceDev voice-to-code assistant server");
        }
    }
}
