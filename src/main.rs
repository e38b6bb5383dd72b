//! Midish GW - Rust implementation
//!
//! Bridges an assignable MIDI controller to the midish command engine:
//! hold the controller, strike a note, release to activate the matching
//! preset.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use midish_gw::dispatch::Dispatcher;
use midish_gw::engine::Engine;
use midish_gw::input::{self, MidiInputAdapter};
use midish_gw::keys;
use midish_gw::midi::MidiMessage;
use midish_gw::presets::PresetStore;
use midish_gw::trigger::{ClassifyConfig, Trigger};

/// Midish Gateway - switch midish presets from a MIDI controller
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the preset configuration file
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// MIDI input port name (substring match)
    #[arg(short = 'p', long = "port")]
    port: Option<String>,

    /// MIDI channel the controller and learn notes arrive on (0-15)
    #[arg(short = 'x', long, default_value = "0")]
    channel: u8,

    /// Controller number that arms preset learning
    #[arg(short = 'c', long)]
    controller: Option<u8>,

    /// Command line used to start the engine
    #[arg(long, default_value = "midish")]
    engine: String,

    /// List available MIDI input ports
    #[arg(long)]
    list_ports: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'l', long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting Midish GW...");

    if args.list_ports {
        list_ports_formatted()?;
        return Ok(());
    }

    let port = args
        .port
        .context("no MIDI input port specified, see --port")?;
    let file = args
        .file
        .context("no configuration file specified, see --file")?;
    let controller = args
        .controller
        .context("no controller number specified, see --controller")?;

    // Load the preset store; unreadable config is fatal before the loop
    let presets = PresetStore::load(&file, controller).await?;
    info!(
        "Loaded {} named preset(s) from {}",
        presets.named().len(),
        file
    );
    for preset in presets.iter() {
        debug!(
            name = %preset.name,
            key = preset.match_key,
            commands = preset.commands.len(),
            "preset"
        );
    }

    // Start the engine and hand its stdin to the dispatcher
    let (engine, engine_stdin) = Engine::spawn(&args.engine)?;
    let mut dispatcher = Dispatcher::new(engine_stdin);

    // Connect MIDI input
    let (_input, mut midi_rx) = MidiInputAdapter::connect(&port)?;
    info!("MIDI input connected (port pattern '{}')", port);

    let mut trigger = Trigger::new(ClassifyConfig::for_channel(args.channel));
    let mut keys_rx = keys::spawn_reader();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    info!(
        "Ready: hold controller {} on channel {} and strike a note ('q' quits)",
        controller, args.channel
    );

    loop {
        tokio::select! {
            Some(msg) = midi_rx.recv() => {
                match MidiMessage::decode(msg) {
                    Some(decoded) => debug!("event {}", decoded),
                    None => debug!("event {:02X} {} {}", msg.status, msg.data1, msg.data2),
                }

                if let Some(preset) = trigger.on_message(msg, &presets) {
                    info!("Activating preset '{}'", preset.name);
                    dispatcher.dispatch(preset).await?;
                }
            }

            Some(key) = keys_rx.recv() => {
                if key == b'q' {
                    info!("'q' pressed, stopping event loop");
                    break;
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    // Closing the pipe is what makes the engine exit
    drop(dispatcher);
    engine.shutdown().await?;

    info!("Midish GW shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}

fn list_ports_formatted() -> Result<()> {
    println!("\n{}", "Available MIDI input ports:".bold().cyan());

    let ports = input::list_input_ports()?;
    if ports.is_empty() {
        println!("  {}", "(none found)".dimmed());
    }
    for (i, name) in ports.iter().enumerate() {
        println!("  [{}] {}", i, name.green());
    }
    println!();

    Ok(())
}
