//! CLI application for controlling a floodlight device.
//!
//! This example demonstrates a command-line interface for inspecting and
//! controlling a network-attached floodlight.
//!
//! Run with: cargo run --example floodlight_cli -- --help

use std::time::Duration;

use clap::{Parser, Subcommand};
use floodlight_rs::{
    AccessoryContext, CharacteristicSink, FloodlightAccessory, StatePoller,
};

#[derive(Parser)]
#[command(name = "floodlight-cli")]
#[command(about = "Control a network-attached floodlight from the command line", long_about = None)]
struct Cli {
    /// Host of the floodlight device
    #[arg(long)]
    host: String,

    /// Port of the floodlight device
    #[arg(long, default_value = "80")]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the current lighting state
    Status,

    /// Turn the light on
    On,

    /// Turn the light off
    Off,

    /// Set brightness (0-100)
    Brightness {
        /// Brightness level (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },

    /// Show the device's identity (manufacturer, model, serial)
    Info,

    /// Poll the device and print each refreshed state
    Watch {
        /// Poll interval in seconds
        #[arg(short, long, default_value = "3")]
        interval: u64,

        /// How long to watch before exiting, in seconds
        #[arg(short, long, default_value = "30")]
        duration: u64,
    },
}

struct PrintSink;

impl CharacteristicSink for PrintSink {
    fn update_on(&self, on: bool) {
        println!("on -> {on}");
    }

    fn update_brightness(&self, brightness: u8) {
        println!("brightness -> {brightness}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let context = AccessoryContext {
        host: Some(cli.host),
        port: Some(cli.port),
        ..Default::default()
    };
    let accessory = FloodlightAccessory::new(&context)?;

    match cli.command {
        Commands::Status => {
            let state = accessory
                .get_state(FloodlightAccessory::STARTUP_TIMEOUT)
                .await?;
            println!("on: {}", state.on());
            println!("brightness: {}", state.brightness());
        }
        Commands::On => {
            let confirmed = accessory.set_on(true).await?;
            println!("on -> {confirmed}");
        }
        Commands::Off => {
            let confirmed = accessory.set_on(false).await?;
            println!("on -> {confirmed}");
        }
        Commands::Brightness { level } => {
            let confirmed = accessory.set_brightness(level).await?;
            println!("brightness -> {confirmed}");
        }
        Commands::Info => {
            let identity = accessory.identity().await?;
            println!("manufacturer: {}", identity.manufacturer());
            println!("model: {}", identity.model());
            println!("serial: {}", identity.serial());
        }
        Commands::Watch { interval, duration } => {
            let poller = StatePoller::new();
            poller.start(
                accessory.clone(),
                PrintSink,
                Duration::from_secs(interval),
            );
            tokio::time::sleep(Duration::from_secs(duration)).await;
            poller.stop();
        }
    }

    Ok(())
}
