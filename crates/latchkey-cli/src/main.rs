//! Latchkey relay emulator binary.
//!
//! # Usage
//!
//! ```bash
//! # Emulate over a real serial link
//! latchkey --port /dev/ttyUSB0 --partner DFACS
//!
//! # No hardware: listen for a panel (or netcat) over TCP
//! latchkey --listen 127.0.0.1:4555 --partner PEAK --aux DPS
//!
//! # See what serial ports exist
//! latchkey --list-ports
//! ```

mod settings;

use clap::Parser;
use latchkey_core::{AuxType, BillingPartner, Config, Error, Result};
use latchkey_emulator::{Emulator, ObserverSink, RelayController, StateEvent};
use latchkey_transport::{SerialTransport, Transport, accept_panel, available_ports};
use settings::Settings;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Door-access relay controller emulator
#[derive(Parser, Debug)]
#[command(name = "latchkey")]
#[command(about = "Door-access relay controller emulator")]
#[command(version)]
struct Args {
    /// Serial port to open (e.g. /dev/ttyUSB0, COM3)
    #[arg(short, long)]
    port: Option<String>,

    /// Listen for a panel over TCP instead of a serial port
    #[arg(short, long, conflicts_with = "port")]
    listen: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = latchkey_core::constants::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Billing partner dialect (ABC, PEAK, DFACS)
    #[arg(long)]
    partner: Option<BillingPartner>,

    /// Auxiliary input type (RTE, REX, DPS, BOND)
    #[arg(long)]
    aux: Option<AuxType>,

    /// Treat the auxiliary contact as normally closed
    #[arg(long)]
    normally_closed: bool,

    /// Do not count RTE override activations
    #[arg(long)]
    no_rte_count: bool,

    /// Settings file remembering port and configuration between runs
    #[arg(long, default_value = "latchkey.json")]
    settings: PathBuf,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Overlay command-line choices on top of persisted settings.
    fn resolve(&self, saved: Settings) -> Settings {
        let mut config = saved.config;
        if let Some(partner) = self.partner {
            config.billing_partner = partner;
        }
        if let Some(aux) = self.aux {
            config.aux_type = aux;
        }
        if self.normally_closed {
            config.aux_normally_open = false;
        }
        if self.no_rte_count {
            config.rte_count_enabled = false;
        }
        Settings {
            port: self.port.clone().or(saved.port),
            config,
        }
    }
}

/// Logs every state transition as a structured event.
struct EventLogger;

impl ObserverSink for EventLogger {
    fn on_event(&mut self, event: StateEvent) {
        match event {
            StateEvent::LockStateChanged(state) => tracing::info!(%state, "lock state"),
            StateEvent::DoorStateChanged(door) => tracing::info!(%door, "door sensor"),
            StateEvent::OverrideChanged(active) => tracing::info!(active, "rte override"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if args.list_ports {
        for name in available_ports()? {
            println!("{name}");
        }
        return Ok(());
    }

    let resolved = args.resolve(Settings::load(&args.settings)?);
    resolved.save(&args.settings)?;

    let config = resolved.config;
    tracing::info!(
        partner = %config.billing_partner,
        aux = %config.aux_type,
        rte_count = config.rte_count_enabled,
        "relay configuration"
    );

    let transport: Box<dyn Transport> = match (&args.listen, &resolved.port) {
        (Some(addr), _) => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(%addr, "waiting for panel connection");
            Box::new(accept_panel(&listener).await?)
        }
        (None, Some(port)) => Box::new(SerialTransport::open(port, args.baud)?),
        (None, None) => {
            return Err(Error::Config(
                "no transport: pass --port or --listen (or see --list-ports)".to_string(),
            ));
        }
    };

    let controller = RelayController::with_observer(config, Box::new(EventLogger));
    let (emulator, handle) = Emulator::new(controller, transport);
    let loop_task = tokio::spawn(emulator.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    handle.shutdown().ok();
    if let Ok(result) = loop_task.await {
        result?;
    }

    Ok(())
}
