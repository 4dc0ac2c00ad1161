use std::io::{IsTerminal, Write};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use artfade_core::protocols::artnet::layout::ARTNET_PORT;
use artfade_core::{
    Command, Config, ControllerError, FadeHandle, PacketSink, PortAddress, UdpTransport,
    encode_channels,
};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artfade")]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ARTFADE_BUILD_COMMIT"), ")"))]
#[command(
    about = "Drive an Art-Net lighting node from named color commands.",
    long_about = None,
    after_help = "Examples:\n  echo purple | artfade run --node 10.0.0.50\n  artfade run --config lights.json --step-delay-ms 5\n  artfade send 10.0.0.50 11 255"
)]
struct Cli {
    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log fade progress
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read command tokens from stdin, one per line, and animate the fixtures.
    Run(RunArgs),
    /// Send a single ArtDMX frame with one channel set.
    Send(SendArgs),
    /// List the recognized command tokens.
    Commands,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON config file; flags below override its fields
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Art-Net node IPv4 address
    #[arg(long)]
    node: Option<Ipv4Addr>,

    /// UDP destination port
    #[arg(long)]
    port: Option<u16>,

    /// Fixture base channel (repeat for several fixtures)
    #[arg(long = "fixture", value_name = "BASE")]
    fixtures: Vec<u16>,

    /// Value written to each fixture base channel on blackout
    #[arg(long)]
    brightness: Option<u8>,

    /// Delay between single-unit fade steps in milliseconds
    #[arg(long)]
    step_delay_ms: Option<u64>,

    #[command(flatten)]
    port_address: PortAddressArgs,

    /// Print the status value after every token
    #[arg(long)]
    status: bool,
}

#[derive(Args, Debug)]
struct PortAddressArgs {
    /// Art-Net net (0-127)
    #[arg(long)]
    net: Option<u8>,

    /// Art-Net subnet (0-15)
    #[arg(long)]
    subnet: Option<u8>,

    /// Art-Net universe (0-15)
    #[arg(long)]
    universe: Option<u8>,
}

#[derive(Args, Debug)]
struct SendArgs {
    /// Art-Net node IPv4 address
    ip: Ipv4Addr,

    /// DMX channel (1-512)
    #[arg(value_parser = clap::value_parser!(u16).range(1..=512))]
    channel: u16,

    /// Channel value (0-255)
    value: u8,

    /// UDP destination port
    #[arg(long, default_value_t = ARTNET_PORT)]
    port: u16,

    #[command(flatten)]
    port_address: PortAddressArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Send(args) => cmd_send(args, cli.quiet),
        Commands::Commands => cmd_commands(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let default = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

async fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    let dispatcher = artfade_core::open_controller(&config).map_err(|err| match err {
        ControllerError::Config(err) => CliError::new(
            format!("invalid configuration: {err}"),
            Some("fixture bases need channels base..=base+3 within 1..=512".to_string()),
        ),
        ControllerError::Transport(err) => CliError::new(
            err.to_string(),
            Some("check that a UDP socket can be opened on this host".to_string()),
        ),
    })?;
    tracing::info!(
        destination = %config.destination(),
        fixtures = ?config.fixtures,
        "ready for commands"
    );

    let mut status = dispatcher.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<FadeHandle> = Vec::new();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read command from stdin")?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                return Ok(());
            }
        };
        let Some(line) = line else {
            break;
        };
        let token = line.trim();
        if token.is_empty() {
            continue;
        }

        pending.retain(|fade| !fade.is_finished());
        if let Some(fade) = dispatcher.dispatch(token).into_fade() {
            pending.push(fade);
        }
        if args.status {
            let value = status.borrow_and_update().to_string();
            println!("status: {value}");
            std::io::stdout().flush().context("failed to write status")?;
        }
    }

    for fade in pending {
        fade.wait().await;
    }
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<Config, CliError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).map_err(|err| {
            CliError::new(
                format!("failed to load config {}: {err}", path.display()),
                Some("pass a JSON object, e.g. {\"node\": \"10.0.0.50\", \"fixtures\": [10, 20]}".to_string()),
            )
        })?,
        None => Config::default(),
    };

    if let Some(node) = args.node {
        config.node = node;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if !args.fixtures.is_empty() {
        config.fixtures = args.fixtures.clone();
    }
    if let Some(brightness) = args.brightness {
        config.default_brightness = brightness;
    }
    if let Some(step_delay_ms) = args.step_delay_ms {
        config.step_delay_ms = step_delay_ms;
    }
    config.port_address = args.port_address.apply(config.port_address);
    Ok(config)
}

impl PortAddressArgs {
    fn apply(&self, mut address: PortAddress) -> PortAddress {
        if let Some(net) = self.net {
            address.net = net;
        }
        if let Some(subnet) = self.subnet {
            address.subnet = subnet;
        }
        if let Some(universe) = self.universe {
            address.universe = universe;
        }
        address
    }
}

fn cmd_send(args: SendArgs, quiet: bool) -> Result<(), CliError> {
    let port_address = args.port_address.apply(PortAddress::default());
    port_address.validate().map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("net is 0-127, subnet and universe are 0-15".to_string()),
        )
    })?;
    let packet = encode_channels(&[(args.channel, args.value)], port_address)
        .context("failed to encode ArtDMX packet")?;

    let destination = SocketAddr::from((args.ip, args.port));
    let transport = UdpTransport::open(destination).context("failed to open UDP socket")?;
    let sent = transport.send(&packet).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("check that the node address is reachable".to_string()),
        )
    })?;

    if !quiet {
        eprintln!("OK: {sent} bytes sent -> {destination}");
    }
    Ok(())
}

fn cmd_commands() -> Result<(), CliError> {
    for command in Command::ALL {
        println!("{command}");
    }
    Ok(())
}
