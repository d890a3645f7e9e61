use clap::{Args, Parser, Subcommand};
use dut_harness::config::{Config, ConfigLoader};
use dut_harness::framer::Framer;
use dut_harness::harness::{
    parse_test_id, ConsoleReporter, JsonReporter, Orchestrator, TestRegistry,
};
use dut_harness::port::{PortConfiguration, SyncSerialPort};
use dut_harness::suite::{self, packets, REPLY_TIMEOUT};
use dut_harness::{logging, AppError, AppResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Exit status when the harness itself failed: at startup, or writing the report.
const EXIT_HARNESS_FAILURE: u8 = 2;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "dut-harness",
    version,
    about = "Conformance harness for an embedded IPv6/UDP/CoAP stack reached over a serial line.",
    long_about = "Sends each test id to the DUT, drives the scenario over the hex packet line protocol and reconciles the host's verdict with the DUT's. Without a serial port the run is dry: sends are dropped and every wait times out immediately."
)]
struct Cli {
    /// Configuration file (otherwise resolved from the environment and standard locations)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serial device the DUT is attached to
    #[arg(long, global = true, value_name = "DEVICE")]
    port: Option<String>,

    /// Line rate of the serial device
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Run without a transport even if a port is configured
    #[arg(long, global = true)]
    dry_run: bool,

    /// Echo wire traffic and packet summaries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run tests (the default)
    Run(RunArgs),
    /// List registered tests
    List,
    /// Print every packet the DUT emits
    Monitor {
        /// Stop after this many packets
        #[arg(long, value_name = "N")]
        max_packets: Option<usize>,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Test id to run, decimal or 0x-prefixed hex (repeatable)
    #[arg(long = "test", value_name = "ID")]
    tests: Vec<String>,

    /// Test group to run (repeatable)
    #[arg(long = "group", value_name = "NAME")]
    groups: Vec<String>,

    /// Print a JSON report instead of one line per test
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_HARNESS_FAILURE)
        }
    }
}

fn run(cli: Cli) -> AppResult<ExitCode> {
    let config = load_config(&cli)?;
    logging::init(&config.logging, config.run.verbose)?;

    let registry = suite::registry()?;
    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::List => {
            list(&registry);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => run_tests(&config, &registry, &args),
        Command::Monitor { max_packets } => {
            monitor(open_framer(&config)?, max_packets);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// File and environment first, then command-line flags on top.
fn load_config(cli: &Cli) -> AppResult<Config> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();

    if let Some(port) = &cli.port {
        config.serial.port = Some(port.clone());
    }
    if let Some(baud) = cli.baud {
        config.serial.baud = baud;
    }
    if cli.verbose {
        config.run.verbose = true;
    }
    if cli.dry_run {
        config.serial.port = None;
    }
    config.validate()?;
    Ok(config)
}

fn open_framer(config: &Config) -> AppResult<Framer> {
    let Some(name) = config.serial.port.as_deref() else {
        return Ok(Framer::detached());
    };
    let port = SyncSerialPort::open(name, PortConfiguration::with_baud(config.serial.baud))?;
    info!(port = name, baud = config.serial.baud, "serial port opened");
    Ok(Framer::new(Box::new(port)).with_poll_interval(config.run.poll_interval()))
}

fn run_tests(config: &Config, registry: &TestRegistry, args: &RunArgs) -> AppResult<ExitCode> {
    let ids = args
        .tests
        .iter()
        .map(|text| parse_test_id(text).ok_or_else(|| AppError::InvalidTestId(text.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    let selected = registry.select(&ids, &args.groups)?;

    let framer = open_framer(config)?;
    let transport = framer.channel_name().map(str::to_string);
    let mut orchestrator = Orchestrator::with_timings(framer, config.run.timings());

    // Report write failures surface only after every test has run.
    let summary = if args.json {
        let mut reporter = JsonReporter::new(transport);
        let summary = orchestrator.run(&selected, &mut reporter);
        reporter.write_to(std::io::stdout().lock())?;
        summary
    } else {
        let mut reporter = ConsoleReporter::stdout();
        let summary = orchestrator.run(&selected, &mut reporter);
        reporter.finish()?;
        summary
    };

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list(registry: &TestRegistry) {
    for case in registry.iter() {
        let group = registry.group_of(case.id).unwrap_or("-");
        println!("{:#04x}  {:<5}  {}", case.id, group, case.name);
    }
}

/// Network console: print a summary of every packet the DUT emits.
fn monitor(mut framer: Framer, max_packets: Option<usize>) {
    if !framer.is_attached() {
        warn!("no transport configured, nothing to monitor");
        return;
    }
    let mut seen = 0usize;
    while max_packets.map_or(true, |max| seen < max) {
        if let Some(frame) = framer.receive_packet(REPLY_TIMEOUT) {
            seen += 1;
            println!("{}", packets::describe(&frame));
        }
    }
}
