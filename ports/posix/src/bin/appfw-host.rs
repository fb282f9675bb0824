//! appfw-host: run one peripheral demo on the simulated board
//!
//! Boots the demo catalog exactly as the firmware does, prints the app
//! listing and runs the selected demo until Ctrl-C or the iteration limit.
//! A watchdog expiry resets the simulated MCU and boots the image again.

use std::fmt::Write as _;

use appfw_apps::{Catalog, APP_NAMES};
use appfw_dispatch::{Dispatcher, DispatcherConfig};
use appfw_posix::time::ClockTick;
use appfw_posix::{resolve_app, scheduler, HostConsole, PortError, SimBoard, SimConfig, Ticker};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run an appfw peripheral demo on a simulated board")]
struct Opts {
    /// Demo to run, by index or by name (e.g. "UART DMA")
    #[arg(short, long, default_value = "0", value_name = "APP")]
    app: String,

    /// Print the registered demos and exit
    #[arg(long)]
    list: bool,

    /// Stop after this many superloop passes
    #[arg(short = 'n', long, value_name = "PASSES")]
    iterations: Option<u64>,

    /// Advance simulated time on every delay instead of sleeping
    #[arg(long)]
    fast: bool,
}

fn main() -> Result<(), PortError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let opts = Opts::parse();

    if opts.list {
        let mut console = HostConsole::new();
        for (index, name) in APP_NAMES.iter().enumerate() {
            writeln!(console, "{index}: {name}")?;
        }
        return Ok(());
    }

    let index = resolve_app(&opts.app)?;
    scheduler::install_ctrlc()?;

    let board = SimBoard::new(SimConfig {
        fast: opts.fast,
        ..SimConfig::default()
    });
    let _ticker = if opts.fast {
        None
    } else {
        Some(Ticker::start(
            board.simulation().clone(),
            ClockTick::default(),
        )?)
    };

    let mut passes = 0u64;
    let mut boots = 0u32;
    loop {
        boots += 1;
        let remaining = opts.iterations.map(|limit| limit.saturating_sub(passes));
        passes += run_image(&board, index, remaining);

        let sim = board.simulation();
        if !sim.reset_pending() || !scheduler::is_running() {
            break;
        }
        if opts.iterations.is_some_and(|limit| passes >= limit) {
            break;
        }
        sim.reset();
        info!("Rebooting (boot #{})", boots + 1);
    }

    info!("Stopped after {} passes", passes);
    Ok(())
}

/// One power-on: build the catalog, boot the dispatcher and run until a
/// stop, the pass limit or a pending reset
fn run_image(board: &SimBoard, index: usize, limit: Option<u64>) -> u64 {
    let mut catalog = Catalog::new(board);
    let config = DispatcherConfig::builder().default_index(index).build();
    let mut dispatcher: Dispatcher<'_> = Dispatcher::new(config);
    let mut console = HostConsole::new();

    dispatcher.boot(|ctx| catalog.register_all(ctx), &mut console);

    let sim = board.simulation();
    let passes = scheduler::run(&mut dispatcher, limit, || sim.reset_pending());
    dispatcher.exit();
    passes
}
