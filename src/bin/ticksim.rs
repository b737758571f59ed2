//! ticksim: run CPU scheduling simulations from task files.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ticksim::{
    load_path, Metrics, PolicyConfig, PolicyKind, Scenario, SimFormat, SimulationResult, Simulator,
    Tick,
};

/// Run CPU scheduling simulations from task files.
#[derive(Parser)]
#[command(name = "ticksim", version)]
struct Cli {
    /// Task file: CSV with a header row, or a JSON array (by extension).
    workload: PathBuf,

    /// Dispatch policy: fcfs, sjf, srtf, rr or mlfq.
    #[arg(short, long)]
    policy: PolicyKind,

    /// Round-Robin quantum in ticks.
    #[arg(short, long)]
    quantum: Option<Tick>,

    /// MLFQ quanta indexed by level, highest priority first (e.g. "0,2,4,8").
    ///
    /// The first value is a placeholder for level 0 and is ignored; the
    /// second is the level-1 quantum. Tasks that exhaust the last listed
    /// level stay there.
    #[arg(long, value_delimiter = ',', value_name = "TICKS")]
    level_quanta: Vec<Tick>,

    /// Abort if the simulation has not finished after this many ticks.
    ///
    /// Falls back to TICKSIM_MAX_TICKS, then 300.
    #[arg(long, env = "TICKSIM_MAX_TICKS")]
    max_ticks: Option<Tick>,

    /// Print the full result as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Write Perfetto trace JSON to file.
    #[arg(long, value_name = "PATH")]
    perfetto: Option<PathBuf>,

    /// Print trace events to stderr.
    #[arg(long)]
    dump_trace: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = PolicyConfig::from_parts(cli.policy, cli.quantum, &cli.level_quanta)
        .context("invalid policy selection")?;

    let defs = load_path(&cli.workload)
        .with_context(|| format!("failed to load {}", cli.workload.display()))?;

    let mut builder = Scenario::builder().tasks(defs);
    if let Some(max_ticks) = cli.max_ticks {
        builder = builder.max_ticks(max_ticks);
    }
    let scenario = builder.build().context("invalid workload")?;

    let sim = Simulator::new(config);
    let trace = sim
        .trace(&scenario)
        .with_context(|| format!("simulation under {} failed", sim.config()))?;

    if cli.dump_trace {
        trace.dump();
    }

    if let Some(path) = &cli.perfetto {
        trace
            .save_perfetto(path)
            .with_context(|| format!("failed to write perfetto trace {}", path.display()))?;
        eprintln!("wrote perfetto trace to {}", path.display());
    }

    if cli.json {
        let result = SimulationResult::from_trace(sim.config(), trace);
        let mut stdout = std::io::stdout().lock();
        result
            .write_json(&mut stdout)
            .context("failed to write result")?;
        writeln!(stdout)?;
    } else {
        println!("Policy:              {}", sim.config());
        Metrics::from_trace(&trace).print_summary();
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .event_format(SimFormat)
        .try_init();
}
