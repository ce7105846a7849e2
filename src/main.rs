/*!
 * CPU Scheduling Simulator - Command Line Entry Point
 *
 * - `run`: one autonomous engine, by tick count or wall-clock duration
 * - `compare`: two algorithms under an identical arrival stream
 */

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cpu_sched_sim::monitoring::span_engine;
use cpu_sched_sim::simulation::{compare_dir, compare_metrics_path, run_id, single_run_metrics_path};
use cpu_sched_sim::{
    init_tracing, Algorithm, Comparator, CsvMetricsSink, Engine, EventSink, JsonMetricsSink,
    MetricsRecord, MetricsSink, MetricsSummary, Simulation, SimulationConfig, TracingSink,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Instrument};

const DEFAULT_TICKS: u64 = 60;

#[derive(Parser, Debug)]
#[command(name = "sched-sim")]
#[command(about = "Tick-driven CPU scheduling simulator", long_about = None)]
struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one algorithm with autonomous arrivals
    Run {
        /// Scheduling algorithm (fcfs, priority, priority_preemptive, sjf, rr)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        #[command(flatten)]
        params: RunParams,

        /// Per-process metrics CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Summary CSV (requires --csv)
        #[arg(long, requires = "csv")]
        summary_csv: Option<PathBuf>,

        /// Records and summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Directory receiving a timestamped metrics CSV
        #[arg(long, conflicts_with = "csv")]
        out_dir: Option<PathBuf>,
    },

    /// Compare two algorithms on the same workload
    Compare {
        #[arg(long)]
        a: Algorithm,

        #[arg(long)]
        b: Algorithm,

        #[command(flatten)]
        params: RunParams,

        /// Directory receiving compare/<run-id>/ metrics files
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunParams {
    /// Round-robin quantum in ticks
    #[arg(short, long)]
    quantum: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Probability of a new arrival per tick
    #[arg(long)]
    arrival_probability: Option<f64>,

    /// Tick period for wall-clock runs
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Number of ticks to simulate (ignored with --seconds)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Run in real time for this many seconds instead of a tick count
    #[arg(long)]
    seconds: Option<u64>,
}

impl RunParams {
    fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(q) = self.quantum {
            config = config.with_quantum(q);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(p) = self.arrival_probability {
            config = config.with_arrival_probability(p);
        }
        if let Some(ms) = self.tick_ms {
            config = config.with_tick_interval_ms(ms);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimulationConfig::from_json_str(&text)?
        }
        None => SimulationConfig::default(),
    };

    match cli.command {
        Command::Run {
            algorithm,
            params,
            csv,
            summary_csv,
            json,
            out_dir,
        } => {
            let mut config = params.apply(base);
            if let Some(algorithm) = algorithm {
                config = config.with_algorithm(algorithm);
            }
            config.validate()?;

            let id = run_id();
            let records = run_single(config.clone(), &params)
                .instrument(span_engine(config.algorithm.as_str(), &id))
                .await?;
            print_summary(config.algorithm, &MetricsSummary::from_records(&records));

            if let Some(path) = csv {
                let mut sink = CsvMetricsSink::new(path);
                if let Some(summary) = summary_csv {
                    sink = sink.with_summary(summary);
                }
                export(&sink, &records);
            }
            if let Some(dir) = out_dir {
                let path = single_run_metrics_path(&dir, config.algorithm, &id);
                export(&CsvMetricsSink::new(path), &records);
            }
            if let Some(path) = json {
                export(&JsonMetricsSink::new(path), &records);
            }
        }

        Command::Compare {
            a,
            b,
            params,
            out_dir,
        } => {
            let config = params.apply(base);
            let id = run_id();
            let label = format!("{a}-vs-{b}");
            run_compare(config, a, b, &params, out_dir.as_deref(), &id)
                .instrument(span_engine(&label, &id))
                .await?;
        }
    }

    Ok(())
}

async fn run_single(config: SimulationConfig, params: &RunParams) -> Result<Vec<MetricsRecord>> {
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);

    if let Some(seconds) = params.seconds {
        let mut simulation = Simulation::autonomous(config, sink)?;
        simulation.start()?;
        info!(seconds, "Running in real time (Ctrl-C stops early)");
        wait(seconds).await;
        return Ok(simulation.stop().await?);
    }

    let mut engine = Engine::autonomous(config, sink)?;
    for _ in 0..params.ticks.unwrap_or(DEFAULT_TICKS) {
        engine.tick(&[]);
    }
    Ok(engine.shutdown())
}

async fn run_compare(
    config: SimulationConfig,
    a: Algorithm,
    b: Algorithm,
    params: &RunParams,
    out_dir: Option<&Path>,
    id: &str,
) -> Result<()> {
    let mut comparator = Comparator::new(config, a, b, Arc::new(TracingSink))?;

    if let Some(seconds) = params.seconds {
        comparator.start()?;
        wait(seconds).await;
    } else {
        for _ in 0..params.ticks.unwrap_or(DEFAULT_TICKS) {
            comparator.tick()?;
        }
    }
    let report = comparator.stop().await?;

    print_summary(a, &report.comparison.a);
    print_summary(b, &report.comparison.b);
    match report.comparison.lower_mean_wait() {
        Some(winner) => println!("Lower mean wait: {winner}"),
        None => println!("Mean wait tied"),
    }

    if let Some(dir) = out_dir {
        export(&CsvMetricsSink::new(compare_metrics_path(dir, id, a)), &report.a);
        export(&CsvMetricsSink::new(compare_metrics_path(dir, id, b)), &report.b);

        let summary = compare_dir(dir, id).join("summary.csv");
        if let Err(e) = CsvMetricsSink::write_comparison(&summary, &report.comparison) {
            error!(error = %e, path = %summary.display(), "Comparison export failed");
        }
    }
    Ok(())
}

async fn wait(seconds: u64) {
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
}

/// Export failures are reported, never fatal
fn export(sink: &dyn MetricsSink, records: &[MetricsRecord]) {
    if let Err(e) = sink.export(records) {
        error!(error = %e, "Metrics export failed");
    }
}

fn print_summary(algorithm: Algorithm, summary: &MetricsSummary) {
    println!("\n{algorithm}: {} terminated processes", summary.processes);
    for (name, value) in summary.rows() {
        println!("  {name:<16} {value:>8.2}");
    }
}

