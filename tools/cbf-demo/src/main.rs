//! cbf-demo: counting Bloom filter workload driver
//!
//! Builds a filter sized for `--elements` at `--error-rate`, then times
//! add / contains / delete over random byte strings and reports the
//! observed false-positive rate next to the configured and theoretical ones.
//!
//! Sizing flags left unset fall back to `CBF_CAPACITY` / `CBF_ERROR_RATE`,
//! then to the library defaults.

mod workload;

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use counting_bloom::{
    calculate_fpr, CountingBloomFilter, FilterConfig, Metrics, MetricsRecorder, MetricsSnapshot,
    NoOpMetrics,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::workload::Workload;

/// cbf-demo: counting Bloom filter workload driver
#[derive(Parser, Debug)]
#[command(name = "cbf-demo")]
#[command(about = "Time add / contains / delete on a counting Bloom filter")]
struct Args {
    /// Number of elements to insert (also the filter capacity)
    #[arg(short = 'n', long)]
    elements: Option<usize>,

    /// Target false-positive probability
    #[arg(short = 'p', long)]
    error_rate: Option<f64>,

    /// Size of each random element in bytes
    #[arg(long, default_value_t = 200)]
    element_size: usize,

    /// Worker threads sharing the filter
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Seed for element generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Skip per-operation metrics (phase timings are still reported)
    #[arg(long)]
    no_metrics: bool,
}

impl Args {
    /// Flags override the environment, which overrides the defaults.
    fn filter_config(&self) -> Result<FilterConfig> {
        let mut config = FilterConfig::from_env();
        if let Some(elements) = self.elements {
            config = config.with_capacity(elements);
        }
        if let Some(error_rate) = self.error_rate {
            config = config.with_error_rate(error_rate);
        }
        config.validate().context("invalid filter configuration")?;
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct PhaseReport {
    name: &'static str,
    elements: usize,
    seconds: f64,
    per_second: f64,
}

impl PhaseReport {
    fn new(name: &'static str, elements: usize, elapsed: Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        let per_second = if seconds > 0.0 { elements as f64 / seconds } else { f64::INFINITY };
        Self { name, elements, seconds, per_second }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    capacity: usize,
    size: usize,
    hash_count: usize,
    threads: usize,
    phases: Vec<PhaseReport>,
    configured_fpr: f64,
    theoretical_fpr: f64,
    observed_fpr: f64,
    false_positives: u64,
    absent_lookups: u64,
    metrics: MetricsSnapshot,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialise logging")?;

    ensure!(args.threads > 0, "--threads must be at least 1");
    ensure!(args.element_size > 0, "--element-size must be at least 1");

    let report = run(&args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn run(args: &Args) -> Result<Report> {
    let config = args.filter_config()?;
    let filter: CountingBloomFilter<Vec<u8>> = CountingBloomFilter::from_config(&config)?;
    info!(
        capacity = config.capacity,
        error_rate = config.error_rate,
        size = filter.size(),
        hash_count = filter.hash_count(),
        "filter created"
    );

    let workload = Workload::generate(config.capacity, args.element_size, args.seed);
    debug!(
        existing = workload.existing.len(),
        absent = workload.absent.len(),
        "workload generated"
    );

    let metrics = Metrics::new();
    let recorder: &dyn MetricsRecorder = if args.no_metrics { &NoOpMetrics } else { &metrics };
    let mut phases = Vec::with_capacity(4);

    phases.push(timed_phase("add", &workload.existing, args.threads, |element| {
        let start = Instant::now();
        filter.add(element);
        recorder.record_add(start.elapsed());
    }));

    // Tallied regardless of --no-metrics; these drive the correctness checks
    let existing_metrics = Metrics::new();
    phases.push(timed_phase("contains (existing)", &workload.existing, args.threads, |element| {
        let start = Instant::now();
        let found = filter.contains(element);
        recorder.record_lookup(start.elapsed(), found);
        existing_metrics.record_lookup(Duration::ZERO, found);
    }));
    let existing = existing_metrics.snapshot();
    ensure!(
        existing.lookups_positive == existing.lookups,
        "false negative: {} of {} inserted elements not found",
        existing.lookups - existing.lookups_positive,
        existing.lookups
    );

    let absent_metrics = Metrics::new();
    phases.push(timed_phase("contains (non-existing)", &workload.absent, args.threads, |element| {
        let start = Instant::now();
        let found = filter.contains(element);
        recorder.record_lookup(start.elapsed(), found);
        absent_metrics.record_lookup(Duration::ZERO, found);
    }));

    phases.push(timed_phase("delete", &workload.existing, args.threads, |element| {
        let start = Instant::now();
        filter.delete(element);
        recorder.record_delete(start.elapsed());
    }));
    debug!(nonzero = filter.nonzero_counters(), "counters left after delete");

    let absent = absent_metrics.snapshot();
    Ok(Report {
        capacity: config.capacity,
        size: filter.size(),
        hash_count: filter.hash_count(),
        threads: args.threads,
        phases,
        configured_fpr: config.error_rate,
        theoretical_fpr: calculate_fpr(filter.size(), config.capacity, filter.hash_count()),
        observed_fpr: absent_metrics.observed_positive_rate(),
        false_positives: absent.lookups_positive,
        absent_lookups: absent.lookups,
        metrics: metrics.snapshot(),
    })
}

/// Run `op` over `elements`, split into contiguous chunks across `threads`.
fn timed_phase<F>(name: &'static str, elements: &[Vec<u8>], threads: usize, op: F) -> PhaseReport
where
    F: Fn(&Vec<u8>) + Sync,
{
    let start = Instant::now();
    if threads <= 1 || elements.len() < threads {
        elements.iter().for_each(&op);
    } else {
        let chunk = elements.len().div_ceil(threads);
        let op = &op;
        thread::scope(|s| {
            for part in elements.chunks(chunk) {
                s.spawn(move || part.iter().for_each(op));
            }
        });
    }
    let report = PhaseReport::new(name, elements.len(), start.elapsed());
    debug!(phase = name, seconds = report.seconds, "phase complete");
    report
}

fn print_report(report: &Report) {
    println!("m = {}, k = {}", report.size, report.hash_count);
    println!("capacity = {}, threads = {}", report.capacity, report.threads);
    println!();

    for phase in &report.phases {
        println!(
            "{:<24} {:>10.4} s  {:>14.0} elements/s",
            phase.name, phase.seconds, phase.per_second
        );
    }
    println!();

    println!(
        "false positives: {} / {} (observed {:.6}, configured {:.6}, theoretical {:.6})",
        report.false_positives,
        report.absent_lookups,
        report.observed_fpr,
        report.configured_fpr,
        report.theoretical_fpr
    );
    println!(
        "avg ns: add {}, lookup {}, delete {}",
        report.metrics.avg_add_ns, report.metrics.avg_lookup_ns, report.metrics.avg_delete_ns
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["cbf-demo", "--seed", "11", "--element-size", "16"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_flags_override_config() {
        let config = args(&["-n", "300", "-p", "0.05"]).filter_config().unwrap();
        assert_eq!(config, FilterConfig::new(300, 0.05).unwrap());
    }

    #[test]
    fn test_invalid_error_rate_is_rejected() {
        assert!(args(&["-n", "10", "-p", "1.5"]).filter_config().is_err());
    }

    #[test]
    fn test_run_records_through_metrics() {
        let report = run(&args(&["-n", "500", "-p", "0.01", "--threads", "2"])).unwrap();

        assert_eq!(report.capacity, 500);
        assert_eq!(report.phases.len(), 4);
        assert_eq!(report.metrics.adds, 500);
        assert_eq!(report.metrics.deletes, 500);
        assert_eq!(report.metrics.lookups, 500 + report.absent_lookups);
        assert!(report.observed_fpr <= 0.05);
    }

    #[test]
    fn test_no_metrics_still_reports_false_positives() {
        let report = run(&args(&["-n", "500", "-p", "0.01", "--no-metrics"])).unwrap();

        assert_eq!(report.metrics, MetricsSnapshot::default());
        assert_eq!(report.absent_lookups, 500);
    }
}
