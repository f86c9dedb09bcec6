//! clinic-sweep: staffing comparison for the vaccine clinic simulator.
//!
//! Runs every (receptionists, nurses) combination in the requested ranges,
//! several seeded replications each, then prints a table of averaged
//! outcomes and writes it to `<out>/comparison.csv`.  Per-run tables go to
//! the same directory through `vc-output`.
//!
//! ```console
//! $ cargo run --release -p clinic-sweep -- --receptionists 1..=3 --nurses 1..=4
//! $ RUST_LOG=vc_clinic=debug cargo run -p clinic-sweep -- --replications 1
//! ```

mod sweep;

use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vc_core::ClinicConfig;
use vc_output::{CsvWriter, OutputWriter, write_run};

use sweep::{CellAverages, grid, run_grid};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Parser)]
#[command(name = "clinic-sweep", version, about = "Compare clinic staffing levels")]
struct Args {
    /// JSON clinic config; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Receptionist counts to try, e.g. `1..=3` or `2`.
    #[arg(long, value_parser = parse_range, default_value = "1..=3")]
    receptionists: RangeInclusive<u32>,

    /// Nurse counts to try.
    #[arg(long, value_parser = parse_range, default_value = "1..=3")]
    nurses: RangeInclusive<u32>,

    /// Output directory.
    #[arg(long, default_value = "output/clinic-sweep")]
    out: PathBuf,

    /// Seeded replications per cell.
    #[arg(long, default_value_t = 5)]
    replications: u32,

    /// Write per-run tables to `output.db` instead of CSV files.
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    sqlite: bool,
}

fn parse_range(s: &str) -> Result<RangeInclusive<u32>, String> {
    let bound = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{v:?}: {e}"));
    let (lo, hi) = match s.split_once("..=") {
        Some((lo, hi)) => (bound(lo)?, bound(hi)?),
        None => {
            let v = bound(s)?;
            (v, v)
        }
    };
    if lo == 0 || lo > hi {
        return Err(format!("range {s:?} must be non-empty and start at 1 or more"));
    }
    Ok(lo..=hi)
}

fn load_config(path: Option<&Path>) -> Result<ClinicConfig> {
    let Some(path) = path else {
        return Ok(ClinicConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config: ClinicConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn open_writer(args: &Args) -> Result<Box<dyn OutputWriter>> {
    #[cfg(feature = "sqlite")]
    {
        if args.sqlite {
            return Ok(Box::new(vc_output::SqliteWriter::new(&args.out)?));
        }
    }
    Ok(Box::new(CsvWriter::new(&args.out)?))
}

fn print_table(rows: &[CellAverages]) {
    println!(
        "{:>5} {:>5} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "recep", "nurse", "walk-ins", "appts", "balked", "ren-chk", "ren-vac", "vacc", "abandon"
    );
    println!("{}", "-".repeat(77));
    for r in rows {
        println!(
            "{:>5} {:>5} {:>9.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>7.1}%",
            r.receptionists,
            r.nurses,
            r.walk_ins,
            r.appointments,
            r.balked,
            r.reneged_checkin,
            r.reneged_vaccination,
            r.vaccinated,
            r.abandonment_rate * 100.0,
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let base = load_config(args.config.as_deref())?;
    let cells = grid(args.receptionists.clone(), args.nurses.clone());
    info!(
        cells = cells.len(),
        replications = args.replications,
        horizon_secs = base.horizon_secs,
        "starting sweep"
    );

    let t0 = Instant::now();
    let outcomes = run_grid(&base, &cells, args.replications)?;
    let elapsed = t0.elapsed();

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let mut writer = open_writer(&args)?;
    let mut run = 0u32;
    for (_, results) in &outcomes {
        for result in results {
            write_run(writer.as_mut(), result, run)?;
            run += 1;
        }
    }
    writer.finish()?;

    let rows: Vec<CellAverages> = outcomes.iter().map(|(avg, _)| *avg).collect();
    let mut table = csv::Writer::from_path(args.out.join("comparison.csv"))?;
    for row in &rows {
        table.serialize(row)?;
    }
    table.flush()?;

    println!();
    print_table(&rows);
    println!();
    println!("{run} runs in {:.3} s, output in {}", elapsed.as_secs_f64(), args.out.display());

    Ok(())
}
