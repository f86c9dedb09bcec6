//! Staffing grid: run every (receptionists, nurses) cell several times and
//! average the outcome counts.

use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::info;

use vc_clinic::{ClinicResult, RunResult, Summary};
use vc_core::{ClinicConfig, SimRng};

/// Base seed used when the loaded config is unseeded.
pub const DEFAULT_BASE_SEED: u64 = 1_111;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub receptionists: u32,
    pub nurses:        u32,
}

/// One line of the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellAverages {
    pub receptionists:       u32,
    pub nurses:              u32,
    pub replications:        u32,
    pub walk_ins:            f64,
    pub appointments:        f64,
    pub balked:              f64,
    pub reneged_checkin:     f64,
    pub reneged_vaccination: f64,
    pub vaccinated:          f64,
    pub pending:             f64,
    pub abandonment_rate:    f64,
}

impl CellAverages {
    pub fn from_summaries(cell: Cell, summaries: &[Summary]) -> Self {
        let n = summaries.len().max(1) as f64;
        let mean = |f: fn(&Summary) -> usize| summaries.iter().map(f).sum::<usize>() as f64 / n;
        Self {
            receptionists:       cell.receptionists,
            nurses:              cell.nurses,
            replications:        summaries.len() as u32,
            walk_ins:            mean(|s| s.walk_ins),
            appointments:        mean(|s| s.appointments),
            balked:              mean(|s| s.balked),
            reneged_checkin:     mean(|s| s.reneged_checkin),
            reneged_vaccination: mean(|s| s.reneged_vaccination),
            vaccinated:          mean(|s| s.vaccinated),
            pending:             mean(|s| s.pending),
            abandonment_rate:    summaries.iter().map(Summary::abandonment_rate).sum::<f64>() / n,
        }
    }
}

/// Row-major grid, receptionists outer.
pub fn grid(receptionists: RangeInclusive<u32>, nurses: RangeInclusive<u32>) -> Vec<Cell> {
    receptionists
        .flat_map(|r| nurses.clone().map(move |n| Cell { receptionists: r, nurses: n }))
        .collect()
}

/// All replications of one cell, in replication order.
pub fn run_cell(base: &ClinicConfig, cell: Cell, replications: u32) -> ClinicResult<Vec<RunResult>> {
    let base_seed = base.seed.unwrap_or(DEFAULT_BASE_SEED);
    let mut results = Vec::with_capacity(replications as usize);
    for i in 0..replications {
        let mut config = base.with_staffing(cell.receptionists, cell.nurses);
        config.seed = Some(SimRng::replication_seed(base_seed, u64::from(i)));
        results.push(vc_clinic::run(&config)?);
    }
    info!(receptionists = cell.receptionists, nurses = cell.nurses, replications, "cell done");
    Ok(results)
}

/// Run the whole grid.  Output order matches `cells` regardless of
/// whether the `parallel` feature is on.
pub fn run_grid(
    base:         &ClinicConfig,
    cells:        &[Cell],
    replications: u32,
) -> ClinicResult<Vec<(CellAverages, Vec<RunResult>)>> {
    let one = |&cell: &Cell| -> ClinicResult<(CellAverages, Vec<RunResult>)> {
        let results = run_cell(base, cell, replications)?;
        let summaries: Vec<Summary> = results.iter().map(|r| r.summary).collect();
        Ok((CellAverages::from_summaries(cell, &summaries), results))
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        cells.par_iter().map(one).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        cells.iter().map(one).collect()
    }
}
