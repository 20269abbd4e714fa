//! Search counters and batch-level reductions over them.
//!
//! Every search produces one [`SearchStats`]. Batches fold those into
//! [`StatsReduction`]s, one per reduce op, all working over the same fixed
//! field schema so min, max, and mean rows line up column for column.

use serde::{Deserialize, Serialize};

/// Counters accumulated over one search invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Wall-clock seconds spent searching.
    pub elapsed_secs: f64,
    /// Complete full-coverage paths encountered, closed or not.
    pub complete_paths: u64,
    /// Moves made, counting moves later retracted.
    pub moves: u64,
    /// Frames popped, whether from dead ends, prunes, or widening.
    pub backtracks: u64,
    /// Closed-tour prunes taken.
    pub prunes: u64,
    /// Shallowest stack depth reached after a dead end.
    pub min_depth: u64,
    /// Ordering calls that refined two or more candidates.
    pub tie_checks: u64,
    /// Candidates left tied after ordering, beyond the first of each score.
    pub ties: u64,
}

/// How a reduction folds two values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceOp {
    Min,
    Max,
    Mean,
}

/// One [`SearchStats`] row with every field widened to f64 so mean rows
/// can hold fractional values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub elapsed_secs: f64,
    pub complete_paths: f64,
    pub moves: f64,
    pub backtracks: f64,
    pub prunes: f64,
    pub min_depth: f64,
    pub tie_checks: f64,
    pub ties: f64,
}

impl StatsRow {
    fn fields(&self) -> [f64; 8] {
        [
            self.elapsed_secs,
            self.complete_paths,
            self.moves,
            self.backtracks,
            self.prunes,
            self.min_depth,
            self.tie_checks,
            self.ties,
        ]
    }

    fn fields_mut(&mut self) -> [&mut f64; 8] {
        [
            &mut self.elapsed_secs,
            &mut self.complete_paths,
            &mut self.moves,
            &mut self.backtracks,
            &mut self.prunes,
            &mut self.min_depth,
            &mut self.tie_checks,
            &mut self.ties,
        ]
    }

    fn fold(&mut self, op: ReduceOp, other: &StatsRow) {
        for (mine, theirs) in self.fields_mut().into_iter().zip(other.fields()) {
            *mine = match op {
                ReduceOp::Min => mine.min(theirs),
                ReduceOp::Max => mine.max(theirs),
                ReduceOp::Mean => *mine + theirs,
            };
        }
    }

    fn scale(&mut self, factor: f64) {
        for field in self.fields_mut() {
            *field *= factor;
        }
    }
}

impl From<SearchStats> for StatsRow {
    fn from(stats: SearchStats) -> Self {
        Self {
            elapsed_secs: stats.elapsed_secs,
            complete_paths: stats.complete_paths as f64,
            moves: stats.moves as f64,
            backtracks: stats.backtracks as f64,
            prunes: stats.prunes as f64,
            min_depth: stats.min_depth as f64,
            tie_checks: stats.tie_checks as f64,
            ties: stats.ties as f64,
        }
    }
}

/// A running reduction of stats rows under one op.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StatsReduction {
    op: ReduceOp,
    count: u64,
    acc: Option<StatsRow>,
}

impl StatsReduction {
    pub fn new(op: ReduceOp) -> Self {
        Self {
            op,
            count: 0,
            acc: None,
        }
    }

    pub fn add(&mut self, stats: &SearchStats) {
        let row = StatsRow::from(*stats);
        self.count += 1;
        match &mut self.acc {
            Some(acc) => acc.fold(self.op, &row),
            None => self.acc = Some(row),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// The reduced row, with mean sums divided out. None until the first add.
    pub fn report(&self) -> Option<StatsRow> {
        let mut row = self.acc?;
        if self.op == ReduceOp::Mean && self.count > 0 {
            row.scale(1.0 / self.count as f64);
        }
        Some(row)
    }
}

/// Min, max, and mean over one population of runs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StatsSummary {
    pub min: StatsReduction,
    pub max: StatsReduction,
    pub mean: StatsReduction,
}

impl StatsSummary {
    pub fn new() -> Self {
        Self {
            min: StatsReduction::new(ReduceOp::Min),
            max: StatsReduction::new(ReduceOp::Max),
            mean: StatsReduction::new(ReduceOp::Mean),
        }
    }

    pub fn add(&mut self, stats: &SearchStats) {
        self.min.add(stats);
        self.max.add(stats);
        self.mean.add(stats);
    }

    pub fn count(&self) -> u64 {
        self.mean.count()
    }

    /// Fixed-width report block, empty when no runs were added.
    pub fn report_lines(&self, label: &str) -> Vec<String> {
        if self.count() == 0 {
            return Vec::new();
        }
        let mut lines = vec![format!("{label} ({} runs)", self.count()), Self::heading()];
        for (name, reduction) in [("min", &self.min), ("max", &self.max), ("mean", &self.mean)] {
            if let Some(row) = reduction.report() {
                lines.push(Self::line(name, &row));
            }
        }
        lines
    }

    fn heading() -> String {
        format!(
            "{:>6} {:>9} {:>8} {:>11} {:>11} {:>7} {:>8} {:>7}",
            "", "time", "paths", "moves", "backs", "level", "checks", "ties"
        )
    }

    fn line(name: &str, row: &StatsRow) -> String {
        format!(
            "{:>6} {:>9.3} {:>8.1} {:>11.1} {:>11.1} {:>7.1} {:>8.1} {:>7.1}",
            name,
            row.elapsed_secs,
            row.complete_paths,
            row.moves,
            row.backtracks,
            row.min_depth,
            row.tie_checks,
            row.ties
        )
    }
}

impl Default for StatsSummary {
    fn default() -> Self {
        Self::new()
    }
}
