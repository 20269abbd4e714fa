//! Batch orchestration: one search per starting square, aggregate
//! statistics, and an end-of-run validation sweep over everything the
//! searches claimed to find.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Loc};
use crate::search::control::SearchControl;
use crate::search::engine::{SearchParams, SearchStatus, Searcher};
use crate::search::stats::{SearchStats, StatsSummary};
use crate::validate;

/// Settings shared by every search in a batch.
#[derive(Clone, Debug)]
pub struct BatchParams {
    pub rows: usize,
    pub cols: usize,
    pub starts: Vec<Loc>,
    pub closed: bool,
    pub budget: Option<Duration>,
    pub look_ahead: u32,
    pub backup_limit: u64,
    pub max_dead_ends: Option<u64>,
}

impl Default for BatchParams {
    fn default() -> Self {
        let base = SearchParams::default();
        Self {
            rows: base.rows,
            cols: base.cols,
            starts: grid_starts(base.cols, base.rows),
            closed: base.closed,
            budget: base.budget,
            look_ahead: base.look_ahead,
            backup_limit: base.backup_limit,
            max_dead_ends: base.max_dead_ends,
        }
    }
}

/// Every square of a cols x rows board, row by row from a1.
pub fn grid_starts(cols: usize, rows: usize) -> Vec<Loc> {
    let mut starts = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            starts.push(Loc::new(col, row));
        }
    }
    starts
}

/// How one starting square concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Complete and closed.
    Tour,
    /// Complete.
    Path,
    /// Ended with a complete path that never closed.
    NotClosed,
    /// Ended with only a partial path.
    Incomplete,
    /// Ended with no path at all.
    NoPath,
}

/// Result record for one starting square.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartOutcome {
    pub start: Loc,
    pub outcome: Outcome,
    /// The found path, or the best one seen when the search failed.
    pub path: Option<Vec<Loc>>,
    pub stats: SearchStats,
}

/// Everything a batch run produces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: usize,
    pub cols: usize,
    pub outcomes: Vec<StartOutcome>,
    /// Starts that produced a complete path.
    pub solved: u64,
    /// Solved starts whose path also closed.
    pub closed_tours: u64,
    pub total_success_secs: f64,
    pub max_success_secs: f64,
    pub success: StatsSummary,
    pub failure: StatsSummary,
    /// Complete paths the validator rejected.
    pub invalid_paths: u64,
    /// Indices into `outcomes` of paths that are the same circuit.
    pub duplicate_groups: Vec<Vec<usize>>,
}

impl BatchReport {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            outcomes: Vec::new(),
            solved: 0,
            closed_tours: 0,
            total_success_secs: 0.0,
            max_success_secs: 0.0,
            success: StatsSummary::new(),
            failure: StatsSummary::new(),
            invalid_paths: 0,
            duplicate_groups: Vec::new(),
        }
    }

    /// Human-readable closing report.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{:4} starting squares searched", self.outcomes.len()),
            format!("{:4} complete paths", self.solved),
            format!("{:4} closed tours", self.closed_tours),
        ];
        if self.solved > 0 {
            lines.push(format!(
                "     average success time {:.3}s, maximum {:.3}s",
                self.total_success_secs / self.solved as f64,
                self.max_success_secs
            ));
        }
        for block in [
            self.success.report_lines("successful"),
            self.failure.report_lines("failed"),
        ] {
            if !block.is_empty() {
                lines.push(String::new());
                lines.extend(block);
            }
        }
        if !self.duplicate_groups.is_empty() {
            lines.push(String::new());
            for group in &self.duplicate_groups {
                let starts = group
                    .iter()
                    .map(|&index| self.desc(self.outcomes[index].start))
                    .collect::<Vec<_>>()
                    .join(" ");
                lines.push(format!("duplicate circuit from starts: {starts}"));
            }
        }
        if self.invalid_paths > 0 {
            lines.push(format!(
                "{} complete paths FAILED validation",
                self.invalid_paths
            ));
        } else if self.solved > 0 {
            lines.push(format!("all {} complete paths validated", self.solved));
        }
        lines
    }

    fn desc(&self, loc: Loc) -> String {
        crate::board::loc::format_loc(loc, self.cols, self.rows)
    }
}

/// Run one search per starting square.
pub fn run_batch(params: &BatchParams, control: Option<Arc<SearchControl>>) -> BatchReport {
    run_batch_with(params, control, |_, _| {})
}

/// Like [`run_batch`], invoking `progress` after each start concludes.
pub fn run_batch_with<F>(
    params: &BatchParams,
    control: Option<Arc<SearchControl>>,
    mut progress: F,
) -> BatchReport
where
    F: FnMut(usize, &StartOutcome),
{
    let board = Board::new(params.cols, params.rows);
    let full = params.rows * params.cols;
    let mut report = BatchReport::new(params.rows, params.cols);
    for (index, &start) in params.starts.iter().enumerate() {
        if control.as_ref().map_or(false, |ctl| ctl.is_stopped()) {
            log::info!("batch stopped before start {}", board.desc(start));
            break;
        }
        let search_params = SearchParams {
            rows: params.rows,
            cols: params.cols,
            start,
            closed: params.closed,
            budget: params.budget,
            look_ahead: params.look_ahead,
            backup_limit: params.backup_limit,
            max_dead_ends: params.max_dead_ends,
        };
        let record = match build_searcher(search_params, control.as_ref()) {
            Ok(mut searcher) => run_start(index, start, &mut searcher, &board, full, &mut report),
            Err(error) => {
                log::error!("{:3}: cannot search from {}: {error}", index + 1, board.desc(start));
                StartOutcome {
                    start,
                    outcome: Outcome::NoPath,
                    path: None,
                    stats: SearchStats::default(),
                }
            }
        };
        progress(index, &record);
        report.outcomes.push(record);
    }
    validate_report(&mut report);
    log::info!(
        "batch done: {}/{} starts produced complete paths, {} closed tours",
        report.solved,
        report.outcomes.len(),
        report.closed_tours
    );
    report
}

fn build_searcher(
    params: SearchParams,
    control: Option<&Arc<SearchControl>>,
) -> Result<Searcher, crate::search::engine::SearchError> {
    match control {
        Some(control) => Searcher::with_control(params, Arc::clone(control)),
        None => Searcher::new(params),
    }
}

fn run_start(
    index: usize,
    start: Loc,
    searcher: &mut Searcher,
    board: &Board,
    full: usize,
    report: &mut BatchReport,
) -> StartOutcome {
    let found = match searcher.next_path() {
        Ok(found) => found,
        Err(error) => {
            log::error!("{:3}: search from {} failed: {error}", index + 1, board.desc(start));
            let stats = searcher.stats();
            report.failure.add(&stats);
            return StartOutcome {
                start,
                outcome: Outcome::NoPath,
                path: None,
                stats,
            };
        }
    };
    let stats = searcher.stats();
    match found {
        Some(path) => {
            let closed = searcher.status() == SearchStatus::FoundTour
                || (path.len() > 1 && validate::knight_adjacent(path[0], path[path.len() - 1]));
            report.solved += 1;
            if closed {
                report.closed_tours += 1;
            }
            report.total_success_secs += stats.elapsed_secs;
            report.max_success_secs = report.max_success_secs.max(stats.elapsed_secs);
            report.success.add(&stats);
            log::info!(
                "{:3}: {} {} in {:.3}s: {}",
                index + 1,
                board.desc(start),
                if closed { "closed tour" } else { "complete path" },
                stats.elapsed_secs,
                board.path_desc(&path)
            );
            StartOutcome {
                start,
                outcome: if closed { Outcome::Tour } else { Outcome::Path },
                path: Some(path),
                stats,
            }
        }
        None => {
            let best = searcher.best_path().map(|path| path.to_vec());
            let outcome = classify_failure(best.as_deref(), full);
            let how = match searcher.status() {
                SearchStatus::TimedOut => "timed out",
                _ => "exhausted",
            };
            log::info!(
                "{:3}: {} {} after {:.3}s ({} complete paths seen, best {} squares)",
                index + 1,
                board.desc(start),
                how,
                stats.elapsed_secs,
                stats.complete_paths,
                best.as_ref().map_or(0, |path| path.len())
            );
            report.failure.add(&stats);
            StartOutcome {
                start,
                outcome,
                path: best,
                stats,
            }
        }
    }
}

fn classify_failure(best: Option<&[Loc]>, full: usize) -> Outcome {
    match best {
        None => Outcome::NoPath,
        Some(path) if path.len() < full => Outcome::Incomplete,
        Some(_) => Outcome::NotClosed,
    }
}

/// Re-check every claimed complete path with the independent validator
/// and flag circuits that are duplicates of one another.
fn validate_report(report: &mut BatchReport) {
    let universe = validate::board_universe(report.cols, report.rows);
    let mut complete: Vec<(usize, Vec<Loc>)> = Vec::new();
    for (index, record) in report.outcomes.iter().enumerate() {
        let path = match (&record.path, record.outcome) {
            (Some(path), Outcome::Tour) | (Some(path), Outcome::Path) => path,
            _ => continue,
        };
        let closed = record.outcome == Outcome::Tour;
        if !validate::is_valid_tour(path, &universe, closed) {
            report.invalid_paths += 1;
            log::warn!(
                "path from {} claimed complete but failed validation ({} repeated squares)",
                report.desc(record.start),
                crate::board::loc::duplicate_squares(path)
            );
        }
        complete.push((index, path.clone()));
    }
    let paths: Vec<Vec<Loc>> = complete.iter().map(|(_, path)| path.clone()).collect();
    for group in validate::find_duplicate_paths(&paths) {
        report
            .duplicate_groups
            .push(group.into_iter().map(|i| complete[i].0).collect());
    }
}
