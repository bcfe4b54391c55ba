//! DRC runner functions
//!
//! Contains the main entry points for zone-to-zone clearance checks:
//! - Full DRC over every copper zone pair
//! - Targeted DRC on the pairs involving one zone

use rayon::prelude::*;

use crate::board::geometry::{build_index, query_overlapping, PolygonOutline};
use crate::board::zones::{Zone, ZoneBoard, ZoneId};
use crate::config::EngineConfig;
use crate::error::Result;

use super::checks::{check_zone_pair, should_check_pair};
use super::types::{DrcViolation, ViolationSink};

/// A copper zone with its smoothed outline, in board order
struct Candidate<'a> {
    zone: &'a Zone,
    outline: PolygonOutline,
}

fn copper_candidates<'a>(board: &'a ZoneBoard, config: &EngineConfig) -> Vec<Candidate<'a>> {
    let zones: Vec<&Zone> = board.iter().filter(|z| z.layer().is_copper()).collect();
    let smooth = |zone: &&'a Zone| Candidate {
        zone: *zone,
        outline: zone.smoothed_outline(config.fillet_segments),
    };

    if config.parallel_drc {
        zones.par_iter().map(smooth).collect()
    } else {
        zones.iter().map(smooth).collect()
    }
}

/// Candidate pairs (i < j) whose boxes come within the largest clearance
fn candidate_pairs(candidates: &[Candidate], only: Option<ZoneId>) -> Vec<(usize, usize)> {
    let boxes: Vec<_> = candidates.iter().map(|c| c.outline.bounding_box()).collect();
    let tree = build_index(
        boxes
            .iter()
            .enumerate()
            .filter_map(|(i, bbox)| bbox.map(|b| (i, b))),
    );

    let max_clearance = candidates
        .iter()
        .map(|c| c.zone.settings.clearance)
        .max()
        .unwrap_or(0)
        .max(1);

    let mut pairs = Vec::new();
    for (i, bbox) in boxes.iter().enumerate() {
        let Some(bbox) = bbox else { continue };
        if let Some(id) = only {
            if candidates[i].zone.id != id {
                continue;
            }
        }

        for j in query_overlapping(&tree, &bbox.expanded(max_clearance)) {
            if j == i {
                continue;
            }
            // Full runs see each unordered pair once; targeted runs keep all partners
            if only.is_none() && j < i {
                continue;
            }
            if should_check_pair(candidates[i].zone, candidates[j].zone) {
                pairs.push((i.min(j), i.max(j)));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

fn evaluate_pairs(
    candidates: &[Candidate],
    pairs: &[(usize, usize)],
    parallel: bool,
) -> Vec<DrcViolation> {
    let check = |&(i, j): &(usize, usize)| {
        let (a, b) = (&candidates[i], &candidates[j]);
        check_zone_pair(a.zone, &a.outline, b.zone, &b.outline)
    };

    // Collected in pair order either way
    if parallel {
        pairs.par_iter().flat_map_iter(check).collect()
    } else {
        pairs.iter().flat_map(check).collect()
    }
}

/// Run full DRC on all copper zones.
/// Violations are reported to `sink` in board order of the zone pairs;
/// returns the number reported.
pub fn run_zone_drc(
    board: &ZoneBoard,
    config: &EngineConfig,
    sink: &mut dyn ViolationSink,
) -> usize {
    let start = std::time::Instant::now();

    let candidates = copper_candidates(board, config);
    let pairs = candidate_pairs(&candidates, None);
    let violations = evaluate_pairs(&candidates, &pairs, config.parallel_drc);
    let count = violations.len();

    for v in violations {
        sink.report_violation(v);
    }

    log::info!(
        "[DRC] Full check completed: {} zones, {} pairs checked, {} violations found in {:?}",
        candidates.len(),
        pairs.len(),
        count,
        start.elapsed()
    );

    count
}

/// Run DRC on the pairs involving one zone (after an edit)
pub fn run_zone_drc_for(
    board: &ZoneBoard,
    zone_id: ZoneId,
    config: &EngineConfig,
    sink: &mut dyn ViolationSink,
) -> Result<usize> {
    let start = std::time::Instant::now();
    let zone = board.zone(zone_id)?;

    if !zone.layer().is_copper() {
        return Ok(0);
    }

    let candidates = copper_candidates(board, config);
    let pairs = candidate_pairs(&candidates, Some(zone_id));
    let violations = evaluate_pairs(&candidates, &pairs, config.parallel_drc);
    let count = violations.len();

    for v in violations {
        sink.report_violation(v);
    }

    log::info!(
        "[DRC] Targeted check of zone {}: {} pairs, {} violations found in {:?}",
        zone_id,
        pairs.len(),
        count,
        start.elapsed()
    );

    Ok(count)
}
