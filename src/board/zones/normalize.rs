//! Self-intersection normalizer
//!
//! A self-intersecting outline is cut into simple loops at its crossing
//! points. Loops are then classified with the even-odd rule: a loop nested
//! inside an odd number of other loops becomes a hole of the smallest loop
//! around it. The original holes are attached to the piece that contains them.
//! Contours may meet at isolated points; only crossings and stray holes are
//! repaired.

use crate::board::geometry::{
    contour_area2, contour_is_simple, dedup_contour, difference, point_in_contour,
    point_on_contour, segment_contact_point, segments_intersect, Point, PolygonOutline,
    MIN_CONTOUR_CORNERS,
};

use super::changes::ChangeSink;
use super::collection::ZoneBoard;
use super::types::ZoneId;

/// Split an outline into valid outlines covering the same area.
///
/// A valid input comes back as a single cleaned copy. Holes outside every
/// piece are dropped. The result is empty only for degenerate input: a
/// non-degenerate outline always keeps at least its outer contour.
pub fn normalize(outline: &PolygonOutline, max_split_steps: usize) -> Vec<PolygonOutline> {
    let mut cleaned = outline.clone();
    cleaned.remove_null_segments();

    if cleaned.outer().len() < MIN_CONTOUR_CORNERS {
        return Vec::new();
    }
    if cleaned.is_weakly_simple() {
        return vec![cleaned];
    }

    let mut budget = max_split_steps;
    let outer = cleaned.outer().to_vec();
    let mut pieces = if contour_is_simple(&outer) {
        // Simple but flat (all corners collinear) is degenerate
        if contour_area2(&outer) == 0 {
            return Vec::new();
        }
        vec![PolygonOutline::new(outer)]
    } else {
        assemble_pieces(split_into_simple_loops(outer, &mut budget))
    };

    let mut hole_loops = Vec::new();
    for hole in cleaned.holes() {
        hole_loops.extend(split_into_simple_loops(hole.clone(), &mut budget));
    }
    attach_holes(&mut pieces, hole_loops);

    let mut result = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece.is_weakly_simple() {
            result.push(piece);
            continue;
        }
        // A hole crosses its outer contour: cut the holes out explicitly
        let repaired = cut_holes(&piece);
        let total = repaired.len();
        let valid: Vec<PolygonOutline> =
            repaired.into_iter().filter(|p| p.is_weakly_simple()).collect();

        if valid.is_empty() {
            log::warn!(
                "[Normalize] Could not cut holes out of a piece with {} corners, \
                 keeping its outer contour",
                piece.corner_count()
            );
            result.push(PolygonOutline::new(piece.outer().to_vec()));
            continue;
        }
        if valid.len() < total {
            log::warn!(
                "[Normalize] Dropping {} repaired pieces that are still not valid",
                total - valid.len()
            );
        }
        result.extend(valid);
    }

    log::debug!(
        "[Normalize] Split outline with {} corners into {} pieces",
        outline.corner_count(),
        result.len()
    );
    result
}

/// First pair of non-adjacent edges sharing a point, with that point
fn find_crossing(contour: &[Point]) -> Option<(usize, usize, Point)> {
    let n = contour.len();
    for i in 0..n {
        let a1 = contour[i];
        let a2 = contour[(i + 1) % n];
        for j in (i + 2)..n {
            if i == 0 && j + 1 == n {
                continue;
            }
            let b1 = contour[j];
            let b2 = contour[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                let x = segment_contact_point(a1, a2, b1, b2)?;
                return Some((i, j, x));
            }
        }
    }
    None
}

/// Cut a closed contour into simple loops.
///
/// Each cut at a crossing between edges i and j yields the loop through
/// corner 0 and the loop between the two edges; both are strictly shorter, so
/// the process ends. The loop through the original first corner comes first.
fn split_into_simple_loops(contour: Vec<Point>, budget: &mut usize) -> Vec<Vec<Point>> {
    let mut done = Vec::new();
    let mut stack = vec![contour];

    while let Some(mut lp) = stack.pop() {
        dedup_contour(&mut lp);
        if lp.len() < MIN_CONTOUR_CORNERS {
            continue;
        }

        let Some((i, j, x)) = find_crossing(&lp) else {
            if contour_area2(&lp) != 0 {
                done.push(lp);
            }
            continue;
        };

        if *budget == 0 {
            log::warn!(
                "[Normalize] Split budget exhausted, dropping loop with {} corners",
                lp.len()
            );
            continue;
        }
        *budget -= 1;

        let mut through_start = Vec::with_capacity(lp.len() - (j - i) + 1);
        through_start.extend_from_slice(&lp[..=i]);
        through_start.push(x);
        through_start.extend_from_slice(&lp[j + 1..]);

        let mut between = Vec::with_capacity(j - i + 1);
        between.push(x);
        between.extend_from_slice(&lp[i + 1..=j]);

        stack.push(between);
        stack.push(through_start);
    }

    done
}

/// Some corner of `inner` that is not on `outer`'s boundary tells whether
/// `inner` lies inside `outer`
fn loop_inside(inner: &[Point], outer: &[Point]) -> bool {
    inner
        .iter()
        .find(|p| !point_on_contour(outer, **p))
        .map(|p| point_in_contour(outer, *p))
        .unwrap_or(false)
}

/// Group simple loops into outlines by even-odd nesting depth
fn assemble_pieces(loops: Vec<Vec<Point>>) -> Vec<PolygonOutline> {
    let depth: Vec<usize> = (0..loops.len())
        .map(|k| {
            (0..loops.len())
                .filter(|&m| m != k && loop_inside(&loops[k], &loops[m]))
                .count()
        })
        .collect();

    let mut pieces: Vec<(usize, PolygonOutline)> = Vec::new();
    for (k, lp) in loops.iter().enumerate() {
        if depth[k] % 2 == 0 {
            pieces.push((k, PolygonOutline::new(lp.clone())));
        }
    }

    for (k, lp) in loops.iter().enumerate() {
        if depth[k] % 2 == 0 {
            continue;
        }
        // Smallest even-depth loop around this one
        let owner = pieces
            .iter_mut()
            .filter(|(m, _)| loop_inside(lp, &loops[*m]))
            .min_by_key(|(m, _)| contour_area2(&loops[*m]).abs());
        if let Some((_, piece)) = owner {
            piece.push_contour(lp.clone());
        }
    }

    pieces.into_iter().map(|(_, piece)| piece).collect()
}

fn attach_holes(pieces: &mut [PolygonOutline], holes: Vec<Vec<Point>>) {
    for hole in holes {
        let owner = pieces
            .iter_mut()
            .filter(|piece| loop_inside(&hole, piece.outer()))
            .min_by_key(|piece| contour_area2(piece.outer()).abs());
        match owner {
            Some(piece) => piece.push_contour(hole),
            None => log::warn!(
                "[Normalize] Dropping hole with {} corners outside every piece",
                hole.len()
            ),
        }
    }
}

fn cut_holes(piece: &PolygonOutline) -> Vec<PolygonOutline> {
    let mut parts = vec![PolygonOutline::new(piece.outer().to_vec())];
    for hole in piece.holes() {
        let cutter = PolygonOutline::new(hole.clone());
        parts = parts.iter().flat_map(|p| difference(p, &cutter)).collect();
    }
    parts
}

/// Outcome of normalizing one zone on the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeResult {
    /// The zone still exists after normalization
    pub kept: bool,
    /// Zones created for the extra pieces, in board order
    pub created: Vec<ZoneId>,
}

/// Normalize a zone in place.
///
/// The first piece stays with the zone; each other piece becomes a new zone
/// with the same settings appended to the board. A zone with no valid piece
/// is removed. Creations and deletions are reported to `changes`, and every
/// surviving or new zone is marked modified.
pub fn normalize_zone(
    board: &mut ZoneBoard,
    id: ZoneId,
    max_split_steps: usize,
    changes: &mut dyn ChangeSink,
) -> NormalizeResult {
    let Some(zone) = board.get(id) else {
        return NormalizeResult::default();
    };
    let settings = zone.settings;
    let mut pieces = normalize(&zone.outline, max_split_steps).into_iter();

    let Some(first) = pieces.next() else {
        if let Some(removed) = board.remove(id) {
            log::warn!("[Normalize] Zone {} has no valid outline, removing it", id);
            changes.item_deleted(removed);
        }
        return NormalizeResult::default();
    };

    if let Some(zone) = board.get_mut(id) {
        if zone.outline != first {
            zone.outline = first;
            zone.fill = None;
        }
        zone.set_modified(true);
    }

    let mut created = Vec::new();
    for piece in pieces {
        let new_id = board.insert(settings, piece);
        if let Some(zone) = board.get_mut(new_id) {
            zone.set_modified(true);
        }
        log::debug!("[Normalize] Zone {} split off new zone {}", id, new_id);
        changes.item_added(new_id);
        created.push(new_id);
    }

    NormalizeResult { kept: true, created }
}
