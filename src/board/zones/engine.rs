//! Net-wide area reconciler
//!
//! After an outline edit the edited zone is normalized, then every pair of
//! merge-eligible zones on its net is scanned in board order. A merge changes
//! the collection, so the scan restarts from the top; it ends on the first
//! pass without a merge. Fills of non-copper zones on touched layers are then
//! rebuilt, and zones left with fewer than three outer corners are removed.

use serde::Serialize;

use crate::board::fill::{FillEngine, TessellatedFill};
use crate::board::geometry::{GeoSetOperations, SetOperations, MIN_CONTOUR_CORNERS};
use crate::config::EngineConfig;
use crate::error::{Result, ZoneError};

use super::changes::ChangeSink;
use super::collection::ZoneBoard;
use super::combine::combine_zones;
use super::intersect::intersects;
use super::normalize::normalize_zone;
use super::types::{can_merge, LayerId, Zone, ZoneId};

/// Summary of one reconcile run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Some zone outline changed or a zone was added or removed
    pub modified: bool,
    /// Number of pairwise merges
    pub merged: usize,
    /// Zones created by normalization splits
    pub created: Vec<ZoneId>,
    /// Zones removed, by merges or as degenerate
    pub removed: Vec<ZoneId>,
    /// The run stopped early at a net boundary
    pub cancelled: bool,
}

/// Change sink wrapper that keeps the report's id lists current
struct Recording<'a, 'b> {
    inner: &'a mut (dyn ChangeSink + 'b),
    report: &'a mut ReconcileReport,
}

impl ChangeSink for Recording<'_, '_> {
    fn item_added(&mut self, id: ZoneId) {
        self.report.created.push(id);
        self.report.modified = true;
        self.inner.item_added(id);
    }

    fn item_deleted(&mut self, zone: Zone) {
        self.report.removed.push(zone.id);
        self.report.modified = true;
        self.inner.item_deleted(zone);
    }
}

pub struct ZoneEngine {
    config: EngineConfig,
    set_ops: Box<dyn SetOperations>,
    fill: Box<dyn FillEngine>,
}

impl Default for ZoneEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ZoneEngine {
    /// Engine with the default `geo` set operations and earcut fills
    pub fn new(config: EngineConfig) -> Self {
        let fill = TessellatedFill {
            fillet_segments: config.fillet_segments,
        };
        Self::with_collaborators(config, Box::new(GeoSetOperations), Box::new(fill))
    }

    pub fn with_collaborators(
        config: EngineConfig,
        set_ops: Box<dyn SetOperations>,
        fill: Box<dyn FillEngine>,
    ) -> Self {
        Self { config, set_ops, fill }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn fill_engine(&self) -> &dyn FillEngine {
        self.fill.as_ref()
    }

    /// Reconcile after the outline of `id` was created or edited
    pub fn on_zone_modified(
        &self,
        board: &mut ZoneBoard,
        id: ZoneId,
        changes: &mut dyn ChangeSink,
    ) -> Result<ReconcileReport> {
        let net = board.zone(id)?.net();

        let mut report = ReconcileReport {
            modified: true,
            ..Default::default()
        };
        let mut sink = Recording {
            inner: changes,
            report: &mut report,
        };

        board.clear_modified();
        normalize_zone(board, id, self.config.max_split_steps, &mut sink);
        let merged = self.combine_all_areas_in_net(board, net, true, &mut sink);
        sink.report.merged += merged;

        self.refill_non_copper(board);
        self.remove_degenerate_zones(board, &mut sink);

        Ok(report)
    }

    /// Reconcile every zone on the board, e.g. after loading.
    ///
    /// Each zone is normalized, then every net is scanned with the
    /// modified-flag gating off. `should_cancel` is polled between nets.
    pub fn reconcile_board(
        &self,
        board: &mut ZoneBoard,
        changes: &mut dyn ChangeSink,
        should_cancel: &dyn Fn() -> bool,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut sink = Recording {
            inner: changes,
            report: &mut report,
        };

        board.clear_modified();
        for id in board.ids() {
            normalize_zone(board, id, self.config.max_split_steps, &mut sink);
        }
        // Normalization marks everything; only merges should count below
        board.clear_modified();

        for net in board.nets() {
            if should_cancel() {
                log::info!("[Reconcile] Cancelled before net {}", net);
                sink.report.cancelled = true;
                break;
            }
            let merged = self.combine_all_areas_in_net(board, net, false, &mut sink);
            sink.report.merged += merged;
        }

        if sink.report.merged > 0 {
            sink.report.modified = true;
        }

        self.refill_non_copper(board);
        self.remove_degenerate_zones(board, &mut sink);

        log::info!(
            "[Reconcile] Board reconciled: {} merges, {} created, {} removed",
            report.merged,
            report.created.len(),
            report.removed.len()
        );
        report
    }

    /// Merge intersecting zones on one net until a full pass merges nothing.
    ///
    /// With `use_modified` set, a pair is only tested when at least one of
    /// the two zones is marked modified. Returns the number of merges.
    pub fn combine_all_areas_in_net(
        &self,
        board: &mut ZoneBoard,
        net: i32,
        use_modified: bool,
        changes: &mut dyn ChangeSink,
    ) -> usize {
        let mut merged = 0;

        loop {
            let ids = board.ids_on_net(net);
            if ids.len() < 2 {
                break;
            }

            let candidates: Vec<(ZoneId, ZoneId)> =
                self.mergeable_pairs(board, &ids, use_modified).collect();
            let mut merged_this_pass = false;

            for (ref_id, other_id) in candidates {
                match combine_zones(
                    board,
                    ref_id,
                    other_id,
                    self.set_ops.as_ref(),
                    self.fill.as_ref(),
                    self.config.max_split_steps,
                    changes,
                ) {
                    Ok(true) => {
                        merged += 1;
                        merged_this_pass = true;
                        // The collection changed, restart the scan
                        break;
                    }
                    Ok(false) => {}
                    Err(e) => log::error!("[Reconcile] Combine failed: {}", e),
                }
            }

            if !merged_this_pass {
                break;
            }
        }

        merged
    }

    /// Eligible intersecting pairs (i < j) in scan order
    fn mergeable_pairs<'a>(
        &'a self,
        board: &'a ZoneBoard,
        ids: &'a [ZoneId],
        use_modified: bool,
    ) -> impl Iterator<Item = (ZoneId, ZoneId)> + 'a {
        (0..ids.len()).flat_map(move |i| {
            ((i + 1)..ids.len()).filter_map(move |j| {
                let a = board.get(ids[i])?;
                let b = board.get(ids[j])?;
                if !can_merge(&a.settings, &b.settings) {
                    return None;
                }
                if use_modified && !a.is_modified() && !b.is_modified() {
                    return None;
                }
                let overlap = match (a.bounding_box(), b.bounding_box()) {
                    (Some(ba), Some(bb)) => ba.overlaps(&bb),
                    _ => false,
                };
                (overlap && intersects(a, b)).then_some((a.id, b.id))
            })
        })
    }

    /// Rebuild fills of non-copper zones on layers holding a modified zone
    fn refill_non_copper(&self, board: &mut ZoneBoard) {
        let mut layers: Vec<LayerId> = board
            .iter()
            .filter(|z| z.is_modified() && !z.layer().is_copper())
            .map(|z| z.layer())
            .collect();
        layers.sort_unstable();
        layers.dedup();

        if layers.is_empty() {
            return;
        }
        for zone in board.iter_mut() {
            if layers.contains(&zone.layer()) {
                self.fill.rebuild_fill(zone);
            }
        }
    }

    /// Remove every zone whose outer contour has fewer than three corners
    pub fn remove_degenerate_zones(
        &self,
        board: &mut ZoneBoard,
        changes: &mut dyn ChangeSink,
    ) -> usize {
        let degenerate: Vec<ZoneId> = board
            .iter()
            .filter(|z| z.outer_corner_count() < MIN_CONTOUR_CORNERS)
            .map(|z| z.id)
            .collect();

        for id in &degenerate {
            if let Some(zone) = board.remove(*id) {
                log::warn!(
                    "[Reconcile] Removing zone {} with {} outer corners",
                    id,
                    zone.outer_corner_count()
                );
                changes.item_deleted(zone);
            }
        }
        degenerate.len()
    }

    /// Remove a zone at the user's request
    pub fn delete_zone(
        &self,
        board: &mut ZoneBoard,
        id: ZoneId,
        changes: &mut dyn ChangeSink,
    ) -> Result<()> {
        let zone = board.remove(id).ok_or(ZoneError::UnknownZone(id))?;
        changes.item_deleted(zone);
        Ok(())
    }
}
