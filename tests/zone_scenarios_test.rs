// End-to-end zone engine scenarios and geometric properties
use zone_engine::board::drc::{run_zone_drc, DrcViolation, ViolationKind};
use zone_engine::board::geometry::{clearance_between_segments, Point, PolygonOutline};
use zone_engine::board::zones::{
    can_merge, intersects, normalize, normalize_zone, outlines_intersect, LayerId, NoChanges, Zone,
    ZoneBoard, ZoneChange, ZoneEditRequest, ZoneEngine, ZoneSettings,
};
use zone_engine::config::EngineConfig;
use zone_engine::error::ZoneError;

fn p(x: i64, y: i64) -> Point {
    Point::new(x, y)
}

fn settings(net: i32) -> ZoneSettings {
    ZoneSettings::new(net, LayerId(0))
}

fn reconcile(board: &mut ZoneBoard) -> Vec<ZoneChange> {
    let mut changes: Vec<ZoneChange> = Vec::new();
    ZoneEngine::default().reconcile_board(board, &mut changes, &|| false);
    changes
}

#[test]
fn test_disjoint_rectangles_stay_apart() {
    let mut board = ZoneBoard::new();
    let a = board.insert(settings(1), PolygonOutline::rectangle(0, 0, 100, 100));
    let b = board.insert(settings(1), PolygonOutline::rectangle(200, 0, 300, 100));

    assert!(!intersects(board.get(a).unwrap(), board.get(b).unwrap()));

    let changes = reconcile(&mut board);
    assert_eq!(board.len(), 2);
    assert!(changes.is_empty());
}

#[test]
fn test_overlapping_rectangles_merge() {
    let mut board = ZoneBoard::new();
    let a = board.insert(settings(1), PolygonOutline::rectangle(0, 0, 100, 100));
    let b = board.insert(settings(1), PolygonOutline::rectangle(50, 50, 150, 150));
    let expected = board
        .get(a)
        .unwrap()
        .bounding_box()
        .unwrap()
        .union(&board.get(b).unwrap().bounding_box().unwrap());

    let changes = reconcile(&mut board);

    assert_eq!(board.len(), 1);
    let survivor = board.get(a).expect("first zone survives the merge");
    assert_eq!(survivor.bounding_box(), Some(expected));
    // Union area: two squares minus their 50x50 overlap
    assert!((survivor.outline.area() - 17_500.0).abs() < 1e-9);
    assert!(matches!(&changes[..], [ZoneChange::Deleted(z)] if z.id == b));
}

#[test]
fn test_figure_eight_splits_into_two_zones() {
    let bowtie = PolygonOutline::new(vec![p(0, 0), p(200, 100), p(200, 0), p(0, 100)]);
    assert!(bowtie.is_self_intersecting());

    let pieces = normalize(&bowtie, 10_000);
    assert_eq!(pieces.len(), 2);
    assert!(pieces.iter().all(|piece| !piece.is_self_intersecting()));

    let mut board = ZoneBoard::new();
    let id = board.insert(settings(1), bowtie);
    let mut changes: Vec<ZoneChange> = Vec::new();
    let result = normalize_zone(&mut board, id, 10_000, &mut changes);

    assert!(result.kept);
    assert_eq!(result.created.len(), 1);
    assert_eq!(board.len(), 2);
    assert_eq!(changes, vec![ZoneChange::Added(result.created[0])]);
}

#[test]
fn test_cascading_merge_through_middle_zone() {
    let mut board = ZoneBoard::new();
    let a = board.insert(settings(1), PolygonOutline::rectangle(0, 0, 100, 100));
    let b = board.insert(settings(1), PolygonOutline::rectangle(80, 0, 180, 100));
    let c = board.insert(settings(1), PolygonOutline::rectangle(160, 0, 260, 100));

    assert!(!intersects(board.get(a).unwrap(), board.get(c).unwrap()));

    let mut changes: Vec<ZoneChange> = Vec::new();
    let report = ZoneEngine::default().reconcile_board(&mut board, &mut changes, &|| false);

    assert_eq!(board.len(), 1);
    assert_eq!(report.merged, 2);
    let survivor = board.iter().next().unwrap();
    assert_eq!(survivor.bounding_box().unwrap().as_array(), [0, 0, 260, 100]);
    assert!((survivor.outline.area() - 26_000.0).abs() < 1e-9);
}

#[test]
fn test_foreign_zones_five_units_apart() {
    let mut board = ZoneBoard::new();
    board.insert(settings(1).with_clearance(10), PolygonOutline::rectangle(0, 0, 100, 100));
    board.insert(settings(2).with_clearance(10), PolygonOutline::rectangle(105, 0, 205, 100));

    let mut violations: Vec<DrcViolation> = Vec::new();
    let count = run_zone_drc(&board, &EngineConfig::default(), &mut violations);

    assert_eq!(count, 1);
    assert_eq!(violations[0].kind, ViolationKind::ZonesTooClose);
    assert!((violations[0].distance - 5.0).abs() < 1e-9);
    assert_eq!(violations[0].clearance, 10);
}

#[test]
fn test_keepouts_use_minimum_clearance() {
    let keepout = |net| ZoneSettings {
        keepout: true,
        ..settings(net).with_clearance(10)
    };

    // Five units apart: too close for copper, fine for keepouts
    let mut board = ZoneBoard::new();
    board.insert(keepout(1), PolygonOutline::rectangle(0, 0, 100, 100));
    board.insert(keepout(2), PolygonOutline::rectangle(105, 0, 205, 100));
    let mut violations: Vec<DrcViolation> = Vec::new();
    assert_eq!(run_zone_drc(&board, &EngineConfig::default(), &mut violations), 0);
    assert!(violations.is_empty());

    // Sharing an edge is still a violation, reported against clearance 1
    let mut board = ZoneBoard::new();
    board.insert(keepout(1), PolygonOutline::rectangle(0, 0, 100, 100));
    board.insert(keepout(2), PolygonOutline::rectangle(100, 0, 200, 100));
    let mut violations: Vec<DrcViolation> = Vec::new();
    let count = run_zone_drc(&board, &EngineConfig::default(), &mut violations);

    assert!(count > 0);
    assert_eq!(count, violations.len());
    assert!(violations.iter().all(|v| v.clearance == 1));
    assert!(violations.iter().any(|v| v.kind == ViolationKind::ZonesTooClose));
}

#[test]
fn test_two_corner_edit_is_rejected() {
    let mut board = ZoneBoard::new();
    let id = board.insert(settings(1), PolygonOutline::rectangle(0, 0, 100, 100));
    let before: Vec<Zone> = board.iter().cloned().collect();

    let request = ZoneEditRequest {
        zone_id: Some(id),
        outline: vec![p(0, 0), p(100, 0)],
        holes: Vec::new(),
        net: 1,
        layer: LayerId(0),
        priority: 0,
        keepout: false,
        clearance: None,
        smoothing: Default::default(),
    };
    let result = ZoneEngine::default().apply_edit(&mut board, &request, &mut NoChanges);

    assert_eq!(result, Err(ZoneError::TooFewCorners { count: 2 }));
    let after: Vec<Zone> = board.iter().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn test_normalization_is_idempotent() {
    let outlines = [
        PolygonOutline::rectangle(0, 0, 100, 100),
        PolygonOutline::new(vec![p(0, 0), p(200, 100), p(200, 0), p(0, 100)]),
        PolygonOutline::with_holes(
            vec![p(0, 0), p(300, 0), p(300, 300), p(0, 300)],
            vec![vec![p(100, 100), p(200, 100), p(200, 200), p(100, 200)]],
        ),
    ];

    for outline in &outlines {
        for piece in normalize(outline, 10_000) {
            assert_eq!(normalize(&piece, 10_000), vec![piece.clone()]);
        }
    }
}

#[test]
fn test_normalization_conserves_area() {
    let bowtie = PolygonOutline::new(vec![p(0, 0), p(200, 100), p(200, 0), p(0, 100)]);
    let total: f64 = normalize(&bowtie, 10_000).iter().map(|piece| piece.area()).sum();
    // Two triangles of base 100 and height 100
    assert!((total - 10_000.0).abs() < 1e-9);

    let square = PolygonOutline::rectangle(0, 0, 100, 100);
    let total: f64 = normalize(&square, 10_000).iter().map(|piece| piece.area()).sum();
    assert!((total - square.area()).abs() < 1e-9);

    let framed = PolygonOutline::with_holes(
        vec![p(0, 0), p(300, 0), p(300, 300), p(0, 300)],
        vec![
            vec![p(20, 20), p(120, 20), p(120, 120), p(20, 120)],
            vec![p(150, 150), p(250, 150), p(250, 250), p(150, 250)],
        ],
    );
    let total: f64 = normalize(&framed, 10_000).iter().map(|piece| piece.area()).sum();
    assert!((total - 70_000.0).abs() < 1e-9);
}

#[test]
fn test_loop_in_loop_conserves_covered_area() {
    // The inner loop is traced through a slit; the ring between the loops
    // is copper and the inner 40x60 window is not
    let outline = PolygonOutline::new(vec![
        p(0, 0),
        p(100, 0),
        p(100, 100),
        p(50, 100),
        p(50, 20),
        p(30, 20),
        p(30, 80),
        p(70, 80),
        p(70, 20),
        p(50, 20),
        p(50, 100),
        p(0, 100),
    ]);
    let pieces = normalize(&outline, 10_000);
    let total: f64 = pieces.iter().map(|piece| piece.area()).sum();

    assert!((total - 7_600.0).abs() < 1e-9);
    assert!(pieces.iter().all(|piece| piece.is_weakly_simple()));
    assert!(pieces.iter().all(|piece| !piece.point_inside(p(40, 50))));
}

#[test]
fn test_corner_touching_zones_survive_reconcile() {
    let mut board = ZoneBoard::new();
    let a = board.insert(settings(1), PolygonOutline::rectangle(0, 0, 100, 100));
    let b = board.insert(settings(1), PolygonOutline::rectangle(100, 100, 200, 200));

    let changes = reconcile(&mut board);

    assert_eq!(board.len(), 2);
    assert!(changes.is_empty());
    assert_eq!(board.get(a).unwrap().outline.area(), 10_000.0);
    assert_eq!(board.get(b).unwrap().outline.area(), 10_000.0);
}

#[test]
fn test_stray_hole_is_dropped_on_edit() {
    let mut board = ZoneBoard::new();
    let id = board.insert(
        settings(1),
        PolygonOutline::with_holes(
            vec![p(0, 0), p(100, 0), p(100, 100), p(0, 100)],
            vec![vec![p(200, 200), p(300, 200), p(300, 300), p(200, 300)]],
        ),
    );

    let mut changes: Vec<ZoneChange> = Vec::new();
    ZoneEngine::default()
        .on_zone_modified(&mut board, id, &mut changes)
        .unwrap();

    assert_eq!(board.len(), 1);
    let zone = board.get(id).unwrap();
    assert_eq!(zone.outline, PolygonOutline::rectangle(0, 0, 100, 100));
    assert!(changes.is_empty());
}

#[test]
fn test_hole_touching_outline_keeps_zone() {
    let mut board = ZoneBoard::new();
    let outline = PolygonOutline::with_holes(
        vec![p(0, 0), p(100, 0), p(100, 100), p(0, 100)],
        vec![vec![p(100, 50), p(60, 40), p(60, 60)]],
    );
    let id = board.insert(settings(1), outline.clone());

    let mut changes: Vec<ZoneChange> = Vec::new();
    ZoneEngine::default()
        .on_zone_modified(&mut board, id, &mut changes)
        .unwrap();

    assert_eq!(board.len(), 1);
    assert_eq!(board.get(id).unwrap().outline, outline);
    assert!(changes.is_empty());
}

#[test]
fn test_intersects_is_symmetric() {
    let outlines = [
        PolygonOutline::rectangle(0, 0, 100, 100),
        PolygonOutline::rectangle(50, 50, 150, 150),
        PolygonOutline::rectangle(100, 0, 200, 100),
        PolygonOutline::rectangle(20, 20, 40, 40),
        PolygonOutline::rectangle(500, 500, 600, 600),
        PolygonOutline::new(vec![p(0, 0), p(300, 150), p(0, 300)]),
    ];

    for a in &outlines {
        for b in &outlines {
            assert_eq!(outlines_intersect(a, b), outlines_intersect(b, a));
        }
    }
}

#[test]
fn test_disjoint_bounding_boxes_never_intersect() {
    let outlines = [
        PolygonOutline::rectangle(0, 0, 100, 100),
        PolygonOutline::rectangle(101, 0, 200, 100),
        PolygonOutline::rectangle(0, 101, 100, 200),
        PolygonOutline::new(vec![p(300, 300), p(400, 350), p(300, 400)]),
    ];

    for a in &outlines {
        for b in &outlines {
            let (box_a, box_b) = (a.bounding_box().unwrap(), b.bounding_box().unwrap());
            if !box_a.overlaps(&box_b) {
                assert!(!outlines_intersect(a, b));
            }
        }
    }
}

#[test]
fn test_reconciled_board_has_no_mergeable_overlaps() {
    let mut board = ZoneBoard::new();
    board.insert(settings(1), PolygonOutline::rectangle(0, 0, 100, 100));
    board.insert(settings(2), PolygonOutline::rectangle(50, 0, 150, 100));
    board.insert(settings(1), PolygonOutline::rectangle(90, 90, 200, 200));
    board.insert(settings(1), PolygonOutline::rectangle(300, 300, 400, 400));
    board.insert(settings(1).with_priority(2), PolygonOutline::rectangle(10, 10, 60, 60));
    board.insert(settings(1), PolygonOutline::rectangle(350, 350, 450, 450));

    reconcile(&mut board);

    let zones: Vec<&Zone> = board.iter().collect();
    for (i, a) in zones.iter().enumerate() {
        for b in &zones[i + 1..] {
            if can_merge(&a.settings, &b.settings) {
                assert!(!intersects(a, b), "zones {} and {} still overlap", a.id, b.id);
            }
        }
    }
    // Net 1 priority 0 leaves two islands; net 2 and the priority 2 zone stay
    assert_eq!(board.len(), 4);
}

#[test]
fn test_segment_clearance_is_symmetric() {
    let segments = [
        (p(0, 0), p(100, 0)),
        (p(0, 10), p(100, 10)),
        (p(50, -50), p(50, 50)),
        (p(200, 200), p(300, 250)),
        (p(100, 5), p(120, 5)),
    ];

    for &(a1, a2) in &segments {
        for &(b1, b2) in &segments {
            let ab = clearance_between_segments(a1, a2, 0, b1, b2, 0, 1_000);
            let ba = clearance_between_segments(b1, b2, 0, a1, a2, 0, 1_000);
            assert!((ab.distance - ba.distance).abs() < 1e-9);
        }
    }

    // Crossing segments have no clearance at all
    let crossing = clearance_between_segments(p(0, 0), p(100, 0), 0, p(50, -50), p(50, 50), 0, 10);
    assert_eq!(crossing.distance, 0.0);
    assert_eq!(crossing.nearest, p(50, 0));
}
