//! Segment primitives for zone geometry
//!
//! Intersection tests are exact on integer coordinates (orientation signs are
//! computed in `i128`). Distances are computed in `f64` and are always finite,
//! including for zero-length segments.
//!
//! Touch policy: segments that share a single point (an endpoint on the other
//! segment, or two equal endpoints) intersect.

use super::types::Point;

/// Result of a clearance query between two segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentClearance {
    /// Edge-to-edge distance (center distance minus half widths, never negative).
    /// When the early exit fires this is a lower bound that exceeds the threshold.
    pub distance: f64,
    /// Location of the closest approach
    pub nearest: Point,
}

/// Twice the signed area of triangle (a, b, c); positive when counter-clockwise
pub fn orientation(a: Point, b: Point, c: Point) -> i128 {
    let abx = b.x as i128 - a.x as i128;
    let aby = b.y as i128 - a.y as i128;
    let acx = c.x as i128 - a.x as i128;
    let acy = c.y as i128 - a.y as i128;
    abx * acy - aby * acx
}

/// `p` is assumed collinear with a-b
fn within_segment_box(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True when `p` lies on the closed segment a-b
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    orientation(a, b, p) == 0 && within_segment_box(a, b, p)
}

/// Exact test for two closed segments sharing at least one point
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    // Cheap box reject first
    if a1.x.max(a2.x) < b1.x.min(b2.x)
        || b1.x.max(b2.x) < a1.x.min(a2.x)
        || a1.y.max(a2.y) < b1.y.min(b2.y)
        || b1.y.max(b2.y) < a1.y.min(a2.y)
    {
        return false;
    }

    let d1 = orientation(b1, b2, a1).signum();
    let d2 = orientation(b1, b2, a2).signum();
    let d3 = orientation(a1, a2, b1).signum();
    let d4 = orientation(a1, a2, b2).signum();

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }

    (d1 == 0 && within_segment_box(b1, b2, a1))
        || (d2 == 0 && within_segment_box(b1, b2, a2))
        || (d3 == 0 && within_segment_box(a1, a2, b1))
        || (d4 == 0 && within_segment_box(a1, a2, b2))
}

/// Exact test for two segments crossing at a single point interior to both.
/// Touching and collinear overlap do not count.
pub fn segments_cross(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1).signum();
    let d2 = orientation(b1, b2, a2).signum();
    let d3 = orientation(a1, a2, b1).signum();
    let d4 = orientation(a1, a2, b2).signum();
    d1 * d2 < 0 && d3 * d4 < 0
}

/// Integer division rounded to nearest, halves away from zero
fn div_round(n: i128, d: i128) -> i128 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    if n >= 0 {
        (2 * n + d) / (2 * d)
    } else {
        -((-2 * n + d) / (2 * d))
    }
}

/// A common point of two segments, rounded to the integer grid.
///
/// For crossing segments this is the crossing point. For touching or
/// collinear-overlapping segments it is one of the shared endpoints.
pub fn segment_contact_point(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    if !segments_intersect(a1, a2, b1, b2) {
        return None;
    }

    // Shared or touching endpoints are exact, prefer them
    for (p, s1, s2) in [(a1, b1, b2), (a2, b1, b2), (b1, a1, a2), (b2, a1, a2)] {
        if point_on_segment(p, s1, s2) {
            return Some(p);
        }
    }

    let rx = a2.x as i128 - a1.x as i128;
    let ry = a2.y as i128 - a1.y as i128;
    let sx = b2.x as i128 - b1.x as i128;
    let sy = b2.y as i128 - b1.y as i128;
    let denom = rx * sy - ry * sx;
    if denom == 0 {
        // Collinear overlap always has an endpoint on the other segment
        return None;
    }

    let qpx = b1.x as i128 - a1.x as i128;
    let qpy = b1.y as i128 - a1.y as i128;
    let t_num = qpx * sy - qpy * sx;

    match (t_num.checked_mul(rx), t_num.checked_mul(ry)) {
        (Some(nx), Some(ny)) => Some(Point::new(
            (a1.x as i128 + div_round(nx, denom)) as i64,
            (a1.y as i128 + div_round(ny, denom)) as i64,
        )),
        _ => {
            // Coordinates far outside board range; fall back to floating point
            let t = t_num as f64 / denom as f64;
            Some(Point::from_f64([
                a1.x as f64 + t * rx as f64,
                a1.y as f64 + t * ry as f64,
            ]))
        }
    }
}

/// Point-to-segment minimum distance and the closest point on the segment
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> (f64, [f64; 2]) {
    let [px, py] = p.as_f64();
    let [ax, ay] = a.as_f64();
    let ab = [b.x as f64 - ax, b.y as f64 - ay];
    let ap = [px - ax, py - ay];
    let ab_len2 = ab[0] * ab[0] + ab[1] * ab[1];

    if ab_len2 == 0.0 {
        // Degenerate segment
        let d = (ap[0] * ap[0] + ap[1] * ap[1]).sqrt();
        return (d, [ax, ay]);
    }

    let t = ((ap[0] * ab[0] + ap[1] * ab[1]) / ab_len2).clamp(0.0, 1.0);
    let closest = [ax + t * ab[0], ay + t * ab[1]];
    let d = ((px - closest[0]).powi(2) + (py - closest[1]).powi(2)).sqrt();

    (d, closest)
}

/// Segment-to-segment minimum center distance for non-intersecting segments
pub fn segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> (f64, [f64; 2]) {
    let mut min_d = f64::MAX;
    let mut closest = [0.0f64; 2];

    for (p, s1, s2) in [(a1, b1, b2), (a2, b1, b2), (b1, a1, a2), (b2, a1, a2)] {
        let (d, on_seg) = point_segment_distance(p, s1, s2);
        if d < min_d {
            min_d = d;
            closest = midpoint(p.as_f64(), on_seg);
        }
    }

    (min_d, closest)
}

/// Midpoint of two points
pub fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// Clearance between two thick segments.
///
/// Widths are full track widths; a zone edge has width 0. Once the bounding
/// boxes alone prove the distance exceeds `max_clearance`, the box gap is
/// returned instead of the exact distance.
pub fn clearance_between_segments(
    a1: Point,
    a2: Point,
    width_a: i64,
    b1: Point,
    b2: Point,
    width_b: i64,
    max_clearance: i64,
) -> SegmentClearance {
    let half_widths = (width_a.max(0) + width_b.max(0)) as f64 / 2.0;

    let gap_x = (a1.x.min(a2.x).max(b1.x.min(b2.x)) as i128
        - a1.x.max(a2.x).min(b1.x.max(b2.x)) as i128)
        .max(0);
    let gap_y = (a1.y.min(a2.y).max(b1.y.min(b2.y)) as i128
        - a1.y.max(a2.y).min(b1.y.max(b2.y)) as i128)
        .max(0);
    let lower_bound = gap_x.max(gap_y) as f64 - half_widths;
    if lower_bound > max_clearance as f64 {
        return SegmentClearance {
            distance: lower_bound,
            nearest: Point::from_f64(midpoint(a1.as_f64(), b1.as_f64())),
        };
    }

    if let Some(contact) = segment_contact_point(a1, a2, b1, b2) {
        return SegmentClearance { distance: 0.0, nearest: contact };
    }

    let (d, closest) = segment_distance(a1, a2, b1, b2);
    SegmentClearance {
        distance: (d - half_widths).max(0.0),
        nearest: Point::from_f64(closest),
    }
}
