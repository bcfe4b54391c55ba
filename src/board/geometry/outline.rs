//! Polygon outline: an outer contour plus hole contours
//!
//! Contours are stored as a sequence of point sequences. Each contour is
//! logically closed (the last corner connects back to the first). Corners can
//! also be addressed by a flat index running across all contours in order,
//! which is how edit tools and DRC markers refer to them.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::segments::{
    clearance_between_segments, point_on_segment, point_segment_distance, segments_cross,
    segments_intersect,
};
use super::types::{BoundingBox, Point};

/// Minimum corner count of a valid contour
pub const MIN_CONTOUR_CORNERS: usize = 3;

/// A polygon with holes. Contour 0 is the outer boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolygonOutline {
    contours: Vec<Vec<Point>>,
}

impl PolygonOutline {
    /// Outline with a single outer contour
    pub fn new(outer: Vec<Point>) -> Self {
        Self { contours: vec![outer] }
    }

    pub fn with_holes(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let mut contours = Vec::with_capacity(holes.len() + 1);
        contours.push(outer);
        contours.extend(holes);
        Self { contours }
    }

    pub fn from_contours(contours: Vec<Vec<Point>>) -> Self {
        Self { contours }
    }

    /// Axis-aligned rectangle, counter-clockwise from the min corner
    pub fn rectangle(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self::new(vec![
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|c| c.is_empty())
    }

    pub fn outer(&self) -> &[Point] {
        self.contours.first().map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn holes(&self) -> &[Vec<Point>] {
        if self.contours.len() > 1 {
            &self.contours[1..]
        } else {
            &[]
        }
    }

    pub fn contours(&self) -> &[Vec<Point>] {
        &self.contours
    }

    pub fn contour(&self, icont: usize) -> &[Point] {
        self.contours.get(icont).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn into_contours(self) -> Vec<Vec<Point>> {
        self.contours
    }

    /// Total corner count across all contours
    pub fn corner_count(&self) -> usize {
        self.contours.iter().map(|c| c.len()).sum()
    }

    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Flat index of the first corner of a contour
    pub fn contour_start(&self, icont: usize) -> usize {
        self.contours[..icont.min(self.contours.len())]
            .iter()
            .map(|c| c.len())
            .sum()
    }

    /// Flat index of the last corner of a contour
    pub fn contour_end(&self, icont: usize) -> usize {
        let start = self.contour_start(icont);
        start + self.contour(icont).len().saturating_sub(1)
    }

    pub fn contour_range(&self, icont: usize) -> RangeInclusive<usize> {
        self.contour_start(icont)..=self.contour_end(icont)
    }

    /// Contour holding the corner at a flat index
    pub fn contour_of(&self, corner: usize) -> Option<usize> {
        let mut start = 0;
        for (icont, contour) in self.contours.iter().enumerate() {
            if corner < start + contour.len() {
                return Some(icont);
            }
            start += contour.len();
        }
        None
    }

    /// Corner by flat index
    pub fn corner(&self, corner: usize) -> Option<Point> {
        let icont = self.contour_of(corner)?;
        let start = self.contour_start(icont);
        Some(self.contours[icont][corner - start])
    }

    /// Edge starting at a flat corner index, wrapping to its contour start
    pub fn edge_at(&self, corner: usize) -> Option<(Point, Point)> {
        let icont = self.contour_of(corner)?;
        let contour = &self.contours[icont];
        let local = corner - self.contour_start(icont);
        Some((contour[local], contour[(local + 1) % contour.len()]))
    }

    pub fn is_hole(&self, icont: usize) -> bool {
        icont > 0
    }

    /// Begin a new contour at `p`
    pub fn start_contour(&mut self, p: Point) {
        self.contours.push(vec![p]);
    }

    /// Add a corner to the last contour, starting one if there is none
    pub fn append_corner(&mut self, p: Point) {
        match self.contours.last_mut() {
            Some(contour) => contour.push(p),
            None => self.contours.push(vec![p]),
        }
    }

    pub fn push_contour(&mut self, contour: Vec<Point>) {
        self.contours.push(contour);
    }

    pub fn clear(&mut self) {
        self.contours.clear();
    }

    /// Bounds over every corner of every contour
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.contours.iter().flatten())
    }

    pub fn contour_bounding_box(&self, icont: usize) -> Option<BoundingBox> {
        BoundingBox::from_points(self.contour(icont))
    }

    /// Closed edges of one contour
    pub fn contour_edges(&self, icont: usize) -> impl Iterator<Item = (Point, Point)> + '_ {
        contour_edges(self.contour(icont))
    }

    /// Closed edges of all contours
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.contours.iter().flat_map(|c| contour_edges(c))
    }

    /// Even-odd point test over all contours: inside the outer contour and
    /// outside every hole. Points exactly on an edge may go either way.
    pub fn point_inside(&self, p: Point) -> bool {
        let mut inside = false;
        for contour in &self.contours {
            if point_in_contour(contour, p) {
                inside = !inside;
            }
        }
        inside
    }

    /// True when any two non-adjacent edges share a point, within a contour
    /// or across contours
    pub fn is_self_intersecting(&self) -> bool {
        let boxes: Vec<Option<BoundingBox>> = (0..self.contours.len())
            .map(|i| self.contour_bounding_box(i))
            .collect();

        for (ic1, c1) in self.contours.iter().enumerate() {
            let n1 = c1.len();
            if n1 < 2 {
                continue;
            }
            for ic2 in ic1..self.contours.len() {
                match (boxes[ic1], boxes[ic2]) {
                    (Some(b1), Some(b2)) if b1.overlaps(&b2) => {}
                    _ => continue,
                }
                let c2 = &self.contours[ic2];
                let n2 = c2.len();
                if n2 < 2 {
                    continue;
                }

                for i in 0..n1 {
                    let first = if ic1 == ic2 { i + 1 } else { 0 };
                    for j in first..n2 {
                        if ic1 == ic2 && edges_adjacent(i, j, n1) {
                            continue;
                        }
                        if segments_intersect(c1[i], c1[(i + 1) % n1], c2[j], c2[(j + 1) % n2]) {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    /// True when the outline is a valid polygon with holes, allowing contours
    /// to meet at isolated points.
    ///
    /// Every contour must be simple with a non-zero area. Edges of different
    /// contours may touch but never cross, each hole lies within the outer
    /// contour, and no hole reaches into another. A hole meeting the outer
    /// contour at one corner passes; `is_self_intersecting` rejects it.
    pub fn is_weakly_simple(&self) -> bool {
        if self.contours.is_empty() {
            return false;
        }
        if self
            .contours
            .iter()
            .any(|c| {
                c.len() < MIN_CONTOUR_CORNERS || contour_area2(c) == 0 || !contour_is_simple(c)
            })
        {
            return false;
        }

        let outer = self.outer();
        let holes = self.holes();
        for (ih, hole) in holes.iter().enumerate() {
            if contours_cross(hole, outer) || !contour_within(hole, outer) {
                return false;
            }
            for other in &holes[ih + 1..] {
                if contours_cross(hole, other)
                    || contour_enters(hole, other)
                    || contour_enters(other, hole)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Net area: outer contour minus holes
    pub fn area(&self) -> f64 {
        let mut area2: i128 = 0;
        for (icont, contour) in self.contours.iter().enumerate() {
            let a = contour_area2(contour).abs();
            if icont == 0 {
                area2 += a;
            } else {
                area2 -= a;
            }
        }
        area2 as f64 / 2.0
    }

    /// Drop corners equal to their predecessor (the first corner counts as
    /// the successor of the last). Returns the number of removed corners.
    pub fn remove_null_segments(&mut self) -> usize {
        self.contours.iter_mut().map(|c| dedup_contour(c)).sum()
    }

    /// Distance from a point to the outline; 0 when the point is inside
    pub fn distance_to_point(&self, p: Point) -> f64 {
        if self.point_inside(p) {
            return 0.0;
        }

        let mut distance = f64::MAX;
        for (a, b) in self.edges() {
            let (d, _) = point_segment_distance(p, a, b);
            distance = distance.min(d);
            if distance <= 0.0 {
                return 0.0;
            }
        }
        distance
    }

    /// Distance from a thick segment to the outline; 0 when it touches or
    /// lies inside
    pub fn distance_to_segment(&self, start: Point, end: Point, width: i64) -> f64 {
        // A segment wholly inside crosses no edge, so test one end first
        if self.point_inside(start) {
            return 0.0;
        }

        let mut distance = f64::MAX;
        for (a, b) in self.edges() {
            let c = clearance_between_segments(a, b, 0, start, end, width, i64::MAX);
            distance = distance.min(c.distance);
            if distance <= 0.0 {
                return 0.0;
            }
        }
        distance
    }
}

/// Edges i and j (i < j) of an n-corner closed contour share a corner
fn edges_adjacent(i: usize, j: usize, n: usize) -> bool {
    j == i + 1 || (i == 0 && j + 1 == n)
}

/// Closed edges of a contour given as a point slice
pub fn contour_edges(contour: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = contour.len();
    (0..n).map(move |i| (contour[i], contour[(i + 1) % n]))
}

/// Twice the signed area of a contour; positive when counter-clockwise
pub fn contour_area2(contour: &[Point]) -> i128 {
    let n = contour.len();
    if n < 3 {
        return 0;
    }
    let mut sum: i128 = 0;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
    }
    sum
}

/// Ray-crossing test of a point against a single closed contour.
/// Exact while the point and corners lie within `COORD_LIMIT`.
pub fn point_in_contour(contour: &[Point], p: Point) -> bool {
    let n = contour.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = contour[i];
        let b = contour[j];
        if (a.y > p.y) != (b.y > p.y) {
            // Compare p.x with the edge's x at p.y without dividing
            let lhs = (p.x as i128 - a.x as i128) * (b.y as i128 - a.y as i128);
            let rhs = (p.y as i128 - a.y as i128) * (b.x as i128 - a.x as i128);
            let left_of_edge = if b.y > a.y { lhs < rhs } else { lhs > rhs };
            if left_of_edge {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True when a point lies on one of the contour's edges
pub fn point_on_contour(contour: &[Point], p: Point) -> bool {
    contour_edges(contour).any(|(a, b)| point_on_segment(p, a, b))
}

/// Remove consecutive duplicate corners, including a closing duplicate
pub fn dedup_contour(contour: &mut Vec<Point>) -> usize {
    let before = contour.len();
    contour.dedup();
    while contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    before - contour.len()
}

/// True when no two non-adjacent edges of a closed contour share a point
pub fn contour_is_simple(contour: &[Point]) -> bool {
    let n = contour.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if edges_adjacent(i, j, n) {
                continue;
            }
            if segments_intersect(
                contour[i],
                contour[(i + 1) % n],
                contour[j],
                contour[(j + 1) % n],
            ) {
                return false;
            }
        }
    }
    true
}

/// Some edge of `a` crosses some edge of `b` at a point interior to both
fn contours_cross(a: &[Point], b: &[Point]) -> bool {
    contour_edges(a).any(|(a1, a2)| contour_edges(b).any(|(b1, b2)| segments_cross(a1, a2, b1, b2)))
}

fn doubled(contour: &[Point]) -> Vec<Point> {
    contour.iter().map(|p| Point::new(p.x * 2, p.y * 2)).collect()
}

/// Sample points along `a` in doubled coordinates: its corners, plus the
/// midpoint of every stretch of its edges between corners of `a` or `b`.
///
/// Without proper crossings an edge stretch cannot change sides of `b`, so
/// these samples decide containment exactly.
fn boundary_samples(a: &[Point], b: &[Point]) -> Vec<Point> {
    let mut samples = Vec::new();
    for (p, q) in contour_edges(a) {
        samples.push(Point::new(p.x * 2, p.y * 2));

        let dx = q.x as i128 - p.x as i128;
        let dy = q.y as i128 - p.y as i128;
        let along = |c: &Point| (c.x as i128 - p.x as i128) * dx + (c.y as i128 - p.y as i128) * dy;

        let mut stops: Vec<Point> = b
            .iter()
            .copied()
            .filter(|c| *c != p && *c != q && point_on_segment(*c, p, q))
            .collect();
        stops.sort_by_key(along);
        stops.dedup();

        let mut prev = p;
        for stop in stops.into_iter().chain(std::iter::once(q)) {
            samples.push(Point::new(prev.x + stop.x, prev.y + stop.y));
            prev = stop;
        }
    }
    samples
}

/// `inner` lies inside or on `outer`; assumes the two do not cross
fn contour_within(inner: &[Point], outer: &[Point]) -> bool {
    let outer2 = doubled(outer);
    boundary_samples(inner, outer)
        .into_iter()
        .all(|s| point_on_contour(&outer2, s) || point_in_contour(&outer2, s))
}

/// Part of `a` lies strictly inside `b`; assumes the two do not cross
fn contour_enters(a: &[Point], b: &[Point]) -> bool {
    let b2 = doubled(b);
    boundary_samples(a, b)
        .into_iter()
        .any(|s| !point_on_contour(&b2, s) && point_in_contour(&b2, s))
}
