//! Polygon set operations
//!
//! Zone merging only needs union. The engine talks to a [`SetOperations`]
//! implementation so a host can plug in its own clipper; the default one is
//! backed by `geo`'s boolean ops.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use super::outline::{dedup_contour, PolygonOutline, MIN_CONTOUR_CORNERS};
use super::types::Point;

/// Polygon set-operation collaborator
pub trait SetOperations: Send + Sync {
    /// Union of two polygons-with-holes. Each output outline has its outer
    /// contour first, then its holes.
    fn union(&self, a: &PolygonOutline, b: &PolygonOutline) -> Vec<PolygonOutline>;
}

/// Set operations on `geo` floating point polygons, rounded back to the grid
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoSetOperations;

impl SetOperations for GeoSetOperations {
    fn union(&self, a: &PolygonOutline, b: &PolygonOutline) -> Vec<PolygonOutline> {
        let a = to_geo_polygon(a);
        let b = to_geo_polygon(b);
        let result = a.union(&b);
        from_geo_multi_polygon(&result)
    }
}

/// `a` minus `b` through `geo`. Used to repair outlines whose holes cross
/// their outer contour.
pub fn difference(a: &PolygonOutline, b: &PolygonOutline) -> Vec<PolygonOutline> {
    let result = to_geo_polygon(a).difference(&to_geo_polygon(b));
    from_geo_multi_polygon(&result)
}

fn to_line_string(contour: &[Point]) -> LineString<f64> {
    let coords: Vec<Coord<f64>> = contour
        .iter()
        .map(|p| Coord { x: p.x as f64, y: p.y as f64 })
        .collect();
    // Polygon::new closes the ring
    LineString::new(coords)
}

pub fn to_geo_polygon(outline: &PolygonOutline) -> MultiPolygon<f64> {
    let exterior = to_line_string(outline.outer());
    let interiors = outline.holes().iter().map(|h| to_line_string(h)).collect();
    MultiPolygon::new(vec![Polygon::new(exterior, interiors)])
}

fn from_ring(ring: &LineString<f64>) -> Vec<Point> {
    let mut contour: Vec<Point> = ring.0.iter().map(|c| Point::from_f64([c.x, c.y])).collect();
    dedup_contour(&mut contour);
    contour
}

/// Grid-rounded outlines from a `geo` result; rings that collapse below three
/// corners are dropped
pub fn from_geo_multi_polygon(mp: &MultiPolygon<f64>) -> Vec<PolygonOutline> {
    let mut out = Vec::with_capacity(mp.0.len());
    for polygon in &mp.0 {
        let outer = from_ring(polygon.exterior());
        if outer.len() < MIN_CONTOUR_CORNERS {
            continue;
        }
        let holes = polygon
            .interiors()
            .iter()
            .map(from_ring)
            .filter(|h| h.len() >= MIN_CONTOUR_CORNERS)
            .collect();
        out.push(PolygonOutline::with_holes(outer, holes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_overlapping_squares() {
        let a = PolygonOutline::rectangle(0, 0, 100, 100);
        let b = PolygonOutline::rectangle(50, 0, 150, 100);
        let result = GeoSetOperations.union(&a, &b);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].area(), 15000.0);
        assert_eq!(result[0].bounding_box().unwrap().as_array(), [0, 0, 150, 100]);
    }

    #[test]
    fn test_union_of_disjoint_squares() {
        let a = PolygonOutline::rectangle(0, 0, 10, 10);
        let b = PolygonOutline::rectangle(100, 0, 110, 10);
        assert_eq!(GeoSetOperations.union(&a, &b).len(), 2);
    }

    #[test]
    fn test_difference_cuts_notch() {
        let a = PolygonOutline::rectangle(0, 0, 100, 100);
        let b = PolygonOutline::rectangle(80, 40, 120, 60);
        let result = difference(&a, &b);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].area(), 10000.0 - 400.0);
    }

    #[test]
    fn test_union_keeps_holes() {
        let ring = PolygonOutline::with_holes(
            vec![Point::new(0, 0), Point::new(100, 0), Point::new(100, 100), Point::new(0, 100)],
            vec![vec![
                Point::new(20, 20),
                Point::new(80, 20),
                Point::new(80, 80),
                Point::new(20, 80),
            ]],
        );
        let tab = PolygonOutline::rectangle(90, 40, 200, 60);
        let result = GeoSetOperations.union(&ring, &tab);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].contour_count(), 2);
        assert_eq!(result[0].area(), 10000.0 - 3600.0 + 100.0 * 20.0);
    }
}
