//! Core geometry types for zone outlines
//!
//! Board coordinates are integer internal units. Products of coordinates are
//! computed in `i128` so that cross products never overflow.

use serde::{Deserialize, Serialize};

/// Largest coordinate magnitude accepted at the edit and load boundaries.
/// Exact predicates double coordinates and multiply differences in `i128`,
/// which stays in range below this bound.
pub const COORD_LIMIT: i64 = 1 << 60;

/// A 2D point in board internal units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Both coordinates within `COORD_LIMIT`
    pub fn in_range(self) -> bool {
        let range = -COORD_LIMIT..=COORD_LIMIT;
        range.contains(&self.x) && range.contains(&self.y)
    }

    pub fn as_f64(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }

    /// Nearest integer point to a floating point location
    pub fn from_f64(p: [f64; 2]) -> Self {
        Self {
            x: p[0].round() as i64,
            y: p[1].round() as i64,
        }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box, inclusive on all sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    pub fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Bounds of a point set, `None` when the set is empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::from_point(*first);
        for p in iter {
            bbox.include(*p);
        }
        Some(bbox)
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Overlap test; boxes sharing only an edge or a corner overlap
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.min_x > other.max_x
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.max_y < other.min_y)
    }

    pub fn expanded(&self, margin: i64) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: self.max_x.saturating_add(margin),
            max_y: self.max_y.saturating_add(margin),
        }
    }

    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }

    /// Bounds as `[min_x, min_y, max_x, max_y]`
    pub fn as_array(&self) -> [i64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_overlap() {
        let a = BoundingBox { min_x: 0, min_y: 0, max_x: 10, max_y: 10 };
        let b = BoundingBox { min_x: 10, min_y: 5, max_x: 20, max_y: 8 };
        let c = BoundingBox { min_x: 11, min_y: 0, max_x: 20, max_y: 10 };

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(a.expanded(1).overlaps(&c));
    }

    #[test]
    fn test_bounding_box_from_points() {
        let pts = [Point::new(3, -2), Point::new(-1, 7), Point::new(4, 0)];
        let bbox = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(bbox.as_array(), [-1, -2, 4, 7]);
        assert!(BoundingBox::from_points(&Vec::<Point>::new()).is_none());
    }

    #[test]
    fn test_coordinate_range() {
        assert!(Point::new(COORD_LIMIT, -COORD_LIMIT).in_range());
        assert!(!Point::new(i64::MAX, 0).in_range());
        assert!(!Point::new(0, i64::MIN).in_range());
    }
}
