//! Corner smoothing: chamfered and filleted outlines
//!
//! Every corner of every contour is replaced. The cut back along each edge is
//! limited to half of the shorter adjacent edge so neighbouring corners never
//! overlap.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::outline::{dedup_contour, PolygonOutline};
use super::types::Point;

/// Corner treatment applied before clearance checks and fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CornerSmoothing {
    #[default]
    None,
    Chamfer { distance: i64 },
    Fillet { radius: i64 },
}

impl CornerSmoothing {
    /// Smoothed copy of `outline`; `segments` is the arc resolution per full circle
    pub fn apply(&self, outline: &PolygonOutline, segments: u32) -> PolygonOutline {
        match *self {
            CornerSmoothing::None => outline.clone(),
            CornerSmoothing::Chamfer { distance } if distance > 0 => chamfer(outline, distance),
            CornerSmoothing::Fillet { radius } if radius > 0 => fillet(outline, radius, segments),
            _ => outline.clone(),
        }
    }
}

/// Neighbour vectors of a corner: (to previous, to next), as unit vectors plus lengths
struct CornerFrame {
    corner: [f64; 2],
    to_prev: [f64; 2],
    to_next: [f64; 2],
    len_prev: f64,
    len_next: f64,
}

impl CornerFrame {
    fn new(contour: &[Point], i: usize) -> Option<Self> {
        let n = contour.len();
        let corner = contour[i].as_f64();
        let prev = contour[(i + n - 1) % n].as_f64();
        let next = contour[(i + 1) % n].as_f64();

        let a = [prev[0] - corner[0], prev[1] - corner[1]];
        let b = [next[0] - corner[0], next[1] - corner[1]];
        let len_prev = a[0].hypot(a[1]);
        let len_next = b[0].hypot(b[1]);
        if len_prev == 0.0 || len_next == 0.0 {
            return None;
        }

        Some(Self {
            corner,
            to_prev: [a[0] / len_prev, a[1] / len_prev],
            to_next: [b[0] / len_next, b[1] / len_next],
            len_prev,
            len_next,
        })
    }

    fn along_prev(&self, d: f64) -> [f64; 2] {
        [self.corner[0] + self.to_prev[0] * d, self.corner[1] + self.to_prev[1] * d]
    }

    fn along_next(&self, d: f64) -> [f64; 2] {
        [self.corner[0] + self.to_next[0] * d, self.corner[1] + self.to_next[1] * d]
    }
}

pub fn chamfer(outline: &PolygonOutline, distance: i64) -> PolygonOutline {
    let mut contours = Vec::with_capacity(outline.contour_count());

    for contour in outline.contours() {
        let mut out = Vec::with_capacity(contour.len() * 2);
        for i in 0..contour.len() {
            let Some(frame) = CornerFrame::new(contour, i) else {
                out.push(contour[i]);
                continue;
            };
            let d = (distance as f64).min(0.5 * frame.len_prev).min(0.5 * frame.len_next);
            out.push(Point::from_f64(frame.along_prev(d)));
            out.push(Point::from_f64(frame.along_next(d)));
        }
        dedup_contour(&mut out);
        contours.push(out);
    }

    PolygonOutline::from_contours(contours)
}

pub fn fillet(outline: &PolygonOutline, radius: i64, segments: u32) -> PolygonOutline {
    let segments = segments.max(4) as f64;
    let mut contours = Vec::with_capacity(outline.contour_count());

    for contour in outline.contours() {
        let mut out = Vec::with_capacity(contour.len() * 4);
        for i in 0..contour.len() {
            let Some(frame) = CornerFrame::new(contour, i) else {
                out.push(contour[i]);
                continue;
            };

            // Half of the angle between the two edges at this corner
            let cosine = (frame.to_prev[0] * frame.to_next[0] + frame.to_prev[1] * frame.to_next[1])
                .clamp(-1.0, 1.0);
            let half_angle = cosine.acos() / 2.0;
            let tan_half = half_angle.tan();
            if !(tan_half.is_finite() && tan_half > 1e-9) || half_angle >= PI / 2.0 - 1e-9 {
                // Straight or folded back: nothing to round
                out.push(contour[i]);
                continue;
            }

            let mut tangent = radius as f64 / tan_half;
            tangent = tangent.min(0.5 * frame.len_prev).min(0.5 * frame.len_next);
            let r = tangent * tan_half;

            let bisector = [
                frame.to_prev[0] + frame.to_next[0],
                frame.to_prev[1] + frame.to_next[1],
            ];
            let bisector_len = bisector[0].hypot(bisector[1]);
            let center_dist = r / half_angle.sin();
            let center = [
                frame.corner[0] + bisector[0] / bisector_len * center_dist,
                frame.corner[1] + bisector[1] / bisector_len * center_dist,
            ];

            let start = frame.along_prev(tangent);
            let end = frame.along_next(tangent);
            let start_angle = (start[1] - center[1]).atan2(start[0] - center[0]);
            let end_angle = (end[1] - center[1]).atan2(end[0] - center[0]);
            let mut sweep = end_angle - start_angle;
            if sweep > PI {
                sweep -= 2.0 * PI;
            } else if sweep < -PI {
                sweep += 2.0 * PI;
            }

            let steps = ((segments * sweep.abs() / (2.0 * PI)).ceil() as usize).max(1);
            out.push(Point::from_f64(start));
            for step in 1..steps {
                let angle = start_angle + sweep * step as f64 / steps as f64;
                out.push(Point::from_f64([
                    center[0] + r * angle.cos(),
                    center[1] + r * angle.sin(),
                ]));
            }
            out.push(Point::from_f64(end));
        }
        dedup_contour(&mut out);
        contours.push(out);
    }

    PolygonOutline::from_contours(contours)
}
