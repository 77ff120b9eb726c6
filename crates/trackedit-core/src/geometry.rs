//! Hit-testing for selection rectangles and envelope shapes
//!
//! Precedence is fixed: corner > edge > center line. Envelope segments are
//! resolved nearest-first.

use crate::coords::Rect;

/// Corner of a selection rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge of a selection rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Affordance under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionHit {
    Corner(Corner),
    Edge(Edge),
    /// Center line: grab to move the whole rectangle
    Move,
}

/// Selection rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub left_x: f64,
    pub right_x: f64,
    pub top_y: f64,
    pub bottom_y: f64,
}

impl SelectionRect {
    pub fn new(left_x: f64, right_x: f64, top_y: f64, bottom_y: f64) -> Self {
        Self {
            left_x,
            right_x,
            top_y,
            bottom_y,
        }
    }

    pub fn center_y(&self) -> f64 {
        (self.top_y + self.bottom_y) / 2.0
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.left_x, self.top_y, self.right_x, self.bottom_y)
    }

    pub fn detect_corner(&self, x: f64, y: f64, corner_size: f64) -> Option<Corner> {
        let near_left = (x - self.left_x).abs() <= corner_size;
        let near_right = (x - self.right_x).abs() <= corner_size;
        let near_top = (y - self.top_y).abs() <= corner_size;
        let near_bottom = (y - self.bottom_y).abs() <= corner_size;

        match (near_left, near_right, near_top, near_bottom) {
            (true, _, true, _) => Some(Corner::TopLeft),
            (_, true, true, _) => Some(Corner::TopRight),
            (true, _, _, true) => Some(Corner::BottomLeft),
            (_, true, _, true) => Some(Corner::BottomRight),
            _ => None,
        }
    }

    /// First matching edge in the order left, right, top, bottom
    pub fn detect_edge(&self, x: f64, y: f64, threshold: f64) -> Option<Edge> {
        let in_x_span = x >= self.left_x - threshold && x <= self.right_x + threshold;
        let in_y_span = y >= self.top_y - threshold && y <= self.bottom_y + threshold;

        if in_y_span && (x - self.left_x).abs() <= threshold {
            Some(Edge::Left)
        } else if in_y_span && (x - self.right_x).abs() <= threshold {
            Some(Edge::Right)
        } else if in_x_span && (y - self.top_y).abs() <= threshold {
            Some(Edge::Top)
        } else if in_x_span && (y - self.bottom_y).abs() <= threshold {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    /// Center line, excluding the bands next to both vertical edges
    pub fn is_hovering_center_line(&self, x: f64, y: f64, threshold: f64) -> bool {
        (y - self.center_y()).abs() <= threshold
            && x > self.left_x + threshold
            && x < self.right_x - threshold
    }

    /// Coarse containment, inflated by `threshold` on every side
    pub fn is_within_selection(&self, x: f64, y: f64, threshold: f64) -> bool {
        x >= self.left_x - threshold
            && x <= self.right_x + threshold
            && y >= self.top_y - threshold
            && y <= self.bottom_y + threshold
    }

    /// Resolve the affordance under the pointer
    pub fn hit_test(&self, x: f64, y: f64, edge_threshold: f64, corner_size: f64) -> Option<SelectionHit> {
        if !self.is_within_selection(x, y, edge_threshold) {
            return None;
        }
        if let Some(corner) = self.detect_corner(x, y, corner_size) {
            return Some(SelectionHit::Corner(corner));
        }
        if let Some(edge) = self.detect_edge(x, y, edge_threshold) {
            return Some(SelectionHit::Edge(edge));
        }
        if self.is_hovering_center_line(x, y, edge_threshold) {
            return Some(SelectionHit::Move);
        }
        None
    }
}

/// Euclidean distance between two points
pub fn point_distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (ax - bx).hypot(ay - by)
}

/// Distance from `(px, py)` to the segment `a..b`
///
/// Returns the distance and the projection parameter. A zero-length segment
/// yields parameter -1 and measures to its start.
pub fn segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> (f64, f64) {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    let param = if len_sq != 0.0 {
        ((px - ax) * dx + (py - ay) * dy) / len_sq
    } else {
        -1.0
    };

    let (nx, ny) = if param < 0.0 {
        (ax, ay)
    } else if param > 1.0 {
        (bx, by)
    } else {
        (ax + param * dx, ay + param * dy)
    };

    (point_distance(px, py, nx, ny), param)
}
