//! Envelope point editor
//!
//! Edits the gain envelope of one clip through a transparent overlay laid on
//! top of the clip body. Pointer coordinates are relative to the overlay's
//! top-left corner.
//!
//! Points carry a stable [`PointId`], so hiding, sorting and deleting never
//! depend on list positions.
//!
//! ## Gestures
//!
//! - **Point drag**: moves one point. Points crossed on the way, or sitting
//!   at the snapped time, are hidden ("eaten") while dragging and removed on
//!   release. A click without movement deletes the point.
//! - **Segment drag**: shifts the one or two points bounding the segment by
//!   the same dB delta. On the default line (no points, or only the two
//!   boundary points) it writes a flat envelope instead. A click without
//!   movement adds a point.

use std::fmt;

use crate::config::InteractionConfig;
use crate::coords::{db_to_y, finite_db, y_to_db, MAX_DB, MIN_DB};
use crate::events::EnvelopeEvent;
use crate::geometry::{point_distance, segment_distance};
use crate::types::CursorStyle;

/// Stable envelope point identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pt#{}", self.0)
    }
}

/// Gain control point (time relative to the clip start)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    pub id: PointId,
    pub time: f64,
    /// Gain in dB; -inf is silence
    pub db: f64,
}

/// Segment of the drawn envelope line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Flat line when there are no points or only the boundary pair
    Default,
    /// From the clip's left edge to the first point
    Leading(PointId),
    Between(PointId, PointId),
    /// From the last point to the clip's right edge
    Trailing(PointId),
}

/// What lies under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeHit {
    Point(PointId),
    Segment(SegmentKind),
}

/// Active envelope gesture
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeDrag {
    Point {
        id: PointId,
        original_time: f64,
        start_x: f64,
        start_y: f64,
        has_moved: bool,
    },
    Segment {
        kind: SegmentKind,
        start_x: f64,
        start_y: f64,
        /// dB of the bounding points at drag start
        start_dbs: Vec<(PointId, f64)>,
        /// dB of the default line at drag start
        start_line_db: f64,
        /// Boundary pair written by a default-line drag
        boundary: Option<(PointId, PointId)>,
        has_moved: bool,
    },
}

/// Point editor for one clip's envelope
#[derive(Debug, Clone)]
pub struct EnvelopeEditor {
    config: InteractionConfig,
    duration: f64,
    width: f64,
    height: f64,
    /// Sorted by time, hidden points included
    points: Vec<EnvelopePoint>,
    hidden: Vec<PointId>,
    hovered: Option<PointId>,
    drag: Option<EnvelopeDrag>,
    next_id: u64,
}

impl EnvelopeEditor {
    pub fn new(duration: f64, config: InteractionConfig) -> Self {
        Self {
            config,
            duration: duration.max(0.0),
            width: 0.0,
            height: 0.0,
            points: Vec::new(),
            hidden: Vec::new(),
            hovered: None,
            drag: None,
            next_id: 0,
        }
    }

    /// Builder: overlay size in pixels
    pub fn with_area(mut self, width: f64, height: f64) -> Self {
        self.set_area(width, height);
        self
    }

    /// Builder: initial points as `(time, db)` pairs, assigned fresh ids
    pub fn with_points(mut self, values: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let points: Vec<EnvelopePoint> = values
            .into_iter()
            .map(|(time, db)| EnvelopePoint {
                id: self.allocate_id(),
                time,
                db,
            })
            .collect();
        self.points = points;
        self.sort_points();
        self
    }

    fn allocate_id(&mut self) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn configure(&mut self, config: InteractionConfig) {
        self.config = config;
    }

    pub fn set_area(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
    }

    /// Replace the points with the host's copy (ignored while dragging)
    pub fn set_points(&mut self, points: Vec<EnvelopePoint>) {
        if self.drag.is_some() {
            return;
        }
        if let Some(max) = points.iter().map(|p| p.id.0).max() {
            self.next_id = self.next_id.max(max + 1);
        }
        self.points = points;
        self.sort_points();
        self.hidden.clear();
        if self
            .hovered
            .is_some_and(|id| !self.points.iter().any(|p| p.id == id))
        {
            self.hovered = None;
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn points(&self) -> &[EnvelopePoint] {
        &self.points
    }

    pub fn hidden_points(&self) -> &[PointId] {
        &self.hidden
    }

    pub fn hovered_point(&self) -> Option<PointId> {
        self.hovered
    }

    pub fn drag(&self) -> Option<&EnvelopeDrag> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn point(&self, id: PointId) -> Option<&EnvelopePoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn is_hidden(&self, id: PointId) -> bool {
        self.hidden.contains(&id)
    }

    /// Points that are drawn and hit-tested
    pub fn visible_points(&self) -> impl Iterator<Item = &EnvelopePoint> {
        self.points.iter().filter(|p| !self.hidden.contains(&p.id))
    }

    /// Exactly the two synthetic points at the clip edges, on one level
    pub fn is_boundary_only(&self) -> bool {
        let eps = self.config.origin_epsilon_secs;
        let visible: Vec<&EnvelopePoint> = self.visible_points().collect();
        match visible.as_slice() {
            [first, last] => {
                first.time.abs() < eps
                    && (last.time - self.duration).abs() < eps
                    && first.db == last.db
            }
            _ => false,
        }
    }

    /// Gain at `time`, interpolated linearly between visible points
    ///
    /// Flat 0 dB without points; holds the first/last value outside the
    /// point range.
    pub fn db_at(&self, time: f64) -> f64 {
        let visible: Vec<&EnvelopePoint> = self.visible_points().collect();
        let (Some(first), Some(last)) = (visible.first(), visible.last()) else {
            return 0.0;
        };
        if time <= first.time {
            return first.db;
        }
        if time >= last.time {
            return last.db;
        }
        for pair in visible.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time == b.time {
                return b.db;
            }
            if time > a.time && time < b.time {
                let frac = (time - a.time) / (b.time - a.time);
                return finite_db(a.db) + (finite_db(b.db) - finite_db(a.db)) * frac;
            }
        }
        last.db
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mapping
    // ─────────────────────────────────────────────────────────────────────

    pub fn time_to_x(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        time / self.duration * self.width
    }

    /// Clamped to [0, duration]
    pub fn x_to_time(&self, x: f64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (x / self.width * self.duration).clamp(0.0, self.duration)
    }

    pub fn db_to_y(&self, db: f64) -> f64 {
        db_to_y(db, 0.0, self.height)
    }

    pub fn y_to_db(&self, y: f64) -> f64 {
        y_to_db(y, 0.0, self.height)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Hit-testing
    // ─────────────────────────────────────────────────────────────────────

    /// Nearest visible point within the grab radius
    pub fn point_at(&self, x: f64, y: f64) -> Option<PointId> {
        self.visible_points()
            .map(|p| (point_distance(x, y, self.time_to_x(p.time), self.db_to_y(p.db)), p.id))
            .filter(|(distance, _)| *distance <= self.config.point_hit_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    /// Nearest segment within the grab distance
    pub fn segment_at(&self, x: f64, y: f64) -> Option<SegmentKind> {
        let threshold = self.config.segment_hit_distance;
        let visible: Vec<&EnvelopePoint> = self.visible_points().collect();

        if visible.is_empty() || self.is_boundary_only() {
            let line_y = self.db_to_y(visible.first().map_or(0.0, |p| p.db));
            let (distance, _) = segment_distance(x, y, 0.0, line_y, self.width, line_y);
            return (distance <= threshold).then_some(SegmentKind::Default);
        }

        let eps = self.config.origin_epsilon_secs;
        let mut candidates: Vec<(f64, SegmentKind)> = Vec::new();

        if let Some(first) = visible.first() {
            if first.time > eps {
                let py = self.db_to_y(first.db);
                let (d, _) = segment_distance(x, y, 0.0, py, self.time_to_x(first.time), py);
                candidates.push((d, SegmentKind::Leading(first.id)));
            }
        }
        for pair in visible.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (d, _) = segment_distance(
                x,
                y,
                self.time_to_x(a.time),
                self.db_to_y(a.db),
                self.time_to_x(b.time),
                self.db_to_y(b.db),
            );
            candidates.push((d, SegmentKind::Between(a.id, b.id)));
        }
        if let Some(last) = visible.last() {
            if last.time < self.duration - eps {
                let py = self.db_to_y(last.db);
                let (d, _) = segment_distance(x, y, self.time_to_x(last.time), py, self.width, py);
                candidates.push((d, SegmentKind::Trailing(last.id)));
            }
        }

        candidates
            .into_iter()
            .filter(|(d, _)| *d <= threshold)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, kind)| kind)
    }

    /// Points take precedence over segments
    pub fn hit_test(&self, x: f64, y: f64) -> Option<EnvelopeHit> {
        self.point_at(x, y)
            .map(EnvelopeHit::Point)
            .or_else(|| self.segment_at(x, y).map(EnvelopeHit::Segment))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer events
    // ─────────────────────────────────────────────────────────────────────

    /// Start a gesture; returns false when nothing was hit
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let Some(hit) = self.hit_test(x, y) else {
            return false;
        };

        self.drag = Some(match hit {
            EnvelopeHit::Point(id) => {
                let original_time = self.point(id).map_or(0.0, |p| p.time);
                log::debug!("envelope: point drag {} from t={:.3}", id, original_time);
                EnvelopeDrag::Point {
                    id,
                    original_time,
                    start_x: x,
                    start_y: y,
                    has_moved: false,
                }
            }
            EnvelopeHit::Segment(kind) => {
                let ids: Vec<PointId> = match kind {
                    SegmentKind::Default => Vec::new(),
                    SegmentKind::Leading(id) | SegmentKind::Trailing(id) => vec![id],
                    SegmentKind::Between(a, b) => vec![a, b],
                };
                let start_dbs = ids
                    .into_iter()
                    .filter_map(|id| self.point(id).map(|p| (id, p.db)))
                    .collect();
                let boundary = match (kind, self.visible_points().collect::<Vec<_>>().as_slice()) {
                    (SegmentKind::Default, [first, last]) => Some((first.id, last.id)),
                    _ => None,
                };
                let start_line_db = self.visible_points().next().map_or(0.0, |p| p.db);
                log::debug!("envelope: segment drag {:?}", kind);
                EnvelopeDrag::Segment {
                    kind,
                    start_x: x,
                    start_y: y,
                    start_dbs,
                    start_line_db,
                    boundary,
                    has_moved: false,
                }
            }
        });
        true
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<EnvelopeEvent> {
        let mut events = Vec::new();
        let threshold = self.config.click_move_threshold;

        match self.drag.as_mut() {
            None => {}
            Some(EnvelopeDrag::Point {
                id,
                original_time,
                start_x,
                start_y,
                has_moved,
            }) => {
                if !*has_moved {
                    if point_distance(x, y, *start_x, *start_y) <= threshold {
                        return events;
                    }
                    *has_moved = true;
                }
                let (id, original_time) = (*id, *original_time);
                self.move_point(id, original_time, x, y, &mut events);
            }
            Some(EnvelopeDrag::Segment {
                kind,
                start_x,
                start_y,
                start_dbs,
                start_line_db,
                boundary,
                has_moved,
            }) => {
                if !*has_moved {
                    if point_distance(x, y, *start_x, *start_y) <= threshold {
                        return events;
                    }
                    *has_moved = true;
                }
                let delta = finite_db(y_to_db(y, 0.0, self.height))
                    - finite_db(y_to_db(*start_y, 0.0, self.height));

                if *kind == SegmentKind::Default {
                    let db = (finite_db(*start_line_db) + delta).clamp(MIN_DB, MAX_DB);
                    let pair = match *boundary {
                        Some(pair) => pair,
                        None => {
                            let pair = (PointId(self.next_id), PointId(self.next_id + 1));
                            self.next_id += 2;
                            *boundary = Some(pair);
                            pair
                        }
                    };
                    self.write_flat_line(pair, db);
                } else {
                    let updates: Vec<(PointId, f64)> = start_dbs
                        .iter()
                        .map(|&(id, db)| (id, (finite_db(db) + delta).clamp(MIN_DB, MAX_DB)))
                        .collect();
                    for (id, db) in updates {
                        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
                            point.db = db;
                        }
                    }
                }
                log::trace!("envelope: segment shifted by {:.2} dB", delta);
                events.push(EnvelopeEvent::PointsChanged(self.points.clone()));
            }
        }
        events
    }

    fn move_point(
        &mut self,
        id: PointId,
        original_time: f64,
        x: f64,
        y: f64,
        events: &mut Vec<EnvelopeEvent>,
    ) {
        let mut time = self.x_to_time(x);
        let db = self.y_to_db(y);

        // Snap to the nearest other point in the window
        if let Some(snap) = self
            .points
            .iter()
            .filter(|p| p.id != id)
            .map(|p| ((p.time - time).abs(), p.time))
            .filter(|(distance, _)| *distance <= self.config.snap_window_secs)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, t)| t)
        {
            time = snap;
        }

        let hidden: Vec<PointId> = if time.abs() < self.config.origin_epsilon_secs {
            self.points.iter().filter(|p| p.id != id).map(|p| p.id).collect()
        } else {
            let lo = original_time.min(time);
            let hi = original_time.max(time);
            self.points
                .iter()
                .filter(|p| p.id != id && ((p.time > lo && p.time < hi) || p.time == time))
                .map(|p| p.id)
                .collect()
        };
        if hidden != self.hidden {
            self.hidden = hidden;
            events.push(EnvelopeEvent::HiddenPointsChanged(self.hidden.clone()));
        }

        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.time = time;
            point.db = db;
        }
        self.sort_points();
        log::trace!("envelope: {} -> t={:.3} db={:.2}", id, time, db);
        events.push(EnvelopeEvent::PointsChanged(self.points.clone()));
    }

    /// Replace every point with a flat line through the boundary pair
    fn write_flat_line(&mut self, (first, last): (PointId, PointId), db: f64) {
        self.points = vec![
            EnvelopePoint {
                id: first,
                time: 0.0,
                db,
            },
            EnvelopePoint {
                id: last,
                time: self.duration,
                db,
            },
        ];
    }

    /// Finish the gesture; a release without an active drag is a no-op
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Vec<EnvelopeEvent> {
        let mut events = Vec::new();
        let Some(drag) = self.drag.take() else {
            return events;
        };

        match drag {
            EnvelopeDrag::Point { id, has_moved: false, .. } => {
                log::debug!("envelope: click on {}, deleting", id);
                self.points.retain(|p| p.id != id);
                self.clear_hidden(&mut events);
                events.push(EnvelopeEvent::PointsChanged(self.points.clone()));
                if self.hovered == Some(id) {
                    self.hovered = None;
                    events.push(EnvelopeEvent::HoveredPointChanged(None));
                }
            }
            EnvelopeDrag::Point { id, .. } => {
                if self.config.eat_crossed_points && !self.hidden.is_empty() {
                    log::debug!("envelope: {} ate {} point(s)", id, self.hidden.len());
                    let eaten = std::mem::take(&mut self.hidden);
                    self.points.retain(|p| !eaten.contains(&p.id));
                    events.push(EnvelopeEvent::HiddenPointsChanged(Vec::new()));
                    events.push(EnvelopeEvent::PointsChanged(self.points.clone()));
                } else {
                    // Crossed points come back, but a point sharing the
                    // dragged point's time never survives
                    let time = self.point(id).map(|p| p.time);
                    let before = self.points.len();
                    let hidden = std::mem::take(&mut self.hidden);
                    self.points
                        .retain(|p| !(hidden.contains(&p.id) && Some(p.time) == time));
                    if !hidden.is_empty() {
                        events.push(EnvelopeEvent::HiddenPointsChanged(Vec::new()));
                    }
                    if self.points.len() != before {
                        events.push(EnvelopeEvent::PointsChanged(self.points.clone()));
                    }
                }
            }
            EnvelopeDrag::Segment { kind, has_moved: false, .. } => {
                self.insert_at_click(kind, x, y, &mut events);
            }
            EnvelopeDrag::Segment { .. } => {}
        }
        events
    }

    fn clear_hidden(&mut self, events: &mut Vec<EnvelopeEvent>) {
        if !self.hidden.is_empty() {
            self.hidden.clear();
            events.push(EnvelopeEvent::HiddenPointsChanged(Vec::new()));
        }
    }

    fn insert_at_click(&mut self, kind: SegmentKind, x: f64, y: f64, events: &mut Vec<EnvelopeEvent>) {
        let time = self.x_to_time(x);
        let db = self.y_to_db(y);
        let eps = self.config.origin_epsilon_secs;

        if kind == SegmentKind::Default && self.is_boundary_only() {
            self.points.clear();
        } else if time.abs() < eps && self.points.iter().any(|p| p.time.abs() < eps) {
            log::debug!("envelope: point already at clip origin");
            return;
        }

        let id = self.allocate_id();
        log::debug!("envelope: add {} at t={:.3} db={:.2}", id, time, db);
        self.points.push(EnvelopePoint { id, time, db });
        self.sort_points();
        events.push(EnvelopeEvent::PointsChanged(self.points.clone()));
    }

    /// Track the point under the pointer while no gesture is active
    pub fn pointer_hover(&mut self, x: f64, y: f64) -> Vec<EnvelopeEvent> {
        if self.drag.is_some() {
            return Vec::new();
        }
        let hovered = self.point_at(x, y);
        if hovered == self.hovered {
            return Vec::new();
        }
        self.hovered = hovered;
        vec![EnvelopeEvent::HoveredPointChanged(hovered)]
    }

    /// Pointer leaves the overlay
    pub fn pointer_leave(&mut self) -> Vec<EnvelopeEvent> {
        if self.drag.is_some() || self.hovered.is_none() {
            return Vec::new();
        }
        self.hovered = None;
        vec![EnvelopeEvent::HoveredPointChanged(None)]
    }

    pub fn cursor_style(&self, x: f64, y: f64) -> CursorStyle {
        match &self.drag {
            Some(EnvelopeDrag::Point { .. }) => CursorStyle::Grabbing,
            Some(EnvelopeDrag::Segment { .. }) => CursorStyle::NsResize,
            None => match self.hit_test(x, y) {
                Some(EnvelopeHit::Point(_)) => CursorStyle::Pointer,
                Some(EnvelopeHit::Segment(_)) => CursorStyle::NsResize,
                None => CursorStyle::Default,
            },
        }
    }

    fn sort_points(&mut self) {
        self.points.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 500.0;
    const HEIGHT: f64 = 101.0;

    // 5 s clip at 100 px/s
    fn editor(points: &[(f64, f64)]) -> EnvelopeEditor {
        EnvelopeEditor::new(5.0, InteractionConfig::default())
            .with_area(WIDTH, HEIGHT)
            .with_points(points.iter().copied())
    }

    fn y(db: f64) -> f64 {
        db_to_y(db, 0.0, HEIGHT)
    }

    fn times(editor: &EnvelopeEditor) -> Vec<f64> {
        editor.points().iter().map(|p| p.time).collect()
    }

    #[test]
    fn test_drag_point_without_crossing() {
        let mut ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);

        assert!(ed.pointer_down(100.0, y(0.0)));
        let events = ed.pointer_move(200.0, y(0.0));
        assert!(matches!(events.as_slice(), [EnvelopeEvent::PointsChanged(_)]));
        assert!(ed.hidden_points().is_empty());

        let events = ed.pointer_up(200.0, y(0.0));
        assert!(events.is_empty());
        assert_eq!(times(&ed), vec![2.0, 3.0]);
        assert!(ed.points()[0].db.abs() < 1e-6);
        assert_eq!(ed.points()[1].db, -6.0);
    }

    #[test]
    fn test_drag_point_eats_crossed_point() {
        let mut ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);
        let crossed = ed.points()[1].id;
        let dragged = ed.points()[0].id;

        ed.pointer_down(100.0, y(0.0));
        let events = ed.pointer_move(400.0, y(-3.0));
        assert_eq!(events[0], EnvelopeEvent::HiddenPointsChanged(vec![crossed]));
        assert!(ed.is_hidden(crossed));
        // Hidden points stay in the backing list
        assert_eq!(ed.points().len(), 2);
        assert_eq!(ed.visible_points().count(), 1);

        let events = ed.pointer_up(400.0, y(-3.0));
        assert_eq!(events[0], EnvelopeEvent::HiddenPointsChanged(Vec::new()));
        assert_eq!(ed.points().len(), 1);
        assert_eq!(ed.points()[0].id, dragged);
        assert_eq!(ed.points()[0].time, 4.0);
        assert!((ed.points()[0].db + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_eating_disabled_restores_crossed_points() {
        let config = InteractionConfig {
            eat_crossed_points: false,
            ..Default::default()
        };
        let mut ed = EnvelopeEditor::new(5.0, config)
            .with_area(WIDTH, HEIGHT)
            .with_points([(1.0, 0.0), (3.0, -6.0)]);

        ed.pointer_down(100.0, y(0.0));
        ed.pointer_move(400.0, y(0.0));
        assert_eq!(ed.hidden_points().len(), 1);

        let events = ed.pointer_up(400.0, y(0.0));
        assert_eq!(events, vec![EnvelopeEvent::HiddenPointsChanged(Vec::new())]);
        assert_eq!(times(&ed), vec![3.0, 4.0]);
    }

    #[test]
    fn test_drag_to_origin_hides_everything_else() {
        let mut ed = editor(&[(1.0, 0.0), (2.0, 0.0), (3.0, -6.0)]);

        ed.pointer_down(200.0, y(0.0));
        ed.pointer_move(-20.0, y(0.0));
        assert_eq!(ed.hidden_points().len(), 2);
        assert_eq!(ed.points()[0].time, 0.0);

        ed.pointer_up(-20.0, y(0.0));
        assert_eq!(times(&ed), vec![0.0]);
    }

    #[test]
    fn test_snap_to_nearby_point_time() {
        let mut ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);

        let dragged = ed.points()[0].id;
        let target = ed.points()[1].id;

        ed.pointer_down(100.0, y(0.0));
        ed.pointer_move(297.0, y(0.0));
        assert_eq!(times(&ed), vec![3.0, 3.0]);
        // The snap target is hidden like a crossed point
        assert_eq!(ed.hidden_points(), &[target]);

        ed.pointer_up(297.0, y(0.0));
        assert_eq!(times(&ed), vec![3.0]);
        assert_eq!(ed.points()[0].id, dragged);
    }

    #[test]
    fn test_snap_without_eating_still_commits_unique_times() {
        let config = InteractionConfig {
            eat_crossed_points: false,
            ..Default::default()
        };
        let mut ed = EnvelopeEditor::new(5.0, config)
            .with_area(WIDTH, HEIGHT)
            .with_points([(1.0, 0.0), (3.0, -6.0), (4.0, -6.0)]);
        let dragged = ed.points()[0].id;

        ed.pointer_down(100.0, y(0.0));
        ed.pointer_move(397.0, y(0.0));
        assert_eq!(ed.hidden_points().len(), 2);

        ed.pointer_up(397.0, y(0.0));
        assert!(ed.hidden_points().is_empty());
        // The crossed point returns, the coincident one is dropped
        assert_eq!(times(&ed), vec![3.0, 4.0]);
        assert_eq!(ed.points()[1].id, dragged);
    }

    #[test]
    fn test_click_on_point_deletes_it() {
        let run = || {
            let mut ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);
            ed.pointer_down(101.0, y(0.0) + 1.0);
            // Jitter below the click threshold
            assert!(ed.pointer_move(102.0, y(0.0)).is_empty());
            ed.pointer_up(102.0, y(0.0));
            ed.points().to_vec()
        };

        let first = run();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].time, 3.0);
        assert_eq!(first, run());
    }

    #[test]
    fn test_click_on_empty_default_line() {
        let mut ed = editor(&[]);

        // Far from the 0 dB line: nothing happens
        assert!(!ed.pointer_down(200.0, y(0.0) + 20.0));
        assert!(ed.pointer_up(200.0, y(0.0) + 20.0).is_empty());
        assert!(ed.points().is_empty());

        assert!(ed.pointer_down(200.0, y(0.0) + 2.0));
        let events = ed.pointer_up(200.0, y(0.0) + 2.0);
        assert_eq!(events.len(), 1);
        assert_eq!(times(&ed), vec![2.0]);
        assert!((ed.points()[0].db - ed.y_to_db(y(0.0) + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_click_on_boundary_line_replaces_pair() {
        let mut ed = editor(&[(0.0, -3.0), (5.0, -3.0)]);
        assert!(ed.is_boundary_only());

        assert!(ed.pointer_down(250.0, y(-3.0)));
        ed.pointer_up(250.0, y(-3.0));
        assert_eq!(times(&ed), vec![2.5]);
        assert!((ed.points()[0].db + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_click_between_points_inserts_sorted() {
        let mut ed = editor(&[(1.0, 0.0), (3.0, 0.0)]);

        assert!(ed.pointer_down(200.0, y(0.0)));
        ed.pointer_up(200.0, y(0.0));
        assert_eq!(times(&ed), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_origin_duplicate_guard() {
        let config = InteractionConfig {
            point_hit_radius: 0.0,
            ..Default::default()
        };
        let mut ed = EnvelopeEditor::new(5.0, config)
            .with_area(WIDTH, HEIGHT)
            .with_points([(0.0, 0.0), (3.0, -6.0)]);

        assert!(ed.pointer_down(0.05, y(0.0)));
        assert!(ed.pointer_up(0.05, y(0.0)).is_empty());
        assert_eq!(ed.points().len(), 2);
    }

    #[test]
    fn test_segment_drag_shifts_both_points() {
        let mut ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);
        let mid_y = (y(0.0) + y(-6.0)) / 2.0;

        assert!(ed.pointer_down(200.0, mid_y));
        assert!(matches!(
            ed.drag(),
            Some(EnvelopeDrag::Segment {
                kind: SegmentKind::Between(_, _),
                ..
            })
        ));

        ed.pointer_move(200.0, mid_y - 20.0);
        let dbs: Vec<f64> = ed.points().iter().map(|p| p.db).collect();
        assert!(dbs[0] > 0.0);
        assert!(((dbs[0] - dbs[1]) - 6.0).abs() < 1e-9);
        assert_eq!(times(&ed), vec![1.0, 3.0]);

        // Release after a move adds nothing
        assert!(ed.pointer_up(200.0, mid_y - 20.0).is_empty());
        assert_eq!(ed.points().len(), 2);
    }

    #[test]
    fn test_trailing_segment_moves_last_point() {
        let mut ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);

        assert!(ed.pointer_down(450.0, y(-6.0)));
        ed.pointer_move(450.0, y(-6.0) + 10.0);
        assert_eq!(ed.points()[0].db, 0.0);
        assert!(ed.points()[1].db < -6.0);
    }

    #[test]
    fn test_default_line_drag_writes_boundary_pair() {
        let mut ed = editor(&[]);

        assert!(ed.pointer_down(250.0, y(0.0)));
        ed.pointer_move(250.0, y(0.0) - 20.0);
        let first_ids: Vec<PointId> = ed.points().iter().map(|p| p.id).collect();
        assert_eq!(times(&ed), vec![0.0, 5.0]);
        assert!(ed.points()[0].db > 0.0);
        assert_eq!(ed.points()[0].db, ed.points()[1].db);

        // Further moves update the same pair
        ed.pointer_move(250.0, y(0.0) + 10.0);
        let ids: Vec<PointId> = ed.points().iter().map(|p| p.id).collect();
        assert_eq!(ids, first_ids);
        assert!(ed.points()[0].db < 0.0);

        ed.pointer_up(250.0, y(0.0) + 10.0);
        assert!(ed.is_boundary_only());
    }

    #[test]
    fn test_hover_events_on_change_only() {
        let mut ed = editor(&[(1.0, 0.0)]);
        let id = ed.points()[0].id;

        assert_eq!(
            ed.pointer_hover(102.0, y(0.0)),
            vec![EnvelopeEvent::HoveredPointChanged(Some(id))]
        );
        assert!(ed.pointer_hover(100.0, y(0.0)).is_empty());
        assert_eq!(ed.cursor_style(100.0, y(0.0)), CursorStyle::Pointer);
        assert_eq!(
            ed.pointer_hover(300.0, 5.0),
            vec![EnvelopeEvent::HoveredPointChanged(None)]
        );
        assert_eq!(ed.cursor_style(300.0, 5.0), CursorStyle::Default);
    }

    #[test]
    fn test_db_at_interpolates_visible_points() {
        let ed = editor(&[(1.0, 0.0), (3.0, -6.0)]);
        assert_eq!(ed.db_at(0.0), 0.0);
        assert!((ed.db_at(2.0) + 3.0).abs() < 1e-12);
        assert_eq!(ed.db_at(4.5), -6.0);
        assert_eq!(editor(&[]).db_at(2.0), 0.0);
    }

    #[test]
    fn test_set_points_keeps_ids_unique() {
        let mut ed = editor(&[]);
        ed.set_points(vec![EnvelopePoint {
            id: PointId(41),
            time: 1.0,
            db: 0.0,
        }]);

        assert!(ed.pointer_down(300.0, y(0.0)));
        ed.pointer_up(300.0, y(0.0));
        assert_eq!(ed.points()[1].id, PointId(42));
    }
}
