//! Time-selection drag state machine
//!
//! ```text
//! idle ──down on start edge──► resize-start ─┐
//!      ──down on end edge────► resize-end ───┼──up──► idle
//!      ──down elsewhere──────► create ───────┘
//! ```
//!
//! Resizing past the opposite edge inverts the selection instead of
//! clamping. A new selection only materializes once the pointer has moved
//! past the create dead-zone.

use std::time::{Duration, Instant};

use crate::config::InteractionConfig;
use crate::coords::{TimelineGeometry, TimelineLayout};
use crate::events::SelectionEvent;
use crate::types::{ClipId, CursorStyle, TimeSelection};

/// Active time drag mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDragMode {
    Create,
    ResizeStart,
    ResizeEnd,
}

/// Ephemeral state between pointer-down and pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDragState {
    pub mode: TimeDragMode,
    pub start_x: f64,
    pub current_x: f64,
    pub start_track_index: usize,
    pub initial_selection: Option<TimeSelection>,
    pub initial_selected_tracks: Vec<usize>,
    /// Drag may convert back to a spectral selection when it re-enters a clip
    pub started_inside_clip: bool,
    /// Time bounds that stay put while the pointer moves (spectral move hand-off)
    pub fixed_time_bounds: Option<TimeSelection>,
    /// Whether the dead-zone has been crossed
    pub materialized: bool,
}

/// Time-selection state plus the active drag, if any
#[derive(Debug, Clone, Default)]
pub struct TimeSelectionMachine {
    selection: Option<TimeSelection>,
    selected_tracks: Vec<usize>,
    focused_track: Option<usize>,
    drag: Option<TimeDragState>,
    drag_finished_at: Option<Instant>,
}

impl TimeSelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<TimeSelection> {
        self.selection
    }

    pub fn selected_tracks(&self) -> &[usize] {
        &self.selected_tracks
    }

    pub fn focused_track(&self) -> Option<usize> {
        self.focused_track
    }

    pub fn drag(&self) -> Option<&TimeDragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Replace the selection without emitting events (host sync)
    pub fn sync(&mut self, selection: Option<TimeSelection>, selected_tracks: &[usize]) {
        self.selection = selection.map(TimeSelection::normalized);
        self.selected_tracks = selected_tracks.to_vec();
    }

    pub(crate) fn set_selection(&mut self, selection: Option<TimeSelection>, events: &mut Vec<SelectionEvent>) {
        if self.selection != selection {
            self.selection = selection;
            events.push(SelectionEvent::TimeSelectionChanged(selection));
        }
    }

    pub(crate) fn set_selected_tracks(&mut self, tracks: Vec<usize>, events: &mut Vec<SelectionEvent>) {
        if self.selected_tracks != tracks {
            self.selected_tracks = tracks.clone();
            events.push(SelectionEvent::SelectedTracksChanged(tracks));
        }
    }

    /// Start a drag from a pointer-down that did not start a spectral drag
    pub fn pointer_down(
        &mut self,
        layout: &TimelineLayout<'_>,
        x: f64,
        y: f64,
        config: &InteractionConfig,
        events: &mut Vec<SelectionEvent>,
    ) {
        let geometry = layout.geometry;
        let track_index = geometry.track_index_at(y);

        if let Some(selection) = self.selection {
            let start_x = geometry.time_to_x(selection.start_time);
            let end_x = geometry.time_to_x(selection.end_time);
            let mode = if (x - start_x).abs() <= config.edge_threshold {
                Some(TimeDragMode::ResizeStart)
            } else if (x - end_x).abs() <= config.edge_threshold {
                Some(TimeDragMode::ResizeEnd)
            } else {
                None
            };

            if let Some(mode) = mode {
                log::debug!("time-selection: {:?} from {:?}", mode, selection);
                self.drag = Some(TimeDragState {
                    mode,
                    start_x: x,
                    current_x: x,
                    start_track_index: track_index,
                    initial_selection: Some(selection),
                    initial_selected_tracks: self.selected_tracks.clone(),
                    started_inside_clip: false,
                    fixed_time_bounds: None,
                    materialized: true,
                });
                return;
            }
        }

        let started_inside_clip = layout
            .clip_at(x, y)
            .and_then(|(index, _)| layout.track(index))
            .is_some_and(|track| track.view_mode.supports_spectral());

        log::debug!(
            "time-selection: create at x={:.1} track={} inside_clip={}",
            x,
            track_index,
            started_inside_clip
        );

        self.drag = Some(TimeDragState {
            mode: TimeDragMode::Create,
            start_x: x,
            current_x: x,
            start_track_index: track_index,
            initial_selection: None,
            initial_selected_tracks: self.selected_tracks.clone(),
            started_inside_clip,
            fixed_time_bounds: None,
            materialized: false,
        });
        self.set_selection(None, events);
    }

    /// Restart as a create drag anchored at `anchor_x`, continuing a gesture
    /// that left a spectral clip
    ///
    /// The selection is materialized immediately and stays eligible for
    /// conversion back to spectral.
    #[allow(clippy::too_many_arguments)]
    pub fn begin_from_conversion(
        &mut self,
        layout: &TimelineLayout<'_>,
        anchor_x: f64,
        start_track_index: usize,
        fixed_time_bounds: Option<TimeSelection>,
        pointer_x: f64,
        pointer_y: f64,
        config: &InteractionConfig,
        events: &mut Vec<SelectionEvent>,
    ) {
        self.drag = Some(TimeDragState {
            mode: TimeDragMode::Create,
            start_x: anchor_x,
            current_x: pointer_x,
            start_track_index,
            initial_selection: None,
            initial_selected_tracks: self.selected_tracks.clone(),
            started_inside_clip: true,
            fixed_time_bounds: fixed_time_bounds.map(TimeSelection::normalized),
            materialized: true,
        });
        self.pointer_move(layout, pointer_x, pointer_y, config, events);
    }

    /// Clip the pointer re-entered while a convertible create drag is active
    pub fn reentry_candidate(&self, layout: &TimelineLayout<'_>, x: f64, y: f64) -> Option<(usize, ClipId)> {
        let drag = self.drag.as_ref()?;
        if drag.mode != TimeDragMode::Create || !drag.started_inside_clip || !layout.spectral_enabled {
            return None;
        }
        layout
            .spectral_clip_at(x, y)
            .map(|(track_index, clip)| (track_index, clip.id))
    }

    pub fn pointer_move(
        &mut self,
        layout: &TimelineLayout<'_>,
        x: f64,
        y: f64,
        config: &InteractionConfig,
        events: &mut Vec<SelectionEvent>,
    ) {
        let geometry = layout.geometry;
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.current_x = x;

        match drag.mode {
            TimeDragMode::ResizeStart | TimeDragMode::ResizeEnd => {
                let Some(initial) = drag.initial_selection else {
                    return;
                };
                let fixed = if drag.mode == TimeDragMode::ResizeStart {
                    initial.end_time
                } else {
                    initial.start_time
                };
                let moving = geometry.x_to_time(x).max(0.0);
                let selection = TimeSelection::new(fixed.min(moving), fixed.max(moving));
                log::trace!("time-selection: resize -> {:?}", selection);
                self.set_selection(Some(selection), events);
            }
            TimeDragMode::Create => {
                if !drag.materialized {
                    if (x - drag.start_x).abs() <= config.create_dead_zone {
                        return;
                    }
                    drag.materialized = true;
                }

                let selection = drag
                    .fixed_time_bounds
                    .unwrap_or_else(|| {
                        TimeSelection::new(geometry.x_to_time(drag.start_x), geometry.x_to_time(x))
                    })
                    .normalized();
                let tracks = track_span(geometry, drag.start_track_index, geometry.track_index_at(y));

                log::trace!("time-selection: create -> {:?} tracks {:?}", selection, tracks);
                self.set_selection(Some(selection), events);
                self.set_selected_tracks(tracks, events);
            }
        }
    }

    /// Finish the drag; a release without an active drag is a no-op
    pub fn pointer_up(
        &mut self,
        layout: &TimelineLayout<'_>,
        y: f64,
        now: Instant,
        events: &mut Vec<SelectionEvent>,
    ) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let geometry = layout.geometry;

        log::debug!("time-selection: {:?} finished with {:?}", drag.mode, self.selection);
        events.push(SelectionEvent::TimeSelectionFinalized(self.selection));

        self.focused_track = geometry.clamp_track_index(geometry.track_index_at(y));
        events.push(SelectionEvent::FocusedTrackChanged(self.focused_track));

        self.drag_finished_at = Some(now);
    }

    /// End the active drag without finalizing (hand-off to spectral)
    pub(crate) fn abandon_drag(&mut self) {
        self.drag = None;
    }

    /// Whether a click at `now` falls inside the post-drag suppression window
    pub fn is_click_suppressed_at(&self, now: Instant, window: Duration) -> bool {
        self.drag_finished_at
            .is_some_and(|finished| now.saturating_duration_since(finished) < window)
    }

    /// Cursor for the active drag or for hovering a selection edge
    pub fn cursor_style(&self, geometry: &TimelineGeometry, x: f64, config: &InteractionConfig) -> Option<CursorStyle> {
        if let Some(drag) = &self.drag {
            return Some(match drag.mode {
                TimeDragMode::Create => CursorStyle::Text,
                TimeDragMode::ResizeStart | TimeDragMode::ResizeEnd => CursorStyle::EwResize,
            });
        }

        let selection = self.selection?;
        let near_edge = [selection.start_time, selection.end_time]
            .iter()
            .any(|&t| (x - geometry.time_to_x(t)).abs() <= config.edge_threshold);
        near_edge.then_some(CursorStyle::EwResize)
    }
}

/// Inclusive track range between two (possibly out-of-range) indices
fn track_span(geometry: &TimelineGeometry, from: usize, to: usize) -> Vec<usize> {
    let Some(a) = geometry.clamp_track_index(from) else {
        return Vec::new();
    };
    let b = geometry.clamp_track_index(to).unwrap_or(a);
    (a.min(b)..=a.max(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Clip, Track, TrackViewMode};

    fn geometry() -> TimelineGeometry {
        // Tracks at y 0..100, 100..200, 200..300
        TimelineGeometry::new(100.0, 0.0, vec![100.0, 100.0, 100.0], 0.0, 0.0, 20.0).unwrap()
    }

    fn tracks() -> Vec<Track> {
        vec![
            Track::new(1, TrackViewMode::Waveform).with_clip(Clip::new(1, 0.0, 10.0)),
            Track::new(2, TrackViewMode::Split).with_clip(Clip::new(2, 0.0, 10.0)),
            Track::new(3, TrackViewMode::Waveform),
        ]
    }

    #[test]
    fn test_create_respects_dead_zone() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        let mut events = Vec::new();

        machine.pointer_down(&layout, 200.0, 50.0, &config, &mut events);
        assert!(events.is_empty());
        assert_eq!(machine.drag().map(|d| d.mode), Some(TimeDragMode::Create));

        machine.pointer_move(&layout, 204.0, 50.0, &config, &mut events);
        assert!(machine.selection().is_none());

        machine.pointer_move(&layout, 150.0, 50.0, &config, &mut events);
        assert_eq!(machine.selection(), Some(TimeSelection::new(1.5, 2.0)));
        assert_eq!(
            events,
            vec![
                SelectionEvent::TimeSelectionChanged(Some(TimeSelection::new(1.5, 2.0))),
                SelectionEvent::SelectedTracksChanged(vec![0]),
            ]
        );
    }

    #[test]
    fn test_create_spans_tracks() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        let mut events = Vec::new();

        machine.pointer_down(&layout, 100.0, 250.0, &config, &mut events);
        machine.pointer_move(&layout, 300.0, 20.0, &config, &mut events);
        assert_eq!(machine.selected_tracks(), &[0, 1, 2]);

        // Past the last track clamps
        machine.pointer_move(&layout, 300.0, 900.0, &config, &mut events);
        assert_eq!(machine.selected_tracks(), &[2]);
    }

    #[test]
    fn test_resize_start_inverts_past_end() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        machine.sync(Some(TimeSelection::new(2.0, 5.0)), &[0, 1]);
        let mut events = Vec::new();

        machine.pointer_down(&layout, 202.0, 50.0, &config, &mut events);
        assert_eq!(machine.drag().map(|d| d.mode), Some(TimeDragMode::ResizeStart));

        machine.pointer_move(&layout, 700.0, 50.0, &config, &mut events);
        assert_eq!(machine.selection(), Some(TimeSelection::new(5.0, 7.0)));
        // Track set preserved
        assert_eq!(machine.selected_tracks(), &[0, 1]);
    }

    #[test]
    fn test_resize_end_clamps_to_zero() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        machine.sync(Some(TimeSelection::new(2.0, 5.0)), &[0]);
        let mut events = Vec::new();

        machine.pointer_down(&layout, 497.0, 50.0, &config, &mut events);
        assert_eq!(machine.drag().map(|d| d.mode), Some(TimeDragMode::ResizeEnd));

        machine.pointer_move(&layout, -50.0, 50.0, &config, &mut events);
        assert_eq!(machine.selection(), Some(TimeSelection::new(0.0, 2.0)));
    }

    #[test]
    fn test_pointer_up_finalizes_and_focuses() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        let mut events = Vec::new();

        machine.pointer_down(&layout, 100.0, 50.0, &config, &mut events);
        machine.pointer_move(&layout, 400.0, 50.0, &config, &mut events);
        events.clear();

        let now = Instant::now();
        machine.pointer_up(&layout, 1000.0, now, &mut events);
        assert_eq!(
            events,
            vec![
                SelectionEvent::TimeSelectionFinalized(Some(TimeSelection::new(1.0, 4.0))),
                SelectionEvent::FocusedTrackChanged(Some(2)),
            ]
        );
        assert!(!machine.is_dragging());

        let window = config.click_suppress_duration();
        assert!(machine.is_click_suppressed_at(now + Duration::from_millis(10), window));
        assert!(!machine.is_click_suppressed_at(now + Duration::from_millis(60), window));

        // Stale release is a no-op
        events.clear();
        machine.pointer_up(&layout, 50.0, now, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_create_clears_existing_selection() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        machine.sync(Some(TimeSelection::new(2.0, 5.0)), &[0]);
        let mut events = Vec::new();

        machine.pointer_down(&layout, 800.0, 50.0, &config, &mut events);
        assert_eq!(events, vec![SelectionEvent::TimeSelectionChanged(None)]);
    }

    #[test]
    fn test_started_inside_clip_requires_spectral_track() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        let mut events = Vec::new();

        machine.pointer_down(&layout, 100.0, 50.0, &config, &mut events);
        assert_eq!(machine.drag().map(|d| d.started_inside_clip), Some(false));

        // Bottom (waveform) half of a split clip
        machine.pointer_down(&layout, 100.0, 180.0, &config, &mut events);
        assert_eq!(machine.drag().map(|d| d.started_inside_clip), Some(true));
        // Spectral area of the same clip is a re-entry candidate
        assert_eq!(machine.reentry_candidate(&layout, 150.0, 130.0), Some((1, ClipId(2))));
        assert_eq!(machine.reentry_candidate(&layout, 150.0, 180.0), None);
    }

    #[test]
    fn test_fixed_bounds_ignore_horizontal_motion() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let config = InteractionConfig::default();
        let mut machine = TimeSelectionMachine::new();
        let mut events = Vec::new();

        machine.begin_from_conversion(
            &layout,
            300.0,
            1,
            Some(TimeSelection::new(3.0, 4.0)),
            900.0,
            250.0,
            &config,
            &mut events,
        );
        assert_eq!(machine.selection(), Some(TimeSelection::new(3.0, 4.0)));
        assert_eq!(machine.selected_tracks(), &[1, 2]);

        machine.pointer_move(&layout, 50.0, 50.0, &config, &mut events);
        assert_eq!(machine.selection(), Some(TimeSelection::new(3.0, 4.0)));
        assert_eq!(machine.selected_tracks(), &[0, 1]);
    }
}
