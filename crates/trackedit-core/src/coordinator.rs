//! Selection-mode coordinator
//!
//! Routes pointer events to the time- or spectral-selection machine and runs
//! the hand-off between them:
//!
//! - spectral → time: the spectral drag left its clip. The selection before
//!   leaving and the original drag are cached, and the time machine continues
//!   the gesture anchored at the fixed edge.
//! - time → spectral: a create drag that started inside a clip re-enters a
//!   spectral area. With a cache, only the exact original clip restores it.
//!   Without one, a full-range spectral selection is created.
//!
//! At most one machine owns a drag at any time.

use std::time::Instant;

use crate::config::InteractionConfig;
use crate::coords::TimelineLayout;
use crate::events::SelectionEvent;
use crate::spectral_selection::{
    SpectralDragMode, SpectralDragState, SpectralMove, SpectralSelectionMachine, TimeAnchor,
};
use crate::time_selection::TimeSelectionMachine;
use crate::types::{ClipId, CursorStyle, SpectralSelection, TimeSelection};

/// Snapshot taken when a spectral drag converts to a time drag
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionCache {
    /// Spectral selection right before the pointer left the clip
    pub selection: Option<SpectralSelection>,
    /// Drag as it was started, including its original start position
    pub drag: SpectralDragState,
}

impl ConversionCache {
    pub fn is_for_clip(&self, track_index: usize, clip_id: ClipId) -> bool {
        self.drag.track_index == track_index && self.drag.clip_id == clip_id
    }
}

/// Whether a time drag re-entering `(track_index, clip_id)` may become spectral
///
/// A cached conversion only restores into its own clip. Without a cache the
/// conversion is allowed unless the gesture already left clip bounds.
pub fn may_convert_to_spectral(
    left_clip_bounds: bool,
    cache: Option<&ConversionCache>,
    track_index: usize,
    clip_id: ClipId,
) -> bool {
    match cache {
        Some(cache) => cache.is_for_clip(track_index, clip_id),
        None => !left_clip_bounds,
    }
}

/// Single entry point for selection gestures on the track area
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    config: InteractionConfig,
    time: TimeSelectionMachine,
    spectral: SpectralSelectionMachine,
    cache: Option<ConversionCache>,
    left_clip_bounds: bool,
}

impl SelectionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn configure(&mut self, config: InteractionConfig) {
        self.config = config;
    }

    pub fn time_selection(&self) -> Option<TimeSelection> {
        self.time.selection()
    }

    pub fn spectral_selection(&self) -> Option<SpectralSelection> {
        self.spectral.selection()
    }

    pub fn selected_tracks(&self) -> &[usize] {
        self.time.selected_tracks()
    }

    pub fn focused_track(&self) -> Option<usize> {
        self.time.focused_track()
    }

    pub fn time_machine(&self) -> &TimeSelectionMachine {
        &self.time
    }

    pub fn spectral_machine(&self) -> &SpectralSelectionMachine {
        &self.spectral
    }

    pub fn conversion_cache(&self) -> Option<&ConversionCache> {
        self.cache.as_ref()
    }

    pub fn left_clip_bounds(&self) -> bool {
        self.left_clip_bounds
    }

    pub fn is_dragging(&self) -> bool {
        self.time.is_dragging() || self.spectral.is_dragging()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Host sync
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the time selection (ignored while a time drag is active)
    pub fn set_time_selection(&mut self, selection: Option<TimeSelection>) {
        if !self.time.is_dragging() {
            let tracks = self.time.selected_tracks().to_vec();
            self.time.sync(selection, &tracks);
        }
    }

    /// Replace the selected tracks (ignored while a time drag is active)
    pub fn set_selected_tracks(&mut self, tracks: &[usize]) {
        if !self.time.is_dragging() {
            let selection = self.time.selection();
            self.time.sync(selection, tracks);
        }
    }

    /// Replace the spectral selection (ignored while a spectral drag is active)
    pub fn set_spectral_selection(&mut self, selection: Option<SpectralSelection>) {
        if !self.spectral.is_dragging() {
            self.spectral.sync(selection);
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_time_selection(None);
        self.set_spectral_selection(None);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer events
    // ─────────────────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, layout: &TimelineLayout<'_>, x: f64, y: f64) -> Vec<SelectionEvent> {
        let mut events = Vec::new();
        self.cache = None;
        self.left_clip_bounds = false;

        // A release we never saw leaves a stale drag behind
        if self.is_dragging() {
            log::warn!("selection: pointer down during an active drag, abandoning it");
            self.spectral.abandon_drag();
            self.time.abandon_drag();
        }

        if layout.spectral_enabled
            && self
                .spectral
                .pointer_down(layout, x, y, &self.config, &mut events)
        {
            self.time.set_selection(None, &mut events);
        } else {
            self.time.pointer_down(layout, x, y, &self.config, &mut events);
            self.spectral.set_selection(None, &mut events);
        }
        events
    }

    pub fn pointer_move(&mut self, layout: &TimelineLayout<'_>, x: f64, y: f64) -> Vec<SelectionEvent> {
        let mut events = Vec::new();

        if self.spectral.is_dragging() {
            if let SpectralMove::ConvertToTime(request) = self.spectral.pointer_move(layout, x, y, &mut events) {
                let (anchor_x, fixed) = match request.anchor {
                    TimeAnchor::Edge(time) => (layout.geometry.time_to_x(time), None),
                    TimeAnchor::Fixed(bounds) => (layout.geometry.time_to_x(bounds.start_time), Some(bounds)),
                };
                let start_track_index = request.drag.track_index;
                self.cache = Some(ConversionCache {
                    selection: request.selection_before,
                    drag: request.drag,
                });
                self.left_clip_bounds = true;
                self.time.begin_from_conversion(
                    layout,
                    anchor_x,
                    start_track_index,
                    fixed,
                    x,
                    y,
                    &self.config,
                    &mut events,
                );
            }
        } else if self.time.is_dragging() {
            if let Some((track_index, clip_id)) = self.time.reentry_candidate(layout, x, y) {
                if self.convert_to_spectral(layout, track_index, clip_id, x, y, &mut events) {
                    return events;
                }
            }
            self.time.pointer_move(layout, x, y, &self.config, &mut events);
        }
        events
    }

    pub fn pointer_up(&mut self, layout: &TimelineLayout<'_>, y: f64) -> Vec<SelectionEvent> {
        self.pointer_up_at(layout, y, Instant::now())
    }

    pub fn pointer_up_at(&mut self, layout: &TimelineLayout<'_>, y: f64, now: Instant) -> Vec<SelectionEvent> {
        let mut events = Vec::new();
        self.spectral.pointer_up(&mut events);
        self.time.pointer_up(layout, y, now, &mut events);
        self.cache = None;
        self.left_clip_bounds = false;
        events
    }

    /// Hand a time create drag over to the spectral machine
    fn convert_to_spectral(
        &mut self,
        layout: &TimelineLayout<'_>,
        track_index: usize,
        clip_id: ClipId,
        x: f64,
        y: f64,
        events: &mut Vec<SelectionEvent>,
    ) -> bool {
        if !may_convert_to_spectral(self.left_clip_bounds, self.cache.as_ref(), track_index, clip_id) {
            return false;
        }

        if let Some(cache) = self.cache.take() {
            if let Some(selection) = cache.selection {
                log::debug!("selection: restoring spectral selection on {}", clip_id);
                self.time.abandon_drag();
                self.time.set_selection(None, events);
                let drag = SpectralDragState {
                    current_x: x,
                    current_y: y,
                    ..cache.drag
                };
                self.spectral.resume(drag, selection, events);
                self.left_clip_bounds = false;
                return true;
            }
            // Nothing to restore; behave like a fresh gesture
            self.left_clip_bounds = false;
        }

        let Some(clip) = layout.clip(track_index, clip_id) else {
            return false;
        };
        if !layout
            .track(track_index)
            .is_some_and(|track| track.view_mode.supports_spectral())
        {
            return false;
        }
        let Some(drag) = self.time.drag() else {
            return false;
        };

        let geometry = layout.geometry;
        let time_range = self
            .time
            .selection()
            .unwrap_or_else(|| TimeSelection::new(geometry.x_to_time(drag.start_x), geometry.x_to_time(x)))
            .normalized();
        let start_time = time_range.start_time.max(clip.start);
        let end_time = time_range.end_time.min(clip.end()).max(start_time);

        let selection = SpectralSelection {
            track_index,
            clip_id,
            start_time,
            end_time,
            min_frequency: 0.0,
            max_frequency: 1.0,
        };

        // Continue as a resize of whichever time edge is closer to the pointer
        let to_start = (x - geometry.time_to_x(start_time)).abs();
        let to_end = (x - geometry.time_to_x(end_time)).abs();
        let mode = if to_start <= to_end {
            SpectralDragMode::ResizeLeft
        } else {
            SpectralDragMode::ResizeRight
        };

        log::debug!(
            "selection: time drag entered {} on track {}, converting to spectral {:?}",
            clip_id,
            track_index,
            mode
        );

        self.time.abandon_drag();
        self.time.set_selection(None, events);
        self.spectral.resume(
            SpectralDragState {
                mode,
                track_index,
                clip_id,
                start_x: x,
                start_y: y,
                current_x: x,
                current_y: y,
                initial_selection: Some(selection),
            },
            selection,
            events,
        );
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Pointer icon for the current drag or hover position
    pub fn cursor_style(&self, layout: &TimelineLayout<'_>, x: f64, y: f64) -> CursorStyle {
        if self.spectral.is_dragging() || layout.spectral_enabled {
            if let Some(cursor) = self.spectral.cursor_style(layout, x, y, &self.config) {
                return cursor;
            }
        }
        if let Some(cursor) = self.time.cursor_style(layout.geometry, x, &self.config) {
            return cursor;
        }
        if layout.spectral_enabled && layout.spectral_clip_at(x, y).is_some() {
            return CursorStyle::Crosshair;
        }
        CursorStyle::Default
    }

    /// Whether a click arriving now follows a drag too closely
    pub fn is_click_suppressed(&self) -> bool {
        self.is_click_suppressed_at(Instant::now())
    }

    pub fn is_click_suppressed_at(&self, now: Instant) -> bool {
        self.time
            .is_click_suppressed_at(now, self.config.click_suppress_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::TimelineGeometry;
    use crate::types::{Clip, Track, TrackViewMode};
    use std::time::Duration;

    // Track 0: spectrogram, body y 20..220, clips x 0..1000 and 1200..2000
    // Track 1: split, body y 240..440, spectral half 240..340, clip x 0..1000
    fn geometry() -> TimelineGeometry {
        TimelineGeometry::new(100.0, 0.0, vec![220.0, 220.0], 0.0, 0.0, 20.0).unwrap()
    }

    fn tracks() -> Vec<Track> {
        vec![
            Track::new(1, TrackViewMode::Spectrogram)
                .with_clip(Clip::new(1, 0.0, 10.0))
                .with_clip(Clip::new(2, 12.0, 8.0)),
            Track::new(2, TrackViewMode::Split).with_clip(Clip::new(3, 0.0, 10.0)),
        ]
    }

    #[test]
    fn test_spectral_create_converts_to_time_when_leaving_clip() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        let events = controller.pointer_down(&layout, 150.0, 120.0);
        assert!(matches!(
            events.as_slice(),
            [SelectionEvent::SpectralSelectionChanged(Some(_))]
        ));
        controller.pointer_move(&layout, 550.0, 60.0);
        assert!(controller.spectral_selection().is_some());

        let events = controller.pointer_move(&layout, 1100.0, 60.0);
        assert_eq!(events[0], SelectionEvent::SpectralSelectionChanged(None));
        assert_eq!(
            events[1],
            SelectionEvent::TimeSelectionChanged(Some(TimeSelection::new(1.5, 11.0)))
        );
        assert!(controller.left_clip_bounds());
        assert!(controller.conversion_cache().is_some());
        assert!(controller.time_machine().is_dragging());
        assert!(!controller.spectral_machine().is_dragging());

        // Anchor stays at the original start while the pointer keeps moving
        controller.pointer_move(&layout, 1150.0, 60.0);
        assert_eq!(controller.time_selection(), Some(TimeSelection::new(1.5, 11.5)));
    }

    #[test]
    fn test_reentering_original_clip_restores_spectral() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        controller.pointer_down(&layout, 150.0, 120.0);
        controller.pointer_move(&layout, 550.0, 60.0);
        let before = controller.spectral_selection();
        controller.pointer_move(&layout, 1100.0, 60.0);

        let events = controller.pointer_move(&layout, 800.0, 60.0);
        assert_eq!(
            events,
            vec![
                SelectionEvent::TimeSelectionChanged(None),
                SelectionEvent::SpectralSelectionChanged(before),
            ]
        );
        assert!(controller.spectral_machine().is_dragging());
        assert!(!controller.left_clip_bounds());

        // The create drag resumes from its original start
        controller.pointer_move(&layout, 700.0, 60.0);
        let sel = controller.spectral_selection().unwrap();
        assert_eq!((sel.start_time, sel.end_time), (1.5, 7.0));
    }

    #[test]
    fn test_entering_a_different_clip_stays_time() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        controller.pointer_down(&layout, 150.0, 120.0);
        controller.pointer_move(&layout, 1100.0, 60.0);
        controller.pointer_move(&layout, 1500.0, 60.0);

        assert!(controller.spectral_selection().is_none());
        assert_eq!(controller.time_selection(), Some(TimeSelection::new(1.5, 15.0)));

        let now = Instant::now();
        let events = controller.pointer_up_at(&layout, 60.0, now);
        assert_eq!(
            events,
            vec![
                SelectionEvent::TimeSelectionFinalized(Some(TimeSelection::new(1.5, 15.0))),
                SelectionEvent::FocusedTrackChanged(Some(0)),
            ]
        );
        assert!(!controller.left_clip_bounds());
        assert!(controller.conversion_cache().is_none());
        assert!(controller.is_click_suppressed_at(now + Duration::from_millis(20)));
    }

    #[test]
    fn test_fresh_time_drag_converts_with_full_frequency_range() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        // Waveform half of the split clip
        controller.pointer_down(&layout, 150.0, 400.0);
        assert!(controller.time_machine().is_dragging());
        controller.pointer_move(&layout, 400.0, 400.0);
        assert_eq!(controller.time_selection(), Some(TimeSelection::new(1.5, 4.0)));

        let events = controller.pointer_move(&layout, 400.0, 300.0);
        let expected = SpectralSelection {
            track_index: 1,
            clip_id: ClipId(3),
            start_time: 1.5,
            end_time: 4.0,
            min_frequency: 0.0,
            max_frequency: 1.0,
        };
        assert_eq!(
            events,
            vec![
                SelectionEvent::TimeSelectionChanged(None),
                SelectionEvent::SpectralSelectionChanged(Some(expected)),
            ]
        );
        assert_eq!(
            controller.spectral_machine().drag().map(|d| d.mode),
            Some(SpectralDragMode::ResizeRight)
        );

        controller.pointer_move(&layout, 600.0, 300.0);
        let sel = controller.spectral_selection().unwrap();
        assert_eq!((sel.start_time, sel.end_time), (1.5, 6.0));

        let events = controller.pointer_up(&layout, 300.0);
        assert_eq!(
            events,
            vec![SelectionEvent::SpectralSelectionFinalized(Some(sel))]
        );
    }

    #[test]
    fn test_spectral_disabled_falls_back_to_time() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t).with_spectral(false);
        let mut controller = SelectionController::default();

        controller.pointer_down(&layout, 150.0, 120.0);
        assert!(controller.time_machine().is_dragging());
        controller.pointer_move(&layout, 550.0, 120.0);
        assert_eq!(controller.time_selection(), Some(TimeSelection::new(1.5, 5.5)));
        assert_eq!(controller.cursor_style(&layout, 550.0, 120.0), CursorStyle::Text);
    }

    #[test]
    fn test_starting_one_mode_clears_the_other() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();
        controller.set_time_selection(Some(TimeSelection::new(1.0, 2.0)));

        let events = controller.pointer_down(&layout, 500.0, 120.0);
        assert_eq!(events[1], SelectionEvent::TimeSelectionChanged(None));
        controller.pointer_move(&layout, 600.0, 100.0);
        controller.pointer_up(&layout, 100.0);
        assert!(controller.spectral_selection().is_some());

        // Header row is not a spectral area: time drag clears spectral
        let events = controller.pointer_down(&layout, 300.0, 10.0);
        assert!(events.contains(&SelectionEvent::SpectralSelectionChanged(None)));
        assert!(controller.spectral_selection().is_none());
    }

    #[test]
    fn test_leaving_split_spectral_half_converts_to_time() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        assert!(matches!(
            controller.pointer_down(&layout, 150.0, 280.0).as_slice(),
            [SelectionEvent::SpectralSelectionChanged(Some(_))]
        ));
        controller.pointer_move(&layout, 400.0, 300.0);
        assert!(controller.spectral_machine().is_dragging());

        // Still inside the clip body, but below the split line
        let events = controller.pointer_move(&layout, 400.0, 380.0);
        assert_eq!(events[0], SelectionEvent::SpectralSelectionChanged(None));
        assert!(!controller.spectral_machine().is_dragging());
        assert!(controller.time_machine().is_dragging());
        assert_eq!(
            controller.time_selection().map(|s| s.start_time),
            Some(1.5)
        );
    }

    #[test]
    fn test_pointer_down_abandons_unreleased_drag() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        controller.pointer_down(&layout, 150.0, 60.0);
        assert!(controller.spectral_machine().is_dragging());

        // Release was lost; the next press lands on the split track's waveform half
        controller.pointer_down(&layout, 150.0, 400.0);
        assert!(!controller.spectral_machine().is_dragging());
        assert!(controller.time_machine().is_dragging());

        controller.pointer_move(&layout, 450.0, 400.0);
        assert!(controller.spectral_selection().is_none());
        assert_eq!(controller.time_selection(), Some(TimeSelection::new(1.5, 4.5)));
    }

    #[test]
    fn test_cursor_styles() {
        let g = geometry();
        let t = tracks();
        let layout = TimelineLayout::new(&g, &t);
        let mut controller = SelectionController::default();

        assert_eq!(controller.cursor_style(&layout, 500.0, 120.0), CursorStyle::Crosshair);
        assert_eq!(controller.cursor_style(&layout, 500.0, 10.0), CursorStyle::Default);

        controller.set_time_selection(Some(TimeSelection::new(2.0, 5.0)));
        assert_eq!(controller.cursor_style(&layout, 501.0, 10.0), CursorStyle::EwResize);
    }

    #[test]
    fn test_conversion_precondition() {
        let drag = SpectralDragState {
            mode: SpectralDragMode::Create,
            track_index: 0,
            clip_id: ClipId(1),
            start_x: 0.0,
            start_y: 0.0,
            current_x: 0.0,
            current_y: 0.0,
            initial_selection: None,
        };
        let cache = ConversionCache { selection: None, drag };

        assert!(may_convert_to_spectral(false, None, 3, ClipId(9)));
        assert!(!may_convert_to_spectral(true, None, 0, ClipId(1)));
        assert!(may_convert_to_spectral(true, Some(&cache), 0, ClipId(1)));
        assert!(!may_convert_to_spectral(true, Some(&cache), 0, ClipId(2)));
        assert!(!may_convert_to_spectral(true, Some(&cache), 1, ClipId(1)));
    }
}
