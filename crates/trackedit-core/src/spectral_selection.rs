//! Spectral-selection drag state machine
//!
//! A spectral selection is a time x frequency rectangle bound to one clip.
//!
//! ```text
//! idle ──down in clip spectral area──► create ──────────────┐
//!      ──down on selection center────► move ────────────────┼──up──► idle
//!      ──down on edge / corner───────► resize-{edge,corner} ┘
//!                    │
//!                    └─ pointer leaves the clip ──► ConvertToTime
//! ```
//!
//! Leaving the clip never clamps: the gesture is handed to the time-selection
//! machine through a [`ConversionRequest`].

use crate::config::InteractionConfig;
use crate::coords::TimelineLayout;
use crate::events::SelectionEvent;
use crate::geometry::{Corner, Edge, SelectionHit, SelectionRect};
use crate::types::{ClipId, CursorStyle, SpectralSelection, TimeSelection};

/// Active spectral drag mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralDragMode {
    Create,
    Move,
    ResizeLeft,
    ResizeRight,
    ResizeTop,
    ResizeBottom,
    ResizeTopLeft,
    ResizeTopRight,
    ResizeBottomLeft,
    ResizeBottomRight,
}

impl SpectralDragMode {
    pub fn from_hit(hit: SelectionHit) -> Self {
        match hit {
            SelectionHit::Move => Self::Move,
            SelectionHit::Edge(Edge::Left) => Self::ResizeLeft,
            SelectionHit::Edge(Edge::Right) => Self::ResizeRight,
            SelectionHit::Edge(Edge::Top) => Self::ResizeTop,
            SelectionHit::Edge(Edge::Bottom) => Self::ResizeBottom,
            SelectionHit::Corner(Corner::TopLeft) => Self::ResizeTopLeft,
            SelectionHit::Corner(Corner::TopRight) => Self::ResizeTopRight,
            SelectionHit::Corner(Corner::BottomLeft) => Self::ResizeBottomLeft,
            SelectionHit::Corner(Corner::BottomRight) => Self::ResizeBottomRight,
        }
    }

    /// Cursor while this mode is active
    pub fn cursor(self) -> CursorStyle {
        match self {
            Self::Create => CursorStyle::Crosshair,
            Self::Move => CursorStyle::Grabbing,
            Self::ResizeLeft | Self::ResizeRight => CursorStyle::EwResize,
            Self::ResizeTop | Self::ResizeBottom => CursorStyle::NsResize,
            Self::ResizeTopLeft | Self::ResizeBottomRight => CursorStyle::NwseResize,
            Self::ResizeTopRight | Self::ResizeBottomLeft => CursorStyle::NeswResize,
        }
    }
}

/// Ephemeral state between pointer-down and pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralDragState {
    pub mode: SpectralDragMode,
    pub track_index: usize,
    pub clip_id: ClipId,
    pub start_x: f64,
    pub start_y: f64,
    pub current_x: f64,
    pub current_y: f64,
    pub initial_selection: Option<SpectralSelection>,
}

/// How the continued time drag is anchored after leaving the clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeAnchor {
    /// The edge at this time stays fixed; the other follows the pointer
    Edge(f64),
    /// Both bounds stay fixed (move and vertical resize gestures)
    Fixed(TimeSelection),
}

/// Hand-off from the spectral machine to the time-selection machine
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Raw time bounds, anchor edge first (not normalized)
    pub raw_start: f64,
    pub raw_end: f64,
    pub anchor: TimeAnchor,
    /// Drag that left the clip, for restoring on re-entry
    pub drag: SpectralDragState,
    /// Selection as it was right before the pointer left the clip
    pub selection_before: Option<SpectralSelection>,
}

impl ConversionRequest {
    pub fn time_selection(&self) -> TimeSelection {
        TimeSelection::new(self.raw_start, self.raw_end).normalized()
    }
}

/// Result of a pointer move
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralMove {
    /// No active drag
    Ignored,
    Updated,
    ConvertToTime(ConversionRequest),
}

/// Spectral selection plus the active drag, if any
#[derive(Debug, Clone, Default)]
pub struct SpectralSelectionMachine {
    selection: Option<SpectralSelection>,
    drag: Option<SpectralDragState>,
}

impl SpectralSelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<SpectralSelection> {
        self.selection
    }

    pub fn drag(&self) -> Option<&SpectralDragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Replace the selection without emitting events (host sync)
    pub fn sync(&mut self, selection: Option<SpectralSelection>) {
        self.selection = selection.map(SpectralSelection::normalized);
    }

    pub(crate) fn set_selection(
        &mut self,
        selection: Option<SpectralSelection>,
        events: &mut Vec<SelectionEvent>,
    ) {
        if self.selection != selection {
            self.selection = selection;
            events.push(SelectionEvent::SpectralSelectionChanged(selection));
        }
    }

    /// Pixel rectangle of a selection
    pub fn selection_rect(
        layout: &TimelineLayout<'_>,
        selection: &SpectralSelection,
    ) -> Option<SelectionRect> {
        let geometry = layout.geometry;
        let top = layout.frequency_to_y(selection.max_frequency, selection.track_index, None)?;
        let bottom = layout.frequency_to_y(selection.min_frequency, selection.track_index, None)?;
        Some(SelectionRect::new(
            geometry.time_to_x(selection.start_time),
            geometry.time_to_x(selection.end_time),
            top,
            bottom,
        ))
    }

    /// Affordance of the current selection under the pointer
    pub fn hit_test(
        &self,
        layout: &TimelineLayout<'_>,
        x: f64,
        y: f64,
        config: &InteractionConfig,
    ) -> Option<SelectionHit> {
        let selection = self.selection?;
        Self::selection_rect(layout, &selection)?.hit_test(
            x,
            y,
            config.edge_threshold,
            config.corner_size,
        )
    }

    /// Try to start a spectral drag
    ///
    /// Returns false when the pointer is neither on the selection's
    /// affordances nor inside a spectral clip area.
    pub fn pointer_down(
        &mut self,
        layout: &TimelineLayout<'_>,
        x: f64,
        y: f64,
        config: &InteractionConfig,
        events: &mut Vec<SelectionEvent>,
    ) -> bool {
        if let (Some(selection), Some(hit)) = (self.selection, self.hit_test(layout, x, y, config)) {
            let mode = SpectralDragMode::from_hit(hit);
            log::debug!("spectral: {:?} on {}", mode, selection.clip_id);
            self.drag = Some(SpectralDragState {
                mode,
                track_index: selection.track_index,
                clip_id: selection.clip_id,
                start_x: x,
                start_y: y,
                current_x: x,
                current_y: y,
                initial_selection: Some(selection),
            });
            return true;
        }

        let Some((track_index, clip)) = layout.spectral_clip_at(x, y) else {
            return false;
        };

        let time = layout.geometry.x_to_time(x);
        let frequency = layout.y_to_frequency(y, track_index, None).unwrap_or(0.0);
        log::debug!(
            "spectral: create on {} track {} at t={:.3} f={:.3}",
            clip.id,
            track_index,
            time,
            frequency
        );

        self.drag = Some(SpectralDragState {
            mode: SpectralDragMode::Create,
            track_index,
            clip_id: clip.id,
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
            initial_selection: None,
        });
        self.set_selection(
            Some(SpectralSelection {
                track_index,
                clip_id: clip.id,
                start_time: time,
                end_time: time,
                min_frequency: frequency,
                max_frequency: frequency,
            }),
            events,
        );
        true
    }

    /// Resume a drag with a given selection (conversion back from time)
    pub(crate) fn resume(
        &mut self,
        drag: SpectralDragState,
        selection: SpectralSelection,
        events: &mut Vec<SelectionEvent>,
    ) {
        log::debug!("spectral: resume {:?} on {}", drag.mode, drag.clip_id);
        self.drag = Some(drag);
        self.set_selection(Some(selection.normalized()), events);
    }

    pub fn pointer_move(
        &mut self,
        layout: &TimelineLayout<'_>,
        x: f64,
        y: f64,
        events: &mut Vec<SelectionEvent>,
    ) -> SpectralMove {
        let Some(drag) = self.drag.as_mut() else {
            return SpectralMove::Ignored;
        };
        drag.current_x = x;
        drag.current_y = y;
        let drag = drag.clone();

        let geometry = layout.geometry;
        let Some(area) = layout
            .clip(drag.track_index, drag.clip_id)
            .and_then(|clip| layout.spectral_area_rect(drag.track_index, clip))
        else {
            return SpectralMove::Ignored;
        };
        let out_x = !area.contains_x(x);
        let out_y = !area.contains_y(y);
        let time = geometry.x_to_time(x);
        let track_index = drag.track_index;
        let frequency_at = |y: f64| layout.y_to_frequency(y, track_index, None).unwrap_or(0.0);

        let Some(base) = drag.initial_selection.or(self.selection) else {
            return SpectralMove::Ignored;
        };

        let selection = match drag.mode {
            SpectralDragMode::Create => {
                let start_time = geometry.x_to_time(drag.start_x);
                if out_x || out_y {
                    return self.convert(drag, start_time, time, TimeAnchor::Edge(start_time), events);
                }
                SpectralSelection {
                    start_time,
                    end_time: time,
                    min_frequency: frequency_at(drag.start_y),
                    max_frequency: frequency_at(y),
                    ..base
                }
            }
            SpectralDragMode::Move => {
                if out_x || out_y {
                    let fixed = self.selection.unwrap_or(base).time_range();
                    return self.convert(
                        drag,
                        fixed.start_time,
                        fixed.end_time,
                        TimeAnchor::Fixed(fixed),
                        events,
                    );
                }
                let clip_start = geometry.x_to_time(area.left);
                let clip_end = geometry.x_to_time(area.right);
                let dt = ((x - drag.start_x) / geometry.pixels_per_second)
                    .max(clip_start - base.start_time)
                    .min(clip_end - base.end_time);
                let df = if area.height() > 0.0 {
                    (drag.start_y - y) / area.height()
                } else {
                    0.0
                };
                SpectralSelection {
                    start_time: base.start_time + dt,
                    end_time: base.end_time + dt,
                    min_frequency: base.min_frequency + df,
                    max_frequency: base.max_frequency + df,
                    ..base
                }
            }
            SpectralDragMode::ResizeLeft => {
                if out_x {
                    return self.convert(drag, base.end_time, time, TimeAnchor::Edge(base.end_time), events);
                }
                SpectralSelection {
                    start_time: time,
                    ..base
                }
            }
            SpectralDragMode::ResizeRight => {
                if out_x {
                    return self.convert(drag, base.start_time, time, TimeAnchor::Edge(base.start_time), events);
                }
                SpectralSelection {
                    end_time: time,
                    ..base
                }
            }
            SpectralDragMode::ResizeTop | SpectralDragMode::ResizeBottom => {
                if out_y {
                    let fixed = base.time_range();
                    return self.convert(
                        drag,
                        fixed.start_time,
                        fixed.end_time,
                        TimeAnchor::Fixed(fixed),
                        events,
                    );
                }
                // Mirror around the original center frequency
                let center = (base.min_frequency + base.max_frequency) / 2.0;
                let edge = frequency_at(y);
                let mirrored = 2.0 * center - edge;
                let (min_frequency, max_frequency) = if drag.mode == SpectralDragMode::ResizeTop {
                    (mirrored, edge)
                } else {
                    (edge, mirrored)
                };
                SpectralSelection {
                    min_frequency,
                    max_frequency,
                    ..base
                }
            }
            SpectralDragMode::ResizeTopLeft
            | SpectralDragMode::ResizeTopRight
            | SpectralDragMode::ResizeBottomLeft
            | SpectralDragMode::ResizeBottomRight => {
                let moves_left = matches!(
                    drag.mode,
                    SpectralDragMode::ResizeTopLeft | SpectralDragMode::ResizeBottomLeft
                );
                let moves_top = matches!(
                    drag.mode,
                    SpectralDragMode::ResizeTopLeft | SpectralDragMode::ResizeTopRight
                );
                let fixed_time = if moves_left { base.end_time } else { base.start_time };
                if out_x || out_y {
                    return self.convert(drag, fixed_time, time, TimeAnchor::Edge(fixed_time), events);
                }

                let mut selection = base;
                if moves_left {
                    selection.start_time = time;
                } else {
                    selection.end_time = time;
                }
                if moves_top {
                    selection.max_frequency = frequency_at(y);
                } else {
                    selection.min_frequency = frequency_at(y);
                }
                selection
            }
        };

        let selection = selection.normalized();
        log::trace!("spectral: {:?} -> {:?}", drag.mode, selection);
        self.set_selection(Some(selection), events);
        SpectralMove::Updated
    }

    fn convert(
        &mut self,
        drag: SpectralDragState,
        raw_start: f64,
        raw_end: f64,
        anchor: TimeAnchor,
        events: &mut Vec<SelectionEvent>,
    ) -> SpectralMove {
        log::debug!(
            "spectral: {:?} left {} on track {}, converting to time selection",
            drag.mode,
            drag.clip_id,
            drag.track_index
        );
        let selection_before = self.selection;
        self.drag = None;
        self.set_selection(None, events);
        SpectralMove::ConvertToTime(ConversionRequest {
            raw_start,
            raw_end,
            anchor,
            drag,
            selection_before,
        })
    }

    /// Finish the drag; a release without an active drag is a no-op
    pub fn pointer_up(&mut self, events: &mut Vec<SelectionEvent>) {
        if let Some(drag) = self.drag.take() {
            log::debug!("spectral: {:?} finished with {:?}", drag.mode, self.selection);
            events.push(SelectionEvent::SpectralSelectionFinalized(self.selection));
        }
    }

    /// Drop the drag without finalizing
    pub(crate) fn abandon_drag(&mut self) {
        self.drag = None;
    }

    /// Cursor for the active drag or for hovering the selection
    pub fn cursor_style(
        &self,
        layout: &TimelineLayout<'_>,
        x: f64,
        y: f64,
        config: &InteractionConfig,
    ) -> Option<CursorStyle> {
        if let Some(drag) = &self.drag {
            return Some(drag.mode.cursor());
        }
        match self.hit_test(layout, x, y, config)? {
            SelectionHit::Move => Some(CursorStyle::Move),
            hit => Some(SpectralDragMode::from_hit(hit).cursor()),
        }
    }
}
