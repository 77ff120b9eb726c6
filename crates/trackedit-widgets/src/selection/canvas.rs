//! Canvas Program for the selection overlay
//!
//! Translates iced mouse events into [`SelectionController`] calls and
//! publishes the produced events through the `on_events` callback. The
//! controller lives in the canvas state; host selections are synced into it
//! between gestures.

use super::state::SelectionOverlayState;
use crate::cursor::mouse_interaction;
use crate::theme::{
    OverlayStyle, SPECTRAL_SELECTION_EDGE, SPECTRAL_SELECTION_FILL, TIME_SELECTION_EDGE,
    TIME_SELECTION_FILL,
};
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::{mouse, Point, Rectangle, Size, Theme};
use trackedit_core::{SelectionController, SelectionEvent, SpectralSelectionMachine};

/// Canvas state for the selection overlay
#[derive(Debug, Clone, Default)]
pub struct SelectionInteraction {
    pub controller: SelectionController,
    /// Last pointer position seen inside the window
    last_position: Option<(f64, f64)>,
}

impl SelectionInteraction {
    /// Pull host state into the controller unless a gesture owns it
    fn sync(&mut self, state: &SelectionOverlayState) {
        if self.controller.is_dragging() {
            return;
        }
        self.controller.configure(state.config.clone());
        self.controller.set_time_selection(state.time_selection);
        self.controller.set_selected_tracks(&state.selected_tracks);
        self.controller.set_spectral_selection(state.spectral_selection);
    }
}

/// Canvas program for time and spectral selection
pub struct SelectionCanvas<'a, Message, F>
where
    F: Fn(Vec<SelectionEvent>) -> Message,
{
    pub state: &'a SelectionOverlayState,
    pub on_events: F,
}

/// Pointer position relative to the canvas origin (may lie outside it)
fn local_position(cursor: mouse::Cursor, bounds: Rectangle) -> Option<(f64, f64)> {
    cursor
        .position()
        .map(|p| ((p.x - bounds.x) as f64, (p.y - bounds.y) as f64))
}

impl<'a, Message, F> Program<Message> for SelectionCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(Vec<SelectionEvent>) -> Message,
{
    type State = SelectionInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let position = local_position(cursor, bounds);
        if position.is_some() {
            interaction.last_position = position;
        }
        let layout = self.state.layout();
        interaction.sync(self.state);

        let events = match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let (x, y) = position?;
                if !cursor.is_over(bounds) {
                    return None;
                }
                interaction.controller.pointer_down(&layout, x, y)
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let (x, y) = position?;
                if !interaction.controller.is_dragging() {
                    return None;
                }
                interaction.controller.pointer_move(&layout, x, y)
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !interaction.controller.is_dragging() {
                    return None;
                }
                // Released outside the window: finish at the last known row
                let y = interaction.last_position.map_or(0.0, |(_, y)| y);
                interaction.controller.pointer_up(&layout, y)
            }
            _ => return None,
        };

        if events.is_empty() {
            if interaction.controller.is_dragging() {
                return Some(canvas::Action::capture());
            }
            return None;
        }
        Some(canvas::Action::publish((self.on_events)(events)).and_capture())
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if !cursor.is_over(bounds) && !interaction.controller.is_dragging() {
            return mouse::Interaction::default();
        }
        match local_position(cursor, bounds) {
            Some((x, y)) => mouse_interaction(
                interaction
                    .controller
                    .cursor_style(&self.state.layout(), x, y),
            ),
            None => mouse::Interaction::default(),
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let style = OverlayStyle::default();
        let state = self.state;
        let geometry = &state.geometry;

        if let Some(selection) = state.time_selection {
            let left = geometry.time_to_x(selection.start_time) as f32;
            let right = geometry.time_to_x(selection.end_time) as f32;
            let tracks: Vec<usize> = if state.selected_tracks.is_empty() {
                (0..geometry.track_count()).collect()
            } else {
                state.selected_tracks.clone()
            };

            for track_index in tracks {
                let top = geometry.track_top_y(track_index) as f32;
                let height = geometry.track_height(track_index) as f32;
                frame.fill_rectangle(
                    Point::new(left, top),
                    Size::new((right - left).max(1.0), height),
                    TIME_SELECTION_FILL,
                );
            }

            let height = state.total_height();
            for x in [left, right] {
                frame.stroke(
                    &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                    Stroke::default()
                        .with_color(TIME_SELECTION_EDGE)
                        .with_width(style.selection_edge_width),
                );
            }
        }

        if let Some(rect) = state
            .spectral_selection
            .and_then(|selection| SpectralSelectionMachine::selection_rect(&state.layout(), &selection))
        {
            let top_left = Point::new(rect.left_x as f32, rect.top_y as f32);
            let size = Size::new(
                (rect.right_x - rect.left_x) as f32,
                (rect.bottom_y - rect.top_y) as f32,
            );
            frame.fill_rectangle(top_left, size, SPECTRAL_SELECTION_FILL);
            frame.stroke(
                &Path::rectangle(top_left, size),
                Stroke::default()
                    .with_color(SPECTRAL_SELECTION_EDGE)
                    .with_width(style.selection_edge_width),
            );
        }

        vec![frame.into_geometry()]
    }
}
