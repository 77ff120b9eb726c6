//! Canvas Program for the envelope overlay

use super::state::EnvelopeOverlayState;
use crate::cursor::mouse_interaction;
use crate::theme::{ENVELOPE_LINE, ENVELOPE_POINT, ENVELOPE_POINT_HOVER, OverlayStyle};
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::{mouse, Point, Rectangle, Theme};
use trackedit_core::{db_to_y, EnvelopeEditor, EnvelopeEvent, InteractionConfig};

/// Canvas state for the envelope overlay
#[derive(Debug, Clone)]
pub struct EnvelopeInteraction {
    pub editor: EnvelopeEditor,
    /// Last pointer position seen inside the window
    last_position: Option<(f64, f64)>,
}

impl Default for EnvelopeInteraction {
    fn default() -> Self {
        Self {
            editor: EnvelopeEditor::new(0.0, InteractionConfig::default()),
            last_position: None,
        }
    }
}

impl EnvelopeInteraction {
    /// Pull host state into the editor unless a gesture owns it
    fn sync(&mut self, state: &EnvelopeOverlayState, bounds: Rectangle) {
        if self.editor.is_dragging() {
            return;
        }
        self.editor.configure(state.config.clone());
        self.editor.set_duration(state.duration);
        self.editor.set_area(bounds.width as f64, bounds.height as f64);
        self.editor.set_points(state.points.clone());
    }
}

/// Canvas program for one clip's envelope
pub struct EnvelopeCanvas<'a, Message, F>
where
    F: Fn(Vec<EnvelopeEvent>) -> Message,
{
    pub state: &'a EnvelopeOverlayState,
    pub on_events: F,
}

impl<'a, Message, F> Program<Message> for EnvelopeCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(Vec<EnvelopeEvent>) -> Message,
{
    type State = EnvelopeInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let position = cursor
            .position()
            .map(|p| ((p.x - bounds.x) as f64, (p.y - bounds.y) as f64));
        if position.is_some() {
            interaction.last_position = position;
        }
        interaction.sync(self.state, bounds);
        let editor = &mut interaction.editor;

        let events = match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let (x, y) = position?;
                if !cursor.is_over(bounds) || !editor.pointer_down(x, y) {
                    return None;
                }
                return Some(canvas::Action::capture());
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let (x, y) = position?;
                if editor.is_dragging() {
                    editor.pointer_move(x, y)
                } else if cursor.is_over(bounds) {
                    editor.pointer_hover(x, y)
                } else {
                    editor.pointer_leave()
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !editor.is_dragging() {
                    return None;
                }
                // Released outside the window: commit at the last known spot
                let (x, y) = interaction.last_position.unwrap_or_default();
                editor.pointer_up(x, y)
            }
            _ => return None,
        };

        if events.is_empty() {
            return None;
        }
        Some(canvas::Action::publish((self.on_events)(events)))
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if !cursor.is_over(bounds) && !interaction.editor.is_dragging() {
            return mouse::Interaction::default();
        }
        match cursor.position() {
            Some(p) => mouse_interaction(
                interaction
                    .editor
                    .cursor_style((p.x - bounds.x) as f64, (p.y - bounds.y) as f64),
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
        let width = bounds.width;
        let height = bounds.height as f64;

        let to_point = |time: f64, db: f64| {
            let x = if state.duration > 0.0 {
                (time / state.duration) as f32 * width
            } else {
                0.0
            };
            Point::new(x, db_to_y(db, 0.0, height) as f32)
        };

        let visible: Vec<Point> = state
            .visible_points()
            .map(|p| to_point(p.time, p.db))
            .collect();

        // Flat line at 0 dB without points; otherwise extend to both clip edges
        let mut line: Vec<Point> = Vec::with_capacity(visible.len() + 2);
        match (visible.first(), visible.last()) {
            (Some(first), Some(last)) => {
                line.push(Point::new(0.0, first.y));
                line.extend(visible.iter().copied());
                line.push(Point::new(width, last.y));
            }
            _ => {
                let y = db_to_y(0.0, 0.0, height) as f32;
                line.push(Point::new(0.0, y));
                line.push(Point::new(width, y));
            }
        }

        let path = Path::new(|builder| {
            builder.move_to(line[0]);
            for point in &line[1..] {
                builder.line_to(*point);
            }
        });
        frame.stroke(
            &path,
            Stroke::default()
                .with_color(ENVELOPE_LINE)
                .with_width(style.envelope_line_width),
        );

        for point in state.visible_points() {
            let hovered = state.hovered == Some(point.id);
            let (radius, color) = if hovered {
                (style.envelope_point_hover_radius, ENVELOPE_POINT_HOVER)
            } else {
                (style.envelope_point_radius, ENVELOPE_POINT)
            };
            frame.fill(&Path::circle(to_point(point.time, point.db), radius), color);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackedit_core::{EnvelopePoint, PointId};

    #[test]
    fn test_release_outside_window_commits_drag() {
        let state = EnvelopeOverlayState::new(
            5.0,
            vec![EnvelopePoint {
                id: PointId(0),
                time: 1.0,
                db: 0.0,
            }],
        );
        let canvas = EnvelopeCanvas {
            state: &state,
            on_events: |events: Vec<EnvelopeEvent>| events,
        };
        let bounds = Rectangle::new(Point::ORIGIN, iced::Size::new(500.0, state.height));
        let line_y = db_to_y(0.0, 0.0, state.height as f64) as f32;
        let mut interaction = EnvelopeInteraction::default();

        let press = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        let at = |x: f32| mouse::Cursor::Available(Point::new(x, line_y));
        assert!(canvas.update(&mut interaction, &press, bounds, at(100.0)).is_some());

        let moved = Event::Mouse(mouse::Event::CursorMoved {
            position: Point::new(200.0, line_y),
        });
        canvas.update(&mut interaction, &moved, bounds, at(200.0));
        assert!(interaction.editor.is_dragging());

        let release = Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left));
        canvas.update(&mut interaction, &release, bounds, mouse::Cursor::Unavailable);
        assert!(!interaction.editor.is_dragging());
        assert_eq!(interaction.editor.points().len(), 1);
        assert!((interaction.editor.points()[0].time - 2.0).abs() < 1e-9);
    }
}
