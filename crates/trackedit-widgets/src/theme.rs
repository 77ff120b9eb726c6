//! Shared theme constants for trackedit overlays
//!
//! Colors are translucent so the clip rendering underneath stays visible.

use iced::Color;

/// Time selection fill across the selected tracks
pub const TIME_SELECTION_FILL: Color = Color::from_rgba(0.35, 0.55, 0.95, 0.25);
/// Time selection start/end lines
pub const TIME_SELECTION_EDGE: Color = Color::from_rgb(0.45, 0.65, 1.0);

/// Spectral selection fill
pub const SPECTRAL_SELECTION_FILL: Color = Color::from_rgba(1.0, 0.85, 0.3, 0.2);
/// Spectral selection outline
pub const SPECTRAL_SELECTION_EDGE: Color = Color::from_rgb(1.0, 0.8, 0.3);

/// Envelope line
pub const ENVELOPE_LINE: Color = Color::from_rgb(0.3, 0.9, 0.5);
/// Envelope point (idle)
pub const ENVELOPE_POINT: Color = Color::from_rgb(0.9, 0.9, 0.9);
/// Envelope point under the pointer or being dragged
pub const ENVELOPE_POINT_HOVER: Color = Color::from_rgb(1.0, 0.8, 0.3);

/// Overlay stroke widths and sizes in pixels
pub struct OverlayStyle {
    pub selection_edge_width: f32,
    pub envelope_line_width: f32,
    pub envelope_point_radius: f32,
    pub envelope_point_hover_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            selection_edge_width: 1.0,
            envelope_line_width: 1.5,
            envelope_point_radius: 3.0,
            envelope_point_hover_radius: 5.0,
        }
    }
}
