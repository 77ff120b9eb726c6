//! Mapping from engine cursor styles to iced mouse interactions

use iced::mouse;
use trackedit_core::CursorStyle;

/// Closest iced pointer icon for a cursor style
///
/// Diagonal resize cursors have no dedicated icon here and fall back to a
/// crosshair; `Move` shows an open hand.
pub fn mouse_interaction(style: CursorStyle) -> mouse::Interaction {
    match style {
        CursorStyle::Default => mouse::Interaction::default(),
        CursorStyle::EwResize => mouse::Interaction::ResizingHorizontally,
        CursorStyle::NsResize => mouse::Interaction::ResizingVertically,
        CursorStyle::NwseResize | CursorStyle::NeswResize => mouse::Interaction::Crosshair,
        CursorStyle::Move | CursorStyle::Grab => mouse::Interaction::Grab,
        CursorStyle::Grabbing => mouse::Interaction::Grabbing,
        CursorStyle::Text => mouse::Interaction::Text,
        CursorStyle::Pointer => mouse::Interaction::Pointer,
        CursorStyle::Crosshair => mouse::Interaction::Crosshair,
    }
}
