//! Selection overlay view function
//!
//! ## Usage
//!
//! ```ignore
//! fn view(&self) -> Element<Message> {
//!     let overlay = selection_overlay(&self.selection, Message::Selection);
//!     stack![tracks_view, overlay].into()
//! }
//!
//! fn update(&mut self, message: Message) {
//!     if let Message::Selection(events) = message {
//!         self.selection.apply(&events);
//!     }
//! }
//! ```

use super::canvas::SelectionCanvas;
use super::state::SelectionOverlayState;
use iced::widget::Canvas;
use iced::{Element, Length};
use trackedit_core::SelectionEvent;

/// Create the time/spectral selection overlay for the track area
///
/// `on_events` receives every batch of events a pointer event produced, in
/// the order they must be applied.
pub fn selection_overlay<'a, Message>(
    state: &'a SelectionOverlayState,
    on_events: impl Fn(Vec<SelectionEvent>) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(SelectionCanvas { state, on_events })
        .width(Length::Fill)
        .height(Length::Fixed(state.total_height()))
        .into()
}
