//! Envelope overlay view function

use super::canvas::EnvelopeCanvas;
use super::state::EnvelopeOverlayState;
use iced::widget::Canvas;
use iced::{Element, Length};
use trackedit_core::EnvelopeEvent;

/// Create the envelope editing overlay for one clip
///
/// Place it on top of the clip body; the overlay fills the available width.
///
/// # Example
///
/// ```ignore
/// let envelope = envelope_overlay(&self.envelope, Message::Envelope);
/// ```
pub fn envelope_overlay<'a, Message>(
    state: &'a EnvelopeOverlayState,
    on_events: impl Fn(Vec<EnvelopeEvent>) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(EnvelopeCanvas { state, on_events })
        .width(Length::Fill)
        .height(Length::Fixed(state.height))
        .into()
}
