//! Envelope point editing overlay
//!
//! Draws the clip gain envelope and drives an `EnvelopeEditor` from mouse
//! events. The point list stays owned by the host.

mod canvas;
mod state;
mod view;

pub use canvas::EnvelopeInteraction;
pub use state::{EnvelopeOverlayState, ENVELOPE_OVERLAY_HEIGHT};
pub use view::envelope_overlay;
