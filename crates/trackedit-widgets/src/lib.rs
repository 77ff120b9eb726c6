//! iced widgets for trackedit clip editing
//!
//! This crate wires the `trackedit-core` interaction engine into iced canvas
//! overlays.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: Pure data owned by the application
//!   (`SelectionOverlayState`, `EnvelopeOverlayState`)
//! - **View functions**: Take state + callbacks, return `Element<Message>`
//! - **Canvas Programs**: Own the interaction controller and translate mouse
//!   events into engine calls
//!
//! ## View Functions
//!
//! - `selection_overlay`: time and spectral selection across the track area
//! - `envelope_overlay`: gain envelope point editing for one clip

pub mod cursor;
pub mod envelope;
pub mod selection;
pub mod theme;

pub use cursor::mouse_interaction;
pub use envelope::{envelope_overlay, EnvelopeInteraction, EnvelopeOverlayState, ENVELOPE_OVERLAY_HEIGHT};
pub use selection::{selection_overlay, SelectionInteraction, SelectionOverlayState};
pub use theme::OverlayStyle;
