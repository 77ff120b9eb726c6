//! Time and spectral selection overlay
//!
//! - **State struct** (`SelectionOverlayState`): selections owned by the host
//! - **View function** (`selection_overlay`): state + callback → `Element`
//! - **Canvas Program**: drives the `SelectionController` from mouse events

mod canvas;
mod state;
mod view;

pub use canvas::SelectionInteraction;
pub use state::SelectionOverlayState;
pub use view::selection_overlay;
