//! Interaction engine for trackedit clip editing
//!
//! This crate provides:
//! - Coordinate mapping between time/frequency/dB and canvas pixels
//! - Hit-testing for selection rectangles and envelope shapes
//! - Time-selection and spectral-selection drag state machines
//! - A coordinator that hands gestures between the two selection modes
//! - An envelope point editor with snapping and point eating
//! - YAML-backed interaction configuration
//!
//! # Architecture
//!
//! ```text
//! host pointer event → SelectionController / EnvelopeEditor → Vec<Event> → host state
//! ```
//!
//! Everything is synchronous and UI-toolkit agnostic. Handlers return the
//! events they produced; the host owns the authoritative selection and
//! envelope state and syncs it back between gestures.

mod config;
mod coordinator;
mod coords;
mod envelope;
mod events;
mod geometry;
mod spectral_selection;
mod time_selection;
mod types;

pub use config::{
    default_interaction_config_path, load_interaction_config, save_interaction_config,
    InteractionConfig, CLICK_MOVE_THRESHOLD, CLICK_SUPPRESS_MS, CLICK_THRESHOLD, CORNER_SIZE,
    CREATE_DEAD_ZONE, EDGE_THRESHOLD, ENVELOPE_LINE_FAR_THRESHOLD, ORIGIN_EPSILON_SECS,
    SNAP_WINDOW_SECS,
};
pub use coordinator::{may_convert_to_spectral, ConversionCache, SelectionController};
pub use coords::{
    db_to_y, finite_db, hz_to_normalized, normalized_to_hz, y_to_db, LayoutError, Rect,
    TimelineGeometry, TimelineLayout, MAX_DB, MIN_DB,
};
pub use envelope::{EnvelopeDrag, EnvelopeEditor, EnvelopeHit, EnvelopePoint, PointId, SegmentKind};
pub use events::{EnvelopeEvent, SelectionEvent};
pub use geometry::{point_distance, segment_distance, Corner, Edge, SelectionHit, SelectionRect};
pub use spectral_selection::{
    ConversionRequest, SpectralDragMode, SpectralDragState, SpectralMove,
    SpectralSelectionMachine, TimeAnchor,
};
pub use time_selection::{TimeDragMode, TimeDragState, TimeSelectionMachine};
pub use types::{
    Channel, Clip, ClipId, CursorStyle, SpectralSelection, TimeSelection, Track, TrackViewMode,
};
