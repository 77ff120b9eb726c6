//! Output events produced by the interaction controllers
//!
//! Handlers return events in the order the host should apply them.

use crate::envelope::{EnvelopePoint, PointId};
use crate::types::{SpectralSelection, TimeSelection};

/// Selection output
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    TimeSelectionChanged(Option<TimeSelection>),
    TimeSelectionFinalized(Option<TimeSelection>),
    SelectedTracksChanged(Vec<usize>),
    FocusedTrackChanged(Option<usize>),
    SpectralSelectionChanged(Option<SpectralSelection>),
    SpectralSelectionFinalized(Option<SpectralSelection>),
}

/// Envelope editing output
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeEvent {
    /// Full backing list, sorted by time (hidden points included)
    PointsChanged(Vec<EnvelopePoint>),
    HiddenPointsChanged(Vec<PointId>),
    HoveredPointChanged(Option<PointId>),
}
