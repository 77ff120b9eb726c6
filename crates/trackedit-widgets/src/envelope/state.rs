//! Host-side envelope state for one clip

use trackedit_core::{EnvelopeEvent, EnvelopePoint, InteractionConfig, PointId};

/// Default overlay height in pixels
pub const ENVELOPE_OVERLAY_HEIGHT: f32 = 120.0;

/// Envelope overlay state
#[derive(Debug, Clone)]
pub struct EnvelopeOverlayState {
    /// Clip duration in seconds
    pub duration: f64,
    /// Sorted by time, hidden points included
    pub points: Vec<EnvelopePoint>,
    pub hidden: Vec<PointId>,
    pub hovered: Option<PointId>,
    pub height: f32,
    pub config: InteractionConfig,
}

impl EnvelopeOverlayState {
    pub fn new(duration: f64, points: Vec<EnvelopePoint>) -> Self {
        Self {
            duration,
            points,
            hidden: Vec::new(),
            hovered: None,
            height: ENVELOPE_OVERLAY_HEIGHT,
            config: InteractionConfig::default(),
        }
    }

    pub fn visible_points(&self) -> impl Iterator<Item = &EnvelopePoint> {
        self.points.iter().filter(|p| !self.hidden.contains(&p.id))
    }

    /// Fold published events into the state
    pub fn apply(&mut self, events: &[EnvelopeEvent]) {
        for event in events {
            match event {
                EnvelopeEvent::PointsChanged(points) => self.points = points.clone(),
                EnvelopeEvent::HiddenPointsChanged(hidden) => self.hidden = hidden.clone(),
                EnvelopeEvent::HoveredPointChanged(hovered) => self.hovered = *hovered,
            }
        }
    }
}
