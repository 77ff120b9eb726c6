//! Host-side selection state
//!
//! Pure data owned by the application. The overlay canvas reads it on every
//! frame and the application folds the published events back in with
//! [`SelectionOverlayState::apply`].

use trackedit_core::{
    InteractionConfig, SelectionEvent, SpectralSelection, TimeSelection, TimelineGeometry,
    TimelineLayout, Track,
};

/// Selection overlay state for the multi-track area
#[derive(Debug, Clone)]
pub struct SelectionOverlayState {
    pub geometry: TimelineGeometry,
    pub tracks: Vec<Track>,
    /// Spectral selection is enabled (spectrogram mode toggle)
    pub spectral_enabled: bool,
    pub time_selection: Option<TimeSelection>,
    pub selected_tracks: Vec<usize>,
    pub focused_track: Option<usize>,
    pub spectral_selection: Option<SpectralSelection>,
    pub config: InteractionConfig,
}

impl SelectionOverlayState {
    pub fn new(geometry: TimelineGeometry, tracks: Vec<Track>) -> Self {
        Self {
            geometry,
            tracks,
            spectral_enabled: true,
            time_selection: None,
            selected_tracks: Vec::new(),
            focused_track: None,
            spectral_selection: None,
            config: InteractionConfig::default(),
        }
    }

    pub fn layout(&self) -> TimelineLayout<'_> {
        TimelineLayout::new(&self.geometry, &self.tracks).with_spectral(self.spectral_enabled)
    }

    /// Height of all track rows including gaps
    pub fn total_height(&self) -> f32 {
        let count = self.geometry.track_count();
        let last_bottom = self.geometry.track_top_y(count);
        last_bottom as f32
    }

    /// Fold published events into the state
    ///
    /// Returns true when a gesture was finalized.
    pub fn apply(&mut self, events: &[SelectionEvent]) -> bool {
        let mut finalized = false;
        for event in events {
            match event {
                SelectionEvent::TimeSelectionChanged(selection) => {
                    self.time_selection = *selection;
                }
                SelectionEvent::SelectedTracksChanged(tracks) => {
                    self.selected_tracks = tracks.clone();
                }
                SelectionEvent::FocusedTrackChanged(track) => {
                    self.focused_track = *track;
                }
                SelectionEvent::SpectralSelectionChanged(selection) => {
                    self.spectral_selection = *selection;
                }
                SelectionEvent::TimeSelectionFinalized(selection) => {
                    self.time_selection = *selection;
                    finalized = true;
                }
                SelectionEvent::SpectralSelectionFinalized(selection) => {
                    self.spectral_selection = *selection;
                    finalized = true;
                }
            }
        }
        finalized
    }
}
