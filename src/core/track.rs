//! Point tracks and the exported track collection.

use super::KeyFrame;

/// Keyframe history of one tracked point.
///
/// Appending a keyframe equal to the last one is a no-op, so a point that
/// holds still produces a single keyframe for the whole hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointTrack {
    keyframes: Vec<KeyFrame>,
}

impl PointTrack {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty track with room for `capacity` keyframes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { keyframes: Vec::with_capacity(capacity) }
    }

    /// Build a track from an existing sequence without deduplicating it.
    pub fn from_keyframes(keyframes: Vec<KeyFrame>) -> Self {
        Self { keyframes }
    }

    /// Append a keyframe unless it repeats the last one.
    ///
    /// Returns `true` if the keyframe was stored.
    pub fn add_keyframe(&mut self, keyframe: KeyFrame) -> bool {
        if self.keyframes.last() == Some(&keyframe) {
            return false;
        }
        self.keyframes.push(keyframe);
        true
    }

    /// Number of stored keyframes.
    #[inline]
    pub fn count(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Stored keyframes in frame order.
    #[inline]
    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    /// First and last frame indices, if any.
    pub fn frame_span(&self) -> Option<(u32, u32)> {
        Some((self.keyframes.first()?.frame, self.keyframes.last()?.frame))
    }
}

/// The exportable artifact: a frame rate plus every point track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackCollection {
    fps: u32,
    tracks: Vec<PointTrack>,
}

impl TrackCollection {
    /// Create an empty collection stamped with a frame rate.
    pub fn new(fps: u32) -> Self {
        Self { fps, tracks: Vec::new() }
    }

    /// Build a collection from existing tracks.
    pub fn from_tracks(fps: u32, tracks: Vec<PointTrack>) -> Self {
        Self { fps, tracks }
    }

    /// Append a track. Always increases the count.
    pub fn add_track(&mut self, track: PointTrack) {
        self.tracks.push(track);
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[inline]
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    /// Number of tracks.
    #[inline]
    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[inline]
    pub fn tracks(&self) -> &[PointTrack] {
        &self.tracks
    }

    /// Sum of keyframe counts across all tracks.
    pub fn total_keyframes(&self) -> usize {
        self.tracks.iter().map(PointTrack::count).sum()
    }

    /// Earliest and latest frame indices across all tracks.
    pub fn frame_span(&self) -> Option<(u32, u32)> {
        self.tracks
            .iter()
            .filter_map(PointTrack::frame_span)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }
}
