//! JSON encoding.
//!
//! ```text
//! {
//!     "fps": 24,
//!     "nbObjects": 1,
//!     "objects": [
//!         {
//!             "nbKeyFrames": 1,
//!             "keyframes": [
//!                 { "frame": 1, "position": {"x":..}, "color": {"x":..} }
//!             ]
//!         }
//!     ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{KeyFrame, PointTrack, TrackCollection};
use crate::util::{Error, Result, Vector3};

const INDENT: &[u8] = b"    ";

#[derive(Serialize, Deserialize)]
struct CollectionRecord {
    fps: u32,
    #[serde(rename = "nbObjects")]
    nb_objects: usize,
    objects: Vec<TrackRecord>,
}

#[derive(Serialize, Deserialize)]
struct TrackRecord {
    #[serde(rename = "nbKeyFrames")]
    nb_keyframes: usize,
    keyframes: Vec<KeyFrameRecord>,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct KeyFrameRecord {
    frame: u32,
    position: Vector3,
    color: Vector3,
}

impl From<&KeyFrame> for KeyFrameRecord {
    fn from(k: &KeyFrame) -> Self {
        Self { frame: k.frame, position: k.position, color: k.color }
    }
}

impl From<KeyFrameRecord> for KeyFrame {
    fn from(r: KeyFrameRecord) -> Self {
        KeyFrame::new(r.frame, r.position, r.color)
    }
}

/// Encode as pretty-printed JSON.
///
/// JSON numbers cannot hold NaN or infinities, so a collection containing
/// one is rejected rather than written as `null`.
#[tracing::instrument(skip_all, fields(tracks = collection.count()))]
pub fn encode(collection: &TrackCollection) -> Result<Vec<u8>> {
    check_finite(collection)?;
    let record = CollectionRecord {
        fps: collection.fps(),
        nb_objects: collection.count(),
        objects: collection
            .tracks()
            .iter()
            .map(|t| TrackRecord {
                nb_keyframes: t.count(),
                keyframes: t.keyframes().iter().map(KeyFrameRecord::from).collect(),
            })
            .collect(),
    };

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    record.serialize(&mut ser)?;
    Ok(out)
}

fn check_finite(collection: &TrackCollection) -> Result<()> {
    let finite = |v: &Vector3| v.to_array().iter().all(|c| c.is_finite());
    for (i, track) in collection.tracks().iter().enumerate() {
        if let Some(k) = track.keyframes().iter().find(|k| !finite(&k.position) || !finite(&k.color)) {
            return Err(Error::invalid(format!(
                "object {}, frame {}: non-finite value {:?} / {:?} cannot be stored as JSON",
                i, k.frame, k.position, k.color
            )));
        }
    }
    Ok(())
}

/// Decode JSON, checking declared counts against array lengths.
pub fn decode(bytes: &[u8]) -> Result<TrackCollection> {
    let record: CollectionRecord = serde_json::from_slice(bytes)?;
    if record.nb_objects != record.objects.len() {
        return Err(Error::invalid(format!(
            "nbObjects is {} but {} objects are present",
            record.nb_objects,
            record.objects.len()
        )));
    }

    let mut collection = TrackCollection::new(record.fps);
    for (i, track) in record.objects.into_iter().enumerate() {
        if track.nb_keyframes != track.keyframes.len() {
            return Err(Error::invalid(format!(
                "object {}: nbKeyFrames is {} but {} keyframes are present",
                i,
                track.nb_keyframes,
                track.keyframes.len()
            )));
        }
        let keyframes = track.keyframes.into_iter().map(KeyFrame::from).collect();
        collection.add_track(PointTrack::from_keyframes(keyframes));
    }
    Ok(collection)
}
