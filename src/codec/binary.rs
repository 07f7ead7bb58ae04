//! Packed little-endian encoding.
//!
//! ```text
//! fps:u32  nbObjects:u32
//! per object:
//!     nbKeyFrames:u32
//!     per keyframe (28 bytes):
//!         frame:u32  pos.x pos.y pos.z:f32  col.x col.y col.z:f32
//! ```

use std::io::{Cursor, Read};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::core::{KeyFrame, PointTrack, TrackCollection};
use crate::util::{Error, Result, Vector3};

/// Size of one keyframe record.
pub const KEYFRAME_RECORD_SIZE: usize = 28;

/// Size of the `fps` + `nbObjects` prefix.
pub const PREFIX_SIZE: usize = 8;

/// Size of each per-object `nbKeyFrames` count.
pub const TRACK_HEADER_SIZE: usize = 4;

/// Exact byte size of the binary encoding of `collection`.
pub fn encoded_len(collection: &TrackCollection) -> usize {
    PREFIX_SIZE
        + collection
            .tracks()
            .iter()
            .map(|t| TRACK_HEADER_SIZE + KEYFRAME_RECORD_SIZE * t.count())
            .sum::<usize>()
}

/// Encode into a single buffer sized up front.
#[tracing::instrument(skip_all, fields(tracks = collection.count()))]
pub fn encode(collection: &TrackCollection) -> Vec<u8> {
    let mut w = Writer { buf: vec![0u8; encoded_len(collection)], at: 0 };
    w.u32(collection.fps());
    w.u32(collection.count() as u32);
    for track in collection.tracks() {
        w.u32(track.count() as u32);
        for k in track.keyframes() {
            w.u32(k.frame);
            w.vector(k.position);
            w.vector(k.color);
        }
    }
    debug_assert_eq!(w.at, w.buf.len());
    w.buf
}

/// Cursor over a buffer already sized by `encoded_len`.
struct Writer {
    buf: Vec<u8>,
    at: usize,
}

impl Writer {
    fn u32(&mut self, v: u32) {
        LittleEndian::write_u32(&mut self.buf[self.at..self.at + 4], v);
        self.at += 4;
    }

    fn vector(&mut self, v: Vector3) {
        LittleEndian::write_f32_into(&v.to_array(), &mut self.buf[self.at..self.at + 12]);
        self.at += 12;
    }
}

/// Reader that reports truncation with the offset it happened at.
struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(bytes) }
    }

    fn offset(&self) -> u64 {
        self.cursor.position()
    }

    fn remaining(&self) -> u64 {
        self.cursor.get_ref().len() as u64 - self.offset()
    }

    fn u32(&mut self) -> Result<u32> {
        let at = self.offset();
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| Error::UnexpectedEof(at))
    }

    fn f32(&mut self) -> Result<f32> {
        let at = self.offset();
        self.cursor
            .read_f32::<LittleEndian>()
            .map_err(|_| Error::UnexpectedEof(at))
    }

    fn vector(&mut self) -> Result<Vector3> {
        Ok(Vector3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    fn is_done(&mut self) -> bool {
        let mut byte = [0u8; 1];
        matches!(self.cursor.read(&mut byte), Ok(0))
    }
}

/// Decode a binary artifact.
///
/// Fails on truncation with the offset of the short read, and on any
/// bytes left over after the last declared record.
pub fn decode(bytes: &[u8]) -> Result<TrackCollection> {
    let mut r = Reader::new(bytes);
    let fps = r.u32()?;
    let nb_objects = r.u32()? as usize;

    // every object needs at least its count; don't trust the header for allocation
    let max_objects = (r.remaining() / TRACK_HEADER_SIZE as u64) as usize;
    let mut collection = TrackCollection::from_tracks(fps, Vec::with_capacity(nb_objects.min(max_objects)));
    for _ in 0..nb_objects {
        let nb_keyframes = r.u32()? as usize;
        let max_keyframes = (r.remaining() / KEYFRAME_RECORD_SIZE as u64) as usize;
        let mut keyframes = Vec::with_capacity(nb_keyframes.min(max_keyframes));
        for _ in 0..nb_keyframes {
            let frame = r.u32()?;
            let position = r.vector()?;
            let color = r.vector()?;
            keyframes.push(KeyFrame::new(frame, position, color));
        }
        collection.add_track(PointTrack::from_keyframes(keyframes));
    }

    let end = r.offset();
    if !r.is_done() {
        return Err(Error::invalid(format!(
            "{} trailing bytes after offset {}",
            bytes.len() as u64 - end,
            end
        )));
    }
    Ok(collection)
}
