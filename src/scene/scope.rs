//! Scope guards for host state the exporter borrows.
//!
//! Both guards undo their change in `Drop`, so the host is restored on
//! every exit path, including early returns through `?` and panics.

use std::ops::{Deref, DerefMut};

use super::{CollectionId, Decimate, FrameCursor};
use crate::util::Result;

/// Restores the scene's current frame when dropped.
///
/// Derefs to the wrapped cursor so the scene stays usable while guarded.
pub struct FrameRestore<'a, C: FrameCursor> {
    cursor: &'a mut C,
    saved: u32,
}

impl<'a, C: FrameCursor> FrameRestore<'a, C> {
    /// Remember the cursor's current frame.
    pub fn new(cursor: &'a mut C) -> Self {
        let saved = cursor.current_frame();
        Self { cursor, saved }
    }

    /// Frame that will be restored.
    pub fn saved_frame(&self) -> u32 {
        self.saved
    }
}

impl<C: FrameCursor> Deref for FrameRestore<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.cursor
    }
}

impl<C: FrameCursor> DerefMut for FrameRestore<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.cursor
    }
}

impl<C: FrameCursor> Drop for FrameRestore<'_, C> {
    fn drop(&mut self) {
        tracing::trace!("restoring frame {}", self.saved);
        self.cursor.set_frame(self.saved);
    }
}

/// Decimated duplicate of a collection, removed when dropped unless kept.
pub struct DecimatedCollection<'a, S: Decimate> {
    scene: &'a mut S,
    id: CollectionId,
    keep: bool,
}

impl<'a, S: Decimate> DecimatedCollection<'a, S> {
    /// Ask the host to build the duplicate.
    pub fn create(scene: &'a mut S, source: CollectionId, ratio: f32, keep: bool) -> Result<Self> {
        let id = scene.decimate(source, ratio)?;
        tracing::debug!(
            "created decimated collection '{}' (ratio {:.2})",
            scene.collection_name(id),
            ratio
        );
        Ok(Self { scene, id, keep })
    }

    /// The duplicate collection.
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Whether the duplicate survives the guard.
    pub fn is_kept(&self) -> bool {
        self.keep
    }
}

impl<S: Decimate> Deref for DecimatedCollection<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: Decimate> DerefMut for DecimatedCollection<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

impl<S: Decimate> Drop for DecimatedCollection<'_, S> {
    fn drop(&mut self) {
        if self.keep {
            tracing::debug!("keeping decimated collection '{}'", self.scene.collection_name(self.id));
            return;
        }
        tracing::debug!("removing decimated collection '{}'", self.scene.collection_name(self.id));
        self.scene.remove_collection(self.id);
    }
}
