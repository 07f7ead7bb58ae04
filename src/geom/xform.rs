//! Keyframed object transforms.
//!
//! A transform is a list of TRS keys at integer frames. Frames before the
//! first key or after the last one hold the nearest key; frames in between
//! interpolate linearly (spherically for rotation).

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One transform key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformKey {
    /// Frame this key applies at.
    pub frame: u32,
    /// Translation.
    pub translation: Vec3,
    /// Euler XYZ rotation in degrees.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for TransformKey {
    fn default() -> Self {
        Self {
            frame: 0,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformKey {
    /// Create a translation-only key.
    pub fn translate(frame: u32, translation: Vec3) -> Self {
        Self { frame, translation, ..Default::default() }
    }

    /// Rotation as a quaternion.
    pub fn quat(&self) -> Quat {
        let r = self.rotation;
        Quat::from_euler(EulerRot::XYZ, r.x.to_radians(), r.y.to_radians(), r.z.to_radians())
    }

    /// Compose scale, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.translation)
    }
}

/// Where a frame falls among the keys.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeySpan {
    /// The frame sits on this key, or is held by it outside the key range.
    Hold(usize),
    /// The frame lies between key `i` and key `i + 1`, at `t` in (0, 1).
    Blend(usize, f32),
}

/// Keyframed transform of one object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform {
    keys: Vec<TransformKey>,
}

impl Transform {
    /// Transform with a single static key.
    pub fn fixed(key: TransformKey) -> Self {
        Self { keys: vec![key] }
    }

    /// Build from keys; they are sorted by frame.
    pub fn from_keys(mut keys: Vec<TransformKey>) -> Self {
        keys.sort_by_key(|k| k.frame);
        Self { keys }
    }

    /// Keys sorted by frame.
    pub fn keys(&self) -> &[TransformKey] {
        &self.keys
    }

    /// Whether the transform changes over time.
    pub fn is_animated(&self) -> bool {
        self.keys.windows(2).any(|w| w[0].translation != w[1].translation
            || w[0].rotation != w[1].rotation
            || w[0].scale != w[1].scale)
    }

    /// Locate a frame among the keys. `None` when there are no keys.
    pub fn span(&self, frame: u32) -> Option<KeySpan> {
        let last = self.keys.len().checked_sub(1)?;
        let next = self.keys.partition_point(|k| k.frame < frame);
        if next == 0 {
            return Some(KeySpan::Hold(0));
        }
        if next > last {
            return Some(KeySpan::Hold(last));
        }
        if self.keys[next].frame == frame {
            return Some(KeySpan::Hold(next));
        }
        let (a, b) = (self.keys[next - 1].frame, self.keys[next].frame);
        Some(KeySpan::Blend(next - 1, (frame - a) as f32 / (b - a) as f32))
    }

    /// Local matrix at a frame. Identity when there are no keys.
    pub fn matrix_at(&self, frame: u32) -> Mat4 {
        match self.span(frame) {
            None => Mat4::IDENTITY,
            Some(KeySpan::Hold(i)) => self.keys[i].matrix(),
            Some(KeySpan::Blend(i, t)) => {
                let (a, b) = (&self.keys[i], &self.keys[i + 1]);
                Mat4::from_scale_rotation_translation(
                    a.scale.lerp(b.scale, t),
                    a.quat().slerp(b.quat(), t),
                    a.translation.lerp(b.translation, t),
                )
            }
        }
    }
}
