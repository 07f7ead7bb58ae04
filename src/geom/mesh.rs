//! Polygon mesh data as exposed by the host.
//!
//! Positions are per vertex. Face connectivity is stored as a flattened
//! list of face corners ("loops"); per-loop data such as UVs is indexed by
//! position in that flattened list.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};

/// Polygon mesh in object-local space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    /// Vertex positions (local space).
    pub positions: Vec<Vec3>,
    /// Number of corners of each face.
    pub face_counts: Vec<u32>,
    /// Vertex index of each face corner, faces laid end to end.
    pub face_indices: Vec<u32>,
    /// Active UV layer, one coordinate per face corner.
    pub uvs: Option<Vec<Vec2>>,
}

impl Mesh {
    /// Create a mesh from positions only (no faces).
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self { positions, ..Default::default() }
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get number of faces.
    pub fn num_faces(&self) -> usize {
        self.face_counts.len()
    }

    /// Get number of face corners.
    pub fn num_loops(&self) -> usize {
        self.face_indices.len()
    }

    /// Check if mesh has a UV layer.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Check that connectivity and UVs are consistent with the vertex list.
    pub fn validate(&self) -> Result<()> {
        let corners: u64 = self.face_counts.iter().map(|&c| c as u64).sum();
        if corners != self.face_indices.len() as u64 {
            return Err(Error::invalid(format!(
                "face counts sum to {} but {} face indices given",
                corners,
                self.face_indices.len()
            )));
        }
        if let Some(&bad) = self.face_indices.iter().find(|&&i| i as usize >= self.positions.len()) {
            return Err(Error::invalid(format!(
                "face index {} out of bounds (vertices: {})",
                bad,
                self.positions.len()
            )));
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != self.face_indices.len() {
                return Err(Error::invalid(format!(
                    "{} UVs given for {} face corners",
                    uvs.len(),
                    self.face_indices.len()
                )));
            }
        }
        Ok(())
    }

    /// UV of each vertex taken from the first face corner that uses it.
    ///
    /// Vertices split across UV seams keep whichever seam side is seen
    /// first. Vertices no face uses get `None`, as does every vertex when
    /// the mesh has no UV layer.
    pub fn first_loop_uvs(&self) -> Vec<Option<Vec2>> {
        let mut out = vec![None; self.positions.len()];
        let Some(uvs) = &self.uvs else { return out };

        for (&vertex, &uv) in self.face_indices.iter().zip(uvs) {
            if let Some(slot) = out.get_mut(vertex as usize) {
                if slot.is_none() {
                    *slot = Some(uv);
                }
            }
        }
        out
    }

    /// Reduced copy keeping an evenly spaced subset of vertices.
    ///
    /// Keeps `round(n * ratio)` vertices (at least one for a non-empty
    /// mesh) and every face whose corners all survive. A ratio of 1.0 or
    /// more returns an identical copy.
    pub fn decimated(&self, ratio: f32) -> Mesh {
        let n = self.positions.len();
        if ratio >= 1.0 || n == 0 {
            return self.clone();
        }
        let target = ((n as f32 * ratio.max(0.0)).round() as usize).clamp(1, n);

        // old vertex index -> new vertex index
        let mut remap = vec![None; n];
        let mut positions = Vec::with_capacity(target);
        for k in 0..target {
            let old = k * n / target;
            remap[old] = Some(positions.len() as u32);
            positions.push(self.positions[old]);
        }

        let mut face_counts = Vec::new();
        let mut face_indices = Vec::new();
        let mut uvs = self.uvs.as_ref().map(|_| Vec::new());

        let mut start = 0usize;
        for &count in &self.face_counts {
            let end = start + count as usize;
            let corners = &self.face_indices[start..end];
            let mapped: Option<Vec<u32>> = corners.iter().map(|&v| remap[v as usize]).collect();
            if let Some(mapped) = mapped {
                face_counts.push(count);
                face_indices.extend(mapped);
                if let (Some(out), Some(src)) = (uvs.as_mut(), self.uvs.as_ref()) {
                    out.extend_from_slice(&src[start..end]);
                }
            }
            start = end;
        }

        Mesh { positions, face_counts, face_indices, uvs }
    }
}
