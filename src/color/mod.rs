//! Per-vertex color baking.
//!
//! Every vertex gets one static color, looked up once before frame
//! sampling starts:
//!
//! 1. default to white;
//! 2. take the first image found on an image texture node of the object's
//!    first material (node order, first match wins);
//! 3. give each vertex the UV of the first face corner that uses it;
//! 4. wrap the UV into `[0, 1)`, scale by the texture size, truncate and
//!    clamp to the last row/column;
//! 5. read that pixel's RGB.
//!
//! Missing material, texture or UVs are not errors; the vertex stays white.

use std::collections::HashMap;

use glam::Vec2;
use rayon::prelude::*;

use crate::geom::Mesh;
use crate::material::{Material, Texture};
use crate::scene::{ObjectId, Scene};
use crate::util::Vector3;

/// Pixel a UV coordinate lands on, with wrap-around.
///
/// Returns `None` for an empty texture.
pub fn uv_to_pixel(uv: Vec2, width: u32, height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let u = uv.x.rem_euclid(1.0);
    let v = uv.y.rem_euclid(1.0);
    // NaN UVs cast to 0; tiny negatives may wrap to exactly 1.0, hence the clamp
    let x = ((u * width as f32) as u32).min(width - 1);
    let y = ((v * height as f32) as u32).min(height - 1);
    Some((x, y))
}

/// RGB of the texel under `uv`, or white if there is none.
pub fn sample_texture(texture: &Texture, uv: Vec2) -> Vector3 {
    uv_to_pixel(uv, texture.width(), texture.height())
        .and_then(|(x, y)| texture.pixel(x, y))
        .map(|[r, g, b, _]| Vector3::new(r, g, b))
        .unwrap_or(Vector3::WHITE)
}

/// Colors of every vertex of `mesh`, in vertex order.
pub fn resolve_colors(mesh: &Mesh, material: Option<&Material>) -> Vec<Vector3> {
    let Some(texture) = material.and_then(Material::first_image) else {
        return vec![Vector3::WHITE; mesh.num_vertices()];
    };
    if !mesh.has_uvs() {
        return vec![Vector3::WHITE; mesh.num_vertices()];
    }
    mesh.first_loop_uvs()
        .into_iter()
        .map(|uv| uv.map_or(Vector3::WHITE, |uv| sample_texture(texture, uv)))
        .collect()
}

/// Baked vertex colors for a list of objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorCache {
    entries: HashMap<ObjectId, Vec<Vector3>>,
}

impl ColorCache {
    /// Bake colors for every mesh-bearing object.
    ///
    /// Objects without a mesh get no entry.
    #[tracing::instrument(skip_all, fields(objects = objects.len()))]
    pub fn build<S: Scene + ?Sized>(scene: &S, objects: &[ObjectId]) -> Self {
        let inputs: Vec<(ObjectId, &Mesh, Option<&Material>)> = objects
            .iter()
            .filter_map(|&id| Some((id, scene.mesh(id)?, scene.material(id))))
            .collect();

        let entries = inputs
            .into_par_iter()
            .map(|(id, mesh, material)| (id, resolve_colors(mesh, material)))
            .collect::<HashMap<_, _>>();

        tracing::debug!(
            "baked colors for {} objects ({} vertices)",
            entries.len(),
            entries.values().map(Vec::len).sum::<usize>()
        );
        Self { entries }
    }

    /// Colors of one object, if it had a mesh.
    pub fn colors(&self, object: ObjectId) -> Option<&[Vector3]> {
        self.entries.get(&object).map(Vec::as_slice)
    }

    /// Color of one vertex, white when unknown.
    pub fn color(&self, object: ObjectId, vertex: usize) -> Vector3 {
        self.colors(object)
            .and_then(|c| c.get(vertex).copied())
            .unwrap_or(Vector3::WHITE)
    }

    /// Number of objects with baked colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShaderNode;
    use crate::scene::{MemoryScene, SceneObject};
    use std::sync::Arc;

    /// 4x2 texture where pixel (x, y) has color (x/10, y/10, 0.5).
    fn gradient() -> Arc<Texture> {
        let mut pixels = Vec::new();
        for y in 0..2 {
            for x in 0..4 {
                pixels.push([x as f32 / 10.0, y as f32 / 10.0, 0.5, 1.0]);
            }
        }
        Arc::new(Texture::new("gradient", 4, 2, pixels).unwrap())
    }

    fn textured(tex: Arc<Texture>) -> Material {
        Material::with_nodes("m", vec![ShaderNode::image_texture("Image", Some(tex))])
    }

    fn triangle(uvs: [Vec2; 3]) -> Mesh {
        Mesh {
            positions: vec![glam::Vec3::ZERO, glam::Vec3::X, glam::Vec3::Y],
            face_counts: vec![3],
            face_indices: vec![0, 1, 2],
            uvs: Some(uvs.to_vec()),
        }
    }

    #[test]
    fn test_uv_to_pixel_basic() {
        assert_eq!(uv_to_pixel(glam::vec2(0.0, 0.0), 4, 2), Some((0, 0)));
        assert_eq!(uv_to_pixel(glam::vec2(0.5, 0.5), 4, 2), Some((2, 1)));
        assert_eq!(uv_to_pixel(glam::vec2(0.99, 0.99), 4, 2), Some((3, 1)));
    }

    #[test]
    fn test_uv_wraps_modulo_one() {
        let tex = gradient();
        assert_eq!(
            uv_to_pixel(glam::vec2(1.5, 1.5), 4, 2),
            uv_to_pixel(glam::vec2(0.5, 0.5), 4, 2)
        );
        assert_eq!(
            sample_texture(&tex, glam::vec2(1.5, 1.5)),
            sample_texture(&tex, glam::vec2(0.5, 0.5))
        );
        // exactly 1.0 wraps to the first column
        assert_eq!(uv_to_pixel(glam::vec2(1.0, 0.0), 4, 2), Some((0, 0)));
        // negative UVs wrap from the far edge
        assert_eq!(uv_to_pixel(glam::vec2(-0.25, 0.0), 4, 2), Some((3, 0)));
    }

    #[test]
    fn test_uv_edge_is_clamped() {
        assert_eq!(uv_to_pixel(glam::vec2(-1e-9, -1e-9), 4, 2), Some((3, 1)));
    }

    #[test]
    fn test_empty_texture() {
        assert_eq!(uv_to_pixel(glam::vec2(0.5, 0.5), 0, 2), None);
        let tex = Texture::solid("empty", 0, 0, [0.0; 4]);
        assert_eq!(sample_texture(&tex, glam::vec2(0.5, 0.5)), Vector3::WHITE);
    }

    #[test]
    fn test_resolve_colors_samples_texture() {
        let mesh = triangle([glam::vec2(0.0, 0.0), glam::vec2(0.5, 0.5), glam::vec2(0.75, 0.0)]);
        let colors = resolve_colors(&mesh, Some(&textured(gradient())));
        assert_eq!(colors[0], Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(colors[1], Vector3::new(0.2, 0.1, 0.5));
        assert_eq!(colors[2], Vector3::new(0.3, 0.0, 0.5));
    }

    #[test]
    fn test_resolve_colors_defaults_to_white() {
        let mut mesh = triangle([Vec2::ZERO; 3]);
        assert_eq!(resolve_colors(&mesh, None), vec![Vector3::WHITE; 3]);

        let no_image = Material::with_nodes("m", vec![ShaderNode::image_texture("Image", None)]);
        assert_eq!(resolve_colors(&mesh, Some(&no_image)), vec![Vector3::WHITE; 3]);

        mesh.uvs = None;
        assert_eq!(resolve_colors(&mesh, Some(&textured(gradient()))), vec![Vector3::WHITE; 3]);
    }

    #[test]
    fn test_cache_skips_objects_without_mesh() {
        let mut scene = MemoryScene::new(24);
        let c = scene.add_collection("C");
        let empty = scene.add_object(c, SceneObject::new("Empty")).unwrap();
        let tri = scene
            .add_object(c, SceneObject::new("Tri")
                .with_mesh(triangle([glam::vec2(0.5, 0.5); 3]))
                .with_material(textured(gradient())))
            .unwrap();

        let cache = ColorCache::build(&scene, &[empty, tri]);
        assert_eq!(cache.len(), 1);
        assert!(cache.colors(empty).is_none());
        assert_eq!(cache.colors(tri).map(<[Vector3]>::len), Some(3));
        assert_eq!(cache.color(tri, 2), Vector3::new(0.2, 0.1, 0.5));
        assert_eq!(cache.color(tri, 99), Vector3::WHITE);
    }

    #[test]
    fn test_cache_lookup_across_many_objects() {
        let mut scene = MemoryScene::new(24);
        let c = scene.add_collection("C");
        let tex = gradient();
        let mut ids = Vec::new();
        for i in 0..200 {
            // each object samples a different column
            let u = (i % 4) as f32 / 4.0;
            let obj = SceneObject::new(format!("Tri{i}"))
                .with_mesh(triangle([glam::vec2(u, 0.0); 3]))
                .with_material(textured(tex.clone()));
            ids.push(scene.add_object(c, obj).unwrap());
        }

        let cache = ColorCache::build(&scene, &ids);
        assert_eq!(cache.len(), 200);
        for (i, &id) in ids.iter().enumerate().rev() {
            let expected = Vector3::new((i % 4) as f32 / 10.0, 0.0, 0.5);
            assert_eq!(cache.color(id, 1), expected, "object {}", i);
        }
        assert!(cache.colors(ObjectId(10_000)).is_none());
    }
}
