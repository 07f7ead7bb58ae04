//! End-to-end export: settings in, one artifact on disk out.

use std::path::PathBuf;

use crate::codec::{save_to_file, DataFormat};
use crate::color::ColorCache;
use crate::config::ExportSettings;
use crate::core::TrackCollection;
use crate::sampler::{self, ExportMode};
use crate::scene::{CollectionId, DecimatedCollection, Decimate, FrameRange, Scene};
use crate::util::{Error, Result};

/// What an export run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportReport {
    /// Written artifact.
    pub path: PathBuf,
    pub format: DataFormat,
    pub bytes: u64,
    /// Sampled frame range.
    pub range: FrameRange,
    pub tracks: usize,
    pub keyframes: usize,
    /// Name of the decimated duplicate left in the scene, if one was kept.
    pub kept_collection: Option<String>,
}

impl ExportReport {
    /// Keyframes saved by deduplication, against one keyframe per frame per track.
    pub fn dropped_keyframes(&self) -> usize {
        (self.tracks * self.range.len()).saturating_sub(self.keyframes)
    }
}

/// Sample the target collection over the scene's frame range and write it.
///
/// Settings and the collection name are checked before the scene is
/// touched, so a configuration error leaves no file and no scene change.
/// The scene's current frame is restored on every path, and a decimated
/// duplicate is removed afterwards unless the settings keep it.
pub fn export<S: Decimate>(scene: &mut S, settings: &ExportSettings) -> Result<ExportReport> {
    settings.validate()?;
    let name = settings.target_collection.as_deref().ok_or(Error::NoTargetCollection)?;
    let source = scene
        .find_collection(name)
        .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?;
    let range = scene.frame_range();
    if !range.is_valid() {
        return Err(Error::InvalidFrameRange { start: range.start, end: range.end });
    }

    let _span = tracing::info_span!("export", collection = name).entered();
    tracing::info!("Exporting frame-by-frame data for collection '{}'", name);
    tracing::info!("Frame range: {} to {}", range.start, range.end);
    tracing::info!("Export mode: {}", settings.export_mode.as_str());

    let (collection, path, kept_collection) = if settings.wants_decimation() {
        tracing::info!("Decimation ratio: {}", settings.decimation_ratio);
        let mut duplicate = DecimatedCollection::create(
            scene,
            source,
            settings.decimation_ratio,
            settings.keep_decimated_collection,
        )?;
        let id = duplicate.id();
        let (collection, path) = sample_and_write(&mut *duplicate, id, range, settings)?;
        let kept = duplicate.is_kept().then(|| duplicate.collection_name(id).to_string());
        (collection, path, kept)
    } else {
        let (collection, path) = sample_and_write(scene, source, range, settings)?;
        (collection, path, None)
    };

    let bytes = std::fs::metadata(&path)?.len();
    let report = ExportReport {
        path,
        format: settings.data_format,
        bytes,
        range,
        tracks: collection.count(),
        keyframes: collection.total_keyframes(),
        kept_collection,
    };
    tracing::info!(
        "Export complete: {} tracks, {} keyframes ({} dropped as duplicates)",
        report.tracks,
        report.keyframes,
        report.dropped_keyframes()
    );
    Ok(report)
}

/// Sample one collection without writing anything.
///
/// Colors are only baked in vertex mode; object mode is always white.
pub fn sample_collection<S: Scene>(
    scene: &mut S,
    collection: CollectionId,
    mode: ExportMode,
    range: FrameRange,
) -> Result<TrackCollection> {
    let objects = scene.collection_objects(collection);
    if objects.is_empty() {
        tracing::warn!("collection '{}' has no objects", scene.collection_name(collection));
    }
    let colors = match mode {
        ExportMode::VerticesLocation => ColorCache::build(&*scene, &objects),
        ExportMode::ObjectLocation => ColorCache::default(),
    };
    sampler::sample(scene, &objects, mode, range, &colors)
}

fn sample_and_write<S: Scene>(
    scene: &mut S,
    collection: CollectionId,
    range: FrameRange,
    settings: &ExportSettings,
) -> Result<(TrackCollection, PathBuf)> {
    let tracks = sample_collection(scene, collection, settings.export_mode, range)?;
    let path = save_to_file(
        &tracks,
        &settings.save_filepath,
        &settings.save_filename,
        settings.data_format,
    )?;
    Ok((tracks, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::load_from_file;
    use crate::geom::{Mesh, Transform, TransformKey};
    use crate::scene::{FrameCursor, MemoryScene, SceneObject};

    fn scene() -> MemoryScene {
        let mut scene = MemoryScene::new(24);
        scene.set_frame_range(FrameRange::new(1, 3));
        let c = scene.add_collection("Drones");
        let mesh = Mesh::from_positions(vec![glam::Vec3::ZERO, glam::Vec3::X, glam::Vec3::Y, glam::Vec3::Z]);
        let keys = Transform::from_keys(vec![
            TransformKey::translate(1, glam::Vec3::ZERO),
            TransformKey::translate(3, glam::vec3(0.0, 0.0, 4.0)),
        ]);
        scene
            .add_object(c, SceneObject::new("Cube").with_mesh(mesh).with_transform(keys))
            .unwrap();
        scene.set_frame(2);
        scene
    }

    fn settings(dir: &std::path::Path) -> ExportSettings {
        let mut s = ExportSettings::for_collection("Drones");
        s.save_filepath = dir.to_path_buf();
        s.save_filename = "show".into();
        s
    }

    #[test]
    fn test_object_mode_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = scene();
        let report = export(&mut scene, &settings(dir.path())).unwrap();

        assert_eq!(report.path, dir.path().join("show.json"));
        assert_eq!(report.tracks, 1);
        assert_eq!(report.keyframes, 3);
        assert_eq!(report.dropped_keyframes(), 0);
        assert_eq!(scene.current_frame(), 2);
        assert_eq!(load_from_file(&report.path).unwrap().fps(), 24);
    }

    #[test]
    fn test_config_errors_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = scene();

        let mut s = settings(dir.path());
        s.target_collection = None;
        assert!(matches!(export(&mut scene, &s), Err(Error::NoTargetCollection)));

        s.target_collection = Some("Missing".into());
        assert!(matches!(export(&mut scene, &s), Err(Error::CollectionNotFound(_))));

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(scene.current_frame(), 2);
    }

    #[test]
    fn test_decimated_collection_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = scene();
        let mut s = settings(dir.path());
        s.export_mode = ExportMode::VerticesLocation;
        s.decimation_ratio = 0.5;

        let report = export(&mut scene, &s).unwrap();
        assert_eq!(report.tracks, 2);
        assert_eq!(report.kept_collection, None);
        assert_eq!(scene.collection_names().collect::<Vec<_>>(), vec!["Drones"]);
    }

    #[test]
    fn test_decimated_collection_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = scene();
        let mut s = settings(dir.path());
        s.export_mode = ExportMode::VerticesLocation;
        s.decimation_ratio = 0.5;
        s.keep_decimated_collection = true;

        let report = export(&mut scene, &s).unwrap();
        assert_eq!(report.kept_collection.as_deref(), Some("Drones_decimated"));
        assert!(scene.find_collection("Drones_decimated").is_some());
    }

    #[test]
    fn test_write_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = scene();
        let mut s = settings(&dir.path().join("does/not/exist"));
        s.export_mode = ExportMode::VerticesLocation;
        s.decimation_ratio = 0.5;

        assert!(matches!(export(&mut scene, &s), Err(Error::Io(_))));
        assert_eq!(scene.collection_names().collect::<Vec<_>>(), vec!["Drones"]);
        assert_eq!(scene.current_frame(), 2);
    }

    #[test]
    fn test_ratio_one_matches_undecimated() {
        let mut scene = scene();
        let source = scene.find_collection("Drones").unwrap();
        let range = scene.frame_range();
        let direct = sample_collection(&mut scene, source, ExportMode::VerticesLocation, range).unwrap();

        let copy = scene.decimate(source, 1.0).unwrap();
        let via_copy = sample_collection(&mut scene, copy, ExportMode::VerticesLocation, range).unwrap();
        assert_eq!(direct, via_copy);
        assert_eq!(direct.total_keyframes(), via_copy.total_keyframes());
    }

    #[test]
    fn test_inverted_scene_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = scene();
        scene.set_frame_range(FrameRange::new(10, 1));
        assert!(matches!(
            export(&mut scene, &settings(dir.path())),
            Err(Error::InvalidFrameRange { start: 10, end: 1 })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
