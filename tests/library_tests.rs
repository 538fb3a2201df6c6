//! Clip Library Tests
//!
//! Tests for:
//! - Concurrent loading where some requests fail (1-of-N success)
//! - Completion order independence
//! - Clips stored under their request name
//! - FileAssetReader + load_all_blocking against a real directory
//! - Custom ClipSource implementations

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use glam::Vec3;

use marionette::assets::{
    ClipLibrary, ClipRequest, ClipSource, FileAssetReader, JsonClipSource, MemoryAssetReader, load_clip,
};
use marionette::errors::{Error, Result};
use marionette::retarget::{RetargetError, Retargeter, SourceClip, SourceTrack};
use marionette::scene::{Character, SkeletonIndex};

fn rig() -> SkeletonIndex {
    let mut character = Character::new("Rig");
    let root = character.root();
    let hips = character.add_bone(root, "Hips", Vec3::Y).unwrap();
    character.add_bone(hips, "Spine", Vec3::Y * 0.1).unwrap();
    SkeletonIndex::build(&character)
}

fn clip_json(bone: &str) -> String {
    format!(
        r#"{{
            "name": "mixamo.com",
            "duration": 1.0,
            "tracks": [
                {{ "name": "mixamorig{bone}.position", "times": [0.0, 1.0], "values": [0, 100, 0, 0, 110, 0] }}
            ]
        }}"#
    )
}

fn requests() -> Vec<ClipRequest> {
    vec![
        ClipRequest::new("idle", "Idle.json"),
        ClipRequest::new("jump", "Jump.json"),
        ClipRequest::new("wave", "Wave.json"),
        ClipRequest::new("run", "Run.json"),
    ]
}

// ============================================================================
// Partial failure
// ============================================================================

#[tokio::test]
async fn one_of_n_success_keeps_the_survivor() {
    let reader = MemoryAssetReader::new()
        .with("Idle.json", clip_json("Hips"))
        // Jump.json is missing entirely
        .with("Wave.json", "{ not json")
        .with("Run.json", clip_json("Tail"));
    let source = JsonClipSource::new(reader);

    let (library, report) = ClipLibrary::load_all(&source, &requests(), &rig(), &Retargeter::default()).await;

    assert_eq!(library.names(), ["idle"]);
    assert_eq!(report.loaded, ["idle"]);
    assert!(!report.is_complete_success());

    let failed: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(failed, ["jump", "wave", "run"]);
    assert!(matches!(report.failed[0].1, Error::AssetNotFound(_)));
    assert!(matches!(report.failed[1].1, Error::Json(_)));
    assert!(matches!(
        report.failed[2].1,
        Error::Retarget(RetargetError::NoTracksRetargeted { .. })
    ));
}

#[tokio::test]
async fn all_failures_give_an_empty_library() {
    let source = JsonClipSource::new(MemoryAssetReader::new());
    let (library, report) = ClipLibrary::load_all(&source, &requests(), &rig(), &Retargeter::default()).await;

    assert!(library.is_empty());
    assert!(report.loaded.is_empty());
    assert_eq!(report.failed.len(), 4);
}

#[tokio::test]
async fn invalid_clip_contents_fail_only_that_clip() {
    let reader = MemoryAssetReader::new()
        .with("Idle.json", clip_json("Hips"))
        .with("Jump.json", r#"{ "name": "empty", "tracks": [] }"#);
    let source = JsonClipSource::new(reader);
    let requests = [ClipRequest::new("idle", "Idle.json"), ClipRequest::new("jump", "Jump.json")];

    let (library, report) = ClipLibrary::load_all(&source, &requests, &rig(), &Retargeter::default()).await;
    assert!(library.contains("idle"));
    assert!(!library.contains("jump"));
    assert!(matches!(report.failed[0].1, Error::InvalidClip { .. }));
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn completion_order_does_not_matter() {
    let mut reader = MemoryAssetReader::new();
    reader.insert_with_latency("Idle.json", clip_json("Hips"), Duration::from_millis(60));
    reader.insert_with_latency("Jump.json", clip_json("Spine"), Duration::from_millis(30));
    reader.insert("Wave.json", clip_json("Hips"));
    reader.insert_with_latency("Run.json", clip_json("Spine"), Duration::from_millis(10));
    let source = JsonClipSource::new(reader);

    let (library, report) = ClipLibrary::load_all(&source, &requests(), &rig(), &Retargeter::default()).await;

    assert!(report.is_complete_success());
    assert_eq!(report.loaded, ["idle", "jump", "wave", "run"]);
    assert_eq!(library.names(), ["idle", "jump", "run", "wave"]);
}

#[tokio::test]
async fn clips_are_stored_under_the_request_name() {
    let source = JsonClipSource::new(MemoryAssetReader::new().with("Wave.json", clip_json("Hips")));
    let request = ClipRequest::new("wave", "Wave.json");

    let clip = load_clip(&source, &request, &rig(), &Retargeter::default()).await.unwrap();
    assert_eq!(clip.name, "wave");

    let (library, _) = ClipLibrary::load_all(&source, &[request], &rig(), &Retargeter::default()).await;
    assert_eq!(library.get("wave").unwrap().name, "wave");
}

#[tokio::test]
async fn duplicate_request_names_keep_the_first() {
    let reader = MemoryAssetReader::new()
        .with("A.json", clip_json("Hips"))
        .with("B.json", clip_json("Spine"));
    let source = JsonClipSource::new(reader);
    let requests = [ClipRequest::new("idle", "A.json"), ClipRequest::new("idle", "B.json")];

    let (library, report) = ClipLibrary::load_all(&source, &requests, &rig(), &Retargeter::default()).await;
    assert_eq!(library.len(), 1);
    assert_eq!(report.loaded, ["idle"]);
    assert_eq!(library.get("idle").unwrap().tracks[0].meta.node_name, "Hips");
}

// ============================================================================
// Library API
// ============================================================================

#[test]
fn insert_is_add_only() {
    let index = rig();
    let retargeter = Retargeter::default();
    let source = SourceClip::new(
        "a",
        1.0,
        vec![SourceTrack::new("Hips.position", vec![0.0], vec![0.0, 0.0, 0.0])],
    );
    let clip = retargeter.retarget(&source, &index).unwrap();

    let mut library = ClipLibrary::new();
    assert!(library.insert("idle", clip.clone()));
    assert!(!library.insert("idle", clip));
    assert_eq!(library.len(), 1);
}

// ============================================================================
// File-backed loading
// ============================================================================

struct TempDir(PathBuf);

impl TempDir {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!("marionette-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn file_reader_loads_from_disk_blocking() {
    let dir = TempDir::new("clips");
    std::fs::write(dir.0.join("Idle.json"), clip_json("Hips")).unwrap();
    std::fs::write(dir.0.join("Wave.json"), clip_json("Spine")).unwrap();

    let source = JsonClipSource::new(FileAssetReader::new(&dir.0));
    let (library, report) = ClipLibrary::load_all_blocking(&source, &requests(), &rig(), &Retargeter::default());

    assert_eq!(library.names(), ["idle", "wave"]);
    assert_eq!(report.failed.len(), 2);
    for (_, err) in &report.failed {
        assert!(matches!(err, Error::AssetNotFound(_)), "got {err:?}");
    }
}

// ============================================================================
// Custom sources
// ============================================================================

/// Serves one built-in clip and counts requests.
struct CountingSource {
    calls: AtomicUsize,
}

impl ClipSource for CountingSource {
    async fn load_clip(&self, locator: &str) -> Result<SourceClip> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if locator != "Idle.json" {
            return Err(Error::AssetNotFound(locator.to_string()));
        }
        Ok(SourceClip::new(
            "idle",
            2.0,
            vec![SourceTrack::new("mixamorigHips.position", vec![0.0], vec![0.0, 100.0, 0.0])],
        ))
    }
}

#[tokio::test]
async fn every_request_is_attempted() {
    let source = CountingSource {
        calls: AtomicUsize::new(0),
    };
    let (library, report) = ClipLibrary::load_all(&source, &requests(), &rig(), &Retargeter::default()).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    assert_eq!(report.loaded, ["idle"]);
    assert!((library.get("idle").unwrap().duration - 2.0).abs() < 1e-6);
}
