//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation
//! - Interpolatable trait implementations (f32, Vec3, Quat)
//! - Flat buffer decoding and re-encoding
//! - KeyframeCursor sequential access and binary search fallback
//! - AnimationAction loop modes (Once, Loop, PingPong) and the finish signal
//! - AnimationClip duration auto-computation
//! - Binder resolution against a skeleton index

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use glam::{Quat, Vec3};

use marionette::animation::action::{AnimationAction, LoopMode, TrackValue};
use marionette::animation::binder::Binder;
use marionette::animation::binding::TargetPath;
use marionette::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use marionette::animation::tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
use marionette::animation::values::Interpolatable;
use marionette::scene::{Character, SkeletonIndex};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn sample(track: &KeyframeTrack<f32>, time: f32) -> f32 {
    track.sample(time).expect("non-empty track")
}

fn sample_cursor(track: &KeyframeTrack<f32>, time: f32, cursor: &mut KeyframeCursor) -> f32 {
    track
        .sample_with_cursor(time, cursor)
        .expect("non-empty track")
}

// ============================================================================
// KeyframeTrack: Linear Interpolation (f32)
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 10.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    let val = sample_cursor(&track, 0.5, &mut cursor);
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn track_linear_f32_exact_keyframe() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 10.0, 20.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_cursor(&track, 0.0, &mut cursor), 0.0));
    assert!(approx(sample_cursor(&track, 1.0, &mut cursor), 10.0));
    assert!(approx(sample_cursor(&track, 2.0, &mut cursor), 20.0));
}

#[test]
fn track_linear_f32_clamp_beyond_range() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 10.0],
        InterpolationMode::Linear,
    );

    // Sampling beyond the last keyframe should clamp to last value
    let mut cursor = KeyframeCursor::default();
    let val = sample_cursor(&track, 5.0, &mut cursor);
    assert!(approx(val, 10.0), "Expected 10.0, got {val}");
}

#[test]
fn track_linear_f32_before_first() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![10.0_f32, 20.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    let val = sample_cursor(&track, 0.5, &mut cursor);
    assert!(approx(val, 10.0), "Expected 10.0, got {val}");
}

#[test]
fn track_empty_samples_to_none() {
    let track: KeyframeTrack<Vec3> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    let mut cursor = KeyframeCursor::default();
    assert!(track.sample(0.0).is_none());
    assert!(track.sample_with_cursor(0.0, &mut cursor).is_none());
}

// ============================================================================
// KeyframeTrack: Step Interpolation
// ============================================================================

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 100.0, 200.0],
        InterpolationMode::Step,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_cursor(&track, 0.0, &mut cursor), 0.0));
    assert!(approx(sample_cursor(&track, 0.5, &mut cursor), 0.0));
    assert!(approx(sample_cursor(&track, 0.99, &mut cursor), 0.0));
    assert!(approx(sample_cursor(&track, 1.0, &mut cursor), 100.0));
    assert!(approx(sample_cursor(&track, 1.5, &mut cursor), 100.0));
    assert!(approx(sample(&track, 2.0), 200.0));
}

// ============================================================================
// KeyframeTrack: Vec3 / Quat
// ============================================================================

#[test]
fn track_linear_vec3() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 20.0, 30.0)],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor).unwrap();
    assert!(approx(val.x, 5.0));
    assert!(approx(val.y, 10.0));
    assert!(approx(val.z, 15.0));
}

#[test]
fn track_linear_quat_slerp() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_y(PI);

    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![q0, q1], InterpolationMode::Linear);

    let val = track.sample(0.5).unwrap();
    let expected = q0.slerp(q1, 0.5);
    let angle = val.angle_between(expected);
    assert!(angle < 0.01, "Quaternion slerp mismatch: angle={angle}");
}

// ============================================================================
// KeyframeTrack: Cubic Spline Interpolation
// ============================================================================

#[test]
fn track_cubic_f32_endpoints() {
    // values = [in_tangent0, value0, out_tangent0, in_tangent1, value1, out_tangent1]
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![
            0.0_f32, 0.0, 1.0, // frame 0
            1.0, 10.0, 0.0, // frame 1
        ],
        InterpolationMode::CubicSpline,
    );

    let mut cursor = KeyframeCursor::default();
    let v0 = sample_cursor(&track, 0.0, &mut cursor);
    assert!(approx(v0, 0.0), "got {v0}");
    let v1 = sample_cursor(&track, 1.0, &mut cursor);
    assert!(approx(v1, 10.0), "got {v1}");
}

#[test]
fn track_cubic_f32_smooth_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    // With zero tangents the Hermite midpoint is exactly halfway
    let val = sample(&track, 0.5);
    assert!((val - 5.0).abs() < 1e-4, "Cubic midpoint expected 5.0, got {val}");
}

#[test]
fn sample_matches_cursor_across_all_times() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![0.0_f32, 10.0, 5.0, 20.0, 15.0],
        InterpolationMode::Linear,
    );
    for i in 0..=40 {
        let t = i as f32 * 0.1;
        let mut cursor = KeyframeCursor::default();
        let val_cursor = sample_cursor(&track, t, &mut cursor);
        let val_sample = sample(&track, t);
        assert!(
            approx(val_sample, val_cursor),
            "t={t}: sample()={val_sample} != sample_with_cursor()={val_cursor}"
        );
    }
}

// ============================================================================
// Flat buffers
// ============================================================================

#[test]
fn from_flat_decodes_vec3_and_quat() {
    let vec_track: KeyframeTrack<Vec3> =
        KeyframeTrack::from_flat(vec![0.0, 1.0], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], InterpolationMode::Linear).unwrap();
    assert_eq!(vec_track.values, vec![Vec3::new(0.0, 1.0, 2.0), Vec3::new(3.0, 4.0, 5.0)]);

    let quat_track: KeyframeTrack<Quat> =
        KeyframeTrack::from_flat(vec![0.0], &[0.0, 0.0, 0.0, 1.0], InterpolationMode::Linear).unwrap();
    assert_eq!(quat_track.values, vec![Quat::IDENTITY]);
}

#[test]
fn from_flat_rejects_length_mismatch() {
    let track: Option<KeyframeTrack<Vec3>> =
        KeyframeTrack::from_flat(vec![0.0, 1.0], &[0.0, 1.0, 2.0, 3.0], InterpolationMode::Linear);
    assert!(track.is_none());

    // Cubic tracks carry three values per key
    let track: Option<KeyframeTrack<f32>> =
        KeyframeTrack::from_flat(vec![0.0, 1.0], &[0.0, 1.0], InterpolationMode::CubicSpline);
    assert!(track.is_none());
}

#[test]
fn to_flat_preserves_authored_scalars() {
    let flat = [0.1, 0.2, 0.3, 0.9273618, 0.0, 0.0, 0.0, 1.0];
    let track: KeyframeTrack<Quat> =
        KeyframeTrack::from_flat(vec![0.0, 0.5], &flat, InterpolationMode::Linear).unwrap();
    let round: Vec<u32> = track.to_flat().iter().map(|v| v.to_bits()).collect();
    let expected: Vec<u32> = flat.iter().map(|v| v.to_bits()).collect();
    assert_eq!(round, expected);
}

// ============================================================================
// KeyframeCursor: Sequential Access
// ============================================================================

#[test]
fn cursor_sequential_forward() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![0.0_f32, 10.0, 20.0, 30.0, 40.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    for i in 0..=20 {
        let t = i as f32 * 0.2;
        let val = sample_cursor(&track, t, &mut cursor);
        let expected = t * 10.0;
        assert!((val - expected).abs() < 1e-4, "t={t}: expected {expected}, got {val}");
    }
}

#[test]
fn cursor_forward_then_jump_back() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![0.0_f32, 10.0, 20.0, 30.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_cursor(&track, 2.5, &mut cursor), 25.0));

    // Large jump back falls through to binary search
    assert!(approx(sample_cursor(&track, 0.5, &mut cursor), 5.0));
}

#[test]
fn cursor_single_keyframe() {
    let track = KeyframeTrack::new(vec![0.0], vec![42.0_f32], InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_cursor(&track, 5.0, &mut cursor), 42.0));
}

// ============================================================================
// Interpolatable Implementations
// ============================================================================

#[test]
fn interpolatable_f32_linear() {
    let result = f32::interpolate_linear(0.0, 10.0, 0.25);
    assert!(approx(result, 2.5));
}

#[test]
fn interpolatable_quat_linear_is_slerp() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_y(FRAC_PI_2);
    let result = Quat::interpolate_linear(a, b, 0.5);

    let expected = a.slerp(b, 0.5);
    let angle = result.angle_between(expected);
    assert!(angle < 1e-4, "Slerp mismatch: angle={angle}");
}

// ============================================================================
// AnimationAction Loop Modes
// ============================================================================

fn make_simple_clip(duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        "test".to_string(),
        vec![Track {
            meta: TrackMeta {
                node_name: "node".to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, Vec3::X],
                InterpolationMode::Linear,
            )),
        }],
    ))
}

#[test]
fn action_loop_mode_once() {
    let clip = make_simple_clip(2.0);
    let mut action = AnimationAction::new(clip).with_loop_mode(LoopMode::Once);

    assert!(!action.update(1.0), "Once: not finished halfway");
    assert!(action.update(2.0), "Once: finishes on the tick it reaches the end");
    assert!(approx(action.time, 2.0), "Once: should clamp to duration, got {}", action.time);
    assert!(action.is_finished());

    // The finish signal fires once
    assert!(!action.update(1.0));
    assert!(approx(action.time, 2.0));
}

#[test]
fn action_once_holds_final_pose() {
    let clip = make_simple_clip(2.0);
    let mut action = AnimationAction::new(clip).with_loop_mode(LoopMode::Once);
    action.update(5.0);

    match action.sample_track(0) {
        Some(TrackValue::Vector3(v)) => assert!(approx(v.x, 1.0)),
        other => panic!("unexpected sample {other:?}"),
    }
}

#[test]
fn action_loop_mode_loop() {
    let clip = make_simple_clip(2.0);
    let mut action = AnimationAction::new(clip).with_loop_mode(LoopMode::Loop);

    assert!(!action.update(2.5));
    assert!(approx(action.time, 0.5), "Loop: should wrap to 0.5, got {}", action.time);
    assert!(!action.is_finished(), "Loop: never finishes");
}

#[test]
fn action_loop_mode_ping_pong() {
    let clip = make_simple_clip(2.0);
    let mut action = AnimationAction::new(clip).with_loop_mode(LoopMode::PingPong);

    action.update(2.5);
    assert!(approx(action.time, 1.5), "PingPong: should reflect to 1.5, got {}", action.time);
}

#[test]
fn action_loop_reverse_playback() {
    let clip = make_simple_clip(2.0);
    let mut action = AnimationAction::new(clip).with_time_scale(-1.0);
    action.time = 0.5;

    action.update(1.0);
    assert!(
        action.time > 0.0 && action.time <= 2.0,
        "Loop reverse: time should be within [0, duration], got {}",
        action.time
    );
}

#[test]
fn action_paused_no_update() {
    let clip = make_simple_clip(2.0);
    let mut action = AnimationAction::new(clip);
    action.paused = true;
    action.time = 0.5;

    action.update(1.0);
    assert!(approx(action.time, 0.5), "Paused action should not advance");
}

#[test]
fn action_time_scale() {
    let clip = make_simple_clip(4.0);
    let mut action = AnimationAction::new(clip)
        .with_loop_mode(LoopMode::Once)
        .with_time_scale(0.5);

    action.update(1.0);
    assert!(approx(action.time, 0.5), "Expected 0.5, got {}", action.time);
}

#[test]
fn action_reset_clears_finished() {
    let clip = make_simple_clip(1.0);
    let mut action = AnimationAction::new(clip).with_loop_mode(LoopMode::Once);
    action.update(2.0);
    assert!(action.is_finished());

    action.reset();
    assert!(!action.is_finished());
    assert!(approx(action.time, 0.0));
}

// ============================================================================
// AnimationClip Auto-Duration
// ============================================================================

#[test]
fn clip_auto_duration() {
    let clip = AnimationClip::new(
        "test".to_string(),
        vec![
            Track {
                meta: TrackMeta {
                    node_name: "a".to_string(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(KeyframeTrack::new(
                    vec![0.0, 1.5],
                    vec![Vec3::ZERO, Vec3::X],
                    InterpolationMode::Linear,
                )),
            },
            Track {
                meta: TrackMeta {
                    node_name: "b".to_string(),
                    target: TargetPath::Rotation,
                },
                data: TrackData::Quaternion(KeyframeTrack::new(
                    vec![0.0, 3.0],
                    vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)],
                    InterpolationMode::Linear,
                )),
            },
        ],
    );

    assert!(
        approx(clip.duration, 3.0),
        "Duration should be max of all tracks (3.0), got {}",
        clip.duration
    );
    assert!(clip.find_track("b.rotation").is_some());
    assert!(clip.find_track("b.position").is_none());
}

#[test]
fn clip_empty_tracks_zero_duration() {
    let clip = AnimationClip::new("empty".to_string(), vec![]);
    assert!(approx(clip.duration, 0.0));
}

#[test]
fn target_path_parses_property_names() {
    assert_eq!(TargetPath::from_property("position"), Some(TargetPath::Translation));
    assert_eq!(TargetPath::from_property("quaternion"), Some(TargetPath::Rotation));
    assert_eq!(TargetPath::from_property("rotation"), Some(TargetPath::Rotation));
    assert_eq!(TargetPath::from_property("scale"), Some(TargetPath::Scale));
    assert_eq!(TargetPath::from_property("morphTargetInfluences"), None);
}

// ============================================================================
// Binder
// ============================================================================

#[test]
fn binder_skips_tracks_without_a_bone() {
    let mut character = Character::new("rig");
    let root = character.root();
    let hips = character.add_bone(root, "Hips", Vec3::Y).unwrap();

    let clip = AnimationClip::new(
        "clip".to_string(),
        vec![
            Track {
                meta: TrackMeta {
                    node_name: "Hips".to_string(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(KeyframeTrack::new(vec![0.0], vec![Vec3::ZERO], InterpolationMode::Linear)),
            },
            Track {
                meta: TrackMeta {
                    node_name: "Tail".to_string(),
                    target: TargetPath::Rotation,
                },
                data: TrackData::Quaternion(KeyframeTrack::new(
                    vec![0.0],
                    vec![Quat::IDENTITY],
                    InterpolationMode::Linear,
                )),
            },
        ],
    );

    let index = SkeletonIndex::build(&character);
    let bindings = Binder::bind(&index, &clip);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].track_index, 0);
    assert_eq!(bindings[0].node_handle, hips);
    assert_eq!(bindings[0].target, TargetPath::Translation);
}
