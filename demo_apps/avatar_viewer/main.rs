//! Headless avatar viewer.
//!
//! Loads a character description and its clips, then runs a fixed-step frame
//! loop while replaying a key script, logging the playback status and a few
//! bone positions along the way.
//!
//! ```text
//! avatar_viewer [CHARACTER_JSON] [CLIP_DIR] [CONFIG_JSON] [--script 2,3,4] [--seconds 12]
//! ```
//!
//! Run with `RUST_LOG=info` to see the engine's own lifecycle logs.

use std::path::PathBuf;

use marionette::{Avatar, AvatarConfig, Character, FileAssetReader, FrameClock, JsonClipSource};

const DEFAULT_CHARACTER: &str = "demo_apps/avatar_viewer/assets/character.json";
const DEFAULT_CLIP_DIR: &str = "demo_apps/avatar_viewer/assets/clips";
const TRACKED_BONES: [&str; 3] = ["Hips", "LeftFoot", "RightHand"];

struct Args {
    character: PathBuf,
    clip_dir: PathBuf,
    config: Option<PathBuf>,
    /// (second, key) pairs, one key per second starting at 2s.
    script: Vec<(f32, char)>,
    seconds: f32,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut positional = Vec::new();
        let mut script = vec!['2', '3', '4', '1', '9'];
        let mut seconds = 12.0;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--script" => {
                    let value = args.next().ok_or_else(|| anyhow::anyhow!("--script needs a value"))?;
                    script = value.split(',').filter_map(|k| k.trim().chars().next()).collect();
                }
                "--seconds" => {
                    let value = args.next().ok_or_else(|| anyhow::anyhow!("--seconds needs a value"))?;
                    seconds = value.parse()?;
                }
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        Ok(Self {
            character: positional.next().unwrap_or_else(|| DEFAULT_CHARACTER.into()),
            clip_dir: positional.next().unwrap_or_else(|| DEFAULT_CLIP_DIR.into()),
            config: positional.next(),
            script: script
                .into_iter()
                .enumerate()
                .map(|(i, key)| (2.0 + i as f32 * 2.0, key))
                .collect(),
            seconds,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse()?;

    let config = match &args.config {
        Some(path) => AvatarConfig::from_json_file(path)?,
        None => AvatarConfig::default(),
    };
    let character = Character::from_json_file(&args.character)?;
    println!("Loaded character `{}` from {}", character.name, args.character.display());

    let mut avatar = Avatar::new(character, &config);

    let source = JsonClipSource::new(FileAssetReader::new(&args.clip_dir));
    let report = avatar.load_clips(&source).await;
    println!(
        "Clips loaded: {:?}, failed: {:?}",
        report.loaded,
        report.failed.iter().map(|(name, _)| name).collect::<Vec<_>>()
    );

    let mut clock = FrameClock::fixed_fps(60);
    let mut script = args.script.iter().peekable();
    let mut next_report = 0.0;

    while clock.elapsed_seconds() < args.seconds {
        let dt = clock.tick();
        let now = clock.elapsed_seconds();

        while let Some(&&(at, key)) = script.peek() {
            if at > now {
                break;
            }
            script.next();
            match avatar.handle_key(key) {
                Some(outcome) => println!("[{now:6.2}s] key {key} -> {outcome:?}"),
                None => println!("[{now:6.2}s] key {key} is not mapped"),
            }
        }

        avatar.update(dt);

        if now >= next_report {
            next_report += 0.5;
            print_frame(&avatar, now);
        }
    }

    Ok(())
}

fn print_frame(avatar: &Avatar, now: f32) {
    let status = avatar.status();
    let mut line = format!(
        "[{now:6.2}s] clip={:<5} loaded={} visible={}",
        status.current_clip_label(),
        status.animation_loaded,
        status.visible
    );

    let character = avatar.character();
    for bone in TRACKED_BONES {
        let position = avatar
            .skeleton()
            .get(bone)
            .and_then(|handle| character.world_position(handle))
            .unwrap_or(glam::Vec3::ZERO);
        line.push_str(&format!(
            " {bone}=({:.2}, {:.2}, {:.2})",
            position.x, position.y, position.z
        ));
    }
    println!("{line}");
}
