use std::mem;

use smallvec::{SmallVec, smallvec};

use crate::animation::{AnimationAction, LoopMode};
use crate::assets::ClipLibrary;
use crate::playback::policy::PlaybackPolicy;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Default)]
pub enum PlaybackState {
    /// No clip has ever started.
    #[default]
    Uninitialized,
    /// One action at full weight.
    Steady { current: AnimationAction },
    /// Every `outgoing` action fades out while `incoming` fades in; `elapsed`
    /// counts unscaled time since the transition began.
    ///
    /// A redirect keeps the clips that were still fading, so `outgoing` may
    /// hold more than one action. Their start weights sum to one.
    Transitioning {
        outgoing: SmallVec<[FadingAction; 2]>,
        incoming: AnimationAction,
        elapsed: f32,
    },
}

/// An action on its way out of a transition.
#[derive(Debug, Clone)]
pub struct FadingAction {
    pub action: AnimationAction,
    /// Weight the action had when the transition began.
    pub start_weight: f32,
}

impl FadingAction {
    fn new(action: AnimationAction) -> Self {
        Self {
            start_weight: action.weight,
            action,
        }
    }
}

/// What became of a [`PlaybackController::play`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A transition (or, with no crossfade, a cut) to the clip began.
    Started,
    /// The clip is already current or already fading in.
    AlreadyPlaying,
    /// The library has no clip by that name.
    UnknownClip,
    /// No clip has started yet, so there is nothing to transition from.
    NotReady,
}

/// Drives which clip plays, crossfades between clips, and chains one-shot
/// clips back to idle.
///
/// All methods are meant to run on the frame tick; nothing here is shared
/// across threads.
pub struct PlaybackController {
    policy: PlaybackPolicy,
    library: ClipLibrary,
    state: PlaybackState,
    handed_off: bool,
    revealed: bool,
}

impl PlaybackController {
    #[must_use]
    pub fn new(policy: PlaybackPolicy) -> Self {
        Self {
            policy,
            library: ClipLibrary::new(),
            state: PlaybackState::Uninitialized,
            handed_off: false,
            revealed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> &PlaybackPolicy {
        &self.policy
    }

    #[inline]
    #[must_use]
    pub fn library(&self) -> &ClipLibrary {
        &self.library
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// `true` once any clip has started playing.
    #[inline]
    #[must_use]
    pub fn has_started(&self) -> bool {
        !matches!(self.state, PlaybackState::Uninitialized)
    }

    /// `true` once the idle clip has driven the character at full weight.
    #[inline]
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, PlaybackState::Transitioning { .. })
    }

    /// The clip that is playing, or fading in during a transition.
    #[must_use]
    pub fn current_clip_name(&self) -> Option<&str> {
        match &self.state {
            PlaybackState::Uninitialized => None,
            PlaybackState::Steady { current } => Some(current.clip_name()),
            PlaybackState::Transitioning { incoming, .. } => Some(incoming.clip_name()),
        }
    }

    /// Actions that currently contribute to the pose.
    pub fn actions_mut(&mut self) -> impl Iterator<Item = &mut AnimationAction> {
        let (fading, current): (&mut [FadingAction], Option<&mut AnimationAction>) = match &mut self.state {
            PlaybackState::Uninitialized => (Default::default(), None),
            PlaybackState::Steady { current } => (Default::default(), Some(current)),
            PlaybackState::Transitioning {
                outgoing, incoming, ..
            } => (outgoing.as_mut_slice(), Some(incoming)),
        };
        fading.iter_mut().map(|f| &mut f.action).chain(current)
    }

    /// One-time hand-off of the loaded clips.
    ///
    /// Starts the default clip if the library has it. Otherwise the
    /// controller stays uninitialized; that is a valid degraded state, not an
    /// error. Returns whether playback started.
    pub fn start(&mut self, library: ClipLibrary) -> bool {
        if self.handed_off {
            log::warn!("Clip library was already handed to the playback controller; ignoring");
            return false;
        }
        self.handed_off = true;
        self.library = library;

        let default_clip = self.policy.default_clip.clone();
        let Some(action) = self.new_action(&default_clip) else {
            log::warn!("Default clip `{default_clip}` is not available; staying in the bind pose");
            return false;
        };

        log::info!("Starting `{default_clip}`");
        self.state = self.steady(action);
        true
    }

    /// Requests a crossfade to `name`.
    ///
    /// Never fails: unknown and redundant requests are logged and ignored.
    pub fn play(&mut self, name: &str) -> PlayOutcome {
        let Some(current) = self.current_clip_name() else {
            log::debug!("Ignoring play(`{name}`): playback has not started");
            return PlayOutcome::NotReady;
        };
        if current == name {
            log::debug!("Ignoring play(`{name}`): already playing");
            return PlayOutcome::AlreadyPlaying;
        }

        let Some(incoming) = self.new_action(name) else {
            log::warn!("Animation `{name}` not loaded");
            return PlayOutcome::UnknownClip;
        };

        log::info!("Transition `{current}` -> `{name}`");

        // Everything still contributing fades out from the weight it has
        // reached, on one shared ramp, so the blend keeps summing to one.
        let outgoing: SmallVec<[FadingAction; 2]> = match mem::take(&mut self.state) {
            PlaybackState::Uninitialized => SmallVec::new(),
            PlaybackState::Steady { current } => smallvec![FadingAction::new(current)],
            PlaybackState::Transitioning {
                outgoing, incoming, ..
            } => outgoing
                .into_iter()
                .map(|fading| fading.action)
                .chain([incoming])
                .filter(|action| action.weight > 0.0)
                .map(FadingAction::new)
                .collect(),
        };

        self.state = if self.policy.crossfade_duration <= 0.0 {
            self.steady(incoming)
        } else {
            PlaybackState::Transitioning {
                outgoing,
                incoming: incoming.with_weight(0.0),
                elapsed: 0.0,
            }
        };
        PlayOutcome::Started
    }

    /// Advances play heads, crossfade weights, and one-shot completion.
    pub fn update(&mut self, dt: f32) {
        let crossfade = self.policy.crossfade_duration;

        let (state, chain_to_idle) = match mem::take(&mut self.state) {
            PlaybackState::Uninitialized => (PlaybackState::Uninitialized, false),
            PlaybackState::Steady { mut current } => {
                let finished = current.update(dt) && current.loop_mode == LoopMode::Once;
                (PlaybackState::Steady { current }, finished)
            }
            PlaybackState::Transitioning {
                mut outgoing,
                mut incoming,
                mut elapsed,
            } => {
                elapsed += dt;
                let alpha = (elapsed / crossfade).clamp(0.0, 1.0);

                for fading in &mut outgoing {
                    fading.action.update(dt);
                    fading.action.weight = fading.start_weight * (1.0 - alpha);
                }
                incoming.update(dt);
                incoming.weight = alpha;

                if elapsed >= crossfade {
                    // A short one-shot may already be done by the time it is
                    // fully faded in.
                    let finished = incoming.is_finished();
                    (self.steady(incoming), finished)
                } else {
                    let state = PlaybackState::Transitioning {
                        outgoing,
                        incoming,
                        elapsed,
                    };
                    (state, false)
                }
            }
        };
        self.state = state;

        if chain_to_idle {
            let idle = self.policy.idle_clip.clone();
            log::info!(
                "`{}` finished, returning to `{idle}`",
                self.current_clip_name().unwrap_or("none")
            );
            self.play(&idle);
        }
    }

    fn new_action(&self, name: &str) -> Option<AnimationAction> {
        let clip = self.library.get(name)?;
        let policy = self.policy.clip_policy(name);
        Some(
            AnimationAction::new(clip.clone())
                .with_time_scale(policy.time_scale)
                .with_loop_mode(policy.loop_mode),
        )
    }

    fn steady(&mut self, mut current: AnimationAction) -> PlaybackState {
        current.weight = 1.0;
        if !self.revealed && current.clip_name() == self.policy.idle_clip {
            self.revealed = true;
            log::info!("`{}` playing, character revealed", current.clip_name());
        }
        PlaybackState::Steady { current }
    }
}
