// Animator parameters and clip-timed animation events
//
// States only publish parameters (a bool per state, combo indices, vertical
// speed). `AnimationDriver` stands in for the external animation player: it
// follows those parameters and emits the clip events the states react to.

use std::collections::HashMap;

use crate::game::fsm::{AnimationEvent, AnimationEvents};

/// Parameter sink read by whatever plays the sprites
#[derive(Debug, Default, Clone)]
pub struct Animator {
    bools: HashMap<&'static str, bool>,
    ints: HashMap<&'static str, i32>,
    floats: HashMap<&'static str, f32>,
    /// Most recently switched-on bool that is still on
    active: Option<&'static str>,
    /// Bumped every time a bool is switched on, so a re-entered state restarts its clip
    generation: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        if value {
            self.generation += 1;
            self.active = Some(name);
        } else if self.active == Some(name) {
            self.active = None;
        }
        self.bools.insert(name, value);
    }

    pub fn set_integer(&mut self, name: &'static str, value: i32) {
        self.ints.insert(name, value);
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn get_integer(&self, name: &str) -> i32 {
        self.ints.get(name).copied().unwrap_or(0)
    }

    pub fn get_float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    /// The bool that picks the playing clip, if any
    pub fn active_bool(&self) -> Option<&'static str> {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the clip, matching the animator bool that plays it
    pub name: String,
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    /// Whether the animation loops
    pub looping: bool,
    /// Events fired when playback reaches a frame
    pub events: Vec<(usize, AnimationEvent)>,
}

impl AnimationClip {
    /// Create a new animation clip
    pub fn new(name: &str, frame_count: usize, fps: f32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            frame_count,
            frame_duration: 1.0 / fps,
            looping,
            events: Vec::new(),
        }
    }

    /// Create a looping animation
    pub fn looping(name: &str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, true)
    }

    /// Create a one-shot animation that reports `Finished` after its last frame
    pub fn one_shot(name: &str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, false)
    }

    /// Fire `event` when playback reaches `frame`
    pub fn with_event(mut self, frame: usize, event: AnimationEvent) -> Self {
        self.events.push((frame.min(self.frame_count.saturating_sub(1)), event));
        self
    }

    /// Get the total duration of one animation cycle
    pub fn total_duration(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }
}

/// Plays the clip selected by an `Animator` and emits its events.
///
/// Clips named `<bool><n>` are picked over `<bool>` when the animator's
/// combo parameter holds `n`, which is how attack chains get one clip per hit.
#[derive(Debug)]
pub struct AnimationDriver {
    clips: HashMap<String, AnimationClip>,
    /// Integer parameter used to pick a combo variant
    variant_param: Option<&'static str>,
    current: Option<String>,
    generation: u64,
    current_frame: usize,
    frame_timer: f32,
    finished: bool,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            variant_param: None,
            current: None,
            generation: 0,
            current_frame: 0,
            frame_timer: 0.0,
            finished: false,
        }
    }

    /// Use integer parameter `param` to select numbered clip variants
    pub fn with_variant_param(mut self, param: &'static str) -> Self {
        self.variant_param = Some(param);
        self
    }

    /// Add an animation clip
    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn with_clip(mut self, clip: AnimationClip) -> Self {
        self.add_clip(clip);
        self
    }

    /// Get the current clip name
    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Get the current frame index
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Follow the animator and advance playback, queueing any events passed
    pub fn update(&mut self, animator: &Animator, dt: f32, out: &mut AnimationEvents) {
        self.sync(animator, out);

        let Some(clip) = self.current.as_ref().and_then(|name| self.clips.get(name)) else {
            return;
        };
        if self.finished {
            return;
        }

        self.frame_timer += dt;
        while self.frame_timer >= clip.frame_duration {
            self.frame_timer -= clip.frame_duration;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = 0;
                } else {
                    // Stay on last frame
                    self.current_frame = clip.frame_count - 1;
                    self.finished = true;
                    out.push(AnimationEvent::Finished);
                    return;
                }
            }
            Self::fire(clip, self.current_frame, out);
        }
    }

    fn sync(&mut self, animator: &Animator, out: &mut AnimationEvents) {
        let Some(base) = animator.active_bool() else {
            self.current = None;
            return;
        };

        let name = self
            .variant_param
            .map(|param| format!("{base}{}", animator.get_integer(param)))
            .filter(|variant| self.clips.contains_key(variant))
            .unwrap_or_else(|| base.to_string());

        let restarted = animator.generation() != self.generation;
        if restarted || self.current.as_deref() != Some(name.as_str()) {
            self.generation = animator.generation();
            self.current_frame = 0;
            self.frame_timer = 0.0;
            self.finished = false;
            if let Some(clip) = self.clips.get(&name) {
                Self::fire(clip, 0, out);
            }
            self.current = Some(name);
        }
    }

    fn fire(clip: &AnimationClip, frame: usize, out: &mut AnimationEvents) {
        for (at, event) in &clip.events {
            if *at == frame {
                out.push(*event);
            }
        }
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_animation_clip_duration() {
        let clip = AnimationClip::looping("move", 6, 10.0);
        assert_relative_eq!(clip.total_duration(), 0.6);
    }

    #[test]
    fn test_animator_active_bool() {
        let mut animator = Animator::new();
        animator.set_bool("idle", true);
        assert_eq!(animator.active_bool(), Some("idle"));

        animator.set_bool("idle", false);
        animator.set_bool("move", true);
        assert_eq!(animator.active_bool(), Some("move"));
        assert_eq!(animator.get_integer("basicAttackIndex"), 0);
    }

    #[test]
    fn test_latest_bool_wins() {
        let mut animator = Animator::new();
        animator.set_bool("fall", true);
        animator.set_bool("wallSlide", true);
        assert_eq!(animator.active_bool(), Some("wallSlide"));

        // Clearing a bool that is not playing leaves the clip alone
        animator.set_bool("fall", false);
        assert_eq!(animator.active_bool(), Some("wallSlide"));

        animator.set_bool("wallSlide", false);
        assert_eq!(animator.active_bool(), None);
    }

    #[test]
    fn test_one_shot_reports_finished_once() {
        let mut animator = Animator::new();
        animator.set_bool("counterAttack", true);
        let mut driver = AnimationDriver::new().with_clip(AnimationClip::one_shot("counterAttack", 3, 10.0));

        let mut events = AnimationEvents::new();
        driver.update(&animator, 0.35, &mut events);
        assert!(events.contains(AnimationEvent::Finished));

        let mut later = AnimationEvents::new();
        driver.update(&animator, 0.35, &mut later);
        assert!(later.is_empty());
    }

    #[test]
    fn test_frame_events_fire_when_reached() {
        let mut animator = Animator::new();
        animator.set_bool("attack", true);
        let mut driver = AnimationDriver::new().with_clip(
            AnimationClip::one_shot("attack", 4, 10.0)
                .with_event(1, AnimationEvent::VelocityStart)
                .with_event(2, AnimationEvent::Strike),
        );

        let mut events = AnimationEvents::new();
        driver.update(&animator, 0.15, &mut events);
        assert!(events.contains(AnimationEvent::VelocityStart));
        assert!(!events.contains(AnimationEvent::Strike));

        let mut events = AnimationEvents::new();
        driver.update(&animator, 0.1, &mut events);
        assert!(events.contains(AnimationEvent::Strike));
    }

    #[test]
    fn test_combo_variant_and_restart() {
        let mut animator = Animator::new();
        animator.set_integer("basicAttackIndex", 2);
        animator.set_bool("basicAttack", true);

        let mut driver = AnimationDriver::new()
            .with_variant_param("basicAttackIndex")
            .with_clip(AnimationClip::one_shot("basicAttack1", 4, 10.0))
            .with_clip(AnimationClip::one_shot("basicAttack2", 4, 10.0));

        let mut events = AnimationEvents::new();
        driver.update(&animator, 0.25, &mut events);
        assert_eq!(driver.current_clip(), Some("basicAttack2"));
        assert_eq!(driver.current_frame(), 2);

        // Re-entering the same state restarts the clip
        animator.set_bool("basicAttack", false);
        animator.set_bool("basicAttack", true);
        driver.update(&animator, 0.0, &mut events);
        assert_eq!(driver.current_frame(), 0);
    }
}
