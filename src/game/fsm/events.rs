// Animation-driven cues delivered to the active state

/// A cue fired by the animation layer at a specific point of a clip.
///
/// Events are queued per entity and consumed during the next update.
/// Whatever the active state does not use is dropped at the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationEvent {
    /// The state's clip reached its end
    Finished,
    /// Start the attack lunge for the current combo slot
    VelocityStart,
    /// Stop the attack lunge
    VelocityStop,
    /// The remainder of the clip may be skipped if a follow-up is queued
    Skip,
    /// Re-evaluate facing from the movement input
    Flip,
    /// Hit frame: resolve the current attack volume
    Strike,
    /// Enemy attack became counterable
    CounterWindowOpen,
    /// Enemy attack is no longer counterable
    CounterWindowClose,
}

/// Events collected for one tick
#[derive(Debug, Default, Clone)]
pub struct AnimationEvents {
    pending: Vec<AnimationEvent>,
}

impl AnimationEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next update
    pub fn push(&mut self, event: AnimationEvent) {
        self.pending.push(event);
    }

    pub fn contains(&self, event: AnimationEvent) -> bool {
        self.pending.contains(&event)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything queued so far, leaving the queue empty
    pub fn take(&mut self) -> AnimationEvents {
        std::mem::take(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.pending.iter().copied()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl FromIterator<AnimationEvent> for AnimationEvents {
    fn from_iter<I: IntoIterator<Item = AnimationEvent>>(iter: I) -> Self {
        Self {
            pending: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_empties_queue() {
        let mut events = AnimationEvents::new();
        events.push(AnimationEvent::Skip);
        events.push(AnimationEvent::Finished);

        let taken = events.take();
        assert!(events.is_empty());
        assert!(taken.contains(AnimationEvent::Skip));
        assert!(taken.contains(AnimationEvent::Finished));
        assert!(!taken.contains(AnimationEvent::Strike));
    }
}
