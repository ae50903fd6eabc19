#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegsAnim {
    #[default]
    Idle,
    IdleCrouch,
    Walk,
    WalkCrouch,
    Run,
    Back,
    BackWalk,
    BackCrouch,
    Swim,
    Jump,
    JumpBack,
    Land,
    LandBack,
    Turn,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TorsoAnim {
    #[default]
    Stand,
    /// Idle pose for the gauntlet.
    Stand2,
    Attack,
    /// Attack pose for the gauntlet.
    Attack2,
    Gesture,
    Drop,
    Raise,
}

/// An animation track of the player model.
///
/// `toggle` flips each time the animation restarts so a restart of the same
/// animation is still visible to the presentation layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimSlot<A> {
    pub anim: A,
    pub toggle: bool,
    /// Remaining lock time in milliseconds.
    pub timer: i32,
}

impl<A: Copy + PartialEq> AnimSlot<A> {
    pub const fn new(anim: A) -> Self {
        Self {
            anim,
            toggle: false,
            timer: 0,
        }
    }

    /// Restarts the track with `anim`.
    pub fn start(&mut self, anim: A) {
        self.anim = anim;
        self.toggle = !self.toggle;
    }

    /// Starts `anim` unless it is already playing.
    pub fn continue_with(&mut self, anim: A) {
        if self.anim != anim {
            self.start(anim);
        }
    }

    pub fn drop_timer(&mut self, msec: i32) {
        if self.timer > 0 {
            self.timer = (self.timer - msec).max(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_toggles() {
        let mut slot = AnimSlot::new(LegsAnim::Idle);
        slot.start(LegsAnim::Idle);
        assert!(slot.toggle);
        slot.continue_with(LegsAnim::Idle);
        assert!(slot.toggle);
        slot.continue_with(LegsAnim::Run);
        assert_eq!(slot.anim, LegsAnim::Run);
        assert!(!slot.toggle);
    }

    #[test]
    fn timer_stops_at_zero() {
        let mut slot = AnimSlot::new(TorsoAnim::Stand);
        slot.timer = 10;
        slot.drop_timer(16);
        assert_eq!(slot.timer, 0);
    }
}
