use bitflags::bitflags;

bitflags! {
    /// Buttons held in a user command.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const NONE          = 0;
        const ATTACK        = 1 << 0;
        const TALK          = 1 << 1;
        const USE_HOLDABLE  = 1 << 2;
        const GESTURE       = 1 << 3;
        /// Walk instead of run.
        const WALKING       = 1 << 4;
        /// Raise the weapon to the eye.
        const AIM           = 1 << 5;
        const SPRINT        = 1 << 6;
        /// Move the weapon to the left hand.
        const HAND_LEFT     = 1 << 7;
        /// Move the weapon to the right hand.
        const HAND_RIGHT    = 1 << 8;
        /// Let the view roam freely from the weapon.
        const UNLOCK_AIM    = 1 << 9;
        /// Widen the weapon/view gap.
        const GAP_UP        = 1 << 10;
        /// Narrow the weapon/view gap.
        const GAP_DOWN      = 1 << 11;
        /// Swap which of weapon and view leads.
        const PARENT_SWITCH = 1 << 12;
        /// Any key whatsoever.
        const ANY           = 1 << 13;
    }
}

/// One tick of player input.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UserCmd {
    /// Client clock in milliseconds when the command was generated.
    pub server_time: i32,
    /// Absolute view angles in short-angle units.
    pub angles: [i32; 3],
    pub buttons: Buttons,
    /// Requested weapon number.
    pub weapon: u8,
    pub forward_move: i8,
    pub right_move: i8,
    pub up_move: i8,
}

impl UserCmd {
    pub fn is_button(&self, buttons: Buttons) -> bool {
        self.buttons.intersects(buttons)
    }

    pub fn clear_moves(&mut self) {
        self.forward_move = 0;
        self.right_move = 0;
        self.up_move = 0;
    }

    pub fn has_move_input(&self) -> bool {
        self.forward_move != 0 || self.right_move != 0
    }

    /// Returns true if one of the horizontal axes is past walking speed.
    pub fn is_running(&self) -> bool {
        const LIMIT: i32 = 64;
        (self.forward_move as i32).abs() > LIMIT || (self.right_move as i32).abs() > LIMIT
    }
}
