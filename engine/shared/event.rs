use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Footstep,
    FootstepMetal,
    FootSplash,
    Swim,
    /// Feet entered a liquid.
    WaterTouch,
    /// Feet left a liquid.
    WaterLeave,
    /// Head went under.
    WaterUnder,
    /// Head came out.
    WaterClear,
    FallShort,
    FallMedium,
    FallFar,
    Jump,
    Step4,
    Step8,
    Step12,
    Step16,
    FireWeapon,
    ChangeWeapon,
    NoAmmo,
    Taunt,
    /// Parameter is the item used.
    UseItem,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Footstep => "EV_FOOTSTEP",
            Self::FootstepMetal => "EV_FOOTSTEP_METAL",
            Self::FootSplash => "EV_FOOTSPLASH",
            Self::Swim => "EV_SWIM",
            Self::WaterTouch => "EV_WATER_TOUCH",
            Self::WaterLeave => "EV_WATER_LEAVE",
            Self::WaterUnder => "EV_WATER_UNDER",
            Self::WaterClear => "EV_WATER_CLEAR",
            Self::FallShort => "EV_FALL_SHORT",
            Self::FallMedium => "EV_FALL_MEDIUM",
            Self::FallFar => "EV_FALL_FAR",
            Self::Jump => "EV_JUMP",
            Self::Step4 => "EV_STEP_4",
            Self::Step8 => "EV_STEP_8",
            Self::Step12 => "EV_STEP_12",
            Self::Step16 => "EV_STEP_16",
            Self::FireWeapon => "EV_FIRE_WEAPON",
            Self::ChangeWeapon => "EV_CHANGE_WEAPON",
            Self::NoAmmo => "EV_NOAMMO",
            Self::Taunt => "EV_TAUNT",
            Self::UseItem => "EV_USE_ITEM",
        };
        f.write_str(s)
    }
}

/// A predictable event produced by a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    pub kind: EventKind,
    pub param: i32,
}

impl Event {
    pub const fn new(kind: EventKind) -> Self {
        Self { kind, param: 0 }
    }

    pub const fn with_param(kind: EventKind, param: i32) -> Self {
        Self { kind, param }
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param != 0 {
            write!(f, "{}({})", self.kind, self.param)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
