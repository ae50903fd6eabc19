use core::{fmt, str::FromStr};

use alloc::{format, string::String};
use math::vec3_t;

use crate::consts::MAX_STEP_MSEC;

/// Movement physics flavour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Physics {
    #[default]
    Vanilla,
    /// Double jump enabled.
    ProMode,
}

/// How sprinting handles the weapon.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SprintStyle {
    /// Weapon is lowered and swung to the side.
    #[default]
    Classic,
    /// Weapon is thrust forward and the view rolls into turns.
    Lunge,
}

/// How an attached grapple moves the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrappleStyle {
    /// Accelerate towards the hook and keep air control.
    #[default]
    Swing,
    /// Fly straight to the hook.
    Pull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveVarError<'a> {
    UnknownVariable(&'a str),
    InvalidValue { name: &'a str, value: &'a str },
    MissingValue(&'a str),
}

impl fmt::Display for MoveVarError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable(name) => write!(f, "Unknown move variable \"{name}\""),
            Self::InvalidValue { name, value } => {
                write!(f, "Invalid value \"{value}\" for move variable \"{name}\"")
            }
            Self::MissingValue(name) => write!(f, "Missing value for move variable \"{name}\""),
        }
    }
}

/// A type that can be stored in a move variable.
trait VarValue: Sized {
    fn parse_var(s: &str) -> Option<Self>;

    fn format_var(&self) -> String;
}

impl VarValue for f32 {
    fn parse_var(s: &str) -> Option<Self> {
        f32::from_str(s.trim()).ok().filter(|i| i.is_finite())
    }

    fn format_var(&self) -> String {
        format!("{self}")
    }
}

impl VarValue for i32 {
    fn parse_var(s: &str) -> Option<Self> {
        let s = s.trim();
        i32::from_str(s)
            .ok()
            .or_else(|| f32::parse_var(s).map(|i| i as i32))
    }

    fn format_var(&self) -> String {
        format!("{self}")
    }
}

impl VarValue for bool {
    fn parse_var(s: &str) -> Option<Self> {
        i32::parse_var(s).map(|i| i != 0)
    }

    fn format_var(&self) -> String {
        format!("{}", *self as i32)
    }
}

impl VarValue for vec3_t {
    fn parse_var(s: &str) -> Option<Self> {
        let mut ret = vec3_t::ZERO;
        let mut iter = s.split_ascii_whitespace();
        for i in 0..3 {
            ret[i] = f32::parse_var(iter.next()?)?;
        }
        if iter.next().is_some() {
            return None;
        }
        Some(ret)
    }

    fn format_var(&self) -> String {
        format!("{} {} {}", self[0], self[1], self[2])
    }
}

macro_rules! impl_var_enum {
    ($($ty:ident { $($n:literal => $v:ident),* $(,)? })*) => {
        $(
            impl VarValue for $ty {
                fn parse_var(s: &str) -> Option<Self> {
                    match i32::parse_var(s)? {
                        $($n => Some(Self::$v),)*
                        _ => None,
                    }
                }

                fn format_var(&self) -> String {
                    let n = match self {
                        $(Self::$v => $n,)*
                    };
                    format!("{n}")
                }
            }
        )*
    };
}

impl_var_enum! {
    Physics { 0 => Vanilla, 1 => ProMode }
    SprintStyle { 0 => Classic, 1 => Lunge }
    GrappleStyle { 0 => Swing, 1 => Pull }
}

/// Tuning of the player movement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveVars {
    pub physics: Physics,

    pub stop_speed: f32,
    pub duck_scale: f32,
    pub swim_scale: f32,
    pub wade_scale: f32,
    pub accelerate: f32,
    pub air_accelerate: f32,
    pub water_accelerate: f32,
    pub fly_accelerate: f32,
    pub friction: f32,
    pub water_friction: f32,
    pub flight_friction: f32,
    pub spectator_friction: f32,

    /// Air acceleration when pushing against the current velocity.
    pub air_stop_accelerate: f32,
    /// Strength of the forward/back air steering, `0` disables it.
    pub air_control: f32,
    /// Air acceleration for pure sideways input.
    pub strafe_accelerate: f32,
    /// Wish speed cap for pure sideways input in the air.
    pub strafe_wishspeed: f32,
    /// Extra jump speed inside the double-jump window, `0` disables it.
    pub double_jump_z: f32,

    pub jump_velocity: f32,
    /// Sprint take-off bonus from a standing start.
    pub jump_run_bonus: f32,
    /// Sprint leap bonus when looking straight up.
    pub max_leap_velocity: f32,

    pub min_sights_gap: f32,
    pub max_sights_gap: f32,
    pub min_base_gap: f32,
    /// Base gap at and above which the view leads movement direction.
    pub max_two_handed_gap: f32,
    pub max_base_gap: f32,
    pub sprint_gap: f32,
    pub lunge_gap: f32,
    /// Slack of the weapon around its box.
    pub arm_length: f32,
    pub min_weap_pos: vec3_t,
    pub max_weap_pos: vec3_t,
    pub sights_offset: vec3_t,
    pub base_weap_offset: vec3_t,
    pub sprint_weap_angle: vec3_t,
    pub sprint_style: SprintStyle,

    /// Sway frequencies in Hz.
    pub sway_pitch_frequency: f32,
    pub sway_yaw_frequency: f32,
    /// Sway amplitudes in degrees per unit of spread.
    pub sway_pitch_amplitude: f32,
    pub sway_yaw_amplitude: f32,
    pub sway_min_amplitude: f32,

    pub grapple_style: GrappleStyle,

    /// Run every sub-step with `pmove_msec`.
    pub pmove_fixed: bool,
    pub pmove_msec: i32,
    /// Longest sub-step when not fixed.
    pub max_frame_msec: i32,
    pub no_footsteps: bool,
    pub debug_level: i32,
}

impl Default for MoveVars {
    fn default() -> Self {
        Self {
            physics: Physics::Vanilla,

            stop_speed: 100.0,
            duck_scale: 0.25,
            swim_scale: 0.5,
            wade_scale: 0.7,
            accelerate: 15.0,
            air_accelerate: 1.0,
            water_accelerate: 4.0,
            fly_accelerate: 8.0,
            friction: 8.0,
            water_friction: 1.0,
            flight_friction: 3.0,
            spectator_friction: 5.0,

            air_stop_accelerate: 2.5,
            air_control: 150.0,
            strafe_accelerate: 70.0,
            strafe_wishspeed: 30.0,
            double_jump_z: 0.0,

            jump_velocity: 270.0,
            jump_run_bonus: 60.0,
            max_leap_velocity: 100.0,

            min_sights_gap: 10.0,
            max_sights_gap: 40.0,
            min_base_gap: 15.0,
            max_two_handed_gap: 30.0,
            max_base_gap: 60.0,
            sprint_gap: 30.0,
            lunge_gap: 60.0,
            arm_length: 10.0,
            min_weap_pos: vec3_t::new(1.0, -12.0, -20.0),
            max_weap_pos: vec3_t::new(-5.0, 12.0, -12.0),
            sights_offset: vec3_t::new(7.5, -0.2, -6.0),
            base_weap_offset: vec3_t::new(-3.0, 0.0, -12.0),
            sprint_weap_angle: vec3_t::new(20.0, 60.0, 20.0),
            sprint_style: SprintStyle::Classic,

            sway_pitch_frequency: 0.13,
            sway_yaw_frequency: 0.09,
            sway_pitch_amplitude: 0.02,
            sway_yaw_amplitude: 0.02,
            sway_min_amplitude: 0.3,

            grapple_style: GrappleStyle::Swing,

            pmove_fixed: false,
            pmove_msec: 8,
            max_frame_msec: 66,
            no_footsteps: false,
            debug_level: 0,
        }
    }
}

macro_rules! move_vars {
    ($($name:literal => $field:ident,)*) => {
        impl MoveVars {
            /// Console names of all move variables.
            pub const NAMES: &'static [&'static str] = &[$($name),*];

            /// Sets the variable `name` from its console representation.
            pub fn set<'a>(&mut self, name: &'a str, value: &'a str) -> Result<(), MoveVarError<'a>> {
                match name {
                    $(
                        $name => {
                            self.$field = VarValue::parse_var(value)
                                .ok_or(MoveVarError::InvalidValue { name, value })?;
                        }
                    )*
                    _ => return Err(MoveVarError::UnknownVariable(name)),
                }
                if name == "physics" {
                    self.apply_physics(self.physics);
                }
                self.sanitize();
                Ok(())
            }

            /// Returns the console representation of the variable `name`.
            pub fn get(&self, name: &str) -> Option<String> {
                match name {
                    $($name => Some(self.$field.format_var()),)*
                    _ => None,
                }
            }
        }
    };
}

move_vars! {
    "physics" => physics,
    "stopspeed" => stop_speed,
    "duckscale" => duck_scale,
    "swimscale" => swim_scale,
    "wadescale" => wade_scale,
    "accelerate" => accelerate,
    "airaccelerate" => air_accelerate,
    "wateraccelerate" => water_accelerate,
    "flyaccelerate" => fly_accelerate,
    "friction" => friction,
    "waterfriction" => water_friction,
    "flightfriction" => flight_friction,
    "spectatorfriction" => spectator_friction,
    "airstopaccelerate" => air_stop_accelerate,
    "aircontrol" => air_control,
    "strafeaccelerate" => strafe_accelerate,
    "strafewishspeed" => strafe_wishspeed,
    "doublejump" => double_jump_z,
    "jumpvelocity" => jump_velocity,
    "jumprunbonus" => jump_run_bonus,
    "maxleapvelocity" => max_leap_velocity,
    "minsightsgap" => min_sights_gap,
    "maxsightsgap" => max_sights_gap,
    "minbasegap" => min_base_gap,
    "maxtwohandedgap" => max_two_handed_gap,
    "maxbasegap" => max_base_gap,
    "sprintgap" => sprint_gap,
    "lungegap" => lunge_gap,
    "armlength" => arm_length,
    "minweappos" => min_weap_pos,
    "maxweappos" => max_weap_pos,
    "sightsoffset" => sights_offset,
    "baseweapoffset" => base_weap_offset,
    "sprintweapangle" => sprint_weap_angle,
    "sprintstyle" => sprint_style,
    "swaypitchfrequency" => sway_pitch_frequency,
    "swayyawfrequency" => sway_yaw_frequency,
    "swaypitchamplitude" => sway_pitch_amplitude,
    "swayyawamplitude" => sway_yaw_amplitude,
    "swayminamplitude" => sway_min_amplitude,
    "grapplestyle" => grapple_style,
    "pmove_fixed" => pmove_fixed,
    "pmove_msec" => pmove_msec,
    "maxframemsec" => max_frame_msec,
    "nofootsteps" => no_footsteps,
    "debuglevel" => debug_level,
}

impl MoveVars {
    pub fn new(physics: Physics) -> Self {
        let mut vars = Self::default();
        vars.apply_physics(physics);
        vars
    }

    /// Applies the preset of the physics flavour.
    pub fn apply_physics(&mut self, physics: Physics) {
        self.physics = physics;
        self.double_jump_z = match physics {
            Physics::Vanilla => 0.0,
            Physics::ProMode => 100.0,
        };
    }

    /// Applies every `\key\value` pair from an info string.
    ///
    /// Keys that are not move variables are skipped. On error nothing is
    /// applied.
    pub fn apply_info<'a>(&mut self, info: &'a str) -> Result<(), MoveVarError<'a>> {
        let mut vars = *self;
        let mut iter = info.strip_prefix('\\').unwrap_or(info).split('\\');
        while let Some(key) = iter.next() {
            if key.is_empty() {
                continue;
            }
            let value = iter.next().ok_or(MoveVarError::MissingValue(key))?;
            match vars.set(key, value) {
                Err(MoveVarError::UnknownVariable(_)) => {
                    debug!("movevars: skip unknown info key \"{key}\"");
                }
                res => res?,
            }
        }
        *self = vars;
        Ok(())
    }

    /// Keeps dependent variables within their valid ranges.
    fn sanitize(&mut self) {
        self.pmove_msec = self.pmove_msec.clamp(8, 33);
        self.max_frame_msec = self.max_frame_msec.clamp(1, MAX_STEP_MSEC);
        if self.max_sights_gap < self.min_sights_gap {
            self.max_sights_gap = self.min_sights_gap;
        }
        if self.max_base_gap < self.min_base_gap {
            self.max_base_gap = self.min_base_gap;
        }
        if self.arm_length < 0.0 {
            self.arm_length = 0.0;
        }
    }

    /// Sub-step length used to slice a command.
    pub fn step_msec(&self) -> i32 {
        if self.pmove_fixed {
            self.pmove_msec
        } else {
            self.max_frame_msec
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut vars = MoveVars::default();
        assert_eq!(vars.set("friction", "6"), Ok(()));
        assert_eq!(vars.friction, 6.0);
        assert_eq!(vars.get("friction").as_deref(), Some("6"));
        assert_eq!(vars.set("sightsoffset", "1 2 3"), Ok(()));
        assert_eq!(vars.sights_offset, vec3_t::new(1.0, 2.0, 3.0));
        assert_eq!(vars.set("nofootsteps", "1"), Ok(()));
        assert!(vars.no_footsteps);
    }

    #[test]
    fn set_errors() {
        let mut vars = MoveVars::default();
        assert_eq!(
            vars.set("gravity_gun", "1"),
            Err(MoveVarError::UnknownVariable("gravity_gun"))
        );
        assert_eq!(
            vars.set("friction", "lots"),
            Err(MoveVarError::InvalidValue {
                name: "friction",
                value: "lots"
            })
        );
        assert_eq!(
            vars.set("sightsoffset", "1 2"),
            Err(MoveVarError::InvalidValue {
                name: "sightsoffset",
                value: "1 2"
            })
        );
        assert_eq!(vars, MoveVars::default());
    }

    #[test]
    fn physics_preset() {
        let mut vars = MoveVars::default();
        assert_eq!(vars.double_jump_z, 0.0);
        vars.set("physics", "1").unwrap();
        assert_eq!(vars.physics, Physics::ProMode);
        assert_eq!(vars.double_jump_z, 100.0);
        assert_eq!(MoveVars::new(Physics::ProMode), vars);
        assert!(vars.set("physics", "2").is_err());
    }

    #[test]
    fn pmove_msec_clamped() {
        let mut vars = MoveVars::default();
        vars.set("pmove_msec", "1").unwrap();
        assert_eq!(vars.pmove_msec, 8);
        vars.set("pmove_msec", "100").unwrap();
        assert_eq!(vars.pmove_msec, 33);
        vars.set("pmove_fixed", "1").unwrap();
        assert_eq!(vars.step_msec(), 33);
    }

    #[test]
    fn info_string() {
        let mut vars = MoveVars::default();
        assert_eq!(vars.apply_info("\\friction\\4\\name\\player\\accelerate\\10"), Ok(()));
        assert_eq!(vars.friction, 4.0);
        assert_eq!(vars.accelerate, 10.0);
        assert_eq!(
            vars.apply_info("\\friction"),
            Err(MoveVarError::MissingValue("friction"))
        );
    }

    #[test]
    fn bad_info_string_changes_nothing() {
        let mut vars = MoveVars::default();
        assert_eq!(
            vars.apply_info("\\friction\\4\\accelerate\\fast"),
            Err(MoveVarError::InvalidValue {
                name: "accelerate",
                value: "fast"
            })
        );
        assert_eq!(
            vars.apply_info("\\friction\\4\\accelerate"),
            Err(MoveVarError::MissingValue("accelerate"))
        );
        assert_eq!(vars, MoveVars::default());
    }

    #[test]
    fn error_display() {
        let err = MoveVarError::UnknownVariable("foo");
        assert_eq!(format!("{err}"), "Unknown move variable \"foo\"");
    }

    #[test]
    fn names_are_gettable() {
        let vars = MoveVars::default();
        for name in MoveVars::NAMES {
            assert!(vars.get(name).is_some(), "{name}");
        }
    }
}
