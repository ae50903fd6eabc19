use bitflags::bitflags;
use math::vec3_t;

use crate::{
    anim::{AnimSlot, LegsAnim, TorsoAnim},
    consts::{DEFAULT_VIEWHEIGHT, ENTITYNUM_NONE},
    weapon::{Holdable, Weapon, WeaponSet, WeaponState},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PmType {
    /// Can accelerate and turn.
    #[default]
    Normal,
    /// Noclip movement.
    Noclip,
    /// Still run into walls.
    Spectator,
    /// No acceleration or turning, but free falling.
    Dead,
    /// Stuck in place with no control.
    Freeze,
    /// No movement or status bar.
    Intermission,
    /// No movement or status bar.
    SpIntermission,
}

impl PmType {
    /// No input is accepted at or past this type.
    pub fn is_dead_or_worse(self) -> bool {
        self >= Self::Dead
    }

    pub fn is_intermission(self) -> bool {
        matches!(self, Self::Intermission | Self::SpIntermission)
    }
}

bitflags! {
    /// Player movement flags.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u32 {
        const DUCKED = 1 << 0;
        /// Jump was pressed and must be released before the next jump.
        const JUMP_HELD = 1 << 1;
        /// Go into backwards land.
        const BACKWARDS_JUMP = 1 << 3;
        /// Coast down to backwards run.
        const BACKWARDS_RUN = 1 << 4;
        /// `pm_time` is time before rejump.
        const TIME_LAND = 1 << 5;
        /// `pm_time` is an air-accelerate only time.
        const TIME_KNOCKBACK = 1 << 6;
        /// `pm_time` is waterjump.
        const TIME_WATERJUMP = 1 << 8;
        /// Clear after attack and jump buttons come up.
        const RESPAWNED = 1 << 9;
        const USE_ITEM_HELD = 1 << 10;
        /// Pull towards grapple location.
        const GRAPPLE_PULL = 1 << 11;
        /// Spectate following another player.
        const FOLLOW = 1 << 12;
        /// Spectate as a scoreboard.
        const SCOREBOARD = 1 << 13;
        /// Invulnerability sphere set to full size.
        const INVULEXPAND = 1 << 14;
        const SPRINT = 1 << 15;
        const PARENT_SWITCH_HELD = 1 << 16;

        const ALL_TIMES = Self::TIME_WATERJUMP.bits()
            | Self::TIME_LAND.bits()
            | Self::TIME_KNOCKBACK.bits();
    }
}

bitflags! {
    /// Weapon handling flags.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WeaponFlags: u32 {
        /// Weapon is raised to the eye.
        const WEAPON_UP = 1 << 0;
        const WEAPON_LEFT = 1 << 1;
        const WEAPON_RIGHT = 1 << 2;
        /// View roams freely from the weapon.
        const VIEW_UNLOCK = 1 << 3;
        /// View leads and the weapon follows.
        const PARENT_SWITCH = 1 << 4;
        const GAP_UP = 1 << 5;
        const GAP_DOWN = 1 << 6;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u32 {
        /// Draw a talk balloon.
        const TALK = 1 << 12;
        /// For the lightning gun.
        const FIRING = 1 << 8;
    }
}

bitflags! {
    /// Active powerups.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Powerups: u32 {
        const QUAD = 1 << 1;
        const BATTLESUIT = 1 << 2;
        const HASTE = 1 << 3;
        const INVIS = 1 << 4;
        const REGEN = 1 << 5;
        const FLIGHT = 1 << 6;
        const INVULNERABILITY = 1 << 7;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Team {
    #[default]
    Free,
    Red,
    Blue,
    Spectator,
}

/// Persistent state of the weapon/view articulation springs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Articulation {
    /// Target view angles.
    pub view_ang_blend: vec3_t,
    /// Target weapon angles.
    pub weap_ang_blend: vec3_t,
    /// Target weapon offset in weapon space.
    pub weap_offs_blend: vec3_t,
    /// Eye offset along the view axes.
    pub view_offs_blend: vec3_t,
    /// Velocity-driven bounce of the weapon offset.
    pub bounce: vec3_t,
    /// Recoil punch added to the weapon angles.
    pub punch: vec3_t,
    /// Rate at which the weapon angles chase their target.
    pub weap_ang_lerp_frac: f32,
    /// Rate at which the view angles chase their target.
    pub view_ang_lerp_frac: f32,
    /// Rate at which the weapon offset chases its target.
    pub weap_pos_lerp_frac: f32,
    /// Current angular gap bound between weapon and view, in degrees.
    pub gap_lerp: f32,
    pub max_base_gap: f32,
    pub max_sights_gap: f32,
    /// Progress of raising the weapon to the eye, `0.0..=1.0`.
    pub last_stance: f32,
    /// Parent angles of the previous step in short-angle units.
    pub old_angles: [i32; 2],
    /// Offset applied to the parent after swapping which of weapon and view
    /// leads.
    pub swap_gap: [i32; 2],
    pub switching_parent: bool,
}

impl Default for Articulation {
    fn default() -> Self {
        Self {
            view_ang_blend: vec3_t::ZERO,
            weap_ang_blend: vec3_t::ZERO,
            weap_offs_blend: vec3_t::ZERO,
            view_offs_blend: vec3_t::ZERO,
            bounce: vec3_t::ZERO,
            punch: vec3_t::ZERO,
            weap_ang_lerp_frac: 1.0,
            view_ang_lerp_frac: 1.0,
            weap_pos_lerp_frac: 0.1,
            gap_lerp: 60.0,
            max_base_gap: 60.0,
            max_sights_gap: 40.0,
            last_stance: 0.0,
            old_angles: [0; 2],
            swap_gap: [0; 2],
            switching_parent: false,
        }
    }
}

/// The persistent per-player movement state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Entity number of the player, skipped by its own traces.
    pub client_num: i32,
    /// Time of the last executed command.
    pub command_time: i32,
    pub pm_type: PmType,
    pub pm_flags: MoveFlags,
    /// Remaining time of the timed `pm_flags`, in milliseconds.
    pub pm_time: i32,
    /// For view bobbing and footstep generation.
    pub bob_cycle: u8,
    pub origin: vec3_t,
    pub velocity: vec3_t,
    pub weapon_time: i32,
    pub gravity: i32,
    pub speed: i32,
    /// Added to command angles to get view direction; changed by spawns,
    /// rotating objects and teleporters.
    pub delta_angles: [i32; 3],
    pub ground_entity: i32,
    pub legs: AnimSlot<LegsAnim>,
    pub torso: AnimSlot<TorsoAnim>,
    /// A number `0..8` encoding the movement direction relative to the view.
    pub movement_dir: u8,
    pub grapple_point: vec3_t,
    pub e_flags: EntityFlags,
    pub pmove_framecount: u32,
    pub view_height: f32,
    pub view_angles: vec3_t,
    pub weapon_angles: vec3_t,
    /// Weapon position relative to the origin.
    pub weapon_offset: vec3_t,
    pub weapon: Weapon,
    pub weapon_state: WeaponState,
    pub weap_flags: WeaponFlags,
    /// Hand holding the weapon: `-1` left, `0` centered, `1` right.
    pub last_hand: i8,
    pub zoomed: bool,
    pub powerups: Powerups,
    pub ammo: [i32; Weapon::COUNT],
    pub weapons: WeaponSet,
    pub health: i32,
    pub max_health: i32,
    pub holdable: Holdable,
    /// Remaining double-jump window, in milliseconds.
    pub jump_time: i32,
    /// Grapple pull speed.
    pub grapple_pull: i32,
    pub team: Team,
    pub articulation: Articulation,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            client_num: 0,
            command_time: 0,
            pm_type: PmType::Normal,
            pm_flags: MoveFlags::empty(),
            pm_time: 0,
            bob_cycle: 0,
            origin: vec3_t::ZERO,
            velocity: vec3_t::ZERO,
            weapon_time: 0,
            gravity: 800,
            speed: 320,
            delta_angles: [0; 3],
            ground_entity: ENTITYNUM_NONE,
            legs: AnimSlot::new(LegsAnim::Idle),
            torso: AnimSlot::new(TorsoAnim::Stand),
            movement_dir: 0,
            grapple_point: vec3_t::ZERO,
            e_flags: EntityFlags::empty(),
            pmove_framecount: 0,
            view_height: DEFAULT_VIEWHEIGHT,
            view_angles: vec3_t::ZERO,
            weapon_angles: vec3_t::ZERO,
            weapon_offset: vec3_t::ZERO,
            weapon: Weapon::None,
            weapon_state: WeaponState::Ready,
            weap_flags: WeaponFlags::empty(),
            last_hand: 0,
            zoomed: false,
            powerups: Powerups::empty(),
            ammo: [0; Weapon::COUNT],
            weapons: WeaponSet::empty(),
            health: 100,
            max_health: 100,
            holdable: Holdable::None,
            jump_time: 0,
            grapple_pull: 800,
            team: Team::Free,
            articulation: Articulation::default(),
        }
    }
}

impl PlayerState {
    pub fn is_grounded(&self) -> bool {
        self.ground_entity != ENTITYNUM_NONE
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_spectator(&self) -> bool {
        self.team == Team::Spectator
    }

    pub fn ammo(&self, weapon: Weapon) -> i32 {
        self.ammo[weapon.index()]
    }

    pub fn ammo_mut(&mut self, weapon: Weapon) -> &mut i32 {
        &mut self.ammo[weapon.index()]
    }

    /// Gives `weapon` with `ammo` rounds; `-1` means unlimited.
    pub fn give_weapon(&mut self, weapon: Weapon, ammo: i32) {
        self.weapons.insert(weapon);
        self.ammo[weapon.index()] = ammo;
    }
}
