pub use math::consts::{PITCH, ROLL, YAW};

pub const MAX_CLIENTS: i32 = 64;
pub const MAX_GENTITIES: i32 = 1024;

/// Entity number meaning "no entity".
pub const ENTITYNUM_NONE: i32 = MAX_GENTITIES - 1;
/// Entity number of the world.
pub const ENTITYNUM_WORLD: i32 = MAX_GENTITIES - 2;

pub const MAX_CLIP_PLANES: usize = 5;
/// Max number of entities reported as touched in one move.
pub const MAX_TOUCH: usize = 32;

/// Ground steeper than this normal z is not walkable.
pub const MIN_WALK_NORMAL: f32 = 0.7;
/// Slightly over-reflect velocity off clip planes to avoid resting in them.
pub const OVERCLIP: f32 = 1.001;
/// Highest step the player walks up without jumping.
pub const STEPSIZE: f32 = 18.0;

pub const MINS_Z: f32 = -24.0;
pub const PLAYER_HALF_WIDTH: f32 = 15.0;
pub const STAND_MAXS_Z: f32 = 28.0;
pub const CROUCH_MAXS_Z: f32 = 16.0;
pub const DEAD_MAXS_Z: f32 = -8.0;
/// Half-size of the inflated invulnerability box.
pub const INVUL_HALF_SIZE: f32 = 42.0;

pub const DEFAULT_VIEWHEIGHT: f32 = 26.0;
pub const CROUCH_VIEWHEIGHT: f32 = 12.0;
pub const DEAD_VIEWHEIGHT: f32 = -16.0;

/// Legs animation lock after a landing, in milliseconds.
pub const TIMER_LAND: i32 = 130;
/// Torso animation lock for a gesture, in milliseconds.
pub const TIMER_GESTURE: i32 = 34 * 66 + 50;

/// Longest command interval accepted in a single call, in milliseconds.
pub const MAX_COMMAND_MSEC: i32 = 1000;
/// Longest single sub-step, in milliseconds.
pub const MAX_STEP_MSEC: i32 = 200;

/// Raw pitch input is clamped to this many short-angle units from level.
pub const PITCH_LIMIT_SHORT: i32 = 16000;

/// Movement axis magnitude of a fully pressed key.
pub const MOVE_AXIS_MAX: f32 = 127.0;
