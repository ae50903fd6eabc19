use shared::{
    anim::LegsAnim,
    consts::{DEFAULT_VIEWHEIGHT, ENTITYNUM_NONE, OVERCLIP},
    event::EventKind,
    math::{fmaxf, fminf, sinf, vec3_t},
    movevars::GrappleStyle,
    state::{MoveFlags, PmType, Powerups, WeaponFlags},
    trace::{CollisionOracle, Contents, SurfaceFlags},
};

use crate::{friction::air_control, slide::clip_velocity, WishMove};

/// Double-jump window opened by every jump, in milliseconds.
const JUMP_WINDOW: i32 = 400;

/// Locomotion handler run for one sub-step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Fly through the world with extra friction.
    Spectator,
    /// Move freely through solids.
    Noclip,
    /// No movement at all.
    Frozen,
    /// No movement at all.
    Intermission,
    /// Decelerate and fall without input.
    Dead,
    /// Fly with the flight powerup.
    Flight,
    /// Move along an attached grapple.
    GrapplePull,
    /// Ballistic hop out of the water.
    WaterJump,
    Swim,
    Walk,
    Air,
}

/// Inputs of the mode selection.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ModeQuery {
    pub pm_type: PmType,
    pub powerups: Powerups,
    pub pm_flags: MoveFlags,
    pub water_level: u8,
    pub walking: bool,
}

impl Mode {
    /// Returns the mode that replaces the whole sub-step for `pm_type`.
    pub fn overriding(pm_type: PmType) -> Option<Mode> {
        match pm_type {
            PmType::Spectator => Some(Mode::Spectator),
            PmType::Noclip => Some(Mode::Noclip),
            PmType::Freeze => Some(Mode::Frozen),
            PmType::Intermission | PmType::SpIntermission => Some(Mode::Intermission),
            PmType::Normal | PmType::Dead => None,
        }
    }

    /// Selects exactly one mode, first match wins.
    pub fn select(query: &ModeQuery) -> Mode {
        if let Some(mode) = Self::overriding(query.pm_type) {
            return mode;
        }
        if query.pm_type == PmType::Dead {
            return Mode::Dead;
        }
        Self::locomotion(query)
    }

    /// Selects the movement of a body regardless of its type.
    pub fn locomotion(query: &ModeQuery) -> Mode {
        if query.powerups.contains(Powerups::FLIGHT) {
            Mode::Flight
        } else if query.pm_flags.contains(MoveFlags::GRAPPLE_PULL) {
            Mode::GrapplePull
        } else if query.pm_flags.contains(MoveFlags::TIME_WATERJUMP) {
            Mode::WaterJump
        } else if query.water_level > 1 {
            Mode::Swim
        } else if query.walking {
            Mode::Walk
        } else {
            Mode::Air
        }
    }
}

/// Returns the leg direction `0..8` for the movement keys.
///
/// Pure sideways movement turns into a diagonal when the keys are released.
fn movement_dir(forward: i8, right: i8, previous: u8) -> u8 {
    use core::cmp::Ordering::*;

    match (right.cmp(&0), forward.cmp(&0)) {
        (Equal, Greater) => 0,
        (Less, Greater) => 1,
        (Less, Equal) => 2,
        (Less, Less) => 3,
        (Equal, Less) => 4,
        (Greater, Less) => 5,
        (Greater, Equal) => 6,
        (Greater, Greater) => 7,
        (Equal, Equal) => match previous {
            2 => 1,
            6 => 7,
            dir => dir,
        },
    }
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    pub(super) fn mode_query(&self) -> ModeQuery {
        ModeQuery {
            pm_type: self.ps.pm_type,
            powerups: self.ps.powerups,
            pm_flags: self.ps.pm_flags,
            water_level: self.water_level,
            walking: self.local.walking,
        }
    }

    pub(super) fn run_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Spectator => {
                self.check_duck();
                self.fly_move();
                self.drop_timers();
            }
            Mode::Noclip => {
                self.noclip_move();
                self.drop_timers();
            }
            Mode::Frozen | Mode::Intermission => {}
            Mode::Dead => {
                self.dead_move();
                let next = Mode::locomotion(&self.mode_query());
                self.run_mode(next);
            }
            Mode::Flight => self.fly_move(),
            Mode::GrapplePull => {
                match self.vars.grapple_style {
                    GrappleStyle::Swing => self.grapple_swing(),
                    GrappleStyle::Pull => self.grapple_pull(),
                }
                self.air_move();
            }
            Mode::WaterJump => self.water_jump_move(),
            Mode::Swim => self.water_move(),
            Mode::Walk => self.walk_move(),
            Mode::Air => self.air_move(),
        }
    }

    fn set_movement_dir(&mut self) {
        self.ps.movement_dir =
            movement_dir(self.cmd.forward_move, self.cmd.right_move, self.ps.movement_dir);
    }

    fn is_slick_or_knocked_back(&self) -> bool {
        self.local
            .ground_trace
            .surface_flags
            .contains(SurfaceFlags::SLICK)
            || self.ps.pm_flags.contains(MoveFlags::TIME_KNOCKBACK)
    }

    /// Returns `true` if the player jumped away from the ground.
    pub(super) fn check_jump(&mut self) -> bool {
        if self.ps.pm_flags.contains(MoveFlags::RESPAWNED) {
            // don't allow jump until all buttons are up
            return false;
        }

        if self.cmd.up_move < 10 {
            // not holding jump
            return false;
        }

        if self.ps.pm_flags.contains(MoveFlags::JUMP_HELD) {
            // clear upmove so cmd_scale doesn't lower running speed
            self.cmd.up_move = 0;
            return false;
        }

        self.local.ground_plane = false;
        self.local.walking = false;
        self.ps.pm_flags.insert(MoveFlags::JUMP_HELD);
        self.ps.ground_entity = ENTITYNUM_NONE;

        let mut velocity = self.vars.jump_velocity;
        if self.ps.weap_flags.contains(WeaponFlags::WEAPON_UP) {
            velocity *= 0.75;
        }

        if self.ps.pm_flags.contains(MoveFlags::SPRINT) {
            let flat_speed = self.ps.velocity.with_z(0.0).length();
            let take_off = fmaxf(1.0 - flat_speed / 320.0, 0.0);
            let leap = fmaxf(sinf((-self.ps.view_angles.pitch()).to_radians()), 0.0);
            velocity += self.vars.jump_run_bonus * take_off + leap * self.vars.max_leap_velocity;
        }

        if self.vars.double_jump_z != 0.0 {
            if self.ps.jump_time > 0 {
                velocity += self.vars.double_jump_z;
            }
            self.ps.jump_time = JUMP_WINDOW;
        }

        self.ps.velocity.set_z(velocity);
        self.add_event(EventKind::Jump);
        self.force_jump_anim();
        true
    }

    fn check_water_jump(&mut self) -> bool {
        if self.ps.pm_time != 0 || self.water_level != 2 {
            return false;
        }

        let flat_forward = self.local.forward.with_z(0.0).normalize();
        let mut spot = self.ps.origin.mul_add(30.0, flat_forward);
        spot[2] += 4.0;
        if !self.point_contents(spot).contains(Contents::SOLID) {
            return false;
        }

        spot[2] += 16.0;
        if !self.point_contents(spot).is_empty() {
            return false;
        }

        // jump out of water
        self.ps.velocity = (self.local.forward * 200.0).with_z(350.0);
        self.ps.pm_flags.insert(MoveFlags::TIME_WATERJUMP);
        self.ps.pm_time = 2000;
        true
    }

    fn water_jump_move(&mut self) {
        // waterjump has no control, but falls
        self.step_slide_move(true);

        self.ps.velocity[2] -= self.ps.gravity as f32 * self.local.frametime;
        if self.ps.velocity.z() < 0.0 {
            // cancel as soon as we are falling down again
            self.ps.pm_flags.remove(MoveFlags::ALL_TIMES);
            self.ps.pm_time = 0;
        }
    }

    /// Wish velocity along the full view axes including the up axis.
    fn free_wish(&self, idle: vec3_t) -> WishMove {
        let scale = self.cmd_scale();
        if scale == 0.0 {
            return WishMove::new(idle);
        }
        let forward = self.local.forward * (scale * self.cmd.forward_move as f32);
        let right = self.local.right * (scale * self.cmd.right_move as f32);
        let mut wish = forward + right;
        wish[2] += scale * self.cmd.up_move as f32;
        WishMove::new(wish)
    }

    fn water_move(&mut self) {
        if self.check_water_jump() {
            self.water_jump_move();
            return;
        }

        self.friction();

        // sink towards bottom
        let mut wish = self.free_wish(vec3_t::new(0.0, 0.0, -60.0));
        wish.speed = fminf(wish.speed, self.ps.speed as f32 * self.vars.swim_scale);
        self.accelerate(wish, self.vars.water_accelerate);

        // make sure we can go up slopes easily under water
        let normal = self.local.ground_trace.plane.normal;
        if self.local.ground_plane && self.ps.velocity.dot(normal) < 0.0 {
            let speed = self.ps.velocity.length();
            // slide along the ground plane
            let clipped = clip_velocity(self.ps.velocity, normal, OVERCLIP);
            self.ps.velocity = clipped.normalize() * speed;
        }

        self.slide_move(false);
    }

    fn fly_move(&mut self) {
        // normal slowdown
        self.friction();

        let wish = self.free_wish(vec3_t::ZERO);
        self.accelerate(wish, self.vars.fly_accelerate);

        self.step_slide_move(false);
    }

    fn noclip_move(&mut self) {
        self.ps.view_height = DEFAULT_VIEWHEIGHT;

        let speed = self.ps.velocity.length();
        if speed < 1.0 {
            self.ps.velocity = vec3_t::ZERO;
        } else {
            // extra friction
            let friction = self.vars.friction * 1.5;
            let control = fmaxf(speed, self.vars.stop_speed);
            let drop = control * friction * self.local.frametime;
            let new_speed = fmaxf(speed - drop, 0.0);
            self.ps.velocity *= new_speed / speed;
        }

        let scale = self.cmd_scale();
        let forward = self.local.forward * self.cmd.forward_move as f32;
        let right = self.local.right * self.cmd.right_move as f32;
        let mut wishvel = forward + right;
        wishvel[2] += self.cmd.up_move as f32;
        let mut wish = WishMove::new(wishvel);
        wish.speed *= scale;
        self.accelerate(wish, self.vars.accelerate);

        // move
        self.ps.origin = self.ps.origin.mul_add(self.local.frametime, self.ps.velocity);
    }

    fn dead_move(&mut self) {
        if !self.local.walking {
            return;
        }

        // extra friction
        let (dir, speed) = self.ps.velocity.normalize_length();
        let speed = speed - 20.0;
        self.ps.velocity = if speed <= 0.0 { vec3_t::ZERO } else { dir * speed };
    }

    /// Flies straight towards the hook.
    fn grapple_pull(&mut self) {
        let target = self.ps.grapple_point - self.local.forward * 16.0;
        let (dir, len) = (target - self.ps.origin).normalize_length();
        let speed = if len <= 100.0 { 10.0 * len } else { 3000.0 };
        self.ps.velocity = dir * speed;
        self.local.ground_plane = false;
    }

    /// Accelerates towards the hook, stronger when close.
    fn grapple_swing(&mut self) {
        let pull = match self.ps.grapple_pull {
            0 => 800.0,
            pull => pull as f32,
        };
        let (dir, len) = (self.ps.grapple_point - self.ps.origin).normalize_length();

        if len < pull / 2.0 {
            self.accelerate(WishMove { dir, speed: 30.0 * len }, len * (40.0 / pull));
        } else {
            self.accelerate(WishMove { dir, speed: 300.0 }, 20.0);
        }

        if dir.z() > 0.5 && self.local.walking {
            self.local.walking = false;
            self.force_legs_anim(LegsAnim::Jump);
        }

        self.local.ground_plane = false;
    }

    fn air_move(&mut self) {
        self.friction();

        let scale = self.cmd_scale();

        // set the movement dir so clients can rotate the legs for strafing
        self.set_movement_dir();

        // project moves down to flat plane
        let forward = self.local.forward.with_z(0.0).normalize();
        let right = self.local.right.with_z(0.0).normalize();
        let wishvel = forward * self.cmd.forward_move as f32 + right * self.cmd.right_move as f32;
        let mut wish = WishMove::new(wishvel);
        wish.speed *= scale;

        let control_speed = wish.speed;
        let mut accel = if self.ps.velocity.dot(wish.dir) < 0.0 {
            self.vars.air_stop_accelerate
        } else {
            self.vars.air_accelerate
        };
        if self.ps.movement_dir == 2 || self.ps.movement_dir == 6 {
            wish.speed = fminf(wish.speed, self.vars.strafe_wishspeed);
            accel = self.vars.strafe_accelerate;
        }

        // not on ground, so little effect on velocity
        self.accelerate(wish, accel);
        if self.vars.air_control != 0.0 {
            self.ps.velocity = air_control(
                self.ps.velocity,
                wish.dir,
                control_speed,
                self.ps.movement_dir,
                self.vars.air_control,
                self.local.frametime,
            );
        }

        // we may have a ground plane that is very steep, even
        // though we don't have a ground entity, slide along the steep plane
        if self.local.ground_plane {
            self.ps.velocity = clip_velocity(
                self.ps.velocity,
                self.local.ground_trace.plane.normal,
                OVERCLIP,
            );
        }

        self.step_slide_move(true);
    }

    fn walk_move(&mut self) {
        let normal = self.local.ground_trace.plane.normal;

        if self.water_level > 2 && self.local.forward.dot(normal) > 0.0 {
            // begin swimming
            self.water_move();
            return;
        }

        if self.check_jump() {
            // jumped away
            if self.water_level > 1 {
                self.water_move();
            } else {
                self.air_move();
            }
            return;
        }

        self.friction();

        let mut fmove = self.cmd.forward_move as f32;
        let mut smove = self.cmd.right_move as f32;
        if self.ps.pm_flags.contains(MoveFlags::SPRINT) {
            fmove *= 1.35;
            smove *= 1.1;
        } else if self.ps.weap_flags.contains(WeaponFlags::WEAPON_UP) {
            fmove *= 0.6;
            smove *= 0.4;
        }

        let scale = self.cmd_scale();

        // set the movement dir so clients can rotate the legs for strafing
        self.set_movement_dir();

        // project the forward and right directions onto the ground plane
        let forward = clip_velocity(self.local.forward.with_z(0.0), normal, OVERCLIP).normalize();
        let right = clip_velocity(self.local.right.with_z(0.0), normal, OVERCLIP).normalize();

        // when going up or down slopes the wish velocity should not be zero
        let mut wish = WishMove::new(forward * fmove + right * smove);
        wish.speed *= scale;

        // clamp the speed lower if ducking
        if self.ps.pm_flags.contains(MoveFlags::DUCKED) {
            wish.speed = fminf(wish.speed, self.ps.speed as f32 * self.vars.duck_scale);
        }

        // clamp the speed lower if wading or walking on the bottom
        if self.water_level > 0 {
            let water_scale = 1.0 - (1.0 - self.vars.swim_scale) * self.water_level as f32 / 3.0;
            wish.speed = fminf(wish.speed, self.ps.speed as f32 * water_scale);
        }

        // when a player gets hit, they temporarily lose full control,
        // which allows them to be moved a bit
        let slick = self.is_slick_or_knocked_back();
        let accel = if slick {
            self.vars.air_accelerate
        } else {
            self.vars.accelerate
        };
        self.accelerate(wish, accel);

        if slick {
            self.ps.velocity[2] -= self.ps.gravity as f32 * self.local.frametime;
        }

        // slide along the ground plane without losing speed on slopes
        let speed = self.ps.velocity.length();
        let clipped = clip_velocity(self.ps.velocity, normal, OVERCLIP);
        self.ps.velocity = clipped.normalize() * speed;

        // don't do anything if standing still
        if self.ps.velocity.x() == 0.0 && self.ps.velocity.y() == 0.0 {
            return;
        }

        self.step_slide_move(false);
    }
}
