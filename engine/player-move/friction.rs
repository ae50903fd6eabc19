use shared::{
    input::UserCmd,
    math::{fabsf, fmaxf, fminf, sqrtf, vec3_t},
    movevars::MoveVars,
    state::{MoveFlags, PmType, Powerups},
    trace::{CollisionOracle, SurfaceFlags},
};

use crate::WishMove;

/// Surroundings that decide which friction terms apply.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrictionEnv {
    pub walking: bool,
    pub water_level: u8,
    /// Standing on a slick surface.
    pub slick: bool,
    /// Knockback timer is running.
    pub knockback: bool,
    pub flight: bool,
    pub spectator: bool,
}

/// Handles both ground friction and water friction.
///
/// While walking only the horizontal speed is measured. The speed never
/// grows and the direction of the velocity is kept.
pub fn apply_friction(
    velocity: vec3_t,
    env: &FrictionEnv,
    vars: &MoveVars,
    frametime: f32,
) -> vec3_t {
    let mut vec = velocity;
    if env.walking {
        // ignore slope movement
        vec.set_z(0.0);
    }

    let speed = vec.length();
    if speed < 1.0 {
        // allow sinking underwater
        return vec3_t::new(0.0, 0.0, velocity.z());
    }

    let mut drop = 0.0;

    // no friction on slick surfaces or while knocked back
    if env.water_level <= 1 && env.walking && !env.slick && !env.knockback {
        let control = fmaxf(speed, vars.stop_speed);
        drop += control * vars.friction * frametime;
    }

    if env.water_level > 0 {
        drop += speed * vars.water_friction * env.water_level as f32 * frametime;
    }

    if env.flight {
        drop += speed * vars.flight_friction * frametime;
    }

    if env.spectator {
        drop += speed * vars.spectator_friction * frametime;
    }

    let new_speed = fmaxf(speed - drop, 0.0);
    velocity * (new_speed / speed)
}

/// Goal-seeking acceleration along `wishdir`.
///
/// Only the velocity component along `wishdir` is raised and never past
/// `wishspeed`; other components are left alone.
pub fn accelerate(
    velocity: vec3_t,
    wishdir: vec3_t,
    wishspeed: f32,
    accel: f32,
    frametime: f32,
) -> vec3_t {
    let current_speed = velocity.dot(wishdir);
    let add_speed = wishspeed - current_speed;
    if add_speed <= 0.0 {
        return velocity;
    }
    let accel_speed = fminf(accel * frametime * wishspeed, add_speed);
    velocity + wishdir * accel_speed
}

/// Returns the scale factor to apply to the command movement axes so that
/// diagonal input is no faster than axial input.
pub fn cmd_scale(cmd: &UserCmd, speed: i32) -> f32 {
    let f = cmd.forward_move as f32;
    let r = cmd.right_move as f32;
    let u = cmd.up_move as f32;

    let max = fmaxf(fmaxf(fabsf(f), fabsf(r)), fabsf(u));
    if max == 0.0 {
        return 0.0;
    }

    let total = sqrtf(f * f + r * r + u * u);
    speed as f32 * max / (127.0 * total)
}

/// Bends the horizontal velocity towards `wishdir` without changing its
/// length.
///
/// Only applies while moving straight forward or backward.
pub fn air_control(
    velocity: vec3_t,
    wishdir: vec3_t,
    wishspeed: f32,
    movement_dir: u8,
    strength: f32,
    frametime: f32,
) -> vec3_t {
    if (movement_dir != 0 && movement_dir != 4) || wishspeed == 0.0 {
        return velocity;
    }

    let z = velocity.z();
    let (dir, speed) = velocity.with_z(0.0).normalize_length();
    let dot = dir.dot(wishdir);
    let k = 32.0 * strength * dot * dot * frametime;

    let dir = if dot > 0.0 {
        (dir * speed + wishdir * k).normalize()
    } else {
        dir
    };

    (dir * speed).with_z(z)
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    pub(super) fn friction_env(&self) -> FrictionEnv {
        FrictionEnv {
            walking: self.local.walking,
            water_level: self.water_level,
            slick: self
                .local
                .ground_trace
                .surface_flags
                .contains(SurfaceFlags::SLICK),
            knockback: self.ps.pm_flags.contains(MoveFlags::TIME_KNOCKBACK),
            flight: self.ps.powerups.contains(Powerups::FLIGHT),
            spectator: self.ps.pm_type == PmType::Spectator,
        }
    }

    pub(super) fn friction(&mut self) {
        let env = self.friction_env();
        self.ps.velocity = apply_friction(self.ps.velocity, &env, &self.vars, self.local.frametime);
    }

    pub(super) fn accelerate(&mut self, wish: WishMove, accel: f32) {
        self.ps.velocity = accelerate(
            self.ps.velocity,
            wish.dir,
            wish.speed,
            accel,
            self.local.frametime,
        );
    }

    pub(super) fn cmd_scale(&self) -> f32 {
        cmd_scale(&self.cmd, self.ps.speed)
    }
}
