use crate::{
    consts::{PITCH, ROLL, YAW},
    cosf, sinf,
    vector::vec3_t,
};

/// Number of short-angle units in a full rotation.
pub const SHORT_ROTATION: i32 = 65536;
/// Number of short-angle units in half a rotation.
pub const SHORT_HALF_ROTATION: i32 = SHORT_ROTATION / 2;

/// All angle vectors.
#[derive(Copy, Clone, Debug)]
pub struct AngleVectorsAll {
    pub forward: vec3_t,
    pub right: vec3_t,
    pub up: vec3_t,
}

pub struct AngleVectors {
    sp: f32,
    cp: f32,
    sy: f32,
    cy: f32,
    sr: f32,
    cr: f32,
}

impl AngleVectors {
    pub fn new(angles: vec3_t) -> Self {
        let r = angles.to_radians();
        Self {
            sp: sinf(r[PITCH]),
            cp: cosf(r[PITCH]),
            sy: sinf(r[YAW]),
            cy: cosf(r[YAW]),
            sr: sinf(r[ROLL]),
            cr: cosf(r[ROLL]),
        }
    }

    pub fn forward(&self) -> vec3_t {
        vec3_t::new(self.cp * self.cy, self.cp * self.sy, -self.sp)
    }

    pub fn right(&self) -> vec3_t {
        vec3_t::new(
            -self.sr * self.sp * self.cy + -self.cr * -self.sy,
            -self.sr * self.sp * self.sy + -self.cr * self.cy,
            -self.sr * self.cp,
        )
    }

    pub fn up(&self) -> vec3_t {
        vec3_t::new(
            self.cr * self.sp * self.cy + -self.sr * -self.sy,
            self.cr * self.sp * self.sy + -self.sr * self.cy,
            self.cr * self.cp,
        )
    }

    /// Returns all computed angle vectors.
    pub fn all(&self) -> AngleVectorsAll {
        AngleVectorsAll {
            forward: self.forward(),
            right: self.right(),
            up: self.up(),
        }
    }
}

pub fn angle_vectors(angles: vec3_t) -> AngleVectors {
    AngleVectors::new(angles)
}

/// Folds an angle in degrees into `[0, 360)` with short-angle precision.
pub fn angle_mod(a: f32) -> f32 {
    (360.0 / 65536.0) * ((a * (65536.0 / 360.0)) as i32 & 65535) as f32
}

/// Interpolates between two angles in degrees, taking the short way around.
pub fn lerp_angle(from: f32, to: f32, frac: f32) -> f32 {
    let mut to = to;
    if to - from > 180.0 {
        to -= 360.0;
    }
    if to - from < -180.0 {
        to += 360.0;
    }
    from + frac * (to - from)
}

/// Converts degrees to a signed short angle.
pub fn angle_to_short(angle: f32) -> i16 {
    ((angle * (65536.0 / 360.0)) as i32 & 65535) as u16 as i16
}

/// Converts a short angle to degrees.
pub fn short_to_angle(value: i32) -> f32 {
    value as f32 * (360.0 / 65536.0)
}

/// Folds any integer angle into the signed short domain `[-32768, 32767]`.
pub fn wrap_short(value: i32) -> i32 {
    value.wrapping_add(SHORT_HALF_ROTATION).rem_euclid(SHORT_ROTATION) - SHORT_HALF_ROTATION
}

/// Rotates a short angle by half a rotation.
///
/// Applying it twice returns the original value.
pub fn flip_short(value: i32) -> i32 {
    wrap_short(value.wrapping_add(SHORT_HALF_ROTATION))
}
