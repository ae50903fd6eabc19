use alloc::vec::Vec;
use shared::{
    consts::{ENTITYNUM_WORLD, MINS_Z},
    input::UserCmd,
    math::vec3_t,
    movevars::MoveVars,
    state::PlayerState,
    trace::{CollisionOracle, Contents, Plane, SurfaceFlags, Trace},
};

use crate::{MoveLocal, PlayerMove};

const SURFACE_CLIP_EPSILON: f32 = 0.125;

/// Everything behind `plane` (`dot(p, normal) < dist`) is solid.
#[derive(Copy, Clone, Debug)]
pub struct Slab {
    pub plane: Plane,
    pub surface_flags: SurfaceFlags,
    pub entity_num: i32,
}

/// A world built from solid half-spaces and an optional water surface.
#[derive(Clone, Debug, Default)]
pub struct SlabWorld {
    pub slabs: Vec<Slab>,
    pub water_top: Option<f32>,
}

impl SlabWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// An infinite floor at `z = 0`.
    pub fn flat() -> Self {
        Self::new().with_floor(0.0, SurfaceFlags::empty())
    }

    pub fn with_floor(self, z: f32, surface_flags: SurfaceFlags) -> Self {
        self.with_slab(vec3_t::Z, z, surface_flags)
    }

    pub fn with_slab(mut self, normal: vec3_t, dist: f32, surface_flags: SurfaceFlags) -> Self {
        self.slabs.push(Slab {
            plane: Plane::new(normal.normalize(), dist),
            surface_flags,
            entity_num: ENTITYNUM_WORLD,
        });
        self
    }

    pub fn with_water(mut self, top: f32) -> Self {
        self.water_top = Some(top);
        self
    }
}

impl CollisionOracle for SlabWorld {
    fn trace(
        &self,
        start: vec3_t,
        mins: vec3_t,
        maxs: vec3_t,
        end: vec3_t,
        _pass_entity: i32,
        mask: Contents,
    ) -> Trace {
        let mut result = Trace::empty(end);
        if !mask.contains(Contents::SOLID) {
            return result;
        }

        for slab in &self.slabs {
            let n = slab.plane.normal;
            let mut offset = 0.0;
            for i in 0..3 {
                offset += if n[i] < 0.0 { maxs[i] } else { mins[i] } * n[i];
            }
            let d_start = start.dot(n) + offset - slab.plane.dist;
            let d_end = end.dot(n) + offset - slab.plane.dist;

            if d_start < 0.0 {
                result.start_solid = true;
                if d_end < 0.0 {
                    result.all_solid = true;
                    result.fraction = 0.0;
                    result.contents = Contents::SOLID;
                }
                continue;
            }

            if d_end < SURFACE_CLIP_EPSILON && d_end < d_start {
                let fraction = ((d_start - SURFACE_CLIP_EPSILON) / (d_start - d_end)).clamp(0.0, 1.0);
                if fraction < result.fraction {
                    result.fraction = fraction;
                    result.plane = slab.plane;
                    result.surface_flags = slab.surface_flags;
                    result.contents = Contents::SOLID;
                    result.entity_num = slab.entity_num;
                }
            }
        }

        result.end_pos = start + (end - start) * result.fraction;
        result
    }

    fn point_contents(&self, point: vec3_t, _pass_entity: i32) -> Contents {
        let mut contents = Contents::empty();
        if self.slabs.iter().any(|s| point.dot(s.plane.normal) < s.plane.dist) {
            contents |= Contents::SOLID;
        }
        if self.water_top.is_some_and(|top| point.z() < top) {
            contents |= Contents::WATER;
        }
        contents
    }
}

pub fn cmd_at(server_time: i32) -> UserCmd {
    UserCmd {
        server_time,
        ..UserCmd::default()
    }
}

/// A standing player resting on the floor at `z = 0`.
pub fn grounded_player() -> PlayerState {
    PlayerState {
        origin: vec3_t::new(0.0, 0.0, -MINS_Z + SURFACE_CLIP_EPSILON),
        ground_entity: ENTITYNUM_WORLD,
        ..PlayerState::default()
    }
}

impl<'a> PlayerMove<'a, SlabWorld> {
    /// Sets up a context as the start of a sub-step of `msec` would.
    pub fn for_test(
        ps: &'a mut PlayerState,
        cmd: UserCmd,
        vars: &MoveVars,
        world: &'a SlabWorld,
        msec: i32,
    ) -> Self {
        let mut pm = PlayerMove::new(ps, cmd, *vars, world, Contents::MASK_PLAYERSOLID);
        pm.local = MoveLocal {
            msec,
            frametime: msec as f32 * 0.001,
            previous_origin: pm.ps.origin,
            previous_velocity: pm.ps.velocity,
            ..MoveLocal::default()
        };
        pm.local.right = vec3_t::new(0.0, -1.0, 0.0);
        pm.check_duck();
        pm.set_water_level();
        pm.ground_trace();
        pm
    }
}
