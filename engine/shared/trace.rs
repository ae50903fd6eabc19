use bitflags::bitflags;
use math::vec3_t;

use crate::consts::ENTITYNUM_NONE;

bitflags! {
    /// Brush contents reported by the collision world.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Contents: u32 {
        /// An eye is never valid in a solid.
        const SOLID = 1;
        const LAVA = 8;
        const SLIME = 16;
        const WATER = 32;
        const FOG = 64;
        const NOTTEAM1 = 0x80;
        const NOTTEAM2 = 0x100;
        const NOBOTCLIP = 0x200;
        const AREAPORTAL = 0x8000;
        const PLAYERCLIP = 0x10000;
        const MONSTERCLIP = 0x20000;
        const TELEPORTER = 0x40000;
        const JUMPPAD = 0x80000;
        const CLUSTERPORTAL = 0x100000;
        const DONOTENTER = 0x200000;
        const BOTCLIP = 0x400000;
        const MOVER = 0x800000;
        /// Removed before bsping an entity.
        const ORIGIN = 0x1000000;
        /// Should never be on a brush, only in game.
        const BODY = 0x2000000;
        const CORPSE = 0x4000000;
        /// Brushes not used for the bsp.
        const DETAIL = 0x8000000;
        /// Brushes used for the bsp.
        const STRUCTURAL = 0x10000000;
        /// Don't consume surface fragments inside.
        const TRANSLUCENT = 0x20000000;
        const TRIGGER = 0x40000000;
        /// Don't leave bodies or items (death fog, lava).
        const NODROP = 0x80000000;

        const MASK_WATER = Self::WATER.bits() | Self::LAVA.bits() | Self::SLIME.bits();
        const MASK_PLAYERSOLID = Self::SOLID.bits() | Self::PLAYERCLIP.bits() | Self::BODY.bits();
    }
}

bitflags! {
    /// Surface properties of the plane a trace stopped on.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: u32 {
        /// Never give falling damage.
        const NODAMAGE = 0x1;
        /// Affects game physics.
        const SLICK = 0x2;
        /// Lighting from environment map.
        const SKY = 0x4;
        const LADDER = 0x8;
        /// Don't make missile explosions.
        const NOIMPACT = 0x10;
        /// Don't leave missile marks.
        const NOMARKS = 0x20;
        /// Make flesh sounds and effects.
        const FLESH = 0x40;
        /// Don't generate a drawsurface at all.
        const NODRAW = 0x80;
        const HINT = 0x100;
        const SKIP = 0x200;
        const NOLIGHTMAP = 0x400;
        const POINTLIGHT = 0x800;
        /// Clanking footsteps.
        const METALSTEPS = 0x1000;
        /// No footstep sounds.
        const NOSTEPS = 0x2000;
        /// Don't collide against curves with this set.
        const NONSOLID = 0x4000;
        const LIGHTFILTER = 0x8000;
        const ALPHASHADOW = 0x10000;
        /// Don't dlight even if solid.
        const NODLIGHT = 0x20000;
        const DUST = 0x40000;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: vec3_t,
    pub dist: f32,
}

impl Plane {
    pub const fn new(normal: vec3_t, dist: f32) -> Self {
        Self { normal, dist }
    }
}

/// Result of sweeping a box through the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trace {
    /// If true, the whole sweep was inside a solid and `plane` is invalid.
    pub all_solid: bool,
    /// The start position was inside a solid.
    pub start_solid: bool,
    /// Fraction of the sweep completed, `1.0` means nothing was hit.
    pub fraction: f32,
    /// Final position of the box.
    pub end_pos: vec3_t,
    /// Surface normal at impact.
    pub plane: Plane,
    pub surface_flags: SurfaceFlags,
    pub contents: Contents,
    /// Entity the sweep stopped on.
    pub entity_num: i32,
}

impl Trace {
    /// A sweep that reached `end` without touching anything.
    pub fn empty(end: vec3_t) -> Self {
        Self {
            all_solid: false,
            start_solid: false,
            fraction: 1.0,
            end_pos: end,
            plane: Plane::default(),
            surface_flags: SurfaceFlags::empty(),
            contents: Contents::empty(),
            entity_num: ENTITYNUM_NONE,
        }
    }

    pub fn hit(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Collision queries answered by the world.
///
/// Both queries are pure: the same arguments must give the same answer for
/// the lifetime of a move.
pub trait CollisionOracle {
    /// Sweeps the box `mins..maxs` from `start` to `end` ignoring
    /// `pass_entity` and any contents outside of `mask`.
    fn trace(
        &self,
        start: vec3_t,
        mins: vec3_t,
        maxs: vec3_t,
        end: vec3_t,
        pass_entity: i32,
        mask: Contents,
    ) -> Trace;

    /// Returns the contents at `point` ignoring `pass_entity`.
    fn point_contents(&self, point: vec3_t, pass_entity: i32) -> Contents;
}

impl<T: CollisionOracle + ?Sized> CollisionOracle for &T {
    fn trace(
        &self,
        start: vec3_t,
        mins: vec3_t,
        maxs: vec3_t,
        end: vec3_t,
        pass_entity: i32,
        mask: Contents,
    ) -> Trace {
        (**self).trace(start, mins, maxs, end, pass_entity, mask)
    }

    fn point_contents(&self, point: vec3_t, pass_entity: i32) -> Contents {
        (**self).point_contents(point, pass_entity)
    }
}
