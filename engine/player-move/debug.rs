use shared::{
    consts::ENTITYNUM_NONE,
    math::{angle_vectors, vec3_t},
    trace::CollisionOracle,
};

use crate::locomotion::Mode;

/// How far ahead the player looks for entities.
const LOOK_DIST: f32 = 256.0;

/// Returns the corners of a box at `origin`.
///
/// Bits 0, 1 and 2 of the corner index select the minimum on x, y and z.
fn box_points(mins: vec3_t, maxs: vec3_t, origin: vec3_t) -> [vec3_t; 8] {
    let mut points = [vec3_t::ZERO; 8];
    for (i, point) in points.iter_mut().enumerate() {
        let x = if i & 1 != 0 { mins[0] } else { maxs[0] };
        let y = if i & 2 != 0 { mins[1] } else { maxs[1] };
        let z = if i & 4 != 0 { mins[2] } else { maxs[2] };
        *point = origin + vec3_t::new(x, y, z);
    }
    points
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    /// Writes a line to the movement journal.
    pub(super) fn debug_journal(&self, what: &str) {
        if self.vars.debug_level > 0 {
            debug!("{}:{what}", self.counter);
        }
    }

    pub(super) fn debug_mode(&self, mode: Mode) {
        if self.vars.debug_level > 1 {
            debug!(
                "{}:{mode:?} ground={} water={} vel={:?}",
                self.counter, self.ps.ground_entity, self.water_level, self.ps.velocity
            );
        }
    }

    /// Logs the clip box of the player and the entity in front of the eyes.
    pub(super) fn show_clip_box(&self) {
        let points = box_points(self.mins, self.maxs, self.ps.origin);
        trace!("pmove: clip box {:?} {:?}", points[7], points[0]);

        let start = self.ps.origin.with_z(self.ps.origin.z() + self.ps.view_height);
        let end = start + angle_vectors(self.ps.view_angles).forward() * LOOK_DIST;
        let trace = self.trace_box(start, vec3_t::ZERO, vec3_t::ZERO, end);
        if trace.fraction < 1.0 && trace.entity_num != ENTITYNUM_NONE {
            trace!("pmove: looking at {} {:?}", trace.entity_num, trace.end_pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners() {
        let mins = vec3_t::new(-1.0, -2.0, -3.0);
        let maxs = vec3_t::new(1.0, 2.0, 3.0);
        let points = box_points(mins, maxs, vec3_t::new(10.0, 0.0, 0.0));
        assert_eq!(points[0], vec3_t::new(11.0, 2.0, 3.0));
        assert_eq!(points[7], vec3_t::new(9.0, -2.0, -3.0));
        assert_eq!(points[5], vec3_t::new(9.0, 2.0, -3.0));
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
