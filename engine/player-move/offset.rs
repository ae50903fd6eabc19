//! On-screen position of the weapon.

use shared::{
    consts::DEFAULT_VIEWHEIGHT,
    math::{angle_vectors, fabsf, fmaxf, fminf, lerp, pow2, sinf, vec3_t},
    movevars::SprintStyle,
    state::WeaponFlags,
    trace::CollisionOracle,
};

use crate::articulation::Carry;

/// Distance from the eye along the view direction.
const EYE_FORWARD: f32 = 26.0;

/// Speed at which the weapon no longer gets a head start towards its target.
const SETTLE_SPEED: f32 = 160.0;

/// Bounce per unit of velocity change.
const BOUNCE_MULT: f32 = 0.015;

/// Fraction of the bounce lost every step.
const BOUNCE_DECAY: f32 = 0.1;

/// Where the weapon is held in weapon space and how it bounces around it.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Hold {
    target: vec3_t,
    bounce_scale: f32,
    diff_mult: f32,
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    fn hold(&mut self, carry: Carry) -> Hold {
        let vars = &self.vars;
        let arm = vars.arm_length;
        let flags = &mut self.ps.weap_flags;
        let mut t = vars.base_weap_offset;

        // keep the weapon from crossing the screen when turning
        if flags.contains(WeaponFlags::WEAPON_LEFT) && t.y() >= -arm {
            t.set_x(t.x() - (t.y() + arm));
            t.set_y(-arm);
        }
        if flags.contains(WeaponFlags::WEAPON_RIGHT) && t.y() <= arm {
            t.set_x(t.x() - (arm - t.y()));
            t.set_y(arm);
        }

        let min = vars.min_weap_pos - vec3_t::splat(arm);
        let max = vars.max_weap_pos + vec3_t::splat(arm);
        t.set_x(fmaxf(t.x(), min.x()));
        if carry != Carry::Aim {
            t.set_x(fminf(t.x(), max.x()));
        }
        if t.y() < min.y() {
            flags.remove(WeaponFlags::WEAPON_LEFT);
            t.set_y(min.y());
        }
        if t.y() > max.y() {
            flags.remove(WeaponFlags::WEAPON_RIGHT);
            t.set_y(max.y());
        }
        t.set_z(fminf(fmaxf(t.z(), min.z()), max.z()));

        match carry {
            Carry::Sprint(SprintStyle::Classic) => {
                t.set_x(7.0);
                t.set_z(-5.0);
                Hold {
                    target: t,
                    bounce_scale: 0.25,
                    diff_mult: 1.0,
                }
            }
            Carry::Aim => {
                let sights = vars.sights_offset;
                t.set_y(sights.y());
                if t.x() > sights.x() + 1.0 {
                    t.set_x(sights.x() + 0.1);
                } else if t.x() < sights.x() - 1.0 {
                    t.set_x(sights.x() - 0.1);
                }
                t.set_z(sights.z());
                Hold {
                    target: t,
                    bounce_scale: 0.075,
                    diff_mult: 0.25,
                }
            }
            Carry::Sprint(SprintStyle::Lunge) | Carry::Hip => {
                // lower when looking up, raise when looking down
                let pitch = (-self.ps.view_angles.pitch()).to_radians();
                t.set_x(vars.base_weap_offset.x() + 12.0);
                t.set_z(-7.0 - sinf(pitch) * 7.0);
                Hold {
                    target: t,
                    bounce_scale: 0.15,
                    diff_mult: 1.0,
                }
            }
        }
    }

    /// Moves the weapon offset towards its target and reacts to velocity
    /// changes.
    pub(super) fn impact_view_item(&mut self) {
        let carry = Carry::of(self.ps, self.vars.sprint_style);
        let hold = self.hold(carry);
        let airborne = !self.ps.is_grounded();
        let shouldered = self.local.shouldered;
        let vars = &self.vars;

        let mut local = hold.target;
        let mut bounce_scale = hold.bounce_scale;
        if airborne {
            bounce_scale *= 2.0;
        }
        if shouldered {
            local.set_x(vars.base_weap_offset.x());
            local.set_y(local.y() * 0.5);
            local.set_z(vars.base_weap_offset.z());
        }

        let av = angle_vectors(self.ps.weapon_angles).all();
        let mut target = av.forward * local.x() + av.right * local.y() + av.up * local.z();

        // hang the weapon from the body
        let rigidity = if shouldered {
            target[2] += DEFAULT_VIEWHEIGHT;
            if airborne {
                -1000.0
            } else {
                -205.0
            }
        } else if carry == Carry::Aim {
            target[2] += DEFAULT_VIEWHEIGHT;
            10000.0
        } else {
            target[2] += DEFAULT_VIEWHEIGHT - 10.0;
            200.0
        };
        target[2] += self.ps.view_height - DEFAULT_VIEWHEIGHT;

        let velocity = self.ps.velocity;
        let arm = vars.arm_length;
        let impact = vec3_t::new(
            -1.5 * velocity.x() / rigidity,
            -1.5 * velocity.y() / rigidity,
            -velocity.z() / rigidity,
        )
        .clamp(vec3_t::splat(-arm), vec3_t::splat(arm));

        let previous = self.local.previous_velocity;
        let art = &mut self.ps.articulation;
        for i in 0..3 {
            let mut mult = BOUNCE_MULT * hold.diff_mult;
            if i == 2 {
                mult *= 2.0;
            }
            art.bounce[i] -= mult * (velocity[i] - previous[i]);
        }
        art.bounce += (target - self.ps.weapon_offset) * bounce_scale;
        art.bounce *= 1.0 - BOUNCE_DECAY;

        target += impact + art.bounce;
        art.weap_offs_blend = target;
        art.view_offs_blend = angle_vectors(self.ps.view_angles).forward() * EYE_FORWARD;

        let frac = art.weap_pos_lerp_frac / 1.25;
        for i in 0..3 {
            let mut settle = pow2(1.0 - fminf(fabsf(velocity[i]) / SETTLE_SPEED, 1.0)) / 5.0;
            if i == 2 {
                settle /= 2.0;
            }
            self.ps.weapon_offset[i] = lerp(self.ps.weapon_offset[i], target[i], settle + frac);
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::{
        input::{Buttons, UserCmd},
        movevars::MoveVars,
        state::PlayerState,
    };

    use super::*;
    use crate::{
        player_move,
        testing::{grounded_player, SlabWorld},
    };

    fn run(ps: &mut PlayerState, vars: &MoveVars, cmd: UserCmd, steps: i32) {
        let world = SlabWorld::flat();
        for _ in 0..steps {
            let server_time = ps.command_time + 16;
            player_move(ps, UserCmd { server_time, ..cmd }, vars, &world);
        }
    }

    fn buttons(buttons: Buttons) -> UserCmd {
        UserCmd {
            buttons,
            ..UserCmd::default()
        }
    }

    fn assert_near(a: vec3_t, b: vec3_t) {
        assert!((a - b).length() < 0.2, "{a:?} != {b:?}");
    }

    #[test]
    fn hip_position_settles() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, UserCmd::default(), 300);
        assert_near(ps.weapon_offset, vec3_t::new(9.0, 0.0, 9.0));
        assert_near(ps.articulation.view_offs_blend, vec3_t::new(EYE_FORWARD, 0.0, 0.0));
        assert!(ps.articulation.bounce.length() < 0.05);
    }

    #[test]
    fn aiming_brings_the_sights_to_the_eye() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, buttons(Buttons::AIM), 300);
        // weapon right points along -y when facing +x
        let sights = vars.sights_offset;
        let expected = vec3_t::new(sights.x() - 0.1, -sights.y(), sights.z() + DEFAULT_VIEWHEIGHT);
        assert_near(ps.weapon_offset, expected);
    }

    #[test]
    fn hands_push_the_weapon_aside() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, buttons(Buttons::HAND_LEFT), 300);
        assert!(ps.weap_flags.contains(WeaponFlags::WEAPON_LEFT));
        assert_near(ps.weapon_offset, vec3_t::new(9.0, vars.arm_length, 9.0));

        run(&mut ps, &vars, buttons(Buttons::HAND_RIGHT), 300);
        assert!(ps.weap_flags.contains(WeaponFlags::WEAPON_RIGHT));
        assert_near(ps.weapon_offset, vec3_t::new(9.0, -vars.arm_length, 9.0));
    }

    #[test]
    fn shouldered_weapon_pulls_in() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, buttons(Buttons::GAP_DOWN), 300);
        assert_eq!(ps.articulation.max_base_gap, vars.min_base_gap);
        let base = vars.base_weap_offset;
        assert_near(
            ps.weapon_offset,
            vec3_t::new(base.x(), 0.0, base.z() + DEFAULT_VIEWHEIGHT),
        );
    }

    #[test]
    fn offset_stays_bounded_while_moving() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        for i in 0..300 {
            let cmd = UserCmd {
                angles: [0, (i * 700) & 0xffff, 0],
                buttons: if i % 50 < 20 {
                    Buttons::AIM
                } else {
                    Buttons::empty()
                },
                forward_move: 127,
                right_move: if i % 30 < 15 { 127 } else { -127 },
                up_move: if i % 60 == 0 { 127 } else { 0 },
                ..UserCmd::default()
            };
            run(&mut ps, &vars, cmd, 1);
            assert!(ps.weapon_offset.length() < 60.0, "step {i}: {:?}", ps.weapon_offset);
            assert!(!ps.weapon_offset.is_nan());
        }
    }

    #[test]
    fn landing_bounces_the_weapon() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, UserCmd::default(), 100);
        let rest = ps.weapon_offset;

        // the body stops and the weapon keeps going down
        ps.velocity = vec3_t::new(0.0, 0.0, -300.0);
        run(&mut ps, &vars, UserCmd::default(), 1);
        assert!(ps.articulation.bounce.z() < -1.0, "{:?}", ps.articulation.bounce);
        run(&mut ps, &vars, UserCmd::default(), 300);
        assert_near(ps.weapon_offset, rest);
    }
}
