//! Weapon and view orientation.
//!
//! One of the weapon and the view is the parent and follows the input
//! angles directly. The other is the child and is dragged along inside a
//! gap around the parent. Both produce blend targets which the displayed
//! angles chase at rates that depend on how the weapon is carried.

use core::f32::consts::FRAC_PI_2;

use shared::{
    consts::PITCH_LIMIT_SHORT,
    input::Buttons,
    math::{
        angle_to_short, asinf, atanf, cosf, fabsf, flip_short, fmaxf, fminf, lerp, lerp_angle,
        short_to_angle, sinf, sqrtf, vec3_t, wrap_short, SHORT_ROTATION,
    },
    movevars::SprintStyle,
    state::{MoveFlags, PlayerState, PmType, WeaponFlags},
    trace::CollisionOracle,
    PITCH, ROLL, YAW,
};

/// Gap change of a single step of GAP_UP or GAP_DOWN, in degrees.
const GAP_STEP: f32 = 3.0;

/// A parent beyond a quarter turn points behind the player.
const BEHIND: i32 = SHORT_ROTATION / 4 - 1;

/// Rate at which the weapon is raised to the eye.
const STANCE_RATE: f32 = 0.05;

/// Rate at which rolls are blended.
const ROLL_FRAC: f32 = 0.05;

/// How the weapon is carried, in order of precedence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Carry {
    Sprint(SprintStyle),
    Aim,
    Hip,
}

impl Carry {
    pub(super) fn of(ps: &PlayerState, style: SprintStyle) -> Self {
        if ps.pm_flags.contains(MoveFlags::SPRINT) {
            Self::Sprint(style)
        } else if ps.weap_flags.contains(WeaponFlags::WEAPON_UP) {
            Self::Aim
        } else {
            Self::Hip
        }
    }
}

/// Fraction of the parent motion passed to the child inside the gap.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Drag {
    pitch: f32,
    yaw: f32,
}

/// Moves displayed angles towards their targets and keeps them inside
/// `(-360, 360)`.
fn chase(current: vec3_t, target: vec3_t, frac: f32) -> vec3_t {
    let mut out = vec3_t::new(
        lerp_angle(current[PITCH], target[PITCH], frac),
        lerp_angle(current[YAW], target[YAW], frac),
        lerp_angle(current[ROLL], target[ROLL], ROLL_FRAC),
    );
    for i in out.iter_mut() {
        if *i >= 360.0 {
            *i -= 360.0;
        } else if *i <= -360.0 {
            *i += 360.0;
        }
    }
    out
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    /// Applies GAP_UP and GAP_DOWN to the gap limits.
    ///
    /// Returns `true` if the weapon is pulled in to the shoulder.
    fn check_weapon_handling(&mut self) -> bool {
        let vars = &self.vars;
        let flags = self.ps.weap_flags;
        let art = &mut self.ps.articulation;

        let gap = if flags.contains(WeaponFlags::WEAPON_UP) {
            &mut art.max_sights_gap
        } else {
            &mut art.max_base_gap
        };
        if flags.contains(WeaponFlags::GAP_UP) {
            *gap += GAP_STEP;
        }
        if flags.contains(WeaponFlags::GAP_DOWN) {
            *gap -= GAP_STEP;
        }

        art.max_sights_gap = fmaxf(
            fminf(art.max_sights_gap, vars.max_sights_gap),
            vars.min_sights_gap,
        );
        art.max_base_gap = fmaxf(
            fminf(art.max_base_gap, vars.max_base_gap),
            vars.min_base_gap,
        );

        art.max_base_gap <= vars.min_base_gap && flags.contains(WeaponFlags::GAP_DOWN)
    }

    fn set_last_body_stance(&mut self) {
        let sprint = self.ps.pm_flags.contains(MoveFlags::SPRINT);
        let aim = self.ps.weap_flags.contains(WeaponFlags::WEAPON_UP);
        let art = &mut self.ps.articulation;
        art.last_stance = if sprint || !aim {
            0.0
        } else if art.last_stance + 0.01 >= 1.0 {
            1.0
        } else {
            lerp(art.last_stance, 1.0, STANCE_RATE)
        };
    }

    /// Animates the gap limit towards the limit of `carry`.
    fn update_gap_lerp(&mut self, carry: Carry) -> Drag {
        let vars = &self.vars;
        let art = &mut self.ps.articulation;

        let (target, rate, drag) = match carry {
            Carry::Sprint(SprintStyle::Classic) => {
                (vars.sprint_gap, 0.25, Drag { pitch: 0.5, yaw: 0.5 })
            }
            // the view swings against the turn
            Carry::Sprint(SprintStyle::Lunge) => {
                (vars.lunge_gap, 0.25, Drag { pitch: 0.1, yaw: -1.0 })
            }
            Carry::Aim => {
                let rate = if art.last_stance >= 1.0 { 1.0 } else { 0.25 };
                (art.max_sights_gap, rate, Drag { pitch: 0.8, yaw: 0.8 })
            }
            Carry::Hip => (art.max_base_gap, 0.25, Drag { pitch: 0.5, yaw: 0.5 }),
        };

        art.gap_lerp = lerp(art.gap_lerp, target, rate);
        if self.ps.weap_flags.contains(WeaponFlags::VIEW_UNLOCK) {
            art.gap_lerp = vars.max_base_gap;
        }
        drag
    }

    /// Returns the commanded pitch and yaw in short-angle units.
    fn input_angles(&mut self) -> [i32; 2] {
        let mut out = [0; 2];
        for (i, out) in out.iter_mut().enumerate() {
            let cmd = self.cmd.angles[i];
            let mut value = wrap_short(cmd.wrapping_add(self.ps.delta_angles[i]));
            if i == PITCH {
                // don't let the player look up or down more than 90 degrees
                if value > PITCH_LIMIT_SHORT {
                    self.ps.delta_angles[i] = PITCH_LIMIT_SHORT.wrapping_sub(cmd);
                    value = PITCH_LIMIT_SHORT;
                } else if value < -PITCH_LIMIT_SHORT {
                    self.ps.delta_angles[i] = (-PITCH_LIMIT_SHORT).wrapping_sub(cmd);
                    value = -PITCH_LIMIT_SHORT;
                }
            }
            *out = value;
        }
        out
    }

    /// Computes the weapon and view targets from the input angles.
    fn update_view_angles(&mut self, drag: Drag) {
        if self.ps.pm_flags.contains(MoveFlags::RESPAWNED) {
            let art = &mut self.ps.articulation;
            art.switching_parent = false;
            art.weap_ang_blend = art.view_ang_blend;
            return;
        }

        let input = self.input_angles();
        let switched = self.ps.weap_flags.contains(WeaponFlags::PARENT_SWITCH);
        let art = &mut self.ps.articulation;
        // sway and punch are not fed back into the child
        let view = art.view_ang_blend;
        let weapon = art.weap_ang_blend;

        let mut parent = [0; 2];
        let mut child = [0; 2];
        let mut flipped = [false; 2];
        for i in 0..2 {
            let view = angle_to_short(view[i]) as i32;
            let weapon = angle_to_short(weapon[i]) as i32;
            let (leader, follower) = if switched {
                (view, weapon)
            } else {
                (weapon, view)
            };

            if art.switching_parent {
                // the new parent starts where it is now
                art.swap_gap[i] = wrap_short(input[i] - leader);
                art.old_angles[i] = leader;
            }

            parent[i] = wrap_short(input[i] - art.swap_gap[i]);
            child[i] = follower;

            if parent[i] > BEHIND || parent[i] < -BEHIND {
                parent[i] = flip_short(parent[i]);
                child[i] = flip_short(child[i]);
                art.old_angles[i] = flip_short(art.old_angles[i]);
                flipped[i] = true;
            }
        }
        art.switching_parent = false;

        let gap = [
            wrap_short(parent[PITCH] - child[PITCH]) as f32,
            wrap_short(parent[YAW] - child[YAW]) as f32,
        ];
        let bound = angle_to_short(art.gap_lerp) as f32;

        if sqrtf(gap[PITCH] * gap[PITCH] + gap[YAW] * gap[YAW]) > bound {
            // pull the child back onto the edge of the gap
            let theta = if gap[YAW] == 0.0 {
                FRAC_PI_2
            } else {
                atanf(gap[PITCH] / gap[YAW])
            };
            let pull = [bound * fabsf(sinf(theta)), bound * cosf(theta)];
            for i in 0..2 {
                let parent = parent[i] as f32;
                child[i] = if gap[i] < 0.0 {
                    (parent + pull[i]) as i32
                } else {
                    (parent - pull[i]) as i32
                };
            }
        } else {
            let turn = |i: usize| wrap_short(parent[i] - art.old_angles[i]) as f32;
            child[PITCH] += (turn(PITCH) * drag.pitch) as i32;
            child[YAW] += (turn(YAW) * drag.yaw) as i32;
        }

        for i in 0..2 {
            if flipped[i] {
                parent[i] = flip_short(parent[i]);
                child[i] = flip_short(child[i]);
            } else {
                child[i] = wrap_short(child[i]);
            }

            art.old_angles[i] = parent[i];

            let (weapon, view) = if switched {
                (child[i], parent[i])
            } else {
                (parent[i], child[i])
            };
            art.weap_ang_blend[i] = short_to_angle(weapon);
            art.view_ang_blend[i] = short_to_angle(view);

            let gap = (art.weap_ang_blend[i] - art.view_ang_blend[i]).to_radians();
            self.local.weap_view_gap[i] = asinf(sinf(gap)).to_degrees();
        }
    }

    /// Picks the rates at which the displayed angles and offset chase their
    /// targets.
    fn update_lerp_fractions(&mut self, carry: Carry) {
        let flat_speed = self.ps.velocity.with_z(0.0).length();
        let sprint_mult = fmaxf(fminf((flat_speed - 320.0) * 0.02, 5.0), 0.0);
        let [gap_pitch, gap_yaw] = self.local.weap_view_gap;
        let dist = sqrtf(gap_pitch * gap_pitch + gap_yaw * gap_yaw);
        let hand = self.ps.last_hand as f32;
        let airborne = !self.ps.is_grounded();
        let walking = self.is_button(Buttons::WALKING);

        let vars = &self.vars;
        let ps = &mut *self.ps;
        let art = &mut ps.articulation;
        let mut roll = 0.0;

        match carry {
            Carry::Sprint(SprintStyle::Classic) if airborne => {
                art.weap_ang_lerp_frac = lerp(art.weap_ang_lerp_frac, 0.1, 0.65);
                art.view_ang_lerp_frac = lerp(art.view_ang_lerp_frac, 1.0, 0.5);
                art.weap_pos_lerp_frac = 0.07;
            }
            Carry::Sprint(SprintStyle::Classic) => {
                // lower the weapon to the side of the hand holding it
                let angle = vars.sprint_weap_angle;
                let pitch = if ps.last_hand == 0 {
                    3.0 * angle.pitch()
                } else {
                    angle.pitch()
                };
                art.weap_ang_blend.set_pitch(pitch);
                art.weap_ang_blend
                    .set_yaw(hand * angle.yaw() + art.view_ang_blend.yaw());

                art.weap_ang_lerp_frac = 0.075;
                art.view_ang_lerp_frac = if dist >= art.gap_lerp / 2.0 && dist < art.gap_lerp {
                    0.8
                } else {
                    0.5
                };
                art.weap_pos_lerp_frac = 0.025;

                ps.weap_flags.remove(WeaponFlags::WEAPON_UP);
                ps.zoomed = false;
            }
            Carry::Sprint(SprintStyle::Lunge) => {
                art.weap_ang_lerp_frac = lerp(art.weap_ang_lerp_frac, 1.0, 0.5);
                art.view_ang_lerp_frac = 0.75;
                art.weap_pos_lerp_frac = 0.1;

                // lean into the turn
                roll = 0.25 * gap_pitch * hand - 0.1 * gap_yaw + 5.0 * hand;
                roll += sprint_mult * (0.12 * gap_pitch * hand - 0.1 * gap_yaw + 2.0 * hand);

                ps.zoomed = false;
            }
            _ if walking => {
                art.weap_pos_lerp_frac = lerp(art.weap_pos_lerp_frac, 0.2, 0.5);
            }
            Carry::Aim if airborne => {
                art.weap_ang_lerp_frac = lerp(art.weap_ang_lerp_frac, 0.25, 0.5);
                art.view_ang_lerp_frac = lerp(art.view_ang_lerp_frac, 1.0, art.last_stance);
                art.weap_pos_lerp_frac = lerp(art.weap_pos_lerp_frac, 0.05, 0.5);
                ps.zoomed = true;
            }
            Carry::Aim => {
                art.weap_ang_lerp_frac = lerp(art.weap_ang_lerp_frac, 1.0, 0.5);
                art.view_ang_lerp_frac = 1.0;
                art.weap_pos_lerp_frac = lerp(art.weap_pos_lerp_frac, 0.2, 0.5);
                ps.zoomed = true;
            }
            Carry::Hip => {
                art.weap_ang_lerp_frac = lerp(art.weap_ang_lerp_frac, 1.0, 0.5);
                art.view_ang_lerp_frac = lerp(art.view_ang_lerp_frac, 1.0, 0.25);
                art.weap_pos_lerp_frac = 0.1;
                ps.zoomed = false;
            }
        }

        art.view_ang_blend.set_roll(roll);
    }

    /// Updates the weapon and view angles of the player.
    pub(super) fn update_articulated_angles(&mut self) {
        if self.ps.pm_type.is_intermission() {
            return;
        }
        if self.ps.pm_type != PmType::Spectator && self.ps.health <= 0 {
            return;
        }

        self.local.shouldered = self.check_weapon_handling();
        self.set_last_body_stance();

        let carry = Carry::of(self.ps, self.vars.sprint_style);
        let drag = self.update_gap_lerp(carry);
        self.update_view_angles(drag);
        self.update_lerp_fractions(carry);
        self.drop_punch();

        let sway = self.sway();
        let art = &mut self.ps.articulation;
        art.weap_ang_blend.set_roll(0.0);
        let target = art.weap_ang_blend + sway + art.punch;

        self.ps.weapon_angles = chase(self.ps.weapon_angles, target, art.weap_ang_lerp_frac);
        self.ps.view_angles = chase(self.ps.view_angles, art.view_ang_blend, art.view_ang_lerp_frac);
    }
}

#[cfg(test)]
mod tests {
    use shared::{input::UserCmd, movevars::MoveVars};

    use super::*;
    use crate::{
        player_move,
        testing::{cmd_at, grounded_player, SlabWorld},
        PlayerMove,
    };

    fn run(ps: &mut PlayerState, vars: &MoveVars, cmd: UserCmd, steps: i32) {
        let world = SlabWorld::flat();
        for _ in 0..steps {
            let server_time = ps.command_time + 16;
            player_move(ps, UserCmd { server_time, ..cmd }, vars, &world);
        }
    }

    fn yaw_cmd(yaw: f32) -> UserCmd {
        UserCmd {
            angles: [0, angle_to_short(yaw) as i32, 0],
            ..UserCmd::default()
        }
    }

    fn angle_diff(a: f32, b: f32) -> f32 {
        let mut d = (a - b) % 360.0;
        if d > 180.0 {
            d -= 360.0;
        } else if d < -180.0 {
            d += 360.0;
        }
        d
    }

    #[test]
    fn sharp_turn_drags_the_view_to_the_gap() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, yaw_cmd(90.0), 1);

        assert!((ps.weapon_angles.yaw() - 90.0).abs() < 0.5, "{:?}", ps.weapon_angles);
        assert!((ps.view_angles.yaw() - 30.0).abs() < 0.5, "{:?}", ps.view_angles);
        let gap = angle_diff(ps.weapon_angles.yaw(), ps.view_angles.yaw());
        assert!(gap.abs() <= ps.articulation.gap_lerp + 0.5);
    }

    #[test]
    fn gap_holds_while_turning() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        for i in 1..80 {
            let cmd = UserCmd {
                angles: [(i * 150) % 8000, (i * 3000) & 0xffff, 0],
                ..UserCmd::default()
            };
            run(&mut ps, &vars, cmd, 1);

            let pitch = angle_diff(ps.weapon_angles.pitch(), ps.view_angles.pitch());
            let yaw = angle_diff(ps.weapon_angles.yaw(), ps.view_angles.yaw());
            let gap = (pitch * pitch + yaw * yaw).sqrt();
            assert!(gap <= ps.articulation.gap_lerp + 0.5, "step {i}: {gap}");
        }
    }

    #[test]
    fn pitch_is_limited() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            angles: [20000, 0, 0],
            ..UserCmd::default()
        };
        run(&mut ps, &vars, cmd, 1);
        assert_eq!(ps.delta_angles[PITCH], PITCH_LIMIT_SHORT - 20000);
        assert!(ps.weapon_angles.pitch() < 88.0);
    }

    #[test]
    fn gap_buttons_move_within_bounds() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let mut pm = PlayerMove::for_test(&mut ps, cmd_at(16), &vars, &world, 16);

        pm.ps.weap_flags = WeaponFlags::GAP_DOWN;
        assert!(!pm.check_weapon_handling());
        assert_eq!(pm.ps.articulation.max_base_gap, 57.0);
        let mut shouldered = false;
        for _ in 0..20 {
            shouldered = pm.check_weapon_handling();
        }
        assert!(shouldered);
        assert_eq!(pm.ps.articulation.max_base_gap, vars.min_base_gap);

        pm.ps.weap_flags = WeaponFlags::GAP_UP;
        for _ in 0..30 {
            assert!(!pm.check_weapon_handling());
        }
        assert_eq!(pm.ps.articulation.max_base_gap, vars.max_base_gap);

        pm.ps.weap_flags = WeaponFlags::WEAPON_UP | WeaponFlags::GAP_DOWN;
        pm.check_weapon_handling();
        assert_eq!(pm.ps.articulation.max_sights_gap, 37.0);
        assert_eq!(pm.ps.articulation.max_base_gap, vars.max_base_gap);
    }

    #[test]
    fn aiming_narrows_the_gap() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            buttons: Buttons::AIM,
            ..UserCmd::default()
        };
        run(&mut ps, &vars, cmd, 200);
        assert_eq!(ps.articulation.last_stance, 1.0);
        assert!((ps.articulation.gap_lerp - vars.max_sights_gap).abs() < 0.01);
        assert!(ps.zoomed);

        run(&mut ps, &vars, UserCmd::default(), 1);
        assert_eq!(ps.articulation.last_stance, 0.0);
        assert!(!ps.zoomed);
    }

    #[test]
    fn view_unlock_uses_the_base_gap() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            buttons: Buttons::AIM | Buttons::UNLOCK_AIM,
            ..UserCmd::default()
        };
        run(&mut ps, &vars, cmd, 10);
        assert_eq!(ps.articulation.gap_lerp, vars.max_base_gap);
    }

    #[test]
    fn respawn_points_the_weapon_at_the_view() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        ps.pm_flags = MoveFlags::RESPAWNED;
        ps.articulation.view_ang_blend = vec3_t::new(10.0, 45.0, 0.0);
        ps.articulation.weap_ang_blend = vec3_t::new(-20.0, 100.0, 0.0);
        ps.articulation.switching_parent = true;
        let mut pm = PlayerMove::for_test(&mut ps, cmd_at(16), &vars, &world, 16);
        pm.update_view_angles(Drag { pitch: 0.5, yaw: 0.5 });
        assert_eq!(pm.ps.articulation.weap_ang_blend, vec3_t::new(10.0, 45.0, 0.0));
        assert!(!pm.ps.articulation.switching_parent);
    }

    #[test]
    fn parent_switch_does_not_jump() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        run(&mut ps, &vars, yaw_cmd(20.0), 10);
        let weapon = ps.weapon_angles;
        let view = ps.view_angles;
        assert!(angle_diff(weapon.yaw(), view.yaw()).abs() > 5.0);

        let cmd = UserCmd {
            buttons: Buttons::PARENT_SWITCH,
            ..yaw_cmd(20.0)
        };
        run(&mut ps, &vars, cmd, 1);
        assert!(ps.weap_flags.contains(WeaponFlags::PARENT_SWITCH));
        assert!(angle_diff(ps.weapon_angles.yaw(), weapon.yaw()).abs() < 0.5);
        assert!(angle_diff(ps.view_angles.yaw(), view.yaw()).abs() < 0.5);

        // holding the button does not switch back
        run(&mut ps, &vars, cmd, 5);
        assert!(ps.weap_flags.contains(WeaponFlags::PARENT_SWITCH));

        // the view leads now
        run(&mut ps, &vars, yaw_cmd(60.0), 1);
        assert!(ps.view_angles.yaw() > view.yaw() + 30.0, "{:?}", ps.view_angles);
    }

    #[test]
    fn classic_sprint_lowers_the_weapon() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            buttons: Buttons::SPRINT | Buttons::AIM,
            ..UserCmd::default()
        };
        run(&mut ps, &vars, cmd, 100);
        assert!(ps.weapon_angles.pitch() > 55.0, "{:?}", ps.weapon_angles);
        assert!((ps.articulation.gap_lerp - vars.sprint_gap).abs() < 0.01);
        assert!(!ps.weap_flags.contains(WeaponFlags::WEAPON_UP));
        assert!(!ps.zoomed);
    }

    #[test]
    fn lunge_sprint_rolls_the_view() {
        let vars = MoveVars {
            sprint_style: SprintStyle::Lunge,
            ..MoveVars::default()
        };
        let mut ps = grounded_player();
        let cmd = UserCmd {
            buttons: Buttons::SPRINT | Buttons::HAND_RIGHT,
            ..UserCmd::default()
        };
        run(&mut ps, &vars, cmd, 100);
        assert_eq!(ps.last_hand, 1);
        assert!(ps.view_angles.roll() > 4.0, "{:?}", ps.view_angles);
        assert!((ps.articulation.gap_lerp - vars.lunge_gap).abs() < 0.01);

        // the roll settles back once the sprint ends
        run(&mut ps, &vars, UserCmd::default(), 200);
        assert!(ps.view_angles.roll().abs() < 0.1);
    }

    #[test]
    fn dead_players_keep_their_aim() {
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        ps.health = 0;
        run(&mut ps, &vars, yaw_cmd(90.0), 5);
        assert_eq!(ps.view_angles, vec3_t::ZERO);
        assert_eq!(ps.weapon_angles, vec3_t::ZERO);
    }
}
