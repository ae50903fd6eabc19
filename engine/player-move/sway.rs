use core::f64::consts::TAU;

use shared::{
    math::{fmaxf, sin, vec3_t},
    movevars::MoveVars,
    trace::CollisionOracle,
};

/// Idle drift of the weapon at `time` milliseconds, in degrees.
///
/// Driven by the command time so every host computes the same sway.
pub fn sway_angles(vars: &MoveVars, time: i32, flat_speed: f32) -> vec3_t {
    let spread = 5.0 + flat_speed / 50.0 + vars.sway_min_amplitude;
    let wave = |frequency: f32| sin(time as f64 / 1000.0 * frequency as f64 * TAU) as f32;
    vec3_t::new(
        vars.sway_pitch_amplitude * wave(vars.sway_pitch_frequency) * spread,
        vars.sway_yaw_amplitude * wave(vars.sway_yaw_frequency) * spread,
        0.0,
    )
}

/// Returns the punch angle after `frametime` seconds of decay.
pub fn decay_punch(punch: vec3_t, frametime: f32) -> vec3_t {
    let (dir, len) = punch.normalize_length();
    let len = fmaxf(len - (10.0 + len * 0.5) * frametime, 0.0);
    dir * len
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    pub(super) fn sway(&self) -> vec3_t {
        let flat_speed = self.ps.velocity.with_z(0.0).length();
        sway_angles(&self.vars, self.cmd.server_time, flat_speed)
    }

    pub(super) fn drop_punch(&mut self) {
        let punch = &mut self.ps.articulation.punch;
        *punch = decay_punch(*punch, self.local.frametime);
    }
}

#[cfg(test)]
mod tests {
    use shared::{
        input::{Buttons, UserCmd},
        weapon::Weapon,
        PITCH,
    };

    use super::*;
    use crate::{
        player_move,
        testing::{grounded_player, SlabWorld},
    };

    #[test]
    fn sway_is_a_function_of_time() {
        let vars = MoveVars::default();
        assert_eq!(sway_angles(&vars, 0, 0.0), vec3_t::ZERO);
        assert_eq!(sway_angles(&vars, 1234, 100.0), sway_angles(&vars, 1234, 100.0));

        // a quarter period of the pitch wave
        let t = (250.0 / vars.sway_pitch_frequency) as i32;
        let s = sway_angles(&vars, t, 0.0);
        let peak = vars.sway_pitch_amplitude * (5.0 + vars.sway_min_amplitude);
        assert!((s.pitch() - peak).abs() < 1e-3, "{s:?}");
    }

    #[test]
    fn sway_grows_with_speed() {
        let vars = MoveVars::default();
        let slow = sway_angles(&vars, 1500, 0.0);
        let fast = sway_angles(&vars, 1500, 320.0);
        assert!(fast.pitch().abs() > slow.pitch().abs());
        assert!(fast.yaw().abs() > slow.yaw().abs());
        assert_eq!(fast.roll(), 0.0);
    }

    #[test]
    fn punch_decays_to_zero() {
        let mut punch = vec3_t::new(-4.0, 0.0, 0.0);
        let mut last = 4.0;
        for _ in 0..20 {
            punch = decay_punch(punch, 0.016);
            let len = punch.length();
            assert!(len < last);
            last = len;
        }
        assert_eq!(decay_punch(punch, 1.0), vec3_t::ZERO);
        assert_eq!(decay_punch(vec3_t::ZERO, 0.016), vec3_t::ZERO);
    }

    #[test]
    fn firing_kicks_the_weapon() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        ps.give_weapon(Weapon::Shotgun, 10);
        ps.weapon = Weapon::Shotgun;
        let cmd = UserCmd {
            server_time: 16,
            buttons: Buttons::ATTACK,
            weapon: Weapon::Shotgun as u8,
            ..UserCmd::default()
        };
        player_move(&mut ps, cmd, &vars, &world);
        let punch = ps.articulation.punch[PITCH];
        assert_eq!(punch, -Weapon::Shotgun.recoil());

        // the kick shows up on the next step and then fades
        player_move(&mut ps, UserCmd { server_time: 32, ..cmd }, &vars, &world);
        assert!(ps.weapon_angles.pitch() < 0.5 * punch, "{:?}", ps.weapon_angles);
        assert!(ps.articulation.punch[PITCH] > punch);
    }
}
