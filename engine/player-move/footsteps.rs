use shared::{
    anim::{LegsAnim, TorsoAnim},
    consts::{ENTITYNUM_NONE, TIMER_GESTURE},
    event::EventKind,
    input::Buttons,
    state::{MoveFlags, Powerups},
    trace::{CollisionOracle, SurfaceFlags},
    weapon::{Weapon, WeaponState},
};

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    pub(super) fn start_torso_anim(&mut self, anim: TorsoAnim) {
        if self.ps.pm_type.is_dead_or_worse() {
            return;
        }
        self.ps.torso.start(anim);
    }

    pub(super) fn start_legs_anim(&mut self, anim: LegsAnim) {
        if self.ps.pm_type.is_dead_or_worse() {
            return;
        }
        if self.ps.legs.timer > 0 {
            // a high priority animation is running
            return;
        }
        self.ps.legs.start(anim);
    }

    fn continue_legs_anim(&mut self, anim: LegsAnim) {
        if self.ps.legs.anim == anim || self.ps.legs.timer > 0 {
            return;
        }
        self.start_legs_anim(anim);
    }

    fn continue_torso_anim(&mut self, anim: TorsoAnim) {
        if self.ps.torso.anim == anim || self.ps.torso.timer > 0 {
            return;
        }
        self.start_torso_anim(anim);
    }

    pub(super) fn force_legs_anim(&mut self, anim: LegsAnim) {
        self.ps.legs.timer = 0;
        self.start_legs_anim(anim);
    }

    /// Forces the jump animation matching the direction of the input.
    pub(super) fn force_jump_anim(&mut self) {
        if self.cmd.forward_move >= 0 {
            self.force_legs_anim(LegsAnim::Jump);
            self.ps.pm_flags.remove(MoveFlags::BACKWARDS_JUMP);
        } else {
            self.force_legs_anim(LegsAnim::JumpBack);
            self.ps.pm_flags.insert(MoveFlags::BACKWARDS_JUMP);
        }
    }

    /// Returns a footstep event appropriate for the ground surface.
    pub(super) fn footstep_for_surface(&self) -> Option<EventKind> {
        let flags = self.local.ground_trace.surface_flags;
        if flags.contains(SurfaceFlags::NOSTEPS) {
            None
        } else if flags.contains(SurfaceFlags::METALSTEPS) {
            Some(EventKind::FootstepMetal)
        } else {
            Some(EventKind::Footstep)
        }
    }

    /// Starts a gesture when requested.
    pub(super) fn animate(&mut self) {
        if self.is_button(Buttons::GESTURE) && self.ps.torso.timer == 0 {
            self.start_torso_anim(TorsoAnim::Gesture);
            self.ps.torso.timer = TIMER_GESTURE;
            self.add_event(EventKind::Taunt);
        }
    }

    pub(super) fn torso_animation(&mut self) {
        if self.ps.weapon_state == WeaponState::Ready {
            if self.ps.weapon == Weapon::Gauntlet {
                self.continue_torso_anim(TorsoAnim::Stand2);
            } else {
                self.continue_torso_anim(TorsoAnim::Stand);
            }
        }
    }

    /// Advances the bob cycle and generates footstep and splash events.
    pub(super) fn footsteps(&mut self) {
        let velocity = self.ps.velocity;
        self.xy_speed = velocity.with_z(0.0).length();

        if self.ps.ground_entity == ENTITYNUM_NONE {
            if self.ps.powerups.contains(Powerups::INVULNERABILITY) {
                self.continue_legs_anim(LegsAnim::IdleCrouch);
            }
            // airborne leaves position in cycle intact, but doesn't advance
            if self.water_level > 1 {
                self.continue_legs_anim(LegsAnim::Swim);
            }
            return;
        }

        // if not trying to move
        if !self.cmd.has_move_input() {
            if self.xy_speed < 5.0 {
                // start at beginning of cycle again
                self.ps.bob_cycle = 0;
                if self.ps.pm_flags.contains(MoveFlags::DUCKED) {
                    self.continue_legs_anim(LegsAnim::IdleCrouch);
                } else {
                    self.continue_legs_anim(LegsAnim::Idle);
                }
            }
            return;
        }

        let backwards = self.ps.pm_flags.contains(MoveFlags::BACKWARDS_RUN);
        let mut footstep = false;
        let bob_move;

        if self.ps.pm_flags.contains(MoveFlags::DUCKED) {
            // ducked characters bob much faster and never play footsteps
            bob_move = 0.5;
            if backwards {
                self.continue_legs_anim(LegsAnim::BackCrouch);
            } else {
                self.continue_legs_anim(LegsAnim::WalkCrouch);
            }
        } else if !self.is_button(Buttons::WALKING) {
            // faster speeds bob faster
            bob_move = 0.4;
            if backwards {
                self.continue_legs_anim(LegsAnim::Back);
            } else {
                self.continue_legs_anim(LegsAnim::Run);
            }
            footstep = true;
        } else {
            bob_move = 0.3;
            if backwards {
                self.continue_legs_anim(LegsAnim::BackWalk);
            } else {
                self.continue_legs_anim(LegsAnim::Walk);
            }
        }

        // check for footstep / splash sounds
        let old = self.ps.bob_cycle as i32;
        let new = (old as f32 + bob_move * self.local.msec as f32) as i32 & 255;
        self.ps.bob_cycle = new as u8;

        // if we just crossed a cycle boundary, play an appropriate footstep event
        if ((old + 64) ^ (new + 64)) & 128 == 0 {
            return;
        }

        match self.water_level {
            // on ground will only play sounds if running
            0 => {
                if footstep && !self.vars.no_footsteps {
                    if let Some(kind) = self.footstep_for_surface() {
                        self.add_event(kind);
                    }
                }
            }
            1 => self.add_event(EventKind::FootSplash),
            2 => self.add_event(EventKind::Swim),
            // no sound when completely underwater
            _ => {}
        }
    }

    /// Generates events for entering and leaving water.
    pub(super) fn water_events(&mut self) {
        let previous = self.local.previous_water_level;
        let current = self.water_level;

        if previous == 0 && current != 0 {
            self.add_event(EventKind::WaterTouch);
        }

        if previous != 0 && current == 0 {
            self.add_event(EventKind::WaterLeave);
        }

        if previous != 3 && current == 3 {
            self.add_event(EventKind::WaterUnder);
        }

        if previous == 3 && current != 3 {
            self.add_event(EventKind::WaterClear);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use shared::{
        input::UserCmd,
        movevars::MoveVars,
        state::{PlayerState, PmType},
    };

    use super::*;
    use crate::{
        player_move,
        testing::{cmd_at, grounded_player, SlabWorld},
        PlayerMove,
    };

    fn run_forward(ps: &mut PlayerState, world: &SlabWorld, vars: &MoveVars, cmd: UserCmd) -> Vec<EventKind> {
        let mut events = Vec::new();
        for i in 1..=120 {
            let out = player_move(ps, UserCmd { server_time: i * 16, ..cmd }, vars, world);
            events.extend(out.events.iter().map(|e| e.kind));
        }
        events
    }

    #[test]
    fn running_makes_footsteps() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            forward_move: 127,
            ..UserCmd::default()
        };
        let events = run_forward(&mut ps, &world, &vars, cmd);
        assert!(events.contains(&EventKind::Footstep));
        assert_eq!(ps.legs.anim, LegsAnim::Run);
    }

    #[test]
    fn backpedalling_runs_backwards() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let back = UserCmd {
            forward_move: -127,
            ..UserCmd::default()
        };
        let events = run_forward(&mut ps, &world, &vars, back);
        assert!(events.contains(&EventKind::Footstep));
        assert_eq!(ps.legs.anim, LegsAnim::Back);

        let strafe = UserCmd {
            right_move: 127,
            server_time: ps.command_time + 16,
            ..UserCmd::default()
        };
        player_move(&mut ps, strafe, &vars, &world);
        assert_eq!(ps.legs.anim, LegsAnim::Run);

        let mut ps = grounded_player();
        ps.pm_flags.insert(MoveFlags::DUCKED);
        let crouch = UserCmd {
            up_move: -127,
            ..back
        };
        run_forward(&mut ps, &world, &vars, crouch);
        assert_eq!(ps.legs.anim, LegsAnim::BackCrouch);
    }

    #[test]
    fn walking_and_silent_surfaces_make_no_footsteps() {
        let vars = MoveVars::default();
        let cmd = UserCmd {
            buttons: Buttons::WALKING,
            forward_move: 60,
            ..UserCmd::default()
        };
        let world = SlabWorld::flat();
        let mut ps = grounded_player();
        let events = run_forward(&mut ps, &world, &vars, cmd);
        assert!(!events.contains(&EventKind::Footstep));
        assert_eq!(ps.legs.anim, LegsAnim::Walk);

        let cmd = UserCmd {
            forward_move: 127,
            ..UserCmd::default()
        };
        let world = SlabWorld::new().with_floor(0.0, SurfaceFlags::NOSTEPS);
        let mut ps = grounded_player();
        let events = run_forward(&mut ps, &world, &vars, cmd);
        assert!(!events.contains(&EventKind::Footstep));

        let world = SlabWorld::new().with_floor(0.0, SurfaceFlags::METALSTEPS);
        let mut ps = grounded_player();
        let events = run_forward(&mut ps, &world, &vars, cmd);
        assert!(events.contains(&EventKind::FootstepMetal));
    }

    #[test]
    fn wading_splashes() {
        let world = SlabWorld::flat().with_water(10.0);
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            forward_move: 127,
            ..UserCmd::default()
        };
        let events = run_forward(&mut ps, &world, &vars, cmd);
        assert!(events.contains(&EventKind::FootSplash));
        assert!(!events.contains(&EventKind::Footstep));
    }

    #[test]
    fn water_transitions() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let mut pm = PlayerMove::for_test(&mut ps, cmd_at(16), &vars, &world, 16);

        pm.local.previous_water_level = 0;
        pm.water_level = 3;
        pm.water_events();
        let kinds: Vec<_> = pm.events.drain(..).map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::WaterTouch, EventKind::WaterUnder]);

        pm.local.previous_water_level = 3;
        pm.water_level = 0;
        pm.water_events();
        let kinds: Vec<_> = pm.events.drain(..).map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::WaterLeave, EventKind::WaterClear]);

        pm.local.previous_water_level = 2;
        pm.water_level = 1;
        pm.water_events();
        assert!(pm.events.is_empty());
    }

    #[test]
    fn gesture_taunts_once() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        let cmd = UserCmd {
            buttons: Buttons::GESTURE,
            ..UserCmd::default()
        };
        let events = run_forward(&mut ps, &world, &vars, cmd);
        assert_eq!(events.iter().filter(|&&e| e == EventKind::Taunt).count(), 1);
        assert_eq!(ps.torso.anim, TorsoAnim::Gesture);
    }

    #[test]
    fn dead_players_keep_their_animation() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = grounded_player();
        ps.pm_type = PmType::Dead;
        let mut pm = PlayerMove::for_test(&mut ps, cmd_at(16), &vars, &world, 16);
        pm.force_legs_anim(LegsAnim::Run);
        assert_eq!(pm.ps.legs.anim, LegsAnim::Idle);
    }
}
