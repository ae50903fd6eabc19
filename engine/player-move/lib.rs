//! Deterministic player movement and weapon articulation.
//!
//! A [`UserCmd`] is applied to a [`PlayerState`] by slicing the elapsed time
//! into sub-steps. Every sub-step updates the ground contact, runs exactly
//! one locomotion [`Mode`], articulates the weapon against the view and
//! advances the weapon state machine. The same inputs always produce the
//! same outputs on every host.

#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
extern crate log;

mod articulation;
mod debug;
mod footsteps;
mod friction;
mod ground;
mod locomotion;
mod offset;
mod slide;
mod sway;
mod weapon;

#[cfg(test)]
mod testing;

use core::cmp;

use alloc::vec::Vec;
use shared::{
    consts::{ENTITYNUM_WORLD, MAX_COMMAND_MSEC, MAX_STEP_MSEC, MAX_TOUCH},
    event::{Event, EventKind},
    input::{Buttons, UserCmd},
    math::{angle_vectors, vec3_t},
    movevars::MoveVars,
    state::{EntityFlags, MoveFlags, PlayerState, PmType, WeaponFlags},
    trace::{CollisionOracle, Contents, Trace},
};

pub use friction::{accelerate, air_control, apply_friction, cmd_scale, FrictionEnv};
pub use locomotion::{Mode, ModeQuery};
pub use slide::clip_velocity;

pub use shared;

/// Number of bits kept of `PlayerState::pmove_framecount`.
const PMOVE_FRAMECOUNT_BITS: u32 = 6;

/// Results of a move that are not part of the persistent player state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveOutput {
    /// Events in the order they were produced.
    pub events: Vec<Event>,
    /// Entities touched during the move.
    pub touch_ents: Vec<i32>,
    /// `0` not in liquid, `1` feet, `2` waist, `3` head.
    pub water_level: u8,
    pub water_type: Contents,
    /// Bounding box of the player after the move.
    pub mins: vec3_t,
    pub maxs: vec3_t,
    /// Horizontal speed on the last sub-step.
    pub xy_speed: f32,
}

impl MoveOutput {
    pub fn has_event(&self, kind: EventKind) -> bool {
        self.events.iter().any(|i| i.kind == kind)
    }
}

/// Applies one user command to a player.
pub struct Pmove<'a, W> {
    ps: &'a mut PlayerState,
    cmd: UserCmd,
    vars: MoveVars,
    world: &'a W,
    trace_mask: Option<Contents>,
    gauntlet_hit: bool,
}

impl<'a, W: CollisionOracle> Pmove<'a, W> {
    pub fn new(ps: &'a mut PlayerState, cmd: UserCmd, vars: &MoveVars, world: &'a W) -> Self {
        Self {
            ps,
            cmd,
            vars: *vars,
            world,
            trace_mask: None,
            gauntlet_hit: false,
        }
    }

    /// Contents the player collides with.
    ///
    /// By default players collide with [`Contents::MASK_PLAYERSOLID`] and
    /// spectators and corpses pass through other bodies.
    pub fn trace_mask(mut self, mask: Contents) -> Self {
        self.trace_mask = Some(mask);
        self
    }

    /// The gauntlet touched a target this frame and is allowed to fire.
    pub fn gauntlet_hit(mut self, hit: bool) -> Self {
        self.gauntlet_hit = hit;
        self
    }

    pub fn run(self) -> MoveOutput {
        let trace_mask = self.trace_mask.unwrap_or_else(|| {
            if self.ps.pm_type == PmType::Spectator || self.ps.pm_type == PmType::Dead {
                Contents::MASK_PLAYERSOLID - Contents::BODY
            } else {
                Contents::MASK_PLAYERSOLID
            }
        });
        let mut pm = PlayerMove::new(self.ps, self.cmd, self.vars, self.world, trace_mask);
        pm.gauntlet_hit = self.gauntlet_hit;
        pm.player_move();
        pm.into_output()
    }
}

/// Applies `cmd` to `ps` with the default trace mask.
pub fn player_move<W: CollisionOracle>(
    ps: &mut PlayerState,
    cmd: UserCmd,
    vars: &MoveVars,
    world: &W,
) -> MoveOutput {
    Pmove::new(ps, cmd, vars, world).run()
}

/// Wish direction and speed.
#[derive(Copy, Clone, Debug, Default)]
struct WishMove {
    dir: vec3_t,
    speed: f32,
}

impl WishMove {
    fn new(vel: vec3_t) -> Self {
        let (dir, speed) = vel.normalize_length();
        Self { dir, speed }
    }
}

/// Locals of a single sub-step.
#[derive(Copy, Clone, Debug)]
struct MoveLocal {
    forward: vec3_t,
    right: vec3_t,
    up: vec3_t,
    frametime: f32,
    msec: i32,
    walking: bool,
    ground_plane: bool,
    ground_trace: Trace,
    impact_speed: f32,
    previous_origin: vec3_t,
    previous_velocity: vec3_t,
    previous_water_level: u8,
    /// Angle between weapon and view targets, in degrees.
    weap_view_gap: [f32; 2],
    /// The weapon is pulled in to the shoulder.
    shouldered: bool,
}

impl Default for MoveLocal {
    fn default() -> Self {
        Self {
            forward: vec3_t::X,
            right: vec3_t::ZERO,
            up: vec3_t::Z,
            frametime: 0.0,
            msec: 0,
            walking: false,
            ground_plane: false,
            ground_trace: Trace::empty(vec3_t::ZERO),
            impact_speed: 0.0,
            previous_origin: vec3_t::ZERO,
            previous_velocity: vec3_t::ZERO,
            previous_water_level: 0,
            weap_view_gap: [0.0; 2],
            shouldered: false,
        }
    }
}

struct PlayerMove<'a, W> {
    ps: &'a mut PlayerState,
    cmd: UserCmd,
    vars: MoveVars,
    world: &'a W,
    trace_mask: Contents,
    gauntlet_hit: bool,
    mins: vec3_t,
    maxs: vec3_t,
    water_level: u8,
    water_type: Contents,
    xy_speed: f32,
    events: Vec<Event>,
    touch_ents: Vec<i32>,
    local: MoveLocal,
    /// Sub-step counter for the debug journal.
    counter: u32,
}

impl<'a, W: CollisionOracle> PlayerMove<'a, W> {
    fn new(
        ps: &'a mut PlayerState,
        cmd: UserCmd,
        vars: MoveVars,
        world: &'a W,
        trace_mask: Contents,
    ) -> Self {
        Self {
            ps,
            cmd,
            vars,
            world,
            trace_mask,
            gauntlet_hit: false,
            mins: vec3_t::ZERO,
            maxs: vec3_t::ZERO,
            water_level: 0,
            water_type: Contents::empty(),
            xy_speed: 0.0,
            events: Vec::new(),
            touch_ents: Vec::new(),
            local: MoveLocal::default(),
            counter: 0,
        }
    }

    fn into_output(self) -> MoveOutput {
        MoveOutput {
            events: self.events,
            touch_ents: self.touch_ents,
            water_level: self.water_level,
            water_type: self.water_type,
            mins: self.mins,
            maxs: self.maxs,
            xy_speed: self.xy_speed,
        }
    }

    fn trace(&self, start: vec3_t, end: vec3_t) -> Trace {
        self.trace_box(start, self.mins, self.maxs, end)
    }

    fn trace_box(&self, start: vec3_t, mins: vec3_t, maxs: vec3_t, end: vec3_t) -> Trace {
        self.world
            .trace(start, mins, maxs, end, self.ps.client_num, self.trace_mask)
    }

    fn point_contents(&self, point: vec3_t) -> Contents {
        self.world.point_contents(point, self.ps.client_num)
    }

    fn add_event(&mut self, kind: EventKind) {
        self.add_event_param(kind, 0);
    }

    fn add_event_param(&mut self, kind: EventKind, param: i32) {
        trace!("pmove: event {kind} {param}");
        self.events.push(Event::with_param(kind, param));
    }

    fn add_touch_ent(&mut self, entity: i32) {
        if entity == ENTITYNUM_WORLD {
            return;
        }
        if self.touch_ents.len() >= MAX_TOUCH || self.touch_ents.contains(&entity) {
            return;
        }
        self.touch_ents.push(entity);
    }

    fn is_button(&self, buttons: Buttons) -> bool {
        self.cmd.is_button(buttons)
    }

    fn check_velocity(&mut self) {
        fn fix_nan(v: &mut vec3_t, name: &str) {
            if v.is_nan() {
                debug!("pmove: got a NaN {name} {v:?}");
                for i in v.iter_mut().filter(|i| i.is_nan()) {
                    *i = 0.0;
                }
            }
        }

        fix_nan(&mut self.ps.velocity, "velocity");
        fix_nan(&mut self.ps.origin, "origin");
    }

    fn drop_timers(&mut self) {
        let msec = self.local.msec;

        if self.ps.pm_time > 0 {
            if msec >= self.ps.pm_time {
                self.ps.pm_flags.remove(MoveFlags::ALL_TIMES);
                self.ps.pm_time = 0;
            } else {
                self.ps.pm_time -= msec;
            }
        }

        self.ps.legs.drop_timer(msec);
        self.ps.torso.drop_timer(msec);

        self.ps.jump_time = cmp::max(self.ps.jump_time - msec, 0);
    }

    fn update_button_flags(&mut self) {
        let flags = &mut self.ps.weap_flags;
        flags.set(WeaponFlags::WEAPON_UP, self.cmd.is_button(Buttons::AIM));
        flags.set(WeaponFlags::VIEW_UNLOCK, self.cmd.is_button(Buttons::UNLOCK_AIM));
        flags.set(WeaponFlags::GAP_UP, self.cmd.is_button(Buttons::GAP_UP));
        flags.set(WeaponFlags::GAP_DOWN, self.cmd.is_button(Buttons::GAP_DOWN));

        let left = self.cmd.is_button(Buttons::HAND_LEFT);
        let right = self.cmd.is_button(Buttons::HAND_RIGHT);
        if left && right {
            flags.remove(WeaponFlags::WEAPON_LEFT | WeaponFlags::WEAPON_RIGHT);
            self.ps.last_hand = 0;
        } else if left {
            flags.insert(WeaponFlags::WEAPON_LEFT);
            flags.remove(WeaponFlags::WEAPON_RIGHT);
            self.ps.last_hand = -1;
        } else if right {
            flags.insert(WeaponFlags::WEAPON_RIGHT);
            flags.remove(WeaponFlags::WEAPON_LEFT);
            self.ps.last_hand = 1;
        }

        if self.cmd.is_button(Buttons::PARENT_SWITCH) {
            if !self.ps.pm_flags.contains(MoveFlags::PARENT_SWITCH_HELD) {
                self.ps.pm_flags.insert(MoveFlags::PARENT_SWITCH_HELD);
                self.ps.weap_flags.toggle(WeaponFlags::PARENT_SWITCH);
                self.ps.articulation.switching_parent = true;
            }
        } else {
            self.ps.pm_flags.remove(MoveFlags::PARENT_SWITCH_HELD);
        }

        self.ps
            .pm_flags
            .set(MoveFlags::SPRINT, self.cmd.is_button(Buttons::SPRINT));
    }

    /// Runs one sub-step of at most [`MAX_STEP_MSEC`].
    fn player_move_single(&mut self) {
        self.counter = self.counter.wrapping_add(1);
        self.local = MoveLocal::default();
        self.check_velocity();

        if self.ps.is_dead() {
            // corpses fly through bodies
            self.trace_mask.remove(Contents::BODY);
            self.ps.zoomed = false;
        }

        // running clears the walking button
        if self.cmd.is_running() {
            self.cmd.buttons.remove(Buttons::WALKING);
        }

        self.ps
            .e_flags
            .set(EntityFlags::TALK, self.is_button(Buttons::TALK));

        let firing = !self.ps.pm_flags.contains(MoveFlags::RESPAWNED)
            && !self.ps.pm_type.is_intermission()
            && self.is_button(Buttons::ATTACK)
            && self.ps.ammo(self.ps.weapon) != 0;
        self.ps.e_flags.set(EntityFlags::FIRING, firing);

        if !self.ps.is_dead() && !self.is_button(Buttons::ATTACK | Buttons::USE_HOLDABLE) {
            self.ps.pm_flags.remove(MoveFlags::RESPAWNED);
        }

        // talking freezes all other input
        if self.is_button(Buttons::TALK) {
            self.cmd.buttons = Buttons::TALK;
            self.cmd.clear_moves();
        }

        let msec = (self.cmd.server_time - self.ps.command_time).clamp(1, MAX_STEP_MSEC);
        self.ps.command_time = self.cmd.server_time;
        self.local.msec = msec;
        self.local.frametime = msec as f32 * 0.001;
        self.local.previous_origin = self.ps.origin;
        self.local.previous_velocity = self.ps.velocity;

        self.update_button_flags();

        let basis = if self.ps.articulation.max_base_gap >= self.vars.max_two_handed_gap {
            self.ps.view_angles
        } else {
            self.ps.weapon_angles
        };
        let av = angle_vectors(basis).all();
        self.local.forward = av.forward;
        self.local.right = av.right;
        self.local.up = av.up;

        if self.cmd.up_move < 10 {
            self.ps.pm_flags.remove(MoveFlags::JUMP_HELD);
        }

        if self.cmd.forward_move < 0 {
            self.ps.pm_flags.insert(MoveFlags::BACKWARDS_RUN);
        } else if self.cmd.forward_move > 0
            || (self.cmd.forward_move == 0 && self.cmd.right_move != 0)
        {
            self.ps.pm_flags.remove(MoveFlags::BACKWARDS_RUN);
        }

        if self.ps.pm_type.is_dead_or_worse() {
            self.cmd.clear_moves();
        }

        if let Some(mode) = Mode::overriding(self.ps.pm_type) {
            self.run_mode(mode);
            self.update_articulated_angles();
            return;
        }

        self.set_water_level();
        self.local.previous_water_level = self.water_level;

        self.check_duck();
        self.ground_trace();

        if cfg!(feature = "debug") {
            self.show_clip_box();
        }

        let mode = Mode::select(&self.mode_query());

        self.drop_timers();

        self.debug_mode(mode);
        self.run_mode(mode);

        self.animate();

        // set ground entity, watertype and waterlevel for the new position
        self.ground_trace();

        self.update_articulated_angles();
        self.impact_view_item();

        self.set_water_level();

        self.weapon();
        self.torso_animation();
        self.footsteps();
        self.water_events();

        // snap to integer velocities so every host sees the same values
        self.ps.velocity = self.ps.velocity.snap();
    }

    /// Slices the command into sub-steps and runs them.
    fn player_move(&mut self) {
        let final_time = self.cmd.server_time;

        if final_time < self.ps.command_time {
            warn!(
                "pmove: command time {final_time} is behind player time {}",
                self.ps.command_time
            );
            return;
        }

        if final_time > self.ps.command_time + MAX_COMMAND_MSEC {
            self.ps.command_time = final_time - MAX_COMMAND_MSEC;
        }

        self.ps.pmove_framecount =
            (self.ps.pmove_framecount + 1) & ((1 << PMOVE_FRAMECOUNT_BITS) - 1);

        let step = self.vars.step_msec();
        while self.ps.command_time != final_time {
            let msec = cmp::min(final_time - self.ps.command_time, step);
            self.cmd.server_time = self.ps.command_time + msec;
            self.player_move_single();

            // keep the jump latched across sub-steps
            if self.ps.pm_flags.contains(MoveFlags::JUMP_HELD) {
                self.cmd.up_move = 20;
            }
        }
    }
}
