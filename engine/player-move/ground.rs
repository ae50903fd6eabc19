use shared::{
    anim::LegsAnim,
    consts::{
        CROUCH_MAXS_Z, CROUCH_VIEWHEIGHT, DEAD_MAXS_Z, DEAD_VIEWHEIGHT, DEFAULT_VIEWHEIGHT,
        ENTITYNUM_NONE, INVUL_HALF_SIZE, MINS_Z, MIN_WALK_NORMAL, PLAYER_HALF_WIDTH,
        STAND_MAXS_Z, TIMER_LAND,
    },
    event::EventKind,
    math::{sqrtf, vec3_t},
    state::{MoveFlags, PmType, Powerups},
    trace::{CollisionOracle, Contents, SurfaceFlags, Trace},
};

/// Distance probed below the player for ground contact.
const GROUND_PROBE: f32 = 0.25;

/// Impact category of a landing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Fall {
    Far,
    Medium,
    Short,
    Footstep,
}

impl Fall {
    /// Buckets an impact delta (`speed² / 10000`).
    fn from_delta(delta: f32) -> Option<Fall> {
        if delta < 1.0 {
            None
        } else if delta > 60.0 {
            Some(Fall::Far)
        } else if delta > 40.0 {
            Some(Fall::Medium)
        } else if delta > 7.0 {
            Some(Fall::Short)
        } else {
            Some(Fall::Footstep)
        }
    }
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    /// Classifies the ground below the player.
    pub(super) fn ground_trace(&mut self) {
        let point = self.ps.origin.with_z(self.ps.origin.z() - GROUND_PROBE);
        let mut trace = self.trace(self.ps.origin, point);
        self.local.ground_trace = trace;

        // do something corrective if the trace starts in a solid
        if trace.all_solid {
            match self.correct_all_solid() {
                Some(t) => trace = t,
                None => return,
            }
        }

        // if the trace didn't hit anything, we are in free fall
        if trace.fraction == 1.0 {
            self.ground_trace_missed();
            return;
        }

        // check if getting thrown off the ground
        if self.ps.velocity.z() > 0.0 && self.ps.velocity.dot(trace.plane.normal) > 10.0 {
            self.debug_journal("kickoff");
            self.force_jump_anim();
            self.set_airborne();
            return;
        }

        // slopes that are too steep will not be considered onground
        if trace.plane.normal.z() < MIN_WALK_NORMAL {
            self.debug_journal("steep");
            self.ps.ground_entity = ENTITYNUM_NONE;
            self.local.ground_plane = true;
            self.local.walking = false;
            return;
        }

        self.local.ground_plane = true;
        self.local.walking = true;

        // hitting solid ground will end a waterjump
        if self.ps.pm_flags.contains(MoveFlags::TIME_WATERJUMP) {
            self.ps
                .pm_flags
                .remove(MoveFlags::TIME_WATERJUMP | MoveFlags::TIME_LAND);
            self.ps.pm_time = 0;
        }

        if self.ps.ground_entity == ENTITYNUM_NONE {
            // just hit the ground
            self.debug_journal("Land");

            self.crash_land();

            // don't do landing time if we were just going down a slope
            if self.local.previous_velocity.z() < -200.0 {
                // don't allow another jump for a little while
                self.ps.pm_flags.insert(MoveFlags::TIME_LAND);
                self.ps.pm_time = 250;
            }
        }

        self.ps.ground_entity = trace.entity_num;
        self.add_touch_ent(trace.entity_num);
    }

    fn set_airborne(&mut self) {
        self.ps.ground_entity = ENTITYNUM_NONE;
        self.local.ground_plane = false;
        self.local.walking = false;
    }

    /// Jitters the origin around looking for a position outside of solids.
    fn correct_all_solid(&mut self) -> Option<Trace> {
        self.debug_journal("allsolid");

        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    let point = self.ps.origin + vec3_t::new(i as f32, j as f32, k as f32);
                    let trace = self.trace(point, point);
                    if !trace.all_solid {
                        let down = self.ps.origin.with_z(self.ps.origin.z() - GROUND_PROBE);
                        let trace = self.trace(self.ps.origin, down);
                        self.local.ground_trace = trace;
                        return Some(trace);
                    }
                }
            }
        }

        warn!("pmove: player {} is stuck in a solid", self.ps.client_num);
        self.set_airborne();
        None
    }

    /// The ground trace didn't hit a surface, so we are in freefall.
    fn ground_trace_missed(&mut self) {
        if self.ps.ground_entity != ENTITYNUM_NONE {
            // we just transitioned into freefall
            self.debug_journal("lift");

            // if they aren't in a jumping animation and the ground is a ways
            // away, force into it
            let point = self.ps.origin.with_z(self.ps.origin.z() - 64.0);
            let trace = self.trace(self.ps.origin, point);
            if trace.fraction == 1.0 {
                self.force_jump_anim();
            }
        }

        self.set_airborne();
    }

    /// Checks for hard landings that generate sound events.
    fn crash_land(&mut self) {
        // decide which landing animation to use
        if self.ps.pm_flags.contains(MoveFlags::BACKWARDS_JUMP) {
            self.force_legs_anim(LegsAnim::LandBack);
        } else {
            self.force_legs_anim(LegsAnim::Land);
        }
        self.ps.legs.timer = TIMER_LAND;

        // calculate the exact velocity on landing
        let dist = self.ps.origin.z() - self.local.previous_origin.z();
        let vel = self.local.previous_velocity.z();
        let acc = -(self.ps.gravity as f32);

        let a = acc / 2.0;
        let b = vel;
        let c = -dist;

        let den = b * b - 4.0 * a * c;
        if den < 0.0 {
            return;
        }
        let t = (-b - sqrtf(den)) / (2.0 * a);

        let mut delta = vel + t * acc;
        delta = delta * delta * 0.0001;

        // never take falling damage if completely underwater
        match self.water_level {
            3 => return,
            2 => delta *= 0.25,
            1 => delta *= 0.5,
            _ => {}
        }

        let Some(fall) = Fall::from_delta(delta) else {
            return;
        };

        // bounce pads never make a crunch sound
        if !self
            .local
            .ground_trace
            .surface_flags
            .contains(SurfaceFlags::NODAMAGE)
        {
            match fall {
                Fall::Far => self.add_event(EventKind::FallFar),
                // a pain grunt, don't play it if dead
                Fall::Medium if self.ps.health > 0 => self.add_event(EventKind::FallMedium),
                Fall::Medium => {}
                Fall::Short => self.add_event(EventKind::FallShort),
                Fall::Footstep => {
                    if let Some(kind) = self.footstep_for_surface() {
                        self.add_event(kind);
                    }
                }
            }
        }

        // start footstep cycle over
        self.ps.bob_cycle = 0;
    }

    /// Samples the liquid depth at the feet, the waist and the eyes.
    pub(super) fn set_water_level(&mut self) {
        self.water_level = 0;
        self.water_type = Contents::empty();

        let origin = self.ps.origin;
        let contents = self.point_contents(origin.with_z(origin.z() + MINS_Z + 1.0));
        if !contents.intersects(Contents::MASK_WATER) {
            return;
        }

        let sample2 = (self.ps.view_height - MINS_Z) as i32 as f32;
        let sample1 = (sample2 as i32 / 2) as f32;

        self.water_type = contents;
        self.water_level = 1;

        let contents = self.point_contents(origin.with_z(origin.z() + MINS_Z + sample1));
        if contents.intersects(Contents::MASK_WATER) {
            self.water_level = 2;
            let contents = self.point_contents(origin.with_z(origin.z() + MINS_Z + sample2));
            if contents.intersects(Contents::MASK_WATER) {
                self.water_level = 3;
            }
        }
    }

    /// Sets the bounding box and the view height for the current stance.
    pub(super) fn check_duck(&mut self) {
        if self.ps.powerups.contains(Powerups::INVULNERABILITY) {
            if self.ps.pm_flags.contains(MoveFlags::INVULEXPAND) {
                self.mins = vec3_t::splat(-INVUL_HALF_SIZE);
                self.maxs = vec3_t::splat(INVUL_HALF_SIZE);
            } else {
                self.mins = vec3_t::new(-PLAYER_HALF_WIDTH, -PLAYER_HALF_WIDTH, MINS_Z);
                self.maxs = vec3_t::new(PLAYER_HALF_WIDTH, PLAYER_HALF_WIDTH, CROUCH_MAXS_Z);
            }
            self.ps.pm_flags.insert(MoveFlags::DUCKED);
            self.ps.view_height = CROUCH_VIEWHEIGHT;
            return;
        }
        self.ps.pm_flags.remove(MoveFlags::INVULEXPAND);

        let mins = vec3_t::new(-PLAYER_HALF_WIDTH, -PLAYER_HALF_WIDTH, MINS_Z);
        let mut maxs = vec3_t::new(PLAYER_HALF_WIDTH, PLAYER_HALF_WIDTH, STAND_MAXS_Z);

        if self.ps.pm_type == PmType::Dead {
            maxs.set_z(DEAD_MAXS_Z);
            self.mins = mins;
            self.maxs = maxs;
            self.ps.view_height = DEAD_VIEWHEIGHT;
            return;
        }

        if self.cmd.up_move < 0 {
            self.ps.pm_flags.insert(MoveFlags::DUCKED);
        } else if self.ps.pm_flags.contains(MoveFlags::DUCKED) {
            // try to stand up
            let trace = self.trace_box(self.ps.origin, mins, maxs, self.ps.origin);
            if !trace.all_solid {
                self.ps.pm_flags.remove(MoveFlags::DUCKED);
            }
        }

        if self.ps.pm_flags.contains(MoveFlags::DUCKED) {
            maxs.set_z(CROUCH_MAXS_Z);
            self.ps.view_height = CROUCH_VIEWHEIGHT;
        } else {
            self.ps.view_height = DEFAULT_VIEWHEIGHT;
        }

        self.mins = mins;
        self.maxs = maxs;
    }
}
