use shared::{
    consts::{MAX_CLIP_PLANES, MIN_WALK_NORMAL, OVERCLIP, STEPSIZE},
    event::EventKind,
    math::vec3_t,
    trace::CollisionOracle,
};

const MAX_BUMPS: usize = 4;

/// Slides off of the impacting surface.
pub fn clip_velocity(input: vec3_t, normal: vec3_t, overbounce: f32) -> vec3_t {
    let mut backoff = input.dot(normal);
    if backoff < 0.0 {
        backoff *= overbounce;
    } else {
        backoff /= overbounce;
    }
    input - normal * backoff
}

/// Returns a step event for a vertical step of `delta` units.
fn step_event(delta: f32) -> Option<EventKind> {
    if delta <= 2.0 {
        None
    } else if delta < 7.0 {
        Some(EventKind::Step4)
    } else if delta < 11.0 {
        Some(EventKind::Step8)
    } else if delta < 15.0 {
        Some(EventKind::Step12)
    } else {
        Some(EventKind::Step16)
    }
}

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    /// Returns `true` if the velocity was clipped in some way.
    pub(super) fn slide_move(&mut self, gravity: bool) -> bool {
        let mut primal_velocity = self.ps.velocity;
        let mut end_velocity = self.ps.velocity;

        if gravity {
            end_velocity[2] -= self.ps.gravity as f32 * self.local.frametime;
            self.ps.velocity[2] = (self.ps.velocity[2] + end_velocity[2]) * 0.5;
            primal_velocity[2] = end_velocity[2];
            if self.local.ground_plane {
                // slide along the ground plane
                self.ps.velocity = clip_velocity(
                    self.ps.velocity,
                    self.local.ground_trace.plane.normal,
                    OVERCLIP,
                );
            }
        }

        let mut time_left = self.local.frametime;
        let mut planes = [vec3_t::ZERO; MAX_CLIP_PLANES];
        let mut num_planes = 0;

        // never turn against the ground plane
        if self.local.ground_plane {
            planes[num_planes] = self.local.ground_trace.plane.normal;
            num_planes += 1;
        }

        // never turn against original velocity
        planes[num_planes] = self.ps.velocity.normalize();
        num_planes += 1;

        let mut bump_count = 0;
        while bump_count < MAX_BUMPS {
            // calculate position we are trying to move to
            let end = self.ps.origin.mul_add(time_left, self.ps.velocity);

            // see if we can make it there
            let trace = self.trace(self.ps.origin, end);

            if trace.all_solid {
                // entity is completely trapped in another solid,
                // don't build up falling damage, but allow sideways acceleration
                self.ps.velocity[2] = 0.0;
                return true;
            }

            if trace.fraction > 0.0 {
                // actually covered some distance
                self.ps.origin = trace.end_pos;
            }

            if trace.fraction == 1.0 {
                // moved the entire distance
                break;
            }

            // save entity for contact
            self.add_touch_ent(trace.entity_num);

            time_left -= time_left * trace.fraction;

            if num_planes >= MAX_CLIP_PLANES {
                // this shouldn't really happen
                self.ps.velocity = vec3_t::ZERO;
                return true;
            }

            // if this is the same plane we hit before, nudge velocity out along it
            let normal = trace.plane.normal;
            if planes[..num_planes].iter().any(|p| normal.dot(*p) > 0.99) {
                self.ps.velocity += normal;
                bump_count += 1;
                continue;
            }

            planes[num_planes] = normal;
            num_planes += 1;

            // modify velocity so it parallels all of the clip planes
            for i in 0..num_planes {
                let into = self.ps.velocity.dot(planes[i]);
                if into >= 0.1 {
                    // move doesn't interact with the plane
                    continue;
                }

                // see how hard we are hitting things
                if -into > self.local.impact_speed {
                    self.local.impact_speed = -into;
                }

                let mut clip = clip_velocity(self.ps.velocity, planes[i], OVERCLIP);
                let mut end_clip = clip_velocity(end_velocity, planes[i], OVERCLIP);

                // see if there is a second plane that the new move enters
                for j in 0..num_planes {
                    if j == i || clip.dot(planes[j]) >= 0.1 {
                        continue;
                    }

                    // try clipping the move to the plane
                    clip = clip_velocity(clip, planes[j], OVERCLIP);
                    end_clip = clip_velocity(end_clip, planes[j], OVERCLIP);

                    // see if it goes back into the first clip plane
                    if clip.dot(planes[i]) >= 0.0 {
                        continue;
                    }

                    // slide the original velocity along the crease
                    let dir = planes[i].cross(planes[j]).normalize();
                    clip = dir * dir.dot(self.ps.velocity);
                    end_clip = dir * dir.dot(end_velocity);

                    // see if there is a third plane the new move enters
                    for k in 0..num_planes {
                        if k == i || k == j || clip.dot(planes[k]) >= 0.1 {
                            continue;
                        }
                        // stop dead at a triple plane interaction
                        self.ps.velocity = vec3_t::ZERO;
                        return true;
                    }
                }

                // if we have fixed all interactions, try another move
                self.ps.velocity = clip;
                end_velocity = end_clip;
                break;
            }

            bump_count += 1;
        }

        if gravity {
            self.ps.velocity = end_velocity;
        }

        // don't change velocity while a timer runs
        if self.ps.pm_time != 0 {
            self.ps.velocity = primal_velocity;
        }

        bump_count != 0
    }

    pub(super) fn step_slide_move(&mut self, gravity: bool) {
        let start_o = self.ps.origin;
        let start_v = self.ps.velocity;

        if !self.slide_move(gravity) {
            // we got exactly where we wanted to go first try
            return;
        }

        let down = start_o.with_z(start_o.z() - STEPSIZE);
        let trace = self.trace(start_o, down);

        // never step up when you still have up velocity
        if self.ps.velocity.z() > 0.0
            && (trace.fraction == 1.0 || trace.plane.normal.dot(vec3_t::Z) < MIN_WALK_NORMAL)
        {
            return;
        }

        let up = start_o.with_z(start_o.z() + STEPSIZE);

        // test the player position if they were a stepheight higher
        let trace = self.trace(start_o, up);
        if trace.all_solid {
            self.debug_journal("bend can't step");
            return;
        }

        let step_size = trace.end_pos.z() - start_o.z();

        // try slidemove from this position
        self.ps.origin = trace.end_pos;
        self.ps.velocity = start_v;

        self.slide_move(gravity);

        // push down the final amount
        let down = self.ps.origin.with_z(self.ps.origin.z() - step_size);
        let trace = self.trace(self.ps.origin, down);
        if !trace.all_solid {
            self.ps.origin = trace.end_pos;
        }
        if trace.fraction < 1.0 {
            self.ps.velocity = clip_velocity(self.ps.velocity, trace.plane.normal, OVERCLIP);
        }

        let delta = self.ps.origin.z() - start_o.z();
        if let Some(kind) = step_event(delta) {
            self.add_event(kind);
        }
        self.debug_journal("stepped");
    }
}
