use shared::{
    anim::TorsoAnim,
    event::EventKind,
    input::Buttons,
    state::{MoveFlags, Powerups},
    trace::CollisionOracle,
    weapon::{Holdable, Weapon, WeaponState},
    PITCH,
};

/// Time to lower the current weapon, in milliseconds.
const DROP_TIME: i32 = 200;
/// Time to raise the new weapon, in milliseconds.
const RAISE_TIME: i32 = 250;
/// Penalty for pulling the trigger on an empty weapon, in milliseconds.
const NO_AMMO_TIME: i32 = 500;

impl<W: CollisionOracle> super::PlayerMove<'_, W> {
    /// Returns the requested weapon if the player owns it.
    fn requested_weapon(&self) -> Option<Weapon> {
        Weapon::from_index(self.cmd.weapon)
            .filter(|&weapon| weapon != Weapon::None && self.ps.weapons.contains(weapon))
    }

    fn begin_weapon_change(&mut self) {
        if self.requested_weapon().is_none() {
            return;
        }

        if self.ps.weapon_state == WeaponState::Dropping {
            return;
        }

        self.add_event(EventKind::ChangeWeapon);
        self.ps.weapon_state = WeaponState::Dropping;
        self.ps.weapon_time += DROP_TIME;
    }

    fn finish_weapon_change(&mut self) {
        self.ps.weapon = self.requested_weapon().unwrap_or(Weapon::None);
        self.ps.weapon_state = WeaponState::Raising;
        self.ps.weapon_time += RAISE_TIME;
        debug!("pmove: raise {}", self.ps.weapon);
    }

    fn use_holdable(&mut self) -> bool {
        if !self.is_button(Buttons::USE_HOLDABLE) {
            self.ps.pm_flags.remove(MoveFlags::USE_ITEM_HELD);
            return false;
        }

        if self.ps.pm_flags.contains(MoveFlags::USE_ITEM_HELD) {
            return false;
        }

        if self.ps.holdable == Holdable::Medkit && self.ps.health >= self.ps.max_health + 25 {
            // don't use medkit if at max health
            return true;
        }

        self.ps.pm_flags.insert(MoveFlags::USE_ITEM_HELD);
        self.add_event_param(EventKind::UseItem, self.ps.holdable as i32);
        self.ps.holdable = Holdable::None;
        true
    }

    /// Generates weapon events and advances the weapon timer.
    pub(super) fn weapon(&mut self) {
        // don't allow attack until all buttons are up
        if self.ps.pm_flags.contains(MoveFlags::RESPAWNED) {
            return;
        }

        if self.ps.is_spectator() {
            return;
        }

        if self.ps.is_dead() {
            self.ps.weapon = Weapon::None;
            return;
        }

        if self.use_holdable() {
            return;
        }

        if self.ps.weapon_time > 0 {
            self.ps.weapon_time -= self.local.msec;
        }

        // can change again while lowering or raising
        if self.ps.weapon as u8 != self.cmd.weapon {
            self.begin_weapon_change();
        }

        if self.ps.weapon_time > 0 {
            return;
        }

        match self.ps.weapon_state {
            WeaponState::Dropping => {
                self.finish_weapon_change();
                return;
            }
            WeaponState::Raising => {
                self.ps.weapon_state = WeaponState::Ready;
                if self.ps.weapon == Weapon::Gauntlet {
                    self.start_torso_anim(TorsoAnim::Stand2);
                } else {
                    self.start_torso_anim(TorsoAnim::Stand);
                }
                return;
            }
            WeaponState::Ready | WeaponState::Firing => {}
        }

        if !self.is_button(Buttons::ATTACK) {
            self.ps.weapon_time = 0;
            self.ps.weapon_state = WeaponState::Ready;
            return;
        }

        // start the animation even if out of ammo
        if self.ps.weapon == Weapon::Gauntlet {
            // the gauntlet only fires when it actually hits something
            if !self.gauntlet_hit {
                self.ps.weapon_time = 0;
                self.ps.weapon_state = WeaponState::Ready;
                return;
            }
            self.start_torso_anim(TorsoAnim::Attack2);
        } else {
            self.start_torso_anim(TorsoAnim::Attack);
        }

        self.ps.weapon_state = WeaponState::Firing;

        let weapon = self.ps.weapon;
        let ammo = self.ps.ammo_mut(weapon);
        if *ammo == 0 {
            self.add_event(EventKind::NoAmmo);
            self.ps.weapon_time += NO_AMMO_TIME;
            self.ps.weapon_state = WeaponState::Ready;
            return;
        }

        // take an ammo away if not infinite
        if *ammo != -1 {
            *ammo -= 1;
        }

        self.add_event(EventKind::FireWeapon);
        self.ps.articulation.punch[PITCH] -= weapon.recoil();

        let mut add_time = weapon.fire_time();
        if self.ps.powerups.contains(Powerups::HASTE) {
            add_time = (add_time as f32 / 1.3) as i32;
        }
        self.ps.weapon_time += add_time;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use shared::{
        event::Event,
        input::UserCmd,
        movevars::MoveVars,
        state::{PlayerState, Team},
    };

    use super::*;
    use crate::{
        testing::{cmd_at, grounded_player, SlabWorld},
        PlayerMove,
    };

    fn armed(weapon: Weapon, ammo: i32) -> PlayerState {
        let mut ps = grounded_player();
        ps.give_weapon(weapon, ammo);
        ps.weapon = weapon;
        ps
    }

    fn fire_cmd(weapon: Weapon) -> UserCmd {
        UserCmd {
            buttons: Buttons::ATTACK,
            weapon: weapon as u8,
            ..cmd_at(16)
        }
    }

    /// Runs the weapon logic once and returns the produced events.
    fn step(ps: &mut PlayerState, cmd: UserCmd, msec: i32) -> Vec<Event> {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut pm = PlayerMove::for_test(ps, cmd, &vars, &world, msec);
        pm.weapon();
        pm.events
    }

    fn kinds(events: &[Event]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn firing_uses_ammo() {
        let mut ps = armed(Weapon::Railgun, 5);
        let events = step(&mut ps, fire_cmd(Weapon::Railgun), 16);
        assert_eq!(kinds(&events), [EventKind::FireWeapon]);
        assert_eq!(ps.ammo(Weapon::Railgun), 4);
        assert_eq!(ps.weapon_state, WeaponState::Firing);
        assert_eq!(ps.weapon_time, 1500);
        assert_eq!(ps.torso.anim, TorsoAnim::Attack);
        assert!(ps.articulation.punch.pitch() < 0.0);

        // still cooling down
        let events = step(&mut ps, fire_cmd(Weapon::Railgun), 16);
        assert!(events.is_empty());
        assert_eq!(ps.weapon_time, 1484);
    }

    #[test]
    fn unlimited_ammo() {
        let mut ps = armed(Weapon::MachineGun, -1);
        step(&mut ps, fire_cmd(Weapon::MachineGun), 16);
        assert_eq!(ps.ammo(Weapon::MachineGun), -1);
    }

    #[test]
    fn empty_weapon() {
        let mut ps = armed(Weapon::Shotgun, 0);
        let events = step(&mut ps, fire_cmd(Weapon::Shotgun), 16);
        assert_eq!(kinds(&events), [EventKind::NoAmmo]);
        assert_eq!(ps.ammo(Weapon::Shotgun), 0);
        assert_eq!(ps.weapon_time, NO_AMMO_TIME);
        assert_eq!(ps.weapon_state, WeaponState::Ready);
    }

    #[test]
    fn haste_fires_faster() {
        let mut ps = armed(Weapon::RocketLauncher, 10);
        ps.powerups.insert(Powerups::HASTE);
        step(&mut ps, fire_cmd(Weapon::RocketLauncher), 16);
        assert_eq!(ps.weapon_time, 692);
    }

    #[test]
    fn releasing_the_trigger_resets() {
        let mut ps = armed(Weapon::MachineGun, 10);
        ps.weapon_state = WeaponState::Firing;
        let cmd = UserCmd {
            weapon: Weapon::MachineGun as u8,
            ..cmd_at(16)
        };
        step(&mut ps, cmd, 16);
        assert_eq!(ps.weapon_state, WeaponState::Ready);
        assert_eq!(ps.weapon_time, 0);
    }

    #[test]
    fn gauntlet_needs_a_hit() {
        let world = SlabWorld::flat();
        let vars = MoveVars::default();
        let mut ps = armed(Weapon::Gauntlet, -1);

        let mut pm = PlayerMove::for_test(&mut ps, fire_cmd(Weapon::Gauntlet), &vars, &world, 16);
        pm.weapon();
        assert!(pm.events.is_empty());
        assert_eq!(pm.ps.weapon_state, WeaponState::Ready);

        pm.gauntlet_hit = true;
        pm.weapon();
        assert_eq!(kinds(&pm.events), [EventKind::FireWeapon]);
        assert_eq!(pm.ps.torso.anim, TorsoAnim::Attack2);
    }

    #[test]
    fn change_sequence() {
        let mut ps = armed(Weapon::MachineGun, 50);
        ps.give_weapon(Weapon::Shotgun, 10);
        let cmd = UserCmd {
            weapon: Weapon::Shotgun as u8,
            ..cmd_at(16)
        };

        let events = step(&mut ps, cmd, 16);
        assert_eq!(kinds(&events), [EventKind::ChangeWeapon]);
        assert_eq!(ps.weapon_state, WeaponState::Dropping);
        assert_eq!(ps.weapon_time, DROP_TIME);

        // a second request while dropping is ignored
        let events = step(&mut ps, cmd, 100);
        assert!(events.is_empty());
        assert_eq!(ps.weapon_time, 100);

        step(&mut ps, cmd, 100);
        assert_eq!(ps.weapon, Weapon::Shotgun);
        assert_eq!(ps.weapon_state, WeaponState::Raising);
        assert_eq!(ps.weapon_time, RAISE_TIME);

        step(&mut ps, cmd, RAISE_TIME);
        assert_eq!(ps.weapon_state, WeaponState::Ready);
        assert_eq!(ps.torso.anim, TorsoAnim::Stand);
    }

    #[test]
    fn unowned_weapon_is_refused() {
        let mut ps = armed(Weapon::MachineGun, 50);
        for raw in [Weapon::Bfg as u8, 200] {
            let cmd = UserCmd {
                weapon: raw,
                ..cmd_at(16)
            };
            let events = step(&mut ps, cmd, 16);
            assert!(events.is_empty());
            assert_eq!(ps.weapon, Weapon::MachineGun);
            assert_eq!(ps.weapon_state, WeaponState::Ready);
        }
    }

    #[test]
    fn dead_and_spectating_players() {
        let mut ps = armed(Weapon::MachineGun, 50);
        ps.health = 0;
        let events = step(&mut ps, fire_cmd(Weapon::MachineGun), 16);
        assert!(events.is_empty());
        assert_eq!(ps.weapon, Weapon::None);

        let mut ps = armed(Weapon::MachineGun, 50);
        ps.team = Team::Spectator;
        let events = step(&mut ps, fire_cmd(Weapon::MachineGun), 16);
        assert!(events.is_empty());
        assert_eq!(ps.ammo(Weapon::MachineGun), 50);
    }

    #[test]
    fn holdable_items() {
        let use_cmd = UserCmd {
            buttons: Buttons::USE_HOLDABLE,
            ..cmd_at(16)
        };

        let mut ps = grounded_player();
        ps.holdable = Holdable::Teleporter;
        let events = step(&mut ps, use_cmd, 16);
        assert_eq!(events, [Event::with_param(EventKind::UseItem, Holdable::Teleporter as i32)]);
        assert_eq!(ps.holdable, Holdable::None);
        assert!(ps.pm_flags.contains(MoveFlags::USE_ITEM_HELD));

        // healthy players keep their medkit
        let mut ps = grounded_player();
        ps.holdable = Holdable::Medkit;
        ps.health = ps.max_health + 25;
        let events = step(&mut ps, use_cmd, 16);
        assert!(events.is_empty());
        assert_eq!(ps.holdable, Holdable::Medkit);

        ps.health = 50;
        let events = step(&mut ps, use_cmd, 16);
        assert_eq!(kinds(&events), [EventKind::UseItem]);
    }
}
