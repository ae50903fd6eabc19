use core::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Weapon {
    #[default]
    None = 0,
    Gauntlet,
    MachineGun,
    Shotgun,
    GrenadeLauncher,
    RocketLauncher,
    Lightning,
    Railgun,
    PlasmaGun,
    Bfg,
    GrapplingHook,
}

impl Weapon {
    pub const COUNT: usize = 11;

    pub const ALL: [Weapon; Self::COUNT] = [
        Self::None,
        Self::Gauntlet,
        Self::MachineGun,
        Self::Shotgun,
        Self::GrenadeLauncher,
        Self::RocketLauncher,
        Self::Lightning,
        Self::Railgun,
        Self::PlasmaGun,
        Self::Bfg,
        Self::GrapplingHook,
    ];

    /// Returns the weapon for a raw weapon number.
    pub fn from_index(index: u8) -> Option<Weapon> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Delay between two shots, in milliseconds.
    pub const fn fire_time(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Gauntlet => 400,
            Self::MachineGun => 100,
            Self::Shotgun => 1000,
            Self::GrenadeLauncher => 150,
            Self::RocketLauncher => 900,
            Self::Lightning => 50,
            Self::Railgun => 1500,
            Self::PlasmaGun => 100,
            Self::Bfg => 200,
            Self::GrapplingHook => 400,
        }
    }

    /// Pitch kick of a single shot, in degrees.
    pub const fn recoil(self) -> f32 {
        match self {
            Self::None | Self::Gauntlet | Self::GrapplingHook => 0.0,
            Self::MachineGun | Self::Lightning | Self::PlasmaGun => 0.5,
            Self::Shotgun | Self::RocketLauncher => 4.0,
            Self::GrenadeLauncher => 2.0,
            Self::Railgun | Self::Bfg => 6.0,
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Gauntlet => "gauntlet",
            Self::MachineGun => "machinegun",
            Self::Shotgun => "shotgun",
            Self::GrenadeLauncher => "grenadelauncher",
            Self::RocketLauncher => "rocketlauncher",
            Self::Lightning => "lightning",
            Self::Railgun => "railgun",
            Self::PlasmaGun => "plasmagun",
            Self::Bfg => "bfg",
            Self::GrapplingHook => "grapplinghook",
        };
        f.write_str(s)
    }
}

/// Set of owned weapons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WeaponSet(u32);

impl WeaponSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, weapon: Weapon) -> bool {
        self.0 & (1 << weapon.index()) != 0
    }

    pub fn insert(&mut self, weapon: Weapon) {
        self.0 |= 1 << weapon.index();
    }

    pub fn remove(&mut self, weapon: Weapon) {
        self.0 &= !(1 << weapon.index());
    }

    pub fn with(mut self, weapon: Weapon) -> Self {
        self.insert(weapon);
        self
    }
}

impl FromIterator<Weapon> for WeaponSet {
    fn from_iter<T: IntoIterator<Item = Weapon>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeaponState {
    #[default]
    Ready,
    Raising,
    Dropping,
    Firing,
}

/// Usable inventory item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Holdable {
    #[default]
    None,
    Teleporter,
    Medkit,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn from_index() {
        assert_eq!(Weapon::from_index(0), Some(Weapon::None));
        assert_eq!(Weapon::from_index(7), Some(Weapon::Railgun));
        assert_eq!(Weapon::from_index(10), Some(Weapon::GrapplingHook));
        assert_eq!(Weapon::from_index(11), None);
        for (i, w) in Weapon::ALL.iter().enumerate() {
            assert_eq!(w.index(), i);
        }
    }

    #[test]
    fn weapon_set() {
        let mut set: WeaponSet = [Weapon::Gauntlet, Weapon::Shotgun].into_iter().collect();
        assert!(set.contains(Weapon::Shotgun));
        assert!(!set.contains(Weapon::Bfg));
        set.remove(Weapon::Shotgun);
        assert!(!set.contains(Weapon::Shotgun));
        assert!(set.contains(Weapon::Gauntlet));
    }

    #[test]
    fn display() {
        assert_eq!(Weapon::RocketLauncher.to_string(), "rocketlauncher");
    }
}
