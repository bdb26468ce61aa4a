//! Weapons and their stat table.
//!
//! | kind    | damage | ammo | notes                              |
//! |---------|--------|------|------------------------------------|
//! | Melee   | 10     | ∞    | hits every opponent in melee range |
//! | Pistol  | 25     | 12   |                                    |
//! | Rifle   | 40     | 30   |                                    |
//! | Bazooka | 150    | 5    | shells destroy the wall they hit   |
//!
//! A ranged weapon falls back to [`WeaponKind::Melee`] as soon as its last round is fired.

use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum WeaponKind {
    #[default]
    Melee,
    Pistol,
    Rifle,
    Bazooka,
}

impl WeaponKind {
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Melee => 10.0,
            Self::Pistol => 25.0,
            Self::Rifle => 40.0,
            Self::Bazooka => 150.0,
        }
    }

    /// Magazine size, `None` for unlimited.
    #[must_use]
    pub const fn ammo(self) -> Option<u32> {
        match self {
            Self::Melee => None,
            Self::Pistol => Some(12),
            Self::Rifle => Some(30),
            Self::Bazooka => Some(5),
        }
    }

    #[must_use]
    pub const fn breaches_walls(self) -> bool {
        matches!(self, Self::Bazooka)
    }
}

/// What a trigger pull produced.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum Attack {
    /// Close-range swing at everything within melee range.
    Melee { damage: f32 },
    /// A projectile leaves the muzzle.
    Shot { damage: f32, breaches_walls: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    kind: WeaponKind,
    ammo: Option<u32>,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponKind::Melee)
    }
}

impl Weapon {
    #[must_use]
    pub const fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            ammo: kind.ammo(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    #[must_use]
    pub fn ammo(&self) -> Option<u32> {
        self.ammo
    }

    #[must_use]
    pub fn has_ranged_weapon(&self) -> bool {
        !self.kind.is_melee()
    }

    /// Pulls the trigger, consuming one round of a ranged weapon.
    pub fn fire(&mut self) -> Attack {
        let kind = self.kind;
        match self.ammo {
            None => {
                return Attack::Melee {
                    damage: kind.damage(),
                };
            }
            Some(0) => {
                *self = Self::new(WeaponKind::Melee);
                return self.fire();
            }
            Some(n) => self.ammo = Some(n - 1),
        }
        if self.ammo == Some(0) {
            *self = Self::new(WeaponKind::Melee);
        }
        Attack::Shot {
            damage: kind.damage(),
            breaches_walls: kind.breaches_walls(),
        }
    }
}
