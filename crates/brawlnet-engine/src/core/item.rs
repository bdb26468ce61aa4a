use serde::{Deserialize, Serialize};

use super::{geometry::Vec2, weapon::WeaponKind};

#[derive(
    Debug,
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
pub enum ItemKind {
    Medkit,
    Pistol,
    Rifle,
    Bazooka,
}

impl ItemKind {
    pub const ALL: [Self; 4] = [Self::Medkit, Self::Pistol, Self::Rifle, Self::Bazooka];

    /// Weapon granted on pickup, `None` for consumables.
    #[must_use]
    pub const fn weapon(self) -> Option<WeaponKind> {
        match self {
            Self::Medkit => None,
            Self::Pistol => Some(WeaponKind::Pistol),
            Self::Rifle => Some(WeaponKind::Rifle),
            Self::Bazooka => Some(WeaponKind::Bazooka),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub position: Vec2,
    pub active: bool,
}

impl Item {
    #[must_use]
    pub fn new(kind: ItemKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            active: true,
        }
    }
}
