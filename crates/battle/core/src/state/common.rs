use core::fmt;

/// Which side of the battle a combatant fights on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Party,
    Troop,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Party => Side::Troop,
            Side::Troop => Side::Party,
        }
    }
}

/// Stable identity of a combatant: its side plus its slot index in that unit.
///
/// Slots never move during a battle, so ids stay valid until the battle ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlerId {
    pub side: Side,
    pub index: u8,
}

impl BattlerId {
    pub const fn new(side: Side, index: u8) -> Self {
        Self { side, index }
    }

    pub const fn party(index: u8) -> Self {
        Self::new(Side::Party, index)
    }

    pub const fn troop(index: u8) -> Self {
        Self::new(Side::Troop, index)
    }

    #[inline]
    pub const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for BattlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side, self.index)
    }
}

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u16);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

catalog_id!(
    /// Catalog key of a skill definition.
    SkillId,
    "skill:"
);
catalog_id!(
    /// Catalog key of an item definition.
    ItemId,
    "item:"
);
catalog_id!(
    /// Catalog key of an enemy definition.
    EnemyId,
    "enemy:"
);
catalog_id!(
    /// Catalog key of a playable actor definition.
    ActorId,
    "actor:"
);
catalog_id!(
    /// Catalog key of a troop (enemy formation).
    TroopId,
    "troop:"
);
catalog_id!(
    /// Identifier of a scripted battle event reserved by an action.
    EventId,
    "event:"
);
