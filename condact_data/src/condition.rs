//! Rule conditions.
//!
//! Every condition the agent can test is one variant of [`Condition`], with
//! the wire ordinal carried by [`ConditionType`]. The two stay in lockstep:
//! `Condition::kind` is a total match, and `Condition::empty` is the only
//! factory the readers use after decoding an ordinal.

use serde::{Deserialize, Serialize};

/// Wire ordinals for [`Condition`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ConditionType {
    Never = 0,
    Always = 1,
    All = 2,
    Any = 3,
    ChatMatch = 4,
    MainPackSlotsLE = 5,
    SecondsInStateGE = 6,
    NavrouteEmpty = 7,
    Death = 8,
    VendorOpen = 9,
    VendorClosed = 10,
    ItemCountLE = 11,
    ItemCountGE = 12,
    MonsterCountWithinDistance = 13,
    MonstersWithPriorityWithinDistance = 14,
    NeedToBuff = 15,
    NoMonstersWithinDistance = 16,
    LandBlockE = 17,
    LandCellE = 18,
    PortalspaceEnter = 19,
    PortalspaceExit = 20,
    Not = 21,
    SecondsInStatePersistGE = 22,
    TimeLeftOnSpellGE = 23,
    BurdenPercentGE = 24,
    DistanceToAnyRoutePointGE = 25,
    Expression = 26,
    ChatCapture = 27,
}

impl ConditionType {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Decode a wire ordinal. Returns `None` for ordinals outside the table
    /// so callers can raise their own diagnostic with the offending value.
    pub fn from_ordinal(id: i32) -> Option<Self> {
        use ConditionType::*;
        Some(match id {
            0 => Never,
            1 => Always,
            2 => All,
            3 => Any,
            4 => ChatMatch,
            5 => MainPackSlotsLE,
            6 => SecondsInStateGE,
            7 => NavrouteEmpty,
            8 => Death,
            9 => VendorOpen,
            10 => VendorClosed,
            11 => ItemCountLE,
            12 => ItemCountGE,
            13 => MonsterCountWithinDistance,
            14 => MonstersWithPriorityWithinDistance,
            15 => NeedToBuff,
            16 => NoMonstersWithinDistance,
            17 => LandBlockE,
            18 => LandCellE,
            19 => PortalspaceEnter,
            20 => PortalspaceExit,
            21 => Not,
            22 => SecondsInStatePersistGE,
            23 => TimeLeftOnSpellGE,
            24 => BurdenPercentGE,
            25 => DistanceToAnyRoutePointGE,
            26 => Expression,
            27 => ChatCapture,
            _ => return None,
        })
    }
}

/// A rule condition.
///
/// Scalar variants carry their payload directly; composite variants own
/// their children (`All`/`Any` in evaluation order, `Not` at most one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Never,
    Always,
    All(Vec<Condition>),
    Any(Vec<Condition>),
    /// Chat line matches a regex.
    ChatMatch(String),
    MainPackSlotsLE(i32),
    SecondsInStateGE(i32),
    NavrouteEmpty,
    Death,
    VendorOpen,
    VendorClosed,
    ItemCountLE {
        item_name: String,
        count: i32,
    },
    ItemCountGE {
        item_name: String,
        count: i32,
    },
    MonsterCountWithinDistance {
        monster_name: String,
        count: i32,
        range: f64,
    },
    MonstersWithPriorityWithinDistance {
        priority: i32,
        count: i32,
        range: f64,
    },
    NeedToBuff,
    NoMonstersWithinDistance {
        range: f64,
    },
    /// Current landblock equals the payload (upper 16 bits of a cell id).
    LandBlockE(i32),
    LandCellE(i32),
    PortalspaceEnter,
    PortalspaceExit,
    /// Negation; an empty child means "not anything", i.e. always true.
    Not(Option<Box<Condition>>),
    SecondsInStatePersistGE(i32),
    TimeLeftOnSpellGE {
        spell_id: i32,
        seconds: i32,
    },
    BurdenPercentGE(i32),
    DistanceToAnyRoutePointGE {
        distance: f64,
    },
    Expression {
        expr: String,
    },
    ChatCapture {
        pattern: String,
        color_id_list: String,
    },
}

impl Condition {
    /// The wire ordinal for this variant.
    pub fn kind(&self) -> ConditionType {
        match self {
            Condition::Never => ConditionType::Never,
            Condition::Always => ConditionType::Always,
            Condition::All(_) => ConditionType::All,
            Condition::Any(_) => ConditionType::Any,
            Condition::ChatMatch(_) => ConditionType::ChatMatch,
            Condition::MainPackSlotsLE(_) => ConditionType::MainPackSlotsLE,
            Condition::SecondsInStateGE(_) => ConditionType::SecondsInStateGE,
            Condition::NavrouteEmpty => ConditionType::NavrouteEmpty,
            Condition::Death => ConditionType::Death,
            Condition::VendorOpen => ConditionType::VendorOpen,
            Condition::VendorClosed => ConditionType::VendorClosed,
            Condition::ItemCountLE { .. } => ConditionType::ItemCountLE,
            Condition::ItemCountGE { .. } => ConditionType::ItemCountGE,
            Condition::MonsterCountWithinDistance { .. } => ConditionType::MonsterCountWithinDistance,
            Condition::MonstersWithPriorityWithinDistance { .. } => {
                ConditionType::MonstersWithPriorityWithinDistance
            },
            Condition::NeedToBuff => ConditionType::NeedToBuff,
            Condition::NoMonstersWithinDistance { .. } => ConditionType::NoMonstersWithinDistance,
            Condition::LandBlockE(_) => ConditionType::LandBlockE,
            Condition::LandCellE(_) => ConditionType::LandCellE,
            Condition::PortalspaceEnter => ConditionType::PortalspaceEnter,
            Condition::PortalspaceExit => ConditionType::PortalspaceExit,
            Condition::Not(_) => ConditionType::Not,
            Condition::SecondsInStatePersistGE(_) => ConditionType::SecondsInStatePersistGE,
            Condition::TimeLeftOnSpellGE { .. } => ConditionType::TimeLeftOnSpellGE,
            Condition::BurdenPercentGE(_) => ConditionType::BurdenPercentGE,
            Condition::DistanceToAnyRoutePointGE { .. } => ConditionType::DistanceToAnyRoutePointGE,
            Condition::Expression { .. } => ConditionType::Expression,
            Condition::ChatCapture { .. } => ConditionType::ChatCapture,
        }
    }

    /// Fresh condition with an empty payload for `kind`. Exhaustive over
    /// [`ConditionType`]; this is the single place ordinals become variants.
    pub fn empty(kind: ConditionType) -> Condition {
        match kind {
            ConditionType::Never => Condition::Never,
            ConditionType::Always => Condition::Always,
            ConditionType::All => Condition::All(Vec::new()),
            ConditionType::Any => Condition::Any(Vec::new()),
            ConditionType::ChatMatch => Condition::ChatMatch(String::new()),
            ConditionType::MainPackSlotsLE => Condition::MainPackSlotsLE(0),
            ConditionType::SecondsInStateGE => Condition::SecondsInStateGE(0),
            ConditionType::NavrouteEmpty => Condition::NavrouteEmpty,
            ConditionType::Death => Condition::Death,
            ConditionType::VendorOpen => Condition::VendorOpen,
            ConditionType::VendorClosed => Condition::VendorClosed,
            ConditionType::ItemCountLE => Condition::ItemCountLE {
                item_name: String::new(),
                count: 0,
            },
            ConditionType::ItemCountGE => Condition::ItemCountGE {
                item_name: String::new(),
                count: 0,
            },
            ConditionType::MonsterCountWithinDistance => Condition::MonsterCountWithinDistance {
                monster_name: String::new(),
                count: 0,
                range: 0.0,
            },
            ConditionType::MonstersWithPriorityWithinDistance => Condition::MonstersWithPriorityWithinDistance {
                priority: 0,
                count: 0,
                range: 0.0,
            },
            ConditionType::NeedToBuff => Condition::NeedToBuff,
            ConditionType::NoMonstersWithinDistance => Condition::NoMonstersWithinDistance { range: 0.0 },
            ConditionType::LandBlockE => Condition::LandBlockE(0),
            ConditionType::LandCellE => Condition::LandCellE(0),
            ConditionType::PortalspaceEnter => Condition::PortalspaceEnter,
            ConditionType::PortalspaceExit => Condition::PortalspaceExit,
            ConditionType::Not => Condition::Not(None),
            ConditionType::SecondsInStatePersistGE => Condition::SecondsInStatePersistGE(0),
            ConditionType::TimeLeftOnSpellGE => Condition::TimeLeftOnSpellGE {
                spell_id: 0,
                seconds: 0,
            },
            ConditionType::BurdenPercentGE => Condition::BurdenPercentGE(0),
            ConditionType::DistanceToAnyRoutePointGE => Condition::DistanceToAnyRoutePointGE { distance: 0.0 },
            ConditionType::Expression => Condition::Expression { expr: String::new() },
            ConditionType::ChatCapture => Condition::ChatCapture {
                pattern: String::new(),
                color_id_list: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_kind_for_every_ordinal() {
        for id in 0..28 {
            let kind = ConditionType::from_ordinal(id).expect("ordinal in table");
            assert_eq!(Condition::empty(kind).kind(), kind);
            assert_eq!(kind.ordinal(), id);
        }
        assert!(ConditionType::from_ordinal(28).is_none());
        assert!(ConditionType::from_ordinal(-1).is_none());
    }
}
