//! Nav routes: the embedded 3D waypoint sub-language.
//!
//! A route is either an ordered list of [`NavNode`] waypoints (walked once,
//! in a loop, or back and forth) or a "follow this character" descriptor.
//! Node order is traversal order.

use serde::{Deserialize, Serialize};

/// A 3D position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Wire ordinals for route flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum NavType {
    Circular = 1,
    Linear = 2,
    Follow = 3,
    Once = 4,
}

impl NavType {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(id: i32) -> Option<Self> {
        Some(match id {
            1 => NavType::Circular,
            2 => NavType::Linear,
            3 => NavType::Follow,
            4 => NavType::Once,
            _ => return None,
        })
    }
}

/// Target descriptor for follow routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NavFollow {
    pub target_name: String,
    pub target_id: i32,
}

/// A nav route. The flavor is the discriminant, so a follow route can never
/// carry waypoints and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavRoute {
    Once(Vec<NavNode>),
    Circular(Vec<NavNode>),
    Linear(Vec<NavNode>),
    Follow(NavFollow),
}

impl Default for NavRoute {
    fn default() -> Self {
        NavRoute::Once(Vec::new())
    }
}

impl NavRoute {
    pub fn kind(&self) -> NavType {
        match self {
            NavRoute::Once(_) => NavType::Once,
            NavRoute::Circular(_) => NavType::Circular,
            NavRoute::Linear(_) => NavType::Linear,
            NavRoute::Follow(_) => NavType::Follow,
        }
    }

    /// Fresh route with no waypoints (or a blank follow target).
    pub fn empty(kind: NavType) -> NavRoute {
        match kind {
            NavType::Once => NavRoute::Once(Vec::new()),
            NavType::Circular => NavRoute::Circular(Vec::new()),
            NavType::Linear => NavRoute::Linear(Vec::new()),
            NavType::Follow => NavRoute::Follow(NavFollow::default()),
        }
    }

    /// Waypoints, if this route flavor has them.
    pub fn nodes(&self) -> Option<&[NavNode]> {
        match self {
            NavRoute::Once(nodes) | NavRoute::Circular(nodes) | NavRoute::Linear(nodes) => Some(nodes),
            NavRoute::Follow(_) => None,
        }
    }

    pub fn nodes_mut(&mut self) -> Option<&mut Vec<NavNode>> {
        match self {
            NavRoute::Once(nodes) | NavRoute::Circular(nodes) | NavRoute::Linear(nodes) => Some(nodes),
            NavRoute::Follow(_) => None,
        }
    }

    /// Rebuild this route with `nodes` in place of its waypoint list.
    /// Follow routes pass through unchanged.
    pub fn with_nodes(&self, nodes: Vec<NavNode>) -> NavRoute {
        match self {
            NavRoute::Once(_) => NavRoute::Once(nodes),
            NavRoute::Circular(_) => NavRoute::Circular(nodes),
            NavRoute::Linear(_) => NavRoute::Linear(nodes),
            NavRoute::Follow(f) => NavRoute::Follow(f.clone()),
        }
    }
}

/// Wire ordinals for [`NavNode`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum NavNodeType {
    Point = 0,
    PortalObs = 1,
    Recall = 2,
    Pause = 3,
    Chat = 4,
    OpenVendor = 5,
    Portal = 6,
    NpcChat = 7,
    Checkpoint = 8,
    Jump = 9,
}

impl NavNodeType {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(id: i32) -> Option<Self> {
        Some(match id {
            0 => NavNodeType::Point,
            1 => NavNodeType::PortalObs,
            2 => NavNodeType::Recall,
            3 => NavNodeType::Pause,
            4 => NavNodeType::Chat,
            5 => NavNodeType::OpenVendor,
            6 => NavNodeType::Portal,
            7 => NavNodeType::NpcChat,
            8 => NavNodeType::Checkpoint,
            9 => NavNodeType::Jump,
            _ => return None,
        })
    }
}

/// One waypoint. Every variant carries the point to walk to plus whatever
/// the agent should do on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavNode {
    Point(Point),
    /// Use a portal known by object id.
    PortalObs {
        point: Point,
        portal_id: i32,
    },
    Recall {
        point: Point,
        spell: RecallSpell,
    },
    Pause {
        point: Point,
        seconds: f64,
    },
    Chat {
        point: Point,
        text: String,
    },
    OpenVendor {
        point: Point,
        vendor_id: i32,
        vendor_name: String,
    },
    /// Use a portal found by name/class near `target`.
    Portal {
        point: Point,
        object_name: String,
        object_class: ObjectClass,
        target: Point,
    },
    /// Talk to an NPC near `target`; `object_class` must be [`ObjectClass::Npc`].
    NpcChat {
        point: Point,
        object_name: String,
        object_class: ObjectClass,
        target: Point,
    },
    Checkpoint(Point),
    Jump {
        point: Point,
        heading: f64,
        shift: bool,
        delay: f64,
    },
}

impl NavNode {
    pub fn kind(&self) -> NavNodeType {
        match self {
            NavNode::Point(_) => NavNodeType::Point,
            NavNode::PortalObs { .. } => NavNodeType::PortalObs,
            NavNode::Recall { .. } => NavNodeType::Recall,
            NavNode::Pause { .. } => NavNodeType::Pause,
            NavNode::Chat { .. } => NavNodeType::Chat,
            NavNode::OpenVendor { .. } => NavNodeType::OpenVendor,
            NavNode::Portal { .. } => NavNodeType::Portal,
            NavNode::NpcChat { .. } => NavNodeType::NpcChat,
            NavNode::Checkpoint(_) => NavNodeType::Checkpoint,
            NavNode::Jump { .. } => NavNodeType::Jump,
        }
    }

    /// Fresh node of `kind` at the origin with an empty payload.
    pub fn empty(kind: NavNodeType) -> NavNode {
        let p = Point::default();
        match kind {
            NavNodeType::Point => NavNode::Point(p),
            NavNodeType::PortalObs => NavNode::PortalObs { point: p, portal_id: 0 },
            NavNodeType::Recall => NavNode::Recall {
                point: p,
                spell: RecallSpell::PrimaryPortalRecall,
            },
            NavNodeType::Pause => NavNode::Pause { point: p, seconds: 0.0 },
            NavNodeType::Chat => NavNode::Chat {
                point: p,
                text: String::new(),
            },
            NavNodeType::OpenVendor => NavNode::OpenVendor {
                point: p,
                vendor_id: 0,
                vendor_name: String::new(),
            },
            NavNodeType::Portal => NavNode::Portal {
                point: p,
                object_name: String::new(),
                object_class: ObjectClass::Portal,
                target: Point::default(),
            },
            NavNodeType::NpcChat => NavNode::NpcChat {
                point: p,
                object_name: String::new(),
                object_class: ObjectClass::Npc,
                target: Point::default(),
            },
            NavNodeType::Checkpoint => NavNode::Checkpoint(p),
            NavNodeType::Jump => NavNode::Jump {
                point: p,
                heading: 0.0,
                shift: false,
                delay: 0.0,
            },
        }
    }

    /// The point the agent walks to for this node.
    pub fn point(&self) -> Point {
        match self {
            NavNode::Point(p) | NavNode::Checkpoint(p) => *p,
            NavNode::PortalObs { point, .. }
            | NavNode::Recall { point, .. }
            | NavNode::Pause { point, .. }
            | NavNode::Chat { point, .. }
            | NavNode::OpenVendor { point, .. }
            | NavNode::Portal { point, .. }
            | NavNode::NpcChat { point, .. }
            | NavNode::Jump { point, .. } => *point,
        }
    }

    /// Same node relocated to `point`. Payload (including portal/NPC target
    /// points) is untouched.
    pub fn at_point(&self, point: Point) -> NavNode {
        let mut node = self.clone();
        match &mut node {
            NavNode::Point(p) | NavNode::Checkpoint(p) => *p = point,
            NavNode::PortalObs { point: p, .. }
            | NavNode::Recall { point: p, .. }
            | NavNode::Pause { point: p, .. }
            | NavNode::Chat { point: p, .. }
            | NavNode::OpenVendor { point: p, .. }
            | NavNode::Portal { point: p, .. }
            | NavNode::NpcChat { point: p, .. }
            | NavNode::Jump { point: p, .. } => *p = point,
        }
        node
    }
}

/// Decal object classes, as carried on `Portal`/`NpcChat` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ObjectClass {
    Unknown = 0,
    MeleeWeapon = 1,
    Armor = 2,
    Clothing = 3,
    Jewelry = 4,
    Monster = 5,
    Food = 6,
    Money = 7,
    Misc = 8,
    MissileWeapon = 9,
    Container = 10,
    Gem = 11,
    SpellComponent = 12,
    Key = 13,
    Portal = 14,
    TradeNote = 15,
    ManaStone = 16,
    Plant = 17,
    BaseCooking = 18,
    BaseAlchemy = 19,
    BaseFletching = 20,
    CraftedCooking = 21,
    CraftedAlchemy = 22,
    CraftedFletching = 23,
    Ust = 24,
    Salvage = 25,
    Services = 26,
    Scroll = 27,
    Corpse = 28,
    Figurine = 29,
    Healer = 30,
    Lockpick = 31,
    WandStaffOrb = 32,
    Bundle = 33,
    Book = 34,
    Journal = 35,
    Sign = 36,
    Npc = 37,
    Foci = 38,
    Vendor = 39,
    Door = 40,
    Housing = 41,
}

impl ObjectClass {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(id: i32) -> Option<Self> {
        Some(match id {
            0 => ObjectClass::Unknown,
            1 => ObjectClass::MeleeWeapon,
            2 => ObjectClass::Armor,
            3 => ObjectClass::Clothing,
            4 => ObjectClass::Jewelry,
            5 => ObjectClass::Monster,
            6 => ObjectClass::Food,
            7 => ObjectClass::Money,
            8 => ObjectClass::Misc,
            9 => ObjectClass::MissileWeapon,
            10 => ObjectClass::Container,
            11 => ObjectClass::Gem,
            12 => ObjectClass::SpellComponent,
            13 => ObjectClass::Key,
            14 => ObjectClass::Portal,
            15 => ObjectClass::TradeNote,
            16 => ObjectClass::ManaStone,
            17 => ObjectClass::Plant,
            18 => ObjectClass::BaseCooking,
            19 => ObjectClass::BaseAlchemy,
            20 => ObjectClass::BaseFletching,
            21 => ObjectClass::CraftedCooking,
            22 => ObjectClass::CraftedAlchemy,
            23 => ObjectClass::CraftedFletching,
            24 => ObjectClass::Ust,
            25 => ObjectClass::Salvage,
            26 => ObjectClass::Services,
            27 => ObjectClass::Scroll,
            28 => ObjectClass::Corpse,
            29 => ObjectClass::Figurine,
            30 => ObjectClass::Healer,
            31 => ObjectClass::Lockpick,
            32 => ObjectClass::WandStaffOrb,
            33 => ObjectClass::Bundle,
            34 => ObjectClass::Book,
            35 => ObjectClass::Journal,
            36 => ObjectClass::Sign,
            37 => ObjectClass::Npc,
            38 => ObjectClass::Foci,
            39 => ObjectClass::Vendor,
            40 => ObjectClass::Door,
            41 => ObjectClass::Housing,
            _ => return None,
        })
    }
}

/// Recall spells a `rcl` waypoint can cast. Ordinals are the live-server
/// spell ids; names are the exact in-game spell names the Metaf grammar
/// resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum RecallSpell {
    PrimaryPortalRecall = 48,
    SecondaryPortalRecall = 2647,
    LifestoneRecall = 1635,
    LifestoneSending = 1636,
    PortalRecall = 2645,
    RecallAphusLassel = 2931,
    RecallTheSanctuary = 2023,
    RecallToTheSingularityCaul = 2943,
    GlendenWoodRecall = 3865,
    AerlintheRecall = 2041,
    MountLetheRecall = 2813,
    UlgrimsRecall = 2941,
    BurRecall = 4084,
    ParadoxTouchedOlthoiInfestedAreaRecall = 4198,
    CallOfTheMhoireForge = 4128,
    ColosseumRecall = 4213,
    FacilityHubRecall = 5330,
    GearKnightInvasionAreaCampRecall = 5541,
    LostCityOfNeftetRecall = 4214,
    ReturnToTheKeep = 5175,
    RynthidRecall = 6150,
    ViridianRiseRecall = 6321,
    ViridianRiseGreatTreeRecall = 6322,
    CelestialHandStrongholdRecall = 4907,
    RadiantBloodStrongholdRecall = 4909,
}

/// Spell name table in wire order; the single source for name⇄id lookups.
pub const RECALL_SPELLS: &[(RecallSpell, &str)] = &[
    (RecallSpell::PrimaryPortalRecall, "Primary Portal Recall"),
    (RecallSpell::SecondaryPortalRecall, "Secondary Portal Recall"),
    (RecallSpell::LifestoneRecall, "Lifestone Recall"),
    (RecallSpell::LifestoneSending, "Lifestone Sending"),
    (RecallSpell::PortalRecall, "Portal Recall"),
    (RecallSpell::RecallAphusLassel, "Recall Aphus Lassel"),
    (RecallSpell::RecallTheSanctuary, "Recall the Sanctuary"),
    (
        RecallSpell::RecallToTheSingularityCaul,
        "Recall to the Singularity Caul",
    ),
    (RecallSpell::GlendenWoodRecall, "Glenden Wood Recall"),
    (RecallSpell::AerlintheRecall, "Aerlinthe Recall"),
    (RecallSpell::MountLetheRecall, "Mount Lethe Recall"),
    (RecallSpell::UlgrimsRecall, "Ulgrim's Recall"),
    (RecallSpell::BurRecall, "Bur Recall"),
    (
        RecallSpell::ParadoxTouchedOlthoiInfestedAreaRecall,
        "Paradox-touched Olthoi Infested Area Recall",
    ),
    (RecallSpell::CallOfTheMhoireForge, "Call of the Mhoire Forge"),
    (RecallSpell::ColosseumRecall, "Colosseum Recall"),
    (RecallSpell::FacilityHubRecall, "Facility Hub Recall"),
    (
        RecallSpell::GearKnightInvasionAreaCampRecall,
        "Gear Knight Invasion Area Camp Recall",
    ),
    (RecallSpell::LostCityOfNeftetRecall, "Lost City of Neftet Recall"),
    (RecallSpell::ReturnToTheKeep, "Return to the Keep"),
    (RecallSpell::RynthidRecall, "Rynthid Recall"),
    (RecallSpell::ViridianRiseRecall, "Viridian Rise Recall"),
    (
        RecallSpell::ViridianRiseGreatTreeRecall,
        "Viridian Rise Great Tree Recall",
    ),
    (
        RecallSpell::CelestialHandStrongholdRecall,
        "Celestial Hand Stronghold Recall",
    ),
    (
        RecallSpell::RadiantBloodStrongholdRecall,
        "Radiant Blood Stronghold Recall",
    ),
];

impl RecallSpell {
    pub fn spell_id(self) -> i32 {
        self as i32
    }

    pub fn from_spell_id(id: i32) -> Option<Self> {
        RECALL_SPELLS.iter().find(|(s, _)| s.spell_id() == id).map(|(s, _)| *s)
    }

    /// The in-game spell name, as written in `rcl` waypoint lines.
    pub fn name(self) -> &'static str {
        RECALL_SPELLS
            .iter()
            .find(|(s, _)| *s == self)
            .map(|(_, n)| *n)
            .expect("every RecallSpell has a table row")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        RECALL_SPELLS.iter().find(|(_, n)| *n == name).map(|(s, _)| *s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spell_table_is_bijective() {
        assert_eq!(RECALL_SPELLS.len(), 25);
        for (spell, name) in RECALL_SPELLS {
            assert_eq!(RecallSpell::from_name(name), Some(*spell));
            assert_eq!(RecallSpell::from_spell_id(spell.spell_id()), Some(*spell));
        }
    }

    #[test]
    fn node_point_relocation_keeps_payload() {
        let node = NavNode::Portal {
            point: Point::new(1.0, 2.0, 3.0),
            object_name: "Gateway".into(),
            object_class: ObjectClass::Portal,
            target: Point::new(9.0, 8.0, 7.0),
        };
        let moved = node.at_point(Point::new(0.5, 0.5, 0.0));
        assert_eq!(moved.point(), Point::new(0.5, 0.5, 0.0));
        match moved {
            NavNode::Portal { target, .. } => assert_eq!(target, Point::new(9.0, 8.0, 7.0)),
            _ => panic!("variant changed"),
        }
    }

    #[test]
    fn route_flavor_tracks_ordinal() {
        for id in 1..5 {
            let kind = NavType::from_ordinal(id).expect("ordinal in table");
            assert_eq!(NavRoute::empty(kind).kind(), kind);
        }
        assert!(NavType::from_ordinal(0).is_none());
        assert!(NavType::from_ordinal(5).is_none());
    }
}
