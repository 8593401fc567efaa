//! Static tables driving the Metaf grammar: keyword maps, nav tags, and the
//! line-shape regexes. These are immutable and shared by every parse.

use condact_data::{ActionType, ConditionType, NavNodeType, NavType};
use lazy_static::lazy_static;
use regex::Regex;

/// Condition keyword table, in wire-ordinal order.
pub(super) const CONDITION_KEYWORDS: &[(&str, ConditionType)] = &[
    ("Never", ConditionType::Never),
    ("Always", ConditionType::Always),
    ("All", ConditionType::All),
    ("Any", ConditionType::Any),
    ("ChatMatch", ConditionType::ChatMatch),
    ("MainSlotsLE", ConditionType::MainPackSlotsLE),
    ("SecsInStateGE", ConditionType::SecondsInStateGE),
    ("NavEmpty", ConditionType::NavrouteEmpty),
    ("Death", ConditionType::Death),
    ("VendorOpen", ConditionType::VendorOpen),
    ("VendorClosed", ConditionType::VendorClosed),
    ("ItemCountLE", ConditionType::ItemCountLE),
    ("ItemCountGE", ConditionType::ItemCountGE),
    ("MobsInDist_Name", ConditionType::MonsterCountWithinDistance),
    ("MobsInDist_Priority", ConditionType::MonstersWithPriorityWithinDistance),
    ("NeedToBuff", ConditionType::NeedToBuff),
    ("NoMobsInDist", ConditionType::NoMonstersWithinDistance),
    ("BlockE", ConditionType::LandBlockE),
    ("CellE", ConditionType::LandCellE),
    ("IntoPortal", ConditionType::PortalspaceEnter),
    ("ExitPortal", ConditionType::PortalspaceExit),
    ("Not", ConditionType::Not),
    ("PSecsInStateGE", ConditionType::SecondsInStatePersistGE),
    ("SecsOnSpellGE", ConditionType::TimeLeftOnSpellGE),
    ("BuPercentGE", ConditionType::BurdenPercentGE),
    ("DistToRteGE", ConditionType::DistanceToAnyRoutePointGE),
    ("Expr", ConditionType::Expression),
    ("ChatCapture", ConditionType::ChatCapture),
];

/// Action keyword table, in wire-ordinal order.
pub(super) const ACTION_KEYWORDS: &[(&str, ActionType)] = &[
    ("None", ActionType::None),
    ("SetState", ActionType::SetState),
    ("Chat", ActionType::Chat),
    ("DoAll", ActionType::DoAll),
    ("EmbedNav", ActionType::EmbedNav),
    ("CallState", ActionType::CallState),
    ("Return", ActionType::Return),
    ("DoExpr", ActionType::DoExpr),
    ("ChatExpr", ActionType::ChatExpr),
    ("SetWatchdog", ActionType::SetWatchdog),
    ("ClearWatchdog", ActionType::ClearWatchdog),
    ("GetOpt", ActionType::GetOpt),
    ("SetOpt", ActionType::SetOpt),
    ("CreateView", ActionType::CreateView),
    ("DestroyView", ActionType::DestroyView),
    ("DestroyAllViews", ActionType::DestroyAllViews),
];

/// Nav waypoint tag table, in wire-ordinal order.
pub(super) const NAV_NODE_TAGS: &[(&str, NavNodeType)] = &[
    ("pnt", NavNodeType::Point),
    ("prt", NavNodeType::PortalObs),
    ("rcl", NavNodeType::Recall),
    ("pau", NavNodeType::Pause),
    ("cht", NavNodeType::Chat),
    ("vnd", NavNodeType::OpenVendor),
    ("ptl", NavNodeType::Portal),
    ("tlk", NavNodeType::NpcChat),
    ("chk", NavNodeType::Checkpoint),
    ("jmp", NavNodeType::Jump),
];

/// Tag introducing the single line of a follow route.
pub(super) const FOLLOW_TAG: &str = "flw";

/// Route flavor words accepted after `NAV: <name>`.
pub(super) const NAV_TYPE_WORDS: &[(&str, NavType)] = &[
    ("once", NavType::Once),
    ("circular", NavType::Circular),
    ("linear", NavType::Linear),
    ("follow", NavType::Follow),
];

pub(super) fn condition_keyword(word: &str) -> Option<ConditionType> {
    CONDITION_KEYWORDS.iter().find(|(k, _)| *k == word).map(|(_, t)| *t)
}

pub(super) fn condition_keyword_name(kind: ConditionType) -> &'static str {
    CONDITION_KEYWORDS
        .iter()
        .find(|(_, t)| *t == kind)
        .map(|(k, _)| *k)
        .expect("every condition type has a keyword")
}

pub(super) fn action_keyword(word: &str) -> Option<ActionType> {
    ACTION_KEYWORDS.iter().find(|(k, _)| *k == word).map(|(_, t)| *t)
}

pub(super) fn action_keyword_name(kind: ActionType) -> &'static str {
    ACTION_KEYWORDS
        .iter()
        .find(|(_, t)| *t == kind)
        .map(|(k, _)| *k)
        .expect("every action type has a keyword")
}

pub(super) fn nav_node_tag(word: &str) -> Option<NavNodeType> {
    NAV_NODE_TAGS.iter().find(|(k, _)| *k == word).map(|(_, t)| *t)
}

pub(super) fn nav_node_tag_name(kind: NavNodeType) -> &'static str {
    NAV_NODE_TAGS
        .iter()
        .find(|(_, t)| *t == kind)
        .map(|(k, _)| *k)
        .expect("every nav node type has a tag")
}

pub(super) fn nav_type_word(word: &str) -> Option<NavType> {
    NAV_TYPE_WORDS.iter().find(|(k, _)| *k == word).map(|(_, t)| *t)
}

pub(super) fn nav_type_word_name(kind: NavType) -> &'static str {
    NAV_TYPE_WORDS
        .iter()
        .find(|(_, t)| *t == kind)
        .map(|(k, _)| *k)
        .expect("every nav type has a word")
}

lazy_static! {
    /// Whole-line comment: optional whitespace then `~~`.
    pub(super) static ref COMMENT_RX: Regex = Regex::new(r"^\s*~~").expect("comment regex");
    pub(super) static ref STATE_RX: Regex = Regex::new(r"^STATE:\s*(.*)$").expect("state regex");
    pub(super) static ref NAV_DECL_RX: Regex = Regex::new(r"^NAV:\s+(\S+)\s+(\S+)\s*$").expect("nav decl regex");
    pub(super) static ref IF_RX: Regex = Regex::new(r"^IF:\s*(.*)$").expect("if regex");
    pub(super) static ref DO_RX: Regex = Regex::new(r"^DO:\s*(.*)$").expect("do regex");
    pub(super) static ref INT_RX: Regex = Regex::new(r"^[+-]?\d+$").expect("int regex");
    pub(super) static ref HEX_RX: Regex = Regex::new(r"^[0-9A-Fa-f]{1,8}$").expect("hex regex");
    pub(super) static ref NUM_RX: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("number regex");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_tables_cover_every_ordinal() {
        for id in 0..28 {
            let kind = ConditionType::from_ordinal(id).expect("condition ordinal");
            assert_eq!(condition_keyword(condition_keyword_name(kind)), Some(kind));
        }
        for id in 0..16 {
            let kind = ActionType::from_ordinal(id).expect("action ordinal");
            assert_eq!(action_keyword(action_keyword_name(kind)), Some(kind));
        }
        for id in 0..10 {
            let kind = NavNodeType::from_ordinal(id).expect("node ordinal");
            assert_eq!(nav_node_tag(nav_node_tag_name(kind)), Some(kind));
        }
    }
}
