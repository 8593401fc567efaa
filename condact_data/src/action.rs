//! Rule actions.
//!
//! Mirrors the condition side: one [`MetaAction`] variant per [`ActionType`]
//! ordinal, kept in lockstep by `kind` and the `empty` factory.

use serde::{Deserialize, Serialize};

use crate::NavRoute;

/// Wire ordinals for [`MetaAction`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ActionType {
    None = 0,
    SetState = 1,
    Chat = 2,
    DoAll = 3,
    EmbedNav = 4,
    CallState = 5,
    Return = 6,
    DoExpr = 7,
    ChatExpr = 8,
    SetWatchdog = 9,
    ClearWatchdog = 10,
    GetOpt = 11,
    SetOpt = 12,
    CreateView = 13,
    DestroyView = 14,
    DestroyAllViews = 15,
}

impl ActionType {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(id: i32) -> Option<Self> {
        Some(match id {
            0 => ActionType::None,
            1 => ActionType::SetState,
            2 => ActionType::Chat,
            3 => ActionType::DoAll,
            4 => ActionType::EmbedNav,
            5 => ActionType::CallState,
            6 => ActionType::Return,
            7 => ActionType::DoExpr,
            8 => ActionType::ChatExpr,
            9 => ActionType::SetWatchdog,
            10 => ActionType::ClearWatchdog,
            11 => ActionType::GetOpt,
            12 => ActionType::SetOpt,
            13 => ActionType::CreateView,
            14 => ActionType::DestroyView,
            15 => ActionType::DestroyAllViews,
            _ => return None,
        })
    }
}

/// A char-counted text blob, typically a view XML definition.
///
/// The canonical format frames these by exact character count rather than by
/// line, so the content is free to contain newlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewString(pub String);

impl From<String> for ViewString {
    fn from(s: String) -> Self {
        ViewString(s)
    }
}

impl From<&str> for ViewString {
    fn from(s: &str) -> Self {
        ViewString(s.to_string())
    }
}

/// A rule action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaAction {
    None,
    SetState(String),
    /// Send a chat line verbatim.
    Chat(String),
    /// Run every sub-action, in order.
    DoAll(Vec<MetaAction>),
    /// Load a nav route. `name` is display-only; `None` round-trips through
    /// the `"[None]"` sentinel on the wire.
    EmbedNav {
        name: Option<String>,
        route: NavRoute,
    },
    CallState {
        state: String,
        return_to: String,
    },
    Return,
    DoExpr {
        expr: String,
    },
    ChatExpr {
        expr: String,
    },
    SetWatchdog {
        state: String,
        range: f64,
        seconds: f64,
    },
    ClearWatchdog,
    GetOpt {
        option: String,
        into_var: String,
    },
    SetOpt {
        option: String,
        value: String,
    },
    CreateView {
        view: String,
        xml: ViewString,
    },
    DestroyView {
        view: String,
    },
    DestroyAllViews,
}

impl MetaAction {
    /// The wire ordinal for this variant.
    pub fn kind(&self) -> ActionType {
        match self {
            MetaAction::None => ActionType::None,
            MetaAction::SetState(_) => ActionType::SetState,
            MetaAction::Chat(_) => ActionType::Chat,
            MetaAction::DoAll(_) => ActionType::DoAll,
            MetaAction::EmbedNav { .. } => ActionType::EmbedNav,
            MetaAction::CallState { .. } => ActionType::CallState,
            MetaAction::Return => ActionType::Return,
            MetaAction::DoExpr { .. } => ActionType::DoExpr,
            MetaAction::ChatExpr { .. } => ActionType::ChatExpr,
            MetaAction::SetWatchdog { .. } => ActionType::SetWatchdog,
            MetaAction::ClearWatchdog => ActionType::ClearWatchdog,
            MetaAction::GetOpt { .. } => ActionType::GetOpt,
            MetaAction::SetOpt { .. } => ActionType::SetOpt,
            MetaAction::CreateView { .. } => ActionType::CreateView,
            MetaAction::DestroyView { .. } => ActionType::DestroyView,
            MetaAction::DestroyAllViews => ActionType::DestroyAllViews,
        }
    }

    /// Fresh action with an empty payload for `kind`.
    pub fn empty(kind: ActionType) -> MetaAction {
        match kind {
            ActionType::None => MetaAction::None,
            ActionType::SetState => MetaAction::SetState(String::new()),
            ActionType::Chat => MetaAction::Chat(String::new()),
            ActionType::DoAll => MetaAction::DoAll(Vec::new()),
            ActionType::EmbedNav => MetaAction::EmbedNav {
                name: None,
                route: NavRoute::default(),
            },
            ActionType::CallState => MetaAction::CallState {
                state: String::new(),
                return_to: String::new(),
            },
            ActionType::Return => MetaAction::Return,
            ActionType::DoExpr => MetaAction::DoExpr { expr: String::new() },
            ActionType::ChatExpr => MetaAction::ChatExpr { expr: String::new() },
            ActionType::SetWatchdog => MetaAction::SetWatchdog {
                state: String::new(),
                range: 0.0,
                seconds: 0.0,
            },
            ActionType::ClearWatchdog => MetaAction::ClearWatchdog,
            ActionType::GetOpt => MetaAction::GetOpt {
                option: String::new(),
                into_var: String::new(),
            },
            ActionType::SetOpt => MetaAction::SetOpt {
                option: String::new(),
                value: String::new(),
            },
            ActionType::CreateView => MetaAction::CreateView {
                view: String::new(),
                xml: ViewString::default(),
            },
            ActionType::DestroyView => MetaAction::DestroyView { view: String::new() },
            ActionType::DestroyAllViews => MetaAction::DestroyAllViews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_kind_for_every_ordinal() {
        for id in 0..16 {
            let kind = ActionType::from_ordinal(id).expect("ordinal in table");
            assert_eq!(MetaAction::empty(kind).kind(), kind);
            assert_eq!(kind.ordinal(), id);
        }
        assert!(ActionType::from_ordinal(16).is_none());
    }
}
