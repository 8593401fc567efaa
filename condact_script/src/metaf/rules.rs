//! Metaf rule grammar: `STATE:` blocks, `IF:`/`DO:` pairs, and tab-depth
//! recursive descent over condition and action trees.
//!
//! Nav references resolve through a symbol table threaded through the whole
//! parse. The first mention of a name creates its slot; the `NAV:` block
//! that declares it (before or after the mention) fills the slot in. Every
//! `EmbedNav` is materialized in one pass after the document ends, which is
//! also when its optional affine transform runs.

use std::collections::{HashMap, VecDeque};

use condact_data::{ActionType, Condition, ConditionType, Meta, MetaAction, NavRoute, NavType, Rule, ViewString};
use log::debug;

use crate::canonical::NAV_NAME_NONE;
use crate::error::ParseError;
use crate::metaf::ViewLoader;
use crate::metaf::lines::{Fields, MetafLine};
use crate::metaf::nav::{is_follow_line, is_node_line, parse_follow, parse_node};
use crate::metaf::tables::{
    DO_RX, IF_RX, NAV_DECL_RX, STATE_RX, action_keyword, condition_keyword, nav_type_word,
};
use crate::metaf::transform::NavTransform;

/// Name → arena-slot symbol table for nav routes.
#[derive(Default)]
struct NavTable {
    names: Vec<String>,
    routes: Vec<Option<NavRoute>>,
    index: HashMap<String, usize>,
}

impl NavTable {
    fn slot(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.index.get(name) {
            return slot;
        }
        let slot = self.routes.len();
        self.names.push(name.to_string());
        self.routes.push(None);
        self.index.insert(name.to_string(), slot);
        slot
    }
}

/// One `EmbedNav` occurrence awaiting its route, in parse order.
struct PendingEmbed {
    slot: usize,
    line: usize,
    transform: Option<NavTransform>,
}

pub(super) struct MetafParser<'a> {
    lines: Vec<MetafLine<'a>>,
    idx: usize,
    navs: NavTable,
    pending: VecDeque<PendingEmbed>,
    views: &'a dyn ViewLoader,
}

impl<'a> MetafParser<'a> {
    pub fn new(lines: Vec<MetafLine<'a>>, views: &'a dyn ViewLoader) -> Self {
        Self {
            lines,
            idx: 0,
            navs: NavTable::default(),
            pending: VecDeque::new(),
            views,
        }
    }

    fn peek(&self) -> Option<MetafLine<'a>> {
        self.lines.get(self.idx).copied()
    }

    fn advance(&mut self) -> MetafLine<'a> {
        let line = self.lines[self.idx];
        self.idx += 1;
        line
    }

    fn last_line_no(&self) -> usize {
        if self.idx == 0 { 0 } else { self.lines[self.idx - 1].no }
    }

    pub fn parse(mut self) -> Result<Meta, ParseError> {
        let mut meta = Meta::new();
        while let Some(line) = self.peek() {
            if STATE_RX.is_match(line.text) {
                self.parse_state(&mut meta)?;
            } else if line.text.starts_with("NAV:") {
                self.parse_nav_decl()?;
            } else {
                return Err(ParseError::Syntax {
                    line: line.no,
                    detail: format!("expected `STATE:` or `NAV:`, found `{}`", line.text),
                });
            }
        }
        self.resolve(&mut meta)?;
        debug!("metaf document decoded: {} rules, {} nav routes", meta.rules.len(), self.navs.routes.len());
        Ok(meta)
    }

    /// `STATE: {name}` and the IF/DO pairs under it.
    fn parse_state(&mut self, meta: &mut Meta) -> Result<(), ParseError> {
        let line = self.advance();
        let caps = STATE_RX.captures(line.text).expect("caller matched STATE:");
        let mut f = Fields::new(line.no, caps.get(1).expect("capture 1").as_str());
        let state = f.braced()?;
        f.finish()?;
        while let Some(next) = self.peek() {
            let Some(caps) = IF_RX.captures(next.text) else {
                break;
            };
            let if_line = self.advance();
            let base = if_line.tabs;
            let mut f = Fields::new(if_line.no, caps.get(1).expect("capture 1").as_str());
            let condition = self.parse_condition(&mut f, base, 0)?;
            f.finish()?;

            let Some(do_line) = self.peek().filter(|l| DO_RX.is_match(l.text)) else {
                return Err(ParseError::Syntax {
                    line: self.last_line_no(),
                    detail: "every `IF:` must be followed by a `DO:`".to_string(),
                });
            };
            self.advance();
            let caps = DO_RX.captures(do_line.text).expect("peek matched DO:");
            let mut f = Fields::new(do_line.no, caps.get(1).expect("capture 1").as_str());
            let action = self.parse_action(&mut f, do_line.tabs, 0)?;
            f.finish()?;

            meta.rules.push(Rule {
                condition,
                action,
                state: state.clone(),
            });
        }
        Ok(())
    }

    /// `NAV: <name> <flavor>` plus its waypoint (or `flw`) lines.
    fn parse_nav_decl(&mut self) -> Result<(), ParseError> {
        let line = self.advance();
        let caps = NAV_DECL_RX.captures(line.text).ok_or_else(|| ParseError::Syntax {
            line: line.no,
            detail: "expected `NAV: <name> <once|circular|linear|follow>`".to_string(),
        })?;
        let name = caps.get(1).expect("capture 1").as_str();
        let flavor = caps.get(2).expect("capture 2").as_str();
        let kind = nav_type_word(flavor).ok_or_else(|| ParseError::UnknownName {
            line: line.no,
            what: "nav route flavor",
            token: flavor.to_string(),
        })?;
        let route = if kind == NavType::Follow {
            let Some(next) = self.peek().filter(|l| is_follow_line(l.text)) else {
                return Err(ParseError::Syntax {
                    line: line.no,
                    detail: "a follow route needs one `flw` line".to_string(),
                });
            };
            self.advance();
            NavRoute::Follow(parse_follow(next)?)
        } else {
            let mut nodes = Vec::new();
            while let Some(next) = self.peek() {
                if !is_node_line(next.text) {
                    break;
                }
                self.advance();
                nodes.push(parse_node(next)?);
            }
            NavRoute::empty(kind).with_nodes(nodes)
        };
        let slot = self.navs.slot(name);
        debug!("nav route `{name}` declared as {flavor}");
        self.navs.routes[slot] = Some(route);
        Ok(())
    }

    fn parse_condition(&mut self, f: &mut Fields<'a>, base: usize, depth: usize) -> Result<Condition, ParseError> {
        let word = f.word("a condition keyword")?;
        let kind = condition_keyword(word).ok_or_else(|| ParseError::UnknownName {
            line: f.line(),
            what: "condition keyword",
            token: word.to_string(),
        })?;
        Ok(match kind {
            ConditionType::Never => Condition::Never,
            ConditionType::Always => Condition::Always,
            ConditionType::NavrouteEmpty => Condition::NavrouteEmpty,
            ConditionType::Death => Condition::Death,
            ConditionType::VendorOpen => Condition::VendorOpen,
            ConditionType::VendorClosed => Condition::VendorClosed,
            ConditionType::NeedToBuff => Condition::NeedToBuff,
            ConditionType::PortalspaceEnter => Condition::PortalspaceEnter,
            ConditionType::PortalspaceExit => Condition::PortalspaceExit,
            ConditionType::ChatMatch => Condition::ChatMatch(f.braced()?),
            ConditionType::MainPackSlotsLE => Condition::MainPackSlotsLE(f.int()?),
            ConditionType::SecondsInStateGE => Condition::SecondsInStateGE(f.int()?),
            ConditionType::SecondsInStatePersistGE => Condition::SecondsInStatePersistGE(f.int()?),
            ConditionType::BurdenPercentGE => Condition::BurdenPercentGE(f.int()?),
            ConditionType::LandBlockE => Condition::LandBlockE(f.hex()?),
            ConditionType::LandCellE => Condition::LandCellE(f.hex()?),
            ConditionType::ItemCountLE => {
                let count = f.int()?;
                Condition::ItemCountLE {
                    item_name: f.braced()?,
                    count,
                }
            },
            ConditionType::ItemCountGE => {
                let count = f.int()?;
                Condition::ItemCountGE {
                    item_name: f.braced()?,
                    count,
                }
            },
            ConditionType::MonsterCountWithinDistance => {
                let count = f.int()?;
                let range = f.number()?;
                Condition::MonsterCountWithinDistance {
                    monster_name: f.braced()?,
                    count,
                    range,
                }
            },
            ConditionType::MonstersWithPriorityWithinDistance => {
                let count = f.int()?;
                let range = f.number()?;
                Condition::MonstersWithPriorityWithinDistance {
                    priority: f.int()?,
                    count,
                    range,
                }
            },
            ConditionType::NoMonstersWithinDistance => Condition::NoMonstersWithinDistance { range: f.number()? },
            ConditionType::DistanceToAnyRoutePointGE => Condition::DistanceToAnyRoutePointGE {
                distance: f.number()?,
            },
            ConditionType::TimeLeftOnSpellGE => {
                let seconds = f.int()?;
                Condition::TimeLeftOnSpellGE {
                    spell_id: f.int()?,
                    seconds,
                }
            },
            ConditionType::Expression => Condition::Expression { expr: f.braced()? },
            ConditionType::ChatCapture => Condition::ChatCapture {
                pattern: f.braced()?,
                color_id_list: f.braced()?,
            },
            // `Not` continues on the same line at the same depth.
            ConditionType::Not => {
                if f.at_end() {
                    Condition::Not(None)
                } else {
                    Condition::Not(Some(Box::new(self.parse_condition(f, base, depth)?)))
                }
            },
            ConditionType::All => Condition::All(self.condition_children(base, depth)?),
            ConditionType::Any => Condition::Any(self.condition_children(base, depth)?),
        })
    }

    /// Child lines of an `All`/`Any` at the exact expected tab depth.
    fn condition_children(&mut self, base: usize, depth: usize) -> Result<Vec<Condition>, ParseError> {
        let expected = base + depth + 1;
        let mut children = Vec::new();
        while let Some(line) = self.peek() {
            if line.tabs < expected {
                break;
            }
            if line.tabs > expected {
                return Err(ParseError::Syntax {
                    line: line.no,
                    detail: format!("expected {expected} tabs of indent, found {}", line.tabs),
                });
            }
            self.advance();
            let mut f = Fields::new(line.no, line.text);
            let child = self.parse_condition(&mut f, base, depth + 1)?;
            f.finish()?;
            children.push(child);
        }
        Ok(children)
    }

    fn parse_action(&mut self, f: &mut Fields<'a>, base: usize, depth: usize) -> Result<MetaAction, ParseError> {
        let word = f.word("an action keyword")?;
        let kind = action_keyword(word).ok_or_else(|| ParseError::UnknownName {
            line: f.line(),
            what: "action keyword",
            token: word.to_string(),
        })?;
        Ok(match kind {
            ActionType::None => MetaAction::None,
            ActionType::Return => MetaAction::Return,
            ActionType::ClearWatchdog => MetaAction::ClearWatchdog,
            ActionType::DestroyAllViews => MetaAction::DestroyAllViews,
            ActionType::SetState => MetaAction::SetState(f.braced()?),
            ActionType::Chat => MetaAction::Chat(f.braced()?),
            ActionType::CallState => MetaAction::CallState {
                state: f.braced()?,
                return_to: f.braced()?,
            },
            ActionType::DoExpr => MetaAction::DoExpr { expr: f.braced()? },
            ActionType::ChatExpr => MetaAction::ChatExpr { expr: f.braced()? },
            ActionType::SetWatchdog => {
                let range = f.number()?;
                let seconds = f.number()?;
                MetaAction::SetWatchdog {
                    state: f.braced()?,
                    range,
                    seconds,
                }
            },
            ActionType::GetOpt => MetaAction::GetOpt {
                option: f.braced()?,
                into_var: f.braced()?,
            },
            ActionType::SetOpt => MetaAction::SetOpt {
                option: f.braced()?,
                value: f.braced()?,
            },
            ActionType::CreateView => {
                let view = f.braced()?;
                let raw = f.braced()?;
                // A value starting with `:` names a file holding the
                // definition; everything else is the definition itself.
                let xml = match raw.strip_prefix(':') {
                    Some(path) => ViewString(self.views.load_view(path.trim())?),
                    None => ViewString(raw),
                };
                MetaAction::CreateView { view, xml }
            },
            ActionType::DestroyView => MetaAction::DestroyView { view: f.braced()? },
            ActionType::EmbedNav => {
                let reference = f.word("a nav reference")?;
                let display = f.braced()?;
                let name = (display != NAV_NAME_NONE).then_some(display);
                let transform = if f.at_braced() {
                    let text = f.braced()?;
                    Some(NavTransform::parse(&text, f.line())?)
                } else {
                    None
                };
                let slot = self.navs.slot(reference);
                self.pending.push_back(PendingEmbed {
                    slot,
                    line: f.line(),
                    transform,
                });
                // Placeholder; the route lands in the resolve pass.
                MetaAction::EmbedNav {
                    name,
                    route: NavRoute::default(),
                }
            },
            ActionType::DoAll => MetaAction::DoAll(self.action_children(base, depth)?),
        })
    }

    fn action_children(&mut self, base: usize, depth: usize) -> Result<Vec<MetaAction>, ParseError> {
        let expected = base + depth + 1;
        let mut children = Vec::new();
        while let Some(line) = self.peek() {
            if line.tabs < expected {
                break;
            }
            if line.tabs > expected {
                return Err(ParseError::Syntax {
                    line: line.no,
                    detail: format!("expected {expected} tabs of indent, found {}", line.tabs),
                });
            }
            self.advance();
            let mut f = Fields::new(line.no, line.text);
            let child = self.parse_action(&mut f, base, depth + 1)?;
            f.finish()?;
            children.push(child);
        }
        Ok(children)
    }

    /// Fill every `EmbedNav` placeholder from the symbol table, applying
    /// queued transforms. Occurrence order here equals parse order, so the
    /// queue lines up one entry per placeholder.
    fn resolve(&mut self, meta: &mut Meta) -> Result<(), ParseError> {
        let mut queue = std::mem::take(&mut self.pending);
        for rule in &mut meta.rules {
            resolve_action(&mut rule.action, &mut queue, &self.navs)?;
        }
        debug_assert!(queue.is_empty(), "one queue entry per EmbedNav occurrence");
        Ok(())
    }
}

fn resolve_action(
    action: &mut MetaAction,
    queue: &mut VecDeque<PendingEmbed>,
    navs: &NavTable,
) -> Result<(), ParseError> {
    match action {
        MetaAction::DoAll(children) => {
            for child in children {
                resolve_action(child, queue, navs)?;
            }
        },
        MetaAction::EmbedNav { route, .. } => {
            let pending = queue.pop_front().expect("one queue entry per EmbedNav occurrence");
            let declared = navs.routes[pending.slot]
                .as_ref()
                .ok_or_else(|| ParseError::UnknownName {
                    line: pending.line,
                    what: "nav route",
                    token: navs.names[pending.slot].clone(),
                })?;
            *route = match &pending.transform {
                Some(t) => t.apply_route(declared),
                None => declared.clone(),
            };
        },
        _ => {},
    }
    Ok(())
}
