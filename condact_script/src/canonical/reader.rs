//! Canonical meta reader.

use std::io::Read;

use condact_data::{ActionType, Condition, ConditionType, Meta, MetaAction, Rule, ViewString};
use log::debug;

use crate::canonical::{META_HEADER, NAV_NAME_NONE, TABLE_LIST_HEADER, TABLE_MAP_HEADER};
use crate::error::ParseError;
use crate::nav::read_nav;
use crate::scan::LineCursor;

/// Decode a canonical meta document from a stream.
pub fn read_meta(mut input: impl Read) -> Result<Meta, ParseError> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;
    read_meta_str(&src)
}

/// Decode a canonical meta document already in memory.
pub fn read_meta_str(src: &str) -> Result<Meta, ParseError> {
    let mut cur = LineCursor::new(src);
    for expected in META_HEADER {
        cur.expect_line(expected)?;
    }
    let count = cur.count_line()?;
    let mut rules = Vec::with_capacity(count);
    for _ in 0..count {
        rules.push(read_rule(&mut cur)?);
    }
    cur.expect_end()?;
    debug!("canonical meta decoded: {} rules", rules.len());
    Ok(Meta { rules })
}

fn read_rule(cur: &mut LineCursor) -> Result<Rule, ParseError> {
    cur.expect_line("i")?;
    let cid = cur.int_line()?;
    let ckind = ConditionType::from_ordinal(cid).ok_or(ParseError::UnknownOrdinal {
        line: cur.last_line(),
        what: "condition type",
        id: cid,
    })?;
    cur.expect_line("i")?;
    let aid = cur.int_line()?;
    let akind = ActionType::from_ordinal(aid).ok_or(ParseError::UnknownOrdinal {
        line: cur.last_line(),
        what: "action type",
        id: aid,
    })?;
    let condition = read_condition(cur, ckind)?;
    let action = read_action(cur, akind)?;
    cur.expect_line("s")?;
    let state = cur.next_line()?.to_string();
    Ok(Rule {
        condition,
        action,
        state,
    })
}

/// Decode the `CData` payload for an already-known condition type.
fn read_condition(cur: &mut LineCursor, kind: ConditionType) -> Result<Condition, ParseError> {
    Ok(match kind {
        // Flag conditions carry a placeholder scalar on the wire.
        ConditionType::Never
        | ConditionType::Always
        | ConditionType::NavrouteEmpty
        | ConditionType::Death
        | ConditionType::VendorOpen
        | ConditionType::VendorClosed
        | ConditionType::NeedToBuff
        | ConditionType::PortalspaceEnter
        | ConditionType::PortalspaceExit => {
            read_int_scalar(cur)?;
            Condition::empty(kind)
        },
        ConditionType::MainPackSlotsLE => Condition::MainPackSlotsLE(read_int_scalar(cur)?),
        ConditionType::SecondsInStateGE => Condition::SecondsInStateGE(read_int_scalar(cur)?),
        ConditionType::SecondsInStatePersistGE => Condition::SecondsInStatePersistGE(read_int_scalar(cur)?),
        ConditionType::BurdenPercentGE => Condition::BurdenPercentGE(read_int_scalar(cur)?),
        ConditionType::LandBlockE => Condition::LandBlockE(read_int_scalar(cur)?),
        ConditionType::LandCellE => Condition::LandCellE(read_int_scalar(cur)?),
        ConditionType::ChatMatch => {
            cur.expect_line("s")?;
            Condition::ChatMatch(cur.next_line()?.to_string())
        },
        ConditionType::ItemCountLE => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::ItemCountLE {
                item_name: map.take_str("n")?,
                count: map.take_int("c")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::ItemCountGE => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::ItemCountGE {
                item_name: map.take_str("n")?,
                count: map.take_int("c")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::MonsterCountWithinDistance => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::MonsterCountWithinDistance {
                monster_name: map.take_str("n")?,
                count: map.take_int("c")?,
                range: map.take_f64("r")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::MonstersWithPriorityWithinDistance => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::MonstersWithPriorityWithinDistance {
                priority: map.take_int("p")?,
                count: map.take_int("c")?,
                range: map.take_f64("r")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::NoMonstersWithinDistance => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::NoMonstersWithinDistance {
                range: map.take_f64("r")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::TimeLeftOnSpellGE => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::TimeLeftOnSpellGE {
                spell_id: map.take_int("sid")?,
                seconds: map.take_int("sec")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::DistanceToAnyRoutePointGE => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::DistanceToAnyRoutePointGE {
                distance: map.take_f64("dist")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::Expression => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::Expression {
                expr: map.take_str("e")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::ChatCapture => {
            let mut map = TableMap::read(cur)?;
            let cond = Condition::ChatCapture {
                pattern: map.take_str("p")?,
                color_id_list: map.take_str("c")?,
            };
            map.finish()?;
            cond
        },
        ConditionType::All => Condition::All(read_condition_list(cur)?),
        ConditionType::Any => Condition::Any(read_condition_list(cur)?),
        ConditionType::Not => {
            let mut children = read_condition_list(cur)?;
            match children.len() {
                0 => Condition::Not(None),
                1 => Condition::Not(Some(Box::new(children.remove(0)))),
                n => {
                    return Err(ParseError::Cardinality {
                        line: cur.last_line(),
                        detail: format!("`Not` holds at most one condition, found {n}"),
                    });
                },
            }
        },
    })
}

/// Decode the `AData` payload for an already-known action type.
fn read_action(cur: &mut LineCursor, kind: ActionType) -> Result<MetaAction, ParseError> {
    Ok(match kind {
        ActionType::None | ActionType::Return => {
            read_int_scalar(cur)?;
            MetaAction::empty(kind)
        },
        ActionType::SetState => {
            cur.expect_line("s")?;
            MetaAction::SetState(cur.next_line()?.to_string())
        },
        ActionType::Chat => {
            cur.expect_line("s")?;
            MetaAction::Chat(cur.next_line()?.to_string())
        },
        ActionType::DoAll => MetaAction::DoAll(read_action_list(cur)?),
        ActionType::EmbedNav => read_embed_nav(cur)?,
        ActionType::CallState => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::CallState {
                state: map.take_str("st")?,
                return_to: map.take_str("ret")?,
            };
            map.finish()?;
            action
        },
        ActionType::DoExpr => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::DoExpr {
                expr: map.take_str("e")?,
            };
            map.finish()?;
            action
        },
        ActionType::ChatExpr => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::ChatExpr {
                expr: map.take_str("e")?,
            };
            map.finish()?;
            action
        },
        ActionType::SetWatchdog => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::SetWatchdog {
                state: map.take_str("s")?,
                range: map.take_f64("r")?,
                seconds: map.take_f64("t")?,
            };
            map.finish()?;
            action
        },
        ActionType::ClearWatchdog | ActionType::DestroyAllViews => {
            TableMap::read(cur)?.finish()?;
            MetaAction::empty(kind)
        },
        ActionType::GetOpt => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::GetOpt {
                option: map.take_str("o")?,
                into_var: map.take_str("v")?,
            };
            map.finish()?;
            action
        },
        ActionType::SetOpt => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::SetOpt {
                option: map.take_str("o")?,
                value: map.take_str("v")?,
            };
            map.finish()?;
            action
        },
        ActionType::CreateView => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::CreateView {
                view: map.take_str("n")?,
                xml: ViewString(map.take_blob("x")?),
            };
            map.finish()?;
            action
        },
        ActionType::DestroyView => {
            let mut map = TableMap::read(cur)?;
            let action = MetaAction::DestroyView {
                view: map.take_str("n")?,
            };
            map.finish()?;
            action
        },
    })
}

/// `ba`-framed nav payload: char count, display name, redundant node count,
/// then the nav block itself, parsed out of the counted slice.
fn read_embed_nav(cur: &mut LineCursor) -> Result<MetaAction, ParseError> {
    cur.expect_line("ba")?;
    let count = cur.count_line()?;
    let name_raw = cur.next_line()?;
    let name = if name_raw == NAV_NAME_NONE {
        None
    } else {
        Some(name_raw.to_string())
    };
    let _nodes_hint = cur.int_line()?;
    let block_start = cur.last_line();
    let block = cur.take_chars(count)?;
    let mut nav_cur = LineCursor::new(block);
    let route = read_nav(&mut nav_cur).map_err(|e| offset_lines(e, block_start))?;
    nav_cur.expect_end().map_err(|e| offset_lines(e, block_start))?;
    Ok(MetaAction::EmbedNav { name, route })
}

/// Re-anchor line numbers from an embedded block to the outer document.
fn offset_lines(err: ParseError, base: usize) -> ParseError {
    match err {
        ParseError::Literal { line, expected, actual } => ParseError::Literal {
            line: line + base,
            expected,
            actual,
        },
        ParseError::Value { line, expected, actual } => ParseError::Value {
            line: line + base,
            expected,
            actual,
        },
        ParseError::UnknownName { line, what, token } => ParseError::UnknownName {
            line: line + base,
            what,
            token,
        },
        ParseError::UnknownOrdinal { line, what, id } => ParseError::UnknownOrdinal {
            line: line + base,
            what,
            id,
        },
        ParseError::Cardinality { line, detail } => ParseError::Cardinality {
            line: line + base,
            detail,
        },
        ParseError::Syntax { line, detail } => ParseError::Syntax {
            line: line + base,
            detail,
        },
        ParseError::Eof { line } => ParseError::Eof { line: line + base },
        other => other,
    }
}

/// `i`-tagged scalar line.
fn read_int_scalar(cur: &mut LineCursor) -> Result<i32, ParseError> {
    cur.expect_line("i")?;
    cur.int_line()
}

/// `TABLE/2/K/V/n/n` list payload holding nested conditions.
fn read_condition_list(cur: &mut LineCursor) -> Result<Vec<Condition>, ParseError> {
    read_list_header(cur)?;
    let count = cur.count_line()?;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        cur.expect_line("i")?;
        let id = cur.int_line()?;
        let kind = ConditionType::from_ordinal(id).ok_or(ParseError::UnknownOrdinal {
            line: cur.last_line(),
            what: "condition type",
            id,
        })?;
        out.push(read_condition(cur, kind)?);
    }
    Ok(out)
}

/// `TABLE/2/K/V/n/n` list payload holding nested actions.
fn read_action_list(cur: &mut LineCursor) -> Result<Vec<MetaAction>, ParseError> {
    read_list_header(cur)?;
    let count = cur.count_line()?;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        cur.expect_line("i")?;
        let id = cur.int_line()?;
        let kind = ActionType::from_ordinal(id).ok_or(ParseError::UnknownOrdinal {
            line: cur.last_line(),
            what: "action type",
            id,
        })?;
        out.push(read_action(cur, kind)?);
    }
    Ok(out)
}

fn read_list_header(cur: &mut LineCursor) -> Result<(), ParseError> {
    for expected in TABLE_LIST_HEADER {
        cur.expect_line(expected)?;
    }
    Ok(())
}

/// One tagged value out of a map payload.
enum TagValue {
    Int(i32),
    Str(String),
    Double(f64),
    Blob(String),
}

impl TagValue {
    fn type_name(&self) -> &'static str {
        match self {
            TagValue::Int(_) => "an `i` value",
            TagValue::Str(_) => "an `s` value",
            TagValue::Double(_) => "a `d` value",
            TagValue::Blob(_) => "a `ba` value",
        }
    }
}

/// Decoded `TABLE/2/k/v/n/n` payload. Entries keep file order; the typed
/// accessors pull fields out by their fixed keys, accepting any key order.
struct TableMap {
    line: usize,
    entries: Vec<(String, TagValue)>,
}

impl TableMap {
    fn read(cur: &mut LineCursor) -> Result<Self, ParseError> {
        for expected in TABLE_MAP_HEADER {
            cur.expect_line(expected)?;
        }
        let count = cur.count_line()?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            cur.expect_line("s")?;
            let key = cur.next_line()?.to_string();
            let value = read_tagged_value(cur)?;
            entries.push((key, value));
        }
        Ok(Self {
            line: cur.last_line(),
            entries,
        })
    }

    fn take(&mut self, key: &'static str) -> Result<TagValue, ParseError> {
        let at = self
            .entries
            .iter()
            .position(|(k, _)| k == key)
            .ok_or(ParseError::UnknownName {
                line: self.line,
                what: "missing table key",
                token: key.to_string(),
            })?;
        Ok(self.entries.remove(at).1)
    }

    fn take_int(&mut self, key: &'static str) -> Result<i32, ParseError> {
        match self.take(key)? {
            TagValue::Int(v) => Ok(v),
            other => Err(self.type_mismatch("an `i` value", other)),
        }
    }

    fn take_str(&mut self, key: &'static str) -> Result<String, ParseError> {
        match self.take(key)? {
            TagValue::Str(v) => Ok(v),
            other => Err(self.type_mismatch("an `s` value", other)),
        }
    }

    fn take_f64(&mut self, key: &'static str) -> Result<f64, ParseError> {
        match self.take(key)? {
            TagValue::Double(v) => Ok(v),
            other => Err(self.type_mismatch("a `d` value", other)),
        }
    }

    fn take_blob(&mut self, key: &'static str) -> Result<String, ParseError> {
        match self.take(key)? {
            TagValue::Blob(v) => Ok(v),
            other => Err(self.type_mismatch("a `ba` value", other)),
        }
    }

    fn type_mismatch(&self, expected: &'static str, found: TagValue) -> ParseError {
        ParseError::Value {
            line: self.line,
            expected,
            actual: found.type_name().to_string(),
        }
    }

    /// Any key the caller did not consume is foreign to this payload.
    fn finish(self) -> Result<(), ParseError> {
        if let Some((key, _)) = self.entries.into_iter().next() {
            return Err(ParseError::UnknownName {
                line: self.line,
                what: "table key",
                token: key,
            });
        }
        Ok(())
    }
}

fn read_tagged_value(cur: &mut LineCursor) -> Result<TagValue, ParseError> {
    let tag = cur.next_line()?;
    Ok(match tag {
        "i" => TagValue::Int(cur.int_line()?),
        "s" => TagValue::Str(cur.next_line()?.to_string()),
        "d" => TagValue::Double(cur.f64_line()?),
        "ba" => {
            let count = cur.count_line()?;
            let blob = cur.take_chars(count)?.to_string();
            cur.skip_newline();
            TagValue::Blob(blob)
        },
        other => {
            return Err(ParseError::Literal {
                line: cur.last_line(),
                expected: "one of `i`, `s`, `d`, `ba`".to_string(),
                actual: other.to_string(),
            });
        },
    })
}
