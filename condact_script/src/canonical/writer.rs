//! Canonical meta writer.
//!
//! Renders the whole document into memory before touching the stream; the
//! `ba` framings need character counts up front, so everything is built on
//! `String` and flushed once.

use std::fmt::Write as _;
use std::io;

use condact_data::{Condition, Meta, MetaAction, Rule, ViewString};

use crate::canonical::{META_HEADER, NAV_NAME_NONE, TABLE_LIST_HEADER, TABLE_MAP_HEADER};
use crate::error::ParseError;
use crate::nav::write_nav;

/// Encode a meta document onto a stream.
pub fn write_meta(mut w: impl io::Write, meta: &Meta) -> Result<(), ParseError> {
    w.write_all(write_meta_string(meta).as_bytes())?;
    Ok(())
}

/// Encode a meta document to a string.
///
/// Rules are emitted stably sorted by state: that grouping is part of the
/// format, and ties keep their original order.
pub fn write_meta_string(meta: &Meta) -> String {
    let mut out = String::new();
    for line in META_HEADER {
        let _ = writeln!(out, "{line}");
    }
    let mut order: Vec<&Rule> = meta.rules.iter().collect();
    order.sort_by(|a, b| a.state.cmp(&b.state));
    let _ = writeln!(out, "{}", order.len());
    for rule in order {
        write_rule(&mut out, rule);
    }
    out
}

fn write_rule(out: &mut String, rule: &Rule) {
    let _ = writeln!(out, "i\n{}", rule.condition.kind().ordinal());
    let _ = writeln!(out, "i\n{}", rule.action.kind().ordinal());
    write_condition(out, &rule.condition);
    write_action(out, &rule.action);
    let _ = writeln!(out, "s\n{}", rule.state);
}

fn write_condition(out: &mut String, condition: &Condition) {
    match condition {
        Condition::Never
        | Condition::Always
        | Condition::NavrouteEmpty
        | Condition::Death
        | Condition::VendorOpen
        | Condition::VendorClosed
        | Condition::NeedToBuff
        | Condition::PortalspaceEnter
        | Condition::PortalspaceExit => int_scalar(out, 0),
        Condition::MainPackSlotsLE(v)
        | Condition::SecondsInStateGE(v)
        | Condition::SecondsInStatePersistGE(v)
        | Condition::BurdenPercentGE(v)
        | Condition::LandBlockE(v)
        | Condition::LandCellE(v) => int_scalar(out, *v),
        Condition::ChatMatch(text) => {
            let _ = writeln!(out, "s\n{text}");
        },
        Condition::ItemCountLE { item_name, count } | Condition::ItemCountGE { item_name, count } => {
            map_header(out, 2);
            str_entry(out, "n", item_name);
            int_entry(out, "c", *count);
        },
        Condition::MonsterCountWithinDistance {
            monster_name,
            count,
            range,
        } => {
            map_header(out, 3);
            str_entry(out, "n", monster_name);
            int_entry(out, "c", *count);
            f64_entry(out, "r", *range);
        },
        Condition::MonstersWithPriorityWithinDistance { priority, count, range } => {
            map_header(out, 3);
            int_entry(out, "p", *priority);
            int_entry(out, "c", *count);
            f64_entry(out, "r", *range);
        },
        Condition::NoMonstersWithinDistance { range } => {
            map_header(out, 1);
            f64_entry(out, "r", *range);
        },
        Condition::TimeLeftOnSpellGE { spell_id, seconds } => {
            map_header(out, 2);
            int_entry(out, "sid", *spell_id);
            int_entry(out, "sec", *seconds);
        },
        Condition::DistanceToAnyRoutePointGE { distance } => {
            map_header(out, 1);
            f64_entry(out, "dist", *distance);
        },
        Condition::Expression { expr } => {
            map_header(out, 1);
            str_entry(out, "e", expr);
        },
        Condition::ChatCapture { pattern, color_id_list } => {
            map_header(out, 2);
            str_entry(out, "p", pattern);
            str_entry(out, "c", color_id_list);
        },
        Condition::All(children) | Condition::Any(children) => {
            list_header(out, children.len());
            for child in children {
                let _ = writeln!(out, "i\n{}", child.kind().ordinal());
                write_condition(out, child);
            }
        },
        Condition::Not(child) => {
            list_header(out, usize::from(child.is_some()));
            if let Some(child) = child {
                let _ = writeln!(out, "i\n{}", child.kind().ordinal());
                write_condition(out, child);
            }
        },
    }
}

fn write_action(out: &mut String, action: &MetaAction) {
    match action {
        MetaAction::None | MetaAction::Return => int_scalar(out, 0),
        MetaAction::SetState(text) | MetaAction::Chat(text) => {
            let _ = writeln!(out, "s\n{text}");
        },
        MetaAction::DoAll(children) => {
            list_header(out, children.len());
            for child in children {
                let _ = writeln!(out, "i\n{}", child.kind().ordinal());
                write_action(out, child);
            }
        },
        MetaAction::EmbedNav { name, route } => {
            let mut block = String::new();
            write_nav(&mut block, route);
            let _ = writeln!(out, "ba\n{}", block.chars().count());
            let _ = writeln!(out, "{}", name.as_deref().unwrap_or(NAV_NAME_NONE));
            let _ = writeln!(out, "{}", route.nodes().map_or(0, |nodes| nodes.len()));
            out.push_str(&block);
        },
        MetaAction::CallState { state, return_to } => {
            map_header(out, 2);
            str_entry(out, "st", state);
            str_entry(out, "ret", return_to);
        },
        MetaAction::DoExpr { expr } | MetaAction::ChatExpr { expr } => {
            map_header(out, 1);
            str_entry(out, "e", expr);
        },
        MetaAction::SetWatchdog { state, range, seconds } => {
            map_header(out, 3);
            str_entry(out, "s", state);
            f64_entry(out, "r", *range);
            f64_entry(out, "t", *seconds);
        },
        MetaAction::ClearWatchdog | MetaAction::DestroyAllViews => map_header(out, 0),
        MetaAction::GetOpt { option, into_var } => {
            map_header(out, 2);
            str_entry(out, "o", option);
            str_entry(out, "v", into_var);
        },
        MetaAction::SetOpt { option, value } => {
            map_header(out, 2);
            str_entry(out, "o", option);
            str_entry(out, "v", value);
        },
        MetaAction::CreateView { view, xml } => {
            map_header(out, 2);
            str_entry(out, "n", view);
            blob_entry(out, "x", xml);
        },
        MetaAction::DestroyView { view } => {
            map_header(out, 1);
            str_entry(out, "n", view);
        },
    }
}

fn int_scalar(out: &mut String, value: i32) {
    let _ = writeln!(out, "i\n{value}");
}

fn map_header(out: &mut String, count: usize) {
    for line in TABLE_MAP_HEADER {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "{count}");
}

fn list_header(out: &mut String, count: usize) {
    for line in TABLE_LIST_HEADER {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "{count}");
}

fn int_entry(out: &mut String, key: &str, value: i32) {
    let _ = writeln!(out, "s\n{key}\ni\n{value}");
}

fn str_entry(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "s\n{key}\ns\n{value}");
}

fn f64_entry(out: &mut String, key: &str, value: f64) {
    let _ = writeln!(out, "s\n{key}\nd\n{value}");
}

fn blob_entry(out: &mut String, key: &str, value: &ViewString) {
    let _ = writeln!(out, "s\n{key}\nba\n{}", value.0.chars().count());
    let _ = writeln!(out, "{}", value.0);
}
