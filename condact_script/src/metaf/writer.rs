//! Metaf writer: decompiles a `Meta` back to the authoring DSL.
//!
//! Rules are grouped into `STATE:` blocks in first-appearance order and the
//! embedded routes are hoisted into `NAV:` blocks after them, named `nav1`,
//! `nav2`, … in encounter order. Every embed gets its own block even when
//! two routes are equal; the reader never has to chase shared references.

use std::fmt::Write as _;
use std::io;

use condact_data::{Condition, Meta, MetaAction, NavNode, NavRoute};

use crate::canonical::NAV_NAME_NONE;
use crate::error::ParseError;
use crate::metaf::lines::escape_braces;
use crate::metaf::tables::{
    FOLLOW_TAG, action_keyword_name, condition_keyword_name, nav_node_tag_name, nav_type_word_name,
};

/// Encode a meta document as Metaf onto a stream.
pub fn write_metaf_meta(mut w: impl io::Write, meta: &Meta) -> Result<(), ParseError> {
    w.write_all(write_metaf_string(meta).as_bytes())?;
    Ok(())
}

/// Encode a meta document as Metaf text.
pub fn write_metaf_string(meta: &Meta) -> String {
    let mut out = String::new();
    let mut navs: Vec<(String, NavRoute)> = Vec::new();
    for state in meta.state_names() {
        let _ = writeln!(out, "STATE: {{{}}}", escape_braces(state));
        for rule in meta.rules.iter().filter(|r| r.state == state) {
            out.push_str("\tIF: ");
            write_condition(&mut out, &rule.condition, 1, 0);
            out.push_str("\tDO: ");
            write_action(&mut out, &rule.action, 1, 0, &mut navs);
        }
    }
    for (name, route) in &navs {
        write_nav_block(&mut out, name, route);
    }
    out
}

/// Write a condition head at the current position, then its child lines.
/// Ends with the trailing newline of the last line written.
fn write_condition(out: &mut String, condition: &Condition, base: usize, depth: usize) {
    let keyword = condition_keyword_name(condition.kind());
    match condition {
        Condition::Never
        | Condition::Always
        | Condition::NavrouteEmpty
        | Condition::Death
        | Condition::VendorOpen
        | Condition::VendorClosed
        | Condition::NeedToBuff
        | Condition::PortalspaceEnter
        | Condition::PortalspaceExit => {
            let _ = writeln!(out, "{keyword}");
        },
        Condition::ChatMatch(pattern) => {
            let _ = writeln!(out, "{keyword} {{{}}}", escape_braces(pattern));
        },
        Condition::MainPackSlotsLE(v)
        | Condition::SecondsInStateGE(v)
        | Condition::SecondsInStatePersistGE(v)
        | Condition::BurdenPercentGE(v) => {
            let _ = writeln!(out, "{keyword} {v}");
        },
        Condition::LandBlockE(v) | Condition::LandCellE(v) => {
            let _ = writeln!(out, "{keyword} {:08X}", *v as u32);
        },
        Condition::ItemCountLE { item_name, count } | Condition::ItemCountGE { item_name, count } => {
            let _ = writeln!(out, "{keyword} {count} {{{}}}", escape_braces(item_name));
        },
        Condition::MonsterCountWithinDistance {
            monster_name,
            count,
            range,
        } => {
            let _ = writeln!(out, "{keyword} {count} {range} {{{}}}", escape_braces(monster_name));
        },
        Condition::MonstersWithPriorityWithinDistance { priority, count, range } => {
            let _ = writeln!(out, "{keyword} {count} {range} {priority}");
        },
        Condition::NoMonstersWithinDistance { range } => {
            let _ = writeln!(out, "{keyword} {range}");
        },
        Condition::DistanceToAnyRoutePointGE { distance } => {
            let _ = writeln!(out, "{keyword} {distance}");
        },
        Condition::TimeLeftOnSpellGE { spell_id, seconds } => {
            let _ = writeln!(out, "{keyword} {seconds} {spell_id}");
        },
        Condition::Expression { expr } => {
            let _ = writeln!(out, "{keyword} {{{}}}", escape_braces(expr));
        },
        Condition::ChatCapture { pattern, color_id_list } => {
            let _ = writeln!(
                out,
                "{keyword} {{{}}} {{{}}}",
                escape_braces(pattern),
                escape_braces(color_id_list)
            );
        },
        Condition::Not(None) => {
            let _ = writeln!(out, "{keyword}");
        },
        Condition::Not(Some(child)) => {
            let _ = write!(out, "{keyword} ");
            write_condition(out, child, base, depth);
        },
        Condition::All(children) | Condition::Any(children) => {
            let _ = writeln!(out, "{keyword}");
            for child in children {
                push_tabs(out, base + depth + 1);
                write_condition(out, child, base, depth + 1);
            }
        },
    }
}

fn write_action(out: &mut String, action: &MetaAction, base: usize, depth: usize, navs: &mut Vec<(String, NavRoute)>) {
    let keyword = action_keyword_name(action.kind());
    match action {
        MetaAction::None | MetaAction::Return | MetaAction::ClearWatchdog | MetaAction::DestroyAllViews => {
            let _ = writeln!(out, "{keyword}");
        },
        MetaAction::SetState(text) | MetaAction::Chat(text) => {
            let _ = writeln!(out, "{keyword} {{{}}}", escape_braces(text));
        },
        MetaAction::CallState { state, return_to } => {
            let _ = writeln!(
                out,
                "{keyword} {{{}}} {{{}}}",
                escape_braces(state),
                escape_braces(return_to)
            );
        },
        MetaAction::DoExpr { expr } | MetaAction::ChatExpr { expr } => {
            let _ = writeln!(out, "{keyword} {{{}}}", escape_braces(expr));
        },
        MetaAction::SetWatchdog { state, range, seconds } => {
            let _ = writeln!(out, "{keyword} {range} {seconds} {{{}}}", escape_braces(state));
        },
        MetaAction::GetOpt { option, into_var } => {
            let _ = writeln!(
                out,
                "{keyword} {{{}}} {{{}}}",
                escape_braces(option),
                escape_braces(into_var)
            );
        },
        MetaAction::SetOpt { option, value } => {
            let _ = writeln!(out, "{keyword} {{{}}} {{{}}}", escape_braces(option), escape_braces(value));
        },
        MetaAction::CreateView { view, xml } => {
            let _ = writeln!(out, "{keyword} {{{}}} {{{}}}", escape_braces(view), escape_braces(&xml.0));
        },
        MetaAction::DestroyView { view } => {
            let _ = writeln!(out, "{keyword} {{{}}}", escape_braces(view));
        },
        MetaAction::EmbedNav { name, route } => {
            let reference = format!("nav{}", navs.len() + 1);
            let display = name.as_deref().unwrap_or(NAV_NAME_NONE);
            let _ = writeln!(out, "{keyword} {reference} {{{}}}", escape_braces(display));
            navs.push((reference, route.clone()));
        },
        MetaAction::DoAll(children) => {
            let _ = writeln!(out, "{keyword}");
            for child in children {
                push_tabs(out, base + depth + 1);
                write_action(out, child, base, depth + 1, navs);
            }
        },
    }
}

fn write_nav_block(out: &mut String, name: &str, route: &NavRoute) {
    let _ = writeln!(out, "NAV: {name} {}", nav_type_word_name(route.kind()));
    match route {
        NavRoute::Follow(follow) => {
            let _ = writeln!(
                out,
                "{FOLLOW_TAG} {:08X} {{{}}}",
                follow.target_id as u32,
                escape_braces(&follow.target_name)
            );
        },
        _ => {
            for node in route.nodes().expect("non-follow routes carry nodes") {
                write_nav_node(out, node);
            }
        },
    }
}

fn write_nav_node(out: &mut String, node: &NavNode) {
    let tag = nav_node_tag_name(node.kind());
    let p = node.point();
    let _ = write!(out, "{tag} {} {} {}", p.x, p.y, p.z);
    match node {
        NavNode::Point(_) | NavNode::Checkpoint(_) => {},
        NavNode::PortalObs { portal_id, .. } => {
            let _ = write!(out, " {portal_id}");
        },
        NavNode::Recall { spell, .. } => {
            let _ = write!(out, " {{{}}}", escape_braces(spell.name()));
        },
        NavNode::Pause { seconds, .. } => {
            let _ = write!(out, " {seconds}");
        },
        NavNode::Chat { text, .. } => {
            let _ = write!(out, " {{{}}}", escape_braces(text));
        },
        NavNode::OpenVendor {
            vendor_id, vendor_name, ..
        } => {
            let _ = write!(out, " {vendor_id} {{{}}}", escape_braces(vendor_name));
        },
        NavNode::Portal {
            object_name,
            object_class,
            target,
            ..
        }
        | NavNode::NpcChat {
            object_name,
            object_class,
            target,
            ..
        } => {
            let _ = write!(
                out,
                " {} {} {} {} {{{}}}",
                target.x,
                target.y,
                target.z,
                object_class.ordinal(),
                escape_braces(object_name)
            );
        },
        NavNode::Jump {
            heading, shift, delay, ..
        } => {
            let _ = write!(out, " {heading} {} {delay}", if *shift { "True" } else { "False" });
        },
    }
    out.push('\n');
}

fn push_tabs(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push('\t');
    }
}
