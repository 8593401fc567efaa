//! Canonical codec for nav routes: the `uTank2 NAV 1.2` block.
//!
//! Used standalone for `.nav` documents and embedded inside `EmbedNav`
//! action payloads, which is why the writer targets a plain `String`: the
//! rule codec needs the rendered block in memory to frame it by character
//! count. Reader and writer are exact inverses of each other.

use std::fmt::Write as _;

use condact_data::{NavFollow, NavNode, NavNodeType, NavRoute, NavType, ObjectClass, Point, RecallSpell};
use log::debug;

use crate::error::ParseError;
use crate::scan::LineCursor;

/// First line of every nav block.
pub const NAV_MAGIC: &str = "uTank2 NAV 1.2";

/// Decode one nav block starting at the cursor's position.
pub fn read_nav(cur: &mut LineCursor) -> Result<NavRoute, ParseError> {
    cur.expect_line(NAV_MAGIC)?;
    let id = cur.int_line()?;
    let kind = NavType::from_ordinal(id).ok_or(ParseError::UnknownOrdinal {
        line: cur.last_line(),
        what: "nav type",
        id,
    })?;
    if kind == NavType::Follow {
        let target_name = cur.next_line()?.to_string();
        let target_id = cur.int_line()?;
        return Ok(NavRoute::Follow(NavFollow { target_name, target_id }));
    }
    let count = cur.count_line()?;
    let mut nodes = Vec::with_capacity(count);
    for _ in 0..count {
        nodes.push(read_node(cur)?);
    }
    debug!("nav block decoded: {:?} with {} nodes", kind, nodes.len());
    Ok(NavRoute::empty(kind).with_nodes(nodes))
}

/// Decode a standalone nav document.
pub fn read_nav_text(src: &str) -> Result<NavRoute, ParseError> {
    let mut cur = LineCursor::new(src);
    let route = read_nav(&mut cur)?;
    cur.expect_end()?;
    Ok(route)
}

fn read_node(cur: &mut LineCursor) -> Result<NavNode, ParseError> {
    let id = cur.int_line()?;
    let kind = NavNodeType::from_ordinal(id).ok_or(ParseError::UnknownOrdinal {
        line: cur.last_line(),
        what: "nav node type",
        id,
    })?;
    let point = Point::new(cur.f64_line()?, cur.f64_line()?, cur.f64_line()?);
    cur.expect_line("0")?;
    Ok(match kind {
        NavNodeType::Point => NavNode::Point(point),
        NavNodeType::Checkpoint => NavNode::Checkpoint(point),
        NavNodeType::PortalObs => NavNode::PortalObs {
            point,
            portal_id: cur.int_line()?,
        },
        NavNodeType::Recall => {
            let id = cur.int_line()?;
            let spell = RecallSpell::from_spell_id(id).ok_or(ParseError::UnknownOrdinal {
                line: cur.last_line(),
                what: "recall spell id",
                id,
            })?;
            NavNode::Recall { point, spell }
        },
        NavNodeType::Pause => NavNode::Pause {
            point,
            seconds: cur.f64_line()?,
        },
        NavNodeType::Chat => NavNode::Chat {
            point,
            text: cur.next_line()?.to_string(),
        },
        NavNodeType::OpenVendor => NavNode::OpenVendor {
            point,
            vendor_id: cur.int_line()?,
            vendor_name: cur.next_line()?.to_string(),
        },
        NavNodeType::Portal => {
            let (object_name, object_class, target) = read_object_target(cur, None)?;
            NavNode::Portal {
                point,
                object_name,
                object_class,
                target,
            }
        },
        NavNodeType::NpcChat => {
            let (object_name, object_class, target) = read_object_target(cur, Some(ObjectClass::Npc))?;
            NavNode::NpcChat {
                point,
                object_name,
                object_class,
                target,
            }
        },
        NavNodeType::Jump => NavNode::Jump {
            point,
            heading: cur.f64_line()?,
            shift: cur.bool_line()?,
            delay: cur.f64_line()?,
        },
    })
}

/// Shared tail of `Portal`/`NpcChat` nodes: object name, object class, the
/// fixed `True` line, then the target point. `required` pins the class for
/// NPC chat nodes.
fn read_object_target(
    cur: &mut LineCursor,
    required: Option<ObjectClass>,
) -> Result<(String, ObjectClass, Point), ParseError> {
    let object_name = cur.next_line()?.to_string();
    let id = cur.int_line()?;
    let object_class = ObjectClass::from_ordinal(id).ok_or(ParseError::UnknownOrdinal {
        line: cur.last_line(),
        what: "object class",
        id,
    })?;
    if let Some(want) = required {
        if object_class != want {
            return Err(ParseError::Literal {
                line: cur.last_line(),
                expected: want.ordinal().to_string(),
                actual: id.to_string(),
            });
        }
    }
    cur.expect_line("True")?;
    let target = Point::new(cur.f64_line()?, cur.f64_line()?, cur.f64_line()?);
    Ok((object_name, object_class, target))
}

/// Render one nav block onto `out`, trailing newline included.
pub fn write_nav(out: &mut String, route: &NavRoute) {
    let _ = writeln!(out, "{NAV_MAGIC}");
    let _ = writeln!(out, "{}", route.kind().ordinal());
    match route {
        NavRoute::Follow(follow) => {
            let _ = writeln!(out, "{}", follow.target_name);
            let _ = writeln!(out, "{}", follow.target_id);
        },
        _ => {
            let nodes = route.nodes().expect("non-follow routes carry nodes");
            let _ = writeln!(out, "{}", nodes.len());
            for node in nodes {
                write_node(out, node);
            }
        },
    }
}

/// Render a standalone nav document.
pub fn write_nav_text(route: &NavRoute) -> String {
    let mut out = String::new();
    write_nav(&mut out, route);
    out
}

fn write_node(out: &mut String, node: &NavNode) {
    let _ = writeln!(out, "{}", node.kind().ordinal());
    let p = node.point();
    let _ = writeln!(out, "{}\n{}\n{}\n0", p.x, p.y, p.z);
    match node {
        NavNode::Point(_) | NavNode::Checkpoint(_) => {},
        NavNode::PortalObs { portal_id, .. } => {
            let _ = writeln!(out, "{portal_id}");
        },
        NavNode::Recall { spell, .. } => {
            let _ = writeln!(out, "{}", spell.spell_id());
        },
        NavNode::Pause { seconds, .. } => {
            let _ = writeln!(out, "{seconds}");
        },
        NavNode::Chat { text, .. } => {
            let _ = writeln!(out, "{text}");
        },
        NavNode::OpenVendor {
            vendor_id, vendor_name, ..
        } => {
            let _ = writeln!(out, "{vendor_id}\n{vendor_name}");
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
            let _ = writeln!(out, "{object_name}\n{}\nTrue", object_class.ordinal());
            let _ = writeln!(out, "{}\n{}\n{}", target.x, target.y, target.z);
        },
        NavNode::Jump {
            heading, shift, delay, ..
        } => {
            let _ = writeln!(out, "{heading}\n{}\n{delay}", if *shift { "True" } else { "False" });
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_route_round_trips() {
        let route = NavRoute::Follow(NavFollow {
            target_name: "Tusker Guard".into(),
            target_id: 0x0102_0304,
        });
        let text = write_nav_text(&route);
        assert_eq!(read_nav_text(&text).unwrap(), route);
    }

    #[test]
    fn npc_chat_requires_npc_class() {
        let route = NavRoute::Once(vec![NavNode::NpcChat {
            point: Point::new(1.0, 2.0, 0.0),
            object_name: "Agent of the Arcanum".into(),
            object_class: ObjectClass::Npc,
            target: Point::new(1.5, 2.5, 0.0),
        }]);
        let mut text = write_nav_text(&route);
        // corrupt the class line: 37 -> 14
        text = text.replace("\n37\nTrue", "\n14\nTrue");
        match read_nav_text(&text) {
            Err(ParseError::Literal { expected, actual, .. }) => {
                assert_eq!(expected, "37");
                assert_eq!(actual, "14");
            },
            other => panic!("expected class mismatch, got {other:?}"),
        }
    }
}
