//! Metaf nav grammar: the waypoint lines under a `NAV:` declaration.

use condact_data::{NavFollow, NavNode, NavNodeType, ObjectClass, Point, RecallSpell};

use crate::error::ParseError;
use crate::metaf::lines::{Fields, MetafLine};
use crate::metaf::tables::{FOLLOW_TAG, nav_node_tag};

/// Does this line continue the waypoint list of the open `NAV:` block?
pub(super) fn is_node_line(text: &str) -> bool {
    let tag = text.split_whitespace().next().unwrap_or("");
    nav_node_tag(tag).is_some()
}

pub(super) fn is_follow_line(text: &str) -> bool {
    text.split_whitespace().next() == Some(FOLLOW_TAG)
}

/// Decode one waypoint line.
pub(super) fn parse_node(line: MetafLine<'_>) -> Result<NavNode, ParseError> {
    let mut f = Fields::new(line.no, line.text);
    let tag = f.word("a nav node tag")?;
    let kind = nav_node_tag(tag).ok_or_else(|| ParseError::UnknownName {
        line: line.no,
        what: "nav node tag",
        token: tag.to_string(),
    })?;
    let point = Point::new(f.number()?, f.number()?, f.number()?);
    let node = match kind {
        NavNodeType::Point => NavNode::Point(point),
        NavNodeType::Checkpoint => NavNode::Checkpoint(point),
        NavNodeType::PortalObs => NavNode::PortalObs {
            point,
            portal_id: f.int()?,
        },
        NavNodeType::Recall => {
            let name = f.braced()?;
            let spell = RecallSpell::from_name(&name).ok_or_else(|| ParseError::UnknownName {
                line: line.no,
                what: "recall spell",
                token: name.clone(),
            })?;
            NavNode::Recall { point, spell }
        },
        NavNodeType::Pause => NavNode::Pause {
            point,
            seconds: f.number()?,
        },
        NavNodeType::Chat => NavNode::Chat {
            point,
            text: f.braced()?,
        },
        NavNodeType::OpenVendor => NavNode::OpenVendor {
            point,
            vendor_id: f.int()?,
            vendor_name: f.braced()?,
        },
        NavNodeType::Portal | NavNodeType::NpcChat => {
            let target = Point::new(f.number()?, f.number()?, f.number()?);
            let id = f.int()?;
            let object_class = ObjectClass::from_ordinal(id).ok_or(ParseError::UnknownOrdinal {
                line: line.no,
                what: "object class",
                id,
            })?;
            if kind == NavNodeType::NpcChat && object_class != ObjectClass::Npc {
                return Err(ParseError::Literal {
                    line: line.no,
                    expected: ObjectClass::Npc.ordinal().to_string(),
                    actual: id.to_string(),
                });
            }
            let object_name = f.braced()?;
            if kind == NavNodeType::Portal {
                NavNode::Portal {
                    point,
                    object_name,
                    object_class,
                    target,
                }
            } else {
                NavNode::NpcChat {
                    point,
                    object_name,
                    object_class,
                    target,
                }
            }
        },
        NavNodeType::Jump => NavNode::Jump {
            point,
            heading: f.number()?,
            shift: f.boolean()?,
            delay: f.number()?,
        },
    };
    f.finish()?;
    Ok(node)
}

/// Decode the `flw <hex-id> {name}` line of a follow route.
pub(super) fn parse_follow(line: MetafLine<'_>) -> Result<NavFollow, ParseError> {
    let mut f = Fields::new(line.no, line.text);
    let tag = f.word("`flw`")?;
    if tag != FOLLOW_TAG {
        return Err(ParseError::Literal {
            line: line.no,
            expected: FOLLOW_TAG.to_string(),
            actual: tag.to_string(),
        });
    }
    let target_id = f.hex()?;
    let target_name = f.braced()?;
    f.finish()?;
    Ok(NavFollow { target_name, target_id })
}
