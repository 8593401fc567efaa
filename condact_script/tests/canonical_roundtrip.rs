use condact_data::{
    Condition, Meta, MetaAction, NavFollow, NavNode, NavRoute, ObjectClass, Point, RecallSpell, Rule, ViewString,
};
use condact_script::{read_meta_str, write_meta_string};

fn rule(state: &str, condition: Condition, action: MetaAction) -> Rule {
    Rule {
        condition,
        action,
        state: state.to_string(),
    }
}

/// One meta that touches every condition and action variant.
fn kitchen_sink() -> Meta {
    let nav = NavRoute::Linear(vec![
        NavNode::Point(Point::new(0.25, -1.5, 0.0)),
        NavNode::PortalObs {
            point: Point::new(1.0, 2.0, 0.0),
            portal_id: 3545,
        },
        NavNode::Recall {
            point: Point::new(1.0, 2.0, 0.0),
            spell: RecallSpell::UlgrimsRecall,
        },
        NavNode::Pause {
            point: Point::new(1.0, 2.0, 0.0),
            seconds: 2.5,
        },
        NavNode::Chat {
            point: Point::new(1.0, 2.0, 0.0),
            text: "/say passing through".to_string(),
        },
        NavNode::OpenVendor {
            point: Point::new(1.0, 2.0, 0.0),
            vendor_id: 8921,
            vendor_name: "Brienne the Provisioner".to_string(),
        },
        NavNode::Portal {
            point: Point::new(1.0, 2.0, 0.0),
            object_name: "Gateway".to_string(),
            object_class: ObjectClass::Portal,
            target: Point::new(5.0, 6.0, 0.5),
        },
        NavNode::NpcChat {
            point: Point::new(1.0, 2.0, 0.0),
            object_name: "Town Crier".to_string(),
            object_class: ObjectClass::Npc,
            target: Point::new(5.0, 6.0, 0.5),
        },
        NavNode::Checkpoint(Point::new(2.0, 2.0, 0.0)),
        NavNode::Jump {
            point: Point::new(2.0, 3.0, 0.0),
            heading: 180.0,
            shift: true,
            delay: 0.5,
        },
    ]);
    Meta {
        rules: vec![
            rule("buff", Condition::NeedToBuff, MetaAction::CallState {
                state: "buffing".to_string(),
                return_to: "buff".to_string(),
            }),
            rule(
                "buff",
                Condition::All(vec![
                    Condition::ChatMatch("^You have been enlightened".to_string()),
                    Condition::Not(Some(Box::new(Condition::Death))),
                ]),
                MetaAction::DoAll(vec![
                    MetaAction::Chat("/say rebuffed".to_string()),
                    MetaAction::SetState("patrol".to_string()),
                ]),
            ),
            rule(
                "patrol",
                Condition::Any(vec![
                    Condition::MonsterCountWithinDistance {
                        monster_name: "Olthoi".to_string(),
                        count: 3,
                        range: 20.5,
                    },
                    Condition::MonstersWithPriorityWithinDistance {
                        priority: 2,
                        count: 1,
                        range: 10.0,
                    },
                    Condition::NoMonstersWithinDistance { range: 40.0 },
                ]),
                MetaAction::EmbedNav {
                    name: Some("loop".to_string()),
                    route: nav,
                },
            ),
            rule(
                "patrol",
                Condition::TimeLeftOnSpellGE {
                    spell_id: 2941,
                    seconds: 120,
                },
                MetaAction::SetWatchdog {
                    state: "panic".to_string(),
                    range: 5.5,
                    seconds: 30.0,
                },
            ),
            rule(
                "patrol",
                Condition::DistanceToAnyRoutePointGE { distance: 12.25 },
                MetaAction::EmbedNav {
                    name: None,
                    route: NavRoute::Follow(NavFollow {
                        target_name: "Fellow Leader".to_string(),
                        target_id: 0x7020_1234,
                    }),
                },
            ),
            rule(
                "panic",
                Condition::Expression {
                    expr: "getvar[hp] < 0.3".to_string(),
                },
                MetaAction::DoExpr {
                    expr: "setvar[fleeing, 1]".to_string(),
                },
            ),
            rule(
                "panic",
                Condition::ChatCapture {
                    pattern: "^(?<name>.*) says, \"help\"$".to_string(),
                    color_id_list: "2;3".to_string(),
                },
                MetaAction::ChatExpr {
                    expr: "chatcapturep[name]".to_string(),
                },
            ),
            rule(
                "views",
                Condition::ItemCountLE {
                    item_name: "Prismatic Taper".to_string(),
                    count: 50,
                },
                MetaAction::CreateView {
                    view: "restock".to_string(),
                    xml: ViewString("<view width=\"200\">\n<button name=\"go\"/>\n</view>".to_string()),
                },
            ),
            rule(
                "views",
                Condition::ItemCountGE {
                    item_name: "Mote".to_string(),
                    count: 12,
                },
                MetaAction::DestroyView {
                    view: "restock".to_string(),
                },
            ),
            rule("views", Condition::VendorOpen, MetaAction::DestroyAllViews),
            rule("odds", Condition::LandBlockE(0x0064_0128_u32 as i32), MetaAction::GetOpt {
                option: "EnableNav".to_string(),
                into_var: "oldnav".to_string(),
            }),
            rule("odds", Condition::LandCellE(0x0064_0128_u32 as i32), MetaAction::SetOpt {
                option: "EnableNav".to_string(),
                value: "false".to_string(),
            }),
            rule("odds", Condition::MainPackSlotsLE(4), MetaAction::ClearWatchdog),
            rule("odds", Condition::SecondsInStateGE(300), MetaAction::Return),
            rule("odds", Condition::SecondsInStatePersistGE(600), MetaAction::None),
            rule("odds", Condition::BurdenPercentGE(120), MetaAction::Chat("/say heavy".to_string())),
            rule("odds", Condition::Not(None), MetaAction::None),
            rule("odds", Condition::PortalspaceEnter, MetaAction::None),
            rule("odds", Condition::PortalspaceExit, MetaAction::None),
            rule("odds", Condition::VendorClosed, MetaAction::None),
            rule("odds", Condition::NavrouteEmpty, MetaAction::None),
            rule("odds", Condition::Never, MetaAction::None),
            rule("odds", Condition::Always, MetaAction::None),
        ],
    }
}

#[test]
fn whole_model_round_trips() {
    let meta = kitchen_sink();
    let text = write_meta_string(&meta);
    let back = read_meta_str(&text).expect("canonical reread");

    // The writer groups rules by state; regrouping the original the same way
    // must give the decoded document exactly.
    let mut expected = meta.clone();
    expected.rules.sort_by(|a, b| a.state.cmp(&b.state));
    assert_eq!(back, expected);

    // And a second pass is byte-stable.
    assert_eq!(write_meta_string(&back), text);
}

#[test]
fn writer_groups_rules_by_state() {
    let meta = Meta {
        rules: vec![
            rule("b", Condition::Never, MetaAction::None),
            rule("a", Condition::Always, MetaAction::None),
            rule("b", Condition::Death, MetaAction::None),
        ],
    };
    let back = read_meta_str(&write_meta_string(&meta)).expect("reread");
    let states: Vec<_> = back.rules.iter().map(|r| r.state.as_str()).collect();
    assert_eq!(states, vec!["a", "b", "b"]);
    // Ties keep file order: Never before Death.
    assert_eq!(back.rules[1].condition, Condition::Never);
    assert_eq!(back.rules[2].condition, Condition::Death);
}

#[test]
fn table_payload_keeps_fixed_key_order() {
    let meta = Meta {
        rules: vec![rule(
            "s",
            Condition::ItemCountGE {
                item_name: "Foo".to_string(),
                count: 3,
            },
            MetaAction::None,
        )],
    };
    let text = write_meta_string(&meta);
    // Fixed key order on the wire: "n" before "c".
    let n_at = text.find("s\nn\ns\nFoo\n").expect("name entry");
    let c_at = text.find("s\nc\ni\n3\n").expect("count entry");
    assert!(n_at < c_at);
    assert_eq!(read_meta_str(&text).expect("reread"), meta);
}

#[test]
fn table_keys_are_accepted_in_any_order() {
    let meta = Meta {
        rules: vec![rule(
            "s",
            Condition::ItemCountGE {
                item_name: "Foo".to_string(),
                count: 3,
            },
            MetaAction::None,
        )],
    };
    let text = write_meta_string(&meta);
    let swapped = text.replace("s\nn\ns\nFoo\ns\nc\ni\n3\n", "s\nc\ni\n3\ns\nn\ns\nFoo\n");
    assert_ne!(swapped, text);
    assert_eq!(read_meta_str(&swapped).expect("reread"), meta);
}

#[test]
fn view_xml_blob_survives_embedded_newlines() {
    let xml = "<view>\nline two\nline three</view>";
    let meta = Meta {
        rules: vec![rule("s", Condition::Never, MetaAction::CreateView {
            view: "vitals".to_string(),
            xml: ViewString(xml.to_string()),
        })],
    };
    let back = read_meta_str(&write_meta_string(&meta)).expect("reread");
    match &back.rules[0].action {
        MetaAction::CreateView { xml: got, .. } => assert_eq!(got.0, xml),
        other => panic!("wrong action decoded: {other:?}"),
    }
}

#[test]
fn embed_nav_char_count_frames_the_block() {
    let meta = Meta {
        rules: vec![rule("s", Condition::Never, MetaAction::EmbedNav {
            name: Some("short".to_string()),
            route: NavRoute::Once(vec![NavNode::Chat {
                point: Point::new(0.0, 0.0, 0.0),
                text: "/say mid-route line".to_string(),
            }]),
        })],
    };
    let text = write_meta_string(&meta);
    assert_eq!(read_meta_str(&text).expect("reread"), meta);
}
