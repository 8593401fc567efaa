use std::io;

use condact_data::{Condition, MetaAction, NavNode, Point};
use condact_script::{NoViews, ParseError, ViewLoader, read_metaf_str};

#[test]
fn states_collect_if_do_pairs_in_order() {
    let src = "STATE: {Default}\n\
               \tIF: Never\n\
               \tDO: None\n\
               \tIF: Always\n\
               \tDO: SetState {Hunt}\n\
               STATE: {Hunt}\n\
               \tIF: Death\n\
               \tDO: SetState {Default}\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    assert_eq!(meta.rules.len(), 3);
    assert_eq!(meta.state_names(), vec!["Default", "Hunt"]);
    assert_eq!(meta.rules[1].action, MetaAction::SetState("Hunt".to_string()));
}

#[test]
fn nesting_follows_tab_depth() {
    let src = "STATE: {s}\n\
               \tIF: All\n\
               \t\tChatMatch {go}\n\
               \t\tAny\n\
               \t\t\tSecsInStateGE 5\n\
               \t\t\tDeath\n\
               \t\tNot Expr {1}\n\
               \tDO: None\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    match &meta.rules[0].condition {
        Condition::All(kids) => {
            assert_eq!(kids.len(), 3);
            assert_eq!(kids[0], Condition::ChatMatch("go".to_string()));
            match &kids[1] {
                Condition::Any(inner) => {
                    assert_eq!(inner.len(), 2);
                    assert_eq!(inner[0], Condition::SecondsInStateGE(5));
                    assert_eq!(inner[1], Condition::Death);
                },
                other => panic!("expected Any, got {other:?}"),
            }
            assert_eq!(
                kids[2],
                Condition::Not(Some(Box::new(Condition::Expression {
                    expr: "1".to_string()
                })))
            );
        },
        other => panic!("expected All, got {other:?}"),
    }
}

#[test]
fn over_indented_child_is_fatal() {
    let src = "STATE: {s}\n\
               \tIF: All\n\
               \t\t\tNever\n\
               \tDO: None\n";
    match read_metaf_str(src, &NoViews) {
        Err(ParseError::Syntax { line, detail }) => {
            assert_eq!(line, 3);
            assert!(detail.contains("tabs"), "unexpected detail: {detail}");
        },
        other => panic!("expected indentation error, got {other:?}"),
    }
}

#[test]
fn shallower_line_ends_the_list() {
    // The DO: line sits at one tab, fewer than the two the children use, so
    // it terminates the All list cleanly.
    let src = "STATE: {s}\n\
               \tIF: All\n\
               \t\tNever\n\
               \tDO: None\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    assert_eq!(meta.rules[0].condition, Condition::All(vec![Condition::Never]));
}

#[test]
fn if_without_do_is_fatal() {
    let src = "STATE: {s}\n\tIF: Never\n\tIF: Always\n\tDO: None\n";
    assert!(matches!(
        read_metaf_str(src, &NoViews),
        Err(ParseError::Syntax { line: 2, .. })
    ));
}

#[test]
fn transform_is_applied_after_the_route_resolves() {
    // The transform references a route declared later in the file; the
    // post-parse pass must see the fully populated node list.
    let src = "STATE: {s}\n\
               \tIF: Always\n\
               \tDO: EmbedNav ref {name} {1 0 0 1 10 20 5}\n\
               NAV: ref once\n\
               pnt 0 0 0\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    match &meta.rules[0].action {
        MetaAction::EmbedNav { name, route } => {
            assert_eq!(name.as_deref(), Some("name"));
            assert_eq!(route.nodes().unwrap(), &[NavNode::Point(Point::new(10.0, 20.0, 5.0))]);
        },
        other => panic!("expected EmbedNav, got {other:?}"),
    }
}

#[test]
fn backward_reference_resolves_too() {
    let src = "NAV: ref linear\n\
               pnt 1 1 0\n\
               STATE: {s}\n\
               \tIF: Always\n\
               \tDO: EmbedNav ref {[None]}\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    match &meta.rules[0].action {
        MetaAction::EmbedNav { name, route } => {
            assert_eq!(name.as_deref(), None);
            assert_eq!(route.nodes().unwrap().len(), 1);
        },
        other => panic!("expected EmbedNav, got {other:?}"),
    }
}

#[test]
fn two_embeds_of_one_route_transform_independently() {
    let src = "STATE: {s}\n\
               \tIF: Always\n\
               \tDO: DoAll\n\
               \t\tEmbedNav ref {a}\n\
               \t\tEmbedNav ref {b} {1 0 0 1 100 0 0}\n\
               NAV: ref once\n\
               pnt 1 2 0\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    let MetaAction::DoAll(actions) = &meta.rules[0].action else {
        panic!("expected DoAll");
    };
    let points: Vec<Point> = actions
        .iter()
        .map(|a| match a {
            MetaAction::EmbedNav { route, .. } => route.nodes().unwrap()[0].point(),
            other => panic!("expected EmbedNav, got {other:?}"),
        })
        .collect();
    assert_eq!(points, vec![Point::new(1.0, 2.0, 0.0), Point::new(101.0, 2.0, 0.0)]);
}

#[test]
fn undeclared_nav_reference_is_fatal() {
    let src = "STATE: {s}\n\tIF: Always\n\tDO: EmbedNav ghost {[None]}\n";
    match read_metaf_str(src, &NoViews) {
        Err(ParseError::UnknownName { what, token, .. }) => {
            assert_eq!(what, "nav route");
            assert_eq!(token, "ghost");
        },
        other => panic!("expected unresolved reference, got {other:?}"),
    }
}

struct OneView;

impl ViewLoader for OneView {
    fn load_view(&self, name: &str) -> io::Result<String> {
        if name == "vitals.xml" {
            Ok("<view>\n<panel/>\n</view>".to_string())
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }
}

#[test]
fn create_view_file_indirection_goes_through_the_loader() {
    let src = "STATE: {s}\n\tIF: Always\n\tDO: CreateView {vitals} {:vitals.xml}\n";
    let meta = read_metaf_str(src, &OneView).expect("metaf parses");
    match &meta.rules[0].action {
        MetaAction::CreateView { view, xml } => {
            assert_eq!(view, "vitals");
            assert_eq!(xml.0, "<view>\n<panel/>\n</view>");
        },
        other => panic!("expected CreateView, got {other:?}"),
    }

    // Missing file surfaces as the loader's IO error.
    let src = "STATE: {s}\n\tIF: Always\n\tDO: CreateView {vitals} {:other.xml}\n";
    assert!(matches!(read_metaf_str(src, &OneView), Err(ParseError::Io(_))));
}

#[test]
fn inline_view_definitions_skip_the_loader() {
    let src = "STATE: {s}\n\tIF: Always\n\tDO: CreateView {vitals} {<view/>}\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    match &meta.rules[0].action {
        MetaAction::CreateView { xml, .. } => assert_eq!(xml.0, "<view/>"),
        other => panic!("expected CreateView, got {other:?}"),
    }
}

#[test]
fn bare_not_parses_as_empty_negation() {
    let src = "STATE: {s}\n\tIF: Not\n\tDO: None\n";
    let meta = read_metaf_str(src, &NoViews).expect("metaf parses");
    assert_eq!(meta.rules[0].condition, Condition::Not(None));
}

#[test]
fn unknown_keyword_names_the_token() {
    let src = "STATE: {s}\n\tIF: Sometime\n\tDO: None\n";
    match read_metaf_str(src, &NoViews) {
        Err(ParseError::UnknownName { what, token, .. }) => {
            assert_eq!(what, "condition keyword");
            assert_eq!(token, "Sometime");
        },
        other => panic!("expected unknown keyword, got {other:?}"),
    }
}
