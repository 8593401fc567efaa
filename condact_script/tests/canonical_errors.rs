use condact_data::Meta;
use condact_script::{ParseError, read_meta_str, write_meta_string};

/// Join protocol lines the way the writer does, trailing newline included.
fn doc(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

const HEADER: [&str; 13] = [
    "1", "CondAct", "5", "CType", "AType", "CData", "AData", "State", "n", "n", "n", "n", "n",
];

fn doc_with_rule(rule_lines: &[&str]) -> String {
    let mut lines: Vec<&str> = HEADER.to_vec();
    lines.push("1");
    lines.extend_from_slice(rule_lines);
    doc(&lines)
}

#[test]
fn every_header_line_is_checked_by_number() {
    let good = write_meta_string(&Meta::new());
    for i in 0..13 {
        let mut lines: Vec<&str> = good.lines().collect();
        lines[i] = "garbled";
        match read_meta_str(&doc(&lines)) {
            Err(ParseError::Literal { line, expected, actual }) => {
                assert_eq!(line, i + 1);
                assert_eq!(expected, HEADER[i]);
                assert_eq!(actual, "garbled");
            },
            other => panic!("header line {} should fail as a literal mismatch, got {other:?}", i + 1),
        }
    }
}

#[test]
fn wrong_scalar_tag_names_both_tags() {
    // SecondsInStateGE carries an `i` scalar; hand it a `j` tag instead.
    let text = doc_with_rule(&["i", "6", "i", "0", "j", "0", "i", "0", "s", "idle"]);
    match read_meta_str(&text) {
        Err(ParseError::Literal { expected, actual, .. }) => {
            assert_eq!(expected, "i");
            assert_eq!(actual, "j");
        },
        other => panic!("expected tag mismatch, got {other:?}"),
    }
}

#[test]
fn not_with_two_children_is_rejected() {
    let text = doc_with_rule(&[
        "i", "21", "i", "0", // Not condition, None action
        "TABLE", "2", "K", "V", "n", "n", "2", // two children
        "i", "0", "i", "0", // Never
        "i", "1", "i", "0", // Always
        "i", "0", // action payload
        "s", "idle",
    ]);
    match read_meta_str(&text) {
        Err(ParseError::Cardinality { detail, .. }) => {
            assert!(detail.contains("at most one"), "unexpected detail: {detail}");
        },
        other => panic!("expected cardinality violation, got {other:?}"),
    }
}

#[test]
fn not_with_zero_and_one_children_decode() {
    let empty = doc_with_rule(&[
        "i", "21", "i", "0", "TABLE", "2", "K", "V", "n", "n", "0", "i", "0", "s", "idle",
    ]);
    let meta = read_meta_str(&empty).expect("empty Not decodes");
    assert_eq!(meta.rules[0].condition, condact_data::Condition::Not(None));

    let one = doc_with_rule(&[
        "i", "21", "i", "0", "TABLE", "2", "K", "V", "n", "n", "1", "i", "8", "i", "0", "i", "0", "s", "idle",
    ]);
    let meta = read_meta_str(&one).expect("single-child Not decodes");
    assert_eq!(
        meta.rules[0].condition,
        condact_data::Condition::Not(Some(Box::new(condact_data::Condition::Death)))
    );
}

#[test]
fn unknown_condition_ordinal_is_fatal() {
    let text = doc_with_rule(&["i", "99", "i", "0", "i", "0", "i", "0", "s", "idle"]);
    match read_meta_str(&text) {
        Err(ParseError::UnknownOrdinal { what, id, .. }) => {
            assert_eq!(what, "condition type");
            assert_eq!(id, 99);
        },
        other => panic!("expected unknown ordinal, got {other:?}"),
    }
}

#[test]
fn unparsable_count_is_a_value_error() {
    let mut lines: Vec<&str> = HEADER.to_vec();
    lines.push("many");
    match read_meta_str(&doc(&lines)) {
        Err(ParseError::Value { line, actual, .. }) => {
            assert_eq!(line, 14);
            assert_eq!(actual, "many");
        },
        other => panic!("expected value error, got {other:?}"),
    }
}

#[test]
fn trailing_garbage_is_rejected() {
    let mut text = write_meta_string(&Meta::new());
    text.push_str("leftover\n");
    assert!(matches!(read_meta_str(&text), Err(ParseError::Syntax { .. })));
}

#[test]
fn embedded_nav_errors_cite_outer_line_numbers() {
    // EmbedNav whose counted block corrupts the nav magic.
    let text = doc_with_rule(&[
        "i", "0", "i", "4", // Never condition, EmbedNav action
        "i", "0", // condition payload
        "ba", "19", "[None]", "0", "uTank2 NAV 9.9", "4", "0", // 19 chars of bad block
        "s", "idle",
    ]);
    match read_meta_str(&text) {
        Err(ParseError::Literal { line, expected, .. }) => {
            assert_eq!(expected, "uTank2 NAV 1.2");
            // The bad magic sits on line 25 of the document.
            assert_eq!(line, 25);
        },
        other => panic!("expected magic mismatch, got {other:?}"),
    }
}
