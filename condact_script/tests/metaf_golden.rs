use condact_script::{NoViews, read_meta_str, read_metaf_str, write_meta_string, write_metaf_string};

/// Compiling the patrol fixture must reproduce the canonical fixture byte
/// for byte.
#[test]
fn patrol_compiles_to_golden_canonical() {
    let src = include_str!("fixtures/patrol.af");
    let meta = read_metaf_str(src, &NoViews).expect("fixture parses");
    assert_eq!(meta.rules.len(), 3);
    let actual = write_meta_string(&meta);
    let expected = include_str!("fixtures/patrol.met");
    assert_eq!(actual, expected);
}

/// The golden canonical fixture reads back and re-encodes to itself.
#[test]
fn golden_canonical_is_a_fixed_point() {
    let expected = include_str!("fixtures/patrol.met");
    let meta = read_meta_str(expected).expect("fixture parses");
    assert_eq!(write_meta_string(&meta), expected);
}

/// Decompiling to Metaf and re-reading gives the same model back.
#[test]
fn metaf_writer_round_trips_the_model() {
    let src = include_str!("fixtures/patrol.af");
    let meta = read_metaf_str(src, &NoViews).expect("fixture parses");
    let rendered = write_metaf_string(&meta);
    let back = read_metaf_str(&rendered, &NoViews).expect("rendered metaf parses");
    assert_eq!(back, meta);
}
