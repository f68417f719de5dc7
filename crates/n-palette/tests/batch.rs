//! End-to-end batch behavior against the builtin pattern.

use n_color::OutputFormat;
use n_palette::{
    BatchOptions, BatchPair, BuiltinPalettes, Config, Error, PatternError, SmoothedPattern, StopPosition, generate_batch,
    load_pattern,
};

fn pattern() -> SmoothedPattern {
    load_pattern(&BuiltinPalettes::all(), &Config::default()).unwrap()
}

fn pair(color: &str, stop: u16) -> BatchPair {
    BatchPair::new(color, stop)
}

fn options(group: &str) -> BatchOptions {
    BatchOptions {
        group_name: group.to_owned(),
        ..BatchOptions::default()
    }
}

#[test]
fn one_bad_pair_makes_a_partial_batch() {
    let pairs = [pair("#2D72D2", 500), pair("not-a-color", 600), pair("#5C7CFA", 400)];
    let out = generate_batch(&pairs, OutputFormat::Hex, &pattern(), &options("brand"));

    assert!(out.partial);
    assert_eq!(out.palettes.len(), 2);
    let inputs: Vec<_> = out.palettes.iter().map(|p| p.input_color.as_str()).collect();
    assert_eq!(inputs, ["#2D72D2", "#5C7CFA"]);
    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].index, 1);
}

#[test]
fn one_bad_stop_makes_a_partial_batch() {
    let pairs = [pair("#2D72D2", 500), pair("red", 550), pair("#5C7CFA", 400)];
    let out = generate_batch(&pairs, OutputFormat::Hex, &pattern(), &options("brand"));

    assert!(out.partial);
    let names: Vec<_> = out.palettes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["brand-1", "brand-3"]);
    assert_eq!(out.palettes[1].anchor_stop, StopPosition::new(400).unwrap());
    assert_eq!(out.failures.len(), 1);
    assert!(matches!(
        out.failures[0].reason,
        Error::Pattern(PatternError::InvalidStop { position: 550 })
    ));
}

#[test]
fn all_valid_pairs_succeed() {
    let pairs = [pair("#2D72D2", 500), pair("oklch(0.7 0.12 150)", 300), pair("rgb(200, 60, 40)", 700)];
    let out = generate_batch(&pairs, OutputFormat::Oklch, &pattern(), &options("set"));

    assert!(!out.partial);
    assert_eq!(out.palettes.len(), 3);
    for palette in &out.palettes {
        assert!(palette.stops.iter().all(|s| s.value.starts_with("oklch(")), "{}", palette.name);
    }
    let names: Vec<_> = out.palettes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["set-1", "set-2", "set-3"]);
}

#[test]
fn single_pair_uses_the_group_name() {
    let out = generate_batch(&[pair("#2D72D2", 500)], OutputFormat::Hex, &pattern(), &options("single"));
    assert_eq!(out.palettes.len(), 1);
    assert!(out.palettes[0].name.contains("single"));
}

#[test]
fn builtin_pattern_gets_darker_toward_1000() {
    let out = generate_batch(&[pair("#2D72D2", 500)], OutputFormat::Hex, &pattern(), &options("ramp"));
    let stops = &out.palettes[0].stops;
    for w in stops.windows(2) {
        assert!(w[0].color.l >= w[1].color.l, "{} brighter than {}", w[1].value, w[0].value);
    }
}
