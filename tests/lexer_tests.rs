// tests/lexer_tests.rs

mod common;

use std::fs;

use common::{parse_err, parse_ok};
use parsnip::combinators::{char, many};
use parsnip::errors::ConfigError;
use parsnip::token::{identifier, number, reserved, symbol, Number};
use parsnip::{lexeme, whitespace, CharClass, FailureKind, LanguageDefinition};

fn plain() -> std::sync::Arc<LanguageDefinition> {
    LanguageDefinition::default().shared()
}

// ---
// Whitespace and lexemes
// ---

#[test]
fn test_lexeme_skips_trailing_spaces() {
    let (value, rest) = parse_ok("a   ", &lexeme(&plain(), char('a')));
    assert_eq!(value, 'a');
    assert_eq!(rest, "");
}

#[test]
fn test_whitespace_without_comment_markers_leaves_comments() {
    let (_, rest) = parse_ok("  // not a comment", &whitespace(&plain()));
    assert_eq!(rest, "// not a comment");
}

#[test]
fn test_whitespace_handles_long_runs_of_comments() {
    let def = LanguageDefinition::java_style().shared();
    let source = format!("{}x", "/* c */ // line\n".repeat(50_000));
    let (_, rest) = parse_ok(&source, &whitespace(&def));
    assert_eq!(rest, "x");
}

#[test]
fn test_custom_whitespace_set() {
    let def = LanguageDefinition::default().with_whitespace(" _").shared();
    let items = many(lexeme(&def, char('x')));
    let (value, rest) = parse_ok("x__x _x!", &items);
    assert_eq!(value.len(), 3);
    assert_eq!(rest, "!");
}

#[test]
fn test_line_comment_then_block_comment() {
    let def = LanguageDefinition::java_style().shared();
    let source = "a // first\n/* second */\n// third\nb";
    let (_, rest) = parse_ok(source, &lexeme(&def, char('a')));
    assert_eq!(rest, "b");
}

#[test]
fn test_unterminated_comment_is_reported_at_its_start() {
    let def = LanguageDefinition::java_style().shared();
    let failure = parse_err("a /* open", &lexeme(&def, char('a')));
    assert_eq!(failure.offset, 2);
    assert!(matches!(failure.kind, FailureKind::UnterminatedComment { .. }));
}

// ---
// Token helpers under different definitions
// ---

#[test]
fn test_identifier_excludes_reserved_words() {
    let def = LanguageDefinition::default()
        .with_reserved_names(["if", "then"])
        .shared();
    let failure = parse_err("if ", &identifier(&def));
    assert_eq!(failure.kind, FailureKind::Reserved { word: "if".into() });
    let (name, _) = parse_ok("iffy ", &identifier(&def));
    assert_eq!(name, "iffy");
}

#[test]
fn test_case_insensitive_reserved_words() {
    let def = LanguageDefinition::default()
        .with_reserved_names(["begin"])
        .with_case_sensitive(false)
        .shared();
    assert!(matches!(
        parse_err("BEGIN", &identifier(&def)).kind,
        FailureKind::Reserved { .. }
    ));
    let (word, rest) = parse_ok("Begin end", &reserved(&def, "begin"));
    assert_eq!(word, "begin");
    assert_eq!(rest, "end");
}

#[test]
fn test_number_stops_before_operator() {
    let (value, rest) = parse_ok("10+20", &number(&plain()));
    assert_eq!(value, Number::Integer(10));
    assert_eq!(rest, "+20");
}

#[test]
fn test_custom_identifier_classes() {
    let def = LanguageDefinition::default()
        .with_identifier(CharClass::chars("$"), CharClass::custom(|c| c.is_ascii_digit()))
        .shared();
    let (name, rest) = parse_ok("$12 x", &identifier(&def));
    assert_eq!(name, "$12");
    assert_eq!(rest, "x");
    assert!(parse_err("a1", &identifier(&def)).offset == 0);
}

#[test]
fn test_symbol_uses_the_definition_operator_set() {
    let def = LanguageDefinition::default().with_operator_chars("=").shared();
    parse_ok("<<", &symbol(&def, "<"));
    parse_err("==", &symbol(&def, "="));
}

// ---
// Loading definitions
// ---

#[test]
fn test_load_yaml_definition_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.yaml");
    fs::write(
        &path,
        "name: mini\ncomment_line: \"#\"\nreserved_names: [let]\ncase_sensitive: false\n",
    )
    .unwrap();

    let def = LanguageDefinition::load(&path).unwrap().shared();
    assert_eq!(def.name, "mini");
    let (_, rest) = parse_ok("x # comment\ny", &lexeme(&def, char('x')));
    assert_eq!(rest, "y");
    assert!(parse_err("LET", &identifier(&def)).offset == 0);
}

#[test]
fn test_load_json_definition_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.json");
    fs::write(&path, r#"{ "comment_start": "(*", "comment_end": "*)" }"#).unwrap();
    let def = LanguageDefinition::load(&path).unwrap();
    assert_eq!(def.comment_start, "(*");
    assert!(!def.nested_comments);
}

#[test]
fn test_load_rejects_unknown_extension_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.toml");
    fs::write(&path, "name = 'mini'").unwrap();
    assert!(matches!(
        LanguageDefinition::load(&path),
        Err(ConfigError::UnknownFormat(ext)) if ext == "toml"
    ));
    assert!(matches!(
        LanguageDefinition::load(dir.path().join("absent.yaml")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_presets_round_trip_through_yaml() {
    let yaml = serde_yaml::to_string(&LanguageDefinition::haskell_style()).unwrap();
    let loaded = LanguageDefinition::from_yaml_str(&yaml).unwrap();
    assert_eq!(loaded.name, "haskell");
    assert!(loaded.is_reserved("where"));
    assert!(loaded.is_reserved_op("->"));
}
