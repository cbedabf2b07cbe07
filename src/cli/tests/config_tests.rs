use super::config::{load_options, load_options_over, parse_options, parse_options_over};
use std::io::Write;
use veil_common::ObfuscatorOptions;

#[test]
fn empty_object_is_default_preset() {
    let options = parse_options("{}").expect("valid options");
    assert_eq!(options, ObfuscatorOptions::default());
}

#[test]
fn parses_jsonc_with_comments_and_trailing_commas() {
    let source = r#"
        {
            // names that must survive
            "reservedNames": ["^_", "http://example",],
            /* route every literal */
            "unicodeArrayThreshold": 1,
        }
    "#;

    let options = parse_options(source).expect("comments and trailing commas are accepted");

    assert_eq!(options.reserved_names, vec!["^_", "http://example"]);
    assert_eq!(options.unicode_array_threshold, 1.0);
    assert!(options.unicode_array);
}

#[test]
fn string_contents_are_not_stripped() {
    let options = parse_options(r#"{ "reservedNames": ["a//b", "c/*d*/", "e,]"] }"#)
        .expect("valid options");

    assert_eq!(options.reserved_names, vec!["a//b", "c/*d*/", "e,]"]);
}

#[test]
fn overrides_apply_on_top_of_base_preset() {
    let options = parse_options_over(
        r#"{ "unicodeArray": true }"#,
        ObfuscatorOptions::no_custom_nodes(),
    )
    .expect("valid options");

    assert!(options.unicode_array);
    assert!(!options.disable_console_output);
    assert!(!options.wrap_unicode_array_calls);
}

#[test]
fn rejects_non_object_and_bad_types() {
    assert!(parse_options("[]").is_err());
    assert!(parse_options(r#"{ "unicodeArray": "sometimes" }"#).is_err());
    assert!(parse_options("{ ").is_err());
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "debugProtection": true, "debugProtectionInterval": true }}"#)
        .expect("write options");

    let options = load_options(file.path()).expect("options load");

    assert!(options.debug_protection);
    assert!(options.debug_protection_interval);
    assert!(options.unicode_array);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");

    let error = load_options_over(&path, ObfuscatorOptions::default()).expect_err("file is missing");

    assert!(format!("{error:#}").contains("absent.json"));
}
