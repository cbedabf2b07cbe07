use super::*;
use crate::error::ObfuscationError;
use crate::registry::{CallsWrapper, StringTable, SupportArtifact};

fn options(unicode_array: bool, threshold: f64, encode: bool, wrap: bool) -> ObfuscatorOptions {
    ObfuscatorOptions {
        unicode_array,
        unicode_array_threshold: threshold,
        encode_unicode_literals: encode,
        wrap_unicode_array_calls: wrap,
        ..ObfuscatorOptions::no_custom_nodes()
    }
}

fn seeded_registry(with_wrapper: bool) -> ArtifactRegistry {
    let mut registry = ArtifactRegistry::new();
    registry.insert(
        ArtifactKey::UnicodeArray,
        SupportArtifact::StringTable(StringTable::new("_0xtable")),
    );
    if with_wrapper {
        registry.insert(
            ArtifactKey::UnicodeArrayCallsWrapper,
            SupportArtifact::CallsWrapper(CallsWrapper::new("_0xwrap", "_0xtable", false)),
        );
    }
    registry
}

// =============================================================================
// Booleans and numbers
// =============================================================================

#[test]
fn test_boolean_tokens() {
    assert_eq!(encode_boolean(true), "!![]");
    assert_eq!(encode_boolean(false), "![]");
}

#[test]
fn test_whole_numbers_become_hex() {
    for k in [0u64, 1, 9, 10, 15, 16, 255, 4096, 65_535, 1 << 40] {
        let encoded = encode_number(k as f64);
        let digits = encoded.strip_prefix("0x").expect("hex prefix");
        assert_eq!(u64::from_str_radix(digits, 16), Ok(k), "{encoded}");
    }
    assert_eq!(encode_number(255.0), "0xff");
}

#[test]
fn test_non_whole_numbers_pass_through() {
    assert_eq!(encode_number(1.5), "1.5");
    assert_eq!(encode_number(0.1), "0.1");
}

#[test]
fn test_non_finite_numbers_use_javascript_spelling() {
    assert_eq!(encode_number(f64::NAN), "NaN");
    assert_eq!(encode_number(f64::INFINITY), "Infinity");
    assert_eq!(encode_number(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_u64_boundary_keeps_value() {
    let two_pow_64 = 18_446_744_073_709_551_616.0_f64;
    assert_eq!(encode_number(two_pow_64), "18446744073709551616");
    assert_eq!(encode_number(-two_pow_64), "-18446744073709551616");

    // Largest f64 below 2^64 still fits and is encoded exactly.
    let below = 18_446_744_073_709_549_568.0_f64;
    assert_eq!(encode_number(below), "0xfffffffffffff800");
}

#[test]
fn test_negative_whole_numbers() {
    assert_eq!(encode_number(-5.0), "-0x5");
    assert_eq!(encode_number(-0.0), "0x0");
}

// =============================================================================
// Escaping and base64
// =============================================================================

#[test]
fn test_string_to_unicode_ascii() {
    assert_eq!(string_to_unicode("hi"), "'\\x68\\x69'");
    assert_eq!(string_to_unicode(""), "''");
}

#[test]
fn test_string_to_unicode_non_ascii() {
    assert_eq!(string_to_unicode("é"), "'\\u00e9'");
    // Astral characters are written as a surrogate pair.
    assert_eq!(string_to_unicode("😀"), "'\\ud83d\\ude00'");
}

#[test]
fn test_escape_round_trip() {
    for value in ["", "hello world", "quote ' and \\", "line\nbreak", "Grüße, 世界 😀"] {
        let escaped = string_to_unicode(value);
        assert_eq!(unicode_to_string(&escaped).as_deref(), Some(value));
    }
}

#[test]
fn test_unicode_to_string_rejects_foreign_text() {
    assert_eq!(unicode_to_string("hi"), None);
    assert_eq!(unicode_to_string("'h'"), None);
    assert_eq!(unicode_to_string("'\\x6'"), None);
}

#[test]
fn test_base64_round_trip() {
    assert_eq!(btoa("hi"), "aGk=");
    for value in ["", "hi", "Grüße 😀"] {
        assert_eq!(atob(&btoa(value)).as_deref(), Some(value));
    }
}

#[test]
fn test_string_to_jsfuck_spells_letters() {
    let debugger = string_to_jsfuck("debugger");
    assert_eq!(debugger.split(" + ").count(), "debugger".len());
    assert!(!debugger.contains("debugger"));
    assert!(debugger.starts_with(r#"(undefined+"")[2]"#));

    assert_eq!(string_to_jsfuck("a!"), r#"(false+"")[1] + '\x21'"#);
}

// =============================================================================
// String pipeline
// =============================================================================

#[test]
fn test_table_disabled_returns_escaped_text() {
    let mut registry = ArtifactRegistry::new();
    let mut random = RandomSource::seeded(1);

    let encoded = encode_string("hi", &options(false, 1.0, false, false), &mut registry, &mut random)
        .expect("no table access needed");

    assert_eq!(encoded, "'\\x68\\x69'");
    assert!(registry.is_empty());
}

#[test]
fn test_table_redirect_with_wrapper() {
    let mut registry = seeded_registry(true);
    let mut random = RandomSource::seeded(1);
    let options = options(true, 1.0, false, true);
    let mut encode = |value: &str| {
        encode_string(value, &options, &mut registry, &mut random).expect("table is seeded")
    };

    assert_eq!(encode("hi"), "_0xwrap('0x0')");
    assert_eq!(encode("bye"), "_0xwrap('0x1')");
    assert_eq!(encode("hi"), "_0xwrap('0x0')");

    let table = registry
        .string_table(ArtifactKey::UnicodeArray)
        .expect("table is seeded");
    assert_eq!(table.entries(), &["'\\x68\\x69'".to_string(), "'\\x62\\x79\\x65'".to_string()]);
}

#[test]
fn test_table_redirect_without_wrapper() {
    let mut registry = seeded_registry(false);
    let mut random = RandomSource::seeded(1);

    let first = encode_string("a", &options(true, 1.0, false, false), &mut registry, &mut random)
        .expect("table is seeded");
    let second = encode_string("b", &options(true, 1.0, false, false), &mut registry, &mut random)
        .expect("table is seeded");

    assert_eq!(first, "_0xtable[0x0]");
    assert_eq!(second, "_0xtable[0x1]");
}

#[test]
fn test_encoded_entries_decode_to_original() {
    let mut registry = seeded_registry(true);
    let mut random = RandomSource::seeded(9);

    encode_string("Grüße", &options(true, 1.0, true, true), &mut registry, &mut random)
        .expect("table is seeded");

    let table = registry
        .string_table(ArtifactKey::UnicodeArray)
        .expect("table is seeded");
    let base64 = unicode_to_string(&table.entries()[0]).expect("escaped entry");
    assert_eq!(atob(&base64).as_deref(), Some("Grüße"));
}

#[test]
fn test_encoding_without_table_still_round_trips() {
    let mut registry = ArtifactRegistry::new();
    let mut random = RandomSource::seeded(2);

    let encoded = encode_string("hi", &options(false, 1.0, true, false), &mut registry, &mut random)
        .expect("no table access needed");

    let base64 = unicode_to_string(&encoded).expect("escaped literal");
    assert_eq!(atob(&base64).as_deref(), Some("hi"));
}

#[test]
fn test_one_sample_gates_both_steps() {
    // With a mid threshold some literals qualify and some do not. A literal
    // that was base64-encoded must always end up in the table, and a literal
    // returned inline must never be encoded.
    let mut registry = seeded_registry(true);
    let mut random = RandomSource::seeded(5);
    let options = options(true, 0.5, true, true);

    let mut redirected = 0;
    let mut inline = 0;
    for i in 0..200 {
        let value = format!("value-{i}");
        let encoded = encode_string(&value, &options, &mut registry, &mut random)
            .expect("table is seeded");
        if encoded.starts_with("_0xwrap(") {
            redirected += 1;
        } else {
            inline += 1;
            assert_eq!(unicode_to_string(&encoded).as_deref(), Some(value.as_str()));
        }
    }
    assert!(redirected > 0 && inline > 0);

    let table = registry
        .string_table(ArtifactKey::UnicodeArray)
        .expect("table is seeded");
    assert_eq!(table.len(), redirected);
    for entry in table.entries() {
        let base64 = unicode_to_string(entry).expect("escaped entry");
        assert!(atob(&base64).is_some_and(|v| v.starts_with("value-")));
    }
}

#[test]
fn test_missing_table_is_fatal() {
    let mut registry = ArtifactRegistry::new();
    let mut random = RandomSource::seeded(1);

    let error = encode_string("hi", &options(true, 1.0, false, true), &mut registry, &mut random)
        .expect_err("table routing without a table must fail");

    assert!(matches!(
        error,
        ObfuscationError::MissingSupportArtifact {
            key: ArtifactKey::UnicodeArray
        }
    ));
}

#[test]
fn test_missing_wrapper_is_fatal_and_leaves_table_untouched() {
    let mut registry = seeded_registry(false);
    let mut random = RandomSource::seeded(1);

    let error = encode_string("hi", &options(true, 1.0, false, true), &mut registry, &mut random)
        .expect_err("wrapping without a wrapper must fail");

    assert!(matches!(
        error,
        ObfuscationError::MissingSupportArtifact {
            key: ArtifactKey::UnicodeArrayCallsWrapper
        }
    ));
    assert!(
        registry
            .string_table(ArtifactKey::UnicodeArray)
            .expect("table is seeded")
            .is_empty()
    );
}
