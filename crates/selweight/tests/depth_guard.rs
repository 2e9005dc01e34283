//! Integration tests for the nesting-depth guard.
//!
//! Deeply nested `:is()` input must come back as `DepthExceeded`, never as a
//! stack overflow.

use selweight::parser::DEFAULT_MAX_DEPTH;
use selweight::{
    ParseError, ParseOptions, Specificity, parse_selector_list, parse_selector_list_with,
};

fn nested(function: &str, levels: usize, innermost: &str) -> String {
    let mut text = String::new();
    for _ in 0..levels {
        text.push(':');
        text.push_str(function);
        text.push('(');
    }
    text.push_str(innermost);
    text.push_str(&")".repeat(levels));
    text
}

#[test]
fn test_nesting_at_the_limit_parses() {
    let text = nested("is", DEFAULT_MAX_DEPTH, "#deep");
    let list = parse_selector_list(&text, None).unwrap();
    assert_eq!(list.max_specificity(), Specificity::new(1, 0, 0));
}

#[test]
fn test_nesting_past_the_limit_fails() {
    let text = nested("is", DEFAULT_MAX_DEPTH + 1, "#deep");
    assert_eq!(
        parse_selector_list(&text, None),
        Err(ParseError::DepthExceeded {
            limit: DEFAULT_MAX_DEPTH
        })
    );
}

#[test]
fn test_pathological_depth_does_not_overflow() {
    for function in ["is", "where", "not", "has"] {
        for levels in [100, 1_000, 50_000] {
            let text = nested(function, levels, ".x");
            assert_eq!(
                parse_selector_list(&text, None),
                Err(ParseError::DepthExceeded {
                    limit: DEFAULT_MAX_DEPTH
                }),
                "{function} x {levels}"
            );
        }
    }
}

#[test]
fn test_unclosed_deep_nesting_still_reports_depth() {
    let text = ":is(".repeat(10_000);
    assert_eq!(
        parse_selector_list(&text, None),
        Err(ParseError::DepthExceeded {
            limit: DEFAULT_MAX_DEPTH
        })
    );
}

#[test]
fn test_custom_limit() {
    let options = ParseOptions::new().with_max_depth(2);
    assert!(
        parse_selector_list_with(":is(:not(.a))", None, &options).is_ok()
    );
    assert_eq!(
        parse_selector_list_with(":is(:not(:has(.a)))", None, &options),
        Err(ParseError::DepthExceeded { limit: 2 })
    );

    let flat = ParseOptions::new().with_max_depth(0);
    assert!(
        parse_selector_list_with("a:hover:nth-child(2)", None, &flat).is_ok()
    );
    assert_eq!(
        parse_selector_list_with(":is(a)", None, &flat),
        Err(ParseError::DepthExceeded { limit: 0 })
    );
}

#[test]
fn test_sibling_arguments_do_not_accumulate_depth() {
    let options = ParseOptions::new().with_max_depth(1);
    let text = ":is(.a):not(.b):where(.c):has(.d), :is(#e)";
    assert!(parse_selector_list_with(text, None, &options).is_ok());
}

#[test]
fn test_generated_inputs_never_panic() {
    // Deterministic pseudo-random mixes of selector fragments.
    let fragments = [
        ":is(", ":where(", ":not(", ":has(", ")", ",", " ", ">", "#a", ".b", "[c", "]", "'",
        "&", "*", "p", "::x", ":nth-child(", "||",
    ];
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..2_000 {
        let mut text = String::new();
        for _ in 0..(seed % 64) {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            text.push_str(fragments[(seed % fragments.len() as u64) as usize]);
        }
        if let Ok(list) = parse_selector_list(&text, None) {
            let reparsed = parse_selector_list(&list.to_string(), None).unwrap();
            assert_eq!(reparsed.specificities(), list.specificities(), "{text:?}");
        }
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    }
}
