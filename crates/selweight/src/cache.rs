//! Read-through specificity cache keyed by normalized selector text.
//!
//! Specificity is a pure function of the selector text (and of the nesting
//! context `&` resolves against), so entries never need invalidation and one
//! cache can be shared read-mostly across threads.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::ParseError;
use crate::parser::{ComplexSelector, ParseOptions, parse_selector_list_with, tokens};
use crate::specificity::Specificity;

static SHARED_CACHE: Lazy<SpecificityCache> = Lazy::new(SpecificityCache::new);

/// Process-wide cache using default [`ParseOptions`].
pub fn shared_cache() -> &'static SpecificityCache {
    &SHARED_CACHE
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    selector: String,
    /// Serialized context plus its weight; `&` serializes without the
    /// selector it stands for, so the text alone is ambiguous.
    context: Option<(String, Specificity)>,
}

impl CacheKey {
    fn new(text: &str, context: Option<&ComplexSelector>) -> Self {
        Self {
            selector: normalize(text),
            context: context.map(|c| (c.to_string(), c.specificity())),
        }
    }
}

/// Collapses whitespace runs to one space and trims the ends.
///
/// Runs are CSS whitespace only, and escapes and quoted strings are copied
/// as units, so two texts share a key only when the parser reads them alike.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut rest = text;
    let mut pending_space = false;

    while let Some(c) = rest.chars().next() {
        if tokens::is_css_whitespace(c) {
            rest = tokens::ws(rest).0;
            pending_space = !normalized.is_empty();
            continue;
        }
        if pending_space {
            normalized.push(' ');
            pending_space = false;
        }

        let unit = match c {
            '\\' => match tokens::parse_escape(rest) {
                Ok((after, _)) => rest.len() - after.len(),
                // Keep the character that made the escape invalid.
                Err(_) => 1 + rest[1..].chars().next().map_or(0, char::len_utf8),
            },
            '"' | '\'' => match tokens::parse_string(rest) {
                Ok((after, _)) => rest.len() - after.len(),
                Err(_) => rest.len(),
            },
            _ => c.len_utf8(),
        };
        normalized.push_str(&rest[..unit]);
        rest = &rest[unit..];
    }

    normalized
}

/// Memoizes per-alternative specificities of selector lists.
///
/// Parse failures are returned to the caller and not cached.
#[derive(Debug, Default)]
pub struct SpecificityCache {
    entries: RwLock<HashMap<CacheKey, Arc<[Specificity]>>>,
    options: ParseOptions,
}

impl SpecificityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            entries: RwLock::default(),
            options,
        }
    }

    /// Specificity of every alternative in `text`, computing it on a miss.
    pub fn get_or_compute(
        &self,
        text: &str,
        context: Option<&ComplexSelector>,
    ) -> Result<Arc<[Specificity]>, ParseError> {
        let key = CacheKey::new(text, context);

        {
            // Entries are plain values, so a poisoned lock still holds valid data.
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = entries.get(&key) {
                log::trace!("specificity cache hit for {:?}", key.selector);
                return Ok(Arc::clone(hit));
            }
        }

        log::trace!("specificity cache miss for {:?}", key.selector);
        let list = parse_selector_list_with(text, context, &self.options)?;
        let computed: Arc<[Specificity]> = list.specificities().into();

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(computed)))
    }

    /// The greatest specificity among the alternatives in `text`.
    pub fn max_specificity(
        &self,
        text: &str,
        context: Option<&ComplexSelector>,
    ) -> Result<Specificity, ParseError> {
        let all = self.get_or_compute(text, context)?;
        Ok(all.iter().copied().max().unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_selector_list;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  div \n>\t p  "), "div > p");
    }

    #[test]
    fn test_normalize_copies_escapes_and_strings() {
        assert_eq!(normalize("[title='a   b']   p"), "[title='a   b'] p");
        // The first space after a hex escape is part of the escape.
        assert_eq!(normalize(r"#\31    23"), r"#\31  23");
        assert_eq!(normalize(r".a\   b"), r".a\  b");
        assert_eq!(normalize("div\u{a0}p"), "div\u{a0}p");
        assert_eq!(normalize("div\x0C\np"), "div p");
    }

    #[test]
    fn test_key_agrees_with_parser_on_whitespace() {
        let cache = SpecificityCache::new();
        // NBSP is an identifier character, not a separator.
        assert_eq!(
            cache.max_specificity("div\u{a0}p", None),
            Ok(Specificity::new(0, 0, 1))
        );
        assert_eq!(
            cache.max_specificity("div p", None),
            Ok(Specificity::new(0, 0, 2))
        );
        // Form feed is CSS whitespace and shares the `div p` entry.
        assert_eq!(
            cache.max_specificity("div\x0Cp", None),
            Ok(Specificity::new(0, 0, 2))
        );
        assert_eq!(cache.len(), 2);

        assert_eq!(
            cache.max_specificity("\u{a0}", None),
            Ok(Specificity::new(0, 0, 1))
        );
        assert_eq!(
            cache.max_specificity("", None),
            Err(ParseError::EmptySelector { offset: 0 })
        );
    }

    #[test]
    fn test_cached_answers_match_direct_parses_in_any_order() {
        let texts = [
            "div p",
            "div\u{a0}p",
            "div\u{3000}p",
            "div\x0Cp",
            r"#\31 23",
            r"#\31  23",
            r".a\ b",
            r".a\  b",
            "[x='a  b']",
            "[x='a b']",
            " ",
            "",
        ];
        let expected: Vec<_> = texts
            .iter()
            .map(|text| parse_selector_list(text, None).map(|list| list.max_specificity()))
            .collect();

        for order in [texts.to_vec(), texts.iter().rev().copied().collect()] {
            let cache = SpecificityCache::new();
            for text in order {
                let index = texts.iter().position(|t| *t == text).unwrap();
                assert_eq!(
                    cache.max_specificity(text, None),
                    expected[index],
                    "{text:?}",
                );
            }
        }
    }

    #[test]
    fn test_whitespace_variants_share_an_entry() {
        let cache = SpecificityCache::new();
        let first = cache.get_or_compute("div   > p", None).unwrap();
        let second = cache.get_or_compute(" div > p ", None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(&*first, &[Specificity::new(0, 0, 2)]);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = SpecificityCache::new();
        assert!(cache.get_or_compute("div >", None).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_context_is_part_of_the_key() {
        let cache = SpecificityCache::new();
        let id = parse_selector_list("#app", None).unwrap().selectors.remove(0);
        let class = parse_selector_list(".app", None).unwrap().selectors.remove(0);

        assert_eq!(
            cache.max_specificity("& p", None).unwrap(),
            Specificity::new(0, 0, 1)
        );
        assert_eq!(
            cache.max_specificity("& p", Some(&id)).unwrap(),
            Specificity::new(1, 0, 1)
        );
        assert_eq!(
            cache.max_specificity("& p", Some(&class)).unwrap(),
            Specificity::new(0, 1, 1)
        );
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_cache_honors_depth_option() {
        let cache = SpecificityCache::with_options(ParseOptions::new().with_max_depth(1));
        assert!(cache.get_or_compute(":is(.a)", None).is_ok());
        assert_eq!(
            cache.get_or_compute(":is(:is(.a))", None),
            Err(ParseError::DepthExceeded { limit: 1 })
        );
    }

    #[test]
    fn test_shared_cache_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| shared_cache().max_specificity("#a .b c", None)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Specificity::new(1, 1, 1)));
        }
    }

    #[test]
    fn test_clear() {
        let cache = SpecificityCache::new();
        cache.get_or_compute("p", None).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
