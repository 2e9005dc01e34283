//! Ranking style rules that compete for the same element and property.
//!
//! A rule whose selector fails to parse is skipped and logged; it never
//! aborts the ranking of the others.

use selweight::{
    ComplexSelector, DeclarationCandidate, DeclarationFlags, Origin, ParseError, SelectorList,
    cascade_order, parse_selector_list,
};

/// One declaration's provenance: the rule's selector text, or `None` for an
/// element's `style` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: Option<String>,
    pub important: bool,
    pub origin: Origin,
}

impl StyleRule {
    /// A normal author rule.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            important: false,
            origin: Origin::Author,
        }
    }

    /// A declaration from the `style` attribute.
    pub fn inline_style() -> Self {
        Self {
            selector: None,
            important: false,
            origin: Origin::Author,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

/// A rule that parsed, with the candidate it contributes to the cascade.
#[derive(Debug)]
pub struct RankedRule<'a> {
    pub rule: &'a StyleRule,
    /// Empty for inline styles.
    pub selectors: SelectorList,
    pub candidate: DeclarationCandidate,
}

/// A rule dropped because its selector did not parse.
#[derive(Debug)]
pub struct SkippedRule<'a> {
    pub rule: &'a StyleRule,
    pub source_order: usize,
    pub error: ParseError,
}

#[derive(Debug, Default)]
pub struct Ranking<'a> {
    /// Lowest precedence first; the winner is last.
    pub ranked: Vec<RankedRule<'a>>,
    pub skipped: Vec<SkippedRule<'a>>,
}

impl<'a> Ranking<'a> {
    pub fn winner(&self) -> Option<&RankedRule<'a>> {
        self.ranked.last()
    }
}

/// Ranks `rules`, whose index is their source order.
///
/// Each rule is weighed by its most specific alternative, which is the one
/// the cascade uses once the rule is known to match. `&` in any selector
/// resolves against `context`.
pub fn rank_rules<'a>(rules: &'a [StyleRule], context: Option<&ComplexSelector>) -> Ranking<'a> {
    let mut ranking = Ranking::default();

    for (source_order, rule) in rules.iter().enumerate() {
        let mut flags = DeclarationFlags::empty();
        flags.set(DeclarationFlags::IMPORTANT, rule.important);

        let selectors = match &rule.selector {
            Some(text) => match parse_selector_list(text, context) {
                Ok(list) => list,
                Err(error) => {
                    log::warn!("skipping rule {source_order} ({text:?}): {error}");
                    ranking.skipped.push(SkippedRule {
                        rule,
                        source_order,
                        error,
                    });
                    continue;
                }
            },
            None => {
                flags |= DeclarationFlags::INLINE;
                SelectorList::default()
            }
        };

        let candidate = DeclarationCandidate {
            specificity: selectors.max_specificity(),
            flags,
            origin: rule.origin,
            source_order,
        };
        ranking.ranked.push(RankedRule {
            rule,
            selectors,
            candidate,
        });
    }

    ranking
        .ranked
        .sort_by(|a, b| cascade_order(&a.candidate, &b.candidate));
    ranking
}
