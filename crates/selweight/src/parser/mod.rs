//! Selector parsing and the selector tree.
//!
//! - [`parse_selector_list`]: main entry point, default options
//! - [`parse_selector_list_with`]: same, with explicit [`ParseOptions`]
//! - Selector types: [`SelectorList`], [`ComplexSelector`], [`CompoundSelector`],
//!   [`SimpleSelector`]
//!
//! ## Submodules
//!
//! - [`selector`]: the selector tree and its CSS serialization
//! - `selectors`: recursive descent over the selector grammar (internal)
//! - [`tokens`]: nom parsers for identifiers, strings, operators and combinators
//!
//! ## Example
//!
//! ```rust
//! use selweight::parser::{parse_selector_list, SimpleSelector};
//!
//! let list = parse_selector_list("ul > li.active, #nav a", None).unwrap();
//! assert_eq!(list.selectors.len(), 2);
//! assert_eq!(
//!     list.selectors[0].parts[1].compound.selectors[1],
//!     SimpleSelector::Class("active".to_string())
//! );
//! ```

pub mod selector;
pub(crate) mod selectors;
pub mod tokens;

use std::sync::Arc;

pub use crate::parser::selector::{
    AttributeMatcher, AttributeOperator, AttributeSelector, CaseSensitivity, Combinator,
    ComplexSelector, CompoundSelector, PseudoArgument, PseudoClass, PseudoElement,
    SelectorFunction, SelectorList, SelectorPart, SimpleSelector,
};

use crate::ParseError;
use crate::parser::selectors::SelectorParser;

/// Default bound on `:is()`/`:where()`/`:not()`/`:has()` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Parser configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// How many selector-list arguments may nest inside each other.
    ///
    /// The top-level list is level 0 and `:is(a)` puts `a` at level 1, so
    /// `:is(:is(a))` needs a limit of at least 2.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parses selector text into a [`SelectorList`] using default options.
///
/// `context` is the selector `&` stands for: every nesting reference in the
/// text, including those inside functional pseudo-class arguments, resolves
/// against it.
pub fn parse_selector_list(
    text: &str,
    context: Option<&ComplexSelector>,
) -> Result<SelectorList, ParseError> {
    parse_selector_list_with(text, context, &ParseOptions::default())
}

/// Parses selector text into a [`SelectorList`].
///
/// Fails on the first error with no partial result.
pub fn parse_selector_list_with(
    text: &str,
    context: Option<&ComplexSelector>,
    options: &ParseOptions,
) -> Result<SelectorList, ParseError> {
    log::trace!("parsing selector list {text:?}");
    let context = context.map(|selector| Arc::new(selector.clone()));
    SelectorParser::new(text, options, context)
        .parse()
        .inspect_err(|err| log::debug!("rejected selector {text:?}: {err}"))
}
