//! # selweight - CSS selector specificity engine
//!
//! Parses CSS selector text into a selector tree, weighs each alternative
//! with the three-tier `(a, b, c)` specificity the cascade uses, and ranks
//! declarations that compete for the same element and property.
//!
//! - **Parsing**: [`parse_selector_list`] turns text into a [`SelectorList`]
//! - **Specificity**: [`specificity`] weighs one [`ComplexSelector`]
//! - **Cascade**: [`compare_declarations`] decides between two candidates
//!
//! ## Quick Start
//!
//! ```rust
//! use selweight::{Specificity, parse_selector_list};
//!
//! let list = parse_selector_list("#foo .bar, p.test1.test2", None).unwrap();
//! assert_eq!(list.specificities(), vec![
//!     Specificity::new(1, 1, 0),
//!     Specificity::new(0, 2, 1),
//! ]);
//! ```
//!
//! ## Supported Selectors
//!
//! - Type, universal, ID and class selectors: `div`, `*`, `#main`, `.active`
//! - Attribute selectors with `=`, `~=`, `|=`, `^=`, `$=`, `*=` and the
//!   `i`/`s` flags
//! - Pseudo-classes, including `:is()`, `:where()`, `:not()`, `:has()` and
//!   opaque arguments such as `:nth-child(2n+1)`
//! - Pseudo-elements: `::before`, legacy `:after`, `::part(label)`
//! - Combinators: descendant, `>`, `+`, `~`, `||`
//! - The nesting selector `&`, resolved against a caller-supplied context
//!
//! ## Modules
//!
//! - [`parser`]: selector tree, parsing entry points and options
//! - [`specificity`]: the specificity triple and its calculation
//! - [`cascade`]: declaration precedence
//! - [`cache`]: read-through specificity cache
//! - [`error`]: parse errors

pub mod cache;
pub mod cascade;
pub mod error;
pub mod parser;
pub mod specificity;

pub use cache::{SpecificityCache, shared_cache};
pub use cascade::{
    DeclarationCandidate, DeclarationFlags, Origin, Winner, cascade_order, compare_declarations,
    select_winner, sort_by_precedence,
};
pub use error::{Found, ParseError};
pub use parser::{
    ComplexSelector, CompoundSelector, ParseOptions, SelectorList, SimpleSelector,
    parse_selector_list, parse_selector_list_with,
};
pub use specificity::{Specificity, specificity};
