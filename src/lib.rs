//! # selector-weight
//!
//! Facade over the [`selweight`] engine for callers that load rules from
//! style sheets: rank competing rules with [`rank_rules`], skipping (and
//! logging) any whose selector does not parse, and route the engine's `log`
//! output to a file with [`init_logger`].
//!
//! ```rust
//! use selector_weight::{StyleRule, rank_rules};
//!
//! let rules = vec![StyleRule::new("p.note"), StyleRule::new("#main p")];
//! let ranking = rank_rules(&rules, None);
//! assert_eq!(
//!     ranking.winner().and_then(|r| r.rule.selector.as_deref()),
//!     Some("#main p")
//! );
//! ```

pub mod error;
pub mod log_init;
pub mod rules;

pub use error::{Error, Result};
pub use log_init::init_logger;
pub use rules::{RankedRule, Ranking, SkippedRule, StyleRule, rank_rules};

// Re-export the engine and the log crate so users need only this dependency.
pub use log;
pub use selweight::*;
