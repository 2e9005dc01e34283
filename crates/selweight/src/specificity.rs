//! Selector specificity.
//!
//! A selector's weight is the triple `(a, b, c)`:
//!
//! | Selector kind | Contribution |
//! |---|---|
//! | `#id` | `a += 1` |
//! | `.class`, `[attr]`, `:pseudo-class` | `b += 1` |
//! | `type`, `::pseudo-element` | `c += 1` |
//! | `*`, combinators | nothing |
//! | `:where(...)` | nothing, whatever its argument |
//! | `:is(...)`, `:not(...)`, `:has(...)` | the greatest specificity among its alternatives |
//! | `&` | the specificity of the selector it was resolved against, or nothing |
//!
//! Weights are computed per complex selector. Alternatives of a selector list
//! are never summed; [`SelectorList::specificities`] reports one triple each.

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::parser::{
    ComplexSelector, CompoundSelector, PseudoArgument, PseudoClass, SelectorFunction,
    SelectorList, SimpleSelector,
};

/// CSS specificity for determining rule precedence.
///
/// Ordering is lexicographic: `ids`, then `classes`, then `types`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub types: u32,
}

impl Specificity {
    pub const ZERO: Specificity = Specificity::new(0, 0, 0);

    pub const fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self {
            ids,
            classes,
            types,
        }
    }

    /// The `(a, b, c)` triple.
    pub const fn as_tuple(self) -> (u32, u32, u32) {
        (self.ids, self.classes, self.types)
    }
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Specificity) -> Specificity {
        Specificity {
            ids: self.ids.saturating_add(rhs.ids),
            classes: self.classes.saturating_add(rhs.classes),
            types: self.types.saturating_add(rhs.types),
        }
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Specificity) {
        *self = *self + rhs;
    }
}

impl From<(u32, u32, u32)> for Specificity {
    fn from((ids, classes, types): (u32, u32, u32)) -> Self {
        Self::new(ids, classes, types)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.ids, self.classes, self.types)
    }
}

/// Computes the specificity of one complex selector.
///
/// # Examples
///
/// ```rust
/// use selweight::{Specificity, parse_selector_list, specificity};
///
/// let list = parse_selector_list("#navbar p#demo", None).unwrap();
/// assert_eq!(specificity(&list.selectors[0]), Specificity::new(2, 0, 1));
/// ```
pub fn specificity(selector: &ComplexSelector) -> Specificity {
    selector.specificity()
}

impl SimpleSelector {
    pub fn specificity(&self) -> Specificity {
        match self {
            SimpleSelector::Id(_) => Specificity::new(1, 0, 0),
            SimpleSelector::Class(_) | SimpleSelector::Attribute(_) => Specificity::new(0, 1, 0),
            SimpleSelector::PseudoClass(pseudo) => pseudo_class_specificity(pseudo),
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => {
                Specificity::new(0, 0, 1)
            }
            SimpleSelector::Universal => Specificity::ZERO,
            SimpleSelector::Nesting(context) => context
                .as_deref()
                .map_or(Specificity::ZERO, ComplexSelector::specificity),
        }
    }
}

/// Weight of a pseudo-class, resolving the selector-list functions.
fn pseudo_class_specificity(pseudo: &PseudoClass) -> Specificity {
    match (pseudo.function(), &pseudo.argument) {
        (Some(SelectorFunction::Where), _) => Specificity::ZERO,
        (Some(_), Some(PseudoArgument::Selectors(list))) => list.max_specificity(),
        // Plain pseudo-classes, and anything a caller built by hand that
        // names a function without a selector argument.
        _ => Specificity::new(0, 1, 0),
    }
}

impl CompoundSelector {
    pub fn specificity(&self) -> Specificity {
        self.selectors
            .iter()
            .fold(Specificity::ZERO, |acc, s| acc + s.specificity())
    }
}

impl ComplexSelector {
    pub fn specificity(&self) -> Specificity {
        self.parts
            .iter()
            .fold(Specificity::ZERO, |acc, part| acc + part.compound.specificity())
    }
}

impl SelectorList {
    /// One specificity per alternative, in source order.
    pub fn specificities(&self) -> Vec<Specificity> {
        self.selectors.iter().map(ComplexSelector::specificity).collect()
    }

    /// The greatest alternative's specificity; `(0,0,0)` for an empty list.
    pub fn max_specificity(&self) -> Specificity {
        self.selectors
            .iter()
            .map(ComplexSelector::specificity)
            .max()
            .unwrap_or_default()
    }
}
