//! Cascade ordering between declarations that target the same element and
//! property.
//!
//! - [`compare_declarations`]: picks the winner of two candidates
//! - [`cascade_order`]: the same decision as an [`Ordering`], for sorting
//! - [`select_winner`] / [`sort_by_precedence`]: set helpers
//!
//! ## Precedence
//!
//! Evaluated in order, the first difference decides:
//!
//! 1. `!important` beats normal
//! 2. Origin: for normal declarations Author > User > UserAgent, for
//!    important ones the order flips
//! 3. Inline style (the `style` attribute) beats any selector
//! 4. Specificity, compared `a`, then `b`, then `c`
//! 5. Source order: the later declaration wins

use std::cmp::Ordering;

use bitflags::bitflags;

use crate::specificity::Specificity;

bitflags! {
    /// Flags carried by a declaration candidate.
    ///
    /// # Example
    ///
    /// ```
    /// use selweight::cascade::DeclarationFlags;
    ///
    /// let flags = DeclarationFlags::IMPORTANT | DeclarationFlags::INLINE;
    /// assert!(flags.contains(DeclarationFlags::IMPORTANT));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeclarationFlags: u8 {
        /// Declared with `!important`
        const IMPORTANT = 0b0000_0001;
        /// Comes from an element's `style` attribute
        const INLINE    = 0b0000_0010;
    }
}

/// Where a declaration's style sheet came from.
///
/// Variants are ordered by normal-declaration precedence, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Origin {
    UserAgent,
    User,
    #[default]
    Author,
}

/// A declaration already known to match the element and property in question.
///
/// Owned by the caller; nothing here stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeclarationCandidate {
    pub specificity: Specificity,
    pub flags: DeclarationFlags,
    pub origin: Origin,
    /// Position in the style sheet(s); larger means declared later.
    pub source_order: usize,
}

impl DeclarationCandidate {
    /// A normal author declaration.
    pub fn new(specificity: Specificity, source_order: usize) -> Self {
        Self {
            specificity,
            flags: DeclarationFlags::empty(),
            origin: Origin::Author,
            source_order,
        }
    }

    pub fn important(mut self) -> Self {
        self.flags |= DeclarationFlags::IMPORTANT;
        self
    }

    pub fn inline(mut self) -> Self {
        self.flags |= DeclarationFlags::INLINE;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_important(&self) -> bool {
        self.flags.contains(DeclarationFlags::IMPORTANT)
    }

    pub fn is_inline(&self) -> bool {
        self.flags.contains(DeclarationFlags::INLINE)
    }
}

/// Which of two compared candidates applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    First,
    Second,
}

/// Orders two candidates by cascade precedence; `Greater` means `a` wins.
pub fn cascade_order(a: &DeclarationCandidate, b: &DeclarationCandidate) -> Ordering {
    a.is_important()
        .cmp(&b.is_important())
        .then_with(|| {
            // Importance is equal here.
            let by_origin = a.origin.cmp(&b.origin);
            if a.is_important() {
                by_origin.reverse()
            } else {
                by_origin
            }
        })
        .then_with(|| a.is_inline().cmp(&b.is_inline()))
        .then_with(|| a.specificity.cmp(&b.specificity))
        .then_with(|| a.source_order.cmp(&b.source_order))
}

/// Decides which of two candidates applies.
///
/// Candidates equal in every respect (same source order included) are
/// indistinguishable; they resolve to [`Winner::Second`], which is the later
/// one when callers pass candidates in declaration order.
///
/// # Examples
///
/// ```rust
/// use selweight::{DeclarationCandidate, Specificity, Winner, compare_declarations};
///
/// let id = DeclarationCandidate::new(Specificity::new(1, 0, 0), 0);
/// let class = DeclarationCandidate::new(Specificity::new(0, 1, 0), 1).important();
/// assert_eq!(compare_declarations(&id, &class), Winner::Second);
/// ```
pub fn compare_declarations(a: &DeclarationCandidate, b: &DeclarationCandidate) -> Winner {
    match cascade_order(a, b) {
        Ordering::Greater => Winner::First,
        Ordering::Less | Ordering::Equal => Winner::Second,
    }
}

/// The candidate that applies, or `None` for an empty set.
pub fn select_winner<'a, I>(candidates: I) -> Option<&'a DeclarationCandidate>
where
    I: IntoIterator<Item = &'a DeclarationCandidate>,
{
    candidates.into_iter().max_by(|a, b| cascade_order(a, b))
}

/// Sorts lowest precedence first, so applying declarations in order leaves
/// the winner's value in place.
pub fn sort_by_precedence(candidates: &mut [DeclarationCandidate]) {
    candidates.sort_by(cascade_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(a: u32, b: u32, c: u32, order: usize) -> DeclarationCandidate {
        DeclarationCandidate::new(Specificity::new(a, b, c), order)
    }

    #[test]
    fn test_important_origins_reverse() {
        let ua = candidate(0, 0, 1, 0).with_origin(Origin::UserAgent).important();
        let author = candidate(1, 0, 0, 1).important();
        assert_eq!(compare_declarations(&ua, &author), Winner::First);

        let ua_normal = candidate(0, 0, 1, 0).with_origin(Origin::UserAgent);
        let author_normal = candidate(0, 0, 0, 1);
        assert_eq!(
            compare_declarations(&ua_normal, &author_normal),
            Winner::Second
        );
    }

    #[test]
    fn test_user_sits_between_user_agent_and_author() {
        let user = candidate(0, 0, 0, 0).with_origin(Origin::User);
        let ua = candidate(9, 9, 9, 9).with_origin(Origin::UserAgent);
        let author = candidate(0, 0, 0, 0);
        assert_eq!(cascade_order(&user, &ua), Ordering::Greater);
        assert_eq!(cascade_order(&user, &author), Ordering::Less);
    }

    #[test]
    fn test_sort_puts_winner_last() {
        let mut candidates = vec![
            candidate(1, 0, 0, 0),
            candidate(0, 0, 1, 1).important(),
            candidate(0, 1, 0, 2),
        ];
        sort_by_precedence(&mut candidates);
        let orders: Vec<usize> = candidates.iter().map(|c| c.source_order).collect();
        assert_eq!(orders, vec![2, 0, 1]);
    }

    #[test]
    fn test_select_winner_of_empty_set() {
        let none: Vec<DeclarationCandidate> = Vec::new();
        assert_eq!(select_winner(&none), None);
    }

    #[test]
    fn test_full_tie_resolves_to_second() {
        let a = candidate(0, 1, 0, 3);
        assert_eq!(compare_declarations(&a, &a), Winner::Second);
    }
}
