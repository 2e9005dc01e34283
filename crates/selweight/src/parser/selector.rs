//! Selector tree types and their CSS serialization.
//!
//! The tree is owned top-down: a [`SelectorList`] owns its alternatives, each
//! [`ComplexSelector`] owns its compounds, and functional pseudo-classes own
//! their argument lists. The only shared node is the nesting context carried by
//! `&`, which is an immutable [`Arc`] handed in at parse time.

use std::fmt::{self, Write};
use std::sync::Arc;

use crate::parser::tokens::is_ident_char;

/// A structural relation between two compound selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace: `A B`.
    Descendant,
    /// `A > B`.
    Child,
    /// `A + B`.
    NextSibling,
    /// `A ~ B`.
    SubsequentSibling,
    /// `A || B`.
    Column,
}

impl Combinator {
    /// The combinator's source symbol. Descendant is a single space.
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::NextSibling => "+",
            Combinator::SubsequentSibling => "~",
            Combinator::Column => "||",
        }
    }
}

/// Value-matching operator inside an attribute selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `[a=v]`
    Equals,
    /// `[a~=v]`
    Includes,
    /// `[a|=v]`
    DashMatch,
    /// `[a^=v]`
    Prefix,
    /// `[a$=v]`
    Suffix,
    /// `[a*=v]`
    Substring,
}

impl AttributeOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

/// The `i` / `s` flag that may close an attribute selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    /// `[a=v i]`
    AsciiInsensitive,
    /// `[a=v s]`
    Sensitive,
}

/// Operator, value and optional case flag of `[name op value]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMatcher {
    pub operator: AttributeOperator,
    pub value: String,
    pub case_sensitivity: Option<CaseSensitivity>,
}

/// `[name]` or `[name op value]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

impl AttributeSelector {
    /// Presence test: `[name]`.
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: None,
        }
    }

    /// Value test: `[name op value]`.
    pub fn matching(
        name: impl Into<String>,
        operator: AttributeOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Some(AttributeMatcher {
                operator,
                value: value.into(),
                case_sensitivity: None,
            }),
        }
    }

    pub fn operator(&self) -> Option<AttributeOperator> {
        self.matcher.as_ref().map(|m| m.operator)
    }

    pub fn value(&self) -> Option<&str> {
        self.matcher.as_ref().map(|m| m.value.as_str())
    }

    pub fn case_sensitivity(&self) -> Option<CaseSensitivity> {
        self.matcher.as_ref().and_then(|m| m.case_sensitivity)
    }
}

/// Pseudo-classes whose argument is itself a selector list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectorFunction {
    Is,
    Where,
    Not,
    Has,
}

impl SelectorFunction {
    /// Looks up a pseudo-class name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ("is", SelectorFunction::Is),
            ("where", SelectorFunction::Where),
            ("not", SelectorFunction::Not),
            ("has", SelectorFunction::Has),
        ]
        .into_iter()
        .find(|(candidate, _)| name.eq_ignore_ascii_case(candidate))
        .map(|(_, function)| function)
    }
}

/// The parenthesized part of a functional pseudo-class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoArgument {
    /// Argument of `:is()`, `:where()`, `:not()` and `:has()`.
    Selectors(SelectorList),
    /// Anything else, e.g. the `2n+1` of `:nth-child(2n+1)`, kept verbatim.
    Raw(String),
}

/// `:name` or `:name(argument)`. Names are stored ASCII-lowercased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PseudoClass {
    pub name: String,
    pub argument: Option<PseudoArgument>,
}

impl PseudoClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    pub fn with_selectors(name: impl Into<String>, selectors: SelectorList) -> Self {
        Self {
            name: name.into(),
            argument: Some(PseudoArgument::Selectors(selectors)),
        }
    }

    /// The selector-list function this pseudo-class names, if any.
    pub fn function(&self) -> Option<SelectorFunction> {
        SelectorFunction::from_name(&self.name)
    }
}

/// `::name` or `::name(argument)`. Names are stored ASCII-lowercased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PseudoElement {
    pub name: String,
    pub argument: Option<String>,
}

impl PseudoElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }
}

/// One indivisible selector component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleSelector {
    Type(String),
    Universal,
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
    PseudoElement(PseudoElement),
    /// `&`, carrying the enclosing selector it was resolved against at parse
    /// time (if the caller supplied one).
    Nesting(Option<Arc<ComplexSelector>>),
}

/// Simple selectors with no separator between them (e.g. `div.foo#bar`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn new(selectors: Vec<SimpleSelector>) -> Self {
        Self { selectors }
    }
}

/// One compound selector and the combinator linking it to the previous one.
///
/// The first part of a complex selector has no combinator, except for the
/// relative selectors accepted inside `:has()` (`:has(> img)`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorPart {
    pub combinator: Option<Combinator>,
    pub compound: CompoundSelector,
}

impl SelectorPart {
    pub fn new(combinator: Option<Combinator>, compound: CompoundSelector) -> Self {
        Self {
            combinator,
            compound,
        }
    }
}

/// Compound selectors joined by combinators (e.g. `div > .foo`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<SelectorPart>,
}

impl ComplexSelector {
    pub fn new(parts: Vec<SelectorPart>) -> Self {
        Self { parts }
    }

    /// The combinator a relative selector starts with (`> img` in `:has(> img)`).
    pub fn leading_combinator(&self) -> Option<Combinator> {
        self.parts.first().and_then(|part| part.combinator)
    }

    /// All simple selectors across every compound, left to right.
    pub fn simple_selectors(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.parts.iter().flat_map(|part| part.compound.selectors.iter())
    }
}

/// Comma-separated alternatives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn new(selectors: Vec<ComplexSelector>) -> Self {
        Self { selectors }
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            match (i, part.combinator) {
                (_, None) => {}
                (0, Some(combinator)) => write!(f, "{} ", combinator.as_str())?,
                (_, Some(Combinator::Descendant)) => f.write_char(' ')?,
                (_, Some(combinator)) => write!(f, " {} ", combinator.as_str())?,
            }
            write!(f, "{}", part.compound)?;
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selectors.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Type(name) => write!(f, "{}", Ident(name)),
            SimpleSelector::Universal => f.write_char('*'),
            SimpleSelector::Id(name) => write!(f, "#{}", Ident(name)),
            SimpleSelector::Class(name) => write!(f, ".{}", Ident(name)),
            SimpleSelector::Attribute(attr) => write!(f, "{attr}"),
            SimpleSelector::PseudoClass(pseudo) => {
                write!(f, ":{}", Ident(&pseudo.name))?;
                match &pseudo.argument {
                    Some(PseudoArgument::Selectors(list)) => write!(f, "({list})"),
                    Some(PseudoArgument::Raw(raw)) => write!(f, "({raw})"),
                    None => Ok(()),
                }
            }
            SimpleSelector::PseudoElement(pseudo) => {
                write!(f, "::{}", Ident(&pseudo.name))?;
                match &pseudo.argument {
                    Some(raw) => write!(f, "({raw})"),
                    None => Ok(()),
                }
            }
            SimpleSelector::Nesting(_) => f.write_char('&'),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", Ident(&self.name))?;
        if let Some(matcher) = &self.matcher {
            write!(f, "{}{}", matcher.operator.as_str(), Quoted(&matcher.value))?;
            match matcher.case_sensitivity {
                Some(CaseSensitivity::AsciiInsensitive) => f.write_str(" i")?,
                Some(CaseSensitivity::Sensitive) => f.write_str(" s")?,
                None => {}
            }
        }
        f.write_char(']')
    }
}

/// Serializes an identifier, escaping whatever would not parse back as one.
struct Ident<'a>(&'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0;
        let leading_dash = name.starts_with('-');
        for (i, c) in name.chars().enumerate() {
            match c {
                '\0' => f.write_char(char::REPLACEMENT_CHARACTER)?,
                '\u{1}'..='\u{1f}' | '\u{7f}' => write!(f, "\\{:x} ", u32::from(c))?,
                '0'..='9' if i == 0 || (i == 1 && leading_dash) => {
                    write!(f, "\\{:x} ", u32::from(c))?
                }
                '-' if name.len() == 1 => f.write_str("\\-")?,
                c if is_ident_char(c) => f.write_char(c)?,
                c => {
                    f.write_char('\\')?;
                    f.write_char(c)?;
                }
            }
        }
        Ok(())
    }
}

/// Serializes a double-quoted string.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '\0' => f.write_char(char::REPLACEMENT_CHARACTER)?,
                '\u{1}'..='\u{1f}' | '\u{7f}' => write!(f, "\\{:x} ", u32::from(c))?,
                '"' | '\\' => {
                    f.write_char('\\')?;
                    f.write_char(c)?;
                }
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(selectors: Vec<SimpleSelector>) -> CompoundSelector {
        CompoundSelector::new(selectors)
    }

    #[test]
    fn test_display_complex_with_combinators() {
        let complex = ComplexSelector::new(vec![
            SelectorPart::new(None, compound(vec![SimpleSelector::Type("ul".into())])),
            SelectorPart::new(
                Some(Combinator::Child),
                compound(vec![SimpleSelector::Class("item".into())]),
            ),
            SelectorPart::new(
                Some(Combinator::Descendant),
                compound(vec![SimpleSelector::Type("a".into())]),
            ),
        ]);
        assert_eq!(complex.to_string(), "ul > .item a");
    }

    #[test]
    fn test_display_relative_selector() {
        let complex = ComplexSelector::new(vec![SelectorPart::new(
            Some(Combinator::NextSibling),
            compound(vec![SimpleSelector::Type("p".into())]),
        )]);
        assert_eq!(complex.to_string(), "+ p");
        assert_eq!(complex.leading_combinator(), Some(Combinator::NextSibling));
    }

    #[test]
    fn test_display_attribute_escapes_quotes() {
        let mut attr =
            AttributeSelector::matching("title", AttributeOperator::Equals, "say \"hi\"");
        if let Some(matcher) = attr.matcher.as_mut() {
            matcher.case_sensitivity = Some(CaseSensitivity::AsciiInsensitive);
        }
        assert_eq!(attr.to_string(), r#"[title="say \"hi\"" i]"#);
        assert_eq!(AttributeSelector::exists("href").to_string(), "[href]");
    }

    #[test]
    fn test_selector_function_lookup_ignores_case() {
        assert_eq!(
            SelectorFunction::from_name("IS"),
            Some(SelectorFunction::Is)
        );
        assert_eq!(
            SelectorFunction::from_name("where"),
            Some(SelectorFunction::Where)
        );
        assert_eq!(SelectorFunction::from_name("nth-child"), None);
    }

    #[test]
    fn test_display_escapes_identifiers() {
        let escaped = compound(vec![
            SimpleSelector::Type("1st".into()),
            SimpleSelector::Class("md:flex".into()),
            SimpleSelector::Id("-2".into()),
            SimpleSelector::Class("a b".into()),
            SimpleSelector::Class("-".into()),
        ]);
        assert_eq!(escaped.to_string(), r"\31 st.md\:flex#-\32 .a\ b.\-");
    }

    #[test]
    fn test_display_escapes_control_characters_in_values() {
        let attr = AttributeSelector::matching("title", AttributeOperator::Equals, "a\nb");
        assert_eq!(attr.to_string(), r#"[title="a\a b"]"#);
    }
}
