use std::sync::Arc;

use crate::error::{Found, ParseError};
use crate::parser::ParseOptions;
use crate::parser::selector::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    PseudoArgument, PseudoClass, PseudoElement, SelectorFunction, SelectorList, SelectorPart,
    SimpleSelector,
};
use crate::parser::tokens::{self, RawScanError, ws};
use nom::Offset;

/// Result of one grammar step: the unconsumed input and the parsed value.
type Step<'i, T> = Result<(&'i str, T), ParseError>;

/// Pseudo-elements that CSS 2 allowed with a single colon.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// Where a selector list lives, which decides how it may end.
#[derive(Clone, Copy, Debug)]
enum Group {
    /// The whole input; ends at end of input.
    TopLevel,
    /// The argument of a selector-list pseudo-class; ends at `)`.
    Argument {
        /// Offset of the opening parenthesis.
        open: usize,
        /// Whether alternatives may start with a combinator (`:has()`).
        relative: bool,
    },
}

/// Recursive descent over selector text.
///
/// Holds the full source so every error offset can be reported relative to
/// the outermost input, whatever argument list is being parsed.
pub(crate) struct SelectorParser<'a> {
    source: &'a str,
    options: &'a ParseOptions,
    context: Option<Arc<ComplexSelector>>,
}

impl<'a> SelectorParser<'a> {
    pub(crate) fn new(
        source: &'a str,
        options: &'a ParseOptions,
        context: Option<Arc<ComplexSelector>>,
    ) -> Self {
        Self {
            source,
            options,
            context,
        }
    }

    /// Parses the whole source as a selector list.
    pub(crate) fn parse(&self) -> Result<SelectorList, ParseError> {
        let (_, list) = self.selector_list(self.source, Group::TopLevel, 0)?;
        Ok(list)
    }

    fn offset(&self, rest: &str) -> usize {
        self.source.offset(rest)
    }

    fn syntax(&self, rest: &str, expected: &'static str) -> ParseError {
        ParseError::Syntax {
            offset: self.offset(rest),
            expected,
            found: Found::from(rest.chars().next()),
        }
    }

    /// Parses comma-separated complex selectors up to the end of `group`.
    fn selector_list<'i>(
        &self,
        input: &'i str,
        group: Group,
        depth: usize,
    ) -> Step<'i, SelectorList> {
        let mut selectors = Vec::new();

        // `:is()` and friends accept an empty argument.
        let (trimmed, _) = ws(input);
        if matches!(group, Group::Argument { .. }) && trimmed.starts_with(')') {
            return Ok((&trimmed[1..], SelectorList::new(selectors)));
        }

        let mut input = input;
        loop {
            let (rest, complex) = self.complex_selector(input, group, depth)?;
            selectors.push(complex);

            let (rest, _) = ws(rest);
            match (rest.chars().next(), group) {
                (Some(','), _) => input = &rest[1..],
                (Some(')'), Group::Argument { .. }) => {
                    return Ok((&rest[1..], SelectorList::new(selectors)));
                }
                (None, Group::TopLevel) => return Ok((rest, SelectorList::new(selectors))),
                (None, Group::Argument { open, .. }) => {
                    return Err(ParseError::UnbalancedGroup { offset: open });
                }
                (Some(')' | ']'), _) => {
                    return Err(ParseError::UnbalancedGroup {
                        offset: self.offset(rest),
                    });
                }
                (Some(_), Group::TopLevel) => return Err(self.syntax(rest, "',' or end of input")),
                (Some(_), Group::Argument { .. }) => return Err(self.syntax(rest, "',' or ')'")),
            }
        }
    }

    /// Parses compound selectors joined by combinators.
    fn complex_selector<'i>(
        &self,
        input: &'i str,
        group: Group,
        depth: usize,
    ) -> Step<'i, ComplexSelector> {
        let (input, _) = ws(input);
        let relative = matches!(group, Group::Argument { relative: true, .. });

        let (mut input, mut combinator) = match tokens::parse_combinator(input) {
            Ok((rest, found)) if relative => (ws(rest).0, Some(found)),
            Ok(_) => {
                return Err(ParseError::EmptySelector {
                    offset: self.offset(input),
                });
            }
            Err(_) => (input, None),
        };

        let mut parts = Vec::new();
        loop {
            let (rest, compound) = self.compound_selector(input, depth)?;
            if compound.selectors.is_empty() {
                return Err(self.missing_compound(rest, group));
            }
            parts.push(SelectorPart::new(combinator, compound));

            let (after_ws, spaces) = ws(rest);
            if let Ok((after_op, found)) = tokens::parse_combinator(after_ws) {
                input = ws(after_op).0;
                combinator = Some(found);
                continue;
            }

            let ends_here = matches!(after_ws.chars().next(), None | Some(',' | ')'));
            if spaces.is_empty() || ends_here {
                return Ok((rest, ComplexSelector::new(parts)));
            }
            input = after_ws;
            combinator = Some(Combinator::Descendant);
        }
    }

    /// Builds the error for a compound that should be present but is not.
    fn missing_compound(&self, rest: &str, group: Group) -> ParseError {
        let offset = self.offset(rest);
        match (rest.chars().next(), group) {
            (None, Group::Argument { open, .. }) => ParseError::UnbalancedGroup { offset: open },
            (Some(')'), Group::TopLevel) | (Some(']'), _) => ParseError::UnbalancedGroup { offset },
            (None | Some(',' | ')'), _) => ParseError::EmptySelector { offset },
            (Some(_), _) if tokens::parse_combinator(rest).is_ok() => {
                ParseError::EmptySelector { offset }
            }
            (Some(_), _) => self.syntax(rest, "selector"),
        }
    }

    /// Parses simple selectors until something that cannot continue the compound.
    ///
    /// Returns an empty compound when nothing matched; callers decide whether
    /// that is an error.
    fn compound_selector<'i>(&self, input: &'i str, depth: usize) -> Step<'i, CompoundSelector> {
        let mut selectors = Vec::new();
        let mut input = input;

        while let Some(c) = input.chars().next() {
            let (rest, simple) = match c {
                '*' | '#' | '.' | '[' | ':' | '&' => self.simple_selector(input, depth)?,
                _ => match tokens::parse_ident(input) {
                    Ok((rest, name)) => (rest, SimpleSelector::Type(name)),
                    Err(_) => break,
                },
            };

            let leads_only = matches!(simple, SimpleSelector::Type(_) | SimpleSelector::Universal);
            if leads_only && !selectors.is_empty() {
                return Err(self.syntax(input, "class, id, attribute or pseudo selector"));
            }

            selectors.push(simple);
            input = rest;
        }

        Ok((input, CompoundSelector::new(selectors)))
    }

    fn simple_selector<'i>(&self, input: &'i str, depth: usize) -> Step<'i, SimpleSelector> {
        match input.chars().next() {
            Some('*') => Ok((&input[1..], SimpleSelector::Universal)),
            Some('&') => Ok((&input[1..], SimpleSelector::Nesting(self.context.clone()))),
            Some('#') => {
                let (rest, name) = self.ident(&input[1..])?;
                Ok((rest, SimpleSelector::Id(name)))
            }
            Some('.') => {
                let (rest, name) = self.ident(&input[1..])?;
                Ok((rest, SimpleSelector::Class(name)))
            }
            Some('[') => self.attribute(input),
            Some(':') => self.pseudo(input, depth),
            _ => Err(self.syntax(input, "selector")),
        }
    }

    fn ident<'i>(&self, input: &'i str) -> Step<'i, String> {
        tokens::parse_ident(input).map_err(|_| self.syntax(input, "identifier"))
    }

    /// `[name]`, `[name op value]`, `[name op value i]`.
    fn attribute<'i>(&self, input: &'i str) -> Step<'i, SimpleSelector> {
        let open = self.offset(input);
        let unbalanced = ParseError::UnbalancedGroup { offset: open };

        let (rest, _) = ws(&input[1..]);
        if rest.is_empty() {
            return Err(unbalanced);
        }
        let (rest, name) = self.ident(rest)?;
        let (rest, _) = ws(rest);

        let (rest, matcher) = match tokens::parse_attribute_operator(rest) {
            Ok((rest, operator)) => {
                let (rest, _) = ws(rest);
                let (rest, value) = self.attribute_value(rest, open)?;
                let (rest, _) = ws(rest);
                let (rest, case_sensitivity) = match tokens::parse_case_flag(rest) {
                    Ok((rest, flag)) => (rest, Some(flag)),
                    Err(_) => (rest, None),
                };
                let matcher = AttributeMatcher {
                    operator,
                    value,
                    case_sensitivity,
                };
                (ws(rest).0, Some(matcher))
            }
            Err(_) => (rest, None),
        };

        match rest.chars().next() {
            Some(']') => Ok((
                &rest[1..],
                SimpleSelector::Attribute(AttributeSelector {
                    name,
                    matcher,
                }),
            )),
            None => Err(unbalanced),
            Some(_) => Err(self.syntax(rest, "']'")),
        }
    }

    fn attribute_value<'i>(&self, input: &'i str, open: usize) -> Step<'i, String> {
        match tokens::parse_string(input) {
            Ok(parsed) => return Ok(parsed),
            Err(nom::Err::Failure(_)) => {
                return Err(ParseError::UnbalancedGroup {
                    offset: self.offset(input),
                });
            }
            Err(_) => {}
        }
        if input.is_empty() {
            return Err(ParseError::UnbalancedGroup { offset: open });
        }
        tokens::parse_ident(input).map_err(|_| self.syntax(input, "attribute value"))
    }

    /// `:name`, `:name(...)`, `::name`, `::name(...)`.
    fn pseudo<'i>(&self, input: &'i str, depth: usize) -> Step<'i, SimpleSelector> {
        let is_element = input.starts_with("::");
        let after_colons = if is_element { &input[2..] } else { &input[1..] };
        let (rest, name) = self.ident(after_colons)?;
        let name = name.to_ascii_lowercase();
        let has_argument = rest.starts_with('(');

        if is_element {
            let (rest, argument) = if has_argument {
                let (rest, raw) = self.raw_argument(rest)?;
                (rest, Some(raw))
            } else {
                (rest, None)
            };
            return Ok((rest, SimpleSelector::PseudoElement(PseudoElement { name, argument })));
        }

        if let Some(function) = SelectorFunction::from_name(&name) {
            if !has_argument {
                return Err(self.syntax(rest, "'('"));
            }
            let depth = depth + 1;
            if depth > self.options.max_depth {
                return Err(ParseError::DepthExceeded {
                    limit: self.options.max_depth,
                });
            }
            let group = Group::Argument {
                open: self.offset(rest),
                relative: function == SelectorFunction::Has,
            };
            let (rest, list) = self.selector_list(&rest[1..], group, depth)?;
            return Ok((
                rest,
                SimpleSelector::PseudoClass(PseudoClass::with_selectors(name, list)),
            ));
        }

        if has_argument {
            let (rest, raw) = self.raw_argument(rest)?;
            let pseudo = PseudoClass {
                name,
                argument: Some(PseudoArgument::Raw(raw)),
            };
            return Ok((rest, SimpleSelector::PseudoClass(pseudo)));
        }

        if LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            return Ok((rest, SimpleSelector::PseudoElement(PseudoElement::new(name))));
        }
        Ok((rest, SimpleSelector::PseudoClass(PseudoClass::new(name))))
    }

    /// Consumes `( ... )` without interpreting it. `input` starts at `(`.
    fn raw_argument<'i>(&self, input: &'i str) -> Step<'i, String> {
        let open = self.offset(input);
        let body = &input[1..];
        let base = open + 1;
        match tokens::scan_raw_argument(body) {
            Ok((raw, rest)) => Ok((rest, raw.trim().to_string())),
            Err(RawScanError::Unterminated) => Err(ParseError::UnbalancedGroup { offset: open }),
            Err(RawScanError::UnterminatedQuote(at) | RawScanError::Mismatched(at)) => {
                Err(ParseError::UnbalancedGroup { offset: base + at })
            }
        }
    }
}
