//! Parse module - the textual tag grammar.
//!
//! Grammar accepted:
//! - `Name` or `Name(arg1,arg2,...)` - a fact
//! - `@Name(...)` - a recommendation
//! - `in1 in2 -> out1 out2` - a rule; `OR` splits the input side into
//!   groups, each producing its own rule over the shared outputs
//! - an optional trailing `NN%` sets the confidence
//! - `{...}` braces around a rule are accepted, so displayed tags parse back
//!
//! Argument tokens contain no spaces. A token of `?` or `*`, or starting
//! with `&`, is a variable; a leading `!` negates; an integer tail after
//! `=`, `>`, or `<` makes a numeric comparison; an integer alone is a bare
//! numeric; anything else is a string.

use thiserror::Error;

use crate::argument::{Argument, NumericOp};
use crate::tags::{Fact, Predicate, Recommendation, Rule, Tag};

/// Failure to read a tag from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty tag text")]
    Empty,

    #[error("unbalanced parentheses in `{0}`")]
    UnbalancedParens(String),

    #[error("missing predicate name in `{0}`")]
    MissingName(String),

    #[error("rule `{0}` is missing an input or output side")]
    IncompleteRule(String),

    #[error("invalid confidence suffix `{0}`")]
    InvalidConfidence(String),
}

/// Parse any tag text. Rule text yields one tag per `OR` input group;
/// predicate text yields exactly one.
pub fn parse_tags(text: &str) -> Result<Vec<Tag>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if find_rule_separator(trimmed).is_some() {
        return Ok(parse_rules(trimmed)?.into_iter().map(Tag::Rule).collect());
    }
    Ok(vec![parse_predicate(trimmed)?.into_tag()])
}

/// Parse a fact or recommendation, with an optional trailing `NN%`.
pub fn parse_predicate(text: &str) -> Result<Predicate, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let (body, confidence) = split_confidence(trimmed)?;
    let (body, is_recommendation) = match body.strip_prefix('@') {
        Some(stripped) => (stripped, true),
        None => (body, false),
    };

    let (name, inner) = match body.find('(') {
        Some(open) => {
            let Some(inner) = body[open + 1..].strip_suffix(')') else {
                return Err(ParseError::UnbalancedParens(trimmed.to_string()));
            };
            (&body[..open], inner)
        }
        None => {
            if body.contains(')') {
                return Err(ParseError::UnbalancedParens(trimmed.to_string()));
            }
            (body, "")
        }
    };
    if name.is_empty() {
        return Err(ParseError::MissingName(trimmed.to_string()));
    }

    let arguments = inner
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_argument);

    let mut fact = Fact::new(name).with_arguments(arguments);
    if let Some(confidence) = confidence {
        fact = fact.with_confidence(confidence);
    }

    Ok(if is_recommendation {
        Predicate::Recommendation(Recommendation(fact))
    } else {
        Predicate::Fact(fact)
    })
}

/// Parse rule text. `OR` on the input side yields one rule per group, all
/// sharing the output set. Braces and a trailing `NN%` are accepted.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let body = match trimmed.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        Some(inner) => inner.trim(),
        None => trimmed,
    };

    let Some(separator) = find_rule_separator(body) else {
        return Err(ParseError::IncompleteRule(trimmed.to_string()));
    };
    let inputs_text = &body[..separator];
    let outputs_text = &body[separator + 2..];

    let (outputs_text, confidence) = split_confidence(outputs_text.trim())?;

    let outputs: Vec<Predicate> = outputs_text
        .split_whitespace()
        .map(parse_predicate)
        .collect::<Result<_, _>>()?;

    let mut rules = Vec::new();
    for group in inputs_text.split(" OR ") {
        let inputs: Vec<Fact> = group
            .split_whitespace()
            .map(|token| Ok(parse_predicate(token)?.as_fact().clone()))
            .collect::<Result<_, ParseError>>()?;
        if inputs.is_empty() || outputs.is_empty() {
            return Err(ParseError::IncompleteRule(trimmed.to_string()));
        }

        let mut rule = Rule::new(inputs, outputs.clone());
        if let Some(confidence) = confidence {
            rule = rule.with_confidence(confidence);
        }
        rules.push(rule);
    }

    Ok(rules)
}

/// Classify one argument token. Every token yields an argument; the string
/// form is the fallback.
pub fn parse_argument(token: &str) -> Argument {
    match token {
        "?" => return Argument::match_one(),
        "*" => return Argument::match_all(),
        _ => {}
    }
    if let Some(name) = token.strip_prefix('&') {
        if !name.is_empty() {
            return Argument::variable(name);
        }
    }

    let (body, negated) = match token.strip_prefix('!') {
        Some(stripped) => (stripped, true),
        None => (token, false),
    };

    let argument = classify_body(body);
    if negated {
        argument.negate()
    } else {
        argument
    }
}

fn classify_body(body: &str) -> Argument {
    if let Ok(value) = body.parse::<i64>() {
        return Argument::int(value);
    }

    if let Some(at) = body.find(['=', '>', '<']) {
        let name = &body[..at];
        let operator = body.as_bytes()[at];
        let tail = &body[at + 1..];

        if let Ok(value) = tail.parse::<i64>() {
            let op = match operator {
                b'>' => NumericOp::Gt,
                b'<' => NumericOp::Lt,
                _ => NumericOp::Eq,
            };
            return Argument::numeric(name, op, value);
        }
        // Only `=` makes a labelled string; comparison operators with a
        // non-integer tail fall back to the whole token.
        if operator == b'=' {
            return Argument::labelled(name, tail);
        }
    }

    Argument::string(body)
}

/// Byte offset of the first `->` or `=>` outside parentheses, if any.
fn find_rule_separator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for at in 0..bytes.len().saturating_sub(1) {
        match bytes[at] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'-' | b'=' if depth == 0 && bytes[at + 1] == b'>' => return Some(at),
            _ => {}
        }
    }
    None
}

/// Strip an optional trailing `NN%` token, returning the remainder and the
/// confidence as a fraction.
fn split_confidence(text: &str) -> Result<(&str, Option<f64>), ParseError> {
    let Some(last) = text.split_whitespace().last() else {
        return Ok((text, None));
    };
    let Some(digits) = last.strip_suffix('%') else {
        return Ok((text, None));
    };
    let value: i64 = digits
        .parse()
        .map_err(|_| ParseError::InvalidConfidence(last.to_string()))?;
    let body = text[..text.len() - last.len()].trim_end();
    Ok((body, Some(value as f64 / 100.0)))
}
