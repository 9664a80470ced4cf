//! Extraction of a chapter -> subtopics mapping from free-form model output.
//!
//! The model is asked for JSON but frequently answers with a Python-style
//! dictionary, or wraps the object in commentary. Extraction takes the first
//! brace-delimited group that contains no nested braces and reads it with
//! `serde_json`. When that fails, a small literal parser handles the Python
//! forms JSON does not allow:
//!
//! - strings in single quotes, with `\xNN` and other backslash escapes
//! - tuples in `(...)`
//! - trailing commas
//!
//! Anything that is not a mapping of strings to sequences of strings is
//! rejected as a whole. A plan is never partially parsed.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::StudyPlan;

static BRACE_GROUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^{}]*\}").expect("BRACE_GROUP_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no brace-delimited mapping found in model output")]
    NoMapping,

    #[error("invalid mapping literal at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
}

/// Result of the structuring phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Structured(StudyPlan),
    Malformed { raw: String, reason: ParseError },
}

impl PlanOutcome {
    pub fn from_model_output(raw: &str) -> Self {
        match extract_study_plan(raw) {
            Ok(plan) => PlanOutcome::Structured(plan),
            Err(reason) => PlanOutcome::Malformed {
                raw: raw.to_string(),
                reason,
            },
        }
    }
}

/// The first `{...}` group without nested braces, if any.
pub fn find_mapping_literal(content: &str) -> Option<&str> {
    BRACE_GROUP_REGEX.find(content).map(|m| m.as_str())
}

pub fn extract_study_plan(content: &str) -> Result<StudyPlan, ParseError> {
    let literal = find_mapping_literal(content).ok_or(ParseError::NoMapping)?;
    match serde_json::from_str::<StudyPlan>(literal) {
        Ok(plan) => Ok(plan),
        Err(e) => {
            log::debug!("Mapping is not strict JSON ({}), trying literal syntax", e);
            LiteralParser::new(literal).parse_mapping()
        }
    }
}

struct LiteralParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError::Syntax {
            offset: self.pos,
            message: message.into(),
        })
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => self.error(format!("expected '{}', found '{}'", expected, c)),
            None => self.error(format!("expected '{}', found end of input", expected)),
        }
    }

    fn parse_mapping(mut self) -> Result<StudyPlan, ParseError> {
        let mut plan = StudyPlan::new();
        self.expect('{')?;

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                break;
            }

            let chapter = self.parse_string()?;
            self.expect(':')?;
            let subtopics = self.parse_string_sequence()?;
            plan.insert(chapter, subtopics);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                Some(c) => return self.error(format!("expected ',' or '}}', found '{}'", c)),
                None => return self.error("unterminated mapping"),
            }
        }

        self.skip_whitespace();
        if self.pos != self.source.len() {
            return self.error("unexpected trailing characters");
        }
        Ok(plan)
    }

    fn parse_string_sequence(&mut self) -> Result<Vec<String>, ParseError> {
        self.skip_whitespace();
        let close = match self.bump() {
            Some('[') => ']',
            Some('(') => ')',
            Some(c) => return self.error(format!("expected a list of subtopics, found '{}'", c)),
            None => return self.error("expected a list of subtopics"),
        };

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }

            items.push(self.parse_string()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(c) => return self.error(format!("expected ',' or '{}', found '{}'", close, c)),
                None => return self.error("unterminated list"),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            Some(c) => return self.error(format!("expected a quoted string, found '{}'", c)),
            None => return self.error("expected a quoted string"),
        };
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return self.error("unterminated string"),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.parse_escape()?),
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, ParseError> {
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('/') => Ok('/'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('x') => match self.parse_hex(2).and_then(char::from_u32) {
                Some(c) => Ok(c),
                None => self.error("invalid \\x escape"),
            },
            Some('u') => self.parse_unicode_escape(),
            Some(c) => self.error(format!("unsupported escape '\\{}'", c)),
            None => self.error("unterminated escape"),
        }
    }

    /// `\uXXXX`, joining a UTF-16 surrogate pair into one character.
    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let Some(high) = self.parse_hex(4) else {
            return self.error("invalid unicode escape");
        };
        if !(0xD800..0xDC00).contains(&high) {
            return match char::from_u32(high) {
                Some(c) => Ok(c),
                None => self.error("invalid unicode escape"),
            };
        }

        if !self.source[self.pos..].starts_with("\\u") {
            return self.error("unpaired surrogate in unicode escape");
        }
        self.pos += 2;
        let low = match self.parse_hex(4) {
            Some(low) if (0xDC00..0xE000).contains(&low) => low,
            _ => return self.error("unpaired surrogate in unicode escape"),
        };
        match char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)) {
            Some(c) => Ok(c),
            None => self.error("invalid unicode escape"),
        }
    }

    fn parse_hex(&mut self, digits: usize) -> Option<u32> {
        let end = self.pos + digits;
        let hex = self.source.get(self.pos..end)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        self.pos = end;
        Some(value)
    }
}
