//! parse document with structure like "title1 key1: value1 key2: value2 title2 key3: value3" which has titles
//! and key-value pairs, one pair per line. Lines starting with //, # or % are comments.
use crate::symbolic::symbolic_error::SymbolicError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, SettingValue>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl SettingValue {
    /// Try parsing as different types in order
    fn from_token(token: &str) -> SettingValue {
        let token = token.trim();
        if let Ok(val) = token.parse::<i64>() {
            SettingValue::Integer(val)
        } else if let Ok(val) = token.parse::<f64>() {
            SettingValue::Float(val)
        } else if let Ok(val) = token.parse::<bool>() {
            SettingValue::Boolean(val)
        } else {
            SettingValue::String(token.to_string())
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            SettingValue::Integer(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let SettingValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::String(s) => write!(f, "{}", s),
            SettingValue::Float(val) => write!(f, "{}", val),
            SettingValue::Integer(val) => write!(f, "{}", val),
            SettingValue::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// Parses a title or a key (word characters without spaces)
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

fn parse_value(input: &str) -> IResult<&str, SettingValue> {
    // everything up to the end of the line or a semicolon
    let value_parser = take_while1(|c: char| !matches!(c, ' ' | '\t' | '\r' | '\n' | ';'));
    map(value_parser, SettingValue::from_token).parse(input)
}

/// Parses a key-value pair
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, SettingValue)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    separated_pair(parse_identifier, colon_separator, parse_value).parse(input)
}

/// Parses a section with a title and multiple key-value pairs
fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, _) = multispace0(input)?;
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let separator = (space0, many0(tag(";")), multispace0);
    let (input, pairs) = many1(terminated(parse_key_value_pair, separator)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Filters out comment lines (starting with //, #, or %)
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a map title -> (key -> value)
pub fn parse_settings_document(input: &str) -> Result<DocumentMap, SymbolicError> {
    let filtered = filter_comments(input);
    let mut parser = terminated(many1(parse_section), multispace0);
    match parser.parse(filtered.as_str()) {
        Ok(("", sections)) => Ok(sections.into_iter().collect()),
        Ok((rest, _)) => Err(SymbolicError::InvalidSetting {
            key: "document".to_string(),
            value: rest.to_string(),
        }),
        Err(e) => Err(SymbolicError::InvalidSetting {
            key: "document".to_string(),
            value: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_sections() {
        let document = concat!(
            "solver\nmax_depth: 12\nrecord_trace: true\n\n",
            "// comment\noutput\nloglevel: warn\nratio: 0.5\n"
        );
        let parsed = parse_settings_document(document).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["solver"]["max_depth"], SettingValue::Integer(12));
        assert_eq!(parsed["solver"]["record_trace"], SettingValue::Boolean(true));
        assert_eq!(
            parsed["output"]["loglevel"],
            SettingValue::String("warn".to_string())
        );
        assert_eq!(parsed["output"]["ratio"].as_float(), Some(0.5));
    }

    #[test]
    fn test_values_on_one_line() {
        let document = "solver max_depth: 3; max_rewrite_iterations: 50";
        let parsed = parse_settings_document(document).unwrap();
        assert_eq!(parsed["solver"]["max_depth"].as_usize(), Some(3));
        assert_eq!(parsed["solver"]["max_rewrite_iterations"].as_usize(), Some(50));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_settings_document("max_depth 12 ::").is_err());
        assert!(parse_settings_document("").is_err());
    }
}
