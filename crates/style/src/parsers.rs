//! nom parsers for inline CSS declaration lists.
//!
//! This is the inverse of [`Cfg::to_css_string`]: `"text-align: right; color: red"`
//! becomes a config with keys `text_align` and `color`, so styles copied from a
//! stylesheet can be fed into a block's cascading configuration.

use crate::cfg::Cfg;
use crate::error::CfgError;
use nom::IResult;
use nom::Parser;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::multi::separated_list0;
use nom::sequence::{delimited, separated_pair, terminated};

fn property_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse(input)
}

fn property_value(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ';').parse(input)
}

fn declaration(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        delimited(multispace0, property_name, multispace0),
        char(':'),
        property_value,
    )
    .parse(input)
}

fn declarations(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    terminated(
        separated_list0(char(';'), declaration),
        (multispace0, opt(char(';')), multispace0),
    )
    .parse(input)
}

/// Parses `name: value; ...` into a [`Cfg`]. Dashes in names become underscores;
/// values are kept as trimmed strings.
pub fn parse_css_declarations(input: &str) -> Result<Cfg, CfgError> {
    let (_, pairs) = all_consuming(declarations)
        .parse(input)
        .map_err(|e| CfgError::Parse(e.to_string()))?;

    let mut cfg = Cfg::new();
    for (name, raw_value) in pairs {
        let value = raw_value.trim();
        if value.is_empty() {
            return Err(CfgError::InvalidValue {
                property: name.to_string(),
                value: raw_value.to_string(),
            });
        }
        cfg.insert(name.replace('-', "_"), value);
    }
    Ok(cfg)
}
