use crate::config::ParseConfig;
use crate::document::Document;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    pub fn detect(input: &str) -> Self {
        if input.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Json => f.write_str("JSON"),
            SourceFormat::Yaml => f.write_str("YAML"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {format} syntax: {message}")]
pub struct ParseError {
    pub format: SourceFormat,
    pub message: String,
    /// 1-based line and column, when the underlying parser reports one.
    pub location: Option<(usize, usize)>,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        let location = (err.line() > 0).then(|| (err.line(), err.column()));
        Self {
            format: SourceFormat::Json,
            message: err.to_string(),
            location,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location().map(|loc| (loc.line(), loc.column()));
        Self {
            format: SourceFormat::Yaml,
            message: err.to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Blank input. Callers show the empty state instead of an error.
    Empty,
    Document(Document),
}

impl Parsed {
    pub fn into_document(self) -> Option<Document> {
        match self {
            Parsed::Empty => None,
            Parsed::Document(document) => Some(document),
        }
    }
}

pub fn parse(input: &str) -> Result<Parsed, ParseError> {
    parse_with_config(input, &ParseConfig::default())
}

pub fn parse_with_config(input: &str, config: &ParseConfig) -> Result<Parsed, ParseError> {
    if input.trim().is_empty() {
        return Ok(Parsed::Empty);
    }
    let document = match SourceFormat::detect(input) {
        SourceFormat::Json => parse_json(input, config.lenient_json)?,
        SourceFormat::Yaml => serde_yaml::from_str::<Document>(input)?,
    };
    Ok(Parsed::Document(document))
}

fn parse_json(input: &str, lenient: bool) -> Result<Document, ParseError> {
    match serde_json::from_str::<Document>(input) {
        Ok(document) => Ok(document),
        Err(strict_err) => {
            if lenient {
                if let Ok(document) = json5::from_str::<Document>(input) {
                    log::debug!("accepted document through JSON5 fallback");
                    return Ok(document);
                }
            }
            Err(strict_err.into())
        }
    }
}
