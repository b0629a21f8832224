use crate::document::{Document, PathItem, Paths};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid OpenAPI document: missing `info`")]
    MissingInfo,
    #[error("invalid OpenAPI document: missing `paths` mapping")]
    MissingPaths,
}

/// A document that has both `info` and a `paths` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDocument {
    pub title: String,
    pub paths: Vec<PathItem>,
}

pub fn validate(document: Document) -> Result<ValidDocument, ValidationError> {
    let info = document.info.ok_or(ValidationError::MissingInfo)?;
    let paths = match document.paths {
        Some(Paths::Mapping(items)) => items,
        Some(Paths::NotMapping(kind)) => {
            log::warn!("`paths` is a {kind}, expected a mapping");
            return Err(ValidationError::MissingPaths);
        }
        None => return Err(ValidationError::MissingPaths),
    };
    let title = info
        .title
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    Ok(ValidDocument { title, paths })
}
