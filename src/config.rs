use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "top-to-bottom", alias = "TB", alias = "TD")]
    TopToBottom,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top-to-bottom" | "TB" | "TD" => Some(Self::TopToBottom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseConfig {
    /// Retry failed JSON input as JSON5 (comments, trailing commas).
    pub lenient_json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupingConfig {
    /// Leading path segments that make up a group key.
    pub depth: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self { depth: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_width: f32,
    pub node_height: f32,
    #[serde(alias = "nodeSpacing")]
    pub horizontal_spacing: f32,
    #[serde(alias = "rankSpacing")]
    pub vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            node_width: 200.0,
            node_height: 50.0,
            horizontal_spacing: 50.0,
            vertical_spacing: 50.0,
        }
    }
}

impl LayoutConfig {
    pub fn column_step(&self) -> f32 {
        self.node_width + self.horizontal_spacing
    }

    pub fn rank_step(&self) -> f32 {
        self.node_height + self.vertical_spacing
    }

    /// Box sizes must be finite and positive, spacings finite and not
    /// negative; anything else would leave nodes without real coordinates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("nodeWidth", self.node_width), ("nodeHeight", self.node_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        for (field, value) in [
            ("horizontalSpacing", self.horizontal_spacing),
            ("verticalSpacing", self.vertical_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub parse: ParseConfig,
    pub grouping: GroupingConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid options JSON: {0}")]
    Json(String),
    #[error("{field} must be a finite number greater than zero")]
    NonPositive { field: &'static str },
    #[error("{field} must be a finite, non-negative number")]
    Negative { field: &'static str },
    #[error("grouping depth must be at least 1")]
    ZeroDepth,
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        if self.grouping.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

/// Builds a [`Config`] from an options JSON string; `None` or a blank string
/// yields the defaults.
pub fn load_config(options: Option<&str>) -> Result<Config, ConfigError> {
    let Some(raw) = options.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(Config::default());
    };
    let config: Config = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
}
