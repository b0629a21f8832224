use log::{Level, info};
use openapi_flow::{Config, RenderModel, Session, visualize};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowOptions {
    direction: Option<String>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    horizontal_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    grouping_depth: Option<usize>,
    lenient_json: Option<bool>,
}

fn build_config(options: FlowOptions) -> Result<Config, String> {
    let mut config = Config::default();

    if let Some(direction) = options.direction.as_deref() {
        config.layout.direction = openapi_flow::config::Direction::from_token(direction)
            .ok_or_else(|| format!("unsupported layout direction `{direction}`"))?;
    }
    if let Some(width) = options.node_width {
        config.layout.node_width = width;
    }
    if let Some(height) = options.node_height {
        config.layout.node_height = height;
    }
    if let Some(spacing) = options.horizontal_spacing {
        config.layout.horizontal_spacing = spacing;
    }
    if let Some(spacing) = options.vertical_spacing {
        config.layout.vertical_spacing = spacing;
    }
    if let Some(depth) = options.grouping_depth {
        config.grouping.depth = depth;
    }
    if let Some(lenient) = options.lenient_json {
        config.parse.lenient_json = lenient;
    }

    config.validate().map_err(|error| error.to_string())?;
    Ok(config)
}

fn parse_options(options_json: Option<String>) -> Result<Config, String> {
    let options = match options_json {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str::<FlowOptions>(&raw).map_err(|error| error.to_string())?
        }
        _ => FlowOptions::default(),
    };
    build_config(options)
}

fn render_json(code: &str, config: &Config) -> Result<String, String> {
    let visualization = visualize(code, config);
    RenderModel::from_visualization(&visualization)
        .to_json_string()
        .map_err(|error| error.to_string())
}

/// Initialize console logging for the WASM target.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Debug);
    info!("openapi-flow: logging initialized");
}

/// Render model JSON (`{nodes, edges, diagnostic?}`) for one document text.
/// Document problems are reported through `diagnostic`; only invalid
/// options are raised as errors.
#[wasm_bindgen]
pub fn visualize_openapi(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    render_json(code, &config).map_err(|error| JsValue::from_str(&error))
}

/// Editor-bound session that only ever exposes the result of the most
/// recently submitted text.
#[wasm_bindgen]
pub struct FlowSession {
    inner: Session,
}

#[wasm_bindgen]
impl FlowSession {
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<FlowSession, JsValue> {
        let config = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
        Ok(FlowSession {
            inner: Session::new(config),
        })
    }

    /// Recomputes the graph for `code`; returns the published render model,
    /// or `undefined` if a newer text overtook this one.
    pub fn update(&self, code: &str) -> Result<Option<String>, JsValue> {
        let Some(published) = self.inner.update(code) else {
            return Ok(None);
        };
        RenderModel::from_visualization(&published)
            .to_json_string()
            .map(Some)
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    pub fn current(&self) -> Result<String, JsValue> {
        RenderModel::from_visualization(&self.inner.current())
            .to_json_string()
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }
}
