use pedigree_layout::{LayoutDump, PedigreeConfig, layout_from_str, parse_config};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PedigreeLayoutOptions {
    /// Partial geometry overrides, same keys as the CLI config file.
    config: Option<serde_json::Value>,
    depth: Option<i32>,
}

fn build_config(options: PedigreeLayoutOptions) -> Result<PedigreeConfig, String> {
    let mut config = match options.config {
        Some(raw) => parse_config(&raw.to_string()).map_err(|error| error.to_string())?,
        None => PedigreeConfig::default(),
    };
    if let Some(depth) = options.depth {
        config.depth = depth;
    }
    Ok(config)
}

fn layout_json(relations: &str, options: PedigreeLayoutOptions) -> Result<String, String> {
    let config = build_config(options)?;
    let layout = layout_from_str(relations, &config).map_err(|error| error.to_string())?;
    serde_json::to_string(&LayoutDump::from_layout(&layout, &config))
        .map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_pedigree(
    relations_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<PedigreeLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        PedigreeLayoutOptions::default()
    };

    layout_json(relations_json, options).map_err(|error| JsValue::from_str(&error))
}
