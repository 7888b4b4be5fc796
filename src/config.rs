use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry parameters for one layout run.
///
/// All values are plain numbers in abstract layout units (one unit is one
/// pixel at the defaults). The engine only reads these; it never touches a
/// drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PedigreeConfig {
    /// Number of ancestor generations to stack above the proband (parents = 1).
    pub depth: i32,
    pub obj_height: f32,
    pub obj_width: f32,
    /// Corner radius used by renderers for female shapes; layout ignores it.
    pub obj_radius: f32,
    pub x_spacing: f32,
    pub y_spacing: f32,
    pub top_margin: f32,
    pub left_margin: f32,
    pub paper_width: f32,
    pub paper_height: f32,
}

impl Default for PedigreeConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            obj_height: 60.0,
            obj_width: 60.0,
            obj_radius: 30.0,
            x_spacing: 50.0,
            y_spacing: 30.0,
            top_margin: 0.0,
            left_margin: 0.0,
            paper_width: 600.0,
            paper_height: 400.0,
        }
    }
}

impl PedigreeConfig {
    /// Horizontal footprint of one person: width plus spacing.
    pub fn slot(&self) -> f32 {
        self.obj_width + self.x_spacing
    }

    /// Vertical distance between the tops of two adjacent generations.
    pub fn generation(&self) -> f32 {
        self.obj_height + self.y_spacing * 2.0
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val as f32),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }

    fn as_i32(&self) -> Option<i32> {
        match self {
            NumberOrString::Number(val) if val.fract() == 0.0 => Some(*val as i32),
            NumberOrString::Number(_) => None,
            NumberOrString::String(val) => val.trim().parse::<i32>().ok(),
        }
    }
}

/// On-disk shape of a configuration file. Every key is optional and numbers
/// may be written as strings (`"60"`), the way hand-edited configs often are.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    depth: Option<NumberOrString>,
    obj_height: Option<NumberOrString>,
    obj_width: Option<NumberOrString>,
    obj_radius: Option<NumberOrString>,
    x_spacing: Option<NumberOrString>,
    y_spacing: Option<NumberOrString>,
    top_margin: Option<NumberOrString>,
    left_margin: Option<NumberOrString>,
    paper_width: Option<NumberOrString>,
    paper_height: Option<NumberOrString>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<PedigreeConfig> {
    let Some(path) = path else {
        return Ok(PedigreeConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<PedigreeConfig> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = PedigreeConfig::default();

    if let Some(v) = parsed.depth.as_ref() {
        config.depth = v
            .as_i32()
            .ok_or_else(|| anyhow::anyhow!("depth must be an integer"))?;
    }
    let numbers: [(&str, Option<&NumberOrString>, &mut f32); 9] = [
        ("objHeight", parsed.obj_height.as_ref(), &mut config.obj_height),
        ("objWidth", parsed.obj_width.as_ref(), &mut config.obj_width),
        ("objRadius", parsed.obj_radius.as_ref(), &mut config.obj_radius),
        ("xSpacing", parsed.x_spacing.as_ref(), &mut config.x_spacing),
        ("ySpacing", parsed.y_spacing.as_ref(), &mut config.y_spacing),
        ("topMargin", parsed.top_margin.as_ref(), &mut config.top_margin),
        ("leftMargin", parsed.left_margin.as_ref(), &mut config.left_margin),
        ("paperWidth", parsed.paper_width.as_ref(), &mut config.paper_width),
        ("paperHeight", parsed.paper_height.as_ref(), &mut config.paper_height),
    ];
    for (key, value, slot) in numbers {
        if let Some(value) = value {
            *slot = value
                .as_f32()
                .ok_or_else(|| anyhow::anyhow!("{key} must be a number"))?;
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PedigreeConfig::default();
        assert_eq!(config.depth, 3);
        assert_eq!(config.slot(), 110.0);
        assert_eq!(config.generation(), 120.0);
        assert_eq!(config.paper_width, 600.0);
        assert_eq!(config.paper_height, 400.0);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config(r#"{ "objWidth": 40, "xSpacing": "20", "depth": 2 }"#).unwrap();
        assert_eq!(config.obj_width, 40.0);
        assert_eq!(config.x_spacing, 20.0);
        assert_eq!(config.depth, 2);
        assert_eq!(config.obj_height, 60.0);
        assert_eq!(config.slot(), 60.0);
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(parse_config(r#"{ "objWidth": "wide" }"#).is_err());
        assert!(parse_config(r#"{ "depth": 1.5 }"#).is_err());
    }

    #[test]
    fn serde_uses_camel_case_keys() {
        let value = serde_json::to_value(PedigreeConfig::default()).unwrap();
        assert_eq!(value["objWidth"], 60.0);
        assert_eq!(value["ySpacing"], 30.0);
        let back: PedigreeConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, PedigreeConfig::default());
    }
}
