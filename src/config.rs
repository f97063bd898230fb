//! Viewer configuration.
//!
//! Where PLY files live and how things look are plain values handed to the code that
//! needs them; nothing here resolves paths on its own or reads the environment.

use std::path::PathBuf;
use serde::{ de, Deserialize, Deserializer, Serialize };
use serde_json::Value;

use crate::projection::CanvasSize;
use crate::render::RenderStyle;

/// Settings of a viewer.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// # use plyview::config::ViewerConfig;
/// let config = ViewerConfig::from_json_str(r#"{ "ply_dir": "scans" }"#).unwrap();
/// assert_eq!(config.ply_dir, std::path::PathBuf::from("scans"));
/// assert_eq!(config.canvas.width, 300.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Folder holding the `.ply` files offered for loading.
    pub ply_dir: PathBuf,
    /// Canvas size used until the UI reports a real one.
    pub canvas: CanvasSize,
    /// Style of the point cloud view. Missing fields come from [`RenderStyle::point_cloud`].
    #[serde(deserialize_with = "point_style")]
    pub point_style: RenderStyle,
    /// Style of the measurement view.
    pub measurement_style: RenderStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            ply_dir: PathBuf::from("ply"),
            canvas: CanvasSize::new(300.0, 300.0),
            point_style: RenderStyle::point_cloud(),
            measurement_style: RenderStyle::measurements(),
        }
    }
}

impl ViewerConfig {
    /// Reads a configuration from JSON.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn point_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RenderStyle, D::Error> {
    let fields = Value::deserialize(deserializer)?;
    let merged = match (serde_json::to_value(RenderStyle::point_cloud()), fields) {
        (Ok(Value::Object(mut base)), Value::Object(fields)) => {
            base.extend(fields);
            Value::Object(base)
        }
        (_, other) => other,
    };
    serde_json::from_value(merged).map_err(de::Error::custom)
}
