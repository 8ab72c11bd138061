use anyhow::Result;
use geo_types::Coord;
use serde_json::{json, Value};

use crate::features::{Feature, FeatureCollection};

/// Explicit lifecycle of the external map widget, replacing ambient nullable
/// handles. Attachment is only legal in `Ready`; `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// The widget has not yet signaled that it accepts layers.
    Loading,
    Ready,
    /// Torn down; all attached layers are invalid and no further attachment
    /// calls may be made.
    Disposed,
}

/// Opaque widget configuration, passed through unmodified. The core never
/// interprets the style beyond the paint properties it explicitly sets.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub style_url: String,
    pub center: Coord,
    pub zoom: f64,
    pub access_token: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style_url: "mapbox://styles/mapbox/dark-v11".into(),
            // London
            center: Coord { x: -0.1276, y: 51.5072 },
            zoom: 10.0,
            access_token: String::new(),
        }
    }
}

impl MapConfig {
    pub fn to_json(&self) -> Value {
        json!({
            "style": self.style_url,
            "center": [self.center.x, self.center.y],
            "zoom": self.zoom,
            "accessToken": self.access_token,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Heatmap,
    Circle,
    Line,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Heatmap => "heatmap",
            LayerKind::Circle => "circle",
            LayerKind::Line => "line",
        }
    }
}

/// Layers either read from a shared GeoJSON source attached beforehand or
/// carry a single inline feature.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSource {
    Shared(String),
    Inline(Feature),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
    pub source: LayerSource,
    /// Opaque layout properties (join/cap style). `Null` when unused.
    pub layout: Value,
    /// Opaque paint properties (color, width, opacity, radius).
    pub paint: Value,
}

impl LayerSpec {
    /// The mapbox-style layer object a widget bridge can forward as-is.
    pub fn to_json(&self) -> Value {
        let source = match &self.source {
            LayerSource::Shared(id) => json!(id),
            LayerSource::Inline(feature) => json!({ "type": "geojson", "data": feature }),
        };
        let mut layer = json!({
            "id": self.id,
            "type": self.kind.as_str(),
            "source": source,
            "paint": self.paint,
        });
        if !self.layout.is_null() {
            layer["layout"] = self.layout.clone();
        }
        layer
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: Coord,
    pub color: String,
    pub popup_html: Option<String>,
}

impl MarkerSpec {
    pub fn to_json(&self) -> Value {
        json!({
            "lngLat": [self.position.x, self.position.y],
            "color": self.color,
            "popup": self.popup_html,
        })
    }
}

/// The external interactive map widget. Implementations bridge to the real
/// renderer (a webview, a test double); the pipeline only talks through this
/// trait and checks `state()` before every attachment sequence.
pub trait MapSurface {
    fn state(&self) -> SurfaceState;
    fn add_source(&mut self, id: &str, data: &FeatureCollection) -> Result<()>;
    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()>;
    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()>;
}
