#![allow(dead_code)]

use anyhow::{bail, Result};
use geo_types::Coord;

use ridelens_core::features::FeatureCollection;
use ridelens_core::journey::Journey;
use ridelens_core::renderer::map_surface::{LayerSpec, MapSurface, MarkerSpec, SurfaceState};

/// A fake map widget that records every attachment call and rejects calls made
/// while it is not ready.
pub struct RecordingSurface {
    pub state: SurfaceState,
    pub sources: Vec<(String, FeatureCollection)>,
    pub layers: Vec<LayerSpec>,
    pub markers: Vec<MarkerSpec>,
}

impl RecordingSurface {
    pub fn new(state: SurfaceState) -> Self {
        Self {
            state,
            sources: vec![],
            layers: vec![],
            markers: vec![],
        }
    }

    pub fn ready() -> Self {
        Self::new(SurfaceState::Ready)
    }

    pub fn is_untouched(&self) -> bool {
        self.sources.is_empty() && self.layers.is_empty() && self.markers.is_empty()
    }

    fn check_ready(&self) -> Result<()> {
        if self.state != SurfaceState::Ready {
            bail!("attachment call on a surface in state {:?}", self.state);
        }
        Ok(())
    }
}

impl MapSurface for RecordingSurface {
    fn state(&self) -> SurfaceState {
        self.state
    }

    fn add_source(&mut self, id: &str, data: &FeatureCollection) -> Result<()> {
        self.check_ready()?;
        self.sources.push((id.to_string(), data.clone()));
        Ok(())
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()> {
        self.check_ready()?;
        self.layers.push(layer.clone());
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()> {
        self.check_ready()?;
        self.markers.push(marker.clone());
        Ok(())
    }
}

pub fn coord(x: f64, y: f64) -> Option<Coord> {
    Some(Coord { x, y })
}

pub fn journey(
    start_station: &str,
    end_station: &str,
    start_coords: Option<Coord>,
    end_coords: Option<Coord>,
    duration_seconds: f64,
    score: Option<f64>,
) -> Journey {
    Journey {
        start_station: start_station.into(),
        start_coords,
        end_station: end_station.into(),
        end_coords,
        total_duration: format!("{}m", (duration_seconds / 60.0).round()),
        duration_seconds,
        score,
    }
}
