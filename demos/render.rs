//! Renders a synthetic journey collection against a stdout-backed surface,
//! simulating the widget's deferred readiness signal.

use anyhow::Result;
use geo_types::Coord;
use log::info;
use rand::Rng;
use simplelog::LevelFilter;

use ridelens_core::features::FeatureCollection;
use ridelens_core::insights::CollectionInsights;
use ridelens_core::journey::{Journey, JourneyStore};
use ridelens_core::renderer::map_surface::{LayerSpec, MarkerSpec};
use ridelens_core::renderer::{
    BuildOutcome, MapConfig, MapSurface, RenderOptions, RenderPipeline, SurfaceState,
};

const STATIONS: &[(&str, f64, f64)] = &[
    ("Hyde Park Corner", -0.1527, 51.5027),
    ("Soho Square", -0.1321, 51.5156),
    ("Waterloo Station", -0.1132, 51.5036),
    ("Broadgate", -0.0820, 51.5194),
    ("Albert Gate", -0.1587, 51.5023),
];

fn synthetic_journeys(count: usize) -> Vec<Journey> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let (start_name, start_x, start_y) = STATIONS[rng.random_range(0..STATIONS.len())];
            let (end_name, end_x, end_y) = STATIONS[rng.random_range(0..STATIONS.len())];
            let duration_seconds = rng.random_range(120.0..5400.0);
            let score = if rng.random_bool(0.9) {
                Some(rng.random_range(0.0..1.0))
            } else {
                None
            };
            Journey {
                start_station: start_name.into(),
                start_coords: Some(Coord { x: start_x, y: start_y }),
                end_station: end_name.into(),
                end_coords: Some(Coord { x: end_x, y: end_y }),
                total_duration: format!("{:.0}m", duration_seconds / 60.0),
                duration_seconds,
                score,
            }
        })
        .collect()
}

/// Prints everything a real widget bridge would receive.
struct StdoutSurface {
    state: SurfaceState,
}

impl MapSurface for StdoutSurface {
    fn state(&self) -> SurfaceState {
        self.state
    }

    fn add_source(&mut self, id: &str, data: &FeatureCollection) -> Result<()> {
        println!("source {id}: {} features", data.features.len());
        Ok(())
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()> {
        println!("layer: {}", layer.to_json());
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()> {
        println!("marker: {}", marker.to_json());
        Ok(())
    }
}

fn main() -> Result<()> {
    ridelens_core::logs::init(LevelFilter::Info)?;

    let store = JourneyStore::from_journeys(synthetic_journeys(200))?;
    let insights = CollectionInsights::compute(&store);
    info!(
        "{} journeys, busiest start station: {:?}",
        insights.total, insights.most_common_start
    );

    let config = MapConfig::default();
    println!("map config: {}", config.to_json());

    let mut pipeline = RenderPipeline::new(store, RenderOptions::default());
    let mut surface = StdoutSurface {
        state: SurfaceState::Loading,
    };

    // before the widget's load event nothing may be attached
    assert_eq!(pipeline.try_build(&mut surface)?, BuildOutcome::NotReady);

    // the widget signals readiness
    surface.state = SurfaceState::Ready;
    match pipeline.try_build(&mut surface)? {
        BuildOutcome::Built(summary) => {
            info!("built {} layers, {} markers", summary.layers, summary.markers)
        }
        other => bail_outcome(other),
    }
    Ok(())
}

fn bail_outcome(outcome: BuildOutcome) -> ! {
    panic!("unexpected build outcome: {outcome:?}");
}
