use anyhow::Result;
use serde_json::json;
use uuid::Uuid;

use crate::aggregate::{self, CollectionScan, StatsSource};
use crate::features::{self, Feature, FeatureCollection};
use crate::journey::{Journey, JourneyStore};

use super::map_surface::{LayerKind, LayerSource, LayerSpec, MapSurface, MarkerSpec, SurfaceState};
use super::style::{classify, Classification, LineRule, MarkerEnds, RenderOptions};

/// Id of the shared GeoJSON source feeding the heat and point layers.
pub const SHARED_SOURCE_ID: &str = "journeys";
const HEAT_LAYER_ID: &str = "journeys-heat";
const POINT_LAYER_ID: &str = "journeys-points";

/// The full set of drawing decisions for one collection, independent of any
/// surface. Layer order is z-order: heat density at the bottom, then the base
/// point layer, then per-journey lines with alert lines above the rest;
/// markers sit on top of everything.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub features: FeatureCollection,
    pub layers: Vec<LayerSpec>,
    pub markers: Vec<MarkerSpec>,
}

impl RenderPlan {
    pub fn new(store: &JourneyStore, options: &RenderOptions) -> Self {
        let stats = CollectionScan::new(store);
        let features = features::feature_collection(store);

        let mut layers = vec![heat_layer(options), point_layer(options)];
        // alert lines go in last so no normal or unscored line occludes them
        let mut alert_lines = Vec::new();
        let mut markers = Vec::new();
        for (idx, journey) in store.iter().enumerate() {
            let classification = classify(journey.score, options.threshold);
            if let Some(layer) = line_layer(idx, journey, classification, options) {
                if classification == Classification::Alert {
                    alert_lines.push(layer);
                } else {
                    layers.push(layer);
                }
            }
            if classification == Classification::Alert {
                markers.extend(alert_markers(journey, options, &stats));
            }
        }
        layers.extend(alert_lines);

        Self {
            features,
            layers,
            markers,
        }
    }
}

fn heat_layer(options: &RenderOptions) -> LayerSpec {
    LayerSpec {
        id: HEAT_LAYER_ID.into(),
        kind: LayerKind::Heatmap,
        source: LayerSource::Shared(SHARED_SOURCE_ID.into()),
        layout: serde_json::Value::Null,
        paint: json!({ "heatmap-opacity": options.heat_opacity }),
    }
}

fn point_layer(options: &RenderOptions) -> LayerSpec {
    LayerSpec {
        id: POINT_LAYER_ID.into(),
        kind: LayerKind::Circle,
        source: LayerSource::Shared(SHARED_SOURCE_ID.into()),
        layout: serde_json::Value::Null,
        paint: json!({
            "circle-radius": options.point_radius,
            "circle-color": options.point_color,
            "circle-opacity": options.point_opacity,
        }),
    }
}

/// Per-journey line, or `None` when the journey fails the line rule. The layer
/// id comes from the sequence index, which is unique within a render pass
/// (unlike a key built from journey fields, which can collide).
fn line_layer(
    idx: usize,
    journey: &Journey,
    classification: Classification,
    options: &RenderOptions,
) -> Option<LayerSpec> {
    let (start, end) = match (&journey.start_coords, &journey.end_coords) {
        (Some(start), Some(end)) => (start, end),
        _ => return None,
    };
    if options.line_rule == LineRule::ScoredOnly && journey.score.is_none() {
        return None;
    }
    Some(LayerSpec {
        id: format!("journey-line-{idx}"),
        kind: LayerKind::Line,
        source: LayerSource::Inline(Feature::line(start, end)),
        layout: json!({ "line-join": "round", "line-cap": "round" }),
        paint: json!({
            "line-color": options.line_color(classification),
            "line-width": options.line_width(classification),
        }),
    })
}

/// Markers for one alert journey. Requires full geometry; journeys with an
/// unresolved endpoint stay out of marker logic regardless of score.
fn alert_markers(
    journey: &Journey,
    options: &RenderOptions,
    stats: &impl StatsSource,
) -> Vec<MarkerSpec> {
    let (start, end) = match (&journey.start_coords, &journey.end_coords) {
        (Some(start), Some(end)) => (start, end),
        _ => return vec![],
    };
    // alert classification implies a score; stated explicitly to keep this total
    let score = match journey.score {
        Some(score) => score,
        None => return vec![],
    };
    let popup = popup_html(journey, score, stats);
    let mut markers = vec![MarkerSpec {
        position: *start,
        color: options.marker_color.clone(),
        popup_html: Some(popup.clone()),
    }];
    if options.marker_ends == MarkerEnds::Both {
        markers.push(MarkerSpec {
            position: *end,
            color: options.marker_color.clone(),
            popup_html: Some(popup),
        });
    }
    markers
}

fn popup_html(journey: &Journey, score: f64, stats: &impl StatsSource) -> String {
    let journey_stats = stats.stats_for(journey);
    format!(
        "<p>Start: {}</p>\n\
         <p>End: {}</p>\n\
         <p>Duration: {}</p>\n\
         <p>Score: {}</p>\n\
         <p>Explanation:</p>\n\
         {}",
        journey.start_station,
        journey.end_station,
        journey.total_duration,
        score,
        aggregate::explanation_html(journey, &journey_stats),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Unbuilt,
    Built,
    /// An attachment call failed partway through. The surface may hold a
    /// partial plan; this pipeline will never touch it again.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub layers: usize,
    pub markers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built(BuildSummary),
    /// The surface has not signaled readiness yet. A precondition to wait on,
    /// not an error; call again when the surface reports `Ready`.
    NotReady,
    /// The surface was torn down; nothing was attached.
    SurfaceDisposed,
    /// This pipeline already ran its attachment sequence, whether it completed
    /// or failed partway. One sequence per pass; make a fresh pipeline (and
    /// surface) to rebuild.
    AlreadyBuilt,
}

/// Owns one immutable collection and attaches its render plan to a surface
/// exactly once. Leaving `Unbuilt` is gated on the surface's readiness signal;
/// `Built` and `Failed` are both terminal, so at most one attachment sequence
/// ever reaches a surface.
pub struct RenderPipeline {
    id: Uuid,
    store: JourneyStore,
    options: RenderOptions,
    state: BuildState,
}

impl RenderPipeline {
    pub fn new(store: JourneyStore, options: RenderOptions) -> Self {
        let id = Uuid::new_v4();
        info!("pipeline {id}: created for {} journeys", store.len());
        Self {
            id,
            store,
            options,
            state: BuildState::Unbuilt,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn store(&self) -> &JourneyStore {
        &self.store
    }

    /// The drawing decisions alone, without touching any surface.
    pub fn plan(&self) -> RenderPlan {
        RenderPlan::new(&self.store, &self.options)
    }

    /// Attaches the full plan (source, layers, markers, in z-order) to the
    /// surface, if the surface is ready and this pipeline has not built yet.
    /// Once ready, the attachment sequence runs synchronously; a surface error
    /// propagates to the caller and moves the pipeline to `Failed`, since the
    /// surface may already hold part of the plan and re-running the sequence
    /// would attach the shared source twice.
    pub fn try_build(&mut self, surface: &mut dyn MapSurface) -> Result<BuildOutcome> {
        if self.state != BuildState::Unbuilt {
            warn!(
                "pipeline {}: `try_build` called again after the attachment sequence ran",
                self.id
            );
            return Ok(BuildOutcome::AlreadyBuilt);
        }
        match surface.state() {
            SurfaceState::Loading => return Ok(BuildOutcome::NotReady),
            SurfaceState::Disposed => {
                warn!("pipeline {}: surface disposed before build", self.id);
                return Ok(BuildOutcome::SurfaceDisposed);
            }
            SurfaceState::Ready => (),
        }

        let plan = self.plan();
        debug!(
            "pipeline {}: attaching {} features, {} layers, {} markers",
            self.id,
            plan.features.features.len(),
            plan.layers.len(),
            plan.markers.len()
        );
        if let Err(err) = attach(surface, &plan) {
            self.state = BuildState::Failed;
            warn!(
                "pipeline {}: attachment failed, surface may hold a partial plan",
                self.id
            );
            return Err(err);
        }

        self.state = BuildState::Built;
        let summary = BuildSummary {
            layers: plan.layers.len(),
            markers: plan.markers.len(),
        };
        info!(
            "pipeline {}: built {} layers and {} markers",
            self.id, summary.layers, summary.markers
        );
        Ok(BuildOutcome::Built(summary))
    }
}

fn attach(surface: &mut dyn MapSurface, plan: &RenderPlan) -> Result<()> {
    surface.add_source(SHARED_SOURCE_ID, &plan.features)?;
    for layer in &plan.layers {
        surface.add_layer(layer)?;
    }
    for marker in &plan.markers {
        surface.add_marker(marker)?;
    }
    Ok(())
}
