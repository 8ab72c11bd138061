use anyhow::{Context, Result};
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Wire format for an optional coordinate: `[lng, lat] | null`.
pub(crate) mod coord_pair {
    use geo_types::Coord;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Coord>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(|c| [c.x, c.y]).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Coord>, D::Error> {
        let pair = Option::<[f64; 2]>::deserialize(deserializer)?;
        Ok(pair.map(|[x, y]| Coord { x, y }))
    }
}

/// One recorded bicycle-share trip between two stations, with an optional
/// anomaly score computed out-of-band. Field names follow the loader contract
/// (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub start_station: String,
    #[serde(with = "coord_pair")]
    pub start_coords: Option<Coord>,
    pub end_station: String,
    #[serde(with = "coord_pair")]
    pub end_coords: Option<Coord>,
    /// Display-only duration label. Never parsed; `duration_seconds` is the
    /// authoritative value for all averages.
    pub total_duration: String,
    pub duration_seconds: f64,
    /// `None` means no score was computed for this journey, which is distinct
    /// from a low score.
    pub score: Option<f64>,
}

impl Journey {
    pub fn validate(&self) -> Result<()> {
        if self.start_station.is_empty() {
            bail!("startStation must not be empty");
        }
        if self.end_station.is_empty() {
            bail!("endStation must not be empty");
        }
        validate_coord("startCoords", &self.start_coords)?;
        validate_coord("endCoords", &self.end_coords)?;
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            bail!(
                "durationSeconds must be finite and non-negative, got {}",
                self.duration_seconds
            );
        }
        if let Some(score) = self.score {
            if !score.is_finite() {
                bail!("score must be finite when present, got {score}");
            }
        }
        Ok(())
    }

    /// Whether both endpoints are resolved. A line is only constructible when
    /// this holds.
    pub fn has_full_geometry(&self) -> bool {
        self.start_coords.is_some() && self.end_coords.is_some()
    }
}

fn validate_coord(field: &str, coord: &Option<Coord>) -> Result<()> {
    if let Some(c) = coord {
        if !c.x.is_finite() || !c.y.is_finite() {
            bail!("{field} must contain finite numbers, got [{}, {}]", c.x, c.y);
        }
    }
    Ok(())
}

/// An immutable, validated collection of journeys. Constructed once per render
/// pass; everything derived from it (stats, features, render plans) shares that
/// lifetime. A new collection means a new store and a new pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyStore {
    journeys: Vec<Journey>,
}

impl JourneyStore {
    /// Validates every record. The first invalid record aborts construction;
    /// partial acceptance is not permitted.
    pub fn from_journeys(journeys: Vec<Journey>) -> Result<Self> {
        for (i, journey) in journeys.iter().enumerate() {
            journey
                .validate()
                .with_context(|| format!("invalid journey at index {i}"))?;
        }
        Ok(Self { journeys })
    }

    /// Parses a full JSON record sequence and validates it as a whole.
    pub fn from_json(raw: &str) -> Result<Self> {
        let journeys: Vec<Journey> =
            serde_json::from_str(raw).context("journey records do not match the schema")?;
        Self::from_journeys(journeys)
    }

    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Journey> {
        self.journeys.iter()
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }
}
