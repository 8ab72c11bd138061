/// Minimum anomaly score considered anomalous. Strictly above this value a
/// journey is classified as an alert.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 0.76;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Score present and strictly above the threshold.
    Alert,
    /// Score present, at or below the threshold.
    Normal,
    /// No score was computed. Never an alert, regardless of the threshold.
    Unscored,
}

pub fn classify(score: Option<f64>, threshold: f64) -> Classification {
    match score {
        None => Classification::Unscored,
        Some(score) if score > threshold => Classification::Alert,
        Some(_) => Classification::Normal,
    }
}

/// Which journeys get a per-journey line (geometry is always required).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    /// Any journey with both endpoints resolved; unscored journeys are drawn
    /// in the unscored color.
    AllWithGeometry,
    /// The stricter variant: a score must be present as well.
    ScoredOnly,
}

/// Where alert markers are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEnds {
    StartOnly,
    Both,
}

/// Threshold-based styling rules for one render pass. One explicit rule-set
/// with named options instead of several implicit drafts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub threshold: f64,
    pub alert_color: String,
    pub normal_color: String,
    pub unscored_color: String,
    pub marker_color: String,
    pub point_color: String,
    pub alert_line_width: f64,
    pub normal_line_width: f64,
    pub heat_opacity: f64,
    pub point_radius: f64,
    pub point_opacity: f64,
    pub line_rule: LineRule,
    pub marker_ends: MarkerEnds,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ANOMALY_THRESHOLD,
            alert_color: "red".into(),
            normal_color: "green".into(),
            unscored_color: "orange".into(),
            marker_color: "red".into(),
            point_color: "blue".into(),
            alert_line_width: 2.0,
            normal_line_width: 1.0,
            heat_opacity: 0.25,
            point_radius: 5.0,
            point_opacity: 0.5,
            line_rule: LineRule::ScoredOnly,
            marker_ends: MarkerEnds::StartOnly,
        }
    }
}

impl RenderOptions {
    pub fn line_color(&self, classification: Classification) -> &str {
        match classification {
            Classification::Alert => &self.alert_color,
            Classification::Normal => &self.normal_color,
            Classification::Unscored => &self.unscored_color,
        }
    }

    pub fn line_width(&self, classification: Classification) -> f64 {
        if classification == Classification::Alert {
            self.alert_line_width
        } else {
            self.normal_line_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundary_is_strict() {
        let threshold = DEFAULT_ANOMALY_THRESHOLD;
        assert_eq!(classify(Some(threshold), threshold), Classification::Normal);
        assert_eq!(
            classify(Some(threshold + 1e-9), threshold),
            Classification::Alert
        );
        assert_eq!(
            classify(Some(threshold - 1e-9), threshold),
            Classification::Normal
        );
    }

    #[test]
    fn missing_score_is_never_an_alert() {
        assert_eq!(classify(None, 0.76), Classification::Unscored);
        assert_eq!(classify(None, f64::MIN), Classification::Unscored);
    }

    #[test]
    fn zero_score_is_scored() {
        // a score of 0.0 is a real (low) score, not "unscored"
        assert_eq!(classify(Some(0.0), 0.76), Classification::Normal);
    }
}
