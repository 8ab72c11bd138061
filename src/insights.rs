use std::collections::HashMap;

use itertools::{Itertools, MinMaxResult};

use crate::journey::{Journey, JourneyStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationFrequency {
    pub station: String,
    pub count: usize,
}

/// Collection-wide summary: duration extremes and station frequency extremes.
/// All fields are `None` on an empty store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionInsights {
    pub total: usize,
    pub shortest: Option<Journey>,
    pub longest: Option<Journey>,
    pub most_common_start: Option<StationFrequency>,
    pub least_common_start: Option<StationFrequency>,
    pub most_common_end: Option<StationFrequency>,
    pub least_common_end: Option<StationFrequency>,
}

impl CollectionInsights {
    pub fn compute(store: &JourneyStore) -> Self {
        let (shortest, longest) = match store
            .iter()
            .minmax_by(|a, b| a.duration_seconds.total_cmp(&b.duration_seconds))
        {
            MinMaxResult::NoElements => (None, None),
            MinMaxResult::OneElement(only) => (Some(only.clone()), Some(only.clone())),
            MinMaxResult::MinMax(min, max) => (Some(min.clone()), Some(max.clone())),
        };

        let start_counts = store.iter().map(|j| j.start_station.as_str()).counts();
        let end_counts = store.iter().map(|j| j.end_station.as_str()).counts();

        Self {
            total: store.len(),
            shortest,
            longest,
            most_common_start: frequency_extreme(&start_counts, Extreme::Most),
            least_common_start: frequency_extreme(&start_counts, Extreme::Least),
            most_common_end: frequency_extreme(&end_counts, Extreme::Most),
            least_common_end: frequency_extreme(&end_counts, Extreme::Least),
        }
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Most,
    Least,
}

// Ties break on station name so results are stable across runs.
fn frequency_extreme(counts: &HashMap<&str, usize>, extreme: Extreme) -> Option<StationFrequency> {
    let ordering = |a: &(&&str, &usize), b: &(&&str, &usize)| a.1.cmp(b.1).then(a.0.cmp(b.0));
    let entry = match extreme {
        Extreme::Most => counts.iter().max_by(ordering),
        Extreme::Least => counts.iter().min_by(ordering),
    };
    entry.map(|(station, count)| StationFrequency {
        station: station.to_string(),
        count: *count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journey(start: &str, end: &str, duration_seconds: f64) -> Journey {
        Journey {
            start_station: start.into(),
            start_coords: None,
            end_station: end.into(),
            end_coords: None,
            total_duration: String::new(),
            duration_seconds,
            score: None,
        }
    }

    #[test]
    fn empty_store_yields_empty_insights() {
        let store = JourneyStore::from_journeys(vec![]).unwrap();
        let insights = CollectionInsights::compute(&store);
        assert_eq!(insights, CollectionInsights::default());
    }

    #[test]
    fn duration_and_frequency_extremes() {
        let store = JourneyStore::from_journeys(vec![
            journey("A", "B", 600.0),
            journey("A", "C", 1800.0),
            journey("B", "C", 60.0),
        ])
        .unwrap();
        let insights = CollectionInsights::compute(&store);
        assert_eq!(insights.total, 3);
        assert_eq!(insights.shortest.unwrap().duration_seconds, 60.0);
        assert_eq!(insights.longest.unwrap().duration_seconds, 1800.0);
        assert_eq!(
            insights.most_common_start.unwrap(),
            StationFrequency { station: "A".into(), count: 2 }
        );
        assert_eq!(
            insights.least_common_start.unwrap(),
            StationFrequency { station: "B".into(), count: 1 }
        );
        assert_eq!(
            insights.most_common_end.unwrap(),
            StationFrequency { station: "C".into(), count: 2 }
        );
    }
}
