use std::collections::HashMap;

use crate::journey::{Journey, JourneyStore};

/// Count and average duration of journeys sharing a station (or station pair)
/// with the target journey. A zero-count subset has no average; that is
/// represented explicitly rather than produced as a division artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationStats {
    pub count: usize,
    pub avg_duration: Option<f64>,
}

impl StationStats {
    fn from_tally(count: usize, total_duration: f64) -> Self {
        let avg_duration = if count == 0 {
            None
        } else {
            Some(total_duration / count as f64)
        };
        Self { count, avg_duration }
    }
}

/// Summary statistics for one journey against a collection: journeys sharing
/// its start station, its end station, and both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyStats {
    pub start: StationStats,
    pub end: StationStats,
    pub pair: StationStats,
}

impl JourneyStats {
    /// Convenience over [`CollectionScan`] for one-off queries.
    pub fn compute(store: &JourneyStore, journey: &Journey) -> Self {
        CollectionScan::new(store).stats_for(journey)
    }
}

/// Pure query interface for journey statistics. The target journey does not
/// need to be a member of the underlying collection. Implementations must be
/// observationally identical; callers may pick by scale.
pub trait StatsSource {
    fn stats_for(&self, journey: &Journey) -> JourneyStats;
}

/// Rescans the full collection on every query. O(n) per journey, no setup
/// cost. Fine for collections in the thousands.
pub struct CollectionScan<'a> {
    store: &'a JourneyStore,
}

impl<'a> CollectionScan<'a> {
    pub fn new(store: &'a JourneyStore) -> Self {
        Self { store }
    }
}

impl StatsSource for CollectionScan<'_> {
    fn stats_for(&self, journey: &Journey) -> JourneyStats {
        let mut start = (0usize, 0.0f64);
        let mut end = (0usize, 0.0f64);
        let mut pair = (0usize, 0.0f64);
        for other in self.store.iter() {
            let same_start = other.start_station == journey.start_station;
            let same_end = other.end_station == journey.end_station;
            if same_start {
                start.0 += 1;
                start.1 += other.duration_seconds;
            }
            if same_end {
                end.0 += 1;
                end.1 += other.duration_seconds;
            }
            if same_start && same_end {
                pair.0 += 1;
                pair.1 += other.duration_seconds;
            }
        }
        JourneyStats {
            start: StationStats::from_tally(start.0, start.1),
            end: StationStats::from_tally(end.0, end.1),
            pair: StationStats::from_tally(pair.0, pair.1),
        }
    }
}

/// Grouped-by-station tallies built once in O(n); each query is a hash lookup.
/// Drop-in replacement for [`CollectionScan`] when the collection grows.
pub struct StationIndex {
    by_start: HashMap<String, (usize, f64)>,
    by_end: HashMap<String, (usize, f64)>,
    by_pair: HashMap<(String, String), (usize, f64)>,
}

impl StationIndex {
    pub fn build(store: &JourneyStore) -> Self {
        let mut by_start: HashMap<String, (usize, f64)> = HashMap::new();
        let mut by_end: HashMap<String, (usize, f64)> = HashMap::new();
        let mut by_pair: HashMap<(String, String), (usize, f64)> = HashMap::new();
        for journey in store.iter() {
            let tally = by_start.entry(journey.start_station.clone()).or_default();
            tally.0 += 1;
            tally.1 += journey.duration_seconds;
            let tally = by_end.entry(journey.end_station.clone()).or_default();
            tally.0 += 1;
            tally.1 += journey.duration_seconds;
            let tally = by_pair
                .entry((journey.start_station.clone(), journey.end_station.clone()))
                .or_default();
            tally.0 += 1;
            tally.1 += journey.duration_seconds;
        }
        Self {
            by_start,
            by_end,
            by_pair,
        }
    }
}

impl StatsSource for StationIndex {
    fn stats_for(&self, journey: &Journey) -> JourneyStats {
        let start = self
            .by_start
            .get(&journey.start_station)
            .copied()
            .unwrap_or_default();
        let end = self
            .by_end
            .get(&journey.end_station)
            .copied()
            .unwrap_or_default();
        let pair = self
            .by_pair
            .get(&(journey.start_station.clone(), journey.end_station.clone()))
            .copied()
            .unwrap_or_default();
        JourneyStats {
            start: StationStats::from_tally(start.0, start.1),
            end: StationStats::from_tally(end.0, end.1),
            pair: StationStats::from_tally(pair.0, pair.1),
        }
    }
}

/// Human-readable explanation of a journey's statistics, as an HTML list for
/// the marker popup. A zero-count stat omits the average clause instead of
/// rendering a non-number.
pub fn explanation_html(journey: &Journey, stats: &JourneyStats) -> String {
    format!(
        "<ol>\n\
         \x20 <li>* This journey is 1 of {} journeys from {} to {}{}.</li>\n\
         \x20 <li>* There are {} journeys starting at {}{}.</li>\n\
         \x20 <li>* There are {} journeys ending at {}{}.</li>\n\
         </ol>",
        stats.pair.count,
        journey.start_station,
        journey.end_station,
        avg_clause(stats.pair.avg_duration),
        stats.start.count,
        journey.start_station,
        avg_clause(stats.start.avg_duration),
        stats.end.count,
        journey.end_station,
        avg_clause(stats.end.avg_duration),
    )
}

fn avg_clause(avg_duration: Option<f64>) -> String {
    match avg_duration {
        Some(seconds) => format!(
            " with an average duration of {:.4} hours",
            seconds / 3600.0
        ),
        None => String::new(),
    }
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
    fn shared_start_station() {
        let store = JourneyStore::from_journeys(vec![
            journey("A", "B", 600.0),
            journey("A", "C", 1200.0),
        ])
        .unwrap();
        let stats = JourneyStats::compute(&store, &store.journeys()[0]);
        assert_eq!(stats.start.count, 2);
        assert_eq!(stats.start.avg_duration, Some(900.0));
        assert_eq!(stats.pair.count, 1);
        assert_eq!(stats.pair.avg_duration, Some(600.0));
    }

    #[test]
    fn zero_count_has_no_average() {
        let store = JourneyStore::from_journeys(vec![journey("A", "B", 600.0)]).unwrap();
        let target = journey("X", "Y", 60.0);
        let stats = JourneyStats::compute(&store, &target);
        assert_eq!(stats.start.count, 0);
        assert_eq!(stats.start.avg_duration, None);
        assert_eq!(stats.end.count, 0);
        assert_eq!(stats.end.avg_duration, None);
        assert_eq!(stats.pair.count, 0);
        assert_eq!(stats.pair.avg_duration, None);
    }

    #[test]
    fn pair_count_never_exceeds_either_side() {
        let store = JourneyStore::from_journeys(vec![
            journey("A", "B", 100.0),
            journey("A", "C", 200.0),
            journey("D", "B", 300.0),
            journey("A", "B", 400.0),
        ])
        .unwrap();
        for target in store.iter() {
            let stats = JourneyStats::compute(&store, target);
            assert!(stats.start.count >= stats.pair.count);
            assert!(stats.end.count >= stats.pair.count);
        }
    }

    #[test]
    fn index_matches_scan() {
        let store = JourneyStore::from_journeys(vec![
            journey("A", "B", 100.0),
            journey("A", "B", 500.0),
            journey("B", "A", 200.0),
            journey("C", "B", 300.0),
        ])
        .unwrap();
        let scan = CollectionScan::new(&store);
        let index = StationIndex::build(&store);
        for target in store.iter() {
            assert_eq!(scan.stats_for(target), index.stats_for(target));
        }
        // target outside the collection
        let outsider = journey("Z", "B", 1.0);
        assert_eq!(scan.stats_for(&outsider), index.stats_for(&outsider));
    }

    #[test]
    fn explanation_reports_hours() {
        let store = JourneyStore::from_journeys(vec![journey("A", "B", 600.0)]).unwrap();
        let target = &store.journeys()[0];
        let text = explanation_html(target, &JourneyStats::compute(&store, target));
        assert!(text.contains("1 of 1 journeys from A to B"));
        assert!(text.contains("0.1667 hours"));
    }

    #[test]
    fn explanation_omits_undefined_average() {
        let store = JourneyStore::from_journeys(vec![journey("A", "B", 600.0)]).unwrap();
        let target = journey("X", "B", 60.0);
        let text = explanation_html(&target, &JourneyStats::compute(&store, &target));
        assert!(text.contains("There are 0 journeys starting at X.</li>"));
        assert!(!text.contains("NaN"));
    }
}
