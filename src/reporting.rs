//! Read-only aggregations over stored trips.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::warn;

use crate::{
    geometry::{self, Quadrilateral},
    models::trip::Trip,
};

/// Fixed six-hour windows of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeInterval {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeInterval {
    pub const ALL: [TimeInterval; 4] = [
        TimeInterval::Night,
        TimeInterval::Morning,
        TimeInterval::Afternoon,
        TimeInterval::Evening,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeInterval::Night,
            6..=11 => TimeInterval::Morning,
            12..=17 => TimeInterval::Afternoon,
            _ => TimeInterval::Evening,
        }
    }

    pub fn of(datetime: &NaiveDateTime) -> Self {
        Self::from_hour(datetime.hour())
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeInterval::Night => "00:00 - 05:59",
            TimeInterval::Morning => "06:00 - 11:59",
            TimeInterval::Afternoon => "12:00 - 17:59",
            TimeInterval::Evening => "18:00 - 23:59",
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalGroup {
    pub region: String,
    pub interval: TimeInterval,
    pub count: usize,
    pub trip_ids: Vec<i64>,
}

/// Groups trips by region and time-of-day window, in order of first appearance.
pub fn group_by_interval(trips: &[Trip]) -> Vec<IntervalGroup> {
    let mut groups: Vec<IntervalGroup> = Vec::new();
    let mut index: HashMap<(&str, TimeInterval), usize> = HashMap::new();

    for trip in trips {
        let interval = TimeInterval::of(&trip.datetime);
        let slot = *index
            .entry((trip.region.as_str(), interval))
            .or_insert_with(|| {
                groups.push(IntervalGroup {
                    region: trip.region.clone(),
                    interval,
                    count: 0,
                    trip_ids: Vec::new(),
                });
                groups.len() - 1
            });
        let group = &mut groups[slot];
        group.count += 1;
        group.trip_ids.push(trip.id);
    }

    groups
}

/// Sunday-based week of the year (`%U`): days before the first Sunday are week 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekLabel {
    pub year: i32,
    pub week: u32,
}

impl WeekLabel {
    pub fn of(datetime: &NaiveDateTime) -> Self {
        let date = datetime.date();
        let days_from_sunday = date.weekday().num_days_from_sunday();
        Self {
            year: date.year(),
            week: (date.ordinal0() + 7 - days_from_sunday) / 7,
        }
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.week, self.year)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAverage {
    pub average: f64,
    pub trips_in_area: usize,
    /// Chronological, only weeks with at least one trip.
    pub weeks: Vec<(WeekLabel, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AverageOutcome {
    NoValidTrips,
    Average(WeeklyAverage),
}

/// Mean trips per week over the weeks that have trips at all.
pub fn weekly_average(timestamps: &[NaiveDateTime]) -> AverageOutcome {
    if timestamps.is_empty() {
        return AverageOutcome::NoValidTrips;
    }

    let mut per_week: BTreeMap<WeekLabel, usize> = BTreeMap::new();
    for timestamp in timestamps {
        *per_week.entry(WeekLabel::of(timestamp)).or_default() += 1;
    }

    let average = timestamps.len() as f64 / per_week.len() as f64;
    AverageOutcome::Average(WeeklyAverage {
        average,
        trips_in_area: timestamps.len(),
        weeks: per_week.into_iter().collect(),
    })
}

/// Weekly average of the trips whose origin lies strictly inside `area`.
pub fn weekly_average_in_area(trips: &[Trip], area: &Quadrilateral) -> AverageOutcome {
    let timestamps: Vec<NaiveDateTime> = trips
        .iter()
        .filter(|trip| match geometry::parse_wkt_point(&trip.origin_coord) {
            Ok(origin) => area.contains(&origin),
            Err(err) => {
                warn!(trip_id = trip.id, error = %err, "skipping trip with unreadable origin");
                false
            }
        })
        .map(|trip| trip.datetime)
        .collect();

    weekly_average(&timestamps)
}
