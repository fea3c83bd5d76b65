// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record as written to the Notion database.

use crate::services::strava::StravaActivity;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Activity types for which a pace (min/km) is meaningful.
const PACE_ACTIVITY_TYPES: &[&str] = &["Run", "Walk", "Hike", "TrailRun", "VirtualRun"];
/// Notion rejects titles longer than this.
const MAX_TITLE_LENGTH: usize = 2000;
const TRUNCATION_SUFFIX: &str = "...";

/// Activity converted to display units for the Notion database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotionActivity {
    pub name: String,
    pub activity_type: String,
    pub distance_km: f64,
    /// Moving time in minutes
    pub duration_minutes: f64,
    /// Minutes per km, only for foot-based activities
    pub pace: Option<f64>,
    /// Meters, rounded; 0 when Strava has no value
    pub elevation_gain: i64,
    /// Local start time when available
    pub start_date: String,
    pub average_speed_kmh: Option<f64>,
    pub max_speed_kmh: Option<f64>,
    pub average_heart_rate: Option<i64>,
    pub max_heart_rate: Option<i64>,
    pub calories: Option<i64>,
    pub strava_link: String,
    pub activity_id: u64,
}

impl NotionActivity {
    /// Convert a Strava activity into Notion display units.
    pub fn from_strava(activity: &StravaActivity) -> Self {
        let distance_km = round2(activity.distance / 1000.0);
        let duration_minutes = round2(activity.moving_time as f64 / 60.0);

        let pace = (distance_km > 0.0
            && PACE_ACTIVITY_TYPES.contains(&activity.activity_type.as_str()))
        .then(|| round2(duration_minutes / distance_km));

        Self {
            name: title(&activity.name),
            activity_type: activity.activity_type.clone(),
            distance_km,
            duration_minutes,
            pace,
            elevation_gain: activity
                .total_elevation_gain
                .map(|e| e.round() as i64)
                .unwrap_or(0),
            start_date: activity
                .start_date_local
                .clone()
                .unwrap_or_else(|| activity.start_date.clone()),
            average_speed_kmh: nonzero(activity.average_speed).map(|s| round2(s * 3.6)),
            max_speed_kmh: nonzero(activity.max_speed).map(|s| round2(s * 3.6)),
            average_heart_rate: nonzero(activity.average_heartrate).map(|h| h.round() as i64),
            max_heart_rate: nonzero(activity.max_heartrate).map(|h| h.round() as i64),
            calories: nonzero(activity.calories).map(|c| c.round() as i64),
            strava_link: format!("https://www.strava.com/activities/{}", activity.id),
            activity_id: activity.id,
        }
    }

    /// Page properties for the Notion `pages.create` call.
    pub fn properties(&self) -> Value {
        let mut props = Map::new();
        props.insert(
            "Name".into(),
            json!({ "title": [{ "text": { "content": self.name } }] }),
        );
        props.insert(
            "Activity Type".into(),
            json!({ "select": { "name": self.activity_type } }),
        );
        props.insert("Distance".into(), json!({ "number": self.distance_km }));
        props.insert("Duration".into(), json!({ "number": self.duration_minutes }));
        props.insert(
            "Elevation Gain".into(),
            json!({ "number": self.elevation_gain }),
        );
        props.insert(
            "Start Date".into(),
            json!({ "date": { "start": self.start_date } }),
        );
        props.insert("Strava Link".into(), json!({ "url": self.strava_link }));
        props.insert("Activity ID".into(), json!({ "number": self.activity_id }));

        let optional = [
            ("Pace", self.pace.map(Value::from)),
            ("Average Speed", self.average_speed_kmh.map(Value::from)),
            ("Max Speed", self.max_speed_kmh.map(Value::from)),
            ("Average Heart Rate", self.average_heart_rate.map(Value::from)),
            ("Max Heart Rate", self.max_heart_rate.map(Value::from)),
            ("Calories", self.calories.map(Value::from)),
        ];
        for (name, value) in optional {
            if let Some(number) = value {
                props.insert(name.into(), json!({ "number": number }));
            }
        }

        Value::Object(props)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Strava reports missing sensor data as 0 as often as it omits the field.
fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn title(name: &str) -> String {
    if name.is_empty() {
        return "Untitled Activity".to_string();
    }
    if name.chars().count() <= MAX_TITLE_LENGTH {
        return name.to_string();
    }
    let keep = MAX_TITLE_LENGTH - TRUNCATION_SUFFIX.len();
    let mut truncated: String = name.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_SUFFIX);
    truncated
}
