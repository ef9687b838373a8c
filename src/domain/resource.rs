//! Garden resources and the fields their forms edit.
//!
//! The REST API exposes four collections: plants, zones, locations and
//! schedules. Each one is edited through a modal form whose fields are
//! declared here; payload shapes beyond these field keys belong to the server.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minutes in one hour.
const MINUTES_PER_HOUR: u32 = 60;

/// A collection exposed by the garden REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Individual plants placed at a location.
    Plant,
    /// Irrigation zones with a start time and run duration.
    Zone,
    /// Named places in the garden.
    Location,
    /// Recurring watering schedules for a zone.
    Schedule,
}

impl ResourceKind {
    /// Every resource, in menu order.
    pub const ALL: [Self; 4] = [Self::Plant, Self::Zone, Self::Location, Self::Schedule];

    /// Path segment of the collection endpoint.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Plant => "plants",
            Self::Zone => "zones",
            Self::Location => "locations",
            Self::Schedule => "schedules",
        }
    }

    /// Human-readable singular name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plant => "Plant",
            Self::Zone => "Zone",
            Self::Location => "Location",
            Self::Schedule => "Schedule",
        }
    }

    /// Menu key that opens the resource's form.
    #[must_use]
    pub const fn shortcut(self) -> char {
        match self {
            Self::Plant => 'p',
            Self::Zone => 'z',
            Self::Location => 'l',
            Self::Schedule => 's',
        }
    }

    /// Resource whose menu shortcut is `c`.
    #[must_use]
    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.shortcut() == c)
    }

    /// Fields edited by the resource's form, top to bottom.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Plant => &PLANT_FIELDS,
            Self::Zone => &ZONE_FIELDS,
            Self::Location => &LOCATION_FIELDS,
            Self::Schedule => &SCHEDULE_FIELDS,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input behaviour of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text typed in place.
    Text,
    /// Digits typed in place, sent as a JSON number.
    Number,
    /// Time of day chosen through the time picker.
    Time,
    /// Run length chosen through the duration picker.
    Duration,
    /// Location chosen through the location picker.
    Location,
}

impl FieldKind {
    /// Whether Enter on this field opens a picker layer.
    #[must_use]
    pub const fn has_picker(self) -> bool {
        matches!(self, Self::Time | Self::Duration | Self::Location)
    }

    /// Whether characters are typed straight into the field.
    #[must_use]
    pub const fn accepts_typing(self) -> bool {
        matches!(self, Self::Text | Self::Number)
    }
}

/// Declaration of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key in the request body.
    pub key: &'static str,
    /// Label shown in the form.
    pub label: &'static str,
    /// Input behaviour.
    pub kind: FieldKind,
    /// Whether submit is refused while the field is empty.
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        required,
    }
}

const PLANT_FIELDS: [FieldSpec; 4] = [
    field("name", "Name", FieldKind::Text, true),
    field("species", "Species", FieldKind::Text, false),
    field("location", "Location", FieldKind::Location, true),
    field("water_ml", "Water (ml)", FieldKind::Number, false),
];

const ZONE_FIELDS: [FieldSpec; 4] = [
    field("name", "Name", FieldKind::Text, true),
    field("location", "Location", FieldKind::Location, true),
    field("start_time", "Start time", FieldKind::Time, true),
    field("run_minutes", "Run time", FieldKind::Duration, true),
];

const LOCATION_FIELDS: [FieldSpec; 2] = [
    field("name", "Name", FieldKind::Text, true),
    field("description", "Description", FieldKind::Text, false),
];

const SCHEDULE_FIELDS: [FieldSpec; 4] = [
    field("zone", "Zone", FieldKind::Text, true),
    field("start_time", "Start time", FieldKind::Time, true),
    field("run_minutes", "Run time", FieldKind::Duration, true),
    field("days", "Days", FieldKind::Text, false),
];

/// A run length in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunDuration(pub u32);

impl RunDuration {
    /// Length in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RunDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / MINUTES_PER_HOUR;
        let minutes = self.0 % MINUTES_PER_HOUR;
        match (hours, minutes) {
            (0, m) => write!(f, "{m} min"),
            (h, 0) => write!(f, "{h} h"),
            (h, m) => write!(f, "{h} h {m:02} min"),
        }
    }
}

/// Current value of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// Nothing entered yet.
    #[default]
    Empty,
    /// Typed text, including digits of number fields.
    Text(String),
    /// Time of day from the time picker.
    Time(NaiveTime),
    /// Run length from the duration picker.
    Duration(RunDuration),
    /// Location name from the location picker.
    Location(String),
}

impl FieldValue {
    /// True when nothing has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) | Self::Location(text) => text.trim().is_empty(),
            Self::Time(_) | Self::Duration(_) => false,
        }
    }

    /// Text shown in the form for this value.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) | Self::Location(text) => text.clone(),
            Self::Time(time) => time.format("%H:%M").to_string(),
            Self::Duration(duration) => duration.to_string(),
        }
    }

    /// JSON representation sent to the API for a field of kind `kind`.
    #[must_use]
    pub fn to_json(&self, kind: FieldKind) -> serde_json::Value {
        match self {
            Self::Empty => serde_json::Value::Null,
            Self::Text(text) if kind == FieldKind::Number => text
                .trim()
                .parse::<i64>()
                .map_or_else(|_| serde_json::Value::String(text.clone()), serde_json::Value::from),
            Self::Text(text) | Self::Location(text) => serde_json::Value::String(text.clone()),
            Self::Time(time) => serde_json::Value::String(time.format("%H:%M").to_string()),
            Self::Duration(duration) => serde_json::Value::from(duration.minutes()),
        }
    }
}

/// A record of any collection reduced to what pickers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord {
    /// Server identifier, shape owned by the server.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_compactly() {
        assert_eq!(RunDuration(5).to_string(), "5 min");
        assert_eq!(RunDuration(60).to_string(), "1 h");
        assert_eq!(RunDuration(95).to_string(), "1 h 35 min");
    }

    #[test]
    fn number_fields_serialize_as_numbers() {
        let value = FieldValue::Text(" 250 ".to_string());
        assert_eq!(value.to_json(FieldKind::Number), serde_json::json!(250));
        assert_eq!(value.to_json(FieldKind::Text), serde_json::json!(" 250 "));
    }

    #[test]
    fn shortcuts_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_shortcut(kind.shortcut()), Some(kind));
        }
        assert_eq!(ResourceKind::from_shortcut('x'), None);
    }

    #[test]
    fn time_values_use_hours_and_minutes() {
        let time = NaiveTime::from_hms_opt(6, 5, 0).unwrap();
        assert_eq!(FieldValue::Time(time).display(), "06:05");
        assert!(!FieldValue::Time(time).is_empty());
        assert!(FieldValue::Text("  ".into()).is_empty());
    }
}
