use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub description: String,
    pub category: String,
    pub capacity: i32,
    pub is_private: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub registered_users: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why an RSVP would or would not append the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpCheck {
    Open,
    AlreadyRegistered,
    DeadlinePassed,
    Full,
}

impl Event {
    pub fn from_new(input: NewEvent, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            date: input.date,
            time: normalize_time(&input.time).unwrap_or(input.time),
            location: input.location.trim().to_string(),
            description: input.description,
            category: input.category.trim().to_lowercase(),
            capacity: input.capacity,
            is_private: input.is_private,
            registration_deadline: input.registration_deadline,
            created_by,
            registered_users: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the editable fields of `changes`. Registrations are never touched here.
    pub fn apply(&mut self, changes: EventChanges) {
        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(time) = changes.time {
            self.time = normalize_time(&time).unwrap_or(time);
        }
        if let Some(location) = changes.location {
            self.location = location.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category.trim().to_lowercase();
        }
        if let Some(capacity) = changes.capacity {
            self.capacity = capacity;
        }
        if let Some(is_private) = changes.is_private {
            self.is_private = is_private;
        }
        if let Some(deadline) = changes.registration_deadline {
            self.registration_deadline = deadline;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_registered(&self, user_id: Uuid) -> bool {
        self.registered_users.contains(&user_id)
    }

    pub fn is_full(&self) -> bool {
        self.registered_users.len() >= self.capacity.max(0) as usize
    }

    pub fn seats_available(&self) -> i64 {
        (i64::from(self.capacity) - self.registered_users.len() as i64).max(0)
    }

    /// Decides an RSVP. An existing registration wins over every other check.
    pub fn check_rsvp(&self, user_id: Uuid, now: DateTime<Utc>) -> RsvpCheck {
        if self.is_registered(user_id) {
            RsvpCheck::AlreadyRegistered
        } else if self.registration_deadline.is_some_and(|deadline| now > deadline) {
            RsvpCheck::DeadlinePassed
        } else if self.is_full() {
            RsvpCheck::Full
        } else {
            RsvpCheck::Open
        }
    }
}

/// Body of POST /api/events.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[validate(custom(function = "validate_time"))]
    pub time: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(deserialize_with = "de_capacity")]
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, deserialize_with = "de_deadline")]
    pub registration_deadline: Option<DateTime<Utc>>,
}

/// Body of PUT /api/events/:eventId. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "validate_time"))]
    pub time: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_opt_capacity")]
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub is_private: Option<bool>,
    /// `null` or an empty string clears the deadline.
    #[serde(default, deserialize_with = "de_deadline_change")]
    pub registration_deadline: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub category: Option<String>,
    /// Only events dated on or after this day.
    pub from_date: Option<NaiveDate>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| event.category == c);
        let date_ok = self.from_date.map_or(true, |d| event.date >= d);
        category_ok && date_ok
    }
}

/// Event as returned by the API: stored fields plus derived seat count and creator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub seats_available: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserSummary>,
}

impl EventView {
    pub fn new(event: Event, creator: Option<UserSummary>) -> Self {
        Self {
            seats_available: event.seats_available(),
            event,
            creator,
        }
    }
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self::new(event, None)
    }
}

/// Normalizes to `HH:MM`. A bare hour ("14") gains ":00".
pub fn normalize_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.contains(':') {
        let hour: u32 = raw.parse().ok()?;
        return (hour < 24).then(|| format!("{:02}:00", hour));
    }
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .map(|t| t.format("%H:%M").to_string())
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    match normalize_time(value) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("time");
            err.message = Some("Time must look like HH:MM".into());
            Err(err)
        }
    }
}

/// Accepts `YYYY-MM-DD` or any ISO-8601 timestamp (its date part is used).
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM[:SS]` (read as UTC) or a
/// bare date (end of that day). Empty strings mean "no deadline".
pub fn parse_deadline(raw: &str) -> Option<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Some(dt.with_timezone(&Utc)));
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Some(Utc.from_utc_datetime(&naive)));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    fn into_i32(self) -> Option<i32> {
        match self {
            NumberOrString::Number(n) => i32::try_from(n).ok(),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn de_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

fn de_opt_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_event_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
    }
}

fn de_capacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    NumberOrString::deserialize(deserializer)?
        .into_i32()
        .ok_or_else(|| serde::de::Error::custom("capacity must be a whole number"))
}

fn de_opt_capacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value
            .into_i32()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("capacity must be a whole number")),
    }
}

fn de_deadline<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_deadline(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid registration deadline: {raw}"))),
    }
}

fn de_deadline_change<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(Some(None)),
        Some(raw) => parse_deadline(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid registration deadline: {raw}"))),
    }
}
