use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clubhub_core::models::{EntityKind, EventMode, EventPayload, EventRecord, EventStatus};
use clubhub_core::validation::require_text;
use clubhub_core::{AssetFolder, FieldErrors};
use serde::Deserialize;
use validator::Validate;

use super::{finish_validation, optional_text, AdminForm, AssetField, AssetSlot, ResolvedAssets};

const COVER: &str = "cover";
const GUEST_AVATAR: &str = "guest_avatar";
const PARTNER_LOGO: &str = "partner_logo";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse the date an admin typed into a UTC timestamp.
///
/// RFC 3339 input keeps its offset; dates and times without one are taken as UTC,
/// and a bare date means midnight.
pub fn normalize_event_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Workshop, talk or hackathon with optional guest speaker and partner.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub location: String,
    pub mode: EventMode,
    pub status: EventStatus,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub cover: AssetField,
    #[serde(default)]
    pub guest_avatar: AssetField,
    #[serde(default)]
    pub partner_logo: AssetField,
}

impl EventForm {
    pub fn new(title: impl Into<String>, date: impl Into<String>, mode: EventMode) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            date: date.into(),
            location: String::new(),
            mode,
            status: EventStatus::Upcoming,
            guest_name: None,
            cover: AssetField::Empty,
            guest_avatar: AssetField::Empty,
            partner_logo: AssetField::Empty,
        }
    }
}

impl AdminForm for EventForm {
    type Payload = EventPayload;
    type Record = EventRecord;

    const KIND: EntityKind = EntityKind::Events;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title, "Title");
        if self.date.trim().is_empty() {
            errors.add("date", "Date is required");
        } else if normalize_event_date(&self.date).is_none() {
            errors.add("date", "Date must look like 2026-03-01 or 2026-03-01T18:00");
        }
        if self.mode != EventMode::Online {
            require_text(&mut errors, "location", &self.location, "Location");
        }
        finish_validation(Validate::validate(self), errors)
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![
            AssetSlot::new(COVER, AssetFolder::Events, &self.cover),
            AssetSlot::new(GUEST_AVATAR, AssetFolder::Guests, &self.guest_avatar),
            AssetSlot::new(PARTNER_LOGO, AssetFolder::Partners, &self.partner_logo),
        ]
    }

    fn desired_name(&self) -> String {
        self.title.clone()
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<EventPayload, FieldErrors> {
        let date = normalize_event_date(&self.date).ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("date", "Date is invalid");
            errors
        })?;

        Ok(EventPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            date,
            location: self.location.trim().to_string(),
            mode: self.mode,
            status: self.status,
            cover_url: assets.url(COVER),
            guest_name: optional_text(&self.guest_name),
            guest_avatar_url: assets.url(GUEST_AVATAR),
            partner_logo_url: assets.url(PARTNER_LOGO),
        })
    }
}
