//! Accessor families addressed by name.
//!
//! Lets configuration and the CLI select a named accessor at runtime and get
//! its typed result back as JSON.

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::accessor::SafeAccessor;
use crate::transforms::{
    format_transport_date, parse_event_id, parse_transport_date, parse_uuid, EventId,
};
use crate::value::{mapping_to_json, FieldValue, Numeric, UntypedMapping};

/// One accessor family (each has a required and an optional form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Array,
    Data,
    Dictionary,
    Uuid,
    Date,
    Event,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        FieldKind::String,
        FieldKind::Number,
        FieldKind::Array,
        FieldKind::Data,
        FieldKind::Dictionary,
        FieldKind::Uuid,
        FieldKind::Date,
        FieldKind::Event,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Array => "array",
            FieldKind::Data => "data",
            FieldKind::Dictionary => "dictionary",
            FieldKind::Uuid => "uuid",
            FieldKind::Date => "date",
            FieldKind::Event => "event",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .iter()
            .find(|k| k.name() == s)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = FieldKind::ALL.iter().map(|k| k.name()).collect();
                format!("Unknown field kind '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

impl SafeAccessor {
    /// Run the accessor named by `kind` and render its result as JSON.
    ///
    /// Dates render in the transport format, event identifiers and UUIDs in
    /// their canonical string forms, data as an array of byte values.
    #[track_caller]
    pub fn extract_kind(
        &self,
        mapping: &UntypedMapping,
        key: &str,
        kind: FieldKind,
        required: bool,
    ) -> Option<JsonValue> {
        let caller = Location::caller();
        match kind {
            FieldKind::String => self
                .extract_at::<String>(mapping, key, required, None, caller)
                .map(JsonValue::String),
            FieldKind::Number => self
                .extract_at::<Numeric>(mapping, key, required, None, caller)
                .map(|n| FieldValue::Number(n).to_json()),
            FieldKind::Array => self
                .extract_at::<Vec<FieldValue>>(mapping, key, required, None, caller)
                .map(|items| FieldValue::Array(items).to_json()),
            FieldKind::Data => self
                .extract_at::<Vec<u8>>(mapping, key, required, None, caller)
                .map(|bytes| FieldValue::Bytes(bytes).to_json()),
            FieldKind::Dictionary => self
                .extract_at::<UntypedMapping>(mapping, key, required, None, caller)
                .map(|map| mapping_to_json(&map)),
            FieldKind::Uuid => self
                .extract_at::<Uuid>(mapping, key, required, Some(parse_uuid), caller)
                .map(|id| JsonValue::String(id.hyphenated().to_string())),
            FieldKind::Date => self
                .extract_at::<DateTime<Utc>>(mapping, key, required, Some(parse_transport_date), caller)
                .map(|date| JsonValue::String(format_transport_date(&date))),
            FieldKind::Event => self
                .extract_at::<EventId>(mapping, key, required, Some(parse_event_id), caller)
                .map(|id| JsonValue::String(id.to_string())),
        }
    }
}
