//! Target types an accessor can extract.
//!
//! [`FromFieldValue`] is the explicit replacement for a runtime type test:
//! each target type states which [`FieldValue`] variant it accepts as-is.
//! Types that only arrive as strings (UUIDs, dates, event identifiers) accept
//! no variant directly and rely on a transform.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::transforms::EventId;
use crate::value::{FieldValue, Numeric};

/// Decode a stored value that already has the target's dynamic type.
pub trait FromFieldValue: Sized {
    /// Type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// `Some` only when `value` is exactly this type; never coerces.
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

impl FromFieldValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for Numeric {
    const TYPE_NAME: &'static str = "Number";

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromFieldValue for Vec<FieldValue> {
    const TYPE_NAME: &'static str = "Array";

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Array(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for Vec<u8> {
    const TYPE_NAME: &'static str = "Data";

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bytes(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for HashMap<String, FieldValue> {
    const TYPE_NAME: &'static str = "Dictionary";

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Map(map) => Some(map.clone()),
            _ => None,
        }
    }
}

impl FromFieldValue for Uuid {
    const TYPE_NAME: &'static str = "UUID";

    fn from_field_value(_value: &FieldValue) -> Option<Self> {
        None
    }
}

impl FromFieldValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "Date";

    fn from_field_value(_value: &FieldValue) -> Option<Self> {
        None
    }
}

impl FromFieldValue for EventId {
    const TYPE_NAME: &'static str = "EventID";

    fn from_field_value(_value: &FieldValue) -> Option<Self> {
        None
    }
}
