//! Typed, logging lookups into untyped mappings.
//!
//! [`SafeAccessor::extract`] is the single routine behind every accessor:
//!
//! 1. If `mapping[key]` already has the target type, return it.
//! 2. Otherwise, if a transform is supplied and the stored value is a string,
//!    return the transform's result when it yields one.
//! 3. Otherwise return `None`. A present, non-null value is reported as a type
//!    mismatch; an absent or null value is reported only when the field is
//!    required.
//!
//! Lookups never panic and never return an error; diagnostics go to the
//! injected [`Logger`] and do not affect the result.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dump::DumpPolicy;
use crate::field_type::FromFieldValue;
use crate::logger::{Logger, TracingLogger};
use crate::trace::TraceCapture;
use crate::transforms::{parse_event_id, parse_transport_date, parse_uuid, EventId, Transform};
use crate::value::{FieldValue, Numeric, UntypedMapping};

/// Why a lookup produced no value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// Key present with a value that is neither the target type nor a string
    /// the transform accepts.
    TypeMismatch {
        key: String,
        expected: &'static str,
        raw: FieldValue,
    },
    /// Key absent or null on a required field.
    MissingRequired { key: String },
    /// Key absent or null on an optional field; not an error.
    MissingOptional { key: String },
}

impl ExtractionFailure {
    pub fn key(&self) -> &str {
        match self {
            ExtractionFailure::TypeMismatch { key, .. }
            | ExtractionFailure::MissingRequired { key }
            | ExtractionFailure::MissingOptional { key } => key,
        }
    }

    /// Whether this failure produces a diagnostic.
    pub fn is_logged(&self) -> bool {
        !matches!(self, ExtractionFailure::MissingOptional { .. })
    }
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::TypeMismatch { key, expected, raw } => {
                write!(f, "Value {} for key '{}' is not a valid {}", raw, key, expected)
            }
            ExtractionFailure::MissingRequired { key } => {
                write!(f, "Required key '{}' is missing or null", key)
            }
            ExtractionFailure::MissingOptional { key } => {
                write!(f, "Optional key '{}' is missing or null", key)
            }
        }
    }
}

impl std::error::Error for ExtractionFailure {}

/// Typed accessor over [`UntypedMapping`]s.
///
/// Cheap to clone; collaborators are shared behind `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use safe_types::{decode_mapping, MemoryLogger, SafeAccessor};
///
/// let logger = Arc::new(MemoryLogger::new());
/// let accessor = SafeAccessor::new(logger.clone());
/// let mapping = decode_mapping(r#"{"id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890"}"#).unwrap();
///
/// assert!(accessor.uuid(&mapping, "id").is_some());
/// assert!(accessor.uuid(&mapping, "missing").is_none());
/// assert_eq!(logger.len(), 1);
/// ```
#[derive(Clone)]
pub struct SafeAccessor {
    logger: Arc<dyn Logger>,
    trace: TraceCapture,
    dump: DumpPolicy,
}

impl fmt::Debug for SafeAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeAccessor")
            .field("trace", &self.trace)
            .field("dump", &self.dump)
            .finish_non_exhaustive()
    }
}

impl Default for SafeAccessor {
    fn default() -> Self {
        Self::new(Arc::new(TracingLogger::default()))
    }
}

impl SafeAccessor {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            trace: TraceCapture::default(),
            dump: DumpPolicy::default(),
        }
    }

    pub fn with_trace(mut self, trace: TraceCapture) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_dump_policy(mut self, dump: DumpPolicy) -> Self {
        self.dump = dump;
        self
    }

    pub fn trace(&self) -> &TraceCapture {
        &self.trace
    }

    pub fn dump_policy(&self) -> &DumpPolicy {
        &self.dump
    }

    /// Lookup without logging, returning the failure classification.
    pub fn try_extract<T: FromFieldValue>(
        &self,
        mapping: &UntypedMapping,
        key: &str,
        required: bool,
        transform: Option<Transform<T>>,
    ) -> Result<T, ExtractionFailure> {
        let raw = match mapping.get(key) {
            Some(value) if !value.is_null() => value,
            _ if required => {
                return Err(ExtractionFailure::MissingRequired {
                    key: key.to_string(),
                })
            }
            _ => {
                return Err(ExtractionFailure::MissingOptional {
                    key: key.to_string(),
                })
            }
        };

        if let Some(value) = T::from_field_value(raw) {
            return Ok(value);
        }

        if let (Some(transform), FieldValue::String(s)) = (transform, raw) {
            if let Some(value) = transform(s) {
                return Ok(value);
            }
        }

        Err(ExtractionFailure::TypeMismatch {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            raw: raw.clone(),
        })
    }

    /// Generic extraction; logs type mismatches and missing required fields.
    #[track_caller]
    pub fn extract<T: FromFieldValue>(
        &self,
        mapping: &UntypedMapping,
        key: &str,
        required: bool,
        transform: Option<Transform<T>>,
    ) -> Option<T> {
        self.extract_at(mapping, key, required, transform, Location::caller())
    }

    /// [`extract`](Self::extract) with an explicit call site for the trace.
    pub(crate) fn extract_at<T: FromFieldValue>(
        &self,
        mapping: &UntypedMapping,
        key: &str,
        required: bool,
        transform: Option<Transform<T>>,
        caller: &Location<'_>,
    ) -> Option<T> {
        match self.try_extract(mapping, key, required, transform) {
            Ok(value) => Some(value),
            Err(failure) => {
                if failure.is_logged() {
                    self.report(mapping, &failure, caller);
                }
                None
            }
        }
    }

    #[track_caller]
    pub fn required<T: FromFieldValue>(
        &self,
        mapping: &UntypedMapping,
        key: &str,
        transform: Option<Transform<T>>,
    ) -> Option<T> {
        self.extract(mapping, key, true, transform)
    }

    #[track_caller]
    pub fn optional<T: FromFieldValue>(
        &self,
        mapping: &UntypedMapping,
        key: &str,
        transform: Option<Transform<T>>,
    ) -> Option<T> {
        self.extract(mapping, key, false, transform)
    }

    /// Format the diagnostic for a failure.
    pub fn format_failure(
        &self,
        mapping: &UntypedMapping,
        failure: &ExtractionFailure,
        caller: &Location<'_>,
    ) -> String {
        let trace = self.trace.capture(caller);
        let dumped = self.dump.render_mapping(mapping);
        match failure {
            ExtractionFailure::TypeMismatch { key, expected, raw } => format!(
                "{} is not a valid {} for key '{}' in {}. Callstack:\n {}",
                self.dump.render_value(key, raw),
                expected,
                key,
                dumped,
                trace
            ),
            ExtractionFailure::MissingRequired { key } | ExtractionFailure::MissingOptional { key } => {
                format!("nil values for {} in {}. Callstack:\n {}", key, dumped, trace)
            }
        }
    }

    fn report(&self, mapping: &UntypedMapping, failure: &ExtractionFailure, caller: &Location<'_>) {
        let message = self.format_failure(mapping, failure, caller);
        self.logger.error(&message);
    }

    // Named accessors. Required variants log when the key is missing.

    #[track_caller]
    pub fn string(&self, mapping: &UntypedMapping, key: &str) -> Option<String> {
        self.required(mapping, key, None)
    }

    #[track_caller]
    pub fn optional_string(&self, mapping: &UntypedMapping, key: &str) -> Option<String> {
        self.optional(mapping, key, None)
    }

    #[track_caller]
    pub fn number(&self, mapping: &UntypedMapping, key: &str) -> Option<Numeric> {
        self.required(mapping, key, None)
    }

    #[track_caller]
    pub fn optional_number(&self, mapping: &UntypedMapping, key: &str) -> Option<Numeric> {
        self.optional(mapping, key, None)
    }

    #[track_caller]
    pub fn array(&self, mapping: &UntypedMapping, key: &str) -> Option<Vec<FieldValue>> {
        self.required(mapping, key, None)
    }

    #[track_caller]
    pub fn optional_array(&self, mapping: &UntypedMapping, key: &str) -> Option<Vec<FieldValue>> {
        self.optional(mapping, key, None)
    }

    #[track_caller]
    pub fn data(&self, mapping: &UntypedMapping, key: &str) -> Option<Vec<u8>> {
        self.required(mapping, key, None)
    }

    #[track_caller]
    pub fn optional_data(&self, mapping: &UntypedMapping, key: &str) -> Option<Vec<u8>> {
        self.optional(mapping, key, None)
    }

    #[track_caller]
    pub fn dictionary(&self, mapping: &UntypedMapping, key: &str) -> Option<UntypedMapping> {
        self.required(mapping, key, None)
    }

    #[track_caller]
    pub fn optional_dictionary(&self, mapping: &UntypedMapping, key: &str) -> Option<UntypedMapping> {
        self.optional(mapping, key, None)
    }

    #[track_caller]
    pub fn uuid(&self, mapping: &UntypedMapping, key: &str) -> Option<Uuid> {
        self.required(mapping, key, Some(parse_uuid))
    }

    #[track_caller]
    pub fn optional_uuid(&self, mapping: &UntypedMapping, key: &str) -> Option<Uuid> {
        self.optional(mapping, key, Some(parse_uuid))
    }

    #[track_caller]
    pub fn date(&self, mapping: &UntypedMapping, key: &str) -> Option<DateTime<Utc>> {
        self.required(mapping, key, Some(parse_transport_date))
    }

    #[track_caller]
    pub fn optional_date(&self, mapping: &UntypedMapping, key: &str) -> Option<DateTime<Utc>> {
        self.optional(mapping, key, Some(parse_transport_date))
    }

    #[track_caller]
    pub fn event(&self, mapping: &UntypedMapping, key: &str) -> Option<EventId> {
        self.required(mapping, key, Some(parse_event_id))
    }

    #[track_caller]
    pub fn optional_event(&self, mapping: &UntypedMapping, key: &str) -> Option<EventId> {
        self.optional(mapping, key, Some(parse_event_id))
    }
}
