//! # safe-types: typed access to untyped mappings
//!
//! Decoded JSON arrives as string-keyed mappings of dynamically-typed values.
//! `safe-types` pulls typed values out of them without ever failing loudly:
//! a lookup returns `Option<T>`, and the problems worth knowing about are
//! reported to an injected logger.
//!
//! ## Features
//!
//! - **One extraction routine**: exact-type match first, then an optional
//!   string transform, then `None`
//! - **Required vs. optional**: missing required fields are logged, missing
//!   optional fields are silent, mistyped fields are always logged
//! - **Transforms**: canonical UUIDs, transport-format dates, event identifiers
//! - **Configurable diagnostics**: caller location or truncated backtrace,
//!   mapping dumps that can be redacted, reduced to keys, or capped
//!
//! ## Example
//!
//! ```
//! use safe_types::{decode_mapping, Numeric, SafeAccessor};
//!
//! let accessor = SafeAccessor::default();
//! let payload = decode_mapping(r#"{
//!     "id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890",
//!     "time": "2016-05-19T13:27:05.123Z",
//!     "count": 42
//! }"#).unwrap();
//!
//! let id = accessor.uuid(&payload, "id");
//! let time = accessor.date(&payload, "time");
//! let count = accessor.number(&payload, "count");
//! let note = accessor.optional_string(&payload, "note");
//!
//! assert!(id.is_some() && time.is_some());
//! assert_eq!(count, Some(Numeric::Int(42)));
//! assert_eq!(note, None);
//! ```

// Core modules
pub mod accessor;
pub mod field_type;
pub mod transforms;
pub mod value;

// Diagnostics
pub mod dump;
pub mod logger;
pub mod trace;

pub mod config;
pub mod error;
pub mod kind;

// Re-export key types
pub use accessor::{ExtractionFailure, SafeAccessor};
pub use field_type::FromFieldValue;
pub use transforms::{
    format_transport_date, parse_event_id, parse_transport_date, parse_uuid, EventId,
    ParseEventIdError, Transform, TRANSPORT_DATE_FORMAT,
};
pub use value::{decode_mapping, mapping_from_json, mapping_to_json, FieldValue, Numeric, UntypedMapping};

pub use config::{AccessorConfig, TraceMode};
pub use dump::{DumpPolicy, MappingDump};
pub use error::{ConfigError, DecodeError};
pub use kind::FieldKind;
pub use logger::{Logger, MemoryLogger, TracingLogger, DEFAULT_LOG_TAG};
pub use trace::{TraceCapture, DEFAULT_TRACE_FRAMES};
