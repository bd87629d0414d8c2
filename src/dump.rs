//! Rendering of the mapping into diagnostics.
//!
//! By default the whole mapping is written into the log line. Payloads may
//! carry sensitive data, so hosts can restrict the dump to keys, omit it,
//! redact individual keys, or cap its length.

use serde::{Deserialize, Serialize};

use crate::value::{mapping_to_json, FieldValue, UntypedMapping};

const REDACTED: &str = "<redacted>";

/// How much of the mapping a diagnostic includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingDump {
    #[default]
    Full,
    KeysOnly,
    Omitted,
}

/// Full policy applied when rendering a mapping or a raw value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DumpPolicy {
    pub mode: MappingDump,
    /// Keys whose values are replaced by `<redacted>`.
    pub redact_keys: Vec<String>,
    /// Upper bound on rendered characters, `None` for unbounded.
    pub max_chars: Option<usize>,
}

impl DumpPolicy {
    pub fn new(mode: MappingDump) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_redacted(mut self, key: impl Into<String>) -> Self {
        self.redact_keys.push(key.into());
        self
    }

    pub fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    pub fn is_redacted(&self, key: &str) -> bool {
        self.redact_keys.iter().any(|k| k == key)
    }

    /// Render the mapping for a log line.
    pub fn render_mapping(&self, mapping: &UntypedMapping) -> String {
        let rendered = match self.mode {
            MappingDump::Full => {
                let mut json = mapping_to_json(mapping);
                self.redact(&mut json);
                json.to_string()
            }
            MappingDump::KeysOnly => {
                let mut keys: Vec<&String> = mapping.keys().collect();
                keys.sort();
                let keys: Vec<&str> = keys.into_iter().map(String::as_str).collect();
                format!("{{keys: [{}]}}", keys.join(", "))
            }
            MappingDump::Omitted => "<mapping omitted>".to_string(),
        };
        self.truncate(rendered)
    }

    /// Render the raw value stored under `key`.
    pub fn render_value(&self, key: &str, value: &FieldValue) -> String {
        if self.is_redacted(key) {
            return REDACTED.to_string();
        }
        let mut json = value.to_json();
        self.redact(&mut json);
        self.truncate(json.to_string())
    }

    /// Replace redacted keys at any depth, including maps inside arrays.
    fn redact(&self, json: &mut serde_json::Value) {
        if self.redact_keys.is_empty() {
            return;
        }
        match json {
            serde_json::Value::Object(obj) => {
                for (key, value) in obj.iter_mut() {
                    if self.is_redacted(key) {
                        *value = serde_json::Value::String(REDACTED.to_string());
                    } else {
                        self.redact(value);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items.iter_mut() {
                    self.redact(item);
                }
            }
            _ => {}
        }
    }

    fn truncate(&self, rendered: String) -> String {
        match self.max_chars {
            Some(max) if rendered.chars().count() > max => {
                let mut cut: String = rendered.chars().take(max).collect();
                cut.push_str("...");
                cut
            }
            _ => rendered,
        }
    }
}
