//! Accessor configuration loader.
//!
//! Loads the diagnostic policy of a [`SafeAccessor`] from YAML:
//!
//! ```yaml
//! accessor:
//!   log_tag: Conversation
//!   trace: backtrace
//!   trace_frames: 7
//!   mapping_dump: full
//!   redact_keys: [access_token, password]
//!   max_dump_chars: 2048
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::accessor::SafeAccessor;
use crate::dump::{DumpPolicy, MappingDump};
use crate::error::ConfigError;
use crate::logger::{TracingLogger, DEFAULT_LOG_TAG};
use crate::trace::{TraceCapture, DEFAULT_TRACE_FRAMES};

/// Trace mode selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    #[default]
    Caller,
    Backtrace,
    Context,
    Disabled,
}

/// Diagnostic policy for an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessorConfig {
    /// Tag attached to every diagnostic
    pub log_tag: String,

    pub trace: TraceMode,

    /// Frames kept in `backtrace` mode
    pub trace_frames: usize,

    /// Context string used in `context` mode
    pub context: Option<String>,

    pub mapping_dump: MappingDump,

    /// Keys whose values never appear in diagnostics
    pub redact_keys: Vec<String>,

    pub max_dump_chars: Option<usize>,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            log_tag: DEFAULT_LOG_TAG.to_string(),
            trace: TraceMode::default(),
            trace_frames: DEFAULT_TRACE_FRAMES,
            context: None,
            mapping_dump: MappingDump::default(),
            redact_keys: Vec::new(),
            max_dump_chars: None,
        }
    }
}

impl AccessorConfig {
    /// Load configuration from a YAML file with a top-level `accessor` key.
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid YAML, lacks the
    /// `accessor` section, or fails validation.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded accessor config");
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(contents)?;

        let section = yaml
            .get("accessor")
            .ok_or(ConfigError::MissingSection("accessor"))?;

        // An empty `accessor:` section means all defaults
        let config: AccessorConfig = if section.is_null() {
            AccessorConfig::default()
        } else {
            serde_yaml::from_value(section.clone())?
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_tag.trim().is_empty() {
            return Err(ConfigError::Invalid("log_tag cannot be empty".to_string()));
        }
        if self.trace == TraceMode::Backtrace && self.trace_frames == 0 {
            return Err(ConfigError::Invalid(
                "trace_frames must be at least 1 in backtrace mode".to_string(),
            ));
        }
        if self.trace == TraceMode::Context && self.context.is_none() {
            return Err(ConfigError::Invalid(
                "context mode requires a 'context' value".to_string(),
            ));
        }
        Ok(())
    }

    pub fn trace_capture(&self) -> TraceCapture {
        match self.trace {
            TraceMode::Caller => TraceCapture::Caller,
            TraceMode::Backtrace => TraceCapture::Backtrace {
                frames: self.trace_frames,
            },
            TraceMode::Context => TraceCapture::Context(self.context.clone().unwrap_or_default()),
            TraceMode::Disabled => TraceCapture::Disabled,
        }
    }

    pub fn dump_policy(&self) -> DumpPolicy {
        DumpPolicy {
            mode: self.mapping_dump,
            redact_keys: self.redact_keys.clone(),
            max_chars: self.max_dump_chars,
        }
    }
}

impl SafeAccessor {
    /// Build an accessor that logs through `tracing` with the configured policy.
    pub fn from_config(config: &AccessorConfig) -> Self {
        SafeAccessor::new(Arc::new(TracingLogger::new(config.log_tag.clone())))
            .with_trace(config.trace_capture())
            .with_dump_policy(config.dump_policy())
    }
}
