//! Trace buffer configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default initial buffer capacity: 64 KiB.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64 << 10;

/// Sizing for a [`TraceBuffer`](crate::TraceBuffer).
///
/// Loadable from JSON, e.g.
///
/// ```json
/// { "initial_capacity": 1048576, "max_bytes": 67108864 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Bytes reserved up front.
    pub initial_capacity: usize,
    /// Hard limit on buffered bytes. `None` lets the buffer grow until
    /// allocation fails.
    pub max_bytes: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_bytes: None,
        }
    }
}

impl BufferConfig {
    pub fn from_json(buf: &str) -> Result<Self> {
        let config: BufferConfig = serde_json::from_str(buf)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let buf = fs::read_to_string(path)
            .with_context(|| format!("Failed to read buffer config {}", path.display()))?;
        Self::from_json(&buf)
            .with_context(|| format!("Invalid buffer config {}", path.display()))
    }

    /// Capacity to reserve at creation, never more than the limit.
    pub(crate) fn reserve_hint(&self) -> usize {
        match self.max_bytes {
            Some(max) => self.initial_capacity.min(max),
            None => self.initial_capacity,
        }
    }
}
