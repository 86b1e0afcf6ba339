//! Classify-once registry for logging call sites.
//!
//! Each distinct format string is classified the first time it is seen and
//! mapped to a compact 16-bit id. Later calls from the same call site look up
//! the cached classification instead of scanning the format again. Only
//! immutable classification data lives here; per-call scratch state such as
//! [`RunningPrecision`](crate::RunningPrecision) is never stored.
//!
//! # Thread Safety
//!
//! The registry is process-wide and guarded by a mutex, so it can be used
//! from any number of threads.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, SizerError};
use crate::format_classifier::{classify, contains_invalid};
use crate::param_type::ParamType;

/// Number of formats the registry can hold. Id 0 is reserved.
pub const REGISTRY_CAPACITY: usize = u16::MAX as usize;

struct FormatEntry {
    format: &'static str,
    params: Arc<[ParamType]>,
}

#[derive(Default)]
struct Registry {
    ids: HashMap<&'static str, u16>,
    // entries[i] holds id i + 1
    entries: Vec<FormatEntry>,
}

impl Registry {
    fn get(&self, id: u16) -> Option<&FormatEntry> {
        let index = usize::from(id).checked_sub(1)?;
        self.entries.get(index)
    }
}

lazy_static! {
    static ref FORMAT_REGISTRY: Mutex<Registry> = Mutex::new(Registry::default());
}

/// Registers a format string and returns its id.
///
/// Registering the same string again returns the same id without
/// re-classifying it.
///
/// # Errors
///
/// Returns [`SizerError::RegistryFull`] once [`REGISTRY_CAPACITY`] formats
/// have been registered.
///
/// # Examples
///
/// ```
/// # use format_sizer::format_registry::{register_format, param_types};
/// # use format_sizer::ParamType;
/// let id = register_format("queue depth %zu").unwrap();
/// assert_eq!(register_format("queue depth %zu").unwrap(), id);
/// assert_eq!(param_types(id).unwrap().as_ref(), &[ParamType::NonString]);
/// ```
pub fn register_format(format: &'static str) -> Result<u16> {
    if let Some(&id) = FORMAT_REGISTRY.lock().ids.get(format) {
        return Ok(id);
    }

    // Classify outside the lock
    let params: Arc<[ParamType]> = classify(format).into();

    let mut registry = FORMAT_REGISTRY.lock();
    if let Some(&id) = registry.ids.get(format) {
        return Ok(id);
    }
    if registry.entries.len() >= REGISTRY_CAPACITY {
        return Err(SizerError::RegistryFull {
            capacity: REGISTRY_CAPACITY,
        });
    }

    if contains_invalid(&params) {
        warn!(format, "format string contains invalid or unsupported specifiers");
    }

    registry.entries.push(FormatEntry { format, params });
    let id = registry.entries.len() as u16;
    registry.ids.insert(format, id);
    debug!(id, format, "registered format string");
    Ok(id)
}

/// Cached classification for a registered format id.
///
/// Returns `None` for id 0 and for ids that were never handed out.
pub fn param_types(id: u16) -> Option<Arc<[ParamType]>> {
    FORMAT_REGISTRY
        .lock()
        .get(id)
        .map(|entry| Arc::clone(&entry.params))
}

/// Format string registered under `id`.
pub fn format_string(id: u16) -> Option<&'static str> {
    FORMAT_REGISTRY.lock().get(id).map(|entry| entry.format)
}
