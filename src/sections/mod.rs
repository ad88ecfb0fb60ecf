//! The stateful sections of the portfolio. Each one reads its keys once at load,
//! writes through on every change, and keeps working in memory when a write fails.

pub mod avatar;
pub mod gallery;
pub mod intro;
pub mod profiling;

use tracing::warn;

use crate::notify::Notifier;
use crate::store::{KeyValueStore, StoreResult};

/// Read `key`, treating a failed read the same as a missing key.
pub(crate) fn load_key(store: &dyn KeyValueStore, key: &str) -> Option<String> {
  match store.get(key) {
    Ok(value) => value,
    Err(e) => {
      warn!(key = %key, err = %e, "section: read failed, using default");
      None
    }
  }
}

/// Write `value` under `key`, or remove the key when `value` is `None`.
/// A failure is logged and surfaced as a warning; returns whether the write stuck.
pub(crate) fn write_through(
  store: &mut dyn KeyValueStore,
  notifier: &mut dyn Notifier,
  key: &str,
  value: Option<&str>,
  failure_message: &str,
) -> bool {
  let result: StoreResult<()> = match value {
    Some(value) => store.set(key, value),
    None => store.remove(key),
  };
  report(result, notifier, key, failure_message)
}

pub(crate) fn report(result: StoreResult<()>, notifier: &mut dyn Notifier, key: &str, failure_message: &str) -> bool {
  match result {
    Ok(()) => true,
    Err(e) => {
      warn!(key = %key, err = %e, "section: persistence failed, keeping in-memory state");
      notifier.warning(failure_message);
      false
    }
  }
}
