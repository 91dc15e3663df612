//! Deduplicated warnings.
//!
//! Malformed input is absorbed rather than rejected, so the same complaint
//! can fire thousands of times on one document. Each unique message is
//! emitted once through `tracing` until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about lenient handling of input (emitted once per unique message).
///
/// Returns `true` when the warning was emitted, `false` when it was
/// suppressed as a duplicate.
///
/// # Example
/// ```ignore
/// warn_once("Attributes", "unterminated quote in `<a href=\"x>`");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call when starting on a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
