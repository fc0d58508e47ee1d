//! Disk cache gate for raw upstream payloads.
//!
//! One flat UTF-8 text file per (dataset, country) pair. A stored payload is
//! reused while it is younger than the freshness threshold; otherwise the
//! retrieval function runs and its result is persisted verbatim. There is no
//! eviction and no locking (last writer wins).

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::Result;

/// Return the cached payload at `path` if fresh, else invoke `fetch`, persist
/// the result, and return it.
///
/// Failure policy:
///
/// - retrieval failure -> `None` (downstream treats the dataset as absent)
/// - cache read failure -> fall through to retrieval
/// - persist failure -> logged, the freshly fetched payload is still returned
///
/// In offline mode retrieval is never invoked: a readable cached copy of any
/// age is returned, anything else is `None`.
pub fn fetch_cached<F>(path: &Path, max_age: Duration, offline: bool, fetch: F) -> Option<String>
where
    F: FnOnce() -> Result<String>,
{
    if is_fresh(path, max_age, offline) {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(cache = %path.display(), "using cached payload");
                return Some(text);
            }
            Err(err) => {
                warn!(cache = %path.display(), error = %err, "cache read failed");
            }
        }
    }

    if offline {
        warn!(cache = %path.display(), "no usable cached copy and network is disabled");
        return None;
    }

    match fetch() {
        Ok(text) => {
            if let Err(err) = fs::write(path, &text) {
                warn!(cache = %path.display(), error = %err, "failed to persist payload");
            } else {
                info!(cache = %path.display(), bytes = text.len(), "payload cached");
            }
            Some(text)
        }
        Err(err) => {
            warn!(cache = %path.display(), error = %err, "download failed");
            None
        }
    }
}

fn is_fresh(path: &Path, max_age: Duration, offline: bool) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if offline {
        return true;
    }
    let Ok(modified) = meta.modified() else {
        return false;
    };
    match modified.elapsed() {
        Ok(age) => age < max_age,
        // A modification time in the future counts as fresh.
        Err(_) => true,
    }
}
