//! Per-instance handles addressing a rendered label region.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGION: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to the rendered region of one mounted label.
///
/// Every call to [`RegionHandle::new`] returns a handle distinct from all
/// others in the process, so several labels mounted on the same page
/// never resolve to each other's region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionHandle(u64);

impl RegionHandle {
    /// Allocate a fresh handle.
    #[must_use]
    pub fn new() -> Self {
        Self(NEXT_REGION.fetch_add(1, Ordering::Relaxed))
    }

    /// The DOM `id` attribute the region is rendered with.
    #[must_use]
    pub fn dom_id(&self) -> String {
        format!("wiscar-label-{}", self.0)
    }
}

impl Default for RegionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dom_id())
    }
}
