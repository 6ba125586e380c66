//! Clock port
//!
//! Wall-clock access is injected so that pricing (which depends on the
//! current year) and order numbering stay deterministic under test.

use chrono::{DateTime, Datelike, Utc};

pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar year
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}
