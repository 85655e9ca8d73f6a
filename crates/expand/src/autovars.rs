// SPDX-License-Identifier: MIT

//! Auto-injected `__runner_*` variables.
//!
//! `__runner_datetime` and `__runner_pid` are captured exactly once per
//! process — not per scope, per run — so every global/group/command sees
//! the same timestamp and pid no matter how deep the expansion pipeline
//! runs. `__runner_workdir` is scope-dependent and injected by whichever
//! stage resolves that scope's working directory.

use indexmap::IndexMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide auto-vars, captured once at pipeline start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessAutoVars {
    pub datetime: String,
    pub pid: String,
}

impl ProcessAutoVars {
    /// Captures the two process-wide values. The only two ambient reads
    /// in the whole expansion pipeline: `SystemTime::now` and
    /// `std::process::id()`.
    pub fn capture() -> Self {
        let now = SystemTime::now();
        Self {
            datetime: format_datetime(now),
            pid: std::process::id().to_string(),
        }
    }

    /// Builds a captured instance from explicit values, for deterministic
    /// tests that don't want to depend on wall-clock time.
    pub fn from_parts(datetime: impl Into<String>, pid: impl Into<String>) -> Self {
        Self {
            datetime: datetime.into(),
            pid: pid.into(),
        }
    }

    pub fn as_bindings(&self) -> IndexMap<String, String> {
        let mut bindings = IndexMap::new();
        bindings.insert("__runner_datetime".to_string(), self.datetime.clone());
        bindings.insert("__runner_pid".to_string(), self.pid.clone());
        bindings
    }
}

/// Formats `YYYYMMDDHHMMSS.mmm` in UTC from a `SystemTime`, without
/// pulling in a full datetime crate the pipeline has no other use for.
fn format_datetime(time: SystemTime) -> String {
    let duration = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    let millis = duration.subsec_millis();
    let (y, mo, d, h, mi, s) = civil_from_unix(duration.as_secs());
    format!("{y:04}{mo:02}{d:02}{h:02}{mi:02}{s:02}.{millis:03}")
}

/// Days-from-epoch civil calendar conversion (Howard Hinnant's
/// `civil_from_days` algorithm), used only to render `__runner_datetime`
/// without a chrono/time dependency the rest of this crate has no other
/// use for.
fn civil_from_unix(unix_secs: u64) -> (i64, u32, u32, u32, u32, u32) {
    let secs_of_day = unix_secs % 86_400;
    let days = (unix_secs / 86_400) as i64;

    let h = (secs_of_day / 3600) as u32;
    let mi = ((secs_of_day % 3600) / 60) as u32;
    let s = (secs_of_day % 60) as u32;

    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let y = if m <= 2 { y + 1 } else { y };

    (y, m, d, h, mi, s)
}

#[cfg(test)]
#[path = "autovars_tests.rs"]
mod tests;
