//! Expected PEP statuses keyed by the code shown in the PEP index table

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Codes longer than this are never valid index codes
const MAX_CODE_LEN: usize = 2;

/// Default table: index code → acceptable long-form statuses
pub static EXPECTED_STATUS: Lazy<ExpectedStatus> = Lazy::new(|| {
    ExpectedStatus::from_entries([
        ("A", Some(&["Active", "Accepted"] as &[&str])),
        ("D", Some(&["Deferred"] as &[&str])),
        ("F", Some(&["Final"] as &[&str])),
        ("P", Some(&["Provisional"] as &[&str])),
        ("R", Some(&["Rejected"] as &[&str])),
        ("S", Some(&["Superseded"] as &[&str])),
        ("W", Some(&["Withdrawn"] as &[&str])),
        ("", Some(&["Draft", "Active"] as &[&str])),
    ])
});

/// Outcome of comparing a detail-page status with the index code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Status is one of the expected values
    Expected,

    /// Known code, status outside its set; still counted
    Mismatch { expected: &'static [&'static str] },

    /// Unknown code or undefined expected set; not counted
    Invalid,
}

impl Reconciliation {
    /// Whether the observed status goes into the tally
    pub fn is_counted(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

/// Immutable lookup table of expected statuses
#[derive(Debug, Clone)]
pub struct ExpectedStatus {
    table: HashMap<&'static str, Option<&'static [&'static str]>>,
}

impl ExpectedStatus {
    /// Builds a table; a `None` set marks a code whose every status is invalid
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Option<&'static [&'static str]>)>,
    {
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// The expected set for `code`; outer `None` means the code is unknown
    pub fn get(&self, code: &str) -> Option<Option<&'static [&'static str]>> {
        self.table.get(code).copied()
    }

    pub fn reconcile(&self, code: &str, status: &str) -> Reconciliation {
        let Some(entry) = self.get(code) else {
            return Reconciliation::Invalid;
        };
        let Some(expected) = entry else {
            return Reconciliation::Invalid;
        };

        if expected.iter().any(|s| *s == status) {
            Reconciliation::Expected
        } else if code.chars().count() > MAX_CODE_LEN {
            Reconciliation::Invalid
        } else {
            Reconciliation::Mismatch { expected }
        }
    }
}
