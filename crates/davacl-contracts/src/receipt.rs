//! The record returned by a successful ACL commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ace::Ace;

/// Returned by the commit engine once the new list has been written.
///
/// Receiving a receipt means the request was fully handled; no default
/// processing should follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Path of the resource whose ACL was replaced.
    pub path: String,
    /// Number of entries in the committed list.
    pub entries: usize,
    /// How many committed entries are flagged protected.
    pub protected: usize,
    /// Previously stored entries absent from the committed list.
    pub dropped: Vec<Ace>,
    /// Wall-clock time (UTC) the write completed.
    pub committed_at: DateTime<Utc>,
}
