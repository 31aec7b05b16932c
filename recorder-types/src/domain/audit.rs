//! Provenance fields shared by every mutable record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Who created and last touched a record, and when.
///
/// `created_*` is written once at insertion. `updated_*` starts out equal to
/// the creation pair and is rewritten on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: UserId,
    pub created_on: DateTime<Utc>,
    pub updated_by: UserId,
    pub updated_on: DateTime<Utc>,
}

impl Audit {
    /// Audit stamp for a record inserted now by `user`.
    pub fn created(user: UserId) -> Self {
        Self::created_at(user, Utc::now())
    }

    /// Audit stamp for a record inserted at `at` by `user`.
    pub fn created_at(user: UserId, at: DateTime<Utc>) -> Self {
        Self {
            created_by: user,
            created_on: at,
            updated_by: user,
            updated_on: at,
        }
    }

    /// Records a modification by `user`. Creation fields are left untouched.
    pub fn touch(&mut self, user: UserId) {
        self.updated_by = user;
        self.updated_on = Utc::now();
    }
}
