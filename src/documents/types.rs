//! Document Record Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered document.
///
/// Only metadata and the keyed commitment are stored; raw content is
/// hashed at upload and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub commitment: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}
