use chrono::{DateTime, Utc};

use super::UserID;

pub struct Review {
    pub created: DateTime<Utc>,
    pub reviewer: UserID,
    pub reviewee: UserID,
    /// Between 1 and 5.
    pub rating: u8,
    pub comment: String,
}
