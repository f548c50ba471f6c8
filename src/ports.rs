use crate::{data::{UserID, UserProfile, ProfileUpdate, Review}, error::StoreError};

/// Identity/profile store as seen by the profile page.
pub trait ProfileStore {
    fn current_user(&self, id: &UserID) -> Option<&UserProfile>;

    /// Replaces `bio`, `username` & `avatar` of the user in one go.
    fn update_profile(&mut self, id: &UserID, update: &ProfileUpdate) -> Result<(), StoreError>;
}

/// Review store as seen by the profile page. Reviews come back in the store's own order.
pub trait ReviewStore {
    fn reviews_for_user(&self, id: &UserID) -> Vec<&Review>;

    /// Mean rating in `[0, 5]`, `0` when there are no reviews.
    fn average_rating_for_user(&self, id: &UserID) -> f64;
}
