use std::{collections::HashMap, path::PathBuf};

use log::info;

use crate::{data::{UserProfile, UserID, ProfileUpdate, Review, ReviewID}, error::StoreError, ports::ProfileStore};

pub mod reviews;
pub mod store;

#[derive(Default)]
pub struct DB {
    root: PathBuf,
    users: HashMap<UserID, UserProfile>,
    reviews: Vec<(ReviewID, Review)>,
}

impl DB {
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let mut l = Self { root: root.into(), ..Self::default() };
        l.reload();
        l
    }

    pub fn reload(&mut self) {
        self.users = store::load_users(&self.root).into_iter()
            .map(|x| (x.id.clone(), x))
            .collect();
        self.reviews = store::load_reviews(&self.root);
        info!("loaded {} users & {} reviews from {}", self.users.len(), self.reviews.len(), self.root.display());
    }

    pub fn get_user(&self, id: &UserID) -> Option<&UserProfile> {
        self.users.get(id)
    }
}

impl ProfileStore for DB {
    fn current_user(&self, id: &UserID) -> Option<&UserProfile> {
        self.get_user(id)
    }

    fn update_profile(&mut self, id: &UserID, update: &ProfileUpdate) -> Result<(), StoreError> {
        let Some(user) = self.users.get(id) else {
            return Err(StoreError::UnknownUser(id.clone()));
        };
        let mut updated = user.clone();
        updated.apply(update);
        store::store_user(&self.root, &updated)?;
        self.users.insert(id.clone(), updated);
        Ok(())
    }
}

#[cfg(test)]
impl DB {
    pub fn insert_user(&mut self, user: UserProfile) {
        store::store_user(&self.root, &user).unwrap();
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_review(&mut self, id: &str, review: Review) {
        let id = ReviewID(id.to_string());
        store::store_review(&self.root, &id, &review).unwrap();
        self.reviews.push((id, review));
    }
}
