use crate::{data::{UserID, Review}, ports::ReviewStore};

use super::DB;

impl ReviewStore for DB {
    fn reviews_for_user(&self, id: &UserID) -> Vec<&Review> {
        self.reviews.iter()
            .map(|(_, review)| review)
            .filter(|review| &review.reviewee == id)
            .collect()
    }

    fn average_rating_for_user(&self, id: &UserID) -> f64 {
        let reviews = self.reviews_for_user(id);
        if reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = reviews.iter().map(|x| x.rating as u32).sum();
        total as f64 / reviews.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use crate::{db::{DB, fixtures::review}, data::UserID, ports::ReviewStore};

    #[test]
    fn average_covers_only_reviews_of_the_user() {
        let dir = TempDir::new("store").unwrap();
        let mut db = DB::load(dir.path());
        db.insert_review("1", review("alice", "acme", 4, 1));
        db.insert_review("2", review("bob", "acme", 3, 2));
        db.insert_review("3", review("carol", "globex", 1, 3));

        let acme = UserID("acme".to_string());
        assert_eq!(db.reviews_for_user(&acme).len(), 2);
        assert!((db.average_rating_for_user(&acme) - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn average_without_reviews_is_zero() {
        let dir = TempDir::new("store").unwrap();
        let db = DB::load(dir.path());
        assert_eq!(db.average_rating_for_user(&UserID("acme".to_string())), 0.0);
    }
}
