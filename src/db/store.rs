use std::{fs::{read_dir, read_to_string, create_dir_all, write}, path::{Path, PathBuf}};

use chrono::{DateTime, Utc};
use json::{JsonValue, object};
use log::warn;

use crate::{data::{UserProfile, UserID, Review, ReviewID}, error::StoreError};

pub(super) const USERS_DIR: &str = "users";
pub(super) const REVIEWS_DIR: &str = "reviews";

fn record_files(dir: &Path) -> Vec<(String, PathBuf)> {
    match read_dir(dir) {
        Ok(x) => x.filter_map(|x| {
            let file = x.ok()?;
            let name = file.file_name().into_string().ok()?;
            let name = name.strip_suffix(".json")?.to_string();
            Some((name, file.path()))
        }).collect(),
        Err(_) => vec![],
    }
}

fn read_record(path: &Path) -> Option<JsonValue> {
    let parsed = read_to_string(path)
        .map_err(StoreError::from)
        .and_then(|x| json::parse(&x).map_err(StoreError::from));
    match parsed {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("skipping {}: {}", path.display(), e);
            None
        },
    }
}

pub(super) fn load_users(root: &Path) -> Vec<UserProfile> {
    record_files(&root.join(USERS_DIR)).into_iter()
        .filter_map(|(name, path)| {
            let json = read_record(&path)?;
            let Some(username) = json["username"].as_str() else {
                warn!("skipping {}: no username", path.display());
                return None;
            };
            Some(UserProfile {
                id: UserID(name),
                username: username.to_string(),
                email: json["email"].as_str().unwrap_or_default().to_string(),
                bio: json["bio"].as_str().unwrap_or_default().to_string(),
                avatar: json["avatar"].as_str().map(str::to_string),
            })
        })
        .collect()
}

pub(super) fn load_reviews(root: &Path) -> Vec<(ReviewID, Review)> {
    let mut reviews = record_files(&root.join(REVIEWS_DIR)).into_iter()
        .filter_map(|(name, path)| {
            let json = read_record(&path)?;
            let created = json["created"].as_str()
                .and_then(|x| DateTime::parse_from_rfc3339(x).ok())
                .map(|x| x.with_timezone(&Utc));
            let rating = json["rating"].as_u8().filter(|x| (1..=5).contains(x));
            let (Some(created), Some(rating), Some(reviewer), Some(reviewee)) =
                (created, rating, json["reviewer"].as_str(), json["reviewee"].as_str()) else {
                warn!("skipping {}: incomplete review", path.display());
                return None;
            };
            Some((ReviewID(name), Review {
                created,
                reviewer: UserID(reviewer.to_string()),
                reviewee: UserID(reviewee.to_string()),
                rating,
                comment: json["comment"].as_str().unwrap_or_default().to_string(),
            }))
        })
        .collect::<Vec<_>>();
    reviews.sort_by(|(a_id, a), (b_id, b)| a.created.cmp(&b.created).then_with(|| a_id.0.cmp(&b_id.0)));
    reviews
}

pub(super) fn store_user(root: &Path, user: &UserProfile) -> Result<(), StoreError> {
    let dir = root.join(USERS_DIR);
    create_dir_all(&dir)?;
    let json = object! {
        username: user.username.as_str(),
        email: user.email.as_str(),
        bio: user.bio.as_str(),
        avatar: user.avatar.as_deref(),
    };
    write(dir.join(user.id.0.clone() + ".json"), json.to_string())?;
    Ok(())
}

#[cfg(test)]
pub(super) fn store_review(root: &Path, id: &ReviewID, review: &Review) -> Result<(), StoreError> {
    let dir = root.join(REVIEWS_DIR);
    create_dir_all(&dir)?;
    let json = object! {
        created: review.created.to_rfc3339(),
        reviewer: review.reviewer.0.as_str(),
        reviewee: review.reviewee.0.as_str(),
        rating: review.rating,
        comment: review.comment.as_str(),
    };
    write(dir.join(id.0.clone() + ".json"), json.to_string())?;
    Ok(())
}
