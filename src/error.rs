use std::io;

use crate::data::UserID;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("No user named '{0}'")]
    UnknownUser(UserID),
    #[error("Store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed record: {0}")]
    Json(#[from] json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error("Profile is not loaded yet")]
    NotLoaded,
    #[error("Profile is not being edited")]
    NotEditing,
    #[error("Could not save profile: {0}")]
    Store(#[from] StoreError),
}
