use super::UserID;

/// Snapshot of a user as the profile store knows it.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: UserID,
    /// Display name, shown as the company name on the employer page.
    pub username: String,
    pub email: String,
    pub bio: String,
    /// Opaque image reference, usually a `data:` URL.
    pub avatar: Option<String>,
}

/// The only fields the profile page may change, always replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub bio: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl UserProfile {
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.bio = update.bio.clone();
        self.username = update.username.clone();
        self.avatar = update.avatar.clone();
    }
}
