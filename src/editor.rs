use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, Local};

use crate::{data::{UserID, UserProfile, ProfileUpdate}, error::EditorError, ports::ProfileStore};

/// Locally staged, not yet committed profile fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBuffer {
    pub bio: String,
    pub company_name: String,
    pub avatar: Option<String>,
}

impl From<&UserProfile> for ProfileBuffer {
    fn from(user: &UserProfile) -> Self {
        Self {
            bio: user.bio.clone(),
            company_name: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl ProfileBuffer {
    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            bio: self.bio.clone(),
            username: self.company_name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Ticket for an avatar read in flight. Only the newest ticket of a live edit may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarRead(u64);

pub struct ProfileEditor {
    user: UserID,
    buffer: Option<ProfileBuffer>,
    editing: bool,
    reads: u64,
    pending: Option<AvatarRead>,
}

impl ProfileEditor {
    pub fn new(user: UserID) -> Self {
        Self { user, buffer: None, editing: false, reads: 0, pending: None }
    }

    pub fn buffer(&self) -> Option<&ProfileBuffer> {
        self.buffer.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Fills the buffer the first time the user shows up in the store.
    pub fn load<P: ProfileStore>(&mut self, store: &P) -> bool {
        if self.buffer.is_none() {
            self.buffer = store.current_user(&self.user).map(ProfileBuffer::from);
        }
        self.buffer.is_some()
    }

    pub fn enter_edit(&mut self) {
        if self.buffer.is_some() {
            self.editing = true;
        }
    }

    pub fn set_bio(&mut self, bio: String) {
        if let Some(buffer) = &mut self.buffer {
            buffer.bio = bio;
        }
    }

    pub fn set_company_name(&mut self, company_name: String) {
        if let Some(buffer) = &mut self.buffer {
            buffer.company_name = company_name;
        }
    }

    /// Starts an avatar read. A newer read supersedes an older one still in flight.
    pub fn begin_avatar_read(&mut self) -> Option<AvatarRead> {
        if !self.editing {
            return None;
        }
        self.reads += 1;
        let read = AvatarRead(self.reads);
        self.pending = Some(read);
        Some(read)
    }

    pub fn is_pending(&self, read: AvatarRead) -> bool {
        self.pending == Some(read)
    }

    /// Lands the result of a read. `None` leaves the avatar as it was.
    pub fn finish_avatar_read(&mut self, read: AvatarRead, avatar: Option<String>) -> bool {
        if !self.is_pending(read) {
            return false;
        }
        self.pending = None;
        match (avatar, &mut self.buffer) {
            (Some(avatar), Some(buffer)) => {
                buffer.avatar = Some(avatar);
                true
            },
            _ => false,
        }
    }

    /// Pushes the whole buffer to the store and leaves edit mode. A read still
    /// in flight is dropped, so the avatar saved is the one staged before it.
    /// On failure the editor stays in edit mode with its buffer intact.
    pub fn save<P: ProfileStore>(&mut self, store: &mut P) -> Result<ProfileUpdate, EditorError> {
        let Some(buffer) = &self.buffer else {
            return Err(EditorError::NotLoaded);
        };
        if !self.editing {
            return Err(EditorError::NotEditing);
        }
        let update = buffer.to_update();
        store.update_profile(&self.user, &update)?;
        self.pending = None;
        self.editing = false;
        Ok(update)
    }

    /// Throws staged edits away and starts over from the store.
    pub fn discard<P: ProfileStore>(&mut self, store: &P) {
        self.buffer = store.current_user(&self.user).map(ProfileBuffer::from);
        self.editing = false;
        self.pending = None;
    }
}

/// Live editors, one per user, dropped after sitting idle.
#[derive(Default)]
pub struct Editors {
    editors: HashMap<UserID, (ProfileEditor, NaiveDateTime)>,
}

impl Editors {
    pub fn init() -> Self {
        Self::default()
    }

    pub fn open(&mut self, user: &UserID) -> &mut ProfileEditor {
        let now = Local::now().naive_local();
        let (editor, last_use) = self.editors.entry(user.clone())
            .or_insert_with(|| (ProfileEditor::new(user.clone()), now));
        *last_use = now;
        editor
    }

    /// Same as [`Editors::open`] without creating anything, for late completions.
    pub fn get_mut(&mut self, user: &UserID) -> Option<&mut ProfileEditor> {
        self.editors.get_mut(user).map(|(editor, _)| editor)
    }

    pub fn evict_idle(&mut self, max_idle: &Duration) -> usize {
        let now = Local::now().naive_local();
        let before = self.editors.len();
        self.editors.retain(|_, (_, last_use)| now.signed_duration_since(*last_use) <= *max_idle);
        before - self.editors.len()
    }
}
