use std::sync::Mutex;

use actix_web::{get, HttpResponse, web::{Data, Query}};
use serde::Deserialize;

use crate::{config::Config, db::DB, editor::Editors, identity::CurrentUser, ports::ProfileStore, render::{render_page, render_loading, render_profile}};

pub const SAVE_FAILED: &str = "save-failed";

#[derive(Debug, Deserialize)]
pub struct Error {
    error: Option<String>,
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        SAVE_FAILED => Some("Your profile could not be saved. Please try again."),
        _ => None,
    }
}

#[get("/profile")]
pub async fn page_profile(db: Data<Mutex<DB>>, editors: Data<Mutex<Editors>>, config: Data<Config>, user: Option<CurrentUser>, query: Query<Error>) -> HttpResponse {
    let db = db.lock().unwrap();
    let mut editors = editors.lock().unwrap();
    editors.evict_idle(&config.editor_idle);
    let Some((user, profile)) = user.and_then(|x| db.current_user(&x.user).map(|p| (x, p))) else {
        return render_page(None, render_loading);
    };
    let editor = editors.open(&user.user);
    editor.load(&*db);
    let error = query.0.error.as_deref().and_then(error_message);
    render_page(Some(profile), || render_profile(profile, editor, &*db, error))
}
