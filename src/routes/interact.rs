use std::sync::Mutex;

use actix_multipart::Multipart;
use actix_web::{post, HttpResponse, http::header::LOCATION, web::{Data, Form}};
use log::{info, warn};
use serde::Deserialize;

use crate::{avatar::{read_upload, UploadForm}, config::Config, db::DB, editor::Editors, error::EditorError, identity::CurrentUser};

use super::page::SAVE_FAILED;

const PROFILE: &str = "/profile";

#[derive(Deserialize)]
pub struct ProfileForm {
    bio: String,
    company_name: String,
}

fn redirect(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((LOCATION, to))
        .finish()
}

#[post("/profile/edit")]
pub async fn enter_edit(db: Data<Mutex<DB>>, editors: Data<Mutex<Editors>>, user: Option<CurrentUser>) -> HttpResponse {
    if let Some(user) = user {
        let db = db.lock().unwrap();
        let mut editors = editors.lock().unwrap();
        let editor = editors.open(&user.user);
        if editor.load(&*db) {
            editor.enter_edit();
        }
    }
    redirect(PROFILE)
}

#[post("/profile/save")]
pub async fn save_profile(db: Data<Mutex<DB>>, editors: Data<Mutex<Editors>>, user: Option<CurrentUser>, Form(input): Form<ProfileForm>) -> HttpResponse {
    let Some(user) = user else {
        return redirect(PROFILE);
    };
    let mut db = db.lock().unwrap();
    let mut editors = editors.lock().unwrap();
    let editor = editors.open(&user.user);
    if !editor.load(&*db) {
        return redirect(PROFILE);
    }
    // the editor may have been evicted while the form was open
    editor.enter_edit();
    editor.set_bio(input.bio);
    editor.set_company_name(input.company_name);
    match editor.save(&mut *db) {
        Ok(_) => {
            info!("saved profile of {}", user.user);
            redirect(PROFILE)
        },
        Err(EditorError::Store(e)) => {
            warn!("could not save profile of {}: {}", user.user, e);
            redirect(&format!("{}?error={}", PROFILE, SAVE_FAILED))
        },
        Err(_) => redirect(PROFILE),
    }
}

#[post("/profile/cancel")]
pub async fn cancel_edit(db: Data<Mutex<DB>>, editors: Data<Mutex<Editors>>, user: Option<CurrentUser>) -> HttpResponse {
    if let Some(user) = user {
        let db = db.lock().unwrap();
        if let Some(editor) = editors.lock().unwrap().get_mut(&user.user) {
            editor.discard(&*db);
        }
    }
    redirect(PROFILE)
}

#[post("/profile/avatar")]
pub async fn upload_avatar(editors: Data<Mutex<Editors>>, config: Data<Config>, user: Option<CurrentUser>, payload: Multipart) -> HttpResponse {
    let Some(user) = user else {
        return redirect(PROFILE);
    };
    let read = editors.lock().unwrap()
        .get_mut(&user.user)
        .and_then(|x| x.begin_avatar_read());
    let Some(read) = read else {
        return redirect(PROFILE);
    };
    let form = match read_upload(payload, config.max_avatar_bytes).await {
        Ok(form) => form,
        Err(e) => {
            warn!("ignoring upload of {}: {}", user.user, e);
            UploadForm::default()
        },
    };
    if let Some(e) = &form.rejected {
        warn!("ignoring avatar of {}: {}", user.user, e);
    }
    // the editor may be gone by now, which turns the read into a no-op
    if let Some(editor) = editors.lock().unwrap().get_mut(&user.user) {
        if editor.is_pending(read) {
            if let Some(bio) = form.bio {
                editor.set_bio(bio);
            }
            if let Some(company_name) = form.company_name {
                editor.set_company_name(company_name);
            }
        }
        editor.finish_avatar_read(read, form.avatar);
    }
    redirect(PROFILE)
}
