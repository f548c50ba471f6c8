use std::collections::HashSet;

use actix_web::{HttpResponse, http::{header::ContentType, StatusCode}};
use ammonia::Builder;
use chrono::Utc;
use html_escape::{encode_text, encode_double_quoted_attribute};

use crate::{avatar::ACCEPTED_MEDIA, data::{UserProfile, Review}, editor::{ProfileEditor, ProfileBuffer}, ports::ReviewStore, rating::{RatingBlock, STAR_COUNT}};

use self::format::format_date_time;

mod format;

const INDEX: &str = include_str!("../../assets/index.html");
const PAGE_LOADING: &str = include_str!("../../assets/page/loading.html");
const PAGE_404: &str = include_str!("../../assets/page/404.html");
const PAGE_PROFILE: &str = include_str!("../../assets/page/profile.html");
const ERROR: &str = include_str!("../../assets/element/error.html");
const AVATAR_IMAGE: &str = include_str!("../../assets/element/avatar/image.html");
const AVATAR_PLACEHOLDER: &str = include_str!("../../assets/element/avatar/placeholder.html");
const AVATAR_UPLOAD: &str = include_str!("../../assets/element/avatar/upload.html");
const RATING: &str = include_str!("../../assets/element/rating.html");
const ABOUT_READ_ONLY: &str = include_str!("../../assets/element/about/read-only.html");
const ABOUT_EDITING: &str = include_str!("../../assets/element/about/editing.html");
const REVIEW: &str = include_str!("../../assets/element/review/review.html");
const NO_REVIEWS: &str = include_str!("../../assets/element/review/none.html");

pub const NO_BIO: &str = "No bio yet. Click \"Edit Profile\" to add information about your company.";

pub fn render_page<R>(user: Option<&UserProfile>, render_content: R) -> HttpResponse
    where R: FnOnce() -> String {
    render_page_with_status(StatusCode::OK, user, render_content)
}

pub fn render_page_with_status<R>(status: StatusCode, user: Option<&UserProfile>, render_content: R) -> HttpResponse
    where R: FnOnce() -> String {
    let html = INDEX
        .replace("{{session-area}}", user.map_or_else(String::new, |x| encode_text(&x.username).to_string()).as_str())
        .replace("{{content}}", render_content().as_str());
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html)
}

pub fn render_loading() -> String {
    PAGE_LOADING.to_string()
}

pub fn render_not_found() -> String {
    PAGE_404.to_string()
}

pub fn render_stars(stars: &[bool; STAR_COUNT]) -> String {
    stars.iter()
        .map(|filled| if *filled { "<span class=\"star filled\">★</span>" } else { "<span class=\"star\">★</span>" })
        .collect()
}

pub fn render_rating(rating: Option<&RatingBlock>) -> String {
    match rating {
        Some(rating) => RATING
            .replace("{{stars}}", render_stars(&rating.stars()).as_str())
            .replace("{{label}}", rating.label().as_str()),
        None => "".to_string(),
    }
}

fn render_avatar(user: &UserProfile, buffer: &ProfileBuffer, editing: bool) -> String {
    let editing_class = if editing { " editing" } else { "" };
    match &buffer.avatar {
        Some(src) => AVATAR_IMAGE
            .replace("{{editing-class}}", editing_class)
            .replace("{{src}}", encode_double_quoted_attribute(src).as_ref())
            .replace("{{alt}}", encode_double_quoted_attribute(&user.username).as_ref()),
        None => AVATAR_PLACEHOLDER
            .replace("{{editing-class}}", editing_class)
            .replace("{{alt}}", encode_double_quoted_attribute(&user.username).as_ref())
            .replace("{{initial}}", encode_text(&initial(&user.username)).as_ref()),
    }
}

fn initial(name: &str) -> String {
    name.chars().find(|x| x.is_alphanumeric())
        .map_or_else(|| "?".to_string(), |x| x.to_uppercase().to_string())
}

fn render_about(buffer: &ProfileBuffer, editing: bool) -> String {
    if editing {
        ABOUT_EDITING
            .replace("{{avatar-upload}}", AVATAR_UPLOAD.replace("{{accept}}", ACCEPTED_MEDIA).as_str())
            .replace("{{company-name}}", encode_double_quoted_attribute(&buffer.company_name).as_ref())
            .replace("{{bio}}", encode_text(&buffer.bio).as_ref())
    } else {
        let bio = if buffer.bio.is_empty() { NO_BIO } else { buffer.bio.as_str() };
        ABOUT_READ_ONLY.replace("{{bio}}", encode_text(bio).as_ref())
    }
}

pub fn render_review(review: &Review) -> String {
    let comment = Builder::new()
        .tags(HashSet::from(["b", "i", "em", "q", "u", "var"]))
        .clean(review.comment.as_str())
        .to_string();
    let mut stars = [false; STAR_COUNT];
    for star in stars.iter_mut().take(review.rating as usize) {
        *star = true;
    }
    REVIEW
        .replace("{{reviewer}}", encode_text(&review.reviewer.0).as_ref())
        .replace("{{stars}}", render_stars(&stars).as_str())
        .replace("{{created-time}}", format_date_time(&review.created, &Utc::now()).as_str())
        .replace("{{comment}}", comment.as_str())
}

pub fn render_profile<R: ReviewStore>(user: &UserProfile, editor: &ProfileEditor, reviews: &R, error: Option<&str>) -> String {
    let Some(buffer) = editor.buffer() else {
        return render_loading();
    };
    let editing = editor.is_editing();
    let user_reviews = reviews.reviews_for_user(&user.id);
    let rating = RatingBlock::new(reviews.average_rating_for_user(&user.id), user_reviews.len());
    let review_list = if user_reviews.is_empty() {
        NO_REVIEWS.to_string()
    } else {
        user_reviews.into_iter().map(render_review).collect::<Vec<_>>().join("")
    };
    PAGE_PROFILE
        .replace("{{insert-error-here}}", error.map_or_else(String::new, |x| ERROR.replace("{{error}}", encode_text(x).as_ref())).as_str())
        .replace("{{avatar}}", render_avatar(user, buffer, editing).as_str())
        .replace("{{user-name}}", encode_text(&user.username).as_ref())
        .replace("{{email}}", encode_text(&user.email).as_ref())
        .replace("{{rating}}", render_rating(rating.as_ref()).as_str())
        .replace("{{about}}", render_about(buffer, editing).as_str())
        .replace("{{reviews}}", review_list.as_str())
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::{db::{DB, fixtures::{acme, review}}, ports::ProfileStore};

    fn setup() -> (TempDir, DB, ProfileEditor) {
        let dir = TempDir::new("store").unwrap();
        let mut db = DB::load(dir.path());
        db.insert_user(acme());
        let mut editor = ProfileEditor::new(acme().id);
        editor.load(&db);
        (dir, db, editor)
    }

    #[test]
    fn read_only_profile_without_reviews() {
        let (_dir, db, editor) = setup();
        let html = render_profile(&acme(), &editor, &db, None);
        assert!(html.contains("Edit Profile"));
        assert!(html.contains(NO_BIO));
        assert!(html.contains("No reviews yet."));
        assert!(!html.contains("class=\"rating\""));
        assert!(!html.contains("type=\"file\""));
        assert!(html.contains("hr@acme.test"));
    }

    #[test]
    fn edit_mode_prefills_fields() {
        let (_dir, mut db, mut editor) = setup();
        let mut update = crate::data::ProfileUpdate { bio: "We <3 widgets".to_string(), username: "Acme Co".to_string(), avatar: None };
        db.update_profile(&acme().id, &update).unwrap();
        editor.discard(&db);
        editor.enter_edit();
        let html = render_profile(db.get_user(&acme().id).unwrap(), &editor, &db, None);
        assert!(html.contains(">We &lt;3 widgets</textarea>"));
        assert!(html.contains("value=\"Acme Co\""));
        assert!(html.contains("accept=\"image/*\""));
        let about_form = html.split("action=\"/profile/save\"").nth(1).unwrap().split("</form>").next().unwrap();
        assert!(about_form.contains("name=\"bio\""));
        assert!(about_form.contains("name=\"company_name\""));
        assert!(about_form.contains("type=\"file\" name=\"avatar\""));
        assert!(about_form.contains("formenctype=\"multipart/form-data\""));
        assert!(html.contains(">Save</button>"));
        assert!(!html.contains("Edit Profile"));

        update.avatar = Some("data:image/png;base64,AAAA".to_string());
        db.update_profile(&acme().id, &update).unwrap();
        editor.discard(&db);
        let html = render_profile(db.get_user(&acme().id).unwrap(), &editor, &db, None);
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn rating_block_and_reviews() {
        let (_dir, mut db, editor) = setup();
        db.insert_review("1", review("alice", "acme", 4, 1));
        db.insert_review("2", review("bob", "acme", 4, 2));
        db.insert_review("3", review("carol", "acme", 3, 3));
        db.insert_review("4", review("dave", "acme", 3, 4));
        db.insert_review("5", review("erin", "globex", 1, 5));
        let html = render_profile(&acme(), &editor, &db, None);
        assert!(html.contains("3.5 (4 reviews)"));
        let rating = html.split("class=\"rating\"").nth(1).unwrap();
        let stars = rating.split("</div>").next().unwrap();
        assert_eq!(stars.matches("star filled").count(), 4);
        assert!(html.contains("4 stars from alice"));
        assert!(!html.contains("erin"));
        assert!(html.find("alice").unwrap() < html.find("dave").unwrap());
    }

    #[test]
    fn review_comments_are_sanitised() {
        let mut r = review("mallory", "acme", 2, 1);
        r.comment = "<b>meh</b><script>alert(1)</script>".to_string();
        let html = render_review(&r);
        assert!(html.contains("<b>meh</b>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn unloaded_editor_renders_placeholder() {
        let (_dir, db, _) = setup();
        let editor = ProfileEditor::new(crate::data::UserID("ghost".to_string()));
        assert_eq!(render_profile(&acme(), &editor, &db, None), render_loading());
    }

    #[test]
    fn errors_are_escaped() {
        let (_dir, db, editor) = setup();
        let html = render_profile(&acme(), &editor, &db, Some("<oops>"));
        assert!(html.contains("<p class=\"error\">&lt;oops&gt;</p>"));
    }
}
