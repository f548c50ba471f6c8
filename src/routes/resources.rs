use std::io::Result;
use actix_files::NamedFile;
use actix_web::get;

#[get("/layout.css")]
pub async fn css_layout() -> Result<NamedFile> {
    NamedFile::open("assets/layout.css")
}
