use actix_web::web::ServiceConfig;

mod interact;
mod page;
mod resources;

pub use interact::*;
pub use page::*;
pub use resources::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg
        .service(page_profile)

        .service(enter_edit)
        .service(save_profile)
        .service(cancel_edit)
        .service(upload_avatar)

        .service(css_layout);
}
