use std::{sync::Mutex, io};
use actix_web::{web::{self, Data}, App, HttpServer, Responder, Result, middleware::Logger, http::{Method, StatusCode}, HttpResponse, Either};
use log::info;

use config::Config;
use db::DB;
use editor::Editors;

use render::{render_page_with_status, render_not_found};

mod avatar;
mod config;
mod data;
mod db;
mod editor;
mod error;
mod identity;
mod ports;
mod rating;
mod render;
mod routes;

async fn default_handler(req: Method) -> Result<impl Responder> {
    match req {
        Method::GET => Ok(Either::Left(render_page_with_status(StatusCode::NOT_FOUND, None, render_not_found))),
        _ => Ok(Either::Right(HttpResponse::MethodNotAllowed().finish())),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    info!("serving employer profiles from {} on {}:{}", config.store_dir.display(), config.bind_addr, config.port);

    let db = Data::new(Mutex::new(DB::load(config.store_dir.clone())));
    let editors = Data::new(Mutex::new(Editors::init()));
    let bind = (config.bind_addr.clone(), config.port);
    let config = Data::new(config);
    HttpServer::new(move || {
        App::new()
            .configure(routes::configure)
            .app_data(db.clone())
            .app_data(editors.clone())
            .app_data(config.clone())
            .wrap(Logger::default())
            .default_service(web::to(default_handler))
    })
    .bind(bind)?
    .run()
    .await
}
