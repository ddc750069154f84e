use actix_web::{App, HttpResponse, HttpServer, get, middleware::Logger, web};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use crate::listing::{DirectoryLister, ListingResponse};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
    /// Path of the listing endpoint, starting with '/'.
    pub route: String,
    pub log_dir: Option<PathBuf>,
}

pub struct ServerState {
    pub lister: DirectoryLister,
}

/// Parameters the widget sends with every listing request, either as a
/// query string or as a urlencoded form.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub dir: String,
    #[serde(default, rename = "baseDirectory")]
    pub base_directory: String,
}

pub fn register(cfg: &mut web::ServiceConfig, route: &str) {
    cfg.service(health).service(
        web::resource(route)
            .route(web::get().to(list_query))
            .route(web::post().to(list_form))
            .route(web::put().to(list_form))
            .route(web::delete().to(list_form)),
    );
}

#[get("/healthz")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "filepicker",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn list_query(
    params: web::Query<ListingParams>,
    state: web::Data<ServerState>,
) -> HttpResponse {
    respond(params.into_inner(), state).await
}

async fn list_form(
    params: web::Form<ListingParams>,
    state: web::Data<ServerState>,
) -> HttpResponse {
    respond(params.into_inner(), state).await
}

/// Listing outcomes, failures included, always travel as a 200 with the
/// `success` flag set accordingly.
async fn respond(params: ListingParams, state: web::Data<ServerState>) -> HttpResponse {
    if !params.base_directory.is_empty() {
        tracing::debug!(base_directory = %params.base_directory, "ignoring client base directory");
    }
    let lister = state.lister.clone();
    let dir = params.dir;
    let body = match web::block(move || lister.respond(&dir)).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "listing task failed");
            ListingResponse::failure("The directory could not be listed")
        }
    };
    HttpResponse::Ok().json(body)
}

pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    info!(
        host = %config.host,
        port = config.port,
        root = %config.root.display(),
        route = %config.route,
        "starting listing server"
    );

    let state = web::Data::new(ServerState {
        lister: DirectoryLister::new(config.root.clone()),
    });
    let route = config.route.clone();

    HttpServer::new(move || {
        let route = route.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(move |cfg| register(cfg, &route))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
