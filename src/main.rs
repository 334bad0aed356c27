use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use marsa_ims_server::{routes, state::AppState, storage::FileBackend};

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bind: String =
        std::env::var("MARSA_BIND").unwrap_or_else(|_| String::from("127.0.0.1:8000"));
    let data_dir: String = std::env::var("MARSA_DATA_DIR").unwrap_or_else(|_| String::from("./data"));

    let backend = FileBackend::new(&data_dir).expect("DATA_DIR_UNAVAILABLE");
    let state = web::Data::new(AppState::open(Arc::new(backend)).expect("STORE_LOAD_FAILED"));

    info!(%bind, %data_dir, "starting marsa-ims-server");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
