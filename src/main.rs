use std::io;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use movie_recommender::api::{self, AppState, CatalogSource};
use movie_recommender::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    info!("Loading catalog from {}", config.movies.display());

    let source = CatalogSource::from_config(&config);
    let index = source.load().map_err(|e| {
        error!("Failed to build index: {e}");
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;

    info!(
        "Index ready: {} items, {} terms, {} ratings",
        index.recommender.len(),
        index.recommender.vocabulary().len(),
        index.rating_count
    );

    let app_state = web::Data::new(AppState::new(index, Some(source)));

    info!("Starting HTTP server at http://{}", config.bind);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(api::configure)
    })
    .bind(&config.bind)?
    .run()
    .await
}
