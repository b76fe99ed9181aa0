//! HTTP shell around the recommender: search, then recommend.
//!
//! The index is held as `RwLock<Arc<ServiceIndex>>`. Handlers clone the `Arc`
//! and release the lock immediately; a reload builds a complete new index
//! before swapping it in, so readers never see a partial build.

pub mod errors;
pub mod handlers;
pub mod models;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use actix_web::web;
use log::info;

use crate::config::Config;
use crate::document::Catalog;
use crate::engine::{Recommender, RecommenderOptions};
use crate::error::Result;

pub struct ServiceIndex {
    pub recommender: Recommender,
    pub rating_count: usize,
}

impl ServiceIndex {
    pub fn from_catalog(catalog: Catalog, options: RecommenderOptions) -> Self {
        let rating_count = catalog.ratings.len();
        Self {
            recommender: Recommender::build(catalog.items, options),
            rating_count,
        }
    }
}

/// Where the catalog comes from, kept so the index can be rebuilt.
#[derive(Clone)]
pub struct CatalogSource {
    pub movies: PathBuf,
    pub ratings: Option<PathBuf>,
    pub options: RecommenderOptions,
}

impl CatalogSource {
    pub fn from_config(config: &Config) -> Self {
        Self {
            movies: config.movies.clone(),
            ratings: config.ratings.clone(),
            options: config.recommender_options(),
        }
    }

    pub fn load(&self) -> Result<ServiceIndex> {
        let catalog = Catalog::load(&self.movies, self.ratings.as_deref())?;
        Ok(ServiceIndex::from_catalog(catalog, self.options.clone()))
    }
}

pub struct AppState {
    current: RwLock<Arc<ServiceIndex>>,
    source: Option<CatalogSource>,
}

impl AppState {
    pub fn new(index: ServiceIndex, source: Option<CatalogSource>) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            source,
        }
    }

    pub fn current(&self) -> Arc<ServiceIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn source(&self) -> Option<&CatalogSource> {
        self.source.as_ref()
    }

    pub fn replace(&self, index: ServiceIndex) {
        let index = Arc::new(index);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = index;
        info!("Index swapped");
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::hello)
        .service(handlers::search)
        .service(handlers::recommend)
        .service(handlers::stats)
        .service(handlers::reload);
}
