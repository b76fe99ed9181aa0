use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::errors::ApiError;
use super::models::{
    Candidate, ItemRef, RecommendQuery, RecommendResponse, RecommendedItem, SearchQuery,
    SearchResponse, SearchStatus, StatsResponse,
};
use super::{AppState, ServiceIndex};
use crate::engine::Recommender;
use crate::engine::scorer::process;

#[get("/")]
pub async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Movie Recommender API")
}

/// Scoring runs on the blocking pool.
#[post("/search")]
pub async fn search(
    query: web::Json<SearchQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let index = data.current();
    let text = query.into_inner().query;

    let response = web::block(move || search_response(&index.recommender, &text))
        .await
        .map_err(|e| ApiError::Internal(format!("search task failed: {e}")))?;

    Ok(HttpResponse::Ok().json(response))
}

fn search_response(recommender: &Recommender, text: &str) -> SearchResponse {
    let candidates: Vec<Candidate> = recommender
        .search_candidates(text)
        .into_iter()
        .filter_map(|m| {
            recommender.item(m.index).map(|item| Candidate {
                id: item.id,
                title: m.title,
                score: m.score,
            })
        })
        .collect();

    let status = if process(text).is_empty() {
        SearchStatus::EmptyQuery
    } else if candidates.is_empty() {
        SearchStatus::NoMatch
    } else {
        SearchStatus::Ok
    };

    SearchResponse { status, candidates }
}

#[post("/recommend")]
pub async fn recommend(
    request: web::Json<RecommendQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let index = data.current();
    let recommender = &index.recommender;

    let (position, recommendations) = match (request.id, request.title.as_deref()) {
        (Some(id), _) => {
            let recs = recommender.recommend_by_id(id)?;
            (recommender.position_of_id(id), recs)
        }
        (None, Some(title)) => {
            let recs = recommender.get_recommendations(title)?;
            (recommender.position_of_title(title), recs)
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either 'title' or 'id' is required".to_string(),
            ));
        }
    };

    let query_item = position
        .and_then(|p| recommender.item(p))
        .ok_or_else(|| ApiError::Internal("lookup tables out of sync".to_string()))?;
    debug!(
        "recommend '{}' -> {} items",
        query_item.title,
        recommendations.len()
    );

    let response = RecommendResponse {
        query: ItemRef {
            id: query_item.id,
            title: query_item.title.clone(),
        },
        recommendations: recommendations
            .into_iter()
            .map(|r| RecommendedItem {
                id: r.item.id,
                title: r.item.title.clone(),
                tags: r.item.tags.clone(),
                score: r.score,
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[get("/stats")]
pub async fn stats(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(stats_for(&data.current()))
}

/// Rebuilds the index from the configured files off the request path. The
/// current index keeps serving until the new one is complete, and stays in
/// place if the rebuild fails.
#[post("/reload")]
pub async fn reload(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let source = data
        .source()
        .cloned()
        .ok_or_else(|| ApiError::BadRequest("no catalog source configured".to_string()))?;

    let loaded = tokio::task::spawn_blocking(move || source.load())
        .await
        .map_err(|e| ApiError::Internal(format!("reload task failed: {e}")))?;

    match loaded {
        Ok(index) => {
            let new_stats = stats_for(&index);
            data.replace(index);
            Ok(HttpResponse::Ok().json(new_stats))
        }
        Err(e) => {
            warn!("Reload failed, keeping current index: {e}");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

fn stats_for(index: &ServiceIndex) -> StatsResponse {
    StatsResponse {
        item_count: index.recommender.len(),
        vocabulary_size: index.recommender.vocabulary().len(),
        rating_count: index.rating_count,
    }
}
