use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        Category, ScoredVenueRecord, Source, TokenSet, VenueId, VenueQuery, VenueRecord,
    },
    services::{daily, recommendations, FallbackTier},
};

use super::AppState;

// Request/Response types

/// Venue as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    pub id: VenueId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub category_label: &'static str,
    pub icon: String,
    pub moods: TokenSet,
    pub companions: TokenSet,
    pub needs: TokenSet,
    pub details: Vec<String>,
    pub link: Option<String>,
    pub source: Source,
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl From<&VenueRecord> for VenueResponse {
    fn from(venue: &VenueRecord) -> Self {
        Self {
            id: venue.id.clone(),
            title: venue.title.clone(),
            description: venue.description.clone(),
            category: venue.category,
            category_label: venue.category_label(),
            icon: venue.icon.clone(),
            moods: venue.moods.clone(),
            companions: venue.companions.clone(),
            needs: venue.needs.clone(),
            details: venue.details.clone(),
            link: venue.link.clone(),
            source: venue.source,
            rating: venue.rating,
            score: None,
        }
    }
}

impl From<&ScoredVenueRecord> for VenueResponse {
    fn from(scored: &ScoredVenueRecord) -> Self {
        Self {
            score: Some(scored.score),
            ..Self::from(&scored.venue)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VenueFilterParams {
    pub category: Option<String>,
    pub mood: Option<String>,
    pub companion: Option<String>,
    pub need: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    pub query: VenueQuery,
    pub limit: Option<usize>,
    #[serde(default)]
    pub include_external: bool,
    pub near: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub tier: FallbackTier,
    pub venues: Vec<VenueResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct TodaysPickParams {
    pub date: Option<NaiveDate>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List catalog venues, optionally filtered by category and single attribute tokens
pub async fn list_venues(
    State(state): State<AppState>,
    Query(params): Query<VenueFilterParams>,
) -> AppResult<Json<Vec<VenueResponse>>> {
    let category = params
        .category
        .as_deref()
        .map(|c| {
            Category::parse(c)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown category: {}", c)))
        })
        .transpose()?;

    let filter = VenueQuery::new()
        .with_moods(params.mood.as_deref())
        .with_companions(params.companion.as_deref())
        .with_needs(params.need.as_deref());

    let venues = state
        .engine
        .catalog()
        .lookup(category, &filter)
        .into_iter()
        .map(VenueResponse::from)
        .collect();

    Ok(Json(venues))
}

/// Get a single catalog venue
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VenueResponse>> {
    let venue_id = VenueId::from(id.as_str());
    state
        .engine
        .catalog()
        .get(&venue_id)
        .map(|venue| Json(VenueResponse::from(venue)))
        .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))
}

/// Recommend venues for a mood / companion / need query
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let limit = request.limit.unwrap_or(state.default_limit);
    if limit > state.max_limit {
        return Err(AppError::InvalidInput(format!(
            "limit must be at most {}",
            state.max_limit
        )));
    }

    let query = request.query.normalized();

    tracing::info!(
        request_id = %request_id,
        moods = query.moods.len(),
        companions = query.companions.len(),
        needs = query.needs.len(),
        limit,
        include_external = request.include_external,
        "Processing recommendation request"
    );

    let recommendation = match (&state.places, request.include_external) {
        (Some(provider), true) => {
            recommendations::recommend_with_places(
                &state.engine,
                provider.as_ref(),
                &query,
                request.near.as_deref(),
                limit,
            )
            .await
        }
        (None, true) => {
            tracing::debug!(
                request_id = %request_id,
                "External places requested but no provider is configured"
            );
            state.engine.recommend(&query, limit)
        }
        (_, false) => state.engine.recommend(&query, limit),
    };

    tracing::info!(
        request_id = %request_id,
        tier = ?recommendation.tier,
        results = recommendation.venues.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse {
        tier: recommendation.tier,
        venues: recommendation.venues.iter().map(VenueResponse::from).collect(),
    }))
}

/// Substring search over the catalog
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<VenueResponse>> {
    let venues = state
        .engine
        .search(&params.q)
        .into_iter()
        .map(VenueResponse::from)
        .collect();
    Json(venues)
}

/// Venue of the day for `date` (defaults to today on the local calendar)
pub async fn todays_pick(
    State(state): State<AppState>,
    Query(params): Query<TodaysPickParams>,
) -> AppResult<Json<VenueResponse>> {
    let date = params.date.unwrap_or_else(daily::local_today);
    state
        .engine
        .todays_pick(date)
        .map(|venue| Json(VenueResponse::from(venue)))
        .ok_or_else(|| AppError::NotFound("No pick available: the catalog is empty".to_string()))
}
