//! Google Places provider
//!
//! Uses the Text Search endpoint (`/maps/api/place/textsearch/json`) and
//! reshapes each result into an `external-api` venue record. Converted
//! results are cached per search text; the request's moods are applied after
//! the cache so one cached lookup serves every mood.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{PlacesSearchResponse, VenueRecord},
    services::providers::{PlacesProvider, PlacesSearch},
};
use reqwest::Client as HttpClient;

const PLACES_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct GooglePlacesProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl GooglePlacesProvider {
    /// Creates a provider; without a cache every lookup goes to the API
    pub fn new(cache: Option<Cache>, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    /// Calls Text Search and converts the results
    async fn fetch_places(&self, text: &str) -> AppResult<Vec<VenueRecord>> {
        let url = format!("{}/maps/api/place/textsearch/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("query", text), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Places API returned status {}: {}",
                status, body
            )));
        }

        let body: PlacesSearchResponse = response.json().await?;
        let venues = Self::convert_response(body)?;

        tracing::info!(
            query = %text,
            results = venues.len(),
            provider = "google_places",
            "Places search completed"
        );

        Ok(venues)
    }

    /// `ZERO_RESULTS` is an empty answer, any other non-`OK` status is an error
    fn convert_response(body: PlacesSearchResponse) -> AppResult<Vec<VenueRecord>> {
        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().map(VenueRecord::from).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(AppError::ExternalApi(format!(
                "Places API status {}: {}",
                status,
                body.error_message.unwrap_or_default()
            ))),
        }
    }
}

#[async_trait::async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn search_places(&self, request: &PlacesSearch) -> AppResult<Vec<VenueRecord>> {
        if request.text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Places search text cannot be empty".to_string(),
            ));
        }

        let venues: AppResult<Vec<VenueRecord>> = match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::PlacesSearch(request.text.clone()),
                PLACES_CACHE_TTL,
                self.fetch_places(&request.text)
            ),
            None => self.fetch_places(&request.text).await,
        };

        let mut venues = venues?;
        for venue in &mut venues {
            venue.moods = request.moods.clone();
        }

        Ok(venues)
    }

    fn name(&self) -> &'static str {
        "google_places"
    }
}
