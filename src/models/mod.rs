use serde::Deserialize;

mod query;
mod venue;

pub use query::{normalize_tokens, Channel, VenueQuery};
pub use venue::{Category, ScoredVenueRecord, Source, TokenSet, VenueId, VenueRecord};

// ============================================================================
// Google Places API Types
// ============================================================================

/// Raw response from the Places Text Search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlacesApiPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A single place in a Text Search response
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesApiPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<PlacesGeometry>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesGeometry {
    pub location: PlacesLocation,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlacesLocation {
    pub lat: f64,
    pub lng: f64,
}

impl PlacesApiPlace {
    /// Infers a catalog category from the place's type tags; the first recognised tag wins
    pub fn infer_category(&self) -> Category {
        self.types
            .iter()
            .find_map(|t| match t.as_str() {
                "cafe" | "bakery" => Some(Category::Cafe),
                "restaurant" | "meal_takeaway" | "meal_delivery" | "food" => Some(Category::Food),
                "bar" | "night_club" | "movie_theater" | "casino" => Some(Category::Entertainment),
                "amusement_park" | "bowling_alley" | "gym" | "spa" | "aquarium" | "zoo"
                | "stadium" => Some(Category::Activity),
                "park" | "museum" | "art_gallery" | "tourist_attraction" | "library" => {
                    Some(Category::Place)
                }
                _ => None,
            })
            .unwrap_or(Category::Place)
    }
}

impl From<PlacesApiPlace> for VenueRecord {
    fn from(place: PlacesApiPlace) -> Self {
        let category = place.infer_category();

        let mut details = Vec::new();
        if let Some(address) = &place.formatted_address {
            details.push(address.clone());
        }
        if let Some(rating) = place.rating {
            match place.user_ratings_total {
                Some(total) => details.push(format!("★ {:.1} ({})", rating, total)),
                None => details.push(format!("★ {:.1}", rating)),
            }
        }
        if let Some(level) = place.price_level.filter(|l| *l > 0) {
            details.push("$".repeat(level as usize));
        }

        let description = match place.geometry {
            Some(geometry) => format!(
                "{} near {:.5}, {:.5}",
                category.label(),
                geometry.location.lat,
                geometry.location.lng
            ),
            None => category.label().to_string(),
        };

        VenueRecord {
            link: Some(format!(
                "https://www.google.com/maps/place/?q=place_id:{}",
                place.place_id
            )),
            id: VenueId::Text(place.place_id),
            title: place.name,
            description,
            category,
            icon: category.default_icon().to_string(),
            moods: TokenSet::new(),
            companions: TokenSet::new(),
            needs: normalize_tokens(category.default_needs().iter()).collect(),
            details,
            source: Source::ExternalApi,
            rating: place.rating,
        }
    }
}
