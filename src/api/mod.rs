mod handlers;
mod routes;
mod state;

pub use handlers::VenueResponse;
pub use routes::create_router;
pub use state::AppState;
