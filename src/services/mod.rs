pub mod catalog;
pub mod daily;
pub mod matcher;
pub mod merge;
pub mod providers;
pub mod recommendations;
pub mod scorer;
pub mod search;

pub use catalog::Catalog;
pub use recommendations::{EngineSettings, FallbackTier, Recommendation, RecommendationEngine};
