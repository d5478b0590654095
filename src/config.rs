use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL (external place lookups are cached here)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Places API key. The external provider is disabled when unset.
    #[serde(default)]
    pub places_api_key: Option<String>,

    /// Places API base URL
    #[serde(default = "default_places_api_url")]
    pub places_api_url: String,

    /// Optional JSON catalog file overriding the bundled catalog
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Number of venues returned by the random-sample fallback tier
    #[serde(default = "default_random_sample_size")]
    pub random_sample_size: usize,

    /// Limit used when a recommendation request omits one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest limit a caller may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_places_api_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_random_sample_size() -> usize {
    30
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    100
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.random_sample_size == 0 {
            anyhow::bail!("RANDOM_SAMPLE_SIZE must be greater than zero");
        }
        if self.default_limit > self.max_limit {
            anyhow::bail!(
                "DEFAULT_LIMIT ({}) must not exceed MAX_LIMIT ({})",
                self.default_limit,
                self.max_limit
            );
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults_apply_when_env_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.random_sample_size, 30);
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.places_api_key, None);
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_are_read() {
        let config = config_from(&[
            ("PLACES_API_KEY", "secret"),
            ("RANDOM_SAMPLE_SIZE", "45"),
            ("PORT", "8080"),
        ]);
        assert_eq!(config.places_api_key.as_deref(), Some("secret"));
        assert_eq!(config.random_sample_size, 45);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_zero_sample_size_is_rejected() {
        let config = config_from(&[("RANDOM_SAMPLE_SIZE", "0")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_limit_above_max_is_rejected() {
        let config = config_from(&[("DEFAULT_LIMIT", "50"), ("MAX_LIMIT", "10")]);
        assert!(config.validate().is_err());
    }
}
