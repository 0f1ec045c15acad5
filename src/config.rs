use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Yelp Fusion API key
    #[serde(default)]
    pub yelp_api_key: Option<String>,

    /// Yelp Fusion API base URL
    #[serde(default = "default_yelp_api_url")]
    pub yelp_api_url: String,

    /// Foursquare client credentials
    #[serde(default)]
    pub foursquare_client_id: Option<String>,
    #[serde(default)]
    pub foursquare_client_secret: Option<String>,

    /// Foursquare API version date (`v` parameter)
    #[serde(default = "default_foursquare_api_version")]
    pub foursquare_api_version: String,

    /// Foursquare API base URL
    #[serde(default = "default_foursquare_api_url")]
    pub foursquare_api_url: String,

    /// Timeout for each provider request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Openness probes allowed per selection
    #[serde(default = "default_attempt_budget")]
    pub attempt_budget: u32,

    /// Category search radius in metres; also the wide hours-lookup radius
    #[serde(default = "default_search_radius")]
    pub search_radius: u32,

    /// First hours-lookup radius in metres
    #[serde(default = "default_tight_search_radius")]
    pub tight_search_radius: u32,

    /// Candidates requested per category
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Category labels the primary provider understands
    #[serde(default = "default_known_categories")]
    pub known_categories: Vec<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_yelp_api_url() -> String {
    "https://api.yelp.com".to_string()
}

fn default_foursquare_api_version() -> String {
    "20151001".to_string()
}

fn default_foursquare_api_url() -> String {
    "https://api.foursquare.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_attempt_budget() -> u32 {
    3
}

fn default_search_radius() -> u32 {
    2000
}

fn default_tight_search_radius() -> u32 {
    100
}

fn default_search_limit() -> u32 {
    20
}

/// Yelp's top-level categories
pub fn default_known_categories() -> Vec<String> {
    [
        "active",
        "arts",
        "beautysvc",
        "coffee",
        "food",
        "hotelstravel",
        "localflavor",
        "nightlife",
        "restaurants",
        "shopping",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
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
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
