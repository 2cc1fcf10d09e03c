use serde::Deserialize;

/// Root application configuration. Loaded from an optional
/// `segment-studio.toml` and environment variables with the prefix
/// `SEGMENT_STUDIO__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// CSV or JSON file with the initial user collection.
    #[serde(default)]
    pub users_path: Option<String>,
    /// JSON file with an array of segments.
    #[serde(default)]
    pub segments_path: Option<String>,
    #[serde(default)]
    pub seed_demo_segments: bool,
}

/// Import-time type table. Fields not listed stay text.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_number_fields")]
    pub number_fields: Vec<String>,
    #[serde(default = "default_bool_fields")]
    pub bool_fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_analysis_timeout_ms")]
    pub timeout_ms: u64,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_number_fields() -> Vec<String> {
    vec!["id".to_string(), "postCount".to_string()]
}
fn default_bool_fields() -> Vec<String> {
    vec!["isPro".to_string()]
}
fn default_analysis_endpoint() -> String {
    "http://localhost:3400/analyzeSegmentCharacteristics".to_string()
}
fn default_sample_size() -> usize {
    20
}
fn default_analysis_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            number_fields: default_number_fields(),
            bool_fields: default_bool_fields(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_analysis_endpoint(),
            sample_size: default_sample_size(),
            timeout_ms: default_analysis_timeout_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            store: StoreConfig::default(),
            import: ImportConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional config file and environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("segment-studio").required(false))
            .add_source(
                config::Environment::with_prefix("SEGMENT_STUDIO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("import.number_fields")
                    .with_list_parse_key("import.bool_fields"),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
