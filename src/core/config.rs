use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub data: DataConfig,
    pub form_endpoint: FormEndpointConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Where the initial report data comes from
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Filesystem path or http(s) URL of the static JSON array
    pub seed_source: String,
}

/// Remote form-processing endpoint that receives new reports
#[derive(Debug, Clone)]
pub struct FormEndpointConfig {
    pub url: String,
    pub timeout: Duration,
}

/// Initial viewport and tile layer handed to the browser map widget
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            data: DataConfig::from_env()?,
            form_endpoint: FormEndpointConfig::from_env()?,
            map: MapConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DataConfig {
    const DEFAULT_SEED_SOURCE: &'static str = "static/waterlogging_cities.json";

    pub fn from_env() -> Result<Self, String> {
        let seed_source = env::var("SEED_DATA_SOURCE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_SEED_SOURCE.to_string());

        Ok(Self { seed_source })
    }
}

impl FormEndpointConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("FORM_ENDPOINT_URL")
            .map_err(|_| "FORM_ENDPOINT_URL environment variable is required".to_string())?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err("FORM_ENDPOINT_URL must be an http(s) URL".to_string());
        }

        let timeout_secs = env::var("FORM_ENDPOINT_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "FORM_ENDPOINT_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl MapConfig {
    // Centered on India
    const DEFAULT_CENTER_LAT: f64 = 22.5937;
    const DEFAULT_CENTER_LNG: f64 = 78.9629;
    const DEFAULT_ZOOM: u8 = 5;
    const DEFAULT_TILE_URL: &'static str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
    const DEFAULT_ATTRIBUTION: &'static str = "© OpenStreetMap contributors";

    pub fn from_env() -> Result<Self, String> {
        let center_lat = env::var("MAP_CENTER_LAT")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_CENTER_LAT must be a valid number".to_string())?;

        let center_lng = env::var("MAP_CENTER_LNG")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LNG.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_CENTER_LNG must be a valid number".to_string())?;

        let zoom = env::var("MAP_ZOOM")
            .unwrap_or_else(|_| Self::DEFAULT_ZOOM.to_string())
            .parse::<u8>()
            .map_err(|_| "MAP_ZOOM must be a valid number".to_string())?;

        let tile_url =
            env::var("MAP_TILE_URL").unwrap_or_else(|_| Self::DEFAULT_TILE_URL.to_string());

        let attribution = env::var("MAP_ATTRIBUTION")
            .unwrap_or_else(|_| Self::DEFAULT_ATTRIBUTION.to_string());

        Ok(Self {
            center_lat,
            center_lng,
            zoom,
            tile_url,
            attribution,
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: Self::DEFAULT_CENTER_LAT,
            center_lng: Self::DEFAULT_CENTER_LNG,
            zoom: Self::DEFAULT_ZOOM,
            tile_url: Self::DEFAULT_TILE_URL.to_string(),
            attribution: Self::DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}
