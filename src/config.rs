use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Settings for the generative model used for recognition, search and advice.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrisnap".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutrisnap-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "food-photos".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            gemini,
        })
    }
}
