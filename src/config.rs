use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// The default maximum size of an uploaded file (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The application's configuration.
///
/// Loaded once at startup and shared through `AppState`; nothing else reads
/// the environment.
#[derive(Clone)]
pub struct Config {
    /// The base URL of the backend-as-a-service project.
    pub baas_url: String,
    /// The anonymous (public) API key of the backend.
    pub baas_anon_key: Zeroizing<String>,
    /// The service key used for table calls, if provided.
    pub baas_service_key: Option<Zeroizing<String>>,
    /// The public site URL used to build absolute links.
    pub site_url: Option<String>,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The directory served as static files.
    pub public_dir: PathBuf,
    /// The directory uploads are written to.
    pub upload_dir: PathBuf,
    /// The lifetime of the session cookie in days.
    pub session_max_age_days: i64,
    /// The maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Fails fast when the backend URL or the anonymous key is missing.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let baas_url = env::var("BAAS_URL").context("BAAS_URL must be set")?;
        reqwest::Url::parse(&baas_url).context("BAAS_URL must be a valid URL")?;

        let baas_anon_key = Zeroizing::new(
            env::var("BAAS_ANON_KEY").context("BAAS_ANON_KEY must be set")?,
        );
        if baas_anon_key.trim().is_empty() {
            anyhow::bail!("BAAS_ANON_KEY must not be empty");
        }

        let baas_service_key = env::var("BAAS_SERVICE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Zeroizing::new);

        let site_url = env::var("SITE_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let public_dir = PathBuf::from(
            env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
        );
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| public_dir.join("uploads"));

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                    "http://[::1]:3000".to_string(),
                ]
            });

        Ok(Self {
            baas_url: baas_url.trim_end_matches('/').to_string(),
            baas_anon_key,
            baas_service_key,
            site_url,
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            public_dir,
            upload_dir,
            session_max_age_days: env::var("SESSION_MAX_AGE_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_MAX_AGE_DAYS")?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .map(|v| v.parse())
                .unwrap_or(Ok(DEFAULT_MAX_UPLOAD_BYTES))
                .context("Invalid MAX_UPLOAD_BYTES")?,
            cors_origins,
            secure_cookies: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                == "production",
        })
    }

    /// Builds an absolute URL for a site-relative path, if a site URL is configured.
    pub fn absolute_url(&self, path: &str) -> Option<String> {
        self.site_url.as_ref().map(|base| format!("{}{}", base, path))
    }
}
