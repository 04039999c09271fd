use std::str::FromStr;

use bon::Builder;

use crate::domain::errors::GatewayError;

pub const ENV_ENDPOINT: &str = "MINIO_ENDPOINT";
pub const ENV_ACCESS_KEY: &str = "MINIO_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "MINIO_SECRET_KEY";
pub const ENV_BUCKET: &str = "MINIO_BUCKET";
pub const ENV_PUBLIC_URL_BASE: &str = "MINIO_IMAGE_URL_BASE";
pub const ENV_URL_STYLE: &str = "IMAGE_URL_STYLE";
pub const ENV_APP_ENV: &str = "APP_ENV";

/// How public image URLs relate to the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlStyle {
    /// The base is the raw store endpoint; the bucket must be added to the path
    #[default]
    BucketInPath,
    /// The base already routes to the bucket (e.g. a reverse proxy)
    BucketInBase,
}

impl UrlStyle {
    /// Style implied by a deployment environment name when none is configured
    pub fn for_environment(app_env: Option<&str>) -> Self {
        match app_env {
            Some(env) if env.trim().eq_ignore_ascii_case("production") => UrlStyle::BucketInBase,
            _ => UrlStyle::BucketInPath,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlStyle::BucketInPath => "bucket-in-path",
            UrlStyle::BucketInBase => "bucket-in-base",
        }
    }
}

impl FromStr for UrlStyle {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bucket-in-path" | "bucket_in_path" => Ok(UrlStyle::BucketInPath),
            "bucket-in-base" | "bucket_in_base" => Ok(UrlStyle::BucketInBase),
            other => Err(GatewayError::configuration(format!(
                "unknown {ENV_URL_STYLE} '{other}' (expected bucket-in-path or bucket-in-base)"
            ))),
        }
    }
}

/// Connection and URL parameters for the image bucket
#[derive(Clone, PartialEq, Eq, Builder)]
pub struct StoreConfig {
    #[builder(into)]
    pub endpoint: String,
    #[builder(into)]
    pub access_key: String,
    #[builder(into)]
    pub secret_key: String,
    #[builder(into)]
    pub bucket: String,
    #[builder(into)]
    pub public_url_base: String,
    #[builder(default)]
    pub url_style: UrlStyle,
}

impl StoreConfig {
    /// Resolve the configuration from a variable lookup, usually the
    /// process environment. Nothing is cached.
    ///
    /// `public_url_base` falls back to `endpoint` when unset or blank. The URL
    /// style comes from `IMAGE_URL_STYLE` when set, otherwise from `APP_ENV`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint = non_blank(ENV_ENDPOINT).unwrap_or_default();
        let public_url_base = non_blank(ENV_PUBLIC_URL_BASE).unwrap_or_else(|| endpoint.clone());
        let url_style = match non_blank(ENV_URL_STYLE) {
            Some(style) => style.parse()?,
            None => UrlStyle::for_environment(non_blank(ENV_APP_ENV).as_deref()),
        };

        Ok(Self {
            endpoint,
            access_key: non_blank(ENV_ACCESS_KEY).unwrap_or_default(),
            secret_key: non_blank(ENV_SECRET_KEY).unwrap_or_default(),
            bucket: non_blank(ENV_BUCKET).unwrap_or_default(),
            public_url_base,
            url_style,
        })
    }

    /// Check the settings every store call depends on
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.endpoint.trim().is_empty() {
            return Err(GatewayError::configuration(format!(
                "object store endpoint is not set ({ENV_ENDPOINT})"
            )));
        }

        if self.access_key.trim().is_empty() || self.secret_key.trim().is_empty() {
            return Err(GatewayError::configuration(format!(
                "object store access key or secret key is not set ({ENV_ACCESS_KEY}, {ENV_SECRET_KEY})"
            )));
        }

        if self.bucket.trim().is_empty() {
            return Err(GatewayError::configuration(format!(
                "object store bucket is not set ({ENV_BUCKET})"
            )));
        }

        Ok(())
    }

    /// Public URL for a stored key.
    ///
    /// The base gets exactly one trailing slash and a single leading slash is
    /// stripped from the key. The key is inserted as is, without
    /// percent-encoding, so reserved characters reach the URL unescaped.
    pub fn public_url(&self, key: &str) -> String {
        let base = self.public_url_base.trim_end_matches('/');
        let key = key.strip_prefix('/').unwrap_or(key);

        match self.url_style {
            UrlStyle::BucketInPath => format!("{base}/{}/{key}", self.bucket),
            UrlStyle::BucketInBase => format!("{base}/{key}"),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[hidden]")
            .field("bucket", &self.bucket)
            .field("public_url_base", &self.public_url_base)
            .field("url_style", &self.url_style)
            .finish()
    }
}
