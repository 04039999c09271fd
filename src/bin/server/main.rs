use anyhow::{Context, Result};
use blog_image_gateway::{
    app::{
        AppBuilder, AppConfig, ENV_JWT_SECRET, ENV_MAX_UPLOAD_BYTES, ENV_STORAGE_BACKEND,
        ENV_STORE_TIMEOUT_SECS,
    },
    domain::models::store_config::{
        ENV_ACCESS_KEY, ENV_APP_ENV, ENV_BUCKET, ENV_ENDPOINT, ENV_PUBLIC_URL_BASE,
        ENV_SECRET_KEY, ENV_URL_STYLE,
    },
};
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "blog-image-gateway")]
#[command(about = "Image storage gateway for the blog CMS", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend type (s3 or memory)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    storage_backend: String,

    /// Object store endpoint URL
    #[arg(long, env = "MINIO_ENDPOINT", default_value = "")]
    endpoint: String,

    /// Object store access key
    #[arg(long, env = "MINIO_ACCESS_KEY", default_value = "")]
    access_key: String,

    /// Object store secret key
    #[arg(long, env = "MINIO_SECRET_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,

    /// Bucket holding the images
    #[arg(long, env = "MINIO_BUCKET", default_value = "")]
    bucket: String,

    /// Base of public image URLs; defaults to the endpoint
    #[arg(long, env = "MINIO_IMAGE_URL_BASE")]
    image_url_base: Option<String>,

    /// bucket-in-path or bucket-in-base; inferred from APP_ENV when unset
    #[arg(long, env = "IMAGE_URL_STYLE")]
    image_url_style: Option<String>,

    /// Deployment environment name
    #[arg(long, env = "APP_ENV")]
    app_env: Option<String>,

    /// HMAC secret for bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Timeout for a single object store call, in seconds
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value = "30")]
    store_timeout_secs: u64,

    /// Maximum upload request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "5242880")]
    max_upload_bytes: usize,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Value of a configuration variable as given on the command line or
    /// through the environment
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            ENV_STORAGE_BACKEND => Some(self.storage_backend.clone()),
            ENV_ENDPOINT => Some(self.endpoint.clone()),
            ENV_ACCESS_KEY => Some(self.access_key.clone()),
            ENV_SECRET_KEY => Some(self.secret_key.clone()),
            ENV_BUCKET => Some(self.bucket.clone()),
            ENV_PUBLIC_URL_BASE => self.image_url_base.clone(),
            ENV_URL_STYLE => self.image_url_style.clone(),
            ENV_APP_ENV => self.app_env.clone(),
            ENV_JWT_SECRET => Some(self.jwt_secret.clone()),
            ENV_STORE_TIMEOUT_SECS => Some(self.store_timeout_secs.to_string()),
            ENV_MAX_UPLOAD_BYTES => Some(self.max_upload_bytes.to_string()),
            _ => None,
        }
    }

    fn to_app_config(&self) -> Result<AppConfig> {
        Ok(AppConfig::from_lookup(|name| self.lookup(name))?)
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.log_level.to_lowercase()))
            .context("Invalid log level")?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();

        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting blog image gateway");
    info!("Storage backend: {}", cli.storage_backend);

    let config = cli.to_app_config()?;
    let app_services = AppBuilder::new(config)
        .build()
        .context("Failed to build application")?;

    let router = app_services.router();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server")?;

    Ok(())
}
