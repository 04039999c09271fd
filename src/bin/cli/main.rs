use anyhow::{Context, Result, bail};
use blog_image_gateway::{
    adapters::inbound::http::dto::{
        DeleteImageResponseDto, ErrorResponseDto, ListImagesResponseDto, UploadImageResponseDto,
    },
    domain::value_objects::ImageMimeType,
    services::{DEFAULT_TOKEN_TTL_DAYS, JwtAuthenticator, JwtConfig},
};
use clap::{Parser, Subcommand};
use reqwest::{
    Client, RequestBuilder, Response,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "blog-image-cli")]
#[command(about = "CLI for the blog image gateway", long_about = None)]
struct Cli {
    /// Gateway URL
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Bearer token for authentication
    #[arg(long, env = "GATEWAY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List images, newest first
    List {
        #[arg(short, long)]
        page: Option<usize>,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Upload an image file
    Upload {
        /// File path to upload
        file: String,
        /// Content type; inferred from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Delete an image
    Delete {
        /// Object key as returned by list or upload
        key: String,
    },

    /// Mint a bearer token locally
    Token {
        #[arg(long)]
        name: String,
        #[arg(long)]
        id: i64,
        #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_DAYS)]
        ttl_days: i64,
        /// HMAC secret shared with the gateway
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: String,
    },
}

/// Content type for an upload, guessed from the file extension
fn infer_content_type(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let mime_type = match extension.as_deref() {
        Some("jpg" | "jpeg") => Some(ImageMimeType::Jpeg),
        Some("png") => Some(ImageMimeType::Png),
        Some("gif") => Some(ImageMimeType::Gif),
        Some("webp") => Some(ImageMimeType::Webp),
        _ => None,
    };

    mime_type
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

struct GatewayClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GatewayClient {
    fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .context("A bearer token is required (--token or GATEWAY_TOKEN)")?;
        Ok(request.bearer_auth(token))
    }

    async fn list(&self, page: Option<usize>, limit: Option<usize>) -> Result<ListImagesResponseDto> {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let request = self
            .http
            .get(format!("{}/images", self.base_url))
            .query(&query);
        parse_response(self.authorized(request)?.send().await?).await
    }

    async fn upload(&self, file: &Path, content_type: &str) -> Result<UploadImageResponseDto> {
        let data = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(content_type)
            .with_context(|| format!("Invalid content type '{content_type}'"))?;
        let form = Form::new().part("image", part);

        let request = self
            .http
            .post(format!("{}/images", self.base_url))
            .multipart(form);
        parse_response(self.authorized(request)?.send().await?).await
    }

    async fn delete(&self, key: &str) -> Result<DeleteImageResponseDto> {
        let request = self.http.delete(format!(
            "{}/images/{}",
            self.base_url,
            urlencoding::encode(key)
        ));
        parse_response(self.authorized(request)?.send().await?).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.context("Unexpected response body");
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponseDto>(&body) {
        Ok(error) => bail!("{} ({}): {}", status, error.error, error.message),
        Err(_) => bail!("{}: {}", status, body),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url, cli.token.clone());

    match cli.command {
        Commands::List { page, limit } => print_json(&client.list(page, limit).await?),
        Commands::Upload { file, content_type } => {
            let path = Path::new(&file);
            let content_type = content_type.unwrap_or_else(|| infer_content_type(path));
            print_json(&client.upload(path, &content_type).await?)
        }
        Commands::Delete { key } => print_json(&client.delete(&key).await?),
        Commands::Token {
            name,
            id,
            ttl_days,
            secret,
        } => {
            let mut config = JwtConfig::new(secret);
            config.token_ttl = token_ttl(ttl_days)?;
            let token = JwtAuthenticator::new(config).issue_token(&name, id)?;
            println!("{token}");
            Ok(())
        }
    }
}

fn token_ttl(days: i64) -> Result<chrono::Duration> {
    chrono::Duration::try_days(days).with_context(|| format!("--ttl-days {days} is out of range"))
}
