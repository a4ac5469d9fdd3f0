use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Page sessions idle this long are dropped (30 minutes).
const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 60;

const DEFAULT_HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the query backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend request timeout in seconds (0 disables it)
    #[arg(long, env = "BACKEND_TIMEOUT_SECS")]
    pub backend_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Idle time after which a page session is dropped.
    pub session_ttl_secs: u64,
    /// Where the page loads HTMX from.
    pub htmx_src: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Unset or 0 means requests never time out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Priority: CLI flag > CLI env var > `NLQ_` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.session_ttl_secs", DEFAULT_SESSION_TTL_SECS)?
            .set_default("server.htmx_src", DEFAULT_HTMX_SRC)?
            .set_default("backend.base_url", "http://127.0.0.1:5000")?;

        // Explicit file must exist; ./config.{yaml,toml,json} is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // E.g. NLQ_SERVER__PORT=8000, NLQ_BACKEND__BASE_URL=http://...
        builder = builder.add_source(
            Environment::with_prefix("NLQ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // clap already folded PORT / BACKEND_URL into these
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(secs) = cli.backend_timeout_secs {
            builder = builder.set_override("backend.timeout_secs", secs.to_string())?;
        }

        builder.build()?.try_deserialize()
    }
}
