use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logs: LogsConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    /// Directory holding one subdirectory per service, each with its own
    /// `log/visit/` tree. Defaults to the parent directory, where the
    /// dashboard historically ran alongside the services it watches.
    pub services_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Path to a directory containing the frontend files.
    /// If None, the embedded frontend is served.
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let services_root =
            std::env::var("SERVICES_ROOT").unwrap_or_else(|_| "..".to_string());

        let static_dir = std::env::var("FRONTEND_STATIC_DIR").ok();

        Ok(Config {
            server: ServerConfig { host, port },
            logs: LogsConfig { services_root },
            frontend: FrontendConfig { static_dir },
        })
    }
}
