//! Raw visit-log entry model
//!
//! One line of a visit-log file is one JSON object written by the reverse
//! proxy's request logger. Only the fields the dashboard consumes are
//! modeled here; anything else on the line is ignored by serde.

use serde::Deserialize;

/// A single parsed log line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogLine {
    /// Request summary, e.g. `"HTTP GET /"`.
    pub message: Option<String>,

    /// Entry timestamp as written by the logger (RFC 3339).
    pub timestamp: Option<String>,

    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub req: ReqMeta,
}

/// Request metadata captured at log time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReqMeta {
    /// Client IP as reported by the CDN edge.
    pub cf_ip: Option<String>,

    #[serde(default)]
    pub connection: Connection,

    #[serde(default)]
    pub headers: RequestHeaders,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection {
    /// Socket peer address as the app container saw it.
    #[serde(rename = "remoteAddress")]
    pub remote_address: Option<String>,
}

/// The subset of request headers the logger records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestHeaders {
    #[serde(rename = "cf-connecting-ip")]
    pub cf_connecting_ip: Option<String>,

    #[serde(rename = "x-forwarded-for")]
    pub x_forwarded_for: Option<String>,

    #[serde(rename = "cf-ipcountry")]
    pub cf_ipcountry: Option<String>,

    pub host: Option<String>,

    pub accept: Option<String>,

    pub referer: Option<String>,

    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}
