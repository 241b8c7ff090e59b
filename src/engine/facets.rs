//! Field extraction — flattens a raw log entry into the facet dimensions
//!
//! Extraction is pure and total: missing fields become `None` and later
//! aggregate under the shared [`MISSING_VALUE`] bucket instead of being
//! dropped.

use chrono::DateTime;

use crate::models::entry::{LogLine, ReqMeta};
use crate::models::query::Dimension;

/// The reverse proxy's internal address as seen from the app container.
/// Entries arriving through it are expected to carry consistent CDN headers.
const PROXY_INTERNAL_ADDR: &str = "::ffff:172.20.0.1";

/// Bucket label shared by all absent facet values.
pub const MISSING_VALUE: &str = "Unknown";

/// One entry flattened into the seven dimensions plus its timestamp.
#[derive(Debug, Clone)]
pub struct FacetView {
    pub ip: String,
    pub country: Option<String>,
    pub host: Option<String>,
    pub accept: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub message: Option<String>,

    /// Entry timestamp in epoch milliseconds, `None` when unparseable.
    /// Entries without a usable timestamp never take part in the bot
    /// suppression window but still aggregate normally.
    pub timestamp_ms: Option<i64>,
}

impl FacetView {
    pub fn from_entry(entry: &LogLine) -> Self {
        let headers = &entry.meta.req.headers;
        Self {
            ip: unify_ip(&entry.meta.req),
            country: headers.cf_ipcountry.clone(),
            host: headers.host.clone(),
            accept: headers.accept.clone(),
            referer: headers.referer.clone(),
            user_agent: headers.user_agent.clone(),
            message: entry.message.clone(),
            timestamp_ms: entry.timestamp.as_deref().and_then(parse_timestamp_ms),
        }
    }

    /// Rendered value for one dimension; absent values share one bucket.
    pub fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Ip => &self.ip,
            Dimension::Country => self.country.as_deref().unwrap_or(MISSING_VALUE),
            Dimension::Host => self.host.as_deref().unwrap_or(MISSING_VALUE),
            Dimension::Accept => self.accept.as_deref().unwrap_or(MISSING_VALUE),
            Dimension::Referer => self.referer.as_deref().unwrap_or(MISSING_VALUE),
            Dimension::UserAgent => self.user_agent.as_deref().unwrap_or(MISSING_VALUE),
            Dimension::Messages => self.message.as_deref().unwrap_or(MISSING_VALUE),
        }
    }
}

/// Derive the single best-effort client IP string.
///
/// When the entry came through the reverse proxy and the CDN-reported IP
/// agrees with both forwarding headers, the result is `"<ip> <country>"`.
/// Any disagreement yields a concatenation of all five sources so proxy
/// inconsistencies stay visible in the dashboard.
fn unify_ip(req: &ReqMeta) -> String {
    let headers = &req.headers;
    if req.connection.remote_address.as_deref() == Some(PROXY_INTERNAL_ADDR) {
        if let Some(cf_ip) = req.cf_ip.as_deref() {
            if headers.cf_connecting_ip.as_deref() == Some(cf_ip)
                && headers.x_forwarded_for.as_deref() == Some(cf_ip)
            {
                let country = headers.cf_ipcountry.as_deref().unwrap_or(MISSING_VALUE);
                return format!("{cf_ip} {country}");
            }
        }
    }

    [
        req.cf_ip.as_deref(),
        headers.cf_connecting_ip.as_deref(),
        headers.x_forwarded_for.as_deref(),
        req.connection.remote_address.as_deref(),
        headers.cf_ipcountry.as_deref(),
    ]
    .map(|part| part.unwrap_or(MISSING_VALUE))
    .join(" ")
}

fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp_millis())
}
