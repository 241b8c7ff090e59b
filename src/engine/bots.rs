//! Bot classification with a process-wide IP registry
//!
//! Each IP starts unknown and transitions to confirmed-bot the first time
//! one of its requests carries a known signature. The transition is sticky
//! for the process lifetime, and traffic from a flagged IP close in time to
//! a recorded hit is pulled in with it: one caught probe marks the whole
//! burst, even when the neighbouring requests look benign on their own.
//!
//! The registry is shared across all requests and services, so a scanner
//! caught in one scan stays flagged in every later one. Results are
//! therefore not purely a function of the queried window; that is the
//! intended trade for a cumulative blocklist that costs nothing to keep.

use dashmap::DashMap;
use tracing::debug;

use super::facets::FacetView;

/// Burst window in milliseconds: traffic from a flagged IP within this span
/// of a recorded hit belongs to the same probe session.
const SUPPRESSION_WINDOW_MS: i64 = 60_000;

/// User agents that only ever accompany automated clients. Matched exactly
/// against the logged header.
const BOT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 zgrab/0.x",
    "masscan/1.3 (https://github.com/robertdavidgraham/masscan)",
    "python-requests/2.28.1",
    "python-requests/2.31.0",
    "Go-http-client/1.1",
    "curl/7.88.1",
    "libwww-perl/6.67",
    "Mozilla/5.0 (compatible; CensysInspect/1.1; +https://about.censys.io/)",
    "Mozilla/5.0 (compatible; InternetMeasurement/1.0; +https://internet-measurement.com/)",
    "Mozilla/5.0 (compatible; Odin; https://docs.getodin.com/)",
    "NetSystemsResearch studies the availability of various services across the internet. Our website is netsystemsresearch.com",
    "Expanse, a Palo Alto Networks company, searches across the global IPv4 space multiple times per day to identify customers' presences on the Internet. If you would like to be excluded from our scans, please send IP addresses/domains to: scaninfo@paloaltonetworks.com",
    "Hello World/1.0",
];

/// Full request messages fired by widespread exploit scanners, matched
/// exactly.
const PROBE_MESSAGES: &[&str] = &[
    "HTTP GET /.env",
    "HTTP GET /.git/config",
    "HTTP GET /.aws/credentials",
    "HTTP GET /.DS_Store",
    "HTTP GET /config.json",
    "HTTP GET /login.action",
    "HTTP GET /owa/auth/logon.aspx",
    "HTTP GET /actuator/gateway/routes",
    "HTTP GET /telescope/requests",
    "HTTP GET /server-status",
    "HTTP GET /HNAP1",
    "HTTP GET /cgi-bin/luci/;stok=/locale",
    "HTTP GET /solr/admin/info/system?wt=json",
    "HTTP POST /boaform/admin/formLogin",
    "HTTP POST /GponForm/diag_Form?images/",
    "HTTP POST /api/jsonws/invoke",
];

/// WordPress paths no service on this host serves. Case-sensitive contains.
const WORDPRESS_FRAGMENTS: &[&str] = &["/wp-admin/", "/wp-content/", "/wp-includes/", "/wp-json/"];

/// PHP entry points, matched case-insensitively anywhere in the message.
const PHP_FRAGMENTS: &[&str] = &["/index.php", "/home.php", "/xmlrpc.php", ".php?"];

/// PHP file extensions, matched case-insensitively at the end of the message.
const PHP_SUFFIXES: &[&str] = &[".php", ".php7", ".php8"];

/// Process-wide registry of IPs caught committing bot-signature requests.
///
/// Keys are unified IP strings; a key's presence means the IP is
/// permanently flagged. The value holds the append-only timestamps of its
/// confirmed hits, which anchor the suppression window. Concurrent requests
/// race on insertion, which is tolerated: inserts are idempotent and the
/// vectors are append-only, so the set only ever grows.
#[derive(Debug, Default)]
pub struct BotRegistry {
    hits: DashMap<String, Vec<i64>>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one entry, recording the hit when it carries a primary
    /// signature. Returns `true` when the entry is automated traffic.
    pub fn classify(&self, facets: &FacetView) -> bool {
        if has_bot_signature(facets) {
            let mut hits = self.hits.entry(facets.ip.clone()).or_default();
            if let Some(ts) = facets.timestamp_ms {
                hits.push(ts);
            }
            debug!(ip = %facets.ip, "bot signature hit");
            return true;
        }

        // Secondary rule: a flagged IP drags its nearby-in-time traffic
        // along, without extending the window.
        if let Some(ts) = facets.timestamp_ms {
            if let Some(hits) = self.hits.get(&facets.ip) {
                return hits
                    .iter()
                    .any(|&hit| (hit - ts).abs() <= SUPPRESSION_WINDOW_MS);
            }
        }

        false
    }

    /// Number of IPs flagged so far in this process.
    pub fn flagged_ips(&self) -> usize {
        self.hits.len()
    }
}

fn has_bot_signature(facets: &FacetView) -> bool {
    if let Some(ua) = facets.user_agent.as_deref() {
        if BOT_USER_AGENTS.contains(&ua) {
            return true;
        }
    }
    facets.message.as_deref().is_some_and(message_is_probe)
}

fn message_is_probe(message: &str) -> bool {
    if PROBE_MESSAGES.contains(&message) {
        return true;
    }
    if WORDPRESS_FRAGMENTS.iter().any(|f| message.contains(f)) {
        return true;
    }
    let lower = message.to_ascii_lowercase();
    PHP_FRAGMENTS.iter().any(|f| lower.contains(f)) || PHP_SUFFIXES.iter().any(|s| lower.ends_with(s))
}
