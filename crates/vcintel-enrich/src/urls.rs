//! Website normalization and homepage candidate URLs.

use std::collections::HashSet;
use std::net::IpAddr;

use reqwest::Url;

const ABOUT_PATH: &str = "/about";

/// Prefix `https://` unless the trimmed input already carries an
/// `http://` or `https://` scheme.
#[must_use]
pub fn normalize_website(input: &str) -> String {
    let trimmed = input.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn has_http_scheme(value: &str) -> bool {
    let starts_with = |prefix: &str| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Parse a user-supplied website into an absolute `http`/`https` URL with a host.
#[must_use]
pub fn parse_website(input: &str) -> Option<Url> {
    if input.trim().is_empty() {
        return None;
    }

    let url = Url::parse(&normalize_website(input)).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().filter(|host| !host.is_empty())?;
    Some(url)
}

#[must_use]
pub fn is_valid_website(input: &str) -> bool {
    parse_website(input).is_some()
}

/// Ordered, de-duplicated homepage guesses for a website.
///
/// Root variants come first (`https` bare host, `https` with `www.`, then the
/// same two over `http`), followed by the `/about` page of each. The input
/// path is kept on the root variants; query strings are dropped everywhere.
/// Hosts that are IP literals get no `www.` variants. Returns an empty list
/// when the input is not a valid website.
#[must_use]
pub fn candidate_urls(website: &str) -> Vec<String> {
    let Some(url) = parse_website(website) else {
        return Vec::new();
    };
    let Some(host) = url.host_str() else {
        return Vec::new();
    };

    let bare_host = host.strip_prefix("www.").unwrap_or(host);
    let hosts = if is_ip_literal(bare_host) {
        vec![bare_host.to_string()]
    } else {
        vec![bare_host.to_string(), format!("www.{bare_host}")]
    };

    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = match url.path() {
        "/" => "",
        other => other,
    };

    let mut origins = Vec::with_capacity(hosts.len() * 2);
    for scheme in ["https", "http"] {
        for host in &hosts {
            origins.push(format!("{scheme}://{host}{port}"));
        }
    }

    let roots = origins.iter().map(|origin| format!("{origin}{path}"));
    let abouts = origins.iter().map(|origin| format!("{origin}{ABOUT_PATH}"));

    let mut seen = HashSet::new();
    roots
        .chain(abouts)
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}

fn is_ip_literal(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}
