//! Visitor location label.
//!
//! Resolution order:
//!
//! 1. `ipapi.co`
//! 2. `ip-api.com`
//! 3. a country guessed from the browser language, marked "(estimated)"
//! 4. "🌍 Global visitor"
//!
//! Provider failures only move resolution down the list; they never surface
//! to the visitor.

use std::fmt;

use serde::Deserialize;

use crate::error::GeoError;

pub const PRIMARY_URL: &str = "https://ipapi.co/json/";
pub const SECONDARY_URL: &str = "http://ip-api.com/json/";

const GLOBAL_VISITOR: &str = "🌍 Global visitor";

/// Countries the language-based estimate can name.
const COUNTRY_NAMES: [(&str, &str); 11] = [
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("BD", "Bangladesh"),
    ("IN", "India"),
    ("PK", "Pakistan"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("FR", "France"),
];

/// `ipapi.co` response body.
#[derive(Debug, Default, Deserialize)]
struct IpapiResponse {
    #[serde(default)]
    error: bool,
    city: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
}

/// `ip-api.com` response body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: Option<String>,
    city: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

/// A provider-reported location. `country` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: Option<String>,
    pub country: String,
    pub country_code: Option<String>,
}

impl Location {
    fn new(city: Option<String>, country: Option<String>, code: Option<String>) -> Option<Self> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        Some(Self {
            city: non_empty(city),
            country: non_empty(country)?,
            country_code: non_empty(code),
        })
    }

    /// `"🇫🇷 Paris, France"`, or without the city/flag when unknown.
    pub fn label(&self) -> String {
        let place = match &self.city {
            Some(city) => format!("{city}, {}", self.country),
            None => self.country.clone(),
        };
        match self.country_code.as_deref().and_then(flag_emoji) {
            Some(flag) => format!("{flag} {place}"),
            None => place,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ipapi,
    IpApi,
}

impl Provider {
    pub const CHAIN: [Provider; 2] = [Provider::Ipapi, Provider::IpApi];

    pub fn url(self) -> &'static str {
        match self {
            Provider::Ipapi => PRIMARY_URL,
            Provider::IpApi => SECONDARY_URL,
        }
    }

    /// Interpret a response body. Rate-limit and failure bodies are errors.
    pub fn parse(self, body: &str) -> Result<Location, GeoError> {
        match self {
            Provider::Ipapi => {
                let response: IpapiResponse = serde_json::from_str(body)?;
                if response.error {
                    return Err(GeoError::NoLocation);
                }
                Location::new(response.city, response.country_name, response.country_code)
                    .ok_or(GeoError::NoLocation)
            }
            Provider::IpApi => {
                let response: IpApiResponse = serde_json::from_str(body)?;
                if response.status.as_deref() != Some("success") {
                    return Err(GeoError::NoLocation);
                }
                Location::new(response.city, response.country, response.country_code)
                    .ok_or(GeoError::NoLocation)
            }
        }
    }
}

/// The text shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationLabel {
    Detected(String),
    Estimated(String),
    Global,
}

impl LocationLabel {
    pub fn text(&self) -> &str {
        match self {
            LocationLabel::Detected(text) | LocationLabel::Estimated(text) => text,
            LocationLabel::Global => GLOBAL_VISITOR,
        }
    }
}

impl fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Regional-indicator flag for a two-letter country code.
pub fn flag_emoji(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Guess a country from a language tag such as `en-US`.
pub fn estimate_from_language(language: &str) -> LocationLabel {
    let Some(region) = language.split('-').nth(1) else {
        return LocationLabel::Global;
    };
    match flag_emoji(region) {
        Some(flag) => {
            let name = country_name(region).unwrap_or("Unknown");
            LocationLabel::Estimated(format!("{flag} {name} (estimated)"))
        }
        None => LocationLabel::Global,
    }
}

/// Final label from whatever the providers produced.
pub fn finish_label(location: Option<Location>, language: Option<&str>) -> LocationLabel {
    match location {
        Some(location) => LocationLabel::Detected(location.label()),
        None => language
            .map(estimate_from_language)
            .unwrap_or(LocationLabel::Global),
    }
}

/// Fetches a provider URL and returns the response body.
pub trait LocationLookup {
    fn fetch(&self, url: &str) -> Result<String, GeoError>;
}

/// Walk the provider chain with `lookup`, then fall back to `language`.
pub fn resolve_location(lookup: &dyn LocationLookup, language: Option<&str>) -> LocationLabel {
    let location = Provider::CHAIN.into_iter().find_map(|provider| {
        match lookup.fetch(provider.url()).and_then(|body| provider.parse(&body)) {
            Ok(location) => {
                tracing::info!(?provider, "location provider succeeded");
                Some(location)
            }
            Err(e) => {
                tracing::warn!(?provider, error = %e, "location provider failed");
                None
            }
        }
    });
    let label = finish_label(location, language);
    tracing::info!(label = %label, "visitor location");
    label
}

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpLookup;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use std::time::Duration;

    use super::LocationLookup;
    use crate::error::GeoError;

    /// Blocking HTTP lookup; call it off the render thread.
    pub struct HttpLookup {
        client: reqwest::blocking::Client,
    }

    impl HttpLookup {
        pub fn new() -> Result<Self, GeoError> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(5))
                .build()
                .map_err(|e| GeoError::Request(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl LocationLookup for HttpLookup {
        fn fetch(&self, url: &str) -> Result<String, GeoError> {
            self.client
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(|e| GeoError::Request(e.to_string()))
        }
    }
}
