//! Catalogue client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::UnresolvedReferencePolicy;
use crate::outbound::http::{CatalogueEndpoints, CatalogueHttpSource};

const DEFAULT_MANUFACTURERS_URL: &str = "https://static.my.ge/myauto/js/mans.json";
const DEFAULT_MODELS_URL: &str = "https://api2.myauto.ge/en/getManModels";
const DEFAULT_CATEGORIES_URL: &str = "https://api2.myauto.ge/en/cats/get";
const DEFAULT_PRODUCTS_URL: &str = "https://api2.myauto.ge/en/products";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Invalid catalogue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// An endpoint setting is not an absolute URL.
    #[error("{field} is not a valid URL ({value:?}): {message}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Parser detail.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build catalogue HTTP client: {message}")]
    HttpClient {
        /// Client builder detail.
        message: String,
    },
}

/// Configuration values for the marketplace catalogue client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOGUE")]
pub struct CatalogueSettings {
    /// Manufacturer list endpoint override.
    pub manufacturers_url: Option<String>,
    /// Model list endpoint override.
    pub models_url: Option<String>,
    /// Category list endpoint override.
    pub categories_url: Option<String>,
    /// Product listing endpoint override.
    pub products_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
    /// Fail searches whose filters name unknown manufacturers or models.
    #[ortho_config(default = false)]
    pub reject_unresolved: bool,
}

impl CatalogueSettings {
    /// Return the request timeout, falling back to 30 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Return the configured user agent, falling back to the crate default.
    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(crate::outbound::http::DEFAULT_USER_AGENT)
    }

    /// Return how search filters treat ids missing from the cache.
    pub const fn policy(&self) -> UnresolvedReferencePolicy {
        if self.reject_unresolved {
            UnresolvedReferencePolicy::Reject
        } else {
            UnresolvedReferencePolicy::Drop
        }
    }

    /// Resolve every endpoint, applying the marketplace defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] naming the first setting that
    /// does not parse.
    pub fn endpoints(&self) -> Result<CatalogueEndpoints, SettingsError> {
        Ok(CatalogueEndpoints {
            manufacturers: parse_endpoint(
                "manufacturers_url",
                self.manufacturers_url.as_deref(),
                DEFAULT_MANUFACTURERS_URL,
            )?,
            models: parse_endpoint(
                "models_url",
                self.models_url.as_deref(),
                DEFAULT_MODELS_URL,
            )?,
            categories: parse_endpoint(
                "categories_url",
                self.categories_url.as_deref(),
                DEFAULT_CATEGORIES_URL,
            )?,
            products: parse_endpoint(
                "products_url",
                self.products_url.as_deref(),
                DEFAULT_PRODUCTS_URL,
            )?,
        })
    }

    /// Build the HTTP catalogue source described by these settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when an endpoint is invalid or the client
    /// cannot be built.
    pub fn http_source(&self) -> Result<CatalogueHttpSource, SettingsError> {
        CatalogueHttpSource::with_user_agent(self.endpoints()?, self.timeout(), self.user_agent())
            .map_err(|error| SettingsError::HttpClient {
                message: error.to_string(),
            })
    }
}

fn parse_endpoint(
    field: &'static str,
    configured: Option<&str>,
    default: &str,
) -> Result<Url, SettingsError> {
    let value = configured.unwrap_or(default);
    Url::parse(value).map_err(|error| SettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for catalogue configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "CATALOGUE_MANUFACTURERS_URL",
        "CATALOGUE_MODELS_URL",
        "CATALOGUE_CATEGORIES_URL",
        "CATALOGUE_PRODUCTS_URL",
        "CATALOGUE_REQUEST_TIMEOUT_SECS",
        "CATALOGUE_USER_AGENT",
        "CATALOGUE_REJECT_UNRESOLVED",
    ];

    fn load_from_empty_args() -> CatalogueSettings {
        CatalogueSettings::load_from_iter([OsString::from("catalogue")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        let endpoints = settings.endpoints().expect("defaults parse");

        assert_eq!(endpoints.manufacturers.as_str(), DEFAULT_MANUFACTURERS_URL);
        assert_eq!(endpoints.models.as_str(), DEFAULT_MODELS_URL);
        assert_eq!(endpoints.categories.as_str(), DEFAULT_CATEGORIES_URL);
        assert_eq!(endpoints.products.as_str(), DEFAULT_PRODUCTS_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.user_agent(), crate::outbound::http::DEFAULT_USER_AGENT);
        assert_eq!(settings.policy(), UnresolvedReferencePolicy::Drop);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CATALOGUE_MANUFACTURERS_URL", None::<String>),
            ("CATALOGUE_MODELS_URL", None::<String>),
            ("CATALOGUE_CATEGORIES_URL", None::<String>),
            (
                "CATALOGUE_PRODUCTS_URL",
                Some("http://localhost:8080/products".to_owned()),
            ),
            ("CATALOGUE_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("CATALOGUE_USER_AGENT", Some("catalogue-tests".to_owned())),
            ("CATALOGUE_REJECT_UNRESOLVED", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let endpoints = settings.endpoints().expect("overrides parse");

        assert_eq!(endpoints.products.as_str(), "http://localhost:8080/products");
        assert_eq!(endpoints.models.as_str(), DEFAULT_MODELS_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.user_agent(), "catalogue-tests");
        assert_eq!(settings.policy(), UnresolvedReferencePolicy::Reject);
    }

    #[rstest]
    fn invalid_endpoints_name_the_offending_setting() {
        let _guard = lock_env([
            ("CATALOGUE_MANUFACTURERS_URL", None::<String>),
            ("CATALOGUE_MODELS_URL", Some("not a url".to_owned())),
            ("CATALOGUE_CATEGORIES_URL", None::<String>),
            ("CATALOGUE_PRODUCTS_URL", None::<String>),
        ]);

        let error = load_from_empty_args()
            .endpoints()
            .expect_err("relative URL should be rejected");

        match error {
            SettingsError::InvalidUrl { field, value, .. } => {
                assert_eq!(field, "models_url");
                assert_eq!(value, "not a url");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn http_source_uses_the_resolved_endpoints() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let source = load_from_empty_args()
            .http_source()
            .expect("client should build");

        assert_eq!(source.endpoints().categories.as_str(), DEFAULT_CATEGORIES_URL);
    }
}
