//! Reqwest-backed catalogue source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    CategoryDto, DataEnvelopeDto, ManufacturerDto, ModelDto, ProductsResponseDto,
};
use crate::domain::ports::{CatalogueSource, CatalogueSourceError};
use crate::domain::query::ProductQuery;
use crate::domain::records::{Category, Manufacturer, ManufacturerId, Model, ProductPage};

/// User agent sent when none is configured.
pub(crate) const DEFAULT_USER_AGENT: &str = "catalogue-client/0.1";

/// Resolved endpoint URLs of the marketplace API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEndpoints {
    /// Manufacturer list; answers with a bare JSON array.
    pub manufacturers: Url,
    /// Model list; receives the manufacturer as `man_id`.
    pub models: Url,
    /// Category list.
    pub categories: Url,
    /// Product listing; receives the encoded filter as its query string.
    pub products: Url,
}

/// Catalogue source adapter that performs HTTP GET requests.
pub struct CatalogueHttpSource {
    client: Client,
    endpoints: CatalogueEndpoints,
    user_agent: String,
}

impl CatalogueHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let source = CatalogueHttpSource::new(endpoints, Duration::from_secs(30))?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoints: CatalogueEndpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(endpoints, timeout, DEFAULT_USER_AGENT)
    }

    /// Build an adapter that identifies itself with `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        endpoints: CatalogueEndpoints,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoints,
            user_agent: user_agent.into(),
        })
    }

    /// Endpoints this adapter talks to.
    #[must_use]
    pub const fn endpoints(&self) -> &CatalogueEndpoints {
        &self.endpoints
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, CatalogueSourceError> {
        debug!(%url, "issuing catalogue request");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "catalogue response received");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CatalogueSource for CatalogueHttpSource {
    async fn fetch_manufacturers(&self) -> Result<Vec<Manufacturer>, CatalogueSourceError> {
        let body = self.get(self.endpoints.manufacturers.clone()).await?;
        parse_manufacturers(&body)
    }

    async fn fetch_models(
        &self,
        manufacturer_id: ManufacturerId,
    ) -> Result<Vec<Model>, CatalogueSourceError> {
        let body = self
            .get(models_url(&self.endpoints.models, manufacturer_id))
            .await?;
        parse_models(&body, manufacturer_id)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogueSourceError> {
        let body = self.get(self.endpoints.categories.clone()).await?;
        parse_categories(&body)
    }

    async fn fetch_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ProductPage, CatalogueSourceError> {
        let body = self
            .get(products_url(&self.endpoints.products, query))
            .await?;
        parse_products(&body)
    }
}

fn models_url(base: &Url, manufacturer_id: ManufacturerId) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("man_id", &manufacturer_id.to_string());
    url
}

fn products_url(base: &Url, query: &ProductQuery) -> Url {
    let mut url = base.clone();
    url.set_query(Some(query.encoded()));
    url
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, CatalogueSourceError> {
    serde_json::from_slice(body).map_err(|error| {
        CatalogueSourceError::decode(format!("invalid {what} JSON payload: {error}"))
    })
}

fn parse_manufacturers(body: &[u8]) -> Result<Vec<Manufacturer>, CatalogueSourceError> {
    let decoded: Vec<ManufacturerDto> = decode(body, "manufacturer")?;
    decoded
        .into_iter()
        .map(ManufacturerDto::into_domain)
        .collect::<Result<_, _>>()
        .map_err(CatalogueSourceError::decode)
}

fn parse_models(
    body: &[u8],
    requested: ManufacturerId,
) -> Result<Vec<Model>, CatalogueSourceError> {
    let decoded: DataEnvelopeDto<ModelDto> = decode(body, "model")?;
    decoded
        .data
        .into_iter()
        .map(|model| model.into_domain(requested))
        .collect::<Result<_, _>>()
        .map_err(CatalogueSourceError::decode)
}

fn parse_categories(body: &[u8]) -> Result<Vec<Category>, CatalogueSourceError> {
    let decoded: DataEnvelopeDto<CategoryDto> = decode(body, "category")?;
    decoded
        .data
        .into_iter()
        .map(CategoryDto::into_domain)
        .collect::<Result<_, _>>()
        .map_err(CatalogueSourceError::decode)
}

fn parse_products(body: &[u8]) -> Result<ProductPage, CatalogueSourceError> {
    let decoded: ProductsResponseDto = decode(body, "product")?;
    Ok(decoded.into_domain_page())
}

fn map_transport_error(error: reqwest::Error) -> CatalogueSourceError {
    if error.is_timeout() {
        CatalogueSourceError::timeout(error.to_string())
    } else if error.is_builder() {
        CatalogueSourceError::invalid_request(error.to_string())
    } else {
        CatalogueSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CatalogueSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CatalogueSourceError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => CatalogueSourceError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut chars = compact.chars();
    let preview = chars.by_ref().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network catalogue mapping helpers.

    use super::*;
    use crate::domain::{
        CatalogueCache, CategoryId, CategoryType, ModelId, ProductFilter,
        UnresolvedReferencePolicy,
    };
    use rstest::rstest;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid test URL")
    }

    #[test]
    fn models_url_appends_the_manufacturer_parameter() {
        let built = models_url(
            &url("https://api2.myauto.ge/en/getManModels"),
            ManufacturerId::new(41),
        );
        assert_eq!(
            built.as_str(),
            "https://api2.myauto.ge/en/getManModels?man_id=41"
        );
    }

    #[test]
    fn products_url_carries_the_encoded_filter_verbatim() {
        let filter = ProductFilter {
            categories: vec![CategoryId::new(1), CategoryId::new(2)],
            page: Some(2),
            ..ProductFilter::default()
        };
        let query = filter
            .build_query(&CatalogueCache::new(), UnresolvedReferencePolicy::Drop)
            .expect("nothing to resolve");

        let built = products_url(&url("https://api2.myauto.ge/en/products"), &query);

        assert_eq!(
            built.as_str(),
            "https://api2.myauto.ge/en/products?Cats=1.2&Page=2"
        );
    }

    #[test]
    fn parses_manufacturers_with_string_ids_and_flags() {
        let body = r#"[
            { "man_id": "3", "man_name": "BMW", "is_car": "1", "is_spec": "0", "is_moto": "0" },
            { "man_id": 9, "man_name": "JCB", "is_car": false, "is_spec": true },
            { "man_id": "75", "man_name": "DUCATI", "is_car": "0", "is_spec": "0", "is_moto": 1 }
        ]"#;

        let manufacturers = parse_manufacturers(body.as_bytes()).expect("JSON should decode");

        assert_eq!(manufacturers.len(), 3);
        assert_eq!(manufacturers[0].id, ManufacturerId::new(3));
        assert!(manufacturers[0].is_car && !manufacturers[0].is_spec);
        assert!(manufacturers[1].is_spec && !manufacturers[1].is_moto);
        assert!(manufacturers[2].is_moto);
        assert_eq!(manufacturers[2].name, "DUCATI");
    }

    #[test]
    fn parses_models_and_fills_in_missing_owners() {
        let body = r#"{ "data": [
            { "model_id": 101, "man_id": 3, "model_name": "X5" },
            { "model_id": "102", "model_name": "X6" }
        ] }"#;

        let models = parse_models(body.as_bytes(), ManufacturerId::new(3)).expect("decode");

        assert_eq!(models.len(), 2);
        assert_eq!(models[1].id, ModelId::new(102));
        assert_eq!(models[1].manufacturer_id, ManufacturerId::new(3));
    }

    #[test]
    fn parses_categories_with_their_type_codes() {
        let body = r#"{ "data": [
            { "category_id": 1, "category_type": 0, "title": "Sedan" },
            { "category_id": "12", "category_type": "1", "title": "Crane" }
        ] }"#;

        let categories = parse_categories(body.as_bytes()).expect("decode");

        assert_eq!(categories[1].id, CategoryId::new(12));
        assert_eq!(categories[1].category_type, CategoryType(1));
    }

    #[test]
    fn parses_product_pages_with_paging_metadata() {
        let body = r#"{ "data": {
            "items": [
                { "car_id": 900, "man_id": 3, "model_id": 101, "price": 12500, "car_model": "X5" },
                { "car_id": 901 }
            ],
            "meta": { "total": 2741, "per_page": 15, "current_page": 1, "last_page": 183 }
        } }"#;

        let page = parse_products(body.as_bytes()).expect("decode");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].car_model, "X5");
        assert_eq!(page.items[1].car_id, 901);
        assert_eq!(page.total, 2741);
        assert_eq!(page.last_page, 183);
    }

    #[test]
    fn odd_fields_in_one_listing_do_not_fail_the_page() {
        let body = r#"{ "data": {
            "items": [
                { "car_id": 1, "car_desc": "ok", "photo": "a1" },
                { "car_id": 2, "car_desc": null, "photo": null, "prod_year": "unknown" }
            ],
            "meta": { "total": 2, "last_page": 1 }
        } }"#;

        let page = parse_products(body.as_bytes()).expect("page should decode");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].car_desc, "ok");
        assert_eq!(page.items[1].car_id, 2);
        assert!(page.items[1].car_desc.is_empty());
        assert_eq!(page.items[1].prod_year, 0);
    }

    #[rstest]
    #[case::not_json(b"<html>maintenance</html>".as_slice())]
    #[case::missing_envelope(br#"[{ "model_id": 1 }]"#.as_slice())]
    #[case::bad_id(br#"{ "data": [{ "model_id": "abc" }] }"#.as_slice())]
    fn malformed_model_payloads_map_to_decode_errors(#[case] body: &[u8]) {
        let error = parse_models(body, ManufacturerId::new(1)).expect_err("decode should fail");
        assert!(
            matches!(error, CatalogueSourceError::Decode { .. }),
            "malformed payloads should map to Decode errors",
        );
    }

    #[test]
    fn products_without_meta_fail_to_decode() {
        let error = parse_products(br#"{ "data": { "items": [] } }"#).expect_err("missing meta");
        assert!(error.is_decode());
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::not_found(StatusCode::NOT_FOUND, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] is_timeout: bool,
    ) {
        let error = map_status_error(status, b"{\"message\": \"backend  unavailable\"}");
        if is_timeout {
            assert!(
                matches!(error, CatalogueSourceError::Timeout { .. }),
                "timeout statuses should map to Timeout",
            );
        } else {
            assert_eq!(
                error,
                CatalogueSourceError::status(
                    status.as_u16(),
                    "{\"message\": \"backend unavailable\"}"
                ),
            );
        }
    }

    #[test]
    fn empty_error_bodies_fall_back_to_the_reason_phrase() {
        let error = map_status_error(StatusCode::SERVICE_UNAVAILABLE, b"  ");
        assert_eq!(
            error,
            CatalogueSourceError::status(503_u16, "Service Unavailable")
        );
    }

    #[test]
    fn body_preview_truncates_long_bodies() {
        let body = "x".repeat(200);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.len(), 163);
        assert!(preview.ends_with("..."));
    }
}
