/// Yelp Fusion API provider
///
/// Primary listings source. Category searches return distance, rating and
/// review counts for scoring; the business detail endpoint supplies the
/// coordinates, address and contact fields used in the final summary.
///
/// API Flow:
/// 1. Category search: /v3/businesses/search → candidates sorted by distance
/// 2. Detail: /v3/businesses/{id} → full business record
use std::time::Duration;

use reqwest::{Client as HttpClient, Url};

use crate::{
    config::Config,
    error::{AppError, AppResult, ProviderUnavailable},
    models::{Candidate, VenueDetail, YelpBusiness, YelpSearchResponse},
    services::providers::{required_credential, PrimarySearchClient, SearchParams},
};

const PROVIDER_NAME: &str = "yelp";

#[derive(Clone)]
pub struct YelpProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl YelpProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        timeout_secs: u64,
    ) -> Result<Self, ProviderUnavailable> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderUnavailable::new(PROVIDER_NAME, e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderUnavailable> {
        let api_key =
            required_credential(PROVIDER_NAME, "YELP_API_KEY", config.yelp_api_key.as_ref())?;
        Self::new(api_key, config.yelp_api_url.clone(), config.request_timeout_secs)
    }

    /// Convert a Yelp business detail into our venue record
    fn convert_business(&self, business: YelpBusiness) -> AppResult<VenueDetail> {
        let (latitude, longitude) = business
            .coordinates
            .as_ref()
            .and_then(|c| Some((c.latitude?, c.longitude?)))
            .ok_or_else(|| {
                AppError::ExternalApi(format!("Yelp business {} has no coordinates", business.id))
            })?;

        let address = business
            .location
            .map(|l| l.display_address.join(" "))
            .filter(|a| !a.is_empty());

        Ok(VenueDetail {
            id: business.id,
            name: business.name,
            image_url: business.image_url.filter(|u| !u.is_empty()),
            distance: business.distance,
            latitude,
            longitude,
            address,
            categories: business.categories.into_iter().map(|c| c.title).collect(),
            rating: business.rating,
            review_count: business.review_count,
            phone_number: business.display_phone.filter(|p| !p.is_empty()),
            url: business.url,
        })
    }

    /// `/v3/businesses/{id}` with the id percent-encoded as one path segment
    fn business_url(&self, id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid Yelp API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Yelp API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v3", "businesses", id]);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Yelp API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Yelp API response");

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize Yelp response");
            AppError::ExternalApi(format!("Failed to parse Yelp response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl PrimarySearchClient for YelpProvider {
    async fn search_by_category(&self, params: &SearchParams) -> AppResult<Vec<Candidate>> {
        if params.category.trim().is_empty() {
            return Err(AppError::InvalidInput("Category cannot be empty".to_string()));
        }

        let url = format!("{}/v3/businesses/search", self.api_url);
        let query = [
            ("latitude", params.latitude.to_string()),
            ("longitude", params.longitude.to_string()),
            ("categories", params.category.clone()),
            ("radius", params.radius.to_string()),
            ("sort_by", params.sort.as_str().to_string()),
            ("limit", params.limit.to_string()),
        ];

        let results: YelpSearchResponse = self.get_json(&url, &query).await?;
        let candidates: Vec<Candidate> = results
            .businesses
            .into_iter()
            .filter_map(|business| match Candidate::try_from(business) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::warn!(error = %e, provider = PROVIDER_NAME, "Dropping listing");
                    None
                }
            })
            .collect();

        tracing::info!(
            category = %params.category,
            results = candidates.len(),
            provider = PROVIDER_NAME,
            "Category search completed"
        );

        Ok(candidates)
    }

    async fn get_detail(&self, id: &str) -> AppResult<VenueDetail> {
        let url = self.business_url(id)?;
        let business: YelpBusiness = self.get_json(url.as_str(), &[]).await?;
        let detail = self.convert_business(business)?;

        tracing::info!(
            business_id = %id,
            provider = PROVIDER_NAME,
            "Business detail fetched"
        );

        Ok(detail)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{YelpCategory, YelpCoordinates, YelpLocation};
    use crate::services::providers::SortMode;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(api_url: &str) -> YelpProvider {
        YelpProvider::new("test_key".to_string(), api_url.to_string(), 5).unwrap()
    }

    fn business() -> YelpBusiness {
        YelpBusiness {
            id: "medina-cafe-vancouver".to_string(),
            name: "Medina Cafe".to_string(),
            image_url: Some("https://s3-media.yelpcdn.com/medina.jpg".to_string()),
            is_closed: false,
            url: Some("https://www.yelp.com/biz/medina-cafe-vancouver".to_string()),
            review_count: Some(3012),
            categories: vec![
                YelpCategory {
                    alias: "breakfast_brunch".to_string(),
                    title: "Breakfast & Brunch".to_string(),
                },
                YelpCategory {
                    alias: "mediterranean".to_string(),
                    title: "Mediterranean".to_string(),
                },
            ],
            rating: Some(4.0),
            coordinates: Some(YelpCoordinates {
                latitude: Some(49.2803),
                longitude: Some(-123.1163),
            }),
            location: Some(YelpLocation {
                display_address: vec![
                    "780 Richards St".to_string(),
                    "Vancouver, BC V6B 3A4".to_string(),
                ],
            }),
            display_phone: Some("+1 604-879-3114".to_string()),
            distance: None,
        }
    }

    #[test]
    fn test_convert_business_success() {
        let provider = create_test_provider("http://test.local");
        let detail = provider.convert_business(business()).unwrap();

        assert_eq!(detail.id, "medina-cafe-vancouver");
        assert_eq!(detail.latitude, 49.2803);
        assert_eq!(detail.address.as_deref(), Some("780 Richards St Vancouver, BC V6B 3A4"));
        assert_eq!(detail.categories, vec!["Breakfast & Brunch", "Mediterranean"]);
        assert_eq!(detail.review_count, Some(3012));
        assert_eq!(detail.phone_number.as_deref(), Some("+1 604-879-3114"));
        assert!(detail.distance.is_none());
    }

    #[test]
    fn test_convert_business_missing_coordinates() {
        let provider = create_test_provider("http://test.local");
        let mut b = business();
        b.coordinates = Some(YelpCoordinates {
            latitude: Some(49.0),
            longitude: None,
        });

        let result = provider.convert_business(b);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no coordinates"));
    }

    #[test]
    fn test_convert_business_blank_fields_dropped() {
        let provider = create_test_provider("http://test.local");
        let mut b = business();
        b.image_url = Some(String::new());
        b.display_phone = Some(String::new());
        b.location = Some(YelpLocation {
            display_address: vec![],
        });

        let detail = provider.convert_business(b).unwrap();
        assert!(detail.image_url.is_none());
        assert!(detail.phone_number.is_none());
        assert!(detail.address.is_none());
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config::from_vars(vec![]).unwrap();
        assert!(YelpProvider::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_search_by_category_sends_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/businesses/search"))
            .and(header("authorization", "Bearer test_key"))
            .and(query_param("categories", "food"))
            .and(query_param("radius", "2000"))
            .and(query_param("sort_by", "distance"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "businesses": [
                    {"id": "a", "name": "A", "distance": 120.0, "rating": 4.5,
                     "review_count": 80, "is_closed": false},
                    {"id": "b", "name": "B", "distance": 340.0, "rating": 3.5,
                     "review_count": 12, "is_closed": true},
                    {"id": "c", "name": "C", "rating": 5.0, "review_count": 900}
                ],
                "total": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server.uri());
        let params = SearchParams {
            latitude: 49.283552,
            longitude: -123.119506,
            category: "food".to_string(),
            radius: 2000,
            sort: SortMode::Distance,
            limit: 20,
        };

        let candidates = provider.search_by_category(&params).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "a");
        assert!(candidates[1].is_closed);
    }

    #[tokio::test]
    async fn test_search_by_category_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/businesses/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let provider = create_test_provider(&server.uri());
        let params = SearchParams {
            latitude: 0.0,
            longitude: 0.0,
            category: "food".to_string(),
            radius: 2000,
            sort: SortMode::Distance,
            limit: 20,
        };

        let err = provider.search_by_category(&params).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_get_detail() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/businesses/medina-cafe-vancouver"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "medina-cafe-vancouver",
                "name": "Medina Cafe",
                "rating": 4.0,
                "review_count": 3012,
                "coordinates": {"latitude": 49.2803, "longitude": -123.1163},
                "location": {"display_address": ["780 Richards St"]},
                "categories": [{"alias": "cafes", "title": "Cafes"}]
            })))
            .mount(&server)
            .await;

        let provider = create_test_provider(&server.uri());
        let detail = provider.get_detail("medina-cafe-vancouver").await.unwrap();

        assert_eq!(detail.name, "Medina Cafe");
        assert_eq!(detail.longitude, -123.1163);
        assert_eq!(detail.categories, vec!["Cafes"]);
    }

    #[test]
    fn test_business_url_escapes_id() {
        let provider = create_test_provider("https://api.yelp.com");

        let url = provider.business_url("cafe deux/soleil?x=1").unwrap();
        assert_eq!(url.path(), "/v3/businesses/cafe%20deux%2Fsoleil%3Fx=1");
        assert!(url.query().is_none());

        let url = provider.business_url("medina-cafe-vancouver").unwrap();
        assert_eq!(url.as_str(), "https://api.yelp.com/v3/businesses/medina-cafe-vancouver");
    }

    #[tokio::test]
    async fn test_get_detail_escapes_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/businesses/a%20b%2Fc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "a b/c",
                "name": "AB",
                "coordinates": {"latitude": 49.0, "longitude": -123.0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(&server.uri());
        let detail = provider.get_detail("a b/c").await.unwrap();

        assert_eq!(detail.id, "a b/c");
    }
}
