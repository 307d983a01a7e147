//! HTTP client for the tour booking REST API.

use std::time::Duration;

use reqwest::{multipart, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    query::{BlogQuery, Query, TourQuery},
    types::{
        Blog, BlogID, BlogPayload, ExtractedTour, InstagramPost, ListPage, Locale,
        MessageResponse, Response, Tour, TourID, TourPayload, UploadResponse,
    },
    Error,
};

const DEFAULT_BASE_URL: &str = "https://api.tourbook.uz/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("tourbook/", env!("CARGO_PKG_VERSION"));

/// Whether an endpoint needs the bearer token.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Auth {
    Public,
    Bearer,
}

/// HTTP client for the tour booking API.
///
/// Every endpoint is a `POST` with a JSON body. The locale is mirrored into
/// the `x-lang` header and, for authenticated endpoints, the session token is
/// sent as `Authorization: Bearer <token>`.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API, without a trailing slash.
    base_api_url: String,
    /// Locale used for requests that do not carry their own.
    locale: Locale,
    token: Option<String>,
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            locale: Locale::default(),
            token: None,
        })
    }

    /// Sets the default request locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets the bearer token used by vendor endpoints.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    fn request(&self, path: &str, locale: Locale, auth: Auth) -> Result<RequestBuilder, Error> {
        let url = self.get_url(path)?;
        let mut req = self
            .http
            .post(url)
            .header("accept", "application/json")
            .header("x-lang", locale.code());
        if auth == Auth::Bearer {
            let token = self.token.as_deref().ok_or(Error::MissingToken)?;
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn post<T, B>(&self, path: &str, body: &B, locale: Locale, auth: Auth) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(path, locale, auth)?.json(body);
        self.send(path, req).await
    }

    async fn send<T>(&self, path: &str, req: RequestBuilder) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", path);
        let resp = req.send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", path, e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::error!("{} rejected the session token", path);
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let message = error_message(&body);
            tracing::error!("Request to {} failed with status {}: {}", path, status, message);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    /// Fetches a page of public tours/activities.
    pub async fn list_tours(&self, query: &TourQuery) -> Result<ListPage<Tour>, Error> {
        self.post("/tours/list", query, query.common().language, Auth::Public)
            .await
    }

    /// Fetches a page of the signed-in vendor's own tours.
    pub async fn list_my_tours(&self, query: &TourQuery) -> Result<ListPage<Tour>, Error> {
        self.post("/tours/my", query, query.common().language, Auth::Bearer)
            .await
    }

    /// Fetches a single tour by its ID.
    pub async fn get_tour(&self, id: TourID) -> Result<Response<Tour>, Error> {
        self.post("/tours/get", &ById { id }, self.locale, Auth::Public)
            .await
    }

    pub async fn create_tour(&self, payload: &TourPayload) -> Result<Response<Tour>, Error> {
        self.post("/tours/create", payload, self.locale, Auth::Bearer)
            .await
    }

    pub async fn update_tour(
        &self,
        id: TourID,
        payload: &TourPayload,
    ) -> Result<Response<Tour>, Error> {
        self.post(
            "/tours/update",
            &WithId { id, payload },
            self.locale,
            Auth::Bearer,
        )
        .await
    }

    pub async fn delete_tour(&self, id: TourID) -> Result<MessageResponse, Error> {
        self.post("/tours/delete", &ById { id }, self.locale, Auth::Bearer)
            .await
    }

    /// Fetches a page of blog posts.
    pub async fn list_blogs(&self, query: &BlogQuery) -> Result<ListPage<Blog>, Error> {
        self.post("/blogs/list", query, query.common().language, Auth::Public)
            .await
    }

    pub async fn get_blog(&self, id: BlogID) -> Result<Response<Blog>, Error> {
        self.post("/blogs/get", &ById { id }, self.locale, Auth::Public)
            .await
    }

    pub async fn create_blog(&self, payload: &BlogPayload) -> Result<Response<Blog>, Error> {
        self.post("/blogs/create", payload, self.locale, Auth::Bearer)
            .await
    }

    pub async fn update_blog(
        &self,
        id: BlogID,
        payload: &BlogPayload,
    ) -> Result<Response<Blog>, Error> {
        self.post(
            "/blogs/update",
            &WithId { id, payload },
            self.locale,
            Auth::Bearer,
        )
        .await
    }

    pub async fn delete_blog(&self, id: BlogID) -> Result<MessageResponse, Error> {
        self.post("/blogs/delete", &ById { id }, self.locale, Auth::Bearer)
            .await
    }

    /// Uploads one image as multipart form data (field `file`) and returns its remote URL.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, Error> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let req = self
            .request("/upload", self.locale, Auth::Bearer)?
            .multipart(form);
        self.send("/upload", req).await
    }

    /// Fetches an Instagram post (caption and images) through the scraping service.
    pub async fn instagram_post(&self, post_url: &str) -> Result<Response<InstagramPost>, Error> {
        self.post(
            "/instagram/post",
            &InstagramRequest {
                url: post_url,
                caption: None,
            },
            self.locale,
            Auth::Bearer,
        )
        .await
    }

    /// Asks the extraction service to turn an Instagram post into tour fields.
    pub async fn instagram_to_tour(
        &self,
        post_url: &str,
        caption: Option<&str>,
    ) -> Result<Response<ExtractedTour>, Error> {
        self.post(
            "/instagram/to-tour",
            &InstagramRequest {
                url: post_url,
                caption,
            },
            self.locale,
            Auth::Bearer,
        )
        .await
    }
}

#[derive(Serialize)]
struct ById {
    id: i64,
}

#[derive(Serialize)]
struct WithId<'a, P: Serialize> {
    id: i64,
    #[serde(flatten)]
    payload: &'a P,
}

#[derive(Serialize)]
struct InstagramRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
}

/// Prefers the API's `message` field; falls back to a truncated raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<MessageResponse>(body)
        .ok()
        .and_then(|m| m.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(error_message(r#"{"message": "Tour not found"}"#), "Tour not found");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"message": ""}"#), r#"{"message": ""}"#);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "ж".repeat(1500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }

    #[test]
    fn update_body_flattens_payload_after_id() {
        let payload = TourPayload {
            currency: "UZS".to_string(),
            ..TourPayload::default()
        };
        let body = serde_json::to_value(WithId { id: 9, payload: &payload }).unwrap();
        assert_eq!(body["id"], 9);
        assert_eq!(body["currency"], "UZS");
    }

    #[test]
    fn token_is_required_for_vendor_requests() {
        let client = Client::with_base_url("http://example.test").unwrap();
        assert!(matches!(
            client.request("/tours/my", Locale::En, Auth::Bearer),
            Err(Error::MissingToken)
        ));
        assert!(client.request("/tours/list", Locale::En, Auth::Public).is_ok());
    }
}
