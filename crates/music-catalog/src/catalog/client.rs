use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;

use super::envelope::{self, Outcome, ResourceObject};
use super::error::CatalogError;
use super::request::CatalogRequest;
use super::resource::{self, CatalogResource};
use super::types::*;
use crate::auth::{DeniedAuthorizer, MediaAuthorizer, TokenPair, TokenProvider};
use crate::config::{self, ConfigManager};
use crate::http::{HttpClient, ReqwestClient};
use crate::logging::verbose;

const MUSIC_USER_TOKEN: &str = "Music-User-Token";

/// Apple Music catalog API client
///
/// Every call runs its own chain: token acquisition, one GET, envelope
/// classification, typed decode. Nothing is cached between calls.
pub struct CatalogClient<H: HttpClient = ReqwestClient, A: MediaAuthorizer = DeniedAuthorizer> {
    http: H,
    tokens: TokenProvider<H, A>,
    config: Arc<ConfigManager>,
}

impl CatalogClient<ReqwestClient, DeniedAuthorizer> {
    /// Creates a client reading the process-wide configuration
    pub fn new() -> Self {
        Self::with_parts(config::global(), ReqwestClient::new(), DeniedAuthorizer)
    }
}

impl Default for CatalogClient<ReqwestClient, DeniedAuthorizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: MediaAuthorizer> CatalogClient<ReqwestClient, A> {
    /// Creates a client using `authorizer` for user-mode sessions
    pub fn with_authorizer(authorizer: A) -> Self {
        Self::with_parts(config::global(), ReqwestClient::new(), authorizer)
    }
}

impl<H: HttpClient + Clone, A: MediaAuthorizer> CatalogClient<H, A> {
    /// Creates a client with explicit configuration and collaborators
    pub fn with_parts(config: Arc<ConfigManager>, http: H, authorizer: A) -> Self {
        Self {
            tokens: TokenProvider::new(http.clone(), authorizer),
            http,
            config,
        }
    }
}

fn build_headers(tokens: &TokenPair, developer: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", developer))
            .context("Developer token is not a valid header value")?,
    );
    if let Some(user) = &tokens.user {
        headers.insert(
            MUSIC_USER_TOKEN,
            HeaderValue::from_str(user).context("User token is not a valid header value")?,
        );
    }
    Ok(headers)
}

impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    /// Returns the configuration this client reads on every call
    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// Runs token acquisition alone, with the current configuration
    pub async fn acquire_tokens(&self) -> TokenPair {
        self.tokens.acquire(&self.config.get()).await
    }

    /// Acquires tokens, performs the GET and classifies the body
    ///
    /// No request is sent when there is no developer token. The body is
    /// classified whatever the HTTP status, since API errors arrive as an
    /// `errors` envelope on 4xx responses.
    pub async fn dispatch(&self, request: &CatalogRequest) -> Outcome {
        let session = self.config.get();
        let tokens = self.tokens.acquire(&session).await;

        let Some(developer) = tokens.developer.as_deref() else {
            verbose!(
                session.debug,
                "No developer token, not requesting {}",
                request.url()
            );
            return Outcome::Unauthorized;
        };

        let headers = match build_headers(&tokens, developer) {
            Ok(headers) => headers,
            Err(e) => {
                tracing::warn!("{:#}", e);
                return Outcome::Unauthorized;
            }
        };

        verbose!(session.debug, "GET {}", request.url());
        let response = match self.http.get_response(request.url(), &headers).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Catalog request failed: {:#}", e);
                return Outcome::Unauthorized;
            }
        };

        let outcome = envelope::classify(&response.body);
        match &outcome {
            Outcome::Resources(objects) => {
                verbose!(
                    session.debug,
                    "Success: {} resource(s) from {}",
                    objects.len(),
                    request.url()
                );
            }
            Outcome::Error(err) => {
                verbose!(session.debug, "Catalog error {}: {}", err.status, err.title);
            }
            Outcome::Unauthorized => {
                verbose!(
                    session.debug,
                    "Unrecognized response (HTTP {}) from {}",
                    response.status,
                    request.url()
                );
            }
        }
        outcome
    }

    /// Fetches one resource by id
    ///
    /// Only the first `data` entry is used. An empty `data` array is reported
    /// as [`CatalogError::unauthorized`].
    pub async fn fetch<R: CatalogResource>(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<R, CatalogError> {
        let request = CatalogRequest::resource::<R>(storefront, id, lang);
        let objects = self.dispatch(&request).await.into_result()?;
        let first = objects.first().ok_or_else(|| {
            tracing::warn!("Empty data envelope for {}", request.url());
            CatalogError::unauthorized()
        })?;
        decode_or_unauthorized(first)
    }

    /// Fetches several resources by id, in response order
    ///
    /// An empty `data` array is an empty vector, not an error.
    pub async fn fetch_many<R: CatalogResource, S: AsRef<str> + Sync>(
        &self,
        storefront: &str,
        ids: &[S],
        lang: Option<&str>,
    ) -> Result<Vec<R>, CatalogError> {
        let request = CatalogRequest::resources::<R, S>(storefront, ids, lang);
        let objects = self.dispatch(&request).await.into_result()?;
        objects.iter().map(decode_or_unauthorized::<R>).collect()
    }
}

fn decode_or_unauthorized<R: CatalogResource>(
    object: &ResourceObject,
) -> Result<R, CatalogError> {
    resource::decode(object).map_err(|e| {
        tracing::warn!("Failed to decode {} {}: {}", R::KIND, object.id, e);
        CatalogError::unauthorized()
    })
}

// Artist-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn artist(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Artist, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn artists(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Artist>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Song-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn song(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Song, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn songs(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Song>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Album-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn album(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Album, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn albums(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Album>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Playlist-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn playlist(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Playlist, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn playlists(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Playlist>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Station-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn station(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Station, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn stations(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Station>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Curator-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn curator(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Curator, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn curators(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Curator>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }

    pub async fn apple_curator(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<AppleCurator, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn apple_curators(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<AppleCurator>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Activity-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn activity(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Activity, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn activities(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Activity>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Music video-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn music_video(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<MusicVideo, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn music_videos(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<MusicVideo>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Genre-related methods
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn genre(
        &self,
        storefront: &str,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Genre, CatalogError> {
        self.fetch(storefront, id, lang).await
    }

    pub async fn genres(
        &self,
        storefront: &str,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Genre>, CatalogError> {
        self.fetch_many(storefront, ids, lang).await
    }
}

// Storefront-related methods
//
// Storefronts are addressed directly, not through a catalog storefront.
impl<H: HttpClient, A: MediaAuthorizer> CatalogClient<H, A> {
    pub async fn storefront(
        &self,
        id: &str,
        lang: Option<&str>,
    ) -> Result<Storefront, CatalogError> {
        self.fetch("", id, lang).await
    }

    pub async fn storefronts(
        &self,
        ids: &[&str],
        lang: Option<&str>,
    ) -> Result<Vec<Storefront>, CatalogError> {
        self.fetch_many("", ids, lang).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::mock::MockAuthorizer;
    use crate::config::{AuthMode, SessionConfig};
    use crate::http::mock::{Method, MockHttpClient};
    use crate::testutil::*;

    fn client(mock: MockHttpClient) -> CatalogClient<MockHttpClient, DeniedAuthorizer> {
        CatalogClient::with_parts(
            Arc::new(ConfigManager::new(session())),
            mock,
            DeniedAuthorizer,
        )
    }

    fn catalog_gets(mock: &MockHttpClient) -> Vec<String> {
        mock.requests_for(Method::Get)
            .into_iter()
            .map(|r| r.url)
            .collect()
    }

    #[tokio::test]
    async fn single_resource_decodes_first_entry() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("artists/271256"),
            200,
            r#"{"data":[{"attributes":{"name":"Drake"}}]}"#,
        );

        let artist = client(mock).artist("us", "271256", None).await.unwrap();

        assert_eq!(artist.attributes.name, "Drake");
    }

    #[tokio::test]
    async fn single_resource_ignores_extra_entries() {
        let body = data_envelope(vec![
            ResourceJson::new("songs", "1").attr("name", "First").build(),
            ResourceJson::new("songs", "2").attr("name", "Second").build(),
        ]);
        let mock = with_token_server(MockHttpClient::new()).on_get(&catalog_url("songs/1"), 200, body);

        let song = client(mock).song("us", "1", None).await.unwrap();

        assert_eq!(song.id, "1");
        assert_eq!(song.attributes.name, "First");
    }

    #[tokio::test]
    async fn error_envelope_is_passed_through() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("albums/missing"),
            404,
            r#"{"errors":[{"status":"404","code":"40400","title":"Not Found","detail":"Resource with requested id was not found"}]}"#,
        );

        let err = client(mock).album("us", "missing", None).await.unwrap_err();

        assert_eq!(err.status, "404");
        assert_eq!(err.code, "40400");
        assert_eq!(err.title, "Not Found");
        assert_eq!(err.detail, "Resource with requested id was not found");
    }

    #[tokio::test]
    async fn missing_configuration_fails_without_any_request() {
        let mock = with_token_server(MockHttpClient::new());
        let client = CatalogClient::with_parts(
            Arc::new(ConfigManager::default()),
            mock.clone(),
            DeniedAuthorizer,
        );

        let err = client.playlist("us", "pl.1", None).await.unwrap_err();

        assert_eq!(err.status, "401");
        assert_eq!(err.code, "unauthorized");
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn token_server_failure_skips_catalog_request() {
        let mock = MockHttpClient::new()
            .on_post(TOKEN_SERVER, 500, "")
            .on_get(&catalog_url("artists/1"), 200, r#"{"data":[]}"#);

        let err = client(mock.clone()).artist("us", "1", None).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(catalog_gets(&mock).is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_unauthorized() {
        // Token server configured, catalog URL not: the GET fails
        let mock = with_token_server(MockHttpClient::new());

        let err = client(mock).station("us", "ra.1", None).await.unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn unrecognized_body_is_unauthorized() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("genres/18"),
            200,
            r#"{"meta":{}}"#,
        );

        let err = client(mock).genre("us", "18", None).await.unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn empty_data_for_single_resource_is_unauthorized() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("curators/c1"),
            200,
            r#"{"data":[]}"#,
        );

        let err = client(mock).curator("us", "c1", None).await.unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn model_decode_failure_is_unauthorized() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("songs/1"),
            200,
            r#"{"data":[{"attributes":{"name":["not","a","string"]}}]}"#,
        );

        let err = client(mock).song("us", "1", None).await.unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn multi_resource_preserves_order() {
        let body = data_envelope(vec![
            ResourceJson::new("artists", "2").attr("name", "Second").build(),
            ResourceJson::new("artists", "1").attr("name", "First").build(),
        ]);
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("artists?ids=2,1"),
            200,
            body,
        );

        let artists = client(mock).artists("us", &["2", "1"], None).await.unwrap();

        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].attributes.name, "Second");
        assert_eq!(artists[1].attributes.name, "First");
    }

    #[tokio::test]
    async fn multi_resource_empty_data_is_empty_vec() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("music-videos?ids=x,y"),
            200,
            r#"{"data":[]}"#,
        );

        let videos = client(mock).music_videos("us", &["x", "y"], None).await.unwrap();

        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn multi_resource_error_envelope() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("activities?ids=bad"),
            400,
            error_envelope("400", "40005", "Invalid Parameter Value"),
        );

        let err = client(mock).activities("us", &["bad"], None).await.unwrap_err();

        assert_eq!(err.status, "400");
        assert_eq!(err.code, "40005");
    }

    #[tokio::test]
    async fn language_is_appended_to_url() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("apple-curators/976439548?l=es-MX"),
            200,
            data_envelope(vec![ResourceJson::new("apple-curators", "976439548")
                .attr("name", "Apple Music Pop")
                .build()]),
        );

        let curator = client(mock.clone())
            .apple_curator("us", "976439548", Some("es-MX"))
            .await
            .unwrap();

        assert_eq!(curator.attributes.name, "Apple Music Pop");
        assert_eq!(
            catalog_gets(&mock),
            vec![catalog_url("apple-curators/976439548?l=es-MX")]
        );
    }

    #[tokio::test]
    async fn storefront_uses_top_level_path() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            "https://api.music.apple.com/v1/storefronts/gb",
            200,
            data_envelope(vec![ResourceJson::new("storefronts", "gb")
                .attr("name", "United Kingdom")
                .build()]),
        );

        let storefront = client(mock).storefront("gb", None).await.unwrap();

        assert_eq!(storefront.attributes.name, "United Kingdom");
    }

    #[tokio::test]
    async fn sends_bearer_developer_token() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("artists/1"),
            200,
            r#"{"data":[{"attributes":{"name":"A"}}]}"#,
        );

        client(mock.clone()).artist("us", "1", None).await.unwrap();

        let gets = mock.requests_for(Method::Get);
        assert_eq!(gets.len(), 1);
        assert_eq!(
            gets[0].headers.get(AUTHORIZATION).unwrap(),
            &format!("Bearer {}", DEVELOPER_TOKEN)
        );
        assert!(gets[0].headers.get(MUSIC_USER_TOKEN).is_none());
    }

    #[tokio::test]
    async fn user_mode_sends_music_user_token() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("songs/1"),
            200,
            r#"{"data":[{"attributes":{"name":"S"}}]}"#,
        );
        let client = CatalogClient::with_parts(
            Arc::new(ConfigManager::new(session().with_auth_mode(AuthMode::User))),
            mock.clone(),
            MockAuthorizer::granting("music-user-token"),
        );

        client.song("us", "1", None).await.unwrap();

        let gets = mock.requests_for(Method::Get);
        assert_eq!(gets[0].headers.get(MUSIC_USER_TOKEN).unwrap(), "music-user-token");
    }

    #[tokio::test]
    async fn user_mode_denied_is_unauthorized_without_catalog_request() {
        let mock = with_token_server(MockHttpClient::new());
        let client = CatalogClient::with_parts(
            Arc::new(ConfigManager::new(session().with_auth_mode(AuthMode::User))),
            mock.clone(),
            DeniedAuthorizer,
        );

        let err = client.album("us", "1", None).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(catalog_gets(&mock).is_empty());
        assert_eq!(mock.requests_for(Method::Post).len(), 1);
    }

    #[tokio::test]
    async fn configuration_changes_apply_to_next_call() {
        let mock = with_token_server(MockHttpClient::new()).on_get(
            &catalog_url("genres/18"),
            200,
            r#"{"data":[{"attributes":{"name":"Hip-Hop/Rap"}}]}"#,
        );
        let client = CatalogClient::with_parts(
            Arc::new(ConfigManager::default()),
            mock,
            DeniedAuthorizer,
        );

        assert!(client.genre("us", "18", None).await.is_err());

        client.config().set(session());
        let genre = client.genre("us", "18", None).await.unwrap();
        assert_eq!(genre.attributes.name, "Hip-Hop/Rap");
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let body = data_envelope(vec![ResourceJson::new("albums", "a1")
            .attr("name", "Scorpion")
            .related("tracks", vec![ResourceJson::new("songs", "t1").attr("name", "Survival").build()])
            .build()]);
        let mock = with_token_server(MockHttpClient::new()).on_get(&catalog_url("albums/a1"), 200, body);
        let client = client(mock.clone());

        let first = client.album("us", "a1", None).await;
        let second = client.album("us", "a1", None).await;

        assert_eq!(first, second);
        assert_eq!(first.unwrap().relationships.tracks[0].attributes.name, "Survival");
        // Two token requests and two catalog requests
        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn acquire_tokens_uses_current_configuration() {
        let mock = with_token_server(MockHttpClient::new());
        let client = CatalogClient::with_parts(
            Arc::new(ConfigManager::new(SessionConfig::default())),
            mock,
            DeniedAuthorizer,
        );

        assert!(client.acquire_tokens().await.is_empty());

        client.config().set(session());
        assert_eq!(
            client.acquire_tokens().await.developer.as_deref(),
            Some(DEVELOPER_TOKEN)
        );
    }
}
