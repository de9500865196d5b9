//! Video-embed provider
//!
//! Builds player URLs and checks whether the provider can serve a title.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::EmbedError;
use crate::models::ContentKind;
use crate::services::metrics;

#[derive(Debug, Clone)]
pub struct EmbedClient {
    http: Client,
    base_url: String,
}

impl EmbedClient {
    /// `http` must follow redirects (reqwest's default policy does)
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{movie|tv}/{id}`
    pub fn embed_url(&self, kind: ContentKind, external_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            kind.embed_segment(),
            urlencoding::encode(external_id.trim())
        )
    }

    /// `{base}/tv/{id}/{season}/{episode}`
    pub fn episode_url(&self, external_id: &str, season: u32, episode: u32) -> String {
        format!(
            "{}/{}/{}",
            self.embed_url(ContentKind::Series, external_id),
            season,
            episode,
        )
    }

    /// HEAD the embed page. Available iff the final status is 2xx.
    pub async fn check_availability(
        &self,
        kind: ContentKind,
        imdb_id: &str,
    ) -> Result<bool, EmbedError> {
        let url = self.embed_url(kind, imdb_id);
        debug!("Checking availability: {}", url);

        match self.http.head(&url).send().await {
            Ok(response) => {
                let available = response.status().is_success();
                metrics::record_upstream("embed", if available { "ok" } else { "unavailable" });
                Ok(available)
            }
            Err(e) => {
                warn!("Availability check failed for {}: {}", imdb_id, e);
                metrics::record_upstream("embed", "network_error");
                Err(EmbedError::Network(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_embed_urls() {
        let embed = EmbedClient::new(Client::new(), "https://vidsrc.xyz/embed/");

        assert_eq!(
            embed.embed_url(ContentKind::Movie, "tt0111161"),
            "https://vidsrc.xyz/embed/movie/tt0111161"
        );
        assert_eq!(
            embed.embed_url(ContentKind::Series, "tt0903747"),
            "https://vidsrc.xyz/embed/tv/tt0903747"
        );
        assert_eq!(
            embed.episode_url("tt0903747", 2, 5),
            "https://vidsrc.xyz/embed/tv/tt0903747/2/5"
        );
    }

    #[tokio::test]
    async fn test_check_availability_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/embed/movie/tt0111161"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/embed/movie/tt0000000"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let embed = EmbedClient::new(Client::new(), &format!("{}/embed", server.uri()));
        assert!(embed
            .check_availability(ContentKind::Movie, "tt0111161")
            .await
            .unwrap());
        assert!(!embed
            .check_availability(ContentKind::Movie, "tt0000000")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_check_availability_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/embed/tv/tt0903747"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/player/abc", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/player/abc"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let embed = EmbedClient::new(Client::new(), &format!("{}/embed", server.uri()));
        assert!(embed
            .check_availability(ContentKind::Series, "tt0903747")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_check_availability_network_error() {
        let embed = EmbedClient::new(Client::new(), "http://127.0.0.1:1/embed");
        let err = embed
            .check_availability(ContentKind::Movie, "tt0111161")
            .await
            .unwrap_err();
        assert!(matches!(err, EmbedError::Network(_)));
    }
}
