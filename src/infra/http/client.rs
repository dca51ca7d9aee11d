use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use postdesk_api_types::ApiResponse;

use crate::application::gateway::{GatewayError, GatewayResult, PostsGateway};
use crate::domain::types::{DeleteAck, Post, PostDraft, PostId, PostPage};

/// Only the `error` field is read from a failing response body.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HttpPostsGateway {
    client: Client,
    base: Url,
}

impl HttpPostsGateway {
    /// Requests resolve relative to `base_url`; a path prefix is kept.
    pub fn new(base_url: &Url) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base: with_trailing_slash(base_url),
        })
    }

    pub fn connect(site: &str) -> Result<Self, GatewayError> {
        let base = Url::parse(site).map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        Self::new(&base)
    }

    pub fn user_agent() -> &'static str {
        concat!("postdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|err| GatewayError::InvalidUrl(err.to_string()))
    }

    fn record_url(&self, id: &PostId) -> Result<Url, GatewayError> {
        let mut url = self.url("posts")?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(format!("{} cannot be a base", self.base)))?
            .push(&id.to_string());
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&PostDraft>,
    ) -> GatewayResult<T> {
        debug!(method = %method, path = url.path(), "sending backend request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Self::handle(response).await
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .ok()
                .and_then(|envelope| envelope.error);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                error,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[async_trait]
impl PostsGateway for HttpPostsGateway {
    async fn list(&self, limit: u32, offset: u32) -> GatewayResult<PostPage> {
        let url = self.url(&format!("articles/{limit}/{offset}"))?;
        self.send(Method::GET, url, None).await
    }

    async fn get_one(&self, id: &PostId) -> GatewayResult<Post> {
        let url = self.record_url(id)?;
        self.send(Method::GET, url, None).await
    }

    async fn create(&self, draft: &PostDraft) -> GatewayResult<Post> {
        let url = self.url("posts")?;
        self.send(Method::POST, url, Some(draft)).await
    }

    async fn update(&self, id: &PostId, draft: &PostDraft) -> GatewayResult<Post> {
        let url = self.record_url(id)?;
        self.send(Method::PUT, url, Some(draft)).await
    }

    async fn delete(&self, id: &PostId) -> GatewayResult<DeleteAck> {
        let url = self.record_url(id)?;
        self.send::<DeleteAck>(Method::DELETE, url, None)
            .await
            .map(ApiResponse::with_default_data)
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url
}
