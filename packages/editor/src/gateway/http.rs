use super::{GatewayError, GatewayResult, PersistenceGateway};
use async_trait::async_trait;
use blockpad_document::{Block, BlockBody, BlockId, Page, PageId};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Gateway speaking the `blockpad-server` JSON API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpGateway {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3030`.
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!(
                "invalid base URL {}",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Builds `<base>/api/<segments...>`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let bytes = self.execute(request).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(error = %e, "Undecodable response body");
            GatewayError::Parse
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> GatewayResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> GatewayResult<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &bytes));
        }
        Ok(bytes.to_vec())
    }
}

/// Prefer the server's `{"error": ...}` message, fall back to the bare status.
fn rejection(status: u16, body: &[u8]) -> GatewayError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| format!("request failed with status {}", status));
    GatewayError::Rejected { status, message }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn list_pages(&self) -> GatewayResult<Vec<Page>> {
        self.send(self.client.get(self.url(&["pages"]))).await
    }

    async fn create_page(&self, page: &Page) -> GatewayResult<Page> {
        self.send(self.client.post(self.url(&["pages"])).json(page))
            .await
    }

    async fn replace_page(&self, page: &Page) -> GatewayResult<Page> {
        let url = self.url(&["pages", page.id.as_str()]);
        self.send(self.client.put(url).json(page)).await
    }

    async fn delete_page(&self, id: &PageId) -> GatewayResult<()> {
        let url = self.url(&["pages", id.as_str()]);
        self.send_empty(self.client.delete(url)).await
    }

    async fn replace_page_order(&self, pages: &[Page]) -> GatewayResult<Vec<Page>> {
        self.send(self.client.put(self.url(&["pages"])).json(pages))
            .await
    }

    async fn list_blocks(&self) -> GatewayResult<Vec<Block>> {
        self.send(self.client.get(self.url(&["blocks"]))).await
    }

    async fn create_block(&self, body: &BlockBody) -> GatewayResult<Block> {
        self.send(self.client.post(self.url(&["blocks"])).json(body))
            .await
    }

    async fn update_block(&self, id: &BlockId, body: &BlockBody) -> GatewayResult<Block> {
        let url = self.url(&["blocks", id.as_str()]);
        self.send(self.client.put(url).json(body)).await
    }

    async fn delete_block(&self, id: &BlockId) -> GatewayResult<()> {
        let url = self.url(&["blocks", id.as_str()]);
        self.send_empty(self.client.delete(url)).await
    }

    async fn reorder_blocks(&self, ids: &[BlockId]) -> GatewayResult<Vec<Block>> {
        let url = self.url(&["blocks", "reorder"]);
        self.send(self.client.put(url).json(&json!({ "ids": ids })))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_segments() {
        let gateway = HttpGateway::new("http://localhost:3030/").unwrap();
        let url = gateway.url(&["pages", "a b/c"]);
        assert_eq!(url.as_str(), "http://localhost:3030/api/pages/a%20b%2Fc");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let gateway = HttpGateway::new("http://localhost:3030/blockpad").unwrap();
        let url = gateway.url(&["blocks", "reorder"]);
        assert_eq!(url.as_str(), "http://localhost:3030/blockpad/api/blocks/reorder");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpGateway::new("not a url"),
            Err(GatewayError::Transport(_))
        ));
        assert!(HttpGateway::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_rejection_message() {
        let error = rejection(409, br#"{"error":"Page already exists: p1"}"#);
        assert_eq!(error.to_string(), "Page already exists: p1");
        assert!(error.is_conflict());

        let error = rejection(502, b"<html>bad gateway</html>");
        assert_eq!(error.to_string(), "request failed with status 502");
        assert_eq!(error.status(), Some(502));
    }
}
