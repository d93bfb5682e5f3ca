use super::table::RoutingTable;
use super::RoutingError;
use crate::multimap::protocol::ENDPOINT_INVOKE;
use std::sync::Arc;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_millis(500);
const SEND_ATTEMPTS: usize = 3;

/// Delivers an encoded request frame to the member owning a partition and
/// returns the raw response body. The frame is opaque at this layer: routing
/// never inspects or re-encodes what it forwards.
pub struct ClusterClient {
    table: Arc<RoutingTable>,
    http_client: reqwest::Client,
}

impl ClusterClient {
    pub fn new(table: Arc<RoutingTable>) -> Self {
        Self {
            table,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, partition: u32, body: Vec<u8>) -> Result<Vec<u8>, RoutingError> {
        let owner = self.table.owner(partition)?;
        let url = format!("http://{}{}", owner, ENDPOINT_INVOKE);

        tracing::debug!("Sending frame for partition {} to {}", partition, owner);

        let response = self.post_with_retry(&url, body).await.map_err(|e| {
            RoutingError::PeerUnreachable {
                addr: owner,
                attempts: SEND_ATTEMPTS,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::PeerRejected {
                addr: owner,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RoutingError::PeerUnreachable {
                addr: owner,
                attempts: SEND_ATTEMPTS,
                reason: e.to_string(),
            })?;

        Ok(bytes.to_vec())
    }

    async fn post_with_retry(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut delay_ms = 150u64;

        let mut attempt = 0;
        loop {
            let response = self
                .http_client
                .post(url)
                .body(body.clone())
                .timeout(SEND_TIMEOUT)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    if attempt == SEND_ATTEMPTS {
                        return Err(e);
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }
    }
}
