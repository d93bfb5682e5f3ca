use super::operations::OperationError;
use super::protocol::{InvokeResponse, MultiMapRequest};
use super::request::CallSignature;
use super::store::MultiMapStore;
use super::types::NodeId;
use crate::routing::client::ClusterClient;
use crate::routing::partitioner::Partitioner;
use crate::routing::table::RoutingTable;
use axum::{body::Bytes, extract::Extension, http::StatusCode, Json};
use std::sync::Arc;

/// Everything the invoke path needs, shared via `Extension`.
pub struct NodeContext {
    pub node_id: NodeId,
    pub store: MultiMapStore,
    pub partitioner: Arc<Partitioner>,
    pub table: Arc<RoutingTable>,
    pub client: ClusterClient,
}

fn failure(error: impl ToString) -> Json<InvokeResponse> {
    Json(InvokeResponse {
        result: None,
        error: Some(error.to_string()),
    })
}

/// Accepts an encoded request frame. If this member owns the key's
/// partition the request is executed here; otherwise the original frame is
/// forwarded untouched to the owner and its reply relayed back.
pub async fn handle_invoke(
    Extension(ctx): Extension<Arc<NodeContext>>,
    body: Bytes,
) -> (StatusCode, Json<InvokeResponse>) {
    let request = match MultiMapRequest::decode(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Failed to decode request frame: {}", e);
            return (StatusCode::BAD_REQUEST, failure(e));
        }
    };

    let partition = request.target_partition(&ctx.partitioner);
    tracing::debug!(
        "{} with {} parameter(s) targets partition {}",
        request.method_name(),
        request.parameters().len(),
        partition
    );

    let is_local = match ctx.table.is_local(partition) {
        Ok(is_local) => is_local,
        Err(e) => {
            tracing::error!("Routing failed for partition {}: {}", partition, e);
            return (StatusCode::SERVICE_UNAVAILABLE, failure(e));
        }
    };

    if !is_local {
        return match ctx.client.send(partition, body.to_vec()).await {
            Ok(reply) => match serde_json::from_slice::<InvokeResponse>(&reply) {
                Ok(response) => (StatusCode::OK, Json(response)),
                Err(e) => {
                    tracing::error!("Owner reply was not a valid response: {}", e);
                    (StatusCode::BAD_GATEWAY, failure(e))
                }
            },
            Err(e) => {
                tracing::error!("Failed to forward to partition owner: {}", e);
                (StatusCode::BAD_GATEWAY, failure(e))
            }
        };
    }

    let operation = request.prepare_operation();
    match operation.execute(&ctx.store) {
        Ok(result) => (
            StatusCode::OK,
            Json(InvokeResponse {
                result: Some(result),
                error: None,
            }),
        ),
        Err(e @ OperationError::EntryLocked { .. }) => {
            tracing::warn!("{} refused: {}", request.method_name(), e);
            (StatusCode::CONFLICT, failure(e))
        }
    }
}
