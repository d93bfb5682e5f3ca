use axum::{routing::post, Extension, Router};
use multimap_cluster::multimap::handlers::{handle_invoke, NodeContext};
use multimap_cluster::multimap::protocol::ENDPOINT_INVOKE;
use multimap_cluster::multimap::store::MultiMapStore;
use multimap_cluster::multimap::types::NodeId;
use multimap_cluster::routing::client::ClusterClient;
use multimap_cluster::routing::partitioner::Partitioner;
use multimap_cluster::routing::table::RoutingTable;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> [--peer <addr:port>]...",
            args[0]
        );
        eprintln!("Example: {} --bind 127.0.0.1:6000", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:6001 --peer 127.0.0.1:6000 --peer 127.0.0.1:6002",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut peers: Vec<SocketAddr> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--peer" => {
                peers.push(args[i + 1].parse()?);
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");
    let node_id = NodeId::new();

    tracing::info!("Starting node {:?} on {}", node_id, bind_addr);
    if peers.is_empty() {
        tracing::info!("No peers configured, owning all partitions");
    } else {
        tracing::info!("Static peer list: {:?}", peers);
    }

    // 1. Routing: partitioner + static partition table + delivery client.
    let partitioner = Arc::new(Partitioner::default());
    let table = Arc::new(RoutingTable::new(bind_addr, peers));
    let client = ClusterClient::new(table.clone());

    tracing::info!(
        "Routing {} partitions across {} member(s)",
        partitioner.partition_count(),
        table.peer_count()
    );

    // 2. Local multimap state:
    let store = MultiMapStore::new(partitioner.clone());

    let ctx = Arc::new(NodeContext {
        node_id,
        store,
        partitioner,
        table,
        client,
    });

    // 3. HTTP Router:
    let app = Router::new()
        .route(ENDPOINT_INVOKE, post(handle_invoke))
        .layer(Extension(ctx.clone()));

    // 4. Spawn stats reporter:
    let stats_ctx = ctx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(10));

        loop {
            interval.tick().await;
            tracing::info!(
                "Node {:?}: {} collection(s), {} stored value(s)",
                stats_ctx.node_id,
                stats_ctx.store.collection_count(),
                stats_ctx.store.entry_count()
            );
        }
    });

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
