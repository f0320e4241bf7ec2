//! Serve command - runs the Tandem web server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

use tandem::api::{AppState, router};
use tandem::identity::InMemoryDirectory;
use tandem::relay::Relay;
use tandem::service::ListService;
use tandem::store::InMemory;
use tandem::{Clock, SystemClock};

use crate::cli::ServeArgs;

const LISTS_FILE: &str = "tandem.json";
const USERS_FILE: &str = "users.json";

/// Run the Tandem server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tandem=info".parse().unwrap()),
        )
        .init();

    let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let lists_path = data_dir.join(LISTS_FILE);
    let users_path = data_dir.join(USERS_FILE);

    // Load or create the aggregate store
    let store = match InMemory::load_from_file(&lists_path) {
        Ok(store) => {
            tracing::info!("Loaded {} lists from {}", store.len(), lists_path.display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Failed to load {}: {e}. Starting fresh.", lists_path.display());
            Arc::new(InMemory::new())
        }
    };

    // Load the identity seed; an empty directory still serves reads
    let directory = Arc::new(InMemoryDirectory::load_from_file(&users_path)?);
    tracing::info!("Identity directory loaded from {}", users_path.display());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = Arc::new(ListService::new(store.clone(), directory.clone(), clock));
    let relay = Arc::new(Relay::new());

    // Build router
    let app = router(AppState::new(service, directory, relay));

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("Tandem server starting on http://localhost:{}", local_addr.port());
    println!();
    println!("Available endpoints:");
    println!("  GET    /health                  - Health check");
    println!("  POST   /lists                   - Create a list");
    println!("  GET    /lists                   - Lists visible to you");
    println!("  GET    /lists/{{id}}              - Fetch one list");
    println!("  GET    /ws                      - Realtime relay channel");
    println!();
    println!("Press Ctrl+C to shutdown");

    // Start server with graceful shutdown
    let store_for_shutdown = store.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to set up SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("failed to set up SIGINT handler");

            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
                _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
            }

            // Give in-flight requests a moment to settle before the snapshot
            tokio::time::sleep(Duration::from_millis(100)).await;

            match store_for_shutdown.save_to_file(&lists_path) {
                Ok(_) => {
                    tracing::info!("Lists saved to {}", lists_path.display());
                    println!("\nLists saved successfully");
                }
                Err(e) => {
                    tracing::error!("Failed to save lists: {e:?}");
                    eprintln!("Failed to save lists: {e:?}");
                }
            }
        })
        .await?;

    println!("Server shut down");
    Ok(())
}
