use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ensrent_backend::config::AppConfig;
use ensrent_backend::handlers;
use ensrent_backend::services::browse::BrowseService;
use ensrent_backend::services::ens::EnsNameService;
use ensrent_backend::services::indexer::IndexerService;
use ensrent_backend::services::rental_contract::RentalContractService;
use ensrent_backend::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ensrent_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("Configuration error");

    let indexer = IndexerService::new(config.ensrent_graphql_url.clone());
    let ens = EnsNameService::new(
        config.ens_subgraph_url.clone(),
        config.ens_name_cache_ttl_secs,
    );
    let contract = Arc::new(
        RentalContractService::new(
            &config.rpc_url,
            &config.signer_private_key,
            &config.ensrent_address,
            &config.base_registrar_address,
            &config.name_wrapper_address,
        )
        .expect("Failed to initialize rental contract gateway"),
    );
    contract.verify_connection().await;

    let browse = Arc::new(BrowseService::new(Arc::new(indexer.clone())));

    let state = AppState {
        indexer,
        ens,
        contract,
        browse,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/browse", get(handlers::browse::get_browse))
        .route("/api/domains/{name}", get(handlers::domain::get_domain))
        .route("/api/domains/{name}/rent", post(handlers::rent::post_rent))
        .route(
            "/api/domains/{name}/unlist",
            post(handlers::rent::post_unlist),
        )
        .route("/api/manage/{address}", get(handlers::manage::get_manage))
        .route("/api/rentals", get(handlers::rentals::get_rentals))
        .route("/api/lend/{name}/approval", get(handlers::lend::get_approval))
        .route("/api/lend/{name}/approve", post(handlers::lend::post_approve))
        .route("/api/lend/{name}", post(handlers::lend::post_list))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

async fn health() -> &'static str {
    "ok"
}
