use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::Value;

use ensrent_backend::handlers;
use ensrent_backend::services::browse::BrowseService;
use ensrent_backend::services::ens::EnsNameService;
use ensrent_backend::services::indexer::IndexerService;
use ensrent_backend::services::rental_contract::RentalContractService;
use ensrent_backend::AppState;

/// Well-known local dev key (anvil account #0); never holds real funds.
const TEST_SIGNER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const ENSRENT_ADDRESS: &str = "0x00000000000000000000000000000000000000e1";
const BASE_REGISTRAR_ADDRESS: &str = "0x00000000000000000000000000000000000000e2";
const NAME_WRAPPER_ADDRESS: &str = "0x00000000000000000000000000000000000000e3";

type Responder = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

#[derive(Clone)]
struct MockGraphQlState {
    responder: Responder,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// A scripted GraphQL endpoint on an ephemeral local port. Records every
/// `{query, variables}` body it receives.
pub struct MockGraphQl {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

impl MockGraphQl {
    pub async fn spawn<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let state = MockGraphQlState {
            responder: Arc::new(responder),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/", post(serve_graphql))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, requests }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    #[allow(dead_code)]
    pub fn last_request(&self) -> Option<Value> {
        self.requests.lock().last().cloned()
    }
}

async fn serve_graphql(
    State(state): State<MockGraphQlState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let response = (state.responder)(&body);
    state.requests.lock().push(body);
    Json(response)
}

/// App state wired against mock endpoints. The contract gateway points at a
/// dead local RPC port; tests exercising it are out of scope here.
pub fn test_state(indexer_url: String, subgraph_url: String) -> AppState {
    let indexer = IndexerService::new(indexer_url);

    AppState {
        indexer: indexer.clone(),
        ens: EnsNameService::new(subgraph_url, 300),
        contract: Arc::new(
            RentalContractService::new(
                "http://127.0.0.1:1",
                TEST_SIGNER_KEY,
                ENSRENT_ADDRESS,
                BASE_REGISTRAR_ADDRESS,
                NAME_WRAPPER_ADDRESS,
            )
            .expect("Failed to build test contract gateway"),
        ),
        browse: Arc::new(BrowseService::new(Arc::new(indexer))),
    }
}

/// The read-side routes under test, wired like the production router.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/api/browse", get(handlers::browse::get_browse))
        .route("/api/domains/{name}", get(handlers::domain::get_domain))
        .route("/api/manage/{address}", get(handlers::manage::get_manage))
        .route("/api/rentals", get(handlers::rentals::get_rentals))
        .with_state(state)
}

/// Fixture listing in the indexer's wire shape.
pub fn listing_json(name: &str, lender: &str, rentals: Value) -> Value {
    serde_json::json!({
        "id": format!("0x{}", name),
        "tokenId": "123",
        "node": "0x00",
        "name": name,
        "lender": lender,
        "price": "1000000000",
        "maxRentalTime": "9999999999",
        "createdAt": "1700000000",
        "isWrapped": false,
        "rentals": { "items": rentals }
    })
}

pub fn rental_json(borrower: &str, start: i64, end: i64) -> Value {
    serde_json::json!({
        "borrower": borrower,
        "startTime": start.to_string(),
        "endTime": end.to_string()
    })
}
