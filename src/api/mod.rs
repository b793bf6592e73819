//! HTTP 表现层
//!
//! 表现层只消费会话快照并转发用户意图（connect / disconnect /
//! switch_chain / add_chain / send），不承载任何状态机逻辑。

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    api::{
        handlers::{
            add_chain, connect_session, disconnect_session, get_session, healthz, list_chains,
            send_transfer, switch_chain,
        },
        middleware::trace_id_middleware,
    },
    app_state::AppState,
};

pub mod handlers;
pub mod middleware;
pub mod response;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::healthz,
        handlers::get_session,
        handlers::connect_session,
        handlers::disconnect_session,
        handlers::switch_chain,
        handlers::add_chain,
        handlers::send_transfer,
        handlers::list_chains,
    ),
    components(
        schemas(
            handlers::HealthResponse,
            handlers::SwitchChainReq,
            handlers::ChainOpData,
            handlers::KnownChainData,
            handlers::ListChainsResp,
            crate::service::wallet_session::SessionSnapshot,
            crate::domain::chain::ChainDescriptor,
            crate::domain::chain::NativeCurrency,
            crate::domain::transfer::TransferRequest,
            crate::domain::transfer::TransferReceipt,
            crate::error_body::ErrorBodyDoc,
        )
    ),
    tags(
        (name = "LinkCore API", description = "Wallet session service API")
    )
)]
struct ApiDoc;

/// CORS 预检直接放行
async fn preflight_ok() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn metrics_handler() -> impl IntoResponse {
    crate::metrics::render_prometheus()
}

pub fn routes(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/v1/session", get(get_session))
        .route(
            "/api/v1/session/connect",
            post(connect_session).options(preflight_ok),
        )
        .route(
            "/api/v1/session/disconnect",
            post(disconnect_session).options(preflight_ok),
        )
        .route(
            "/api/v1/chain/switch",
            post(switch_chain).options(preflight_ok),
        )
        .route("/api/v1/chain/add", post(add_chain).options(preflight_ok))
        .route("/api/v1/chains", get(list_chains))
        .route(
            "/api/v1/transfer",
            post(send_transfer).options(preflight_ok),
        )
        .route("/healthz", get(healthz))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(trace_id_middleware))
                .layer(cors),
        )
}
