//! 会话 API 处理器
//!
//! 处理器只做参数整形和错误映射；状态机与钱包交互全部在
//! `service::wallet_session` 中完成。

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::response::{success_response, success_response_with_message, ApiResponse},
    app_state::AppState,
    domain::{ChainDescriptor, TransferReceipt, TransferRequest},
    error::AppError,
    service::wallet_session::SessionSnapshot,
    utils::chain_registry,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub wallet_detected: bool,
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn healthz(State(st): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        wallet_detected: st.session.wallet_detected(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session snapshot", body = SessionSnapshot)
    )
)]
pub async fn get_session(
    State(st): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    success_response(st.session.snapshot())
}

#[utoipa::path(
    post,
    path = "/api/v1/session/connect",
    responses(
        (status = 200, description = "Session connected", body = SessionSnapshot),
        (status = 400, description = "User rejected or another operation in flight", body = crate::error_body::ErrorBodyDoc),
        (status = 503, description = "No wallet detected", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn connect_session(
    State(st): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let snapshot = st.session.connect().await?;
    success_response(snapshot)
}

#[utoipa::path(
    post,
    path = "/api/v1/session/disconnect",
    responses(
        (status = 200, description = "Local session cleared", body = SessionSnapshot)
    )
)]
pub async fn disconnect_session(
    State(st): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    success_response_with_message(
        st.session.disconnect(),
        "local session cleared; wallet-side grants are untouched".to_string(),
    )
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchChainReq {
    /// 目标链ID（0x 十六进制或十进制）
    pub chain: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChainOpData {
    pub chain_id: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/chain/switch",
    request_body = SwitchChainReq,
    responses(
        (status = 200, description = "Chain switch requested", body = ChainOpData),
        (status = 400, description = "Chain not registered or invalid request", body = crate::error_body::ErrorBodyDoc),
        (status = 502, description = "Wallet request failed", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn switch_chain(
    State(st): State<Arc<AppState>>,
    Json(req): Json<SwitchChainReq>,
) -> Result<Json<ApiResponse<ChainOpData>>, AppError> {
    if req.chain.trim().is_empty() {
        return Err(AppError::bad_request("chain is required"));
    }

    let chain_id = st.session.switch_chain(&req.chain).await?;
    success_response_with_message(
        ChainOpData { chain_id },
        "chain switch requested; session updates on the wallet's chain event".to_string(),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/chain/add",
    request_body = ChainDescriptor,
    responses(
        (status = 200, description = "Chain registered", body = ChainOpData),
        (status = 400, description = "Invalid descriptor", body = crate::error_body::ErrorBodyDoc),
        (status = 502, description = "Wallet request failed", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn add_chain(
    State(st): State<Arc<AppState>>,
    Json(descriptor): Json<ChainDescriptor>,
) -> Result<Json<ApiResponse<ChainOpData>>, AppError> {
    let chain_id = st.session.add_chain(&descriptor).await?;
    success_response(ChainOpData { chain_id })
}

#[utoipa::path(
    post,
    path = "/api/v1/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer confirmed on-chain", body = TransferReceipt),
        (status = 400, description = "Validation failed before contacting the wallet", body = crate::error_body::ErrorBodyDoc),
        (status = 502, description = "Wallet or network failure", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn send_transfer(
    State(st): State<Arc<AppState>>,
    Extension(trace_id): Extension<String>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ApiResponse<TransferReceipt>>, AppError> {
    let receipt = st
        .session
        .send(&req)
        .await
        .map_err(|e| AppError::from(e).with_trace_id(trace_id.clone()))?;

    success_response(receipt)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KnownChainData {
    pub chain_id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub rpc_url: String,
    pub explorer_url: String,
    pub is_testnet: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListChainsResp {
    pub chains: Vec<KnownChainData>,
}

#[utoipa::path(
    get,
    path = "/api/v1/chains",
    responses(
        (status = 200, description = "Known chain registry", body = ListChainsResp)
    )
)]
pub async fn list_chains() -> Result<Json<ApiResponse<ListChainsResp>>, AppError> {
    let chains = chain_registry::all()
        .iter()
        .map(|c| KnownChainData {
            chain_id: c.chain_id.to_string(),
            name: c.name.to_string(),
            symbol: c.symbol.to_string(),
            decimals: c.decimals,
            rpc_url: c.rpc_url.to_string(),
            explorer_url: c.explorer_url.to_string(),
            is_testnet: c.is_testnet,
        })
        .collect();

    success_response(ListChainsResp { chains })
}
