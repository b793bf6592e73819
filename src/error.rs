//! 错误类型
//!
//! `SessionError` 是核心的错误分类；`AppError` 是 API 边界的统一错误
//! 响应，二者通过 `From` 映射。校验类错误在本地产生，其余均来自钱包边界。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::provider::{ProviderError, CODE_UNRECOGNIZED_CHAIN, CODE_USER_REJECTED};

/// 会话错误分类
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 未检测到钱包句柄
    #[error("wallet unavailable: {0}")]
    WalletUnavailable(String),
    /// 用户在钱包弹窗中拒绝
    #[error("user rejected wallet request: {0}")]
    UserRejected(String),
    /// 目标链未在钱包中注册，需要先 add_chain
    #[error("chain not registered in wallet: {0}")]
    ChainNotRegistered(String),
    /// 钱包/网络侧通用失败
    #[error("wallet request failed: {0}")]
    RequestFailed(String),
    /// 本地前置校验失败，未接触钱包
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

impl SessionError {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::WalletUnavailable(_) => "wallet_unavailable",
            SessionError::UserRejected(_) => "user_rejected",
            SessionError::ChainNotRegistered(_) => "chain_not_registered",
            SessionError::RequestFailed(_) => "request_failed",
            SessionError::ValidationFailed(_) => "validation_failed",
        }
    }

    /// 通用操作的钱包错误映射（connect / add_chain / 转账）
    pub fn from_provider(err: ProviderError) -> Self {
        if err.code == CODE_USER_REJECTED {
            SessionError::UserRejected(err.message)
        } else {
            SessionError::RequestFailed(err.message)
        }
    }

    /// 链切换的钱包错误映射：额外识别“链未注册”信号
    pub fn from_switch_error(err: ProviderError) -> Self {
        if err.code == CODE_UNRECOGNIZED_CHAIN {
            SessionError::ChainNotRegistered(err.message)
        } else {
            Self::from_provider(err)
        }
    }
}

/// API 错误码
#[derive(Debug, Clone)]
pub enum AppErrorCode {
    BadRequest,
    NotFound,
    Internal,

    // 业务错误码
    WalletUnavailable,
    UserRejected,
    ChainNotRegistered,
    RequestFailed,
    ValidationFailed,
}

/// API 边界统一错误响应
#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
    pub status: StatusCode,
    pub trace_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    trace_id: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code_str = match self.code {
            AppErrorCode::BadRequest => "bad_request",
            AppErrorCode::NotFound => "not_found",
            AppErrorCode::Internal => "internal",

            AppErrorCode::WalletUnavailable => "wallet_unavailable",
            AppErrorCode::UserRejected => "user_rejected",
            AppErrorCode::ChainNotRegistered => "chain_not_registered",
            AppErrorCode::RequestFailed => "request_failed",
            AppErrorCode::ValidationFailed => "validation_failed",
        };
        let body = ErrorBody {
            code: code_str,
            message: &self.message,
            trace_id: self.trace_id.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            code: AppErrorCode::BadRequest,
            message: msg.into(),
            status: StatusCode::BAD_REQUEST,
            trace_id: None,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            code: AppErrorCode::NotFound,
            message: msg.into(),
            status: StatusCode::NOT_FOUND,
            trace_id: None,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            code: AppErrorCode::Internal,
            message: msg.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            trace_id: None,
        }
    }

    /// 设置追踪ID
    pub fn with_trace_id(mut self, trace_id: String) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let (code, status) = match &err {
            SessionError::WalletUnavailable(_) => {
                (AppErrorCode::WalletUnavailable, StatusCode::SERVICE_UNAVAILABLE)
            }
            SessionError::UserRejected(_) => (AppErrorCode::UserRejected, StatusCode::BAD_REQUEST),
            SessionError::ChainNotRegistered(_) => {
                (AppErrorCode::ChainNotRegistered, StatusCode::BAD_REQUEST)
            }
            SessionError::RequestFailed(_) => (AppErrorCode::RequestFailed, StatusCode::BAD_GATEWAY),
            SessionError::ValidationFailed(_) => {
                (AppErrorCode::ValidationFailed, StatusCode::BAD_REQUEST)
            }
        };
        Self {
            code,
            message: err.to_string(),
            status,
            trace_id: None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{}", err))
    }
}
