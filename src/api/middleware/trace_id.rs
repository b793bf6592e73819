//! Trace ID 中间件
//! 为每个请求生成唯一的 trace_id，用于全链路追踪

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// 从请求头中提取 trace_id，如果没有则生成新的
fn get_or_generate(req: &Request) -> String {
    if let Some(header) = req.headers().get("X-Trace-Id") {
        if let Ok(trace_id) = header.to_str() {
            if !trace_id.is_empty() {
                return trace_id.to_string();
            }
        }
    }
    Uuid::new_v4().to_string()
}

/// Trace ID 中间件
/// trace_id 写入请求扩展供处理器取用，并回写到响应头
pub async fn trace_id_middleware(mut req: Request, next: Next) -> Response {
    let trace_id = get_or_generate(&req);

    req.extensions_mut().insert(trace_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert("X-Trace-Id", header_value);
    }

    response
}
