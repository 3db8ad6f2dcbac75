//! 路由定义
//!
//! - 健康检查：/health
//! - 设备列表：GET /oftee
//! - 报文注入：POST /oftee/:dpid
//! - 计数器：GET /metrics

use super::AppState;
use super::handlers::*;
use super::request_context;
use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 创建管理 API 路由，带请求追踪中间件。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/oftee", get(list_devices))
        .route("/oftee/:dpid", post(packet_out))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_context)),
        )
}
