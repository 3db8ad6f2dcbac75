//! HTTP 错误响应辅助函数
//!
//! 所有错误返回统一的 ApiResponse 格式。

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use oftee_inject::InjectError;

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 注入失败响应
pub fn inject_error(err: InjectError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.INJECT_FAILED", message)),
    )
        .into_response()
}
