//! 计数器快照
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use oftee_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            sessions_opened: snapshot.sessions_opened,
            sessions_closed: snapshot.sessions_closed,
            accept_errors: snapshot.accept_errors,
            messages_forwarded: snapshot.messages_forwarded,
            packet_ins: snapshot.packet_ins,
            link_type_decode_failures: snapshot.link_type_decode_failures,
            tee_write_success: snapshot.tee_write_success,
            tee_write_failure: snapshot.tee_write_failure,
            messages_injected: snapshot.messages_injected,
        })),
    )
        .into_response()
}
