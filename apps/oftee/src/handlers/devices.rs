//! 已连接设备列表
//!
//! - GET /oftee

use crate::AppState;
use api_contract::DevicesResponse;
use axum::{Json, extract::State};
use domain::format_dpid;

/// 列出已完成 Features 交换的设备 DPID，升序。
pub async fn list_devices(State(state): State<AppState>) -> Json<DevicesResponse> {
    let devices = state
        .registry
        .devices()
        .into_iter()
        .map(format_dpid)
        .collect();
    Json(DevicesResponse { devices })
}
