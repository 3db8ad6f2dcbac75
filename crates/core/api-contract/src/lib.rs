//! 管理 API 的 DTO 与响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装（用于错误与指标等非设备列表接口）。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 已知设备列表（`GET /oftee`）。
///
/// 每个元素为 `of:0x%016x` 格式的 DPID。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<String>,
}

/// 计数器快照（`GET /metrics`）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub accept_errors: u64,
    pub messages_forwarded: u64,
    pub packet_ins: u64,
    pub link_type_decode_failures: u64,
    pub tee_write_success: u64,
    pub tee_write_failure: u64,
    pub messages_injected: u64,
}
