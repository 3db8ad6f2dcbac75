//! 报文注入
//!
//! - POST /oftee/{dpid}：请求体原样写入该设备的连接
//!
//! 只接受 `Content-Type: application/octet-stream`，其余一律按未匹配路由处理（404）。
//! DPID 接受可选的 `of:` 前缀和任意进制的整数写法。

use crate::AppState;
use crate::utils::response::{inject_error, not_found_error};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::{format_dpid, parse_dpid};
use tracing::{debug, warn};

pub const OCTET_STREAM: &str = "application/octet-stream";

pub async fn packet_out(
    State(state): State<AppState>,
    Path(dpid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_octet_stream(&headers) {
        return not_found_error();
    }
    let Ok(dpid) = parse_dpid(&dpid) else {
        debug!(dpid = %dpid, "rejecting malformed dpid");
        return not_found_error();
    };
    let Some(injector) = state.registry.lookup(dpid) else {
        debug!(dpid = %format_dpid(dpid), "no device for dpid");
        return not_found_error();
    };

    match injector.inject(&body).await {
        Ok(()) => {
            debug!(dpid = %format_dpid(dpid), length = body.len(), "injected message");
            StatusCode::OK.into_response()
        }
        Err(err) => {
            warn!(dpid = %format_dpid(dpid), error = %err, "unable to inject message");
            inject_error(err)
        }
    }
}

fn is_octet_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(OCTET_STREAM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn content_type_must_be_octet_stream() {
        let mut headers = HeaderMap::new();
        assert!(!is_octet_stream(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_octet_stream(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
        assert!(is_octet_stream(&headers));
    }
}
