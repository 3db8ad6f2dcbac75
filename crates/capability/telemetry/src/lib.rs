//! 日志初始化、请求 ID 生成与进程级计数器。

use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

/// 级别无法解析时使用的默认级别。
const FALLBACK_LEVEL: &str = "warn";

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 进程级计数器。
pub struct TelemetryMetrics {
    sessions_opened: AtomicU64,
    sessions_closed: AtomicU64,
    accept_errors: AtomicU64,
    messages_forwarded: AtomicU64,
    packet_ins: AtomicU64,
    link_type_decode_failures: AtomicU64,
    tee_write_success: AtomicU64,
    tee_write_failure: AtomicU64,
    messages_injected: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            sessions_opened: AtomicU64::new(0),
            sessions_closed: AtomicU64::new(0),
            accept_errors: AtomicU64::new(0),
            messages_forwarded: AtomicU64::new(0),
            packet_ins: AtomicU64::new(0),
            link_type_decode_failures: AtomicU64::new(0),
            tee_write_success: AtomicU64::new(0),
            tee_write_failure: AtomicU64::new(0),
            messages_injected: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_opened: self.sessions_opened.load(Ordering::Relaxed),
            sessions_closed: self.sessions_closed.load(Ordering::Relaxed),
            accept_errors: self.accept_errors.load(Ordering::Relaxed),
            messages_forwarded: self.messages_forwarded.load(Ordering::Relaxed),
            packet_ins: self.packet_ins.load(Ordering::Relaxed),
            link_type_decode_failures: self.link_type_decode_failures.load(Ordering::Relaxed),
            tee_write_success: self.tee_write_success.load(Ordering::Relaxed),
            tee_write_failure: self.tee_write_failure.load(Ordering::Relaxed),
            messages_injected: self.messages_injected.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing。
///
/// `RUST_LOG` 存在时优先；否则使用 `level`，无法解析时退回 warn。
pub fn init_tracing(level: &str) {
    let (filter, rejected) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => match normalize_level(level) {
            Some(level) => (EnvFilter::new(level), None),
            None => (EnvFilter::new(FALLBACK_LEVEL), Some(level.to_string())),
        },
    };
    let _ = fmt().with_env_filter(filter).try_init();

    if let Some(level) = rejected {
        tracing::warn!(
            level = %level,
            "unable to parse log level specified, defaulting to '{}'",
            FALLBACK_LEVEL
        );
    }
}

/// 规整日志级别名称，兼容 `warning`、`fatal`、`panic` 等写法。
pub fn normalize_level(level: &str) -> Option<String> {
    let lower = level.trim().to_ascii_lowercase();
    let mapped = match lower.as_str() {
        "warning" => "warn",
        "fatal" | "panic" => "error",
        other => other,
    };
    LevelFilter::from_str(mapped)
        .ok()
        .map(|filter| filter.to_string().to_ascii_lowercase())
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录建立的设备会话。
pub fn record_session_opened() {
    metrics().sessions_opened.fetch_add(1, Ordering::Relaxed);
}

/// 记录结束的设备会话。
pub fn record_session_closed() {
    metrics().sessions_closed.fetch_add(1, Ordering::Relaxed);
}

pub fn record_accept_error() {
    metrics().accept_errors.fetch_add(1, Ordering::Relaxed);
}

/// 记录转发到控制器的报文数。
pub fn record_message_forwarded() {
    metrics().messages_forwarded.fetch_add(1, Ordering::Relaxed);
}

pub fn record_packet_in() {
    metrics().packet_ins.fetch_add(1, Ordering::Relaxed);
}

/// 记录内嵌帧无法解析链路类型的次数。
pub fn record_link_type_decode_failure() {
    metrics()
        .link_type_decode_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录 tee 写入成功次数。
pub fn record_tee_write_success() {
    metrics().tee_write_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录 tee 写入失败次数。
pub fn record_tee_write_failure() {
    metrics().tee_write_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录经管理 API 注入的报文数。
pub fn record_message_injected() {
    metrics().messages_injected.fetch_add(1, Ordering::Relaxed);
}
