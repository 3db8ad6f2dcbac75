//! oftee 启动入口：读取配置、初始化日志、启动代理与管理 API。

mod handlers;
mod routes;
mod utils;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use oftee_config::{AppConfig, ConfigError, usage};
use oftee_inject::InjectorRegistry;
use oftee_proxy::{ProxyConfig, ProxyServer};
use oftee_telemetry::{init_tracing, new_request_ids};
use tracing::{Instrument, error, info};

/// 映射更新事件通道容量
const MAPPING_CHANNEL_CAPACITY: usize = 64;

/// 配置加载失败时使用的日志级别
const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Clone)]
pub struct AppState {
    pub registry: InjectorRegistry,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = load_config()?;

    // 不接受命令行参数，-h/--help 或任何参数都只打印用法
    if config.show_help || std::env::args().len() > 1 {
        println!("{}", usage());
        return Ok(());
    }

    init_tracing(&config.log_level);

    let (registry, mappings, _) = InjectorRegistry::spawn(MAPPING_CHANNEL_CAPACITY);
    let proxy_config = ProxyConfig {
        listen_on: config.listen_on.clone(),
        proxy_to: config.proxy_to.clone(),
        tee_to: config.tee_to.clone(),
        share_connections: config.share_connections,
    };
    let server = ProxyServer::new(proxy_config, Some(mappings))
        .await
        .inspect_err(|err| error!(error = %err, "unable to create outbound end points"))?;

    if let Some(api_on) = config.api_on.as_deref() {
        let addr = domain::listen_addr(api_on);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .inspect_err(|err| error!(api_on = %addr, error = %err, "unable to bind admin api"))?;
        info!(api_on = %addr, "admin api listening");
        let app = routes::create_router(AppState { registry });
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                error!(error = %err, "admin api stopped");
            }
        });
    }

    server
        .run()
        .await
        .inspect_err(|err| error!(error = %err, "proxy stopped"))?;
    Ok(())
}

/// 加载配置。失败时日志尚未按配置初始化，先用环境中的级别（或默认级别）初始化再记录错误。
fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env().inspect_err(|err| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        init_tracing(&level);
        error!(error = %err, "unable to load configuration");
    })
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_environment_is_reported_as_config_error() {
        // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
        unsafe {
            std::env::set_var("SHARE_CONNECTIONS", "sometimes");
        }
        let err = load_config().unwrap_err();
        unsafe {
            std::env::remove_var("SHARE_CONNECTIONS");
        }
        assert!(matches!(err, ConfigError::Invalid(key, _) if key == "SHARE_CONNECTIONS"));
    }
}
