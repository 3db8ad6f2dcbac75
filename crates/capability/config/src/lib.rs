//! 应用运行配置加载。
//!
//! 所有配置均来自环境变量（可由 `.env` 预先加载），不接受命令行参数。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 环境变量说明（用于 usage 输出）。
struct EnvSpec {
    key: &'static str,
    default: &'static str,
    required: bool,
    desc: &'static str,
}

const ENV_SPECS: &[EnvSpec] = &[
    EnvSpec {
        key: "HELP",
        default: "false",
        required: false,
        desc: "show this message",
    },
    EnvSpec {
        key: "LISTEN_ON",
        default: ":8000",
        required: true,
        desc: "connection on which to listen for an open flow device",
    },
    EnvSpec {
        key: "PROXY_TO",
        default: ":8001",
        required: true,
        desc: "connection on which to attach to an SDN controller",
    },
    EnvSpec {
        key: "TEE_TO",
        default: ":8002",
        required: false,
        desc: "list of connections on which tee packet in messages",
    },
    EnvSpec {
        key: "LOG_LEVEL",
        default: "debug",
        required: false,
        desc: "logging level",
    },
    EnvSpec {
        key: "SHARE_CONNECTIONS",
        default: "true",
        required: false,
        desc: "use shared connections to outbound end points",
    },
    EnvSpec {
        key: "API_ON",
        default: ":8080",
        required: false,
        desc: "connection on which to serve the admin API, empty to disable",
    },
];

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub show_help: bool,
    /// 设备侧监听地址
    pub listen_on: String,
    /// 控制器地址
    pub proxy_to: String,
    /// tee 端点描述，按注册顺序
    pub tee_to: Vec<String>,
    pub log_level: String,
    /// true：进程级共享端点连接；false：每个设备连接独立建立
    pub share_connections: bool,
    /// 管理 API 监听地址，None 表示关闭
    pub api_on: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let show_help = read_bool_with_default("HELP", false)?;
        let listen_on = read_required_with_default("LISTEN_ON", ":8000")?;
        let proxy_to = read_required_with_default("PROXY_TO", ":8001")?;
        let tee_to = read_list_with_default("TEE_TO", ":8002");
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let share_connections = read_bool_with_default("SHARE_CONNECTIONS", true)?;
        let api_on = match env::var("API_ON") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value.trim().to_string()),
            Err(_) => Some(":8080".to_string()),
        };

        Ok(Self {
            show_help,
            listen_on,
            proxy_to,
            tee_to,
            log_level,
            share_connections,
            api_on,
        })
    }
}

/// 生成环境变量说明表。
pub fn usage() -> String {
    let mut out = String::from(
        "This application is configured via the environment. The following environment\n\
         variables can be specified:\n\n",
    );
    out.push_str(&format!(
        "{:<20} {:<32} {:<10} {:<10} {}\n",
        "KEY", "TYPE", "DEFAULT", "REQUIRED", "DESCRIPTION"
    ));
    for spec in ENV_SPECS {
        let kind = match spec.key {
            "HELP" | "SHARE_CONNECTIONS" => "True or False",
            "TEE_TO" => "Comma-separated list of String",
            _ => "String",
        };
        out.push_str(&format!(
            "{:<20} {:<32} {:<10} {:<10} {}\n",
            spec.key,
            kind,
            spec.default,
            if spec.required { "true" } else { "" },
            spec.desc
        ));
    }
    out
}

/// 读取必填项，缺省时使用默认值，但不允许显式设置为空。
fn read_required_with_default(key: &str, default: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Missing(key.to_string())),
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

/// 读取逗号分隔列表，保留空项以便上层按位置跳过。
fn read_list_with_default(key: &str, default: &str) -> Vec<String> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}

fn read_bool_with_default(key: &str, default: bool) -> Result<bool, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}
