//! 端点描述解析

use crate::error::TeeError;
use domain::{Criteria, connect_addr, parse_uint};
use reqwest::Url;
use std::fmt;
use tracing::{debug, warn};

pub const SCHEME_TCP: &str = "tcp";
pub const SCHEME_HTTP: &str = "http";
pub const SCHEME_HTTPS: &str = "https";

pub const TERM_ACTION: &str = "action";
pub const TERM_DL_TYPE: &str = "dl_type";

const TERM_SEPARATOR: char = ';';

/// 投递目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// 直接 TCP 连接，`host:port`
    Tcp(String),
    /// 每条报文一次 POST
    Http(Url),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Tcp(addr) => write!(f, "{}://{}", SCHEME_TCP, addr),
            Destination::Http(url) => f.write_str(url.as_str()),
        }
    }
}

/// 一个端点描述：目标 + 匹配规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub destination: Destination,
    pub criteria: Criteria,
}

impl EndpointSpec {
    /// 解析一条描述，空串返回 `Ok(None)`。
    pub fn parse(spec: &str) -> Result<Option<Self>, TeeError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(None);
        }

        let (address, criteria) = if spec.contains(TERM_SEPARATOR) || is_term(spec) {
            parse_terms(spec)?
        } else {
            (spec.to_string(), Criteria::wildcard())
        };

        let destination = resolve_destination(&address)?;
        Ok(Some(Self {
            destination,
            criteria,
        }))
    }

    /// 按顺序解析全部描述，跳过空串。
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>, TeeError> {
        let mut parsed = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Some(spec) = Self::parse(spec.as_ref())? {
                parsed.push(spec);
            }
        }
        Ok(parsed)
    }
}

/// 单段描述是否为 `key=value` 形式（key 仅含字母数字与下划线）。
fn is_term(segment: &str) -> bool {
    match segment.split_once('=') {
        Some((key, _)) => {
            let key = key.trim();
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

fn parse_terms(spec: &str) -> Result<(String, Criteria), TeeError> {
    let mut address = None;
    let mut criteria = Criteria::wildcard();

    for part in spec.split(TERM_SEPARATOR) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| TeeError::MalformedTerm(part.to_string()))?;
        let key = key.trim();
        let value = value.trim();

        match key.to_ascii_lowercase().as_str() {
            TERM_ACTION => address = Some(value.to_string()),
            TERM_DL_TYPE => {
                let dl_type = parse_uint(value, 16).map_err(|err| TeeError::InvalidValue {
                    term: key.to_string(),
                    value: value.to_string(),
                    reason: err.to_string(),
                })?;
                criteria = criteria.and_dl_type(dl_type as u16);
                debug!(term = %key, value = %value, "found condition");
            }
            _ => return Err(TeeError::UnknownTerm(key.to_string())),
        }
    }

    let address = address.ok_or_else(|| {
        TeeError::InvalidAddress(spec.to_string(), format!("missing '{}' term", TERM_ACTION))
    })?;
    Ok((address, criteria))
}

fn resolve_destination(address: &str) -> Result<Destination, TeeError> {
    let Some((scheme, rest)) = address.split_once("://") else {
        return host_port(address).map(Destination::Tcp);
    };

    let invalid = |reason: String| TeeError::InvalidAddress(address.to_string(), reason);
    match scheme.to_ascii_lowercase().as_str() {
        SCHEME_TCP => {
            let url = Url::parse(address).map_err(|err| invalid(err.to_string()))?;
            let host = url
                .host_str()
                .filter(|host| !host.is_empty())
                .ok_or_else(|| invalid("missing host".to_string()))?;
            let port = url.port().ok_or_else(|| invalid("missing port".to_string()))?;
            Ok(Destination::Tcp(format!("{}:{}", host, port)))
        }
        SCHEME_HTTP | SCHEME_HTTPS => {
            let url = Url::parse(address).map_err(|err| invalid(err.to_string()))?;
            if url.host_str().is_none() {
                return Err(invalid("missing host".to_string()));
            }
            Ok(Destination::Http(url))
        }
        other => {
            warn!(
                scheme = %other,
                connection = %address,
                "unsupported end point scheme, treating as host:port"
            );
            host_port(rest.trim_end_matches('/')).map(Destination::Tcp)
        }
    }
}

/// 校验 `host:port`，省略主机时连接本机。
fn host_port(address: &str) -> Result<String, TeeError> {
    let address = address.trim();
    let invalid = |reason: &str| TeeError::InvalidAddress(address.to_string(), reason.to_string());
    let (_, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;
    port.parse::<u16>().map_err(|_| invalid("invalid port"))?;
    Ok(connect_addr(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_detection() {
        assert!(is_term("action=tcp://h:1"));
        assert!(is_term("foo=bar"));
        assert!(!is_term("http://h/path?x=1"));
        assert!(!is_term("h:1"));
    }

    #[test]
    fn host_port_requires_numeric_port() {
        assert_eq!(host_port("h:1").unwrap(), "h:1");
        assert_eq!(host_port(":8002").unwrap(), "127.0.0.1:8002");
        assert!(host_port("h").is_err());
        assert!(host_port("h:port").is_err());
    }

    #[test]
    fn unknown_scheme_falls_back_to_host_port() {
        assert_eq!(
            resolve_destination("kafka://broker:9092").unwrap(),
            Destination::Tcp("broker:9092".to_string())
        );
    }
}
