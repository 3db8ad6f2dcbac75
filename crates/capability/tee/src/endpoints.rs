//! 端点列表与条件分发

use crate::error::TeeError;
use crate::spec::{Destination, EndpointSpec};
use crate::transport::{HttpTransport, TcpTransport, Transport};
use domain::Criteria;
use oftee_telemetry::{record_tee_write_failure, record_tee_write_success};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 一个 tee 端点：规则 + 已建立的传输
#[derive(Clone)]
pub struct Endpoint {
    spec: EndpointSpec,
    transport: Arc<dyn Transport>,
}

impl Endpoint {
    pub fn new(spec: EndpointSpec, transport: Arc<dyn Transport>) -> Self {
        Self { spec, transport }
    }

    /// 按描述建立传输。TCP 目标在此处连接，HTTP 目标无需预先连接。
    pub async fn connect(spec: EndpointSpec, client: &reqwest::Client) -> Result<Self, TeeError> {
        let transport: Arc<dyn Transport> = match &spec.destination {
            Destination::Tcp(addr) => Arc::new(TcpTransport::connect(addr).await?),
            Destination::Http(url) => Arc::new(HttpTransport::with_client(url.clone(), client.clone())),
        };
        Ok(Self::new(spec, transport))
    }

    pub fn criteria(&self) -> &Criteria {
        &self.spec.criteria
    }

    pub fn destination(&self) -> &Destination {
        &self.spec.destination
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("destination", &self.spec.destination)
            .field("criteria", &self.spec.criteria)
            .finish()
    }
}

/// 单次分发结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// 规则匹配的端点数
    pub matched: usize,
    /// 其中写入失败的端点数
    pub failed: usize,
}

/// 有序端点列表，构造后只读。
///
/// 注册顺序即分发顺序。
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    endpoints: Vec<Endpoint>,
}

impl Endpoints {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// 解析并连接全部端点描述，任一失败即整体失败。
    pub async fn establish<S: AsRef<str>>(specs: &[S]) -> Result<Self, TeeError> {
        let parsed = EndpointSpec::parse_all(specs).inspect_err(|err| {
            error!(error = %err, "unable to parse end point specification");
        })?;

        let client = reqwest::Client::new();
        let mut endpoints = Vec::with_capacity(parsed.len());
        for spec in parsed {
            let destination = spec.destination.to_string();
            let endpoint = Endpoint::connect(spec, &client).await.inspect_err(|err| {
                error!(
                    connection = %destination,
                    error = %err,
                    "unable to connect to outbound end point"
                );
            })?;
            info!(
                connection = %destination,
                criteria = %endpoint.criteria(),
                "created outbound end point connection"
            );
            endpoints.push(endpoint);
        }
        Ok(Self::new(endpoints))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    /// 把报文写入所有规则匹配 `state` 的端点。
    ///
    /// 按注册顺序逐个写入；单个端点失败只记录日志，继续写后续端点。
    pub async fn conditional_write(&self, message: &[u8], state: &Criteria) -> Delivery {
        let mut delivery = Delivery::default();
        for endpoint in &self.endpoints {
            if !endpoint.criteria().matches(state) {
                continue;
            }
            delivery.matched += 1;
            match endpoint.transport.write(message).await {
                Ok(()) => {
                    record_tee_write_success();
                    debug!(
                        endpoint = %endpoint.destination(),
                        length = message.len(),
                        "tee delivered"
                    );
                }
                Err(err) => {
                    delivery.failed += 1;
                    record_tee_write_failure();
                    warn!(
                        endpoint = %endpoint.destination(),
                        error = %err,
                        "tee write failed"
                    );
                }
            }
        }
        delivery
    }
}
