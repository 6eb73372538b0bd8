use crate::trigger::Trigger;
use log::info;
use prometheus::Encoder;
use rouille::proxy;
use rouille::{Request, Response};
use std::sync::Arc;

const VARZ_PATH: &str = "/varz";

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("upstream {upstream}: {reason}")]
    Upstream { upstream: String, reason: String },
    #[error("could not encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl From<GatewayError> for Response {
    fn from(e: GatewayError) -> Self {
        let status = match e {
            GatewayError::Upstream { .. } => 502,
            GatewayError::Metrics(_) => 500,
        };
        Response::text(e.to_string()).with_status_code(status)
    }
}

/// Fires the trigger for each request, then hands the request on. The
/// response never depends on what the trigger did.
pub struct Gateway {
    trigger: Arc<dyn Trigger + Send + Sync>,
    upstream: Option<String>,
}

impl Gateway {
    pub fn new(trigger: Arc<dyn Trigger + Send + Sync>, upstream: Option<String>) -> Self {
        Self { trigger, upstream }
    }

    pub fn handle(&self, req: &Request) -> Response {
        let resp = self.route(req).unwrap_or_else(Response::from);
        info!(
            "{request} {status}",
            request = req.raw_url(),
            status = resp.status_code,
        );
        resp
    }

    fn route(&self, req: &Request) -> Result<Response, GatewayError> {
        if req.method() == "GET" && req.url() == VARZ_PATH {
            return varz();
        }
        self.trigger.fire();
        match &self.upstream {
            Some(upstream) => forward(req, upstream),
            None => Ok(Response::text("wake packet sent\n").with_status_code(202)),
        }
    }
}

fn forward(req: &Request, upstream: &str) -> Result<Response, GatewayError> {
    let config = proxy::ProxyConfig {
        addr: upstream,
        replace_host: Some(upstream.to_string().into()),
    };
    proxy::proxy(req, config).map_err(|e| GatewayError::Upstream {
        upstream: upstream.to_string(),
        reason: match e {
            proxy::ProxyError::IoError(err) => err.to_string(),
            other => format!("{:?}", other),
        },
    })
}

fn varz() -> Result<Response, GatewayError> {
    let metrics = prometheus::gather();
    let encoder = prometheus::TextEncoder::new();
    let body = encoder.encode_to_string(&metrics)?;
    Ok(Response::from_data(encoder.format_type().to_string(), body))
}

/// Serves until the process is killed.
pub fn serve(
    http_addr: &str,
    gateway: Gateway,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let server = rouille::Server::new(http_addr, move |req| gateway.handle(req))?;
    info!("listening on {}", server.server_addr());
    server.run();
    Ok(())
}
