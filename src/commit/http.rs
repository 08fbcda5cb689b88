use super::{CommitError, CommitGateway, CommitReceipt, CommitRequest};
use serde_json::Value;
use std::time::Duration;
use ureq::config::Config;
use ureq::Agent;

const DONATIONS_PATH: &str = "donations";

/// Posts the request as JSON to `{base}/donations`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    agent: Agent,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(api_base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::new_with_config(
            Config::builder()
                .timeout_global(Some(timeout))
                .http_status_as_error(false)
                .user_agent(concat!("donate/", env!("CARGO_PKG_VERSION")))
                .build(),
        );
        Self {
            agent,
            endpoint: donations_endpoint(api_base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CommitGateway for HttpGateway {
    fn commit(&mut self, request: &CommitRequest) -> Result<CommitReceipt, CommitError> {
        tracing::debug!(endpoint = self.endpoint(), "posting donation");
        let mut response = self
            .agent
            .post(self.endpoint())
            .send_json(request)
            .map_err(|err| CommitError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| CommitError::Transport(err.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(CommitError::Rejected {
                status,
                body: body.trim().to_string(),
            });
        }
        parse_receipt(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn donations_endpoint(api_base_url: &str) -> String {
    format!("{}/{DONATIONS_PATH}", api_base_url.trim_end_matches('/'))
}

/// Read a receipt from a 2xx body.
///
/// Accepts an empty body, a bare donation object, or one wrapped in
/// `donation`/`data`. Ids may be `_id` or `id`.
fn parse_receipt(body: &str) -> Result<CommitReceipt, CommitError> {
    if body.trim().is_empty() {
        return Ok(CommitReceipt::default());
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|err| CommitError::InvalidResponse(format!("body is not JSON: {err}")))?;
    let Value::Object(root) = &value else {
        return Err(CommitError::InvalidResponse(
            "expected a JSON object".to_string(),
        ));
    };
    let record = ["donation", "data"]
        .iter()
        .find_map(|key| root.get(*key).filter(|inner| inner.is_object()))
        .unwrap_or(&value);
    let text = |key: &str| match record.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(CommitReceipt {
        donation_id: text("_id").or_else(|| text("id")),
        status: text("status").or_else(|| match root.get("status") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }),
    })
}
