use std::time::Duration;
use tracing::debug;
use ureq::{Agent, AgentBuilder};

/// Every transport error reaching a program starts with this.
pub const ERROR_PREFIX: &str = "HTTP Error: ";

/// The blocking HTTP client behind `request::` / `http::`. Errors are plain
/// text; the interpreter turns them into `HTTP Error: ...` strings.
pub trait HttpTransport {
    fn request(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        headers: &[&str],
    ) -> Result<String, String>;
}

pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        UreqTransport::new()
    }
}

impl UreqTransport {
    pub fn new() -> UreqTransport {
        UreqTransport {
            agent: AgentBuilder::new()
                .timeout_connect(Duration::from_secs(30))
                .build(),
        }
    }
}

impl HttpTransport for UreqTransport {
    fn request(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        headers: &[&str],
    ) -> Result<String, String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("Unsupported URL '{}': expected http:// or https://", url));
        }
        debug!(method, url, has_body = body.is_some(), "http request");

        let mut request = self.agent.request(method, url);
        for header in headers {
            if let Some((name, value)) = header.split_once(':') {
                request = request.set(name.trim(), value.trim());
            }
        }
        let result = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };
        match result {
            Ok(response) => response.into_string().map_err(|e| e.to_string()),
            // Error statuses still carry a body worth returning.
            Err(ureq::Error::Status(code, response)) => {
                debug!(code, "http error status");
                response.into_string().map_err(|e| e.to_string())
            }
            Err(ureq::Error::Transport(transport)) => Err(transport.to_string()),
        }
    }
}
