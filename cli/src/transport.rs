//! Blocking HTTP executor for the core's plain-data requests.

use std::time::Duration;

use fx_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::debug;

/// Runs requests through a shared ureq agent.
///
/// Status codes are never turned into errors here; the core client decides
/// what a 404 or 500 means.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = req.method.as_str(), path = %req.path, "executing request");
        let mut call = match req.method {
            HttpMethod::Get => self.agent.get(&req.path),
        };
        for (name, value) in &req.headers {
            call = call.header(name.as_str(), value.as_str());
        }
        let mut response = call.call().map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use fx_core::RatesClient;

    use super::*;

    fn start_server() -> SocketAddr {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        addr
    }

    #[test]
    fn returns_success_as_data() {
        let addr = start_server();
        let client = RatesClient::new(&format!("http://{addr}"));
        let response = UreqTransport::default().execute(&client.build_list_currencies()).unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.contains("\"EUR\""));
        assert!(response
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value.starts_with("application/json")));
    }

    #[test]
    fn returns_not_found_as_data() {
        let addr = start_server();
        let client = RatesClient::new(&format!("http://{addr}/nope"));
        let response = UreqTransport::default().execute(&client.build_list_currencies()).unwrap();
        assert_eq!(response.status, 404);
    }

    #[test]
    fn connection_refused_is_transport_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = RatesClient::new(&format!("http://{addr}"));
        let err = UreqTransport::default()
            .execute(&client.build_list_currencies())
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
