//! Prometheus metrics for the HTTP surface.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub method: String,
    /// Route template such as `/api/thread/{slug_or_id}/posts`.
    pub route: String,
    pub status: String,
}

/// Owns the registry; clones of the counters share state with it.
#[derive(Debug)]
pub struct HttpMetrics {
    registry: Registry,
    requests: Family<RequestLabels, Counter>,
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("forum");
        let requests = Family::<RequestLabels, Counter>::default();
        registry.register(
            "http_requests",
            "HTTP requests served, by route and status",
            requests.clone(),
        );
        Self { registry, requests }
    }

    pub fn observe(&self, method: &str, route: &str, status: u16) {
        self.requests
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                route: route.to_string(),
                status: status.to_string(),
            })
            .inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        encode(&mut body, &self.registry)?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_requests_per_route_and_status() {
        let metrics = HttpMetrics::new();
        metrics.observe("GET", "/api/forum/{slug}/details", 200);
        metrics.observe("GET", "/api/forum/{slug}/details", 200);
        metrics.observe("GET", "/api/forum/{slug}/details", 404);

        let body = metrics.render().unwrap();
        assert!(body.contains("forum_http_requests_total"));
        assert!(body.contains(r#"status="200"} 2"#));
        assert!(body.contains(r#"status="404"} 1"#));
        assert!(body.ends_with("# EOF\n"));
    }
}
