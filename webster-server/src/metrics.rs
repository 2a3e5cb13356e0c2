//! Prometheus metrics for webster-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// Metric names as constants for consistency
const CANVAS_SAVES_TOTAL: &str = "webster_canvas_saves_total";
const UPLOADS_TOTAL: &str = "webster_uploads_total";
const VALIDATION_FAILURES_TOTAL: &str = "webster_validation_failures_total";
const AUTH_LOGINS_TOTAL: &str = "webster_auth_logins_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a canvas document create or update.
pub fn record_canvas_save(operation: &str) {
    counter!(CANVAS_SAVES_TOTAL, "operation" => operation.to_string()).increment(1);
}

/// Record a completed upload.
///
/// # Arguments
///
/// * `category` - Upload category ("marca-logo", "background", ...)
pub fn record_upload(category: &str) {
    counter!(UPLOADS_TOTAL, "category" => category.to_string()).increment(1);
}

/// Record a rejected request payload.
pub fn record_validation_failure() {
    counter!(VALIDATION_FAILURES_TOTAL).increment(1);
}

/// Record a successful login.
pub fn record_login() {
    counter!(AUTH_LOGINS_TOTAL).increment(1);
}
