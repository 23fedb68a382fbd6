//! HTTP client store backed by `datebook-server`.

use std::time::Duration;

use reqwest::StatusCode;

use crate::appointment::{Appointment, AppointmentId, NewAppointment};
use crate::date::YearMonth;
use crate::error::{DatebookError, DatebookResult};
use crate::store::protocol::{
    ApiRequest, CreateAppointment, DeleteAppointment, ErrorResponse, HealthCheck, HealthStatus,
    ListAppointments,
};
use crate::store::{AppointmentStore, ApplyMode};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote-persisted store.
///
/// Every request is bounded by the client timeout; a timeout surfaces as a
/// `Store` error like any other transport failure.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> DatebookResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DatebookError::Store(format!("Failed to build HTTP client: {e}")))?;

        Ok(RemoteStore {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/health
    pub async fn health(&self) -> DatebookResult<HealthStatus> {
        self.call(HealthCheck).await
    }

    /// Send a typed request and decode its typed response.
    ///
    /// 400 maps to `Validation` and 404 to `NotFound`, carrying the server's
    /// message; every other failure is a `Store` error.
    async fn call<R: ApiRequest>(&self, request: R) -> DatebookResult<R::Response> {
        let url = format!("{}{}", self.base_url, request.path());
        let method = request.method();

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
            DatebookError::Store(format!("Failed to reach {}: {e}", self.base_url))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorResponse>().await {
                Ok(err) => err.error,
                Err(_) => status.to_string(),
            };
            tracing::debug!(%method, %url, %status, %message, "server rejected request");
            return Err(match status {
                StatusCode::BAD_REQUEST => DatebookError::Validation(message),
                StatusCode::NOT_FOUND => DatebookError::NotFound(message),
                _ => DatebookError::Store(format!("Server returned {status}: {message}")),
            });
        }

        resp.json::<R::Response>()
            .await
            .map_err(|e| DatebookError::Serialization(format!("Unexpected response from {url}: {e}")))
    }
}

impl AppointmentStore for RemoteStore {
    fn apply_mode(&self) -> ApplyMode {
        ApplyMode::ConfirmThenApply
    }

    async fn create(&self, request: NewAppointment) -> DatebookResult<Appointment> {
        // Reject bad input without a round trip; the server checks again.
        request.validate()?;
        self.call(CreateAppointment(request))
            .await
            .map_err(unexpected_not_found)
    }

    async fn list(&self, month: YearMonth) -> DatebookResult<Vec<Appointment>> {
        self.call(ListAppointments { month })
            .await
            .map_err(unexpected_not_found)
    }

    async fn delete(&self, id: &AppointmentId) -> DatebookResult<()> {
        match self.call(DeleteAppointment { id: id.clone() }).await {
            Ok(_) => Ok(()),
            Err(DatebookError::NotFound(_)) => Err(DatebookError::NotFound(id.to_string())),
            Err(e) => Err(e),
        }
    }
}

/// A 404 outside of delete means the server does not serve the route.
fn unexpected_not_found(err: DatebookError) -> DatebookError {
    match err {
        DatebookError::NotFound(message) => {
            DatebookError::Store(format!("Server has no such endpoint: {message}"))
        }
        other => other,
    }
}
