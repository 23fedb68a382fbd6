//! The JSON-over-HTTP protocol spoken between [`RemoteStore`] and
//! `datebook-server`.
//!
//! Every request type names its HTTP method, its path and the type the
//! server answers with, so the client can decode responses without
//! per-endpoint plumbing.
//!
//! [`RemoteStore`]: super::remote::RemoteStore

use reqwest::Method;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::appointment::{Appointment, AppointmentId, NewAppointment};
use crate::date::YearMonth;

pub const APPOINTMENTS_PATH: &str = "/api/appointments";
pub const HEALTH_PATH: &str = "/api/health";

pub trait ApiRequest {
    type Body: Serialize;
    type Response: DeserializeOwned;

    fn method(&self) -> Method;
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

/// Error body returned with every non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /api/appointments`
#[derive(Debug)]
pub struct CreateAppointment(pub NewAppointment);

impl ApiRequest for CreateAppointment {
    type Body = NewAppointment;
    type Response = Appointment;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        APPOINTMENTS_PATH.to_string()
    }

    fn body(&self) -> Option<&NewAppointment> {
        Some(&self.0)
    }
}

/// `GET /api/appointments/{month}/{year}`, month 1-based.
#[derive(Debug)]
pub struct ListAppointments {
    pub month: YearMonth,
}

impl ApiRequest for ListAppointments {
    type Body = ();
    type Response = Vec<Appointment>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        format!(
            "{}/{}/{}",
            APPOINTMENTS_PATH,
            self.month.month(),
            self.month.year()
        )
    }
}

/// `DELETE /api/appointments/{id}`
#[derive(Debug)]
pub struct DeleteAppointment {
    pub id: AppointmentId,
}

/// Confirmation of a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub id: AppointmentId,
}

impl ApiRequest for DeleteAppointment {
    type Body = ();
    type Response = Deleted;

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> String {
        // Ids are free text; keep them to a single path segment
        format!(
            "{}/{}",
            APPOINTMENTS_PATH,
            urlencoding::encode(self.id.as_str())
        )
    }
}

/// `GET /api/health`
#[derive(Debug)]
pub struct HealthCheck;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// RFC 3339
    pub timestamp: String,
}

impl ApiRequest for HealthCheck {
    type Body = ();
    type Response = HealthStatus;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        HEALTH_PATH.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_uses_one_based_month() {
        let request = ListAppointments {
            month: YearMonth::new(2025, 0).unwrap(),
        };
        assert_eq!(request.path(), "/api/appointments/1/2025");
        assert_eq!(request.method(), Method::GET);
        assert!(request.body().is_none());
    }

    #[test]
    fn delete_path_carries_id() {
        let request = DeleteAppointment {
            id: AppointmentId::new("42"),
        };
        assert_eq!(request.path(), "/api/appointments/42");
        assert_eq!(request.method(), Method::DELETE);
    }

    #[test]
    fn delete_path_escapes_the_id() {
        let path = |id: &str| DeleteAppointment { id: AppointmentId::new(id) }.path();
        assert_eq!(path("a/b"), "/api/appointments/a%2Fb");
        assert_eq!(path("abc#x"), "/api/appointments/abc%23x");
        assert_eq!(path("two words?"), "/api/appointments/two%20words%3F");
    }

    #[test]
    fn create_sends_request_body() {
        let request = CreateAppointment(NewAppointment {
            date: Some("2025-04-05".into()),
            ..Default::default()
        });
        let body = serde_json::to_value(request.body().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "date": "2025-04-05" }));
    }
}
