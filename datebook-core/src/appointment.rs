//! Appointment records and create requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::date::DateKey;
use crate::error::{DatebookError, DatebookResult};

pub const DEFAULT_TITLE: &str = "Appointment";
pub const DEFAULT_TIME: &str = "12:00 PM";

/// Store-assigned identifier of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        AppointmentId(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        AppointmentId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(id: &str) -> Self {
        AppointmentId::new(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKind {
    Medical,
    Class,
    Personal,
    #[default]
    General,
}

impl AppointmentKind {
    pub const ALL: [AppointmentKind; 4] = [
        AppointmentKind::Medical,
        AppointmentKind::Class,
        AppointmentKind::Personal,
        AppointmentKind::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentKind::Medical => "medical",
            AppointmentKind::Class => "class",
            AppointmentKind::Personal => "personal",
            AppointmentKind::General => "general",
        }
    }
}

impl fmt::Display for AppointmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentKind {
    type Err = DatebookError;

    fn from_str(s: &str) -> DatebookResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        AppointmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                DatebookError::Validation(format!(
                    "unknown appointment type '{s}' (expected medical, class, personal or general)"
                ))
            })
    }
}

/// A persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub date: DateKey,
    pub title: String,
    /// Display time, `H:MM AM/PM`.
    pub time: String,
    #[serde(rename = "type", default)]
    pub kind: AppointmentKind,
}

impl Appointment {
    /// One-line summary, e.g. `"10:00 AM: Checkup"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.time, self.title)
    }
}

/// Request to create an appointment. Everything except the date is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AppointmentKind>,
}

/// A create request that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAppointment {
    pub date: DateKey,
    pub title: String,
    pub time: String,
    pub kind: AppointmentKind,
}

impl ValidAppointment {
    pub fn with_id(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            date: self.date,
            title: self.title,
            time: self.time,
            kind: self.kind,
        }
    }
}

impl NewAppointment {
    pub fn on(date: DateKey) -> Self {
        NewAppointment {
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn kind(mut self, kind: AppointmentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Check the date and fill in defaults.
    ///
    /// Blank titles and times count as omitted.
    pub fn validate(&self) -> DatebookResult<ValidAppointment> {
        let date = self
            .date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| DatebookError::Validation("Date is required".into()))?
            .parse::<DateKey>()?;

        Ok(ValidAppointment {
            date,
            title: non_blank(self.title.as_deref()).unwrap_or(DEFAULT_TITLE).to_string(),
            time: non_blank(self.time.as_deref()).unwrap_or(DEFAULT_TIME).to_string(),
            kind: self.kind.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
