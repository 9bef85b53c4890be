//! Complaint Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};

/// Complaint processing status
///
/// Serialized with the exact labels shown on the front desk screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum ComplaintStatus {
    /// Waiting to be called
    #[default]
    Menunggu,
    /// Being handled at the desk
    Diproses,
    /// Finished, kept as history
    Selesai,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [Self::Menunggu, Self::Diproses, Self::Selesai];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menunggu => "Menunggu",
            Self::Diproses => "Diproses",
            Self::Selesai => "Selesai",
        }
    }

    /// Part of the active queue (not yet finished)
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Selesai)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidStatus, format!("Invalid status: {s}"))
                    .with_detail("status", s)
            })
    }
}

/// Complaint entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    /// `A001` style ticket; cleared by a queue reset
    pub queue_number: Option<String>,
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub complaint: String,
    pub category: Option<String>,
    pub device_type: Option<String>,
    /// Customer service number on the internet contract
    pub no_internet: Option<String>,
    pub status: ComplaintStatus,
    /// Staff-only annotation
    pub notes: Option<String>,
    /// Unix millis
    pub created_at: i64,
}

/// Create complaint payload (public form)
///
/// Required fields are optional here so that a missing field is reported
/// as a validation error naming it rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCreate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub complaint: Option<String>,
    pub category: Option<String>,
    pub device_type: Option<String>,
    pub no_internet: Option<String>,
}

/// Validated create payload, ready for insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub complaint: String,
    pub category: Option<String>,
    pub device_type: Option<String>,
    pub no_internet: Option<String>,
}

impl ComplaintCreate {
    /// Trim every field, reject blank required fields, drop blank optional ones
    pub fn validate(self) -> Result<NewComplaint, AppError> {
        Ok(NewComplaint {
            name: required("name", self.name)?,
            company: optional(self.company),
            phone: required("phone", self.phone)?,
            complaint: required("complaint", self.complaint)?,
            category: optional(self.category),
            device_type: optional(self.device_type),
            no_internet: optional(self.no_internet),
        })
    }
}

/// Partial update payload (staff)
///
/// Absent fields are left untouched. For optional columns an empty string
/// clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub complaint: Option<String>,
    pub category: Option<String>,
    pub device_type: Option<String>,
    pub no_internet: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Validated partial update
///
/// Outer `None` = unchanged; `Some(None)` = clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintChanges {
    pub name: Option<String>,
    pub company: Option<Option<String>>,
    pub phone: Option<String>,
    pub complaint: Option<String>,
    pub category: Option<Option<String>>,
    pub device_type: Option<Option<String>>,
    pub no_internet: Option<Option<String>>,
    pub status: Option<ComplaintStatus>,
    pub notes: Option<Option<String>>,
}

impl ComplaintChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply onto a loaded record (last write wins)
    pub fn apply(self, target: &mut Complaint) {
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.company {
            target.company = v;
        }
        if let Some(v) = self.phone {
            target.phone = v;
        }
        if let Some(v) = self.complaint {
            target.complaint = v;
        }
        if let Some(v) = self.category {
            target.category = v;
        }
        if let Some(v) = self.device_type {
            target.device_type = v;
        }
        if let Some(v) = self.no_internet {
            target.no_internet = v;
        }
        if let Some(v) = self.status {
            target.status = v;
        }
        if let Some(v) = self.notes {
            target.notes = v;
        }
    }
}

impl ComplaintUpdate {
    pub fn validate(self) -> Result<ComplaintChanges, AppError> {
        let status = self
            .status
            .as_deref()
            .map(|s| s.trim().parse::<ComplaintStatus>())
            .transpose()?;

        Ok(ComplaintChanges {
            name: self.name.map(|v| required("name", Some(v))).transpose()?,
            company: self.company.map(|v| optional(Some(v))),
            phone: self.phone.map(|v| required("phone", Some(v))).transpose()?,
            complaint: self
                .complaint
                .map(|v| required("complaint", Some(v)))
                .transpose()?,
            category: self.category.map(|v| optional(Some(v))),
            device_type: self.device_type.map(|v| optional(Some(v))),
            no_internet: self.no_internet.map(|v| optional(Some(v))),
            status,
            notes: self.notes.map(|v| optional(Some(v))),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::required_field(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Created complaint plus the wait estimate shown on the ticket screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComplaint {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub estimated_wait_minutes: i64,
}

/// Queue counters without personal data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    pub waiting: i64,
    pub in_progress: i64,
    pub done: i64,
    pub active: i64,
    pub estimated_wait_minutes: i64,
}

impl QueueSummary {
    pub fn from_counts(waiting: i64, in_progress: i64, done: i64, minutes_per_ticket: i64) -> Self {
        let active = waiting + in_progress;
        Self {
            waiting,
            in_progress,
            done,
            active,
            estimated_wait_minutes: active * minutes_per_ticket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Complaint {
        Complaint {
            id: "c-1".into(),
            queue_number: Some("A001".into()),
            name: "Budi".into(),
            company: None,
            phone: "0812".into(),
            complaint: "No signal".into(),
            category: Some("Gangguan".into()),
            device_type: None,
            no_internet: None,
            status: ComplaintStatus::Menunggu,
            notes: None,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::Diproses).unwrap(),
            "\"Diproses\""
        );
        assert_eq!("Selesai".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::Selesai);
        let err = "selesai".parse::<ComplaintStatus>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatus);
    }

    #[test]
    fn test_status_is_active() {
        assert!(ComplaintStatus::Menunggu.is_active());
        assert!(ComplaintStatus::Diproses.is_active());
        assert!(!ComplaintStatus::Selesai.is_active());
    }

    #[test]
    fn test_create_validation_trims_and_names_field() {
        let input = ComplaintCreate {
            name: Some("  Budi ".into()),
            phone: Some("0812".into()),
            complaint: Some("No signal".into()),
            company: Some("   ".into()),
            ..Default::default()
        };
        let valid = input.validate().unwrap();
        assert_eq!(valid.name, "Budi");
        assert_eq!(valid.company, None);

        let missing = ComplaintCreate {
            name: Some("Budi".into()),
            complaint: Some("x".into()),
            ..Default::default()
        };
        let err = missing.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "phone");
    }

    #[test]
    fn test_update_rejects_blank_required_and_bad_status() {
        let blank = ComplaintUpdate {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(blank.validate().unwrap_err().code, ErrorCode::RequiredField);

        let bad = ComplaintUpdate {
            status: Some("Done".into()),
            ..Default::default()
        };
        assert_eq!(bad.validate().unwrap_err().code, ErrorCode::InvalidStatus);
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let mut record = sample();
        let changes = ComplaintUpdate {
            status: Some("Selesai".into()),
            category: Some(String::new()),
            notes: Some("called back".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(!changes.is_empty());

        changes.apply(&mut record);
        assert_eq!(record.status, ComplaintStatus::Selesai);
        assert_eq!(record.category, None);
        assert_eq!(record.notes.as_deref(), Some("called back"));
        assert_eq!(record.name, "Budi");
        assert_eq!(record.queue_number.as_deref(), Some("A001"));
    }

    #[test]
    fn test_complaint_json_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["queueNumber"], "A001");
        assert_eq!(json["status"], "Menunggu");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_created_complaint_flattens() {
        let created = CreatedComplaint {
            complaint: sample(),
            estimated_wait_minutes: 14,
        };
        let json = serde_json::to_value(created).unwrap();
        assert_eq!(json["queueNumber"], "A001");
        assert_eq!(json["estimatedWaitMinutes"], 14);
    }

    #[test]
    fn test_summary_estimate() {
        let summary = QueueSummary::from_counts(2, 1, 5, 7);
        assert_eq!(summary.active, 3);
        assert_eq!(summary.estimated_wait_minutes, 21);
    }
}
