use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Fulfilment state of a booking. `Pending` is the initial state and is not
/// reachable again through an admin status update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceStatus {
    Pending,
    Scheduled,
    #[serde(rename = "On the Way")]
    OnTheWay,
    #[serde(rename = "Not Available")]
    NotAvailable,
    Fulfilled,
    Cancelled,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "Pending",
            ServiceStatus::Scheduled => "Scheduled",
            ServiceStatus::OnTheWay => "On the Way",
            ServiceStatus::NotAvailable => "Not Available",
            ServiceStatus::Fulfilled => "Fulfilled",
            ServiceStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ServiceStatus::Pending),
            "Scheduled" => Ok(ServiceStatus::Scheduled),
            "On the Way" => Ok(ServiceStatus::OnTheWay),
            "Not Available" => Ok(ServiceStatus::NotAvailable),
            "Fulfilled" => Ok(ServiceStatus::Fulfilled),
            "Cancelled" => Ok(ServiceStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Paid" => Ok(PaymentStatus::Paid),
            "Failed" => Ok(PaymentStatus::Failed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated admin status transition. Exactly one of the two status
/// columns is touched per update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Service(ServiceStatus),
    Payment(PaymentStatus),
}

impl StatusUpdate {
    /// Parses the `{statusType, newStatus}` pair from an update request.
    ///
    /// Service targets exclude `Pending`: it is the default on creation, not
    /// a state an admin can move a booking back into.
    pub fn parse(status_type: &str, new_status: &str) -> AppResult<Self> {
        match status_type {
            "service" => {
                let status = ServiceStatus::from_str(new_status)
                    .ok()
                    .filter(|s| *s != ServiceStatus::Pending)
                    .ok_or_else(|| AppError::BadRequest("Invalid service status value".into()))?;
                Ok(StatusUpdate::Service(status))
            }
            "payment" => {
                let status = PaymentStatus::from_str(new_status)
                    .map_err(|_| AppError::BadRequest("Invalid payment status value".into()))?;
                Ok(StatusUpdate::Payment(status))
            }
            _ => Err(AppError::BadRequest("Invalid status type".into())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StatusUpdate::Service(_) => "service",
            StatusUpdate::Payment(_) => "payment",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error")]
    Internal,
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_status_round_trips_every_variant() {
        for s in [
            "Pending",
            "Scheduled",
            "On the Way",
            "Not Available",
            "Fulfilled",
            "Cancelled",
        ] {
            let parsed = ServiceStatus::from_str(s).unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!(ServiceStatus::from_str("Done").is_err());
        assert!(ServiceStatus::from_str("pending").is_err());
    }

    #[test]
    fn multiword_statuses_serialize_with_spaces() {
        assert_eq!(
            serde_json::to_string(&ServiceStatus::OnTheWay).unwrap(),
            "\"On the Way\""
        );
        assert_eq!(
            serde_json::to_string(&ServiceStatus::NotAvailable).unwrap(),
            "\"Not Available\""
        );
    }

    #[test]
    fn pending_is_not_a_settable_service_target() {
        let err = StatusUpdate::parse("service", "Pending").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        // Repeated attempts keep failing the same way.
        assert!(StatusUpdate::parse("service", "Pending").is_err());
    }

    #[test]
    fn valid_service_targets_parse() {
        for s in [
            "Scheduled",
            "Cancelled",
            "On the Way",
            "Not Available",
            "Fulfilled",
        ] {
            let update = StatusUpdate::parse("service", s).unwrap();
            assert_eq!(update.kind(), "service");
        }
    }

    #[test]
    fn payment_targets_include_pending() {
        for s in ["Pending", "Paid", "Failed"] {
            let update = StatusUpdate::parse("payment", s).unwrap();
            assert_eq!(update.kind(), "payment");
        }
        assert!(StatusUpdate::parse("payment", "Refunded").is_err());
    }

    #[test]
    fn unknown_status_type_is_rejected() {
        let err = StatusUpdate::parse("shipping", "Paid").unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid status type"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(Role::default(), Role::User);
    }
}
