//! Ticket payloads exchanged with the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    PaymentSubmitted,
    Approved,
    Rejected,
    Activated,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::PaymentSubmitted => "payment_submitted",
            TicketStatus::Approved => "approved",
            TicketStatus::Rejected => "rejected",
            TicketStatus::Activated => "activated",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TicketStatus::Pending),
            "payment_submitted" => Ok(TicketStatus::PaymentSubmitted),
            "approved" => Ok(TicketStatus::Approved),
            "rejected" => Ok(TicketStatus::Rejected),
            "activated" => Ok(TicketStatus::Activated),
            other => Err(format!("unknown ticket status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketType {
    #[serde(rename = "VIP")]
    Vip,
    #[serde(rename = "Student")]
    Student,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Vip => "VIP",
            TicketType::Student => "Student",
        }
    }
}

/// Row of `GET /api/tickets/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub code: String,
    pub ticket_type: TicketType,
    pub status: TicketStatus,
    pub price: i64,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_proof: Option<String>,
    pub created_at: String,
}

/// Body of `POST /api/tickets/{id}/approve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Approval {
    pub approved: bool,
    pub rejection_reason: Option<String>,
}

impl Approval {
    pub fn approve() -> Self {
        Self {
            approved: true,
            rejection_reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            rejection_reason: Some(reason.into()),
        }
    }
}

/// Body of `POST /api/tickets/activate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub code: String,
    pub phone: String,
    pub name: String,
    pub email: Option<String>,
}

/// `{success, message, ...}` answer of approve and activate. A 200 may still carry
/// `success: false` (ticket already activated, bound to another phone).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub ticket_type: Option<TicketType>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TicketSummary {
    pub id: i64,
    pub code: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub status: TicketStatus,
    pub price: i64,
}

/// Answer of `GET /api/tickets/check/{phone}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhoneCheck {
    pub has_tickets: bool,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub tickets: Vec<TicketSummary>,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticket_deserializes_backend_row() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 7,
            "code": "A1B2C3",
            "ticket_type": "VIP",
            "status": "payment_submitted",
            "price": 500,
            "customer_name": "Ahmed Mohamed",
            "customer_phone": "01012345678",
            "customer_email": null,
            "payment_method": "vodafone_cash",
            "payment_proof": null,
            "created_at": "2026-02-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(ticket.ticket_type, TicketType::Vip);
        assert_eq!(ticket.status, TicketStatus::PaymentSubmitted);
        assert!(ticket.customer_email.is_none());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("activated".parse::<TicketStatus>(), Ok(TicketStatus::Activated));
        assert!("done".parse::<TicketStatus>().is_err());
        assert_eq!(TicketStatus::PaymentSubmitted.to_string(), "payment_submitted");
    }

    #[test]
    fn test_rejection_body() {
        let body = serde_json::to_value(Approval::reject("blurry proof")).unwrap();
        assert_eq!(body, json!({"approved": false, "rejection_reason": "blurry proof"}));
        let body = serde_json::to_value(Approval::approve()).unwrap();
        assert_eq!(body, json!({"approved": true, "rejection_reason": null}));
    }
}
