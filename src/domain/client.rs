use std::fmt::Display;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Retail client of the shop.
///
/// `current_balance` follows the account-statement convention: a positive
/// value is credit the shop owes the client, a negative value is an amount
/// the client still has to pay.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pan_no: String,
    pub birthday: NaiveDate,
    pub anniversary: Option<NaiveDate>,
    pub ring_size: Option<String>,
    pub bangle_size: Option<String>,
    pub bracelet_size: Option<String>,
    /// Purchases in the current financial year, in rupees.
    pub total_purchases: i64,
    /// Purchases across the whole relationship, in rupees.
    pub lifetime_purchases: i64,
    pub current_balance: i64,
    pub last_purchase: Option<NaiveDate>,
    pub preferred_category: String,
    pub vip_status: VipStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum VipStatus {
    #[default]
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "premium")]
    Premium,
    #[serde(rename = "vip")]
    Vip,
}

impl Display for VipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VipStatus::Regular => write!(f, "regular"),
            VipStatus::Premium => write!(f, "premium"),
            VipStatus::Vip => write!(f, "vip"),
        }
    }
}

impl FromStr for VipStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(VipStatus::Regular),
            "premium" => Ok(VipStatus::Premium),
            "vip" => Ok(VipStatus::Vip),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pan_no: String,
    pub birthday: NaiveDate,
    pub anniversary: Option<NaiveDate>,
    pub ring_size: Option<String>,
    pub bangle_size: Option<String>,
    pub bracelet_size: Option<String>,
    pub preferred_category: String,
    pub vip_status: VipStatus,
}

impl NewClient {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        phone: String,
        email: String,
        address: String,
        pan_no: String,
        birthday: NaiveDate,
        anniversary: Option<NaiveDate>,
        ring_size: Option<String>,
        bangle_size: Option<String>,
        bracelet_size: Option<String>,
        preferred_category: String,
        vip_status: VipStatus,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_lowercase(),
            address: address.trim().to_string(),
            pan_no: pan_no.trim().to_uppercase(),
            birthday,
            anniversary,
            ring_size: ring_size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            bangle_size: bangle_size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            bracelet_size: bracelet_size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            preferred_category: preferred_category.trim().to_string(),
            vip_status,
        }
    }
}

/// Profile fields an operator may edit. Purchase totals and the running
/// balance are maintained by the transaction ledger and are deliberately
/// absent here.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateClient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pan_no: String,
    pub birthday: NaiveDate,
    pub anniversary: Option<NaiveDate>,
    pub ring_size: Option<String>,
    pub bangle_size: Option<String>,
    pub bracelet_size: Option<String>,
    pub preferred_category: String,
    pub vip_status: VipStatus,
}

impl UpdateClient {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        phone: String,
        email: String,
        address: String,
        pan_no: String,
        birthday: NaiveDate,
        anniversary: Option<NaiveDate>,
        ring_size: Option<String>,
        bangle_size: Option<String>,
        bracelet_size: Option<String>,
        preferred_category: String,
        vip_status: VipStatus,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_lowercase(),
            address: address.trim().to_string(),
            pan_no: pan_no.trim().to_uppercase(),
            birthday,
            anniversary,
            ring_size: ring_size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            bangle_size: bangle_size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            bracelet_size: bracelet_size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            preferred_category: preferred_category.trim().to_string(),
            vip_status,
        }
    }
}

/// Scheduled follow-up attached to a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: i32,
    pub client_id: i32,
    pub description: String,
    pub kind: ReminderKind,
    pub due_date: NaiveDate,
    pub status: ReminderStatus,
    pub created_at: NaiveDateTime,
}

impl Reminder {
    /// Display state for a given day. A pending reminder whose due date has
    /// passed reads as overdue; the stored status never holds that value.
    #[must_use]
    pub fn state_on(&self, today: NaiveDate) -> ReminderState {
        match self.status {
            ReminderStatus::Completed => ReminderState::Completed,
            ReminderStatus::Pending if self.due_date < today => ReminderState::Overdue,
            ReminderStatus::Pending => ReminderState::Pending,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderKind {
    #[serde(rename = "follow-up")]
    FollowUp,
    #[serde(rename = "payment-due")]
    PaymentDue,
    #[serde(rename = "greeting")]
    Greeting,
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderKind::FollowUp => write!(f, "follow-up"),
            ReminderKind::PaymentDue => write!(f, "payment-due"),
            ReminderKind::Greeting => write!(f, "greeting"),
        }
    }
}

impl FromStr for ReminderKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow-up" => Ok(ReminderKind::FollowUp),
            "payment-due" => Ok(ReminderKind::PaymentDue),
            "greeting" => Ok(ReminderKind::Greeting),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Stored reminder status. `Overdue` is never written; it is derived from
/// the due date at display time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "completed")]
    Completed,
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderStatus::Pending => write!(f, "pending"),
            ReminderStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ReminderStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReminderStatus::Pending),
            "completed" => Ok(ReminderStatus::Completed),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum ReminderState {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "overdue")]
    Overdue,
    #[serde(rename = "completed")]
    Completed,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewReminder {
    pub client_id: i32,
    pub description: String,
    pub kind: ReminderKind,
    pub due_date: NaiveDate,
}

impl NewReminder {
    #[must_use]
    pub fn new(client_id: i32, description: String, kind: ReminderKind, due_date: NaiveDate) -> Self {
        Self {
            client_id,
            description: description.trim().to_string(),
            kind,
            due_date,
        }
    }
}

/// Birthday or anniversary coming up inside a lookahead window.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UpcomingEvent {
    pub client_id: i32,
    pub client_name: String,
    pub event: ClientEventKind,
    pub on: NaiveDate,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum ClientEventKind {
    #[serde(rename = "birthday")]
    Birthday,
    #[serde(rename = "anniversary")]
    Anniversary,
}

impl Display for ClientEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientEventKind::Birthday => write!(f, "Birthday"),
            ClientEventKind::Anniversary => write!(f, "Anniversary"),
        }
    }
}

/// Next calendar occurrence of an annual date on or after `today`.
/// A Feb 29 anniversary falls on Mar 1 in non-leap years.
fn next_occurrence(annual: NaiveDate, today: NaiveDate) -> NaiveDate {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, annual.month(), annual.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
    };
    match in_year(today.year()) {
        Some(date) if date >= today => date,
        _ => in_year(today.year() + 1).unwrap_or(today),
    }
}

/// Collect birthdays and anniversaries falling within `horizon_days` of
/// `today`, soonest first.
#[must_use]
pub fn upcoming_events(clients: &[Client], today: NaiveDate, horizon_days: i64) -> Vec<UpcomingEvent> {
    let mut events: Vec<UpcomingEvent> = Vec::new();
    for client in clients {
        let birthday = next_occurrence(client.birthday, today);
        if (birthday - today).num_days() <= horizon_days {
            events.push(UpcomingEvent {
                client_id: client.id,
                client_name: client.name.clone(),
                event: ClientEventKind::Birthday,
                on: birthday,
            });
        }
        if let Some(anniversary) = client.anniversary {
            let date = next_occurrence(anniversary, today);
            if (date - today).num_days() <= horizon_days {
                events.push(UpcomingEvent {
                    client_id: client.id,
                    client_name: client.name.clone(),
                    event: ClientEventKind::Anniversary,
                    on: date,
                });
            }
        }
    }
    events.sort_by_key(|e| e.on);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_client(id: i32, birthday: NaiveDate, anniversary: Option<NaiveDate>) -> Client {
        Client {
            id,
            name: format!("Client {id}"),
            phone: "+919876543210".to_string(),
            email: "client@example.com".to_string(),
            address: String::new(),
            pan_no: String::new(),
            birthday,
            anniversary,
            ring_size: None,
            bangle_size: None,
            bracelet_size: None,
            total_purchases: 0,
            lifetime_purchases: 0,
            current_balance: 0,
            last_purchase: None,
            preferred_category: String::new(),
            vip_status: VipStatus::Regular,
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            updated_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn new_client_normalizes_contact_fields() {
        let client = NewClient::new(
            "  Mrs. Priya Sharma ".to_string(),
            " +91 98765 43210 ".to_string(),
            "Priya.Sharma@Email.com".to_string(),
            "Sector 15, Gurgaon".to_string(),
            "abcde1234f".to_string(),
            date(1985, 3, 15),
            None,
            Some("  ".to_string()),
            Some("2.6".to_string()),
            None,
            "Diamond Jewelry".to_string(),
            VipStatus::Vip,
        );
        assert_eq!(client.name, "Mrs. Priya Sharma");
        assert_eq!(client.email, "priya.sharma@email.com");
        assert_eq!(client.pan_no, "ABCDE1234F");
        assert_eq!(client.ring_size, None);
        assert_eq!(client.bangle_size, Some("2.6".to_string()));
    }

    #[test]
    fn reminder_state_partitions_by_due_date() {
        let today = date(2025, 1, 15);
        let mut reminder = Reminder {
            id: 1,
            client_id: 1,
            description: "Follow up".to_string(),
            kind: ReminderKind::FollowUp,
            due_date: date(2025, 1, 20),
            status: ReminderStatus::Pending,
            created_at: today.and_hms_opt(9, 0, 0).unwrap(),
        };
        assert_eq!(reminder.state_on(today), ReminderState::Pending);

        reminder.due_date = date(2025, 1, 10);
        assert_eq!(reminder.state_on(today), ReminderState::Overdue);

        reminder.status = ReminderStatus::Completed;
        assert_eq!(reminder.state_on(today), ReminderState::Completed);
    }

    #[test]
    fn reminder_due_today_is_not_overdue() {
        let today = date(2025, 1, 15);
        let reminder = Reminder {
            id: 1,
            client_id: 1,
            description: "Payment".to_string(),
            kind: ReminderKind::PaymentDue,
            due_date: today,
            status: ReminderStatus::Pending,
            created_at: today.and_hms_opt(9, 0, 0).unwrap(),
        };
        assert_eq!(reminder.state_on(today), ReminderState::Pending);
    }

    #[test]
    fn upcoming_events_cross_year_boundary() {
        let clients = vec![sample_client(1, date(1985, 1, 3), None)];
        let events = upcoming_events(&clients, date(2024, 12, 28), 14);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].on, date(2025, 1, 3));
        assert_eq!(events[0].event, ClientEventKind::Birthday);
    }

    #[test]
    fn upcoming_events_sorted_and_windowed() {
        let clients = vec![
            sample_client(1, date(1985, 12, 22), Some(date(2010, 12, 5))),
            sample_client(2, date(1992, 6, 10), None),
        ];
        let events = upcoming_events(&clients, date(2024, 12, 1), 30);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].on, date(2024, 12, 5));
        assert_eq!(events[1].on, date(2024, 12, 22));
    }

    #[test]
    fn vip_status_round_trips_through_str() {
        for status in [VipStatus::Regular, VipStatus::Premium, VipStatus::Vip] {
            assert_eq!(status.to_string().parse::<VipStatus>(), Ok(status));
        }
        assert!("gold".parse::<VipStatus>().is_err());
    }
}
