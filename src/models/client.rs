//! Diesel models for clients and their reminders.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, NewReminder as DomainNewReminder,
    Reminder as DomainReminder, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
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
    pub total_purchases: i64,
    pub lifetime_purchases: i64,
    pub current_balance: i64,
    pub last_purchase: Option<NaiveDate>,
    pub preferred_category: String,
    pub vip_status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`]. Purchase totals and balance start at the
/// column defaults of zero.
pub struct NewClient<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub address: &'a str,
    pub pan_no: &'a str,
    pub birthday: NaiveDate,
    pub anniversary: Option<NaiveDate>,
    pub ring_size: Option<&'a str>,
    pub bangle_size: Option<&'a str>,
    pub bracelet_size: Option<&'a str>,
    pub preferred_category: &'a str,
    pub vip_status: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub address: &'a str,
    pub pan_no: &'a str,
    pub birthday: NaiveDate,
    pub anniversary: Option<Option<NaiveDate>>,
    pub ring_size: Option<Option<&'a str>>,
    pub bangle_size: Option<Option<&'a str>>,
    pub bracelet_size: Option<Option<&'a str>>,
    pub preferred_category: &'a str,
    pub vip_status: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: client.id,
            name: client.name,
            phone: client.phone,
            email: client.email,
            address: client.address,
            pan_no: client.pan_no,
            birthday: client.birthday,
            anniversary: client.anniversary,
            ring_size: client.ring_size,
            bangle_size: client.bangle_size,
            bracelet_size: client.bracelet_size,
            total_purchases: client.total_purchases,
            lifetime_purchases: client.lifetime_purchases,
            current_balance: client.current_balance,
            last_purchase: client.last_purchase,
            preferred_category: client.preferred_category,
            vip_status: client.vip_status.parse()?,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            name: client.name.as_str(),
            phone: client.phone.as_str(),
            email: client.email.as_str(),
            address: client.address.as_str(),
            pan_no: client.pan_no.as_str(),
            birthday: client.birthday,
            anniversary: client.anniversary,
            ring_size: client.ring_size.as_deref(),
            bangle_size: client.bangle_size.as_deref(),
            bracelet_size: client.bracelet_size.as_deref(),
            preferred_category: client.preferred_category.as_str(),
            vip_status: client.vip_status.to_string(),
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(client: &'a DomainUpdateClient) -> Self {
        Self {
            name: client.name.as_str(),
            phone: client.phone.as_str(),
            email: client.email.as_str(),
            address: client.address.as_str(),
            pan_no: client.pan_no.as_str(),
            birthday: client.birthday,
            anniversary: Some(client.anniversary),
            ring_size: Some(client.ring_size.as_deref()),
            bangle_size: Some(client.bangle_size.as_deref()),
            bracelet_size: Some(client.bracelet_size.as_deref()),
            preferred_category: client.preferred_category.as_str(),
            vip_status: client.vip_status.to_string(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::reminders)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
/// Diesel model for [`crate::domain::client::Reminder`].
pub struct Reminder {
    pub id: i32,
    pub client_id: i32,
    pub description: String,
    pub kind: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reminders)]
/// Insertable form of [`Reminder`]. New reminders are always pending.
pub struct NewReminder<'a> {
    pub client_id: i32,
    pub description: &'a str,
    pub kind: String,
    pub due_date: NaiveDate,
}

impl TryFrom<Reminder> for DomainReminder {
    type Error = TypeConstraintError;

    fn try_from(reminder: Reminder) -> Result<Self, Self::Error> {
        Ok(Self {
            id: reminder.id,
            client_id: reminder.client_id,
            description: reminder.description,
            kind: reminder.kind.parse()?,
            due_date: reminder.due_date,
            status: reminder.status.parse()?,
            created_at: reminder.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewReminder> for NewReminder<'a> {
    fn from(reminder: &'a DomainNewReminder) -> Self {
        Self {
            client_id: reminder.client_id,
            description: reminder.description.as_str(),
            kind: reminder.kind.to_string(),
            due_date: reminder.due_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{ReminderKind, ReminderStatus, VipStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_domain_new() -> DomainNewClient {
        DomainNewClient::new(
            "Mrs. Priya Sharma".to_string(),
            "+91 98765 43210".to_string(),
            "priya.sharma@email.com".to_string(),
            "Sector 15, Gurgaon".to_string(),
            "ABCDE1234F".to_string(),
            date(1985, 3, 15),
            Some(date(2010, 12, 5)),
            Some("16".to_string()),
            Some("2.6".to_string()),
            Some("M".to_string()),
            "Diamond Jewelry".to_string(),
            VipStatus::Vip,
        )
    }

    #[test]
    fn from_domain_new_creates_newclient() {
        let domain = sample_domain_new();
        let new: NewClient = (&domain).into();
        assert_eq!(new.name, domain.name);
        assert_eq!(new.email, domain.email);
        assert_eq!(new.pan_no, "ABCDE1234F");
        assert_eq!(new.vip_status, "vip");
        assert_eq!(new.anniversary, Some(date(2010, 12, 5)));
    }

    #[test]
    fn client_row_parses_into_domain() {
        let now = date(2024, 11, 1).and_hms_opt(9, 0, 0).unwrap();
        let row = Client {
            id: 1,
            name: "Mr. Rajesh Patel".to_string(),
            phone: "+918765432109".to_string(),
            email: "rajesh.patel@email.com".to_string(),
            address: "Vastrapur, Ahmedabad".to_string(),
            pan_no: "FGHIJ5678K".to_string(),
            birthday: date(1978, 8, 22),
            anniversary: Some(date(2005, 2, 14)),
            ring_size: None,
            bangle_size: None,
            bracelet_size: None,
            total_purchases: 850_000,
            lifetime_purchases: 2_100_000,
            current_balance: 15_000,
            last_purchase: Some(date(2024, 10, 15)),
            preferred_category: "Gold Jewelry".to_string(),
            vip_status: "premium".to_string(),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainClient::try_from(row).unwrap();
        assert_eq!(domain.vip_status, VipStatus::Premium);
        assert_eq!(domain.current_balance, 15_000);
    }

    #[test]
    fn unknown_vip_status_is_rejected() {
        let now = date(2024, 11, 1).and_hms_opt(9, 0, 0).unwrap();
        let row = Client {
            id: 1,
            name: "x".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            pan_no: String::new(),
            birthday: date(1990, 1, 1),
            anniversary: None,
            ring_size: None,
            bangle_size: None,
            bracelet_size: None,
            total_purchases: 0,
            lifetime_purchases: 0,
            current_balance: 0,
            last_purchase: None,
            preferred_category: String::new(),
            vip_status: "platinum".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(DomainClient::try_from(row).is_err());
    }

    #[test]
    fn reminder_row_parses_into_domain() {
        let row = Reminder {
            id: 7,
            client_id: 2,
            description: "Pending payment for gold bracelet".to_string(),
            kind: "payment-due".to_string(),
            due_date: date(2024, 12, 31),
            status: "pending".to_string(),
            created_at: date(2024, 12, 1).and_hms_opt(10, 0, 0).unwrap(),
        };
        let domain = DomainReminder::try_from(row).unwrap();
        assert_eq!(domain.kind, ReminderKind::PaymentDue);
        assert_eq!(domain.status, ReminderStatus::Pending);
    }
}
