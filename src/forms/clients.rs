use std::str::FromStr;

use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{NewClient, NewReminder, ReminderKind, UpdateClient, VipStatus};
use crate::domain::types::PhoneNumber;
use crate::forms::{FormError, optional_text, parse_date, parse_optional_date};

#[derive(Deserialize, Validate)]
/// Form data for registering a new client.
pub struct AddClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub address: String,
    #[validate(length(min = 1))]
    pub pan_no: String,
    pub birthday: String,
    #[serde(default)]
    pub anniversary: String,
    #[serde(default)]
    pub ring_size: String,
    #[serde(default)]
    pub bangle_size: String,
    #[serde(default)]
    pub bracelet_size: String,
    pub preferred_category: String,
    pub vip_status: String,
}

impl TryFrom<&AddClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: &AddClientForm) -> Result<Self, Self::Error> {
        let phone = PhoneNumber::new(form.phone.clone())?;
        let vip_status = VipStatus::from_str(&form.vip_status)?;
        Ok(NewClient::new(
            form.name.clone(),
            phone.into_inner(),
            form.email.clone(),
            form.address.clone(),
            form.pan_no.clone(),
            parse_date(&form.birthday)?,
            parse_optional_date(&form.anniversary)?,
            optional_text(&form.ring_size),
            optional_text(&form.bangle_size),
            optional_text(&form.bracelet_size),
            form.preferred_category.clone(),
            vip_status,
        ))
    }
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing client.
pub struct SaveClientForm {
    /// Client identifier.
    pub id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub address: String,
    #[validate(length(min = 1))]
    pub pan_no: String,
    pub birthday: String,
    #[serde(default)]
    pub anniversary: String,
    #[serde(default)]
    pub ring_size: String,
    #[serde(default)]
    pub bangle_size: String,
    #[serde(default)]
    pub bracelet_size: String,
    pub preferred_category: String,
    pub vip_status: String,
}

impl TryFrom<&SaveClientForm> for UpdateClient {
    type Error = FormError;

    fn try_from(form: &SaveClientForm) -> Result<Self, Self::Error> {
        let phone = PhoneNumber::new(form.phone.clone())?;
        let vip_status = VipStatus::from_str(&form.vip_status)?;
        Ok(UpdateClient::new(
            form.name.clone(),
            phone.into_inner(),
            form.email.clone(),
            form.address.clone(),
            form.pan_no.clone(),
            parse_date(&form.birthday)?,
            parse_optional_date(&form.anniversary)?,
            optional_text(&form.ring_size),
            optional_text(&form.bangle_size),
            optional_text(&form.bracelet_size),
            form.preferred_category.clone(),
            vip_status,
        ))
    }
}

#[derive(Deserialize, Validate)]
/// Form data for scheduling a reminder against a client.
pub struct AddReminderForm {
    /// Identifier of the client that receives the reminder.
    pub client_id: i32,
    #[validate(length(min = 1))]
    pub description: String,
    pub kind: String,
    pub due_date: String,
}

impl TryFrom<&AddReminderForm> for NewReminder {
    type Error = FormError;

    fn try_from(form: &AddReminderForm) -> Result<Self, Self::Error> {
        let kind = ReminderKind::from_str(&form.kind)?;
        Ok(NewReminder::new(
            form.client_id,
            form.description.clone(),
            kind,
            parse_date(&form.due_date)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddClientForm {
        AddClientForm {
            name: " Mrs. Priya Sharma ".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "Priya.Sharma@Email.com".to_string(),
            address: "Sector 15, Gurgaon".to_string(),
            pan_no: "abcde1234f".to_string(),
            birthday: "1985-03-15".to_string(),
            anniversary: "".to_string(),
            ring_size: " 16 ".to_string(),
            bangle_size: "".to_string(),
            bracelet_size: "".to_string(),
            preferred_category: "Diamond Jewelry".to_string(),
            vip_status: "vip".to_string(),
        }
    }

    #[test]
    fn add_client_form_normalises_contact_fields() {
        let client = NewClient::try_from(&add_form()).unwrap();

        assert_eq!(client.name, "Mrs. Priya Sharma");
        assert_eq!(client.phone, "+919876543210");
        assert_eq!(client.email, "priya.sharma@email.com");
        assert_eq!(client.pan_no, "ABCDE1234F");
        assert_eq!(client.ring_size.as_deref(), Some("16"));
        assert_eq!(client.anniversary, None);
        assert_eq!(client.vip_status, VipStatus::Vip);
    }

    #[test]
    fn add_client_form_rejects_bad_phone() {
        let mut form = add_form();
        form.phone = "not a phone".to_string();

        assert!(matches!(
            NewClient::try_from(&form),
            Err(FormError::InvalidPhoneNumber)
        ));
    }

    #[test]
    fn reminder_form_rejects_unknown_kind() {
        let form = AddReminderForm {
            client_id: 1,
            description: "Follow up on diamond necklace inquiry".to_string(),
            kind: "nudge".to_string(),
            due_date: "2025-01-10".to_string(),
        };

        assert!(matches!(
            NewReminder::try_from(&form),
            Err(FormError::InvalidValue(_))
        ));
    }
}
