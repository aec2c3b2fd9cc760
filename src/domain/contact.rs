use super::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::store::Fields;

pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE_NUMBER: &str = "phoneNumber";
pub const FIELD_DESCRIPTION: &str = "description";

/// A persisted contact. The `id` is assigned by the document store on
/// create and never supplied by the client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Write payload for both create and update: a contact minus its id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub enum ValidationReq {
    __,
}

impl ValidationReq {
    pub fn full_name_req() -> String {
        "Full name is required and must not be empty".to_string()
    }

    pub fn phone_number_req() -> String {
        "Phone number is required and must not be empty".to_string()
    }

    pub fn email_req() -> String {
        "Email is required and must be a valid email address".to_string()
    }
}

impl ContactForm {
    pub fn new(full_name: &str, email: &str, phone_number: &str, description: Option<&str>) -> Self {
        ContactForm {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone_number: phone_number.to_string(),
            description: description.map(str::to_string),
        }
    }

    pub fn validate_full_name(&self) -> bool {
        !self.full_name.trim().is_empty()
    }

    pub fn validate_phone_number(&self) -> bool {
        !self.phone_number.trim().is_empty()
    }

    pub fn validate_email(&self) -> Result<bool, AppError> {
        // Must contain '@' and a '.' somewhere in the domain part.
        let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?;
        Ok(re.is_match(&self.email))
    }

    /// All required-field checks at once. `Ok(())` means the form may be
    /// submitted; the error names the first failing field.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.validate_full_name() {
            return Err(AppError::Validation(ValidationReq::full_name_req()));
        }
        if !self.validate_email()? {
            return Err(AppError::Validation(ValidationReq::email_req()));
        }
        if !self.validate_phone_number() {
            return Err(AppError::Validation(ValidationReq::phone_number_req()));
        }
        Ok(())
    }

    /// Document representation: field name to scalar string. An unset
    /// description stores no field at all.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(FIELD_FULL_NAME.to_string(), self.full_name.clone());
        fields.insert(FIELD_EMAIL.to_string(), self.email.clone());
        fields.insert(FIELD_PHONE_NUMBER.to_string(), self.phone_number.clone());

        if let Some(description) = &self.description {
            fields.insert(FIELD_DESCRIPTION.to_string(), description.clone());
        }
        fields
    }
}

impl Contact {
    /// Rebuilds a contact from a stored document, merging the assigned id
    /// back into the record. Missing required fields read as empty rather
    /// than failing: the store is the source of truth, not this layer.
    pub fn from_fields(id: &str, fields: &Fields) -> Self {
        Contact {
            id: id.to_string(),
            full_name: fields.get(FIELD_FULL_NAME).cloned().unwrap_or_default(),
            email: fields.get(FIELD_EMAIL).cloned().unwrap_or_default(),
            phone_number: fields.get(FIELD_PHONE_NUMBER).cloned().unwrap_or_default(),
            description: fields.get(FIELD_DESCRIPTION).cloned(),
        }
    }

    /// The form that would recreate this record, used to prefill the
    /// editor in edit mode.
    pub fn to_form(&self) -> ContactForm {
        ContactForm {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            description: self.description.clone(),
        }
    }
}
