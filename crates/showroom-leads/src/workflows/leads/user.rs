use chrono::Utc;
use serde::Serialize;

use super::domain::{Event, Lead, LeadInformationBag, Showroom};
use super::validation::ValidationError;

/// Contact details a user hands over with a lead.
///
/// Fields are fixed at construction. Consumers that need to walk the values generically use
/// [`PersonalInformation::fields`], which yields them in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalInformation {
    name: String,
    surnames: String,
    phone: String,
}

impl PersonalInformation {
    pub fn new(
        name: impl Into<String>,
        surnames: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (name, surnames, phone) = (name.into(), surnames.into(), phone.into());
        if name.is_empty() || surnames.is_empty() || phone.is_empty() {
            return Err(ValidationError::invalid("Required"));
        }

        Ok(Self {
            name,
            surnames,
            phone,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surnames(&self) -> &str {
        &self.surnames
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("surnames", self.surnames.as_str()),
            ("phone", self.phone.as_str()),
        ]
    }
}

/// Failures raised by the user aggregate while performing a lead.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("user {email} has no personal information to attach to a lead")]
    MissingPersonalInformation { email: String },
}

/// The actor performing leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    email: String,
    personal_information: Option<PersonalInformation>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        if !email.contains('@') {
            return Err(ValidationError::invalid(format!("Email {email:?} is not valid")));
        }

        Ok(Self {
            email,
            personal_information: None,
        })
    }

    pub fn with_personal_information(mut self, information: PersonalInformation) -> Self {
        self.personal_information = Some(information);
        self
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn personal_information(&self) -> Option<&PersonalInformation> {
        self.personal_information.as_ref()
    }

    /// Record this user's interest in `event` at `showroom`.
    pub fn do_lead(
        &self,
        showroom: &Showroom,
        event: Event,
        information: LeadInformationBag,
    ) -> Result<Lead, LeadError> {
        let personal_information = self.personal_information.clone().ok_or_else(|| {
            LeadError::MissingPersonalInformation {
                email: self.email.clone(),
            }
        })?;

        Ok(Lead::new(
            self.email.clone(),
            personal_information,
            showroom.clone(),
            event,
            information,
            Utc::now(),
        ))
    }
}
