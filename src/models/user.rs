use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Role;
use crate::validation;

/// Persisted identity record. `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Registration input. Fields are optional at the wire level so a missing
/// field surfaces as a client-input error instead of a deserialization
/// rejection; `validate` enforces presence.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Registration input with presence and format rules already enforced.
/// The email is normalized to lowercase here, before any lookup or insert.
#[derive(Debug)]
pub struct ValidatedRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub roles: Vec<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<ValidatedRegistration> {
        let name = validation::require_field(self.name.as_deref(), "Name")?.to_string();
        let email = validation::require_field(self.email.as_deref(), "Email")?.to_string();
        let password =
            validation::require_field(self.password.as_deref(), "Password")?.to_string();
        let phone_number =
            validation::require_field(self.phone_number.as_deref(), "Phone number")?.to_string();

        validation::validate_email(&email)?;
        validation::validate_password(&password)?;
        validation::validate_phone_number(&phone_number)?;

        Ok(ValidatedRegistration {
            name,
            email: email.to_lowercase(),
            password,
            phone_number,
            address: self.address,
            roles: self.roles.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct ValidatedLogin {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<ValidatedLogin> {
        let email = validation::require_field(self.email.as_deref(), "Email")?.to_string();
        let password =
            validation::require_field(self.password.as_deref(), "Password")?.to_string();

        validation::validate_email(&email)?;
        validation::validate_password(&password)?;

        Ok(ValidatedLogin {
            email: email.to_lowercase(),
            password,
        })
    }
}

/// Self-service profile update. Only name, phone number, and address are
/// mutable; email, password, and roles are fixed after registration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl UpdateAccountRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validation::require_field(Some(name), "Name")?;
        }
        if let Some(phone) = &self.phone_number {
            validation::validate_phone_number(phone)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none() && self.address.is_none()
    }
}

/// Input for the persistence layer once validation, role resolution, and
/// password hashing have all succeeded.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub roles: Vec<Role>,
}

/// Login success payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub roles: Vec<String>,
}

/// Outward-facing account view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: i64,
}

impl UserProfile {
    pub fn from_user(user: User, roles: &[Role]) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            address: user.address,
            is_active: user.is_active,
            roles: roles.iter().map(|r| r.as_ref().to_string()).collect(),
            created_at: user.created_at,
        }
    }
}
