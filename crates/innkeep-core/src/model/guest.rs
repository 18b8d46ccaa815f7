use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::{require_text, validate_email};

/// A person who stays, or has stayed, at the hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_document: Option<String>,
    pub nationality: Option<String>,
    pub vip: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_document: Option<String>,
    pub nationality: Option<String>,
    #[serde(default)]
    pub vip: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_document: Option<String>,
    pub nationality: Option<String>,
    pub vip: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestFilter {
    /// Matches name, email or phone
    pub q: Option<String>,
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
}

impl Guest {
    pub fn create(id: String, input: NewGuest) -> Result<Self> {
        let now = Utc::now();
        let guest = Self {
            id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(input.email),
            phone: input.phone,
            address: input.address,
            id_document: input.id_document,
            nationality: input.nationality,
            vip: input.vip,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        guest.validate()?;
        Ok(guest)
    }

    pub fn apply(&mut self, patch: GuestPatch) -> Result<()> {
        if let Some(first) = patch.first_name {
            self.first_name = first.trim().to_string();
        }
        if let Some(last) = patch.last_name {
            self.last_name = last.trim().to_string();
        }
        if patch.email.is_some() {
            self.email = normalize_email(patch.email);
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
        if patch.id_document.is_some() {
            self.id_document = patch.id_document;
        }
        if patch.nationality.is_some() {
            self.nationality = patch.nationality;
        }
        if let Some(vip) = patch.vip {
            self.vip = vip;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewGuest {
        NewGuest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some(" Ada@Example.COM ".to_string()),
            phone: None,
            address: None,
            id_document: None,
            nationality: None,
            vip: false,
            notes: None,
        }
    }

    #[test]
    fn test_email_is_normalized() {
        let guest = Guest::create("g-1".to_string(), input()).unwrap();
        assert_eq!(guest.email.as_deref(), Some("ada@example.com"));
        assert_eq!(guest.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_blank_email_is_dropped() {
        let mut i = input();
        i.email = Some("  ".to_string());
        let guest = Guest::create("g-1".to_string(), i).unwrap();
        assert!(guest.email.is_none());
    }

    #[test]
    fn test_patch_rejects_blank_last_name() {
        let mut guest = Guest::create("g-1".to_string(), input()).unwrap();
        let patch = GuestPatch {
            last_name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(guest.apply(patch).is_err());
    }
}
