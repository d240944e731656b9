//! Client model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ClientId;

/// Someone the freelancer works for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,

    /// Display name (unique, case-insensitive)
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub notes: String,

    /// Archived clients are hidden from lists but keep their history
    #[serde(default)]
    pub archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: name.into(),
            email: None,
            notes: String::new(),
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    /// Validate the client
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ClientValidationError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }
}

/// Validation errors for clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl std::fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client name cannot be empty"),
            Self::InvalidEmail(e) => write!(f, "Invalid email address: {}", e),
        }
    }
}

impl std::error::Error for ClientValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = Client::new("Acme Corp");
        assert_eq!(client.name, "Acme Corp");
        assert!(!client.archived);
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let client = Client::new("  ");
        assert_eq!(client.validate(), Err(ClientValidationError::EmptyName));

        let mut client = Client::new("Acme");
        client.email = Some("not-an-email".into());
        assert!(matches!(
            client.validate(),
            Err(ClientValidationError::InvalidEmail(_))
        ));
    }
}
