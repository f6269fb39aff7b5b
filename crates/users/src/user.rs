use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Entity, UserId};

/// Customer placing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into().trim().to_string();

        if name.trim().is_empty() {
            return Err(DomainError::invariant("user name must not be empty"));
        }
        // Shape check only.
        if !email.contains('@') {
            return Err(DomainError::invariant(format!("invalid email address: {email}")));
        }

        Ok(Self { id, name, email })
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> Option<&Self::Id> {
        Some(&self.id)
    }
}
