use serde::{Deserialize, Serialize};

/// The profile of whoever owns the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl User {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
