use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// User profile, keyed by lower-cased email.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Profile identifier, the lower-cased email once saved
    #[serde(default)]
    pub id: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, alias = "avatarUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// First save time, preserved across updates
    #[serde(
        default,
        alias = "createdAt",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    /// Last save time
    #[serde(
        default,
        alias = "updatedAt",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Profile {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Store key derived from the email; `None` when the email is blank.
    pub fn key(&self) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() {
            None
        } else {
            Some(email.to_lowercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_lowercases_email() {
        let profile = Profile::with_email(" Ada@Example.COM ");

        assert_eq!(profile.key().as_deref(), Some("ada@example.com"));
        assert_eq!(Profile::with_email("   ").key(), None);
    }

    #[test]
    fn test_accepts_camel_case_fields() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "id": "ada@example.com",
                "email": "ada@example.com",
                "displayName": "Ada",
                "avatarUrl": "https://example.com/a.png",
                "createdAt": "2024-05-01T12:00:00.000Z"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.display_name.as_deref(), Some("Ada"));
        assert_eq!(profile.avatar_url.as_deref(), Some("https://example.com/a.png"));
        assert!(profile.created_at.is_some());
        assert!(profile.updated_at.is_none());
    }
}
