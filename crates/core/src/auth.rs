use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Role claim carried by a session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular customer account.
    Member,
    /// Operator allowed into the admin area.
    Admin,
}

impl UserRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    email: Option<String>,
    role: Option<UserRole>,
}

impl UserIdentity {
    /// Creates a user identity from session data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        role: Option<UserRole>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            email,
            role,
        }
    }

    /// Returns the stable subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the role claim, if any.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.role
    }

    /// Returns whether the session carries the admin role claim.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{UserIdentity, UserRole};

    #[test]
    fn role_roundtrip_storage_value() {
        let restored = UserRole::from_str(UserRole::Admin.as_str());
        assert!(matches!(restored, Ok(UserRole::Admin)));
        assert!(UserRole::from_str("owner").is_err());
    }

    #[test]
    fn only_admin_claim_is_admin() {
        let admin = UserIdentity::new("a", "A", None, Some(UserRole::Admin));
        let member = UserIdentity::new("m", "M", None, Some(UserRole::Member));
        let unclaimed = UserIdentity::new("u", "U", None, None);

        assert!(admin.is_admin());
        assert!(!member.is_admin());
        assert!(!unclaimed.is_admin());
    }

    #[test]
    fn identity_survives_session_serialization() {
        let identity = UserIdentity::new(
            "5f0c",
            "Dana",
            Some("dana@example.com".to_owned()),
            Some(UserRole::Member),
        );
        let encoded = serde_json::to_string(&identity);
        assert!(encoded.is_ok());
        let decoded =
            serde_json::from_str::<UserIdentity>(encoded.as_deref().unwrap_or_default());
        assert!(matches!(decoded, Ok(value) if value == identity));
    }
}
