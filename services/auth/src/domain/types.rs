use uuid::Uuid;

/// Lifecycle state of a directory user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// Identity record in the user directory. Timestamps are unix milliseconds.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: Uuid,
    pub email: String,
    pub status: UserStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_login_at: Option<i64>,
}

/// One issued email-authentication challenge.
#[derive(Debug, Clone)]
pub struct EmailChallenge {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Hex sha-256 of the raw secret bytes. The plaintext never persists.
    pub token_hash: String,
    pub sent_at: i64,
    pub completed: bool,
}

impl EmailChallenge {
    /// A challenge is still within its window at exactly `expiry_secs` of
    /// age; it expires one millisecond later.
    pub fn is_expired(&self, now_ms: i64, expiry_secs: i64) -> bool {
        now_ms - self.sent_at > expiry_secs * 1000
    }
}

/// Permission level of a service grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantPermission {
    User,
    SuperUser,
}

impl GrantPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::SuperUser => "SUPER_USER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Self::User),
            "SUPER_USER" => Some(Self::SuperUser),
            _ => None,
        }
    }
}

/// Access grant tying a user to a named downstream service.
#[derive(Debug, Clone)]
pub struct ServiceGrant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service: String,
    pub permission: GrantPermission,
    pub expires_at: Option<i64>,
}

/// Service a freshly created user is granted when the request names none.
pub const DEFAULT_GRANT_SERVICE: &str = "portal";

/// Validate an email address: one `@`, a non-empty local part of
/// `[A-Za-z0-9._%+-]`, a domain of `[A-Za-z0-9.-]` ending in an alphabetic
/// top-level label of at least two characters.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
