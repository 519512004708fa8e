//! Who is liking an item.

use std::fmt;

/// Identity a like is recorded under.
///
/// Authenticated callers are always tracked by user id. Anonymous callers
/// carry a key produced by the configured [`IdentityStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    User(i32),
    Anonymous(String),
}

impl Identity {
    pub fn user_id(&self) -> Option<i32> {
        match self {
            Identity::User(id) => Some(*id),
            Identity::Anonymous(_) => None,
        }
    }

    pub fn anonymous_key(&self) -> Option<&str> {
        match self {
            Identity::User(_) => None,
            Identity::Anonymous(key) => Some(key),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user:{}", id),
            Identity::Anonymous(key) => write!(f, "anon:{}", key),
        }
    }
}

/// How an anonymous caller is recognized across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// Client IP address (forwarded headers honored only behind a trusted proxy)
    ClientIp,
    /// Opaque token the client sends in `X-Client-Token`
    ClientToken,
}

impl IdentityStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "client-ip" | "ip" => Some(IdentityStrategy::ClientIp),
            "client-token" | "token" => Some(IdentityStrategy::ClientToken),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityStrategy::ClientIp => "client-ip",
            IdentityStrategy::ClientToken => "client-token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(IdentityStrategy::parse("client-ip"), Some(IdentityStrategy::ClientIp));
        assert_eq!(
            IdentityStrategy::parse(" Client-Token "),
            Some(IdentityStrategy::ClientToken)
        );
        assert_eq!(IdentityStrategy::parse("cookie"), None);
    }

    #[test]
    fn test_identity_accessors() {
        let user = Identity::User(5);
        let anon = Identity::Anonymous("10.0.0.1".into());

        assert_eq!(user.user_id(), Some(5));
        assert_eq!(user.anonymous_key(), None);
        assert_eq!(anon.user_id(), None);
        assert_eq!(anon.anonymous_key(), Some("10.0.0.1"));
        assert_eq!(anon.to_string(), "anon:10.0.0.1");
    }
}
