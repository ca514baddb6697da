//! Authorities (roles) granted to users.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a role name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown authority: {0}")]
pub struct AuthorityParseError(pub String);

/// Role held by a user. Each user holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "pms.authority"))]
pub enum Authority {
    /// Full access to every resource, including user management.
    #[serde(rename = "ROLE_ADMIN")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "ROLE_ADMIN"))]
    Admin,
    /// Regular customer: browse the catalogue and manage their own cart.
    #[default]
    #[serde(rename = "ROLE_USER")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "ROLE_USER"))]
    User,
    /// Manages stocks and the products they hold.
    #[serde(rename = "ROLE_STOCK_MANAGER")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "ROLE_STOCK_MANAGER"))]
    StockManager,
    /// Manages stores and which stocks supply them.
    #[serde(rename = "ROLE_STORE_MANAGER")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "ROLE_STORE_MANAGER"))]
    StoreManager,
}

impl Authority {
    /// Canonical wire name, e.g. `ROLE_ADMIN`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::User => "ROLE_USER",
            Self::StockManager => "ROLE_STOCK_MANAGER",
            Self::StoreManager => "ROLE_STORE_MANAGER",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authority {
    type Err = AuthorityParseError;

    /// Accepts the wire name (`ROLE_STOCK_MANAGER`) or the short form
    /// (`stock_manager`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match short {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "STOCK_MANAGER" => Ok(Self::StockManager),
            "STORE_MANAGER" => Ok(Self::StoreManager),
            _ => Err(AuthorityParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_spellings() {
        assert_eq!("ROLE_ADMIN".parse::<Authority>().unwrap(), Authority::Admin);
        assert_eq!(
            "stock_manager".parse::<Authority>().unwrap(),
            Authority::StockManager
        );
        assert!("janitor".parse::<Authority>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Authority::StoreManager).unwrap();
        assert_eq!(json, "\"ROLE_STORE_MANAGER\"");

        let parsed: Authority = serde_json::from_str("\"ROLE_USER\"").unwrap();
        assert_eq!(parsed, Authority::User);
    }
}
