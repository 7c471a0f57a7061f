//! Account plan tiers, roles, and provisioning defaults.
//!
//! Profiles are created by the identity layer on first authenticated sight,
//! never by the generation pipeline. Credits are only ever mutated through
//! the relational store's atomic decrement; the constants here cover the
//! initial grant and the fallback identity fields used at provisioning time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::AccountId;

// ---------------------------------------------------------------------------
// Provisioning defaults
// ---------------------------------------------------------------------------

/// Credits granted to a newly provisioned account.
pub const INITIAL_CREDITS: i32 = 50;

/// Display name used when the identity provider supplies none.
pub const DEFAULT_FULL_NAME: &str = "Creator";

/// Fallback username derived from the account id: `user_` plus the first
/// five characters of the UUID.
pub fn fallback_username(account_id: AccountId) -> String {
    let id = account_id.to_string();
    format!("user_{}", &id[..5])
}

/// Deterministic seeded avatar URL for accounts that arrive without one.
pub fn seeded_avatar_url(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={seed}")
}

// ---------------------------------------------------------------------------
// Plan tiers
// ---------------------------------------------------------------------------

/// Subscription plan tier. Closed set; monthly credit resets are driven by
/// the billing system, outside this codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Creator,
    Pro,
}

impl PlanTier {
    /// Lowercase database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Creator => "creator",
            PlanTier::Pro => "pro",
        }
    }

    /// Parse the lowercase database representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "free" => Ok(PlanTier::Free),
            "creator" => Ok(PlanTier::Creator),
            "pro" => Ok(PlanTier::Pro),
            other => Err(CoreError::Validation(format!(
                "Invalid plan tier '{other}'. Must be one of: free, creator, pro"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Lowercase database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse the lowercase database representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: user, admin"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_tier_round_trips() {
        for tier in [PlanTier::Free, PlanTier::Creator, PlanTier::Pro] {
            assert_eq!(PlanTier::parse(tier.as_str()).unwrap(), tier);
        }
    }

    #[test]
    fn plan_tier_rejects_unknown() {
        assert!(PlanTier::parse("enterprise").is_err());
    }

    #[test]
    fn role_round_trips() {
        assert_eq!(Role::parse("user").unwrap(), Role::User);
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn fallback_username_uses_id_prefix() {
        let id: AccountId = "6f9619ff-8b86-d011-b42d-00c04fc964ff".parse().unwrap();
        assert_eq!(fallback_username(id), "user_6f961");
    }

    #[test]
    fn seeded_avatar_url_embeds_seed() {
        assert!(seeded_avatar_url("creator_42").ends_with("?seed=creator_42"));
    }
}
