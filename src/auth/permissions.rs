// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission scopes and the permission check.

use serde::{Deserialize, Serialize};

use super::{AuthError, DecodedToken};

/// Permission scopes understood by the drink menu API.
///
/// The identity provider grants these through RBAC and lists them in the
/// token's `permissions` claim.
///
/// - `GetDrinksDetail` - read drinks including ingredient names
/// - `PostDrinks` - add drinks to the menu
/// - `PatchDrinks` - edit drinks
/// - `DeleteDrinks` - remove drinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "get:drinks-detail")]
    GetDrinksDetail,
    #[serde(rename = "post:drinks")]
    PostDrinks,
    #[serde(rename = "patch:drinks")]
    PatchDrinks,
    #[serde(rename = "delete:drinks")]
    DeleteDrinks,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::GetDrinksDetail,
        Permission::PostDrinks,
        Permission::PatchDrinks,
        Permission::DeleteDrinks,
    ];

    /// The scope string as it appears in the `permissions` claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::GetDrinksDetail => "get:drinks-detail",
            Permission::PostDrinks => "post:drinks",
            Permission::PatchDrinks => "patch:drinks",
            Permission::DeleteDrinks => "delete:drinks",
        }
    }

    /// Parse a scope string. Matching is exact, scopes are case-sensitive.
    pub fn from_str(s: &str) -> Option<Permission> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confirm that `token` grants `required`.
///
/// A token without any `permissions` claim is a malformed grant (400);
/// a token whose claim lacks the scope is forbidden (403).
pub fn check_permission(required: &str, token: &DecodedToken) -> Result<(), AuthError> {
    let granted = token.permissions().ok_or(AuthError::PermissionsMissing)?;

    if !granted.iter().any(|p| p == required) {
        return Err(AuthError::PermissionDenied);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::test_token;

    #[test]
    fn scope_strings_round_trip() {
        for permission in Permission::ALL {
            assert_eq!(Permission::from_str(permission.as_str()), Some(permission));
        }
        assert_eq!(Permission::from_str("GET:DRINKS-DETAIL"), None);
        assert_eq!(Permission::from_str("get:drinks"), None);
    }

    #[test]
    fn serde_uses_scope_strings() {
        let json = serde_json::to_string(&Permission::PatchDrinks).unwrap();
        assert_eq!(json, r#""patch:drinks""#);
        let parsed: Permission = serde_json::from_str(r#""delete:drinks""#).unwrap();
        assert_eq!(parsed, Permission::DeleteDrinks);
    }

    #[test]
    fn granted_permission_passes() {
        let token = test_token(Some(&["get:drinks-detail", "post:drinks"]));
        assert_eq!(check_permission("post:drinks", &token), Ok(()));
    }

    #[test]
    fn absent_permission_is_denied() {
        let token = test_token(Some(&["get:drinks-detail"]));
        assert_eq!(
            check_permission("delete:drinks", &token),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn empty_permission_list_is_denied_not_missing() {
        let token = test_token(Some(&[]));
        assert_eq!(
            check_permission("patch:drinks", &token),
            Err(AuthError::PermissionDenied)
        );
    }

    #[test]
    fn missing_claim_is_invalid() {
        let token = test_token(None);
        assert_eq!(
            check_permission("patch:drinks", &token),
            Err(AuthError::PermissionsMissing)
        );
    }
}
