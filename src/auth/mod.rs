// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT authorization for the drink menu API.
//!
//! ## Auth Flow
//!
//! 1. The barista/manager frontend logs in with the identity provider
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Fetches the provider's JWKS via HTTPS (cached with TTL)
//!    - Verifies the RS256 signature, expiry, issuer and audience
//!    - Checks the route's scope against the `permissions` claim
//!    - Hands the decoded claims to the handler
//!
//! ## Error Codes
//!
//! | Code | Status | Cause |
//! |------|--------|-------|
//! | `authorization_header_missing` | 401 | no header |
//! | `invalid_header` | 401 | bad header shape, bad token, unknown key |
//! | `invalid_header` | 400 | JWKS unavailable, unusable key |
//! | `token_expired` | 401 | `exp` in the past |
//! | `invalid_claims` | 401 | issuer/audience mismatch |
//! | `invalid_claims` | 400 | no `permissions` claim |
//! | `unauthorized` | 403 | scope not granted |

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod permissions;
pub mod verifier;

pub use claims::{Audience, DecodedToken};
pub use error::AuthError;
pub use extractor::Verified;
pub use jwks::JwksManager;
pub use middleware::{require_permission, PermissionGuard};
pub use permissions::{check_permission, Permission};
pub use verifier::{bearer_token, TokenVerifier};
