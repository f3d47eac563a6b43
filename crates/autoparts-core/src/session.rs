//! # Session Context
//!
//! The signed-in user and the company profile, as one explicit object.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  restore(user blob, companyInfo blob)                                  │
//! │     │   missing or unreadable blob → no user / default company         │
//! │     ▼                                                                   │
//! │  Session { user, company }                                              │
//! │     │                                                                   │
//! │     ├── sign_in(user)        → persist "user"                           │
//! │     ├── update_company(p)    → persist "companyInfo"                    │
//! │     └── sign_out()           → remove "user"                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The blobs are JSON; this module only encodes and decodes them; storage
//! lives in the data layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::{CompanyProfile, User};
use crate::validation::validate_company_name;

/// Key of the signed-in user blob.
pub const USER_KEY: &str = "user";

/// Key of the company profile blob.
pub const COMPANY_KEY: &str = "companyInfo";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub user: Option<User>,
    pub company: CompanyProfile,
}

impl Session {
    /// Rebuilds the session from stored blobs, falling back to defaults.
    pub fn restore(user_blob: Option<&str>, company_blob: Option<&str>) -> Self {
        Session {
            user: user_blob.and_then(|blob| serde_json::from_str(blob).ok()),
            company: company_blob
                .and_then(|blob| serde_json::from_str(blob).ok())
                .unwrap_or_default(),
        }
    }

    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Replaces the company profile; the name is required.
    pub fn update_company(&mut self, profile: CompanyProfile) -> CoreResult<&CompanyProfile> {
        let name = validate_company_name(&profile.name)?;
        self.company = CompanyProfile {
            name,
            logo: profile.logo.trim().to_string(),
        };
        Ok(&self.company)
    }

    /// JSON for the `user` key; `None` when signed out.
    pub fn user_blob(&self) -> serde_json::Result<Option<String>> {
        self.user.as_ref().map(serde_json::to_string).transpose()
    }

    /// JSON for the `companyInfo` key.
    pub fn company_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.company)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
