//! Field visibility
//!
//! Strips hidden fields from records returned to a caller. Hiding is
//! applied after a page is assembled, so cursors and links are always
//! built from full records and stay valid for every role.
//!
//! The service role bypasses every rule.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::executor::{Document, PageResult};

/// Who is reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    Authenticated,
    /// Bypasses visibility rules
    Service,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::Authenticated => "authenticated",
            Role::Service => "service",
        }
    }

    pub fn can_bypass(&self) -> bool {
        matches!(self, Role::Service)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anonymous" | "anon" => Ok(Role::Anonymous),
            "authenticated" => Ok(Role::Authenticated),
            "service" => Ok(Role::Service),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Hidden fields per collection and role
#[derive(Debug, Clone, Default)]
pub struct VisibilityPolicy {
    hidden: HashMap<(String, Role), BTreeSet<String>>,
}

impl VisibilityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides `fields` of `collection` from `role`. Rules accumulate.
    pub fn hide<I, F>(&mut self, collection: &str, role: Role, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.hidden
            .entry((collection.to_string(), role))
            .or_default()
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Fields hidden from `role`, empty for the service role
    pub fn hidden_fields(&self, collection: &str, role: Role) -> Vec<&str> {
        if role.can_bypass() {
            return Vec::new();
        }
        self.hidden
            .get(&(collection.to_string(), role))
            .map(|fields| fields.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Strips hidden fields from one record
    pub fn apply_document(&self, doc: &mut Document, collection: &str, role: Role) {
        for field in self.hidden_fields(collection, role) {
            doc.remove(field);
        }
    }

    /// Strips hidden fields from every record of a page. Links are untouched.
    pub fn apply_page(&self, page: &mut PageResult, collection: &str, role: Role) {
        let hidden = self.hidden_fields(collection, role);
        if hidden.is_empty() {
            return;
        }
        for record in &mut page.records {
            for field in &hidden {
                record.remove(field);
            }
        }
    }
}
