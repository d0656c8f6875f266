//! Build contexts
//!
//! A context is one resolved build variant with its own compiled-source set.
//! Its project type is fixed at creation; a TrustZone project is resolved as a
//! secure and a non-secure sub-context, each described by its own descriptor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Context identifier, usually in `project.build+target` form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project part of the id: everything before the first `.` or `+`.
    pub fn project(&self) -> &str {
        let end = self.0.find(['.', '+']).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContextId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Solution/project type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "single-core")]
    SingleCore,
    #[serde(rename = "multi-core")]
    MultiCore,
    #[serde(rename = "trustzone")]
    TrustZone,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::SingleCore => "single-core",
            ProjectType::MultiCore => "multi-core",
            ProjectType::TrustZone => "trustzone",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-core" => Ok(ProjectType::SingleCore),
            "multi-core" => Ok(ProjectType::MultiCore),
            "trustzone" => Ok(ProjectType::TrustZone),
            _ => Err(format!(
                "Invalid project type: {} (must be 'single-core', 'multi-core' or 'trustzone')",
                s
            )),
        }
    }
}

/// Which half of a TrustZone project a sub-context builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Security {
    #[serde(rename = "secure")]
    Secure,
    #[serde(rename = "non-secure")]
    NonSecure,
}

impl Security {
    pub fn as_str(&self) -> &'static str {
        match self {
            Security::Secure => "secure",
            Security::NonSecure => "non-secure",
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context descriptor handed over by the upstream resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescriptor {
    pub id: ContextId,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    /// Set only on the sub-contexts of a TrustZone project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
    /// Extra template variables available to `gen-dir` / `run-cmd`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, String>,
}

impl ContextDescriptor {
    pub fn new(id: impl Into<ContextId>, project_type: ProjectType) -> Self {
        Self {
            id: id.into(),
            project_type,
            security: None,
            vars: BTreeMap::new(),
        }
    }

    /// Both halves of a TrustZone project.
    pub fn trustzone_pair(
        secure_id: impl Into<ContextId>,
        non_secure_id: impl Into<ContextId>,
    ) -> (Self, Self) {
        let mut secure = Self::new(secure_id, ProjectType::TrustZone);
        secure.security = Some(Security::Secure);
        let mut non_secure = Self::new(non_secure_id, ProjectType::TrustZone);
        non_secure.security = Some(Security::NonSecure);
        (secure, non_secure)
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// A security qualifier only makes sense on a TrustZone context.
    pub fn is_consistent(&self) -> bool {
        self.security.is_none() || self.project_type == ProjectType::TrustZone
    }
}
