//! Validated instance names
//!
//! An instance name identifies one solver invocation ("component" or the
//! final composite) within a compilation. Names are checked once, when a
//! space is constructed, so lookups downstream never see an empty or padded
//! name.

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct InstanceName(String);

impl InstanceName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::malformed(name, "instance name must not be empty"));
        }
        if name.trim() != name {
            return Err(EngineError::malformed(
                name.clone(),
                "instance name must not carry surrounding whitespace",
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InstanceName {
    type Error = EngineError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<InstanceName> for String {
    fn from(name: InstanceName) -> Self {
        name.0
    }
}

impl Borrow<str> for InstanceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InstanceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
