//! Predicate instances as listed in a solver artifact's mapping table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Solver-assigned predicate id (unique within one solution space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateId(pub u32);

impl From<u32> for PredicateId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Legal category of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    Act,
    Fact,
    Claim,
    Obligation,
    Prohibition,
}

impl PredicateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateKind::Act => "act",
            PredicateKind::Fact => "fact",
            PredicateKind::Claim => "claim",
            PredicateKind::Obligation => "obligation",
            PredicateKind::Prohibition => "prohibition",
        }
    }

    /// Naming-convention fallback for artifacts that omit the kind
    pub fn infer_from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("claim") {
            PredicateKind::Claim
        } else if lower.starts_with("forbid") || lower.starts_with("prohibit") {
            PredicateKind::Prohibition
        } else {
            PredicateKind::Act
        }
    }
}

impl FromStr for PredicateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "act" => Ok(PredicateKind::Act),
            "fact" => Ok(PredicateKind::Fact),
            "claim" => Ok(PredicateKind::Claim),
            "obligation" => Ok(PredicateKind::Obligation),
            "prohibition" => Ok(PredicateKind::Prohibition),
            other => Err(format!(
                "Unknown predicate kind '{}'. Valid kinds: act, fact, claim, obligation, prohibition",
                other
            )),
        }
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named predicate instance with its argument binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub id: PredicateId,
    pub name: String,
    pub kind: PredicateKind,
    pub arguments: Vec<String>,
    /// Solver rendering, e.g. `pay_rent(tenant, landlord)`
    pub full_expression: String,
}

impl Predicate {
    /// Create a predicate whose expression is rendered from its arguments
    pub fn new(
        id: impl Into<PredicateId>,
        name: impl Into<String>,
        kind: PredicateKind,
        arguments: Vec<String>,
    ) -> Self {
        let name = name.into();
        let full_expression = render_expression(&name, &arguments);
        Self {
            id: id.into(),
            name,
            kind,
            arguments,
            full_expression,
        }
    }

    /// Replace the rendered expression with the solver's own
    pub fn with_expression(mut self, full_expression: impl Into<String>) -> Self {
        self.full_expression = full_expression.into();
        self
    }
}

/// `name(arg1, arg2)`; a bare `name` when there are no arguments
pub fn render_expression(name: &str, arguments: &[String]) -> String {
    if arguments.is_empty() {
        name.to_string()
    } else {
        format!("{}({})", name, arguments.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("obligation".parse::<PredicateKind>().unwrap(), PredicateKind::Obligation);
        assert_eq!("Claim".parse::<PredicateKind>().unwrap(), PredicateKind::Claim);
        assert!("duty".parse::<PredicateKind>().is_err());
    }

    #[test]
    fn test_kind_inference() {
        assert_eq!(PredicateKind::infer_from_name("damages_claim"), PredicateKind::Claim);
        assert_eq!(PredicateKind::infer_from_name("forbid_sublet"), PredicateKind::Prohibition);
        assert_eq!(PredicateKind::infer_from_name("pay_rent"), PredicateKind::Act);
    }

    #[test]
    fn test_rendered_expression() {
        let p = Predicate::new(1, "pay_rent", PredicateKind::Obligation, vec![
            "tenant".to_string(),
            "landlord".to_string(),
        ]);
        assert_eq!(p.full_expression, "pay_rent(tenant, landlord)");

        let bare = Predicate::new(2, "lease_signed", PredicateKind::Fact, vec![]);
        assert_eq!(bare.full_expression, "lease_signed");
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&PredicateKind::Prohibition).unwrap();
        assert_eq!(json, "\"prohibition\"");
    }
}
