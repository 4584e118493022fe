//! Evaluation and audition result records

use crate::bands::Band;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Issue urgency, ordered so that `High` compares greatest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

/// A single problem found in a mix or track, with remedial advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Taxonomy tag such as "mud", "harshness" or "role_conflict"
    pub category: String,
    pub severity: Severity,
    pub band: Option<Band>,
    pub message: String,
    pub suggestion: String,
}

impl Issue {
    pub fn new(
        category: impl Into<String>,
        severity: Severity,
        band: Option<Band>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            severity,
            band,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// Musical role of an isolated track
///
/// Unrecognized names are carried verbatim in `Other`; callers that accept
/// user input should check [`Role::is_recognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Bass,
    Lead,
    Pad,
    Percussion,
    Texture,
    Other(String),
}

impl Role {
    /// Names of the recognized roles
    pub const RECOGNIZED: [&'static str; 5] = ["bass", "lead", "pad", "percussion", "texture"];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Bass => "bass",
            Role::Lead => "lead",
            Role::Pad => "pad",
            Role::Percussion => "percussion",
            Role::Texture => "texture",
            Role::Other(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Other(_))
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        match name {
            "bass" => Role::Bass,
            "lead" => Role::Lead,
            "pad" => Role::Pad,
            "percussion" => Role::Percussion,
            "texture" => Role::Texture,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role::from(name.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a mix against a style profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub style: String,
    /// 0-100, one decimal
    pub cohesion_score: f64,
    pub issues: Vec<Issue>,
    /// Per-band score 0-100, one decimal
    pub band_scores: BTreeMap<Band, f64>,
}

impl EvaluationResult {
    /// Issues ordered most urgent first; ties keep their original order
    pub fn issues_by_severity(&self) -> Vec<&Issue> {
        let mut issues: Vec<&Issue> = self.issues.iter().collect();
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        issues
    }
}

/// Result of auditioning an isolated track for a role within a style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditionResult {
    pub style: String,
    pub role: Role,
    /// 0-100, one decimal
    pub fit_score: f64,
    /// Highest-energy bands covering 70% of the total, strongest first
    pub dominant_bands: Vec<Band>,
    /// Band → share of total band energy
    pub frequency_profile: BTreeMap<Band, f64>,
    pub issues: Vec<Issue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_role_parsing_keeps_unknown_names() {
        assert_eq!(Role::from("bass"), Role::Bass);
        assert_eq!(Role::from("vocal"), Role::Other("vocal".to_string()));
        assert!(!Role::from("vocal").is_recognized());
        for name in Role::RECOGNIZED {
            assert!(Role::from(name).is_recognized());
            assert_eq!(Role::from(name).as_str(), name);
        }
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Role::Percussion).unwrap(), "\"percussion\"");
        let role: Role = serde_json::from_str("\"texture\"").unwrap();
        assert_eq!(role, Role::Texture);
    }

    #[test]
    fn test_issues_by_severity_is_stable() {
        let issue = |category: &str, severity| Issue::new(category, severity, None, "", "");
        let result = EvaluationResult {
            style: "test".to_string(),
            cohesion_score: 50.0,
            issues: vec![
                issue("a", Severity::Low),
                issue("b", Severity::High),
                issue("c", Severity::Medium),
                issue("d", Severity::High),
            ],
            band_scores: BTreeMap::new(),
        };

        let order: Vec<&str> = result
            .issues_by_severity()
            .into_iter()
            .map(|i| i.category.as_str())
            .collect();
        assert_eq!(order, vec!["b", "d", "c", "a"]);
    }
}
