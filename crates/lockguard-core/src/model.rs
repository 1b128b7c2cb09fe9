//! Declared protection models.

use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtectionModel {
    /// Sections live in the registry only; none may be embedded.
    ReferenceBased,
    Hybrid,
    /// At least one embedded section is required.
    Embedded,
}

impl ProtectionModel {
    pub const ALL: [ProtectionModel; 3] = [
        ProtectionModel::ReferenceBased,
        ProtectionModel::Hybrid,
        ProtectionModel::Embedded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectionModel::ReferenceBased => "reference-based",
            ProtectionModel::Hybrid => "hybrid",
            ProtectionModel::Embedded => "embedded",
        }
    }

    pub fn requires_registry(&self) -> bool {
        matches!(
            self,
            ProtectionModel::ReferenceBased | ProtectionModel::Hybrid
        )
    }

    pub fn forbids_sections(&self) -> bool {
        matches!(self, ProtectionModel::ReferenceBased)
    }

    pub fn requires_sections(&self) -> bool {
        matches!(self, ProtectionModel::Embedded)
    }

    /// `reference-based, hybrid, embedded`
    pub fn expected_list() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ProtectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protection_model '{0}'")]
pub struct UnknownModel(pub String);

impl FromStr for ProtectionModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_declared(s);
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or(UnknownModel(normalized))
    }
}

/// Strip whitespace and surrounding quotes, lower-case.
pub fn normalize_declared(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_mixed_case() {
        assert_eq!(
            "\"Reference-Based\"".parse::<ProtectionModel>(),
            Ok(ProtectionModel::ReferenceBased)
        );
        assert_eq!(
            "'hybrid'".parse::<ProtectionModel>(),
            Ok(ProtectionModel::Hybrid)
        );
        assert_eq!(
            " EMBEDDED ".parse::<ProtectionModel>(),
            Ok(ProtectionModel::Embedded)
        );
    }

    #[test]
    fn rejects_unknown_models() {
        let err = "inline".parse::<ProtectionModel>().unwrap_err();
        assert_eq!(err, UnknownModel("inline".into()));
    }

    #[test]
    fn registry_requirement() {
        assert!(ProtectionModel::ReferenceBased.requires_registry());
        assert!(ProtectionModel::Hybrid.requires_registry());
        assert!(!ProtectionModel::Embedded.requires_registry());
        assert_eq!(
            ProtectionModel::expected_list(),
            "reference-based, hybrid, embedded"
        );
    }
}
