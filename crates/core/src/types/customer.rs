//! Customer classification.

use serde::{Deserialize, Serialize};

/// Whether a customer is a natural person or a company.
///
/// Serialized as `"PF"` / `"PJ"`, the Brazilian shorthand for *pessoa física*
/// (identified by CPF) and *pessoa jurídica* (identified by CNPJ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerKind {
    /// Individual, identified by CPF.
    Pf,
    /// Company, identified by CNPJ.
    Pj,
}

impl CustomerKind {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pf => "PF",
            Self::Pj => "PJ",
        }
    }
}

impl std::fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `PF` nor `PJ`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid customer type: {0}")]
pub struct CustomerKindError(pub String);

impl std::str::FromStr for CustomerKind {
    type Err = CustomerKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PF" => Ok(Self::Pf),
            "PJ" => Ok(Self::Pj),
            _ => Err(CustomerKindError(s.to_owned())),
        }
    }
}
