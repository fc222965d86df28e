//! Coarse classification of transfer failures
//!
//! The exchange reports failures as free text, so this is a substring match.
//! Checks run in a fixed order and the first hit wins.

/// Likely cause of a failed transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    AddressFormat,
    InsufficientBalance,
    RecipientNotFound,
    InvalidParameter,
}

impl FailureKind {
    /// Short hint shown under the failed attempt
    pub fn hint(&self) -> &'static str {
        match self {
            FailureKind::AddressFormat => "Address format issue",
            FailureKind::InsufficientBalance => "Insufficient balance",
            FailureKind::RecipientNotFound => "Recipient not registered",
            FailureKind::InvalidParameter => "Invalid parameter format",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hint())
    }
}

pub fn classify(message: &str) -> Option<FailureKind> {
    if message.contains("Failed to parse user address") {
        return Some(FailureKind::AddressFormat);
    }

    let lower = message.to_lowercase();
    if lower.contains("insufficient") {
        Some(FailureKind::InsufficientBalance)
    } else if lower.contains("not found") {
        Some(FailureKind::RecipientNotFound)
    } else if lower.contains("invalid") {
        Some(FailureKind::InvalidParameter)
    } else {
        None
    }
}
