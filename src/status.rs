use crate::scrape::ValidationOutcome;
use std::fmt;

/// A reason for the unit to be blocked, in order of priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockedReason {
    NoTargets,
    InvalidTargets,
    InvalidScheme,
    InvalidCertificate,
}

impl BlockedReason {
    pub fn message(&self) -> &'static str {
        match self {
            BlockedReason::NoTargets => "No targets.",
            BlockedReason::InvalidTargets => "Invalid targets found (see logs).",
            BlockedReason::InvalidScheme => "Invalid `scheme` provided.",
            BlockedReason::InvalidCertificate => {
                "Invalid certificate provided for `tls_ca_cert`."
            }
        }
    }
}

/// The health of the unit as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Active,
    /// Every reason that applies, sorted by priority.
    Blocked(Vec<BlockedReason>),
}

impl Status {
    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        let checks = [
            (outcome.valid_targets.is_empty(), BlockedReason::NoTargets),
            (
                !outcome.invalid_targets.is_empty(),
                BlockedReason::InvalidTargets,
            ),
            (!outcome.scheme_valid, BlockedReason::InvalidScheme),
            (!outcome.ca_valid, BlockedReason::InvalidCertificate),
        ];

        let reasons: Vec<_> = checks
            .into_iter()
            .filter_map(|(applies, reason)| applies.then_some(reason))
            .collect();

        if reasons.is_empty() {
            Status::Active
        } else {
            Status::Blocked(reasons)
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Status::Active)
    }

    /// The status message, empty when active.
    pub fn message(&self) -> String {
        match self {
            Status::Active => String::new(),
            Status::Blocked(reasons) => reasons
                .iter()
                .map(BlockedReason::message)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("active"),
            Status::Blocked(_) => write!(f, "blocked: {}", self.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outcome(valid: &[&str], invalid: &[&str]) -> ValidationOutcome {
        ValidationOutcome {
            valid_targets: valid.iter().map(|s| s.to_string()).collect(),
            invalid_targets: invalid.iter().map(|s| s.to_string()).collect(),
            scheme_valid: true,
            ca_valid: true,
        }
    }

    #[test]
    fn active_when_everything_is_valid() {
        let status = Status::from_outcome(&outcome(&["foo:1234"], &[]));
        assert_eq!(Status::Active, status);
        assert_eq!("", status.message());
        assert_eq!("active", status.to_string());
    }

    #[test]
    fn no_targets() {
        let status = Status::from_outcome(&outcome(&[], &[]));
        assert_eq!(Status::Blocked(vec![BlockedReason::NoTargets]), status);
    }

    #[test]
    fn only_invalid_targets() {
        let status = Status::from_outcome(&outcome(&[], &["https://foo:1234"]));
        assert_eq!(
            Status::Blocked(vec![
                BlockedReason::NoTargets,
                BlockedReason::InvalidTargets
            ]),
            status
        );
    }

    #[test]
    fn reports_every_reason_in_priority_order() {
        let status = Status::from_outcome(&ValidationOutcome {
            scheme_valid: false,
            ca_valid: false,
            ..outcome(&["foo:1234"], &["foo:99999"])
        });

        assert_eq!(
            "Invalid targets found (see logs). Invalid `scheme` provided. \
             Invalid certificate provided for `tls_ca_cert`.",
            status.message()
        );
        assert!(!status.is_active());
    }
}
