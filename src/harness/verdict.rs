//! Verdicts and their reconciliation into a per-test classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire code the DUT sends for a passed test.
pub const VERDICT_OK: u32 = 0x00;
/// Wire code the DUT sends for a failed test.
pub const VERDICT_NOK: u32 = 0x01;

/// Binary judgement from either side of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Ok,
    Nok,
}

impl Verdict {
    /// Map a remote signal value; unknown codes are inconclusive.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            VERDICT_OK => Some(Self::Ok),
            VERDICT_NOK => Some(Self::Nok),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Ok => VERDICT_OK,
            Self::Nok => VERDICT_NOK,
        }
    }

    /// `Ok` when `passed`, `Nok` otherwise.
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Self::Ok
        } else {
            Self::Nok
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Nok => write!(f, "NOK"),
        }
    }
}

/// Final result of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Pass,
    Fail,
    /// Inconclusive: the DUT never gave a usable verdict.
    Error,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Combine the local verdict with the (possibly absent) remote one.
///
/// Both OK passes; any NOK fails, including NOK against a silent DUT; a
/// local OK with no remote verdict is inconclusive.
pub fn reconcile(local: Verdict, remote: Option<Verdict>) -> Classification {
    match (local, remote) {
        (Verdict::Ok, Some(Verdict::Ok)) => Classification::Pass,
        (Verdict::Nok, _) | (_, Some(Verdict::Nok)) => Classification::Fail,
        (Verdict::Ok, None) => Classification::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciliation_table() {
        use Classification::*;
        use Verdict::*;

        let table = [
            (Ok, Some(Ok), Pass),
            (Ok, Some(Nok), Fail),
            (Nok, Some(Ok), Fail),
            (Nok, Some(Nok), Fail),
            (Ok, None, Error),
            (Nok, None, Fail),
        ];
        for (local, remote, expected) in table {
            assert_eq!(reconcile(local, remote), expected, "{local:?}/{remote:?}");
        }
    }

    #[test]
    fn test_code_table() {
        assert_eq!(Verdict::from_code(0x00), Some(Verdict::Ok));
        assert_eq!(Verdict::from_code(0x01), Some(Verdict::Nok));
        assert_eq!(Verdict::from_code(0x02), None);
        assert_eq!(Verdict::from_code(255), None);
        assert_eq!(Verdict::Nok.code(), 1);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Classification::Error.to_string(), "ERROR");
        assert_eq!(Verdict::Nok.to_string(), "NOK");
        assert_eq!(
            serde_json::to_string(&Classification::Pass).unwrap(),
            "\"PASS\""
        );
        assert_eq!(Verdict::from_bool(false), Verdict::Nok);
    }
}
