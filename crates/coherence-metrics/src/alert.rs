//! Advisory alerts derived from a [`MetricsResult`](crate::MetricsResult).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One advisory message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "alert", rename_all = "snake_case")]
pub enum Alert {
    /// Depth above `alerts.max_depth`.
    HighDepth { depth: usize, limit: usize },
    /// Fidelity below `alerts.min_fidelity`.
    LowFidelity { fidelity: f64, limit: f64 },
    /// QES below `alerts.min_qes`.
    LowQes { qes: f64, limit: f64 },
    /// More two-qubit gates than `alerts.max_two_qubit`.
    ManyTwoQubitGates { count: usize, limit: usize },
    /// No threshold crossed.
    NoIssues,
}

impl Alert {
    /// Whether this alert reports a problem.
    pub fn is_issue(&self) -> bool {
        !matches!(self, Alert::NoIssues)
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::HighDepth { limit, .. } => write!(f, "Circuit depth is very high (>{limit})"),
            Alert::LowFidelity { limit, .. } => {
                write!(f, "Estimated fidelity is low (<{:.0}%)", limit * 100.0)
            }
            Alert::LowQes { limit, .. } => {
                write!(f, "Quantum efficiency score is low (<{limit})")
            }
            Alert::ManyTwoQubitGates { limit, .. } => {
                write!(f, "Many two-qubit gates detected (>{limit})")
            }
            Alert::NoIssues => write!(f, "No significant issues detected"),
        }
    }
}
