use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::SimError;

/// Activation applied after each hidden layer of the simulated network.
///
/// Only the name matters to the simulator; no forward pass is ever run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Relu,
    Sigmoid,
    Tanh,
    LeakyRelu,
}

impl ActivationKind {
    pub const ALL: [ActivationKind; 4] = [
        ActivationKind::Relu,
        ActivationKind::Sigmoid,
        ActivationKind::Tanh,
        ActivationKind::LeakyRelu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivationKind::Relu      => "relu",
            ActivationKind::Sigmoid   => "sigmoid",
            ActivationKind::Tanh      => "tanh",
            ActivationKind::LeakyRelu => "leaky_relu",
        }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivationKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu"                     => Ok(ActivationKind::Relu),
            "sigmoid"                  => Ok(ActivationKind::Sigmoid),
            "tanh"                     => Ok(ActivationKind::Tanh),
            "leaky_relu" | "leakyrelu" => Ok(ActivationKind::LeakyRelu),
            other => Err(SimError::invalid(format!("unknown activation '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("ReLU".parse::<ActivationKind>().unwrap(), ActivationKind::Relu);
        assert_eq!("LeakyReLU".parse::<ActivationKind>().unwrap(), ActivationKind::LeakyRelu);
        assert!("softplus".parse::<ActivationKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for a in ActivationKind::ALL {
            assert_eq!(a.to_string().parse::<ActivationKind>().unwrap(), a);
        }
    }
}
