use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::SimError;

/// Optimizer selected in the parameter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    Adam,
    Rmsprop,
    Adagrad,
}

impl OptimizerKind {
    pub const ALL: [OptimizerKind; 4] = [
        OptimizerKind::Sgd,
        OptimizerKind::Adam,
        OptimizerKind::Rmsprop,
        OptimizerKind::Adagrad,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptimizerKind::Sgd     => "sgd",
            OptimizerKind::Adam    => "adam",
            OptimizerKind::Rmsprop => "rmsprop",
            OptimizerKind::Adagrad => "adagrad",
        }
    }

    /// Name as shown in the UI ("RMSprop", not "rmsprop").
    pub fn display_name(self) -> &'static str {
        match self {
            OptimizerKind::Sgd     => "SGD",
            OptimizerKind::Adam    => "Adam",
            OptimizerKind::Rmsprop => "RMSprop",
            OptimizerKind::Adagrad => "Adagrad",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizerKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sgd"     => Ok(OptimizerKind::Sgd),
            "adam"    => Ok(OptimizerKind::Adam),
            "rmsprop" => Ok(OptimizerKind::Rmsprop),
            "adagrad" => Ok(OptimizerKind::Adagrad),
            other => Err(SimError::invalid(format!("unknown optimizer '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ui_spellings() {
        assert_eq!("RMSprop".parse::<OptimizerKind>().unwrap(), OptimizerKind::Rmsprop);
        assert_eq!(" SGD ".parse::<OptimizerKind>().unwrap(), OptimizerKind::Sgd);
        assert!("lbfgs".parse::<OptimizerKind>().is_err());
    }

    #[test]
    fn all_lists_every_optimizer_once() {
        let names: Vec<&str> = OptimizerKind::ALL.iter().map(|o| o.as_str()).collect();
        assert_eq!(names, vec!["sgd", "adam", "rmsprop", "adagrad"]);
        for o in OptimizerKind::ALL {
            assert_eq!(o.display_name().parse::<OptimizerKind>().unwrap(), o);
        }
    }
}
