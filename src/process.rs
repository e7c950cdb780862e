//! How a synthesized crew schedules its tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task scheduling for a crew. Only in-order execution exists: each task
/// starts after the previous one finished and sees every earlier output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    #[default]
    Sequential,
}

impl Process {
    pub fn as_str(&self) -> &'static str {
        match self {
            Process::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_is_default() {
        assert_eq!(Process::default(), Process::Sequential);
        assert_eq!(
            serde_json::to_string(&Process::Sequential).unwrap(),
            "\"sequential\""
        );
    }
}
