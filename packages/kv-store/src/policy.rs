//! Write policies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a write reaches durable storage.
///
/// Both policies make the write visible to readers of the same store before
/// returning. They differ only in when the write becomes durable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Block until the store confirms the write is durable.
    Immediate,

    /// Return as soon as the write is visible; the store flushes later.
    #[default]
    Deferred,
}

impl WritePolicy {
    /// Map a "commit by default" flag to a policy.
    pub fn from_commit_flag(commit: bool) -> Self {
        if commit {
            WritePolicy::Immediate
        } else {
            WritePolicy::Deferred
        }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self, WritePolicy::Immediate)
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::Immediate => write!(f, "immediate"),
            WritePolicy::Deferred => write!(f, "deferred"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_flag_maps_to_policy() {
        assert_eq!(WritePolicy::from_commit_flag(true), WritePolicy::Immediate);
        assert_eq!(WritePolicy::from_commit_flag(false), WritePolicy::Deferred);
        assert!(WritePolicy::Immediate.is_immediate());
        assert!(!WritePolicy::Deferred.is_immediate());
    }

    #[test]
    fn default_is_deferred() {
        assert_eq!(WritePolicy::default(), WritePolicy::Deferred);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&WritePolicy::Immediate).unwrap();
        assert_eq!(json, "\"immediate\"");

        let policy: WritePolicy = serde_json::from_str("\"deferred\"").unwrap();
        assert_eq!(policy, WritePolicy::Deferred);
    }

    #[test]
    fn display_impl() {
        assert_eq!(format!("{}", WritePolicy::Immediate), "immediate");
        assert_eq!(format!("{}", WritePolicy::Deferred), "deferred");
    }
}
