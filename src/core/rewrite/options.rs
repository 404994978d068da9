use serde::{Deserialize, Serialize};

/// Literal text placed between the session id and the original message.
pub const SEPARATOR: &str = " | ";

pub const DEFAULT_RECEIVER: &str = "self";
pub const DEFAULT_LOGGER_ATTRIBUTE: &str = "logger";
pub const DEFAULT_SESSION_ATTRIBUTE: &str = "session_id";
pub const DEFAULT_LEVELS: &[&str] = &["info", "debug", "warning", "error", "success"];

/// Which assignments make a class eligible for rewriting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EligibilityRule {
    /// `self.session_id = ...` inside one of the class's own methods.
    #[default]
    #[serde(alias = "methodsOnly")]
    Methods,
    /// `self.session_id = ...` anywhere below the class definition,
    /// nested classes included.
    ClassBody,
}

/// Names the rewriter matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    pub receiver: String,
    pub logger_attribute: String,
    pub session_attribute: String,
    pub levels: Vec<String>,
    pub eligibility: EligibilityRule,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            receiver: DEFAULT_RECEIVER.to_string(),
            logger_attribute: DEFAULT_LOGGER_ATTRIBUTE.to_string(),
            session_attribute: DEFAULT_SESSION_ATTRIBUTE.to_string(),
            levels: DEFAULT_LEVELS.iter().map(|s| s.to_string()).collect(),
            eligibility: EligibilityRule::default(),
        }
    }
}

impl RewriteOptions {
    pub fn is_level(&self, name: &str) -> bool {
        self.levels.iter().any(|level| level == name)
    }

    /// Source text of the session identifier reference, e.g. `self.session_id`.
    pub fn session_reference(&self) -> String {
        format!("{}.{}", self.receiver, self.session_attribute)
    }
}
