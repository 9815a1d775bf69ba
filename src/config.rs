use anyhow::{Context as _, Result};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// What a program does once one of its steps has failed.
///
/// Failures are always logged, recorded on the program and returned to the caller; the policy only
/// decides whether the rest of the operation still runs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Keep going: an unreadable file compiles as an empty source, a stage that failed to compile
    /// is still attached, and so on.
    LogAndContinue,
    /// Stop at the first failure and release whatever the failing step allocated.
    FailFast,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::LogAndContinue
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub policy: ErrorPolicy,
    /// Run `glValidateProgram` after a successful link. Validation checks the program against the
    /// current GL state, so it is off unless asked for.
    pub validate: bool,
}

impl ProgramConfig {
    pub fn fail_fast() -> Self {
        ProgramConfig {
            policy: ErrorPolicy::FailFast,
            ..Default::default()
        }
    }

    pub fn is_fail_fast(&self) -> bool {
        self.policy == ErrorPolicy::FailFast
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read program config `{}`", path.display()))?;
        let config = Self::from_ron(&text)
            .with_context(|| format!("failed to parse program config `{}`", path.display()))?;
        log::debug!("loaded program config from `{}`: {:?}", path.display(), config);
        Ok(config)
    }
}
