use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected command-line input for one of the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown environment '{input}' (valid: {valid})")]
    UnknownEnvironment { input: String, valid: String },

    #[error("unknown layer '{input}' (valid: {valid})")]
    UnknownLayer { input: String, valid: String },

    #[error("unknown action '{input}' (valid: {valid})")]
    UnknownAction { input: String, valid: String },
}

/// Deployment target. Each environment is a separate account, credential
/// and remote-state scope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Environment {
    Dev,
    Stage,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Stage, Environment::Prod];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Stage => "stage",
            Environment::Prod => "prod",
        }
    }

    /// Stage and prod require explicit confirmation before state-mutating actions.
    #[must_use]
    pub fn is_protected(self) -> bool {
        !matches!(self, Environment::Dev)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ParseError::UnknownEnvironment {
                input: s.to_string(),
                valid: join(Environment::ALL.iter().map(|e| e.as_str())),
            })
    }
}

/// Logical grouping of resources within an environment.
///
/// Variants are declared in apply order: platform before data before app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Layer {
    Platform,
    Data,
    App,
}

impl Layer {
    /// All layers in dependency order.
    pub const ALL: [Layer; 3] = [Layer::Platform, Layer::Data, Layer::App];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Platform => "platform",
            Layer::Data => "data",
            Layer::App => "app",
        }
    }

    /// Layers that must be applied before this one. Convention only; nothing
    /// enforces it at run time.
    #[must_use]
    pub fn depends_on(self) -> &'static [Layer] {
        match self {
            Layer::Platform => &[],
            Layer::Data => &[Layer::Platform],
            Layer::App => &[Layer::Platform, Layer::Data],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseError::UnknownLayer {
                input: s.to_string(),
                valid: join(Layer::ALL.iter().map(|l| l.as_str())),
            })
    }
}

/// Operation requested against a single root.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Action {
    Init,
    Plan,
    Apply,
    Destroy,
    DriftCheck,
    Format,
    Validate,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Init,
        Action::Plan,
        Action::Apply,
        Action::Destroy,
        Action::DriftCheck,
        Action::Format,
        Action::Validate,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Init => "init",
            Action::Plan => "plan",
            Action::Apply => "apply",
            Action::Destroy => "destroy",
            Action::DriftCheck => "drift-check",
            Action::Format => "format",
            Action::Validate => "validate",
        }
    }

    /// Whether the action changes remote infrastructure.
    #[must_use]
    pub fn mutates_state(self) -> bool {
        matches!(self, Action::Apply | Action::Destroy)
    }

    /// Whether the action talks to the remote backend (and so needs the
    /// environment's credential context).
    #[must_use]
    pub fn needs_backend(self) -> bool {
        matches!(
            self,
            Action::Init | Action::Plan | Action::Apply | Action::Destroy | Action::DriftCheck
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseError::UnknownAction {
                input: s.to_string(),
                valid: join(Action::ALL.iter().map(|a| a.as_str())),
            })
    }
}

/// One root configuration: exactly one (environment, layer) pairing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RootId {
    pub environment: Environment,
    pub layer: Layer,
}

impl RootId {
    #[must_use]
    pub fn new(environment: Environment, layer: Layer) -> Self {
        Self { environment, layer }
    }

    /// Every root, environment-major, layers in dependency order.
    pub fn all() -> impl Iterator<Item = RootId> {
        Environment::ALL
            .into_iter()
            .flat_map(|env| Layer::ALL.into_iter().map(move |layer| RootId::new(env, layer)))
    }

    /// Root directory relative to the repository root, `/`-separated.
    #[must_use]
    pub fn relative_dir(&self) -> String {
        format!(
            "{}/{}/{}",
            crate::state_layout::LIVE_DIR,
            self.environment,
            self.layer
        )
    }

    /// Object key of this root's remote state.
    #[must_use]
    pub fn state_key(&self) -> String {
        crate::state_layout::state_key(self.environment, self.layer)
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.environment, self.layer)
    }
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
