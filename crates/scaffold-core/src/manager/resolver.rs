//! Package manager detection strategies
//!
//! Two strategies sit behind [`ResolveManager`]:
//! - [`UserAgentResolver`] (primary) reads how the current process was
//!   invoked and never fails to resolve; unknown managers become npm.
//! - [`BinaryProbeResolver`] (fallback) probes for manager binaries on the
//!   host and reports [`ManagerResolution::Unsupported`] when none answer,
//!   which the workflow degrades to manual-install instructions.

use super::profile::{PackageManager, PackageManagerProfile};
use crate::command::RunCommand;
use crate::product::ProductConfig;

/// Raw `{name, version}` hint describing the invoking package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerHint {
    pub name: String,
    pub version: String,
}

/// Where detection hints come from.
///
/// Detection stays behind this trait so tests substitute deterministic
/// values instead of inspecting process globals.
pub trait HintSource {
    /// npm-style user agent of the invoking process, e.g.
    /// `pnpm/7.14.0 npm/? node/v18.12.1 linux x64`
    fn user_agent(&self) -> Option<String>;

    /// Explicit name/version override pair; wins over the user agent
    fn override_pair(&self) -> Option<(String, String)>;
}

/// Environment variable npm-compatible managers set on processes they spawn
pub const USER_AGENT_VAR: &str = "npm_config_user_agent";

/// Reads hints from the process environment
pub struct EnvHintSource {
    name_var: String,
    version_var: String,
}

impl EnvHintSource {
    /// Use the product's override variable names
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        Self {
            name_var: config.manager_name_env().to_string(),
            version_var: config.manager_version_env().to_string(),
        }
    }
}

impl HintSource for EnvHintSource {
    fn user_agent(&self) -> Option<String> {
        std::env::var(USER_AGENT_VAR).ok()
    }

    fn override_pair(&self) -> Option<(String, String)> {
        let name = std::env::var(&self.name_var).ok()?;
        let version = std::env::var(&self.version_var).ok()?;
        Some((name, version))
    }
}

/// Outcome of a detection strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerResolution {
    Supported(PackageManagerProfile),
    /// No manager this tool can drive (yarn-only hosts, bare systems).
    /// Install and post-script phases degrade to manual instructions.
    Unsupported,
}

impl ManagerResolution {
    pub fn profile(&self) -> Option<&PackageManagerProfile> {
        match self {
            ManagerResolution::Supported(profile) => Some(profile),
            ManagerResolution::Unsupported => None,
        }
    }
}

/// A package manager detection strategy
pub trait ResolveManager {
    fn resolve(&self) -> ManagerResolution;
}

/// Primary strategy: derive the manager from how this process was invoked.
///
/// Resolution order: override pair, then user agent, then npm at `0.0.0`.
pub struct UserAgentResolver<H: HintSource> {
    hints: H,
}

impl<H: HintSource> UserAgentResolver<H> {
    pub fn new(hints: H) -> Self {
        Self { hints }
    }

    fn hint(&self) -> ManagerHint {
        if let Some((name, version)) = self.hints.override_pair() {
            return ManagerHint { name, version };
        }
        self.hints
            .user_agent()
            .as_deref()
            .and_then(parse_user_agent)
            .unwrap_or_else(|| ManagerHint {
                name: "npm".to_string(),
                version: "0.0.0".to_string(),
            })
    }
}

impl<H: HintSource> ResolveManager for UserAgentResolver<H> {
    fn resolve(&self) -> ManagerResolution {
        let hint = self.hint();
        let manager = PackageManager::from_name(&hint.name);
        ManagerResolution::Supported(PackageManagerProfile::for_manager(manager, &hint.version))
    }
}

/// Extract `{name, version}` from the leading `name/version` token
fn parse_user_agent(raw: &str) -> Option<ManagerHint> {
    let first = raw.split_whitespace().next()?;
    let (name, version) = first.split_once('/')?;
    if name.is_empty() {
        return None;
    }
    Some(ManagerHint {
        name: name.to_string(),
        version: version.to_string(),
    })
}

/// Fallback strategy: probe for manager binaries directly.
///
/// Tries bun, then pnpm, then npm; the first that answers `--version` wins.
/// Only the exit status is captured, so probed managers carry version
/// `0.0.0` and take the legacy command forms of the gate table.
pub struct BinaryProbeResolver<'a> {
    runner: &'a dyn RunCommand,
}

const PROBE_ORDER: &[PackageManager] = &[
    PackageManager::Bun,
    PackageManager::Pnpm,
    PackageManager::Npm,
];

impl<'a> BinaryProbeResolver<'a> {
    pub fn new(runner: &'a dyn RunCommand) -> Self {
        Self { runner }
    }
}

impl ResolveManager for BinaryProbeResolver<'_> {
    fn resolve(&self) -> ManagerResolution {
        for manager in PROBE_ORDER {
            if self.runner.probe(manager.binary_name()) {
                return ManagerResolution::Supported(PackageManagerProfile::for_manager(
                    *manager, "0.0.0",
                ));
            }
        }
        ManagerResolution::Unsupported
    }
}
