//! Package manager profiles and version-gated command selection

use semver::Version;
use std::fmt;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Binary name, also what user agents and override variables call it
    pub fn binary_name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Parse a manager name from a detection hint. Unrecognized names fall
    /// back to npm, the manager every supported host has.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pnpm" => PackageManager::Pnpm,
            "yarn" => PackageManager::Yarn,
            "bun" => PackageManager::Bun,
            _ => PackageManager::Npm,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary_name())
    }
}

/// Install/exec command set for one package manager at one version.
/// Derived once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerProfile {
    pub manager: PackageManager,
    pub version: String,
    pub install_command: String,
    pub exec_command: String,
    pub dlx_command: Vec<String>,
}

impl PackageManagerProfile {
    /// Build the profile for a manager/version pair.
    ///
    /// pnpm replaced `pnpx` with `pnpm dlx` after 6.0.0 and yarn grew
    /// `yarn dlx` after 2.0.0. The comparison is strictly greater-than:
    /// a version equal to the boundary still gets the legacy invocation.
    pub fn for_manager(manager: PackageManager, version: &str) -> Self {
        let parsed = parse_loose(version);
        match manager {
            PackageManager::Pnpm => {
                if parsed > Version::new(6, 0, 0) {
                    Self::new(manager, version, "pnpm", "pnpm", &["pnpm", "dlx"])
                } else {
                    Self::new(manager, version, "pnpm", "pnpx", &["pnpx"])
                }
            }
            PackageManager::Yarn => {
                if parsed > Version::new(2, 0, 0) {
                    Self::new(manager, version, "yarn", "yarn", &["yarn", "dlx"])
                } else {
                    Self::new(manager, version, "yarn", "yarn", &["yarn"])
                }
            }
            PackageManager::Bun => Self::new(manager, version, "bun", "bunx", &["bunx"]),
            PackageManager::Npm => Self::new(manager, version, "npm", "npx", &["npx"]),
        }
    }

    fn new(
        manager: PackageManager,
        version: &str,
        install: &str,
        exec: &str,
        dlx: &[&str],
    ) -> Self {
        Self {
            manager,
            version: version.to_string(),
            install_command: install.to_string(),
            exec_command: exec.to_string(),
            dlx_command: dlx.iter().map(|part| part.to_string()).collect(),
        }
    }

    /// Arguments for the dependency install invocation.
    ///
    /// pnpm gets the peer auto-install flag: generated templates commonly
    /// declare peer dependencies and pnpm skips them by default.
    pub fn install_args(&self) -> &'static [&'static str] {
        match self.manager {
            PackageManager::Pnpm => &["install", "--config.auto-install-peers=true"],
            _ => &["install"],
        }
    }

    /// Arguments for running a package script.
    pub fn run_script_args<'a>(&self, script: &'a str) -> Vec<&'a str> {
        vec!["run", script]
    }
}

/// Parse leniently; detection hints sometimes carry partial or garbage
/// versions, which gate to the legacy branch.
fn parse_loose(version: &str) -> Version {
    Version::parse(version.trim().trim_start_matches('v'))
        .unwrap_or_else(|_| Version::new(0, 0, 0))
}
