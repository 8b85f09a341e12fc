//! Runtime prerequisite checks
//!
//! Some templates need a runtime (Bun) present before their dependencies
//! can install. The check is a `--version` probe; remediation is a global
//! install through the resolved package manager or a pointer at the docs.

use crate::command::RunCommand;
use crate::manager::PackageManagerProfile;
use anyhow::Result;
use colored::Colorize;

/// A runtime a template requires on the host
#[derive(Debug, PartialEq, Eq)]
pub struct RuntimeSpec {
    /// Binary name, probed with `--version` and used as the global-install
    /// package name
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// URL to the installation docs
    pub docs_url: &'static str,
}

/// Bun, required by the templates that run on it
pub const BUN: RuntimeSpec = RuntimeSpec {
    name: "bun",
    display_name: "Bun",
    docs_url: "https://bun.sh/docs/installation",
};

/// What to do about a missing runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeDecision {
    /// Install it globally through the resolved package manager
    Install,
    /// Open the install docs and continue without it
    OpenDocs,
    /// Continue without it
    Skip,
}

/// Check whether the runtime answers `--version`
pub fn is_available(runner: &dyn RunCommand, runtime: &RuntimeSpec) -> bool {
    runner.probe(runtime.name)
}

/// Install the runtime globally: `<manager> install -g <runtime>`.
///
/// No re-check afterwards; a broken install surfaces from the dependency
/// install that follows.
pub fn install_global(
    runner: &dyn RunCommand,
    profile: &PackageManagerProfile,
    runtime: &RuntimeSpec,
) -> bool {
    println!(
        "{}",
        format!("Installing {} globally...", runtime.display_name)
            .cyan()
            .bold()
    );
    runner
        .run(&profile.install_command, &["install", "-g", runtime.name], true)
        .exited_zero
}

/// Open the runtime's install docs in the default browser
pub fn open_docs(runtime: &RuntimeSpec) -> Result<()> {
    println!(
        "{}",
        format!(
            "Opening {} install docs in your browser...",
            runtime.display_name
        )
        .cyan()
    );
    open::that(runtime.docs_url)?;
    Ok(())
}
