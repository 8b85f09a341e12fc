//! Scaffold Core - Shared library for project scaffolding CLIs
//!
//! This library materializes starter projects from remote templates: it
//! fetches a template into a target directory, rewrites placeholder tokens,
//! detects the invoking package manager, and optionally installs
//! dependencies and runs post-install scripts.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - command running, package manager
//!   resolution, template fetching and substitution
//! - **Layer 2: Workflow Orchestration** - [`scaffold::scaffold`] consumes
//!   a [`ScaffoldRequest`] built by any frontend
//! - **Layer 3: CLI/TUI Interface** - optional cliclack-based prompts
//!   (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompt module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffold_core::{scaffold, ScaffoldDeps, ScaffoldRequest};
//! use scaffold_core::command::SystemRunner;
//! use scaffold_core::manager::{EnvHintSource, UserAgentResolver};
//! use scaffold_core::templates::TemplateFetcher;
//!
//! let mut fetcher = TemplateFetcher::from_config(&MyConfig)?;
//! let resolver = UserAgentResolver::new(EnvHintSource::from_config(&MyConfig));
//! let deps = ScaffoldDeps { runner: &SystemRunner, resolver: &resolver, ux: &MyUx };
//! let outcome = scaffold(&MyConfig, &mut fetcher, &deps, &request).await?;
//! ```

pub mod command;
pub mod error;
pub mod manager;
pub mod product;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use command::{CommandResult, RunCommand, SystemRunner};
pub use error::ScaffoldError;
pub use manager::{ManagerResolution, PackageManager, PackageManagerProfile, ResolveManager};
pub use product::ProductConfig;
pub use scaffold::{scaffold, Interaction, ScaffoldDeps, ScaffoldOutcome, ScaffoldRequest};
pub use templates::{descriptor_for, TemplateDescriptor, TemplateFetcher, TEMPLATES};

#[cfg(feature = "tui")]
pub use tui::run;
