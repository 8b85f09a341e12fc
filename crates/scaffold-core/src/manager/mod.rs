//! Package manager detection and command dispatch
//!
//! This module provides:
//! - Install/exec command profiles with version-gated selection
//! - Detection strategies: invoking-process user agent (primary) and
//!   direct binary probing (fallback)

pub mod profile;
pub mod resolver;

pub use profile::{PackageManager, PackageManagerProfile};
pub use resolver::{
    BinaryProbeResolver, EnvHintSource, HintSource, ManagerHint, ManagerResolution,
    ResolveManager, UserAgentResolver,
};
