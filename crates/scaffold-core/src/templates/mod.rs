//! Template catalog, acquisition, and parameterization
//!
//! This module provides:
//! - The static template registry (compile-time descriptor table)
//! - Template fetching from the remote repository or a local checkout
//! - Placeholder substitution over fetched files

pub mod fetcher;
pub mod materializer;
pub mod registry;

pub use fetcher::{RemoteLocator, TemplateFetch, TemplateFetcher, TemplateSource};
pub use materializer::{apply_dir_name, apply_parameters, DIR_NAME_TOKEN};
pub use registry::{
    descriptor_for, MaterializeStrategy, TemplateDescriptor, TemplateParameter, TEMPLATES,
};
