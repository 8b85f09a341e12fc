//! Static template catalog
//!
//! The registry is a compile-time constant table; template authors and this
//! tool agree on the placeholder tokens embedded in template files.

use crate::error::ScaffoldError;
use crate::runtime::{RuntimeSpec, BUN};

/// One free-text value a template asks the user for, substituted as a
/// literal token across the files that mention it
#[derive(Debug, Clone, Copy)]
pub struct TemplateParameter {
    /// Key in `ScaffoldRequest::parameters`
    pub name: &'static str,
    /// Prompt shown by the interactive layer
    pub prompt: &'static str,
    /// Literal token replaced with the supplied value
    pub token: &'static str,
    /// Files rewritten by this parameter's pass
    pub files: &'static [&'static str],
}

/// How a template's files reach the target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeStrategy {
    /// Fetch the template subdirectory from the remote repository
    Fetch,
    /// Delegate the whole job to an ecosystem `create` package. The target
    /// directory existing afterwards is the only success signal checked.
    Delegate { package: &'static str },
}

/// Immutable description of one starter template
#[derive(Debug, Clone, Copy)]
pub struct TemplateDescriptor {
    pub key: &'static str,
    pub description: &'static str,
    /// `owner/repo/path` locator resolved by the fetcher
    pub remote_source: &'static str,
    /// Runtime that must be present before dependencies install
    pub requires_runtime: Option<&'static RuntimeSpec>,
    pub has_dev_server: bool,
    /// Files rewritten with the target directory name after fetch
    pub substitution_files: &'static [&'static str],
    /// Free-text parameters this template collects
    pub parameters: &'static [TemplateParameter],
    /// Scripts run through the resolved manager after dependencies install
    pub post_install_scripts: &'static [&'static str],
    /// Reporting lines for steps this tool cannot automate
    pub follow_up: &'static [&'static str],
    pub strategy: MaterializeStrategy,
}

pub const TEMPLATES: &[TemplateDescriptor] = &[
    TemplateDescriptor {
        key: "bun",
        description: "Node.js compatible ultra-fast runtime.",
        remote_source: "ianhco/cerces/templates/bun",
        requires_runtime: Some(&BUN),
        has_dev_server: true,
        substitution_files: &[],
        parameters: &[],
        post_install_scripts: &[],
        follow_up: &[],
        strategy: MaterializeStrategy::Fetch,
    },
    TemplateDescriptor {
        key: "cf-workers",
        description: "Serverless functions on Cloudflare Workers.",
        remote_source: "ianhco/cerces/templates/cf-workers",
        requires_runtime: None,
        has_dev_server: true,
        substitution_files: &["wrangler.jsonc"],
        parameters: &[],
        post_install_scripts: &["cf-typegen"],
        follow_up: &[],
        strategy: MaterializeStrategy::Fetch,
    },
    TemplateDescriptor {
        key: "cf-workers-d1",
        description: "Cloudflare Workers with a D1 database binding.",
        remote_source: "ianhco/cerces/templates/cf-workers-d1",
        requires_runtime: None,
        has_dev_server: true,
        substitution_files: &["wrangler.jsonc"],
        parameters: &[TemplateParameter {
            name: "database",
            prompt: "D1 database name",
            token: "%%DB_NAME%%",
            files: &["wrangler.jsonc", "migrations/0001_init.sql"],
        }],
        post_install_scripts: &["cf-typegen"],
        follow_up: &[
            "Create the D1 database (cannot be automated): `npx wrangler d1 create <name>`, then copy its id into wrangler.jsonc.",
        ],
        strategy: MaterializeStrategy::Fetch,
    },
    TemplateDescriptor {
        key: "aws-lambda",
        description: "Serverless functions on AWS Lambda.",
        remote_source: "ianhco/cerces/templates/aws-lambda",
        requires_runtime: None,
        has_dev_server: false,
        substitution_files: &[],
        parameters: &[],
        post_install_scripts: &[],
        follow_up: &[],
        strategy: MaterializeStrategy::Fetch,
    },
    TemplateDescriptor {
        key: "docker",
        description: "Containers deployable to Cloud Run, Container Apps, etc.",
        remote_source: "ianhco/cerces/templates/docker",
        requires_runtime: Some(&BUN),
        has_dev_server: true,
        substitution_files: &[],
        parameters: &[],
        post_install_scripts: &[],
        follow_up: &[],
        strategy: MaterializeStrategy::Fetch,
    },
    TemplateDescriptor {
        key: "cf-pages",
        description: "Full-stack app on Cloudflare Pages.",
        remote_source: "ianhco/cerces/templates/cf-pages",
        requires_runtime: None,
        has_dev_server: true,
        substitution_files: &[],
        parameters: &[],
        post_install_scripts: &[],
        follow_up: &[],
        strategy: MaterializeStrategy::Delegate {
            package: "cloudflare@latest",
        },
    },
];

/// Look up a template by key
pub fn descriptor_for(key: &str) -> Result<&'static TemplateDescriptor, ScaffoldError> {
    TEMPLATES
        .iter()
        .find(|template| template.key == key)
        .ok_or_else(|| ScaffoldError::UnknownTemplate {
            key: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn template_keys_are_unique() {
        let keys: HashSet<&str> = TEMPLATES.iter().map(|t| t.key).collect();
        assert_eq!(keys.len(), TEMPLATES.len());
    }

    #[test]
    fn lookup_finds_registered_templates() {
        let descriptor = descriptor_for("cf-workers").unwrap();
        assert_eq!(descriptor.substitution_files, &["wrangler.jsonc"]);
        assert_eq!(descriptor.post_install_scripts, &["cf-typegen"]);
    }

    #[test]
    fn lookup_rejects_unknown_keys() {
        let err = descriptor_for("cf-worker").unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownTemplate { .. }));
    }

    #[test]
    fn locators_are_owner_repo_path() {
        for template in TEMPLATES {
            assert!(
                template.remote_source.splitn(3, '/').count() == 3,
                "bad locator for {}",
                template.key
            );
        }
    }

    #[test]
    fn parameter_files_overlap_substitution_surface() {
        let descriptor = descriptor_for("cf-workers-d1").unwrap();
        assert_eq!(descriptor.parameters.len(), 1);
        let parameter = &descriptor.parameters[0];
        assert_eq!(parameter.token, "%%DB_NAME%%");
        assert!(parameter.files.len() > 1);
    }
}
