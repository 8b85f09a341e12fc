//! Interactive create flow
//!
//! Collects the template, target directory, template parameters, and the
//! install decision, then runs the scaffolding workflow. Every prompt can
//! be bypassed with a CLI flag, and `--yes` accepts every default, so the
//! whole flow works non-interactively.

use crate::manager::{EnvHintSource, UserAgentResolver};
use crate::command::SystemRunner;
use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use crate::runtime::{RuntimeDecision, RuntimeSpec};
use crate::scaffold::{scaffold, Interaction, ScaffoldDeps, ScaffoldOutcome, ScaffoldRequest};
use crate::templates::fetcher::TemplateFetcher;
use crate::templates::registry::{self, TemplateDescriptor};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Template key to use
    pub template: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// `name=value` template parameters supplied up front
    pub set: Vec<String>,

    /// Install dependencies without asking (`Some(false)` skips the
    /// install entirely)
    pub install: Option<bool>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the interactive create flow
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let descriptor = select_template(args.template.as_deref())?;
    let target_dir = select_directory(&args)?;
    let parameters = collect_parameters(descriptor, &args)?;
    let auto_install = confirm_install(&args)?;

    let mut fetcher = match &args.template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), config.user_agent())
        }
        None => TemplateFetcher::from_config(config)?,
    };

    let runner = SystemRunner;
    let resolver = UserAgentResolver::new(EnvHintSource::from_config(config));
    let ux = CliInteraction { yes: args.yes };
    let deps = ScaffoldDeps {
        runner: &runner,
        resolver: &resolver,
        ux: &ux,
    };

    let request = ScaffoldRequest {
        target_dir,
        template: descriptor.key.to_string(),
        auto_install,
        parameters,
    };

    let outcome = scaffold(config, &mut fetcher, &deps, &request).await?;
    print_next_steps(&outcome)?;
    Ok(())
}

fn select_template(specified: Option<&str>) -> Result<&'static TemplateDescriptor> {
    if let Some(key) = specified {
        let descriptor = registry::descriptor_for(key)?;
        cliclack::log::info(format!(
            "Template: {} - {}",
            descriptor.key, descriptor.description
        ))?;
        return Ok(descriptor);
    }

    let mut select = cliclack::select("Select a template");
    for (index, descriptor) in registry::TEMPLATES.iter().enumerate() {
        select = select.item(index, descriptor.key, descriptor.description);
    }
    let selected: usize = select.interact()?;
    Ok(&registry::TEMPLATES[selected])
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = if let Some(dir) = &args.directory {
        let path = resolve_against(&current_dir, dir.clone());
        cliclack::log::info(format!("Using directory: {}", path.display()))?;
        path
    } else if args.yes {
        current_dir.clone()
    } else {
        let input: String = cliclack::input("Project directory (\".\" for current)")
            .placeholder(".")
            .default_input(".")
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir.clone()
        } else {
            resolve_against(&current_dir, PathBuf::from(input))
        }
    };

    // Parent must exist; the target itself is created by the workflow
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != std::path::Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    Ok(path)
}

fn resolve_against(current_dir: &std::path::Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        current_dir.join(dir)
    }
}

fn collect_parameters(
    descriptor: &TemplateDescriptor,
    args: &CreateArgs,
) -> Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();

    for pair in &args.set {
        match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                values.insert(name.trim().to_string(), value.to_string());
            }
            _ => {
                cliclack::log::warning(format!(
                    "Ignoring malformed --set value `{pair}` (expected name=value)"
                ))?;
            }
        }
    }

    for parameter in descriptor.parameters {
        if values.contains_key(parameter.name) {
            continue;
        }
        if args.yes {
            anyhow::bail!(
                "Template `{}` needs `--set {}=<value>` in non-interactive mode",
                descriptor.key,
                parameter.name
            );
        }
        let value: String = cliclack::input(parameter.prompt).interact()?;
        values.insert(parameter.name.to_string(), value);
    }

    Ok(values)
}

fn confirm_install(args: &CreateArgs) -> Result<bool> {
    if let Some(install) = args.install {
        return Ok(install);
    }
    if args.yes {
        return Ok(true);
    }
    Ok(cliclack::confirm("Install dependencies automatically?")
        .initial_value(true)
        .interact()?)
}

/// cliclack-backed decision prompts for the workflow
struct CliInteraction {
    yes: bool,
}

impl Interaction for CliInteraction {
    fn runtime_decision(&self, runtime: &RuntimeSpec) -> Result<RuntimeDecision, ScaffoldError> {
        if self.yes {
            return Ok(RuntimeDecision::Install);
        }

        let action: &str = cliclack::select("What would you like to do?")
            .item(
                "install",
                format!("Install {} globally", runtime.display_name),
                "",
            )
            .item(
                "docs",
                format!("Open the install docs ({})", runtime.docs_url),
                "",
            )
            .item(
                "skip",
                format!("Skip and continue without {}", runtime.display_name),
                "",
            )
            .interact()
            .map_err(|_| ScaffoldError::Aborted)?;

        Ok(match action {
            "install" => RuntimeDecision::Install,
            "docs" => RuntimeDecision::OpenDocs,
            _ => RuntimeDecision::Skip,
        })
    }
}

fn print_next_steps(outcome: &ScaffoldOutcome) -> Result<()> {
    println!();
    println!("  Next steps");
    println!();

    for (index, step) in outcome.next_steps.iter().enumerate() {
        println!("  {}.  {}", index + 1, step);
    }

    cliclack::outro("Happy coding!")?;
    Ok(())
}
