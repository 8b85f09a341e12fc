//! Scaffolding workflow orchestration
//!
//! One strictly sequential flow: validate target -> fetch -> substitute ->
//! ensure runtime -> install -> post-install scripts -> report. A failure
//! aborts the remaining phases; completed side effects (created directory,
//! fetched files, partial installs) are never rolled back - the user cleans
//! up and re-invokes.

use crate::command::RunCommand;
use crate::error::ScaffoldError;
use crate::manager::{PackageManager, PackageManagerProfile, ResolveManager};
use crate::product::ProductConfig;
use crate::runtime::{self, RuntimeDecision, RuntimeSpec};
use crate::templates::fetcher::TemplateFetch;
use crate::templates::materializer;
use crate::templates::registry::{self, MaterializeStrategy, TemplateDescriptor};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything the orchestrator consumes. Built by the interactive layer (or
/// CLI flags) and used exactly once.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    /// Must resolve to an empty or non-existent directory
    pub target_dir: PathBuf,
    /// Registry key
    pub template: String,
    pub auto_install: bool,
    /// Values for the template's declared parameters, keyed by name
    pub parameters: BTreeMap<String, String>,
}

/// What a finished run reports back
#[derive(Debug)]
pub struct ScaffoldOutcome {
    pub target_dir: PathBuf,
    /// `None` means no supported manager resolved and the install and
    /// post-script phases were skipped with manual instructions
    pub manager: Option<PackageManagerProfile>,
    pub next_steps: Vec<String>,
}

/// Decision points the workflow hands back to the interactive layer
pub trait Interaction {
    /// Ask what to do about a required runtime that is not installed
    fn runtime_decision(&self, runtime: &RuntimeSpec) -> Result<RuntimeDecision, ScaffoldError>;
}

/// Collaborators injected into a run
pub struct ScaffoldDeps<'a> {
    pub runner: &'a dyn RunCommand,
    pub resolver: &'a dyn ResolveManager,
    pub ux: &'a dyn Interaction,
}

/// Run the full scaffolding workflow for one request.
pub async fn scaffold<C, F>(
    config: &C,
    fetcher: &mut F,
    deps: &ScaffoldDeps<'_>,
    request: &ScaffoldRequest,
) -> Result<ScaffoldOutcome, ScaffoldError>
where
    C: ProductConfig,
    F: TemplateFetch,
{
    let descriptor = registry::descriptor_for(&request.template)?;

    // Hard failure before anything touches the filesystem or network; a
    // populated directory is never merged into.
    validate_target(&request.target_dir)?;

    // Derived once per run; the delegate strategy and the install phase
    // both consume it.
    let profile = deps.resolver.resolve().profile().cloned();

    match descriptor.strategy {
        MaterializeStrategy::Fetch => {
            fetch_and_parameterize(fetcher, descriptor, request).await?;
            if let Some(required) = descriptor.requires_runtime {
                ensure_runtime(deps, profile.as_ref(), required)?;
            }
            if request.auto_install {
                install_dependencies(deps, descriptor, request, profile.as_ref());
            }
        }
        MaterializeStrategy::Delegate { package } => {
            delegate_create(deps, descriptor, request, profile.as_ref(), package)?;
        }
    }

    let next_steps = next_steps(config, descriptor, request, profile.as_ref());
    println!(
        "{}",
        format!(
            "Project created successfully in `{}`.",
            request.target_dir.display()
        )
        .green()
        .bold()
    );

    Ok(ScaffoldOutcome {
        target_dir: request.target_dir.clone(),
        manager: profile,
        next_steps,
    })
}

/// The target must be empty or absent. Re-run immediately before the first
/// write.
fn validate_target(path: &Path) -> Result<(), ScaffoldError> {
    if path.exists() {
        let invalid = ScaffoldError::InvalidTarget {
            path: path.to_path_buf(),
        };
        if !path.is_dir() {
            return Err(invalid);
        }
        let occupied = std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(true);
        if occupied {
            return Err(invalid);
        }
    }
    Ok(())
}

async fn fetch_and_parameterize<F: TemplateFetch>(
    fetcher: &mut F,
    descriptor: &TemplateDescriptor,
    request: &ScaffoldRequest,
) -> Result<(), ScaffoldError> {
    std::fs::create_dir_all(&request.target_dir).map_err(|err| ScaffoldError::FetchFailed {
        reason: format!(
            "failed to create target directory {}: {err}",
            request.target_dir.display()
        ),
    })?;

    println!(
        "{}",
        format!(
            "Cloning template `{}` into `{}`...",
            descriptor.key,
            request.target_dir.display()
        )
        .yellow()
        .bold()
    );

    let written = fetcher.fetch_into(descriptor, &request.target_dir).await?;

    println!(
        "{}",
        format!(
            "Template `{}` cloned successfully ({} files).",
            descriptor.key, written
        )
        .green()
        .bold()
    );

    let dir_name = directory_label(&request.target_dir);
    materializer::apply_dir_name(descriptor, &request.target_dir, &dir_name)?;
    materializer::apply_parameters(descriptor, &request.target_dir, &request.parameters)?;
    Ok(())
}

/// Probe the required runtime and walk the remediation path when absent.
/// Declining is non-fatal; the failure, if any, surfaces from the install
/// that follows.
fn ensure_runtime(
    deps: &ScaffoldDeps<'_>,
    profile: Option<&PackageManagerProfile>,
    required: &RuntimeSpec,
) -> Result<(), ScaffoldError> {
    if runtime::is_available(deps.runner, required) {
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{} is required by this template but is not installed.",
            required.display_name
        )
        .yellow()
        .bold()
    );

    match deps.ux.runtime_decision(required)? {
        RuntimeDecision::Install => {
            // The global install goes through the resolved manager; npm is
            // the fallback every supported host has.
            let npm_fallback =
                PackageManagerProfile::for_manager(PackageManager::Npm, "0.0.0");
            let installer = profile.unwrap_or(&npm_fallback);
            if runtime::install_global(deps.runner, installer, required) {
                println!(
                    "{}",
                    format!("{} installed successfully.", required.display_name)
                        .green()
                        .bold()
                );
            } else {
                warn(&format!(
                    "{} installation failed. You may need to install it manually: {}",
                    required.display_name, required.docs_url
                ));
            }
        }
        RuntimeDecision::OpenDocs => {
            if let Err(err) = runtime::open_docs(required) {
                warn(&format!("Could not open the docs: {err}"));
            }
            warn(&format!(
                "Continuing without {}. Install it before running the project.",
                required.display_name
            ));
        }
        RuntimeDecision::Skip => {
            warn(&format!(
                "Skipping {} installation. You may need to install it manually.",
                required.display_name
            ));
        }
    }
    Ok(())
}

/// Install dependencies and run the template's post-install scripts with
/// the resolved manager. No manager resolved means both are skipped with
/// manual instructions - a degraded run, not a failed one.
fn install_dependencies(
    deps: &ScaffoldDeps<'_>,
    descriptor: &TemplateDescriptor,
    request: &ScaffoldRequest,
    profile: Option<&PackageManagerProfile>,
) {
    let Some(profile) = profile else {
        warn("Unsupported package manager detected (e.g., yarn).");
        warn("Please install dependencies manually, including peer dependencies.");
        return;
    };

    println!(
        "{}",
        format!("Installing dependencies using {}...", profile.manager)
            .cyan()
            .bold()
    );

    let result = deps.runner.run_in(
        Some(&request.target_dir),
        &profile.install_command,
        profile.install_args(),
        true,
    );

    if result.exited_zero {
        println!("{}", "Dependencies installed successfully.".green().bold());
    } else {
        warn(&format!(
            "Dependency installation failed. Run `{} install` in the project directory to retry.",
            profile.install_command
        ));
    }

    for script in descriptor.post_install_scripts {
        println!(
            "{}",
            format!("Running `{} run {}`...", profile.install_command, script)
                .cyan()
                .bold()
        );
        let result = deps.runner.run_in(
            Some(&request.target_dir),
            &profile.install_command,
            &profile.run_script_args(script),
            true,
        );
        if !result.exited_zero {
            warn(&format!("Script `{script}` exited with a failure."));
        }
    }
}

/// Hand materialization to an ecosystem `create` package:
/// `<exec-command> create <package> --template <locator> --lang ts
/// --deploy false --git true <directory>`. The delegated tool owns its own
/// prompts and installs; the target directory existing afterwards is the
/// only success signal it offers.
fn delegate_create(
    deps: &ScaffoldDeps<'_>,
    descriptor: &TemplateDescriptor,
    request: &ScaffoldRequest,
    profile: Option<&PackageManagerProfile>,
    package: &str,
) -> Result<(), ScaffoldError> {
    let Some(profile) = profile else {
        return Err(ScaffoldError::FetchFailed {
            reason: format!(
                "no supported package manager available to run `create {package}`"
            ),
        });
    };

    let dir = request.target_dir.display().to_string();
    println!(
        "{}",
        format!("Delegating to `{} create {}`...", profile.exec_command, package)
            .yellow()
            .bold()
    );

    let args = [
        "create",
        package,
        "--template",
        descriptor.remote_source,
        "--lang",
        "ts",
        "--deploy",
        "false",
        "--git",
        "true",
        dir.as_str(),
    ];
    deps.runner.run(&profile.exec_command, &args, true);

    if !request.target_dir.is_dir() {
        return Err(ScaffoldError::FetchFailed {
            reason: format!(
                "`{} create {}` did not produce `{dir}`",
                profile.exec_command, package
            ),
        });
    }
    Ok(())
}

fn next_steps<C: ProductConfig>(
    config: &C,
    descriptor: &TemplateDescriptor,
    request: &ScaffoldRequest,
    profile: Option<&PackageManagerProfile>,
) -> Vec<String> {
    let mut steps = Vec::new();
    let current = std::env::current_dir().ok();

    if current.as_deref() != Some(request.target_dir.as_path()) {
        steps.push(format!("cd {}", request.target_dir.display()));
    }

    let manager_name = profile
        .map(|p| p.install_command.clone())
        .unwrap_or_else(|| "npm".to_string());

    if !request.auto_install && descriptor.strategy == MaterializeStrategy::Fetch {
        steps.push(format!("{manager_name} install"));
    }

    if descriptor.has_dev_server {
        steps.push(format!(
            "Run `{manager_name} run dev` to start the development server."
        ));
    } else {
        steps.push("This template does not include a development server.".to_string());
        steps.push(format!(
            "Additional setup may be required specific to the `{}` runtime.",
            descriptor.key
        ));
    }

    steps.extend(descriptor.follow_up.iter().map(|line| line.to_string()));
    steps.push(format!("Docs: {}", config.docs_url()));
    steps
}

fn directory_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn warn(message: &str) {
    println!("{}", message.yellow().bold());
}
