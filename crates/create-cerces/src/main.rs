//! Cerces CLI - Project scaffolding for Cerces apps

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use scaffold_core::templates::TEMPLATES;
use scaffold_core::tui::CreateArgs;
use scaffold_core::ProductConfig;
use std::path::PathBuf;

/// Cerces product configuration
#[derive(Clone)]
pub struct CercesConfig;

impl ProductConfig for CercesConfig {
    fn name(&self) -> &'static str {
        "create-cerces"
    }

    fn display_name(&self) -> &'static str {
        "Cerces"
    }

    fn template_url_env(&self) -> &'static str {
        "CERCES_TEMPLATE_URL"
    }

    fn manager_name_env(&self) -> &'static str {
        "CERCES_PACKAGE_MANAGER"
    }

    fn manager_version_env(&self) -> &'static str {
        "CERCES_PACKAGE_MANAGER_VERSION"
    }

    fn docs_url(&self) -> &'static str {
        "https://cerces.dev/docs"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-cerces")]
#[command(about = "Scaffold a Cerces starter project")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Cerces project
    Create(CliCreateArgs),
    /// List the available templates
    Templates,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Local directory to use for templates instead of fetching from remote
    /// (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template key to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Template parameters as name=value (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Install dependencies without asking
    #[arg(long, conflicts_with = "no_install")]
    pub install: bool,

    /// Skip the dependency install entirely
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        let install = match (args.install, args.no_install) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            directory: args.directory,
            set: args.set,
            install,
            yes: args.yes,
        }
    }
}

fn print_templates() {
    println!("{}", "Available templates".bold());
    println!();
    for template in TEMPLATES {
        println!("  {}  {}", template.key.cyan().bold(), template.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = CercesConfig;

    match args.command {
        Some(Command::Create(create_args)) => {
            let result = scaffold_core::run(&config, create_args.into()).await;
            let _ = console::Term::stderr().show_cursor();
            result
        }
        Some(Command::Templates) => {
            print_templates();
            Ok(())
        }
        None => {
            // No subcommand provided, default to the interactive create flow
            let result = scaffold_core::run(&config, CreateArgs::default()).await;
            let _ = console::Term::stderr().show_cursor();
            result
        }
    }
}
