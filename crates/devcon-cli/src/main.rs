//! dev - layered devcontainer launcher
//!
//! Usage:
//!   dev up                 # Merge common + project + flags, start container
//!   dev up --dry-run       # Show the merged configuration only
//!   dev exec -- npm test   # Run a command in the running container
//!   dev status             # Show container and config status
//!   dev config             # Print the merged configuration as JSON
//!   dev init               # Create the common config template

mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devcon_core::commands::{
    ExecCommand, ExecOutcome, InitOutcome, MergePlan, UpCommand, UpOptions, WorkspaceStatus,
    init_common_config,
};
use devcon_core::context::AppContext;
use devcon_core::document::to_pretty_json;
use devcon_core::overrides::OverrideSet;

#[derive(Parser)]
#[command(name = "dev")]
#[command(about = "Devcontainer launcher with shared common configuration", long_about = None)]
struct Cli {
    /// Enable debug logging and show the merged configuration
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge configuration layers and start the devcontainer
    Up(Box<UpArgs>),

    /// Rebuild the container from scratch (deprecated: use `up --rebuild`)
    Rebuild(Box<UpArgs>),

    /// Run a command inside the running devcontainer
    Exec {
        /// Workspace folder (defaults to the current directory)
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Command and arguments to run
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show container status and configuration
    Status {
        /// Workspace folder (defaults to the current directory)
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the merged configuration as JSON without starting anything
    Config(MergeArgs),

    /// Create the common config template
    Init {
        /// Where to write the template (defaults to the configured common config)
        #[arg(long)]
        common_config: Option<PathBuf>,

        /// Overwrite without asking
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Inputs shared by every command that builds the merged configuration.
#[derive(Args, Debug, Default)]
struct MergeArgs {
    /// Workspace folder (defaults to the current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Common config file (defaults to ~/.config/devcontainer.common.json)
    #[arg(long)]
    common_config: Option<PathBuf>,

    /// Additional mount (HOST:CONTAINER or source=...,target=...)
    #[arg(long = "mount", value_name = "MOUNT")]
    mounts: Vec<String>,

    /// Additional remote environment variable
    #[arg(long = "env", value_name = "KEY=VALUE")]
    envs: Vec<String>,

    /// Additional forwarded port (PORT or HOST:PORT)
    #[arg(long = "port", short = 'p', value_name = "PORT")]
    ports: Vec<String>,

    /// Also publish forwardPorts through appPort
    #[arg(long)]
    auto_forward_ports: bool,
}

#[derive(Args, Debug, Default)]
struct UpArgs {
    #[command(flatten)]
    merge: MergeArgs,

    /// Remove the existing container before starting
    #[arg(long)]
    clean: bool,

    /// Build the image without cache
    #[arg(long)]
    no_cache: bool,

    /// Same as --clean --no-cache
    #[arg(long)]
    rebuild: bool,

    /// Make all GPUs available to the container
    #[arg(long)]
    gpu: bool,

    /// Show the merged configuration without starting the container
    #[arg(long)]
    dry_run: bool,

    /// Output format for --dry-run
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

impl MergeArgs {
    fn overrides(&self) -> OverrideSet {
        OverrideSet::new()
            .with_mounts(&self.mounts)
            .with_envs(&self.envs)
            .with_ports(&self.ports)
    }

    fn to_options(&self, workspace: PathBuf) -> UpOptions {
        let mut options = UpOptions::new(workspace)
            .with_overrides(self.overrides())
            .with_auto_forward_ports(self.auto_forward_ports);
        if let Some(path) = &self.common_config {
            options = options.with_common_config(path);
        }
        options
    }
}

impl UpArgs {
    fn to_options(&self, workspace: PathBuf) -> UpOptions {
        self.merge
            .to_options(workspace)
            .with_clean(self.clean)
            .with_no_cache(self.no_cache)
            .with_rebuild(self.rebuild)
            .with_gpu(self.gpu)
            .with_dry_run(self.dry_run)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Up(args) => run_up(&args, cli.debug),
        Commands::Rebuild(mut args) => {
            eprintln!(
                "{}",
                style("Warning: 'dev rebuild' is deprecated, use 'dev up --rebuild'").yellow()
            );
            args.rebuild = true;
            run_up(&args, cli.debug)
        }
        Commands::Exec { workspace, command } => run_exec(workspace.as_deref(), &command),
        Commands::Status { workspace, format } => run_status(workspace.as_deref(), format),
        Commands::Config(args) => run_config(&args),
        Commands::Init {
            common_config,
            force,
        } => run_init(common_config, force),
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "devcon_core=debug,dev=debug"
    } else {
        "devcon_core=warn,dev=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Absolute workspace path; defaults to the current directory.
fn resolve_workspace(workspace: Option<&Path>) -> Result<PathBuf> {
    let path = match workspace {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let resolved = std::fs::canonicalize(&path)
        .with_context(|| format!("Workspace folder not found: {}", path.display()))?;
    tracing::debug!(event = "cli.workspace.resolved", path = %resolved.display());
    Ok(resolved)
}

fn run_up(args: &UpArgs, debug: bool) -> Result<()> {
    let ctx = AppContext::with_defaults()?;
    let workspace = resolve_workspace(args.merge.workspace.as_deref())?;
    let options = args.to_options(workspace);

    if options.dry_run {
        let plan = UpCommand::new(&ctx).plan(&options)?;
        return match args.format {
            OutputFormat::Table => {
                print_plan(&plan);
                Ok(())
            }
            OutputFormat::Json => print_json(&plan),
        };
    }

    eprintln!("{}", style("Starting devcontainer...").green().bold());
    let command = UpCommand::new(&ctx);
    let plan = command.plan(&options)?;
    if debug {
        eprintln!("\n{}", style("Merged configuration:").bold());
        eprintln!("{}", to_pretty_json(&plan.config));
    }

    let report = command.launch(plan, &options)?;
    match report.exit_code {
        Some(0) | None => {
            println!("{}", style("✓ Container started successfully!").green().bold());
            Ok(())
        }
        Some(code) => {
            eprintln!("{}", style("✗ Failed to start container").red().bold());
            std::process::exit(code);
        }
    }
}

fn run_config(args: &MergeArgs) -> Result<()> {
    let ctx = AppContext::with_defaults()?;
    let workspace = resolve_workspace(args.workspace.as_deref())?;
    let plan = UpCommand::new(&ctx).plan(&args.to_options(workspace))?;
    println!("{}", to_pretty_json(&plan.config));
    Ok(())
}

fn run_exec(workspace: Option<&Path>, command: &[String]) -> Result<()> {
    let ctx = AppContext::with_defaults()?;
    let workspace = resolve_workspace(workspace)?;

    match ExecCommand::new(&ctx).execute(&workspace, command)? {
        ExecOutcome::Exited(0) => Ok(()),
        ExecOutcome::Exited(code) => std::process::exit(code),
        ExecOutcome::NotRunning => {
            eprintln!("{}", style("✗ No running container for this workspace.").red().bold());
            eprintln!("{}", style("Run 'dev up' first.").yellow());
            std::process::exit(1);
        }
    }
}

fn run_status(workspace: Option<&Path>, format: OutputFormat) -> Result<()> {
    let ctx = AppContext::with_defaults()?;
    let workspace = resolve_workspace(workspace)?;
    let status = WorkspaceStatus::collect(&workspace, &ctx.container_cli());

    match format {
        OutputFormat::Table => print_status(&status),
        OutputFormat::Json => print_json(&status)?,
    }
    Ok(())
}

fn run_init(common_config: Option<PathBuf>, force: bool) -> Result<()> {
    let ctx = AppContext::with_defaults()?;
    let path = common_config.unwrap_or_else(|| ctx.common_config_path());

    let outcome = match init_common_config(&path, force)? {
        InitOutcome::AlreadyExists(existing) => {
            if !interactive::confirm_overwrite(&existing)? {
                return Ok(());
            }
            init_common_config(&existing, true)?
        }
        created => created,
    };

    if let InitOutcome::Created(path) = outcome {
        println!("{}", style(format!("✓ Created {}", path.display())).green());
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}

fn print_plan(plan: &MergePlan) {
    println!("{}", style("Dry run: configuration only, nothing is started").blue().bold());
    println!();
    println!("{}", style("Sources:").bold());
    let project = plan
        .project_config
        .strip_prefix(&plan.workspace)
        .unwrap_or(&plan.project_config);
    println!("  Project config: {}", project.display());
    if plan.common_config_found {
        println!("  Common config:  {}", plan.common_config.display());
    } else {
        println!(
            "  Common config:  {} {}",
            plan.common_config.display(),
            style("(not found)").yellow()
        );
    }
    if !plan.mounts.is_empty() {
        println!("  Mounts:         {}", plan.mounts.join(", "));
    }
    if !plan.envs.is_empty() {
        println!("  Env:            {}", plan.envs.join(", "));
    }
    if !plan.ports.is_empty() {
        println!("  Ports:          {}", plan.ports.join(", "));
    }
    if plan.auto_forward_ports {
        println!("  Auto forward:   forwardPorts -> appPort");
    }
    println!();
    println!("{}", style("Merged configuration:").bold());
    println!("{}", to_pretty_json(&plan.config));
}

fn print_status(status: &WorkspaceStatus) {
    println!("{}", style("DevContainer Status").bold());
    println!();
    println!("  {:<14} {}", style("Workspace").cyan(), status.workspace.display());

    match &status.container {
        Some(container) => {
            println!("  {:<14} {}", style("Status").cyan(), style("✓ Running").green());
            println!("  {:<14} {}", style("Container ID").cyan(), container.id);
            println!("  {:<14} {}", style("Image").cyan(), container.image);
            for (i, mount) in container.mounts.iter().enumerate() {
                let label = if i == 0 { "Mounts" } else { "" };
                println!("  {:<14} • {}", style(label).cyan(), mount);
            }
            if container.more_mounts > 0 {
                println!(
                    "  {:<14} • ... and {} more",
                    "", container.more_mounts
                );
            }
        }
        None => println!("  {:<14} {}", style("Status").cyan(), style("✗ Not running").red()),
    }

    match &status.config {
        Some(config) => println!("  {:<14} {}", style("Config").cyan(), config.display()),
        None => println!(
            "  {:<14} {}",
            style("Config").cyan(),
            style("no devcontainer.json found").yellow()
        ),
    }
    match (&status.workspace_folder, &status.workspace_folder_error) {
        (Some(folder), _) => println!("  {:<14} {}", style("Folder").cyan(), folder),
        (None, Some(err)) => println!("  {:<14} {}", style("Folder").cyan(), style(err).red()),
        (None, None) => {}
    }
}
