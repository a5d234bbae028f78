//! Command-line interface implementation for the template patcher.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BASE_IMAGE, DEFAULT_EMBEDDED_APP, DEFAULT_WORKDIR, MANIFEST_FILE,
};
use crate::manifest::MatchMode;
use crate::patcher::PatchOptions;
use crate::workflow::Event;

/// Command-line arguments structure.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "template-patcher: prepares a project template with an embedded app checkout for CI",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch a checked-out template so it builds against the embedded app
    Patch(PatchArgs),

    /// Clone a repository into a destination directory
    Checkout(CheckoutArgs),

    /// Run the steps of a workflow file sequentially
    Run(RunArgs),

    /// List template files that are copied without rendering
    Verbatim(VerbatimArgs),
}

#[derive(ClapArgs, Debug)]
pub struct PatchArgs {
    /// Template configuration file (e.g. cookiecutter.json)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Template project directory containing the embedded checkout
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Package name of the embedded application
    #[arg(long, default_value = DEFAULT_EMBEDDED_APP)]
    pub app: String,

    /// Dependency manifest, relative to PROJECT_DIR
    #[arg(long, default_value = MANIFEST_FILE)]
    pub manifest: String,

    /// Executable run by the container; defaults to the configuration's app_name
    #[arg(long)]
    pub entrypoint: Option<String>,

    /// Base image of the build descriptor
    #[arg(long, default_value = DEFAULT_BASE_IMAGE)]
    pub base_image: String,

    /// Working directory inside the container
    #[arg(long, default_value = DEFAULT_WORKDIR)]
    pub workdir: String,

    /// How manifest lines are matched against the embedded package name
    #[arg(long = "match", value_enum, default_value_t = MatchMode::Name)]
    pub match_mode: MatchMode,
}

impl From<PatchArgs> for PatchOptions {
    fn from(args: PatchArgs) -> Self {
        PatchOptions {
            config_path: args.config,
            project_dir: args.project_dir,
            embedded_app: args.app,
            manifest: args.manifest,
            entrypoint: args.entrypoint,
            base_image: args.base_image,
            workdir: args.workdir,
            match_mode: args.match_mode,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct CheckoutArgs {
    /// Repository URL or local path
    #[arg(value_name = "REPOSITORY")]
    pub repository: String,

    /// Destination directory
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Replace a non-empty destination
    #[arg(short, long)]
    pub force: bool,
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    /// Workflow definition file
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    /// Run only this job
    #[arg(long)]
    pub job: Option<String>,

    /// Triggering event
    #[arg(long, value_enum, default_value_t = Event::Push)]
    pub event: Event,

    /// Branch the event targets
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// Directory step working directories are resolved against
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct VerbatimArgs {
    /// Template configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Directory the copy-without-render patterns are relative to
    #[arg(value_name = "TEMPLATE_DIR")]
    pub template_dir: PathBuf,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
