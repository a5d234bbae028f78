//! Entry point of the template patcher.
//! Parses the command line and dispatches to the patch, checkout, workflow
//! and verbatim-listing operations.

use template_patcher::{
    checkout::{checkout, RepoSource},
    cli::{get_args, CheckoutArgs, Commands, PatchArgs, RunArgs, VerbatimArgs},
    config::TemplateConfig,
    error::{default_error_handler, Result},
    logger::init_logger,
    patcher::{PatchOptions, TemplatePatcher},
    renderer::MiniJinjaRenderer,
    runner::ShellRunner,
    verbatim::verbatim_files,
    workflow::{Workflow, WorkflowRunner},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    let result = match args.command {
        Commands::Patch(args) => run_patch(args),
        Commands::Checkout(args) => run_checkout(args),
        Commands::Run(args) => run_workflow(args),
        Commands::Verbatim(args) => run_verbatim(args),
    };

    if let Err(err) = result {
        default_error_handler(err);
    }
}

fn run_patch(args: PatchArgs) -> Result<()> {
    let renderer = MiniJinjaRenderer::new();
    let options = PatchOptions::from(args);
    let report = TemplatePatcher::new(&renderer).patch(&options)?;

    for line in &report.removed_requirements {
        log::debug!("Dropped requirement '{line}'");
    }
    println!(
        "Template patched in {} (entry point '{}').",
        options.project_dir.display(),
        report.entrypoint
    );
    Ok(())
}

fn run_checkout(args: CheckoutArgs) -> Result<()> {
    let source = RepoSource::from_string(&args.repository);
    println!("Checking out {source}");
    let dest = checkout(&source, &args.dest, args.force)?;
    println!("Checked out into {}.", dest.display());
    Ok(())
}

fn run_workflow(args: RunArgs) -> Result<()> {
    let workflow = Workflow::load(&args.workflow)?;
    if !workflow.is_triggered(args.event, &args.branch) {
        log::info!(
            "Workflow is not triggered by {} on '{}'; nothing to do",
            args.event.key(),
            args.branch
        );
        return Ok(());
    }

    let runner = ShellRunner::new();
    let summary = WorkflowRunner::new(&runner, &args.workdir).run(&workflow, args.job.as_deref())?;
    println!(
        "Workflow completed: {} step(s) run, {} skipped.",
        summary.executed, summary.skipped
    );
    Ok(())
}

fn run_verbatim(args: VerbatimArgs) -> Result<()> {
    let config = TemplateConfig::load(&args.config)?;
    for path in verbatim_files(&config, &args.template_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}
