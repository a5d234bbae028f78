//! CI workflow definitions and their sequential execution.
//!
//! Understands the subset of the GitHub Actions format the integration job
//! uses: `on` triggers with branch filters, jobs made of steps, and steps
//! that either `run` a shell script or `use` a remote action. Remote actions
//! cannot run locally and are skipped.

use crate::error::{Error, Result};
use crate::runner::CommandRunner;
use globset::Glob;
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Events a workflow can be triggered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Event {
    Push,
    PullRequest,
}

impl Event {
    /// Key of the event in the `on` section.
    pub fn key(&self) -> &'static str {
        match self {
            Event::Push => "push",
            Event::PullRequest => "pull_request",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BranchFilter {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default, rename = "branches-ignore")]
    pub branches_ignore: Vec<String>,
}

fn any_matches(patterns: &[String], branch: &str) -> bool {
    patterns.iter().any(|pattern| match Glob::new(pattern) {
        Ok(glob) => glob.compile_matcher().is_match(branch),
        Err(_) => pattern == branch,
    })
}

impl BranchFilter {
    /// Entries are glob patterns. Ignored branches are rejected first; an empty
    /// `branches` list then accepts everything else.
    pub fn accepts(&self, branch: &str) -> bool {
        if any_matches(&self.branches_ignore, branch) {
            return false;
        }
        self.branches.is_empty() || any_matches(&self.branches, branch)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TriggerSpec {
    Single(String),
    List(Vec<String>),
    Map(IndexMap<String, Option<BranchFilter>>),
}

/// Events enabled in the `on` section, with their branch filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "TriggerSpec")]
pub struct Triggers {
    events: IndexMap<String, BranchFilter>,
}

impl From<TriggerSpec> for Triggers {
    fn from(spec: TriggerSpec) -> Self {
        let events = match spec {
            TriggerSpec::Single(event) => IndexMap::from([(event, BranchFilter::default())]),
            TriggerSpec::List(events) => {
                events.into_iter().map(|event| (event, BranchFilter::default())).collect()
            }
            TriggerSpec::Map(events) => events
                .into_iter()
                .map(|(event, filter)| (event, filter.unwrap_or_default()))
                .collect(),
        };
        Self { events }
    }
}

impl Triggers {
    pub fn filter(&self, event: Event) -> Option<&BranchFilter> {
        self.events.get(event.key())
    }
}

/// A single workflow step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Step {
    pub name: Option<String>,
    pub run: Option<String>,
    pub uses: Option<String>,
    pub working_directory: Option<PathBuf>,
    #[serde(default)]
    pub env: IndexMap<String, serde_yaml::Value>,
}

impl Step {
    /// Name shown in logs and errors.
    pub fn display_name(&self, index: usize) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(first_line) = self.run.as_deref().and_then(|run| run.lines().next()) {
            return first_line.trim().to_string();
        }
        if let Some(uses) = &self.uses {
            return uses.clone();
        }
        format!("step {}", index + 1)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    pub name: Option<String>,
    #[serde(default)]
    pub env: IndexMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A parsed workflow file.
#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub name: Option<String>,
    #[serde(default)]
    pub on: Triggers,
    #[serde(default)]
    pub env: IndexMap<String, serde_yaml::Value>,
    pub jobs: IndexMap<String, Job>,
}

impl Workflow {
    /// Parses a workflow definition.
    ///
    /// # Errors
    /// * `Error::ConfigParseError` if the YAML is malformed
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParseError(format!("Invalid workflow: {e}")))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
        debug!("Loading workflow from {}", path.display());
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Returns whether `event` on `branch` triggers this workflow.
    pub fn is_triggered(&self, event: Event, branch: &str) -> bool {
        self.on.filter(event).is_some_and(|filter| filter.accepts(branch))
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Result<String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        other => Err(Error::WorkflowError(format!(
            "environment values must be scalars, found {other:?}"
        ))),
    }
}

fn merge_env(
    target: &mut IndexMap<String, String>,
    source: &IndexMap<String, serde_yaml::Value>,
) -> Result<()> {
    for (key, value) in source {
        target.insert(key.clone(), scalar_to_string(value)?);
    }
    Ok(())
}

/// Counts of what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub skipped: usize,
}

/// Runs workflow jobs step by step, stopping at the first failure.
pub struct WorkflowRunner<'a> {
    runner: &'a dyn CommandRunner,
    workdir: PathBuf,
}

impl<'a> WorkflowRunner<'a> {
    /// # Arguments
    /// * `runner` - Executes `run` scripts
    /// * `workdir` - Directory step working directories are resolved against
    pub fn new<P: Into<PathBuf>>(runner: &'a dyn CommandRunner, workdir: P) -> Self {
        Self { runner, workdir: workdir.into() }
    }

    /// Runs the selected job, or every job in declaration order.
    ///
    /// # Errors
    /// * `Error::WorkflowError` if `job` is unknown or a step has neither `run` nor `uses`
    /// * `Error::ExternalToolError` for the first step exiting non-zero
    pub fn run(&self, workflow: &Workflow, job: Option<&str>) -> Result<RunSummary> {
        let jobs: Vec<(&String, &Job)> = match job {
            Some(id) => {
                let entry = workflow
                    .jobs
                    .get_key_value(id)
                    .ok_or_else(|| Error::WorkflowError(format!("unknown job '{id}'")))?;
                vec![entry]
            }
            None => workflow.jobs.iter().collect(),
        };

        let mut summary = RunSummary::default();
        for (id, job) in jobs {
            info!("Job '{}'", job.name.as_deref().unwrap_or(id));
            let mut env = IndexMap::new();
            merge_env(&mut env, &workflow.env)?;
            merge_env(&mut env, &job.env)?;
            let job_summary = self.run_job(job, &env)?;
            summary.executed += job_summary.executed;
            summary.skipped += job_summary.skipped;
        }
        Ok(summary)
    }

    fn run_job(&self, job: &Job, job_env: &IndexMap<String, String>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, step) in job.steps.iter().enumerate() {
            let name = step.display_name(index);
            match (&step.run, &step.uses) {
                (Some(script), _) => {
                    let cwd = match &step.working_directory {
                        Some(dir) => self.workdir.join(dir),
                        None => self.workdir.clone(),
                    };
                    if !cwd.is_dir() {
                        return Err(Error::not_found(&cwd));
                    }
                    let mut env = job_env.clone();
                    merge_env(&mut env, &step.env)?;

                    info!("Step '{name}'");
                    let code = self.runner.run(script, &cwd, &env)?;
                    if code != 0 {
                        return Err(Error::ExternalToolError { step: name, code });
                    }
                    summary.executed += 1;
                }
                (None, Some(action)) => {
                    warn!("Skipping step '{name}': action '{action}' cannot run locally");
                    summary.skipped += 1;
                }
                (None, None) => {
                    return Err(Error::WorkflowError(format!(
                        "step '{name}' has neither 'run' nor 'uses'"
                    )))
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_forms() {
        let workflow = Workflow::parse("on: push\njobs: {}\n").unwrap();
        assert!(workflow.is_triggered(Event::Push, "any"));
        assert!(!workflow.is_triggered(Event::PullRequest, "any"));

        let workflow = Workflow::parse("on: [push, pull_request]\njobs: {}\n").unwrap();
        assert!(workflow.is_triggered(Event::PullRequest, "dev"));

        let workflow = Workflow::parse("on:\n  push:\n  pull_request:\n    branches: [master]\njobs: {}\n").unwrap();
        assert!(workflow.is_triggered(Event::Push, "dev"));
        assert!(workflow.is_triggered(Event::PullRequest, "master"));
        assert!(!workflow.is_triggered(Event::PullRequest, "dev"));
    }

    #[test]
    fn test_branch_glob() {
        let filter = BranchFilter { branches: vec!["release/*".to_string()], ..Default::default() };
        assert!(filter.accepts("release/1.0"));
        assert!(!filter.accepts("master"));
    }

    #[test]
    fn test_ignored_branches_win() {
        let filter = BranchFilter {
            branches: vec!["release/*".to_string()],
            branches_ignore: vec!["release/*-rc".to_string()],
        };
        assert!(filter.accepts("release/1.0"));
        assert!(!filter.accepts("release/1.0-rc"));
    }

    #[test]
    fn test_step_display_name() {
        let step = Step { run: Some("pip install .\npytest".to_string()), ..Default::default() };
        assert_eq!(step.display_name(0), "pip install .");
        assert_eq!(Step::default().display_name(2), "step 3");
    }
}
