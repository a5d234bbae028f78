use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use template_patcher::cli::{Args, Commands};
use template_patcher::manifest::MatchMode;
use template_patcher::patcher::PatchOptions;
use template_patcher::workflow::Event;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("template-patcher")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_patch_defaults() {
    let args = make_args(&["patch", "cookiecutter.json", "./project"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(!parsed.verbose);
    let Commands::Patch(patch) = parsed.command else {
        panic!("Expected patch command");
    };
    let options = PatchOptions::from(patch);
    assert_eq!(options.config_path, PathBuf::from("cookiecutter.json"));
    assert_eq!(options.project_dir, PathBuf::from("./project"));
    assert_eq!(options.embedded_app, "chrisapp");
    assert_eq!(options.manifest, "requirements.txt");
    assert_eq!(options.entrypoint, None);
    assert_eq!(options.base_image, "python:3.9.1-slim-buster");
    assert_eq!(options.match_mode, MatchMode::Name);
}

#[test]
fn test_patch_all_flags() {
    let args = make_args(&[
        "patch",
        "-v",
        "--app",
        "mylib",
        "--manifest",
        "deps.txt",
        "--entrypoint",
        "simpledsapp",
        "--base-image",
        "python:3.11",
        "--workdir",
        "/src",
        "--match",
        "substring",
        "cookiecutter.json",
        "./project",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    let Commands::Patch(patch) = parsed.command else {
        panic!("Expected patch command");
    };
    assert_eq!(patch.app, "mylib");
    assert_eq!(patch.manifest, "deps.txt");
    assert_eq!(patch.entrypoint.as_deref(), Some("simpledsapp"));
    assert_eq!(patch.base_image, "python:3.11");
    assert_eq!(patch.workdir, "/src");
    assert_eq!(patch.match_mode, MatchMode::Substring);
}

#[test]
fn test_checkout_args() {
    let args = make_args(&["checkout", "-f", "https://github.com/FNNDSC/chrisapp.git", "./app/chrisapp"]);
    let parsed = Args::try_parse_from(args).unwrap();

    let Commands::Checkout(checkout) = parsed.command else {
        panic!("Expected checkout command");
    };
    assert_eq!(checkout.repository, "https://github.com/FNNDSC/chrisapp.git");
    assert_eq!(checkout.dest, PathBuf::from("./app/chrisapp"));
    assert!(checkout.force);
}

#[test]
fn test_run_args() {
    let args = make_args(&["run", "ci.yml", "--event", "pull-request", "--branch", "dev", "--job", "test"]);
    let parsed = Args::try_parse_from(args).unwrap();

    let Commands::Run(run) = parsed.command else {
        panic!("Expected run command");
    };
    assert_eq!(run.workflow, PathBuf::from("ci.yml"));
    assert_eq!(run.event, Event::PullRequest);
    assert_eq!(run.branch, "dev");
    assert_eq!(run.job.as_deref(), Some("test"));
    assert_eq!(run.workdir, PathBuf::from("."));
}

#[test]
fn test_run_defaults_to_push_on_master() {
    let parsed = Args::try_parse_from(make_args(&["run", "ci.yml"])).unwrap();
    let Commands::Run(run) = parsed.command else {
        panic!("Expected run command");
    };
    assert_eq!(run.event, Event::Push);
    assert_eq!(run.branch, "master");
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&["patch", "cookiecutter.json"])).is_err());
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_invalid_match_mode() {
    let args = make_args(&["patch", "--match", "regex", "cookiecutter.json", "./project"]);
    assert!(Args::try_parse_from(args).is_err());
}
