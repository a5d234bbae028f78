use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use template_patcher::config::TemplateConfig;
use template_patcher::error::Error;
use template_patcher::verbatim::verbatim_files;

#[test]
fn test_lists_embedded_workflows() {
    let temp_dir = TempDir::new().unwrap();
    let workflows = temp_dir.path().join("chrisapp/.github/workflows");
    fs::create_dir_all(&workflows).unwrap();
    fs::write(workflows.join("ci.yml"), "on: push\n").unwrap();
    fs::write(workflows.join("release.yml"), "on: push\n").unwrap();
    fs::write(temp_dir.path().join("chrisapp/setup.py"), "").unwrap();
    fs::write(temp_dir.path().join("README.md"), "").unwrap();

    let config =
        TemplateConfig::parse(r#"{"_copy_without_render": ["chrisapp/.github/workflows/*"]}"#, None)
            .unwrap();
    let files = verbatim_files(&config, temp_dir.path()).unwrap();

    assert_eq!(
        files,
        vec![
            PathBuf::from("chrisapp/.github/workflows/ci.yml"),
            PathBuf::from("chrisapp/.github/workflows/release.yml"),
        ]
    );
}

#[test]
fn test_nothing_listed_without_patterns() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("README.md"), "").unwrap();

    let config = TemplateConfig::parse(r#"{"app_name": "app"}"#, None).unwrap();
    assert!(verbatim_files(&config, temp_dir.path()).unwrap().is_empty());
}

#[test]
fn test_missing_template_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config = TemplateConfig::parse("{}", None).unwrap();

    let result = verbatim_files(&config, temp_dir.path().join("missing"));
    assert!(matches!(result, Err(Error::NotFoundError { .. })));
}
