use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use template_patcher::checkout::{checkout, RepoSource};
use template_patcher::error::Error;
use template_patcher::vcs::strip_vcs_metadata;

fn init_repo(path: &Path) {
    let repo = Repository::init(path).unwrap();
    fs::write(path.join("setup.py"), "name = 'chrisapp'\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("setup.py")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = Signature::now("FNNDSC", "dev@babymri.org").unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
        .unwrap();
}

#[test]
fn test_repo_source_from_string() {
    assert_eq!(
        RepoSource::from_string("https://github.com/FNNDSC/chrisapp.git"),
        RepoSource::Git("https://github.com/FNNDSC/chrisapp.git".to_string())
    );
    assert_eq!(
        RepoSource::from_string("./chrisapp"),
        RepoSource::FileSystem("./chrisapp".into())
    );
}

#[test]
fn test_checkout_local_repository() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    init_repo(source.path());
    let dest = target.path().join("app").join("chrisapp");

    let cloned = checkout(&RepoSource::FileSystem(source.path().to_path_buf()), &dest, false).unwrap();

    assert_eq!(cloned, dest);
    assert_eq!(fs::read_to_string(dest.join("setup.py")).unwrap(), "name = 'chrisapp'\n");
    assert!(dest.join(".git").is_dir());

    // The patch step then strips the nested repository.
    assert!(strip_vcs_metadata(&dest).unwrap());
    assert!(!dest.join(".git").exists());
    assert!(dest.join("setup.py").exists());
}

#[test]
fn test_checkout_into_non_empty_destination() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    init_repo(source.path());
    fs::write(dest.path().join("stale.txt"), "old").unwrap();
    let repo = RepoSource::FileSystem(source.path().to_path_buf());

    let result = checkout(&repo, dest.path(), false);
    assert!(matches!(result, Err(Error::CheckoutDestinationExists { .. })));
    assert!(dest.path().join("stale.txt").exists());

    checkout(&repo, dest.path(), true).unwrap();
    assert!(!dest.path().join("stale.txt").exists());
    assert!(dest.path().join("setup.py").exists());
}

#[test]
fn test_checkout_missing_local_source() {
    let target = TempDir::new().unwrap();
    let missing = RepoSource::FileSystem(target.path().join("missing"));

    let result = checkout(&missing, target.path().join("dest"), false);
    assert!(matches!(result, Err(Error::NotFoundError { .. })));
}
