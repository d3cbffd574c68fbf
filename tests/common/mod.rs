// Shared fixtures for integration tests
// Each test builds its own throwaway repository with git2
#![allow(dead_code)]

use git2::{ObjectType, Oid, Repository, Signature};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty repository in a temporary directory
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();
    let repo = Repository::init(&repo_path).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

fn signature() -> Signature<'static> {
    Signature::now("Test User", "test@example.com").unwrap()
}

/// Write files to the worktree, stage them and commit on HEAD
pub fn add_commit(repo: &Repository, files: &[(&str, &[u8])], message: &str) -> Oid {
    let sig = signature();
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

pub fn create_branch(repo: &Repository, name: &str, target: Oid) {
    let commit = repo.find_commit(target).unwrap();
    repo.branch(name, &commit, false).unwrap();
}

pub fn annotated_tag(repo: &Repository, name: &str, target: Oid) -> Oid {
    let object = repo.find_object(target, Some(ObjectType::Commit)).unwrap();
    repo.tag(name, &object, &signature(), "release", false).unwrap()
}

pub fn lightweight_tag(repo: &Repository, name: &str, target: Oid) -> Oid {
    let object = repo.find_object(target, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap()
}

pub fn remote_ref(repo: &Repository, remote: &str, branch: &str, target: Oid) {
    let name = format!("refs/remotes/{remote}/{branch}");
    repo.reference(&name, target, false, "test remote ref").unwrap();
}

/// Id of the blob stored at `path` in HEAD's tree
pub fn blob_at(repo: &Repository, path: &str) -> Oid {
    let tree = repo.head().unwrap().peel_to_tree().unwrap();
    tree.get_path(Path::new(path)).unwrap().id()
}

/// Delete a loose object so it looks promised but not present
pub fn remove_loose_object(repo_path: &Path, id: Oid) {
    let hex = id.to_string();
    let file = repo_path
        .join(".git")
        .join("objects")
        .join(&hex[..2])
        .join(&hex[2..]);
    std::fs::remove_file(file).unwrap();
}

pub fn set_config(repo: &Repository, key: &str, value: &str) {
    repo.config().unwrap().set_str(key, value).unwrap();
}

/// Repository that borrows every object from `source` through
/// `objects/info/alternates`, with HEAD on `main` at `head`
pub fn borrowing_repo(source: &Path, head: Oid) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();
    Repository::init(&repo_path).unwrap();

    let git_dir = repo_path.join(".git");
    let source_objects = source.join(".git").join("objects");
    std::fs::write(
        git_dir.join("objects").join("info").join("alternates"),
        format!("{}\n", source_objects.display()),
    )
    .unwrap();
    std::fs::create_dir_all(git_dir.join("refs").join("heads")).unwrap();
    std::fs::write(git_dir.join("refs").join("heads").join("main"), format!("{head}\n")).unwrap();
    std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();

    (dir, repo_path)
}

/// Blobless partial clone of `origin` made with the git binary, no checkout
pub fn blobless_clone(origin: &Path) -> (TempDir, PathBuf) {
    let origin_repo = Repository::open(origin).unwrap();
    set_config(&origin_repo, "uploadpack.allowFilter", "true");
    set_config(&origin_repo, "uploadpack.allowAnySHA1InWant", "true");

    let dir = TempDir::new().unwrap();
    let clone_path = dir.path().join("clone");
    let status = std::process::Command::new("git")
        .args(["clone", "--quiet", "--no-local", "--no-checkout", "--filter=blob:none"])
        .arg(format!("file://{}", origin.display()))
        .arg(&clone_path)
        .status()
        .unwrap();
    assert!(status.success(), "git clone failed");

    (dir, clone_path)
}
