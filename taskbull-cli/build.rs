use std::path::Path;
use std::process::Command;

/// Short commit of the checkout being built, if git can tell us.
fn git_short_sha(repo: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let crate_dir = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
    let workspace = Path::new(&crate_dir).join("..");

    let sha = git_short_sha(&workspace).unwrap_or_else(|| "unknown".to_owned());
    println!("cargo:rustc-env=TASKBULL_BUILD_SHA={sha}");

    // HEAD moves on checkout; the ref it points at moves on commit.
    for watched in [".git/HEAD", ".git/refs/heads"] {
        println!("cargo:rerun-if-changed={}", workspace.join(watched).display());
    }
}
