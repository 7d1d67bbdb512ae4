use std::process::Command;

/// Release tarballs carry no `.git`; packagers pass the commit in instead.
const SHA_OVERRIDE: &str = "PODPLAN_GIT_SHA";

fn main() {
    // /health reports this so a running gateway can be matched to the
    // commit it was built from when a schedule looks wrong.
    let sha = std::env::var(SHA_OVERRIDE)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=PODPLAN_GIT_SHA={sha}");
    println!("cargo:rerun-if-env-changed={SHA_OVERRIDE}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

fn git_short_sha() -> Option<String> {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}
