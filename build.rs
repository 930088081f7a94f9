//! Embed the git revision and build time into the binary.
//!
//! Both values may be pinned from the environment. `SOURCE_DATE_EPOCH` is
//! honored for reproducible builds; missing tooling yields "unknown".

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_HASH_VAR: &str = "NAVBENCH_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "NAVBENCH_BUILD_TIMESTAMP";

fn main() {
    for var in [GIT_HASH_VAR, TIMESTAMP_VAR, "SOURCE_DATE_EPOCH"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    watch_git_head();

    let git_hash = env::var(GIT_HASH_VAR)
        .ok()
        .or_else(|| capture("git", &["describe", "--always", "--dirty", "--abbrev=12"]))
        .unwrap_or_else(|| "unknown".to_string());
    let timestamp = env::var(TIMESTAMP_VAR)
        .ok()
        .unwrap_or_else(build_timestamp);

    println!("cargo:rustc-env={GIT_HASH_VAR}={git_hash}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={timestamp}");
}

fn watch_git_head() {
    let Some(git_dir) = capture("git", &["rev-parse", "--git-dir"]) else {
        return;
    };
    println!("cargo:rerun-if-changed={git_dir}/HEAD");
    if let Some(reference) = capture("git", &["symbolic-ref", "-q", "HEAD"]) {
        println!("cargo:rerun-if-changed={git_dir}/{reference}");
    }
}

fn build_timestamp() -> String {
    if let Ok(epoch) = env::var("SOURCE_DATE_EPOCH") {
        let at = format!("@{epoch}");
        if let Some(stamp) = capture("date", &["-u", "-d", &at, "+%Y-%m-%dT%H:%M:%SZ"]) {
            return stamp;
        }
        return format!("unix:{epoch}");
    }
    capture("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(|| {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("unix:{secs}")
    })
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
