//! Build metadata shown by `navbench --version`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `git describe` output captured at build time.
pub const GIT_COMMIT: &str = env!("NAVBENCH_BUILD_GIT_HASH");

pub const BUILD_TIMESTAMP: &str = env!("NAVBENCH_BUILD_TIMESTAMP");

/// Long version text: `<version>\ncommit: ...\nbuilt: ...`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("NAVBENCH_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("NAVBENCH_BUILD_TIMESTAMP")
);

/// One-line summary logged when a run starts.
pub fn version_line() -> String {
    format!("navbench {VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_contains_all_fields() {
        let text = version_line();
        assert!(text.starts_with("navbench "));
        assert!(text.contains(GIT_COMMIT));
        assert!(text.contains(BUILD_TIMESTAMP));
    }

    #[test]
    fn long_version_lists_commit_and_build_time() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains("\ncommit: "));
        assert!(LONG_VERSION.contains("\nbuilt: "));
    }
}
