//! Default configuration constants.

/// Embedded default `navbench.toml` written by `navbench init`.
pub(super) const DEFAULT_NAVBENCH_CONFIG_TEMPLATE: &str =
    include_str!("../templates/navbench.toml");
/// File name looked up in the working directory and the global config dir.
pub(super) const CONFIG_FILE_NAME: &str = "navbench.toml";
/// Subdirectory of the config root holding the global config.
pub(super) const CONFIG_DIR_NAME: &str = "navbench";

pub(super) const DEFAULT_BENCHMARK_FILE: &str = "benchmarktasks.json";
pub(super) const DEFAULT_ACTIONS_FILE: &str = "agent_actions.json";
pub(super) const DEFAULT_GROUPED_FILE: &str = "grouped_agent_actions.json";
pub(super) const DEFAULT_RESULTS_FILE: &str = "final_results.json";
pub(super) const DEFAULT_TRANSCRIPTS_DIR: &str = "transcripts";
