//! `NAVBENCH_*` environment overrides.

use std::path::PathBuf;

use super::Config;

/// Path overrides, applied after the config file is resolved.
pub(super) const PATH_ENV_VARS: [&str; 4] = [
    "NAVBENCH_BENCHMARK_FILE",
    "NAVBENCH_ACTIONS_FILE",
    "NAVBENCH_GROUPED_FILE",
    "NAVBENCH_RESULTS_FILE",
];

pub(super) fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    let paths = &mut config.paths;
    let targets: [&mut PathBuf; 4] = [
        &mut paths.benchmark,
        &mut paths.actions,
        &mut paths.grouped,
        &mut paths.results,
    ];
    for (name, target) in PATH_ENV_VARS.into_iter().zip(targets) {
        if let Some(value) = non_empty_env(env_lookup, name) {
            *target = PathBuf::from(value);
        }
    }
}

/// Blank values count as unset.
fn non_empty_env<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
