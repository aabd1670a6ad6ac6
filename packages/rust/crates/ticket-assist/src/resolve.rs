//! Knob resolution: CLI flag > environment variable > settings file > default.

use std::path::{Path, PathBuf};

pub(crate) fn resolve_string(
    cli_value: Option<String>,
    env_name: &str,
    settings_value: Option<&str>,
    default: &str,
) -> String {
    if let Some(value) = cli_value {
        return value;
    }
    if let Ok(value) = std::env::var(env_name)
        && !value.trim().is_empty()
    {
        return value;
    }
    if let Some(value) = settings_value {
        return value.to_string();
    }
    default.to_string()
}

/// Like [`resolve_string`] without a default; blank values count as unset.
pub(crate) fn resolve_optional_string(
    cli_value: Option<String>,
    env_name: &str,
    settings_value: Option<&str>,
) -> Option<String> {
    cli_value
        .or_else(|| std::env::var(env_name).ok())
        .or_else(|| settings_value.map(ToString::to_string))
        .and_then(non_empty_string)
}

pub(crate) fn resolve_optional_path(
    cli_value: Option<PathBuf>,
    env_name: &str,
    settings_value: Option<&str>,
) -> Option<PathBuf> {
    cli_value.or_else(|| {
        resolve_optional_string(None, env_name, settings_value).map(PathBuf::from)
    })
}

pub(crate) fn resolve_path(
    cli_value: Option<PathBuf>,
    env_name: &str,
    settings_value: Option<&str>,
    default: &Path,
) -> PathBuf {
    resolve_optional_path(cli_value, env_name, settings_value)
        .unwrap_or_else(|| default.to_path_buf())
}

pub(crate) fn resolve_positive_u64(
    cli_value: Option<u64>,
    env_name: &str,
    settings_value: Option<u64>,
    default: u64,
) -> u64 {
    if let Some(value) = cli_value
        && value > 0
    {
        return value;
    }
    if let Some(value) = parse_positive_from_env::<u64>(env_name) {
        return value;
    }
    if let Some(value) = settings_value
        && value > 0
    {
        return value;
    }
    default
}

pub(crate) fn resolve_positive_u32(
    cli_value: Option<u32>,
    env_name: &str,
    settings_value: Option<u32>,
    default: u32,
) -> u32 {
    if let Some(value) = cli_value
        && value > 0
    {
        return value;
    }
    if let Some(value) = parse_positive_from_env::<u32>(env_name) {
        return value;
    }
    if let Some(value) = settings_value
        && value > 0
    {
        return value;
    }
    default
}

pub(crate) fn resolve_positive_usize(
    cli_value: Option<usize>,
    env_name: &str,
    settings_value: Option<usize>,
    default: usize,
) -> usize {
    if let Some(value) = cli_value
        && value > 0
    {
        return value;
    }
    if let Some(value) = parse_positive_from_env::<usize>(env_name) {
        return value;
    }
    if let Some(value) = settings_value
        && value > 0
    {
        return value;
    }
    default
}

fn parse_positive_from_env<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!(env_var = %name, value = %raw, "invalid positive integer env value");
            None
        }
    }
}

pub(crate) fn non_empty_string(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
