//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the XDG config root.
const APP_DIR: &str = "moviedash";

/// Resolves the config file path.
///
/// Looks at `{dir}/config.toml`, then `$XDG_CONFIG_HOME/moviedash/config.toml`,
/// then `~/.config/moviedash/config.toml`.
///
/// # Errors
///
/// Returns an error if no directory is given and neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Picks the config path from an explicit directory and the environment.
fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let root = match (xdg_config_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg,
        (_, Some(home)) => home.join(".config"),
        _ => bail!("cannot locate config: neither XDG_CONFIG_HOME nor HOME is set"),
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}
