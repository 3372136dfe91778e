use std::{env, path::PathBuf};

/// Returns the user's home directory from `$HOME`, falling back to
/// `/home/$USER`.
pub fn home_dir() -> PathBuf {
    env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| {
        let user = env::var("USER").unwrap_or_default();
        PathBuf::from(format!("/home/{user}"))
    })
}

/// Returns the user's config directory following the XDG Base Directory
/// Specification: `$XDG_CONFIG_HOME`, or `$HOME/.config` when unset.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}
