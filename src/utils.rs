use std::path::PathBuf;

pub fn get_config_dir() -> PathBuf {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(path).join("marksheet");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/marksheet");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("marksheet");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
