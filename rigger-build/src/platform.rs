//! Operating-system suffix appended to artifact names.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Platform label for `os` (a [`std::env::consts::OS`] value).
pub fn platform_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "windows" => "Windows".to_string(),
        "macos" => "Darwin".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Platform label of the running host.
pub fn host_platform() -> String {
    platform_name(std::env::consts::OS)
}

/// `{stem}-{platform}{.ext}`, e.g. `app.tar.gz` becomes `app.tar-Linux.gz`.
pub fn suffixed_name(name: &OsStr, platform: &str) -> OsString {
    let path = Path::new(name);
    let mut out = path.file_stem().unwrap_or(name).to_os_string();
    out.push("-");
    out.push(platform);
    if let Some(ext) = path.extension() {
        out.push(".");
        out.push(ext);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_systems() {
        assert_eq!(platform_name("linux"), "Linux");
        assert_eq!(platform_name("windows"), "Windows");
        assert_eq!(platform_name("macos"), "Darwin");
        assert_eq!(platform_name("freebsd"), "Freebsd");
    }

    #[test]
    fn suffix_goes_before_the_last_extension() {
        assert_eq!(suffixed_name(OsStr::new("app.exe"), "Windows"), "app-Windows.exe");
        assert_eq!(suffixed_name(OsStr::new("app.tar.gz"), "Linux"), "app.tar-Linux.gz");
        assert_eq!(suffixed_name(OsStr::new("bundle"), "Darwin"), "bundle-Darwin");
    }
}
