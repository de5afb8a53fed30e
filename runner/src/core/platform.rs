//! Host platform classification.
//!
//! The runner dispatches on the platform in exactly two places: the Blender
//! executable suffix and whether paths must be rewritten before Blender sees
//! them. Both are exhaustive matches on [`Platform`].

use std::ffi::OsStr;

/// Base name of the Blender executable inside an install directory.
pub const BLENDER_BASENAME: &str = "blender";

/// Platform the runner was started on, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux, macOS and other POSIX-like hosts.
    Posix,
    /// Native Windows.
    Windows,
    /// A POSIX emulation layer (Cygwin) launching native Windows executables.
    Cygwin,
}

impl Platform {
    /// Detect the current platform.
    ///
    /// A Windows build counts as Cygwin when started from a Cygwin shell
    /// (`OSTYPE=cygwin`), since paths handed to it are then POSIX-style.
    pub fn detect() -> Self {
        if cfg!(target_os = "cygwin") {
            return Platform::Cygwin;
        }
        if cfg!(windows) {
            return Self::windows_family(std::env::var_os("OSTYPE").as_deref());
        }
        Platform::Posix
    }

    fn windows_family(ostype: Option<&OsStr>) -> Self {
        match ostype.and_then(OsStr::to_str) {
            Some(value) if value.starts_with("cygwin") => Platform::Cygwin,
            _ => Platform::Windows,
        }
    }

    /// Suffix appended to executable names.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Platform::Posix => "",
            Platform::Windows | Platform::Cygwin => ".exe",
        }
    }

    /// Whether paths must go through `cygpath` before Blender can read them.
    pub fn needs_path_translation(self) -> bool {
        match self {
            Platform::Posix | Platform::Windows => false,
            Platform::Cygwin => true,
        }
    }

    /// File name of the Blender executable on this platform.
    pub fn blender_executable_name(self) -> String {
        format!("{BLENDER_BASENAME}{}", self.exe_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_executable_has_no_suffix() {
        assert_eq!(Platform::Posix.blender_executable_name(), "blender");
    }

    #[test]
    fn windows_family_uses_exe_suffix() {
        assert_eq!(Platform::Windows.blender_executable_name(), "blender.exe");
        assert_eq!(Platform::Cygwin.blender_executable_name(), "blender.exe");
    }

    #[test]
    fn only_cygwin_translates_paths() {
        assert!(!Platform::Posix.needs_path_translation());
        assert!(!Platform::Windows.needs_path_translation());
        assert!(Platform::Cygwin.needs_path_translation());
    }

    #[test]
    fn windows_build_under_cygwin_shell_is_cygwin() {
        assert_eq!(
            Platform::windows_family(Some(OsStr::new("cygwin"))),
            Platform::Cygwin
        );
        assert_eq!(Platform::windows_family(None), Platform::Windows);
        assert_eq!(
            Platform::windows_family(Some(OsStr::new("msys"))),
            Platform::Windows
        );
    }

    #[test]
    #[cfg(all(unix, not(target_os = "cygwin")))]
    fn detect_on_unix_is_posix() {
        assert_eq!(Platform::detect(), Platform::Posix);
    }
}
