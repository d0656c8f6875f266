//! Thin platform shims: executable location, environment, permissions.

use crate::error::GenError;
use std::path::{Path, PathBuf};

#[cfg(target_os = "linux")]
const PROC_SELF_EXE: &str = "/proc/self/exe";

/// Absolute path of the running executable.
///
/// On Linux this reads the process self-link, so it fails with the OS error
/// code when `/proc` is unavailable.
pub fn executable_path() -> Result<PathBuf, GenError> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_link(PROC_SELF_EXE)
            .map_err(|e| GenError::from_os(&e, format!("reading {}", PROC_SELF_EXE)))
    }
    #[cfg(not(target_os = "linux"))]
    {
        std::env::current_exe().map_err(|e| GenError::from_os(&e, "resolving executable path"))
    }
}

/// Install root: the directory above the one holding the executable (`<root>/bin/exe`).
pub fn install_root() -> Result<PathBuf, GenError> {
    let exe = executable_path()?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| GenError::Os {
            code: libc::ENOENT,
            context: format!("deriving install root from {}", exe.display()),
        })
}

pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Set a process environment variable; empty or malformed names are rejected.
pub fn set_env(name: &str, value: &str) -> Result<(), GenError> {
    if name.is_empty() || name.contains(['=', '\0']) || value.contains('\0') {
        return Err(GenError::Os {
            code: libc::EINVAL,
            context: format!("setting environment variable '{}'", name),
        });
    }
    std::env::set_var(name, value);
    Ok(())
}

/// Whether the current user may execute `path`.
#[cfg(unix)]
pub fn can_execute(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(not(unix))]
pub fn can_execute(path: &Path) -> bool {
    path.is_file()
}

/// Current file-creation mask.
///
/// The only query available sets a new mask, so it is restored right away;
/// callers running other threads that create files should read it early.
#[cfg(unix)]
pub fn current_umask() -> u32 {
    // SAFETY: umask has no memory-safety preconditions.
    unsafe {
        let mask = libc::umask(0);
        libc::umask(mask);
        mask as u32
    }
}

#[cfg(not(unix))]
pub fn current_umask() -> u32 {
    0
}

/// Permission bits a newly created generated directory ends up with.
pub fn generated_dir_mode() -> u32 {
    0o777 & !current_umask()
}
