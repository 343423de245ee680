//! I/O error hints.
//!
//! Maps raw OS error codes (falling back to `io::ErrorKind`) to a short,
//! actionable suffix for user-facing failure messages.

use std::io;

/// Short remedy for common filesystem failures, if one applies.
pub fn hint_for(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => {
                    Some("permission denied; check ownership and write permissions")
                }
                libc::ENOSPC => Some("insufficient space on device"),
                libc::EROFS => Some("read-only filesystem; cannot write here"),
                libc::ENOENT => Some("path not found; verify it exists"),
                libc::EBUSY => Some("resource busy; ensure no other process is using it"),
                libc::ENOTEMPTY => Some("directory not empty; something was written during cleanup"),
                libc::ENAMETOOLONG => Some("filename or path too long"),
                libc::EMFILE | libc::ENFILE => Some("too many open files"),
                libc::ENOMEM => Some("out of memory; the whole tree is buffered before writing"),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions"),
                32 => Some("sharing violation; file is in use"),
                2 | 3 => Some("path not found; verify it exists"),
                112 => Some("insufficient disk space"),
                206 => Some("filename or path too long"),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        let _ = code;
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions")
        }
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::OutOfMemory => {
            Some("out of memory; the whole tree is buffered before writing")
        }
        _ => None,
    }
}

/// `error` followed by its hint, when there is one.
pub fn describe_io_error(e: &io::Error) -> String {
    match hint_for(e) {
        Some(hint) => format!("{e} ({hint})"),
        None => e.to_string(),
    }
}
