//! # Process exit codes.
//!
//! Fixed contract for external callers (init systems, container runtimes).
//! The non-zero custom codes are above 255; on Unix the kernel only keeps the
//! low byte of the status, so callers observe `code & 0xff`.

/// Exit status of the `workvisor` process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Everything went well.
    Success = 0,
    /// The supervisor itself failed (signal setup, shutdown deadline).
    RuntimeFailure = 1,
    /// The working directory could not be changed.
    CwdFailure = 1000,
    /// The configuration file could not be read or parsed.
    ConfigError = 1003,
    /// Running as `root` without being allowed to.
    RunningAsRoot = 1005,
}

impl ExitCode {
    /// Returns the raw status passed to [`std::process::exit`].
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Terminates the process with this status.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::CwdFailure.code(), 1000);
        assert_eq!(ExitCode::ConfigError.code(), 1003);
        assert_eq!(ExitCode::RunningAsRoot.code(), 1005);
    }
}
