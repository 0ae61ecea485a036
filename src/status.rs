//! Discrete status codes for host bindings.
//!
//! Hosts that cannot carry a Rust `Result` across their boundary (FFI, plugin bridges) get a
//! plain integer instead. The numbering matches the one LC3 plugin hosts already expect.

use crate::Result;

/// Outcome of a decoder operation as seen by a host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Ok = 0,
    NotInitialized = 1,
    InvalidParameters = 2,
    MemoryError = 3,
    InternalError = 4,
}

/// Returned by geometry queries at the host boundary when no valid value exists.
pub const GEOMETRY_ERROR: i32 = -1;

impl Status {
    /// Collapse an operation result into its status code.
    pub fn from_result<T>(res: &Result<T>) -> Self {
        match res {
            Ok(_) => Self::Ok,
            Err(err) => err.status(),
        }
    }

    /// The raw integer code.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

/// Flatten a geometry query into a plain integer, using [`GEOMETRY_ERROR`] for any failure.
pub fn geometry_code(res: Result<usize>) -> i32 {
    res.ok()
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(GEOMETRY_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn codes_follow_host_numbering() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::NotInitialized.code(), 1);
        assert_eq!(Status::InvalidParameters.code(), 2);
        assert_eq!(Status::MemoryError.code(), 3);
        assert_eq!(Status::InternalError.code(), 4);
    }

    #[test]
    fn errors_map_to_their_status() {
        let cases = [
            (Error::NotInitialized, Status::NotInitialized),
            (Error::invalid("bit depth"), Status::InvalidParameters),
            (Error::Memory { bytes: 64 }, Status::MemoryError),
            (Error::internal("setup failed"), Status::InternalError),
        ];
        for (err, status) in cases {
            assert_eq!(Status::from_result::<()>(&Err(err)), status);
        }
        assert!(Status::from_result(&Ok(())).is_ok());
    }

    #[test]
    fn geometry_errors_become_sentinel() {
        assert_eq!(geometry_code(Ok(160)), 160);
        assert_eq!(geometry_code(Err(Error::NotInitialized)), GEOMETRY_ERROR);
        assert_eq!(geometry_code(Ok(usize::MAX)), GEOMETRY_ERROR);
    }
}
