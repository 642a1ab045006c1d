use std::{fmt, io};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Every usable block is allocated.
    NoSpace,
    /// Backing memory for the store could not be reserved.
    OutOfMemory,
    Io(io::Error),
    /// A store image has the right size but cannot describe a valid store.
    Uninterpretable,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpace => write!(f, "no free block available"),
            Self::OutOfMemory => write!(f, "failed to allocate block store memory"),
            Self::Io(err) => write!(f, "block store I/O error: {}", err),
            Self::Uninterpretable => write!(f, "block store image is uninterpretable"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for libc::c_int {
    fn from(err: Error) -> Self {
        match err {
            Error::NoSpace => libc::ENOSPC,
            Error::OutOfMemory => libc::ENOMEM,
            Error::Io(err) => err.raw_os_error().unwrap_or(libc::EIO),
            Error::Uninterpretable => libc::EIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping() {
        assert_eq!(libc::c_int::from(Error::NoSpace), libc::ENOSPC);
        assert_eq!(libc::c_int::from(Error::OutOfMemory), libc::ENOMEM);
        assert_eq!(libc::c_int::from(Error::Uninterpretable), libc::EIO);

        let not_found = io::Error::from_raw_os_error(libc::ENOENT);
        assert_eq!(libc::c_int::from(Error::from(not_found)), libc::ENOENT);

        let eof = io::Error::from(io::ErrorKind::UnexpectedEof);
        assert_eq!(libc::c_int::from(Error::from(eof)), libc::EIO);
    }
}
