//! Byte order selection for the cursors.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Byte order used by [`crate::read::ByteReader`] and [`crate::write::ByteWriter`]
///
/// The SC container starts out big endian and switches to little endian part way
/// through its header for the newer versions, so the order is kept on each cursor
/// rather than fixed at compile time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Most significant byte first
    #[default]
    Big,

    /// Least significant byte first
    Little,
}

impl FromStr for Endian {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "big" => Ok(Endian::Big),
            "little" => Ok(Endian::Little),
            other => Err(Error::UnknownEndian(other.to_owned())),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Big => f.write_str("big"),
            Endian::Little => f.write_str("little"),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::endian::Endian;
    use crate::error::{Error, Result};

    #[test]
    fn parse_names() -> Result<()> {
        assert_eq!("big".parse::<Endian>()?, Endian::Big);
        assert_eq!("little".parse::<Endian>()?, Endian::Little);
        Ok(())
    }

    #[test]
    fn parse_unknown_name() {
        let err = "middle".parse::<Endian>().unwrap_err();
        assert!(matches!(err, Error::UnknownEndian(name) if name == "middle"));
    }
}
