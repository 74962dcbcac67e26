use std::io;

use crate::box_type::BoxType;

pub type Result<T> = std::result::Result<T, JP2Error>;

/// Errors raised while building, decoding or encoding a JP2 box tree.
#[derive(Debug, thiserror::Error)]
pub enum JP2Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A box ordering or cardinality rule was broken while adding a child.
    ///
    /// The child was not added; the container is unchanged.
    #[error(transparent)]
    StructuralViolation(#[from] StructuralViolation),

    #[error("malformed box type {box_type} at offset {offset}: {reason}")]
    BoxMalformed {
        box_type: BoxType,
        offset: u64,
        reason: &'static str,
    },

    /// The values 2-7 of LBox are reserved for ISO use.
    #[error("unsupported reserved box length {length} at offset {offset}")]
    ReservedBoxLength { length: u32, offset: u64 },

    #[error("truncated box header at offset {offset}, {available} bytes available")]
    TruncatedBoxHeader { offset: u64, available: u64 },

    #[error("box type {box_type} of {length} bytes does not fit a 4-byte length field")]
    BoxTooLarge { box_type: BoxType, length: u64 },

    #[error("invalid content for box type {box_type}: {reason}")]
    InvalidContent {
        box_type: BoxType,
        reason: &'static str,
    },
}

/// A broken ordering or cardinality rule inside a superbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructuralViolation {
    #[error("More than one {box_type} box")]
    Duplicate { box_type: BoxType },

    #[error("{expected} box must come first, found {box_type}")]
    OutOfOrder {
        expected: BoxType,
        box_type: BoxType,
    },

    #[error("{box_type} box is not allowed inside a {container} box")]
    NotAllowed {
        container: BoxType,
        box_type: BoxType,
    },
}

impl StructuralViolation {
    /// Type of the box whose insertion was refused.
    pub fn box_type(&self) -> BoxType {
        match self {
            Self::Duplicate { box_type } => *box_type,
            Self::OutOfOrder { box_type, .. } => *box_type,
            Self::NotAllowed { box_type, .. } => *box_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_type::{BOX_TYPE_HEADER, BOX_TYPE_IMAGE_HEADER, BOX_TYPE_PALETTE};

    #[test]
    fn structural_violation_messages() {
        let error = JP2Error::from(StructuralViolation::Duplicate {
            box_type: BOX_TYPE_IMAGE_HEADER,
        });
        assert_eq!(error.to_string(), "More than one ihdr box");

        let error = JP2Error::from(StructuralViolation::OutOfOrder {
            expected: BOX_TYPE_IMAGE_HEADER,
            box_type: BOX_TYPE_PALETTE,
        });
        assert_eq!(error.to_string(), "ihdr box must come first, found pclr");

        let violation = StructuralViolation::NotAllowed {
            container: BOX_TYPE_HEADER,
            box_type: BOX_TYPE_HEADER,
        };
        assert_eq!(violation.to_string(), "jp2h box is not allowed inside a jp2h box");
        assert_eq!(violation.box_type(), BOX_TYPE_HEADER);
    }
}
