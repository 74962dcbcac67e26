use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io::{self, Read};

use crate::box_type::BoxType;
use crate::error::{JP2Error, Result};

/// Length of the compact box header: LBox followed by TBox.
pub const BOX_HEADER_LENGTH: u64 = 8;

/// Length of the extended box header: LBox, TBox and XLBox.
pub const EXTENDED_BOX_HEADER_LENGTH: u64 = 16;

/// Decoded LBox / TBox (/ XLBox) fields of a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxHeader {
    // Box Type
    //
    // This field specifies the type of information found in the DBox field.
    pub box_type: BoxType,

    // Number of bytes in the DBox field, i.e. the box length minus the header.
    pub payload_length: u64,

    // Either 8 or 16 depending on whether XLBox was present.
    pub header_length: u64,

    // Stream position of the first byte of LBox.
    pub offset: u64,
}

impl BoxHeader {
    /// Full length of the box as declared in the stream.
    pub fn length(&self) -> u64 {
        self.header_length + self.payload_length
    }

    /// Decode a box header from the current stream position.
    ///
    /// `available` is the number of bytes left in the enclosing superbox (or
    /// in the stream, for top-level boxes), counted from the current position.
    /// A box that would extend past it is malformed.
    pub fn decode<R: io::Read + io::Seek>(reader: &mut R, available: u64) -> Result<BoxHeader> {
        let offset = reader.stream_position()?;
        if available < BOX_HEADER_LENGTH {
            return Err(JP2Error::TruncatedBoxHeader { offset, available });
        }

        // Box Length
        //
        // This field specifies the length of the box, stored as a 4-byte big
        // endian unsigned integer. This value includes all of the fields of the
        // box, including the length and type.
        let box_length = reader.read_u32::<BigEndian>()?;
        let mut box_type = [0u8; 4];
        reader.read_exact(&mut box_type)?;
        let box_type = BoxType(box_type);

        let header = match box_length {
            // The length of the box was not known when the LBox field was
            // written. The box contains all bytes up to the end of its
            // superbox, or of the file.
            0 => BoxHeader {
                box_type,
                payload_length: available - BOX_HEADER_LENGTH,
                header_length: BOX_HEADER_LENGTH,
                offset,
            },
            // The XLBox field shall exist and holds the actual length of the
            // box as an 8-byte big endian unsigned integer, which includes the
            // LBox, TBox and XLBox fields.
            1 => {
                if available < EXTENDED_BOX_HEADER_LENGTH {
                    return Err(JP2Error::TruncatedBoxHeader { offset, available });
                }
                let extended_length = reader.read_u64::<BigEndian>()?;
                if extended_length < EXTENDED_BOX_HEADER_LENGTH {
                    return Err(JP2Error::BoxMalformed {
                        box_type,
                        offset,
                        reason: "XLBox is shorter than the box header",
                    });
                }
                BoxHeader {
                    box_type,
                    payload_length: extended_length - EXTENDED_BOX_HEADER_LENGTH,
                    header_length: EXTENDED_BOX_HEADER_LENGTH,
                    offset,
                }
            }
            2..=7 => {
                return Err(JP2Error::ReservedBoxLength {
                    length: box_length,
                    offset,
                })
            }
            _ => BoxHeader {
                box_type,
                payload_length: u64::from(box_length) - BOX_HEADER_LENGTH,
                header_length: BOX_HEADER_LENGTH,
                offset,
            },
        };

        if header.length() > available {
            return Err(JP2Error::BoxMalformed {
                box_type,
                offset,
                reason: "box extends beyond its superbox",
            });
        }

        debug!(
            "Box {} of length {} at offset {}",
            header.box_type,
            header.length(),
            header.offset
        );

        Ok(header)
    }

    /// Encode a compact (LBox, TBox) header for a box of `length` bytes.
    pub fn encode<W: io::Write>(writer: &mut W, box_type: BoxType, length: u64) -> Result<()> {
        let box_length = match u32::try_from(length) {
            Ok(value) if length >= BOX_HEADER_LENGTH => value,
            _ => return Err(JP2Error::BoxTooLarge { box_type, length }),
        };
        writer.write_u32::<BigEndian>(box_length)?;
        writer.write_all(box_type.as_bytes())?;
        Ok(())
    }
}

/// Read exactly `length` bytes without trusting `length` for the allocation.
pub(crate) fn read_bytes<R: io::Read>(reader: &mut R, length: u64) -> Result<Vec<u8>> {
    let mut bytes = vec![];
    reader.by_ref().take(length).read_to_end(&mut bytes)?;
    if (bytes.len() as u64) < length {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::box_type::BOX_TYPE_HEADER;

    #[test]
    fn decode_compact_header() {
        let mut reader = Cursor::new(vec![0x00, 0x00, 0x00, 0x2D, b'j', b'p', b'2', b'h']);
        let header = BoxHeader::decode(&mut reader, 45).unwrap();
        assert_eq!(header.box_type, BOX_TYPE_HEADER);
        assert_eq!(header.payload_length, 37);
        assert_eq!(header.header_length, 8);
        assert_eq!(header.length(), 45);
        assert_eq!(header.offset, 0);
    }

    #[test]
    fn decode_extended_header() {
        let mut input = vec![0x00, 0x00, 0x00, 0x01, b'j', b'p', b'2', b'c'];
        input.extend_from_slice(&20u64.to_be_bytes());
        let mut reader = Cursor::new(input);
        let header = BoxHeader::decode(&mut reader, 100).unwrap();
        assert_eq!(header.header_length, 16);
        assert_eq!(header.payload_length, 4);
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn decode_zero_length_runs_to_end_of_region() {
        let mut reader = Cursor::new(vec![0x00, 0x00, 0x00, 0x00, b'x', b'm', b'l', b' ']);
        let header = BoxHeader::decode(&mut reader, 30).unwrap();
        assert_eq!(header.payload_length, 22);
    }

    #[test]
    fn decode_reserved_length() {
        let mut reader = Cursor::new(vec![0x00, 0x00, 0x00, 0x05, b'i', b'h', b'd', b'r']);
        let result = BoxHeader::decode(&mut reader, 100);
        assert!(matches!(
            result,
            Err(JP2Error::ReservedBoxLength {
                length: 5,
                offset: 0
            })
        ));
    }

    #[test]
    fn decode_box_longer_than_region() {
        let mut reader = Cursor::new(vec![0x00, 0x00, 0x00, 0x16, b'i', b'h', b'd', b'r']);
        let result = BoxHeader::decode(&mut reader, 12);
        assert!(matches!(result, Err(JP2Error::BoxMalformed { .. })));
    }

    #[test]
    fn decode_truncated_stream() {
        let mut reader = Cursor::new(vec![0x00, 0x00, 0x00]);
        let result = BoxHeader::decode(&mut reader, 100);
        match result {
            Err(JP2Error::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn encode_rejects_lengths_over_four_bytes() {
        let mut buffer = Vec::new();
        let result = BoxHeader::encode(&mut buffer, BOX_TYPE_HEADER, u64::from(u32::MAX) + 1);
        assert!(matches!(result, Err(JP2Error::BoxTooLarge { .. })));
        assert!(buffer.is_empty());
    }

    #[test]
    fn encode_compact_header() {
        let mut buffer = Vec::new();
        BoxHeader::encode(&mut buffer, BOX_TYPE_HEADER, 45).unwrap();
        assert_eq!(buffer, vec![0x00, 0x00, 0x00, 0x2D, b'j', b'p', b'2', b'h']);
    }
}
