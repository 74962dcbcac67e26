use std::io;

use crate::box_header::read_bytes;
use crate::box_type::BoxType;
use crate::error::Result;
use crate::jbox::JBox;

/// A box whose type is not interpreted, such as an XML, UUID or Intellectual
/// Property box, or any type defined after this library.
///
/// The payload is kept byte for byte and written back unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueBox {
    box_type: BoxType,
    data: Vec<u8>,
}

impl OpaqueBox {
    pub fn new(box_type: BoxType, data: Vec<u8>) -> OpaqueBox {
        OpaqueBox { box_type, data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl JBox for OpaqueBox {
    fn identifier(&self) -> BoxType {
        self.box_type
    }

    fn payload_length(&self) -> u64 {
        self.data.len() as u64
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        self.data = read_bytes(reader, payload_length)?;
        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.data)?;
        Ok(())
    }
}
