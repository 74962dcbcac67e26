use log::{debug, warn};
use std::io;

use crate::box_header::read_bytes;
use crate::box_type::{BoxType, BOX_TYPE_BITS_PER_COMPONENT};
use crate::error::Result;
use crate::jbox::JBox;

/// Bit depth of a component, decoded from its 1-byte encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitDepth {
    Signed { value: u8 },
    Unsigned { value: u8 },
}

impl BitDepth {
    pub fn new(byte: u8) -> BitDepth {
        // The low 7-bits of the value indicate the bit depth of this component,
        // minus one.
        let value = (byte & 0b0111_1111) + 1;

        // The high-bit indicates whether the component is signed or unsigned.
        if byte & 0b1000_0000 != 0 {
            BitDepth::Signed { value }
        } else {
            BitDepth::Unsigned { value }
        }
    }

    /// Number of bits per sample, counting the sign bit if any.
    pub fn value(&self) -> u8 {
        match self {
            Self::Signed { value } => *value,
            Self::Unsigned { value } => *value,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed { .. })
    }

    /// The 1-byte encoding. Depths are masked to the 7 available bits.
    pub fn encoded(&self) -> u8 {
        let low_bits = self.value().wrapping_sub(1) & 0b0111_1111;
        if self.is_signed() {
            low_bits | 0b1000_0000
        } else {
            low_bits
        }
    }
}

// I.5.3.2
//
// The Bits Per Component box specifies the bit depth of each component.
//
// If the bit depth of all components in the codestream is the same (in both
// sign and precision), then this box shall not be found. Otherwise, this box
// specifies the bit depth of each individual component.
//
// The order of bit depth values in this box is the actual order in which those
// components are enumerated within the codestream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitsPerComponentBox {
    // Bits per component.
    //
    // This parameter specifies the bit depth of component i, minus 1, encoded
    // as a 1-byte value. The number of BPCi fields shall be the same as the
    // value of the NC field from the Image Header box.
    bits_per_component: Vec<u8>,
}

impl BitsPerComponentBox {
    pub fn new(bits_per_component: Vec<BitDepth>) -> BitsPerComponentBox {
        BitsPerComponentBox {
            bits_per_component: bits_per_component
                .iter()
                .map(BitDepth::encoded)
                .collect(),
        }
    }

    pub fn bits_per_component(&self) -> Vec<BitDepth> {
        self.bits_per_component
            .iter()
            .map(|byte| BitDepth::new(*byte))
            .collect()
    }

    pub fn components_num(&self) -> usize {
        self.bits_per_component.len()
    }
}

impl JBox for BitsPerComponentBox {
    // The type of the Bits Per Component Box shall be ‘bpcc’ (0x6270 6363).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_BITS_PER_COMPONENT
    }

    fn payload_length(&self) -> u64 {
        self.bits_per_component.len() as u64
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        if payload_length == 0 {
            warn!("Bits Per Component box has no components");
        }
        let bits_per_component = read_bytes(reader, payload_length)?;
        debug!("Bits per component {:?}", bits_per_component);
        self.bits_per_component = bits_per_component;
        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.bits_per_component)?;
        Ok(())
    }
}
