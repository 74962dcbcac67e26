use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};
use std::io;

use crate::bits_per_component::BitDepth;
use crate::box_type::{BoxType, BOX_TYPE_PALETTE};
use crate::error::{JP2Error, Result};
use crate::jbox::JBox;

const MAX_ENTRIES: usize = 1024;

// Bit depths from 1 to 38 bits are defined; other values are reserved.
const MAX_BIT_DEPTH: u8 = 38;

/// One column of a palette: the component generated by applying it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedComponent {
    // This parameter specifies the bit depth of generated component i,
    // encoded as a 1-byte big endian integer.
    //
    // The low 7-bits of the value indicate the bit depth of this component.
    // The high-bit indicates whether the component is signed or unsigned.
    bit_depth: u8,

    // The generated component value for each entry of the palette.
    //
    // If the bit depth is not a multiple of 8, then each value is padded with
    // zeros to a multiple of 8 bits and the actual value is stored in the
    // low-order bits of the padded value.
    values: Vec<u64>,
}

impl GeneratedComponent {
    pub fn new(bit_depth: BitDepth, values: Vec<u64>) -> GeneratedComponent {
        GeneratedComponent {
            bit_depth: bit_depth.encoded(),
            values,
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        BitDepth::new(self.bit_depth)
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    // Number of bytes each value of this component occupies.
    fn value_length(&self) -> usize {
        (usize::from(self.bit_depth().value()) + 7) / 8
    }
}

/// Palette box.
///
/// The palette specified in this box is applied to a single component to
/// convert it into multiple components.
///
/// The colourspace of the components generated by the palette is then
/// interpreted based on the values of the Colour Specification boxes in the JP2
/// Header box in the file.
///
/// If the JP2 Header box contains a Palette box, then it shall also contain a
/// Component Mapping box.
///
/// See Part 1 Section I.5.3.4 for more information.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteBox {
    /// Number of entries in the table.
    ///
    /// This value shall be in the range 1 to 1024 and is encoded as a 2-byte
    /// big endian unsigned integer.
    num_entries: u16,

    generated_components: Vec<GeneratedComponent>,
}

impl PaletteBox {
    /// Create a palette from its columns.
    ///
    /// Every column shall have the same number of entries, between 1 and 1024,
    /// and there shall be between 1 and 255 columns.
    pub fn new(generated_components: Vec<GeneratedComponent>) -> Result<PaletteBox> {
        let invalid = |reason| JP2Error::InvalidContent {
            box_type: BOX_TYPE_PALETTE,
            reason,
        };

        let num_entries = match generated_components.first() {
            Some(component) => component.values.len(),
            None => return Err(invalid("a palette generates at least one component")),
        };
        if generated_components.len() > usize::from(u8::MAX) {
            return Err(invalid("a palette generates at most 255 components"));
        }
        if num_entries == 0 || num_entries > MAX_ENTRIES {
            return Err(invalid("a palette has between 1 and 1024 entries"));
        }
        if generated_components
            .iter()
            .any(|component| component.values.len() != num_entries)
        {
            return Err(invalid("every generated component has one value per entry"));
        }
        for component in &generated_components {
            let bits = component.bit_depth().value();
            if bits > MAX_BIT_DEPTH {
                return Err(invalid("bit depth above 38 bits is reserved"));
            }
            if component.values.iter().any(|value| *value >> bits != 0) {
                return Err(invalid("a palette value does not fit its bit depth"));
            }
        }

        Ok(PaletteBox {
            num_entries: num_entries as u16,
            generated_components,
        })
    }

    pub fn num_entries(&self) -> u16 {
        self.num_entries
    }

    /// Number of components created by the application of the palette.
    pub fn num_components(&self) -> u8 {
        self.generated_components.len() as u8
    }

    pub fn generated_components(&self) -> &[GeneratedComponent] {
        &self.generated_components
    }

    fn entry_length(&self) -> usize {
        self.generated_components
            .iter()
            .map(GeneratedComponent::value_length)
            .sum()
    }
}

impl JBox for PaletteBox {
    // The type of the Palette box shall be ‘pclr’ (0x7063 6C72).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_PALETTE
    }

    fn payload_length(&self) -> u64 {
        3 + self.generated_components.len() as u64
            + u64::from(self.num_entries) * self.entry_length() as u64
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        let offset = reader.stream_position()?;
        let malformed = |reason| JP2Error::BoxMalformed {
            box_type: BOX_TYPE_PALETTE,
            offset,
            reason,
        };
        if payload_length < 3 {
            return Err(malformed("missing NE or NPC field"));
        }

        self.num_entries = reader.read_u16::<BigEndian>()?;
        let num_components = reader.read_u8()?;
        if usize::from(self.num_entries) > MAX_ENTRIES {
            return Err(malformed("more than 1024 entries"));
        }
        if self.num_entries == 0 || num_components == 0 {
            warn!("Palette box has no entries or no generated components");
        }
        if payload_length < 3 + u64::from(num_components) {
            return Err(malformed("missing bit depth fields"));
        }

        self.generated_components = Vec::with_capacity(usize::from(num_components));
        for _ in 0..num_components {
            let component = GeneratedComponent {
                bit_depth: reader.read_u8()?,
                values: Vec::with_capacity(usize::from(self.num_entries)),
            };
            if component.bit_depth().value() > MAX_BIT_DEPTH {
                return Err(malformed("bit depth above 38 bits is reserved"));
            }
            self.generated_components.push(component);
        }

        if payload_length < self.payload_length() {
            return Err(malformed("fewer palette entries than declared"));
        }

        // All of the component values for entry j are grouped together,
        // followed by all of the values for entry j+1.
        for _ in 0..self.num_entries {
            for component in &mut self.generated_components {
                let value = reader.read_uint::<BigEndian>(component.value_length())?;
                component.values.push(value);
            }
        }

        debug!(
            "Palette of {} entries generating {} components",
            self.num_entries,
            self.num_components()
        );

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.num_entries)?;
        writer.write_u8(self.num_components())?;
        for component in &self.generated_components {
            writer.write_u8(component.bit_depth)?;
        }
        for entry in 0..usize::from(self.num_entries) {
            for component in &self.generated_components {
                writer.write_uint::<BigEndian>(component.values[entry], component.value_length())?;
            }
        }
        Ok(())
    }
}
