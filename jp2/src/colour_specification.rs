use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};
use std::fmt;
use std::io;

use crate::box_header::read_bytes;
use crate::box_type::{BoxType, BOX_TYPE_COLOUR_SPECIFICATION};
use crate::error::{JP2Error, Result};
use crate::jbox::JBox;

const METHOD_ENUMERATED_COLOUR_SPACE: u8 = 1;
const METHOD_RESTRICTED_ICC_PROFILE: u8 = 2;

pub const ENUMERATED_COLOUR_SPACE_SRGB: u32 = 16;
pub const ENUMERATED_COLOUR_SPACE_GREYSCALE: u32 = 17;
pub const ENUMERATED_COLOUR_SPACE_SYCC: u32 = 18;

/// Enumerated colourspaces (EnumCS).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumeratedColourSpaces {
    #[allow(non_camel_case_types)]
    sRGB,
    Greyscale,
    #[allow(non_camel_case_types)]
    sYCC,
    Reserved { value: u32 },
}

impl EnumeratedColourSpaces {
    pub fn new(value: u32) -> EnumeratedColourSpaces {
        match value {
            ENUMERATED_COLOUR_SPACE_SRGB => EnumeratedColourSpaces::sRGB,
            ENUMERATED_COLOUR_SPACE_GREYSCALE => EnumeratedColourSpaces::Greyscale,
            ENUMERATED_COLOUR_SPACE_SYCC => EnumeratedColourSpaces::sYCC,
            value => EnumeratedColourSpaces::Reserved { value },
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            EnumeratedColourSpaces::sRGB => ENUMERATED_COLOUR_SPACE_SRGB,
            EnumeratedColourSpaces::Greyscale => ENUMERATED_COLOUR_SPACE_GREYSCALE,
            EnumeratedColourSpaces::sYCC => ENUMERATED_COLOUR_SPACE_SYCC,
            EnumeratedColourSpaces::Reserved { value } => *value,
        }
    }
}

/// Colour specification methods (METH) and the data that follows them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColourSpecificationMethods {
    /// Enumerated colourspace.
    ///
    /// The EnumCS field immediately follows the APPROX field and is the last
    /// field in the box.
    EnumeratedColourSpace { code: EnumeratedColourSpaces },

    /// Restricted ICC profile.
    ///
    /// The PROFILE field immediately follows the APPROX field and is the last
    /// field in the box. The profile shall conform to either the Monochrome
    /// Input or Three-Component Matrix-Based Input profile class.
    RestrictedICCProfile { profile_data: Vec<u8> },

    /// Reserved for other ISO use.
    ///
    /// A conforming JP2 reader shall ignore the entire box; the remaining
    /// bytes are kept so the box can be written back unchanged.
    Reserved { value: u8, data: Vec<u8> },
}

impl ColourSpecificationMethods {
    pub fn encoded_meth(&self) -> u8 {
        match self {
            ColourSpecificationMethods::EnumeratedColourSpace { .. } => {
                METHOD_ENUMERATED_COLOUR_SPACE
            }
            ColourSpecificationMethods::RestrictedICCProfile { .. } => {
                METHOD_RESTRICTED_ICC_PROFILE
            }
            ColourSpecificationMethods::Reserved { value, .. } => *value,
        }
    }

    fn data_length(&self) -> u64 {
        match self {
            ColourSpecificationMethods::EnumeratedColourSpace { .. } => 4,
            ColourSpecificationMethods::RestrictedICCProfile { profile_data } => {
                profile_data.len() as u64
            }
            ColourSpecificationMethods::Reserved { data, .. } => data.len() as u64,
        }
    }
}

impl Default for ColourSpecificationMethods {
    fn default() -> ColourSpecificationMethods {
        ColourSpecificationMethods::EnumeratedColourSpace {
            code: EnumeratedColourSpaces::sRGB,
        }
    }
}

impl fmt::Display for ColourSpecificationMethods {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColourSpecificationMethods::EnumeratedColourSpace { code } => {
                write!(f, "Enumerated colourspace: {:?}", code)
            }
            ColourSpecificationMethods::RestrictedICCProfile { profile_data } => {
                write!(f, "Restricted ICC Profile ({} bytes)", profile_data.len())
            }
            ColourSpecificationMethods::Reserved { value, .. } => write!(f, "Reserved {}", value),
        }
    }
}

// I.5.3.3
//
// Colour Specification box
//
// Each Colour Specification box defines one method by which an application can
// interpret the colourspace of the decompressed image data.
//
// A JP2 file may contain multiple Colour Specification boxes, but must contain
// at least one, specifying different methods for achieving “equivalent” results.
// A conforming JP2 reader shall ignore all Colour Specification boxes after the
// first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColourSpecificationBox {
    method: ColourSpecificationMethods,
    precedence: i8,
    colourspace_approximation: u8,
}

impl ColourSpecificationBox {
    pub fn new(method: ColourSpecificationMethods) -> ColourSpecificationBox {
        ColourSpecificationBox {
            method,
            precedence: 0,
            colourspace_approximation: 0,
        }
    }

    pub fn enumerated(value: u32) -> ColourSpecificationBox {
        ColourSpecificationBox::new(ColourSpecificationMethods::EnumeratedColourSpace {
            code: EnumeratedColourSpaces::new(value),
        })
    }

    pub fn restricted_icc_profile(profile_data: Vec<u8>) -> ColourSpecificationBox {
        ColourSpecificationBox::new(ColourSpecificationMethods::RestrictedICCProfile {
            profile_data,
        })
    }

    pub fn method(&self) -> &ColourSpecificationMethods {
        &self.method
    }

    // Precedence.
    //
    // This field is reserved for ISO use and the value shall be set to zero;
    // however, conforming readers shall ignore the value of this field.
    pub fn precedence(&self) -> i8 {
        self.precedence
    }

    // Colourspace approximation.
    //
    // The value of this field shall be set to zero; however, conforming readers
    // shall ignore the value of this field.
    pub fn colourspace_approximation(&self) -> u8 {
        self.colourspace_approximation
    }

    pub fn enumerated_colour_space(&self) -> Option<u32> {
        match &self.method {
            ColourSpecificationMethods::EnumeratedColourSpace { code } => Some(code.value()),
            _ => None,
        }
    }

    pub fn restricted_icc_profile_data(&self) -> Option<&[u8]> {
        match &self.method {
            ColourSpecificationMethods::RestrictedICCProfile { profile_data } => {
                Some(profile_data.as_slice())
            }
            _ => None,
        }
    }
}

impl JBox for ColourSpecificationBox {
    // The type of a Colour Specification box shall be ‘colr’ (0x636F 6C72).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_COLOUR_SPECIFICATION
    }

    fn payload_length(&self) -> u64 {
        3 + self.method.data_length()
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        let offset = reader.stream_position()?;
        if payload_length < 3 {
            return Err(JP2Error::BoxMalformed {
                box_type: BOX_TYPE_COLOUR_SPECIFICATION,
                offset,
                reason: "missing METH, PREC or APPROX field",
            });
        }

        let method = reader.read_u8()?;
        self.precedence = reader.read_i8()?;
        self.colourspace_approximation = reader.read_u8()?;

        if self.precedence != 0 {
            warn!("Precedence {:?} unexpected", self.precedence);
        }
        if self.colourspace_approximation != 0 {
            warn!(
                "Colourspace Approximation {:?} unexpected",
                self.colourspace_approximation
            );
        }

        let data_length = payload_length - 3;
        self.method = match method {
            METHOD_ENUMERATED_COLOUR_SPACE => {
                if data_length < 4 {
                    return Err(JP2Error::BoxMalformed {
                        box_type: BOX_TYPE_COLOUR_SPECIFICATION,
                        offset,
                        reason: "missing EnumCS field",
                    });
                }
                let code = EnumeratedColourSpaces::new(reader.read_u32::<BigEndian>()?);
                debug!("Enumerated Colour Space {:?}", code);
                ColourSpecificationMethods::EnumeratedColourSpace { code }
            }
            METHOD_RESTRICTED_ICC_PROFILE => {
                let profile_data = read_bytes(reader, data_length)?;
                debug!("Restricted ICC Profile of {} bytes", profile_data.len());
                ColourSpecificationMethods::RestrictedICCProfile { profile_data }
            }
            value => {
                debug!("Reserved method {}", value);
                ColourSpecificationMethods::Reserved {
                    value,
                    data: read_bytes(reader, data_length)?,
                }
            }
        };

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.method.encoded_meth())?;
        writer.write_i8(self.precedence)?;
        writer.write_u8(self.colourspace_approximation)?;
        match &self.method {
            ColourSpecificationMethods::EnumeratedColourSpace { code } => {
                writer.write_u32::<BigEndian>(code.value())?;
            }
            ColourSpecificationMethods::RestrictedICCProfile { profile_data } => {
                writer.write_all(profile_data)?;
            }
            ColourSpecificationMethods::Reserved { data, .. } => {
                writer.write_all(data)?;
            }
        }
        Ok(())
    }
}
