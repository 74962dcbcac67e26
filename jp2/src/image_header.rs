use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};
use std::io;

use crate::bits_per_component::BitDepth;
use crate::box_type::{BoxType, BOX_TYPE_IMAGE_HEADER};
use crate::error::{JP2Error, Result};
use crate::jbox::JBox;

/// The only compression type defined for JP2 files.
pub const COMPRESSION_TYPE_WAVELET: u8 = 7;

/// `components_bits` value meaning the components vary in bit depth.
pub const COMPONENTS_BITS_VARY: u8 = 255;

const IMAGE_HEADER_PAYLOAD_LENGTH: u64 = 14;

// I.5.3.1
//
// Image Header box
//
// This box contains fixed length generic information about the image, such as
// the image size and number of components.
//
// The length of the Image Header box shall be 22 bytes, including the box
// length and type fields.
//
// Much of the information within the Image Header box is redundant with
// information stored in the codestream itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageHeaderBox {
    height: u32,
    width: u32,
    components_num: u16,
    components_bits: u8,
    compression_type: u8,
    colourspace_unknown: u8,
    intellectual_property: u8,
}

impl ImageHeaderBox {
    /// Create an Image Header box from its field values.
    ///
    /// `components_bits` is the encoded bit depth byte (see
    /// [`components_bits`](ImageHeaderBox::components_bits)). The compression
    /// type is always 7.
    pub fn new(
        width: u32,
        height: u32,
        components_num: u16,
        components_bits: u8,
        colourspace_unknown: bool,
        intellectual_property: bool,
    ) -> ImageHeaderBox {
        ImageHeaderBox {
            height,
            width,
            components_num,
            components_bits,
            compression_type: COMPRESSION_TYPE_WAVELET,
            colourspace_unknown: u8::from(colourspace_unknown),
            intellectual_property: u8::from(intellectual_property),
        }
    }

    // Image area height.
    //
    // The value of this field shall be Ysiz – YOsiz, where Ysiz and YOsiz are
    // the values of the respective fields in the SIZ marker in the codestream.
    pub fn height(&self) -> u32 {
        self.height
    }

    // Image area width.
    //
    // The value of this field shall be Xsiz – XOsiz, where Xsiz and XOsiz are
    // the values of the respective fields in the SIZ marker in the codestream.
    pub fn width(&self) -> u32 {
        self.width
    }

    // Number of components.
    //
    // The value of this field shall be equal to the value of the Csiz field in
    // the SIZ marker in the codestream.
    pub fn components_num(&self) -> u16 {
        self.components_num
    }

    /// The encoded bit depth byte.
    ///
    /// The low 7-bits of the value are the bit depth of the components minus
    /// one; the high-bit is set when the components are signed. The value 255
    /// means the components vary in bit depth and the JP2 Header box carries
    /// a Bits Per Component box.
    pub fn bit_depth(&self) -> u8 {
        self.components_bits
    }

    /// Decoded bit depth shared by all components.
    ///
    /// `None` if the components vary in bit depth.
    pub fn components_bits(&self) -> Option<BitDepth> {
        if self.components_bits == COMPONENTS_BITS_VARY {
            None
        } else {
            Some(BitDepth::new(self.components_bits))
        }
    }

    /// This returns true if the components are signed, false if they are
    /// unsigned or it varies (i.e. is given in the Bits Per Component box).
    pub fn values_are_signed(&self) -> bool {
        matches!(self.components_bits(), Some(BitDepth::Signed { .. }))
    }

    // Compression type.
    //
    // The value of this field shall be 7. Other values are reserved for ISO
    // use.
    pub fn compression_type(&self) -> u8 {
        self.compression_type
    }

    // Colourspace Unknown.
    //
    // 0 if the colourspace of the image is known and correctly specified in
    // the Colourspace Specification boxes within the file, 1 if it is not.
    pub fn colourspace_unknown(&self) -> u8 {
        self.colourspace_unknown
    }

    // Intellectual Property.
    //
    // 1 if the file contains an IPR box, 0 otherwise.
    pub fn intellectual_property(&self) -> u8 {
        self.intellectual_property
    }
}

impl JBox for ImageHeaderBox {
    // The type of the Image Header box shall be ‘ihdr’ (0x6968 6472)
    fn identifier(&self) -> BoxType {
        BOX_TYPE_IMAGE_HEADER
    }

    fn payload_length(&self) -> u64 {
        IMAGE_HEADER_PAYLOAD_LENGTH
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        if payload_length < IMAGE_HEADER_PAYLOAD_LENGTH {
            return Err(JP2Error::BoxMalformed {
                box_type: BOX_TYPE_IMAGE_HEADER,
                offset: reader.stream_position()?,
                reason: "Image Header box shall be 22 bytes",
            });
        }

        // Height precedes width.
        self.height = reader.read_u32::<BigEndian>()?;
        self.width = reader.read_u32::<BigEndian>()?;
        self.components_num = reader.read_u16::<BigEndian>()?;
        self.components_bits = reader.read_u8()?;
        self.compression_type = reader.read_u8()?;
        self.colourspace_unknown = reader.read_u8()?;
        self.intellectual_property = reader.read_u8()?;

        debug!(
            "Image {}x{} with {} components, bit depth {:?}",
            self.width,
            self.height,
            self.components_num,
            self.components_bits()
        );

        if self.compression_type != COMPRESSION_TYPE_WAVELET {
            warn!("Compression type {} unexpected", self.compression_type);
        }
        if self.colourspace_unknown > 1 {
            warn!("Colourspace Unknown {} unexpected", self.colourspace_unknown);
        }
        if self.intellectual_property > 1 {
            warn!(
                "Intellectual Property {} unexpected",
                self.intellectual_property
            );
        }

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.height)?;
        writer.write_u32::<BigEndian>(self.width)?;
        writer.write_u16::<BigEndian>(self.components_num)?;
        writer.write_u8(self.components_bits)?;
        writer.write_u8(self.compression_type)?;
        writer.write_u8(self.colourspace_unknown)?;
        writer.write_u8(self.intellectual_property)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn default_is_zeroed() {
        let image_header_box = ImageHeaderBox::default();
        assert_eq!(image_header_box.identifier(), BOX_TYPE_IMAGE_HEADER);
        assert_eq!(image_header_box.width(), 0);
        assert_eq!(image_header_box.compression_type(), 0);
        assert_eq!(image_header_box.length(), 22);
    }

    #[test]
    fn new_packs_flags() {
        let image_header_box = ImageHeaderBox::new(1, 2, 1, 0x87, true, true);
        assert_eq!(image_header_box.compression_type(), 7);
        assert_eq!(image_header_box.colourspace_unknown(), 1);
        assert_eq!(image_header_box.intellectual_property(), 1);
        assert_eq!(
            image_header_box.components_bits(),
            Some(BitDepth::Signed { value: 8 })
        );
        assert!(image_header_box.values_are_signed());
    }

    #[test]
    fn varying_bit_depth() {
        let image_header_box = ImageHeaderBox::new(1, 1, 3, COMPONENTS_BITS_VARY, false, false);
        assert_eq!(image_header_box.components_bits(), None);
        assert!(!image_header_box.values_are_signed());
    }

    #[test]
    fn decode_short_payload() {
        let mut reader = Cursor::new(vec![0; 10]);
        let mut image_header_box = ImageHeaderBox::default();
        let result = image_header_box.decode(&mut reader, 10);
        assert!(matches!(result, Err(JP2Error::BoxMalformed { .. })));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn decode_reads_height_before_width() {
        let input: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x40, 0x00, 0x03, 0x0F, 0x07, 0x00, 0x01,
        ];
        let mut reader = Cursor::new(input);
        let mut image_header_box = ImageHeaderBox::default();
        image_header_box.decode(&mut reader, 14).unwrap();
        assert_eq!(image_header_box.height(), 128);
        assert_eq!(image_header_box.width(), 64);
        assert_eq!(image_header_box.components_num(), 3);
        assert_eq!(
            image_header_box.components_bits(),
            Some(BitDepth::Unsigned { value: 16 })
        );
        assert_eq!(image_header_box.compression_type(), 7);
        assert_eq!(image_header_box.colourspace_unknown(), 0);
        assert_eq!(image_header_box.intellectual_property(), 1);
    }
}
