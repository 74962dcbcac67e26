use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};
use std::io;

use crate::box_type::{
    BoxKind, BoxType, BOX_TYPE_CAPTURE_RESOLUTION, BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION,
    BOX_TYPE_RESOLUTION,
};
use crate::container::ContainerBox;
use crate::error::{JP2Error, Result};
use crate::jbox::{JBox, Jp2Box};
use crate::registry::decode_children;
use crate::validation::{ChildValidator, RESOLUTION_RULES};

const GRID_RESOLUTION_LENGTH: u64 = 10;

/// Vertical and horizontal grid resolution, as stored in both the Capture
/// Resolution and the Default Display Resolution boxes.
///
/// Each resolution is `numerator / denominator * 10^exponent` reference grid
/// points per meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridResolution {
    // Vertical grid resolution numerator, a 2-byte big endian unsigned integer.
    pub vertical_numerator: u16,

    // Vertical grid resolution denominator, a 2-byte big endian unsigned
    // integer.
    pub vertical_denominator: u16,

    pub horizontal_numerator: u16,
    pub horizontal_denominator: u16,

    // Vertical grid resolution exponent, a twos-complement 1-byte signed
    // integer.
    pub vertical_exponent: i8,

    pub horizontal_exponent: i8,
}

impl Default for GridResolution {
    fn default() -> GridResolution {
        GridResolution {
            vertical_numerator: 1,
            vertical_denominator: 1,
            horizontal_numerator: 1,
            horizontal_denominator: 1,
            vertical_exponent: 0,
            horizontal_exponent: 0,
        }
    }
}

impl GridResolution {
    // VR = VRN / VRD * 10^VRE
    pub fn vertical_resolution(&self) -> f64 {
        f64::from(self.vertical_numerator) / f64::from(self.vertical_denominator)
            * 10_f64.powi(i32::from(self.vertical_exponent))
    }

    // HR = HRN / HRD * 10^HRE
    pub fn horizontal_resolution(&self) -> f64 {
        f64::from(self.horizontal_numerator) / f64::from(self.horizontal_denominator)
            * 10_f64.powi(i32::from(self.horizontal_exponent))
    }

    fn decode<R: io::Read + io::Seek>(
        reader: &mut R,
        box_type: BoxType,
        payload_length: u64,
    ) -> Result<GridResolution> {
        if payload_length < GRID_RESOLUTION_LENGTH {
            return Err(JP2Error::BoxMalformed {
                box_type,
                offset: reader.stream_position()?,
                reason: "grid resolution is 10 bytes",
            });
        }

        let resolution = GridResolution {
            vertical_numerator: reader.read_u16::<BigEndian>()?,
            vertical_denominator: reader.read_u16::<BigEndian>()?,
            horizontal_numerator: reader.read_u16::<BigEndian>()?,
            horizontal_denominator: reader.read_u16::<BigEndian>()?,
            vertical_exponent: reader.read_i8()?,
            horizontal_exponent: reader.read_i8()?,
        };
        if resolution.vertical_denominator == 0 || resolution.horizontal_denominator == 0 {
            warn!("{} box has a zero denominator", box_type);
        }
        debug!("{} box {:?}", box_type, resolution);

        Ok(resolution)
    }

    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.vertical_numerator)?;
        writer.write_u16::<BigEndian>(self.vertical_denominator)?;
        writer.write_u16::<BigEndian>(self.horizontal_numerator)?;
        writer.write_u16::<BigEndian>(self.horizontal_denominator)?;
        writer.write_i8(self.vertical_exponent)?;
        writer.write_i8(self.horizontal_exponent)?;
        Ok(())
    }
}

// I.5.3.7.1
//
// This box specifies the grid resolution at which the source was digitized to
// create the image samples specified by the codestream.
//
// For example, this may specify the resolution of the flatbed scanner that
// captured a page from a book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureResolutionBox {
    resolution: GridResolution,
}

impl CaptureResolutionBox {
    pub fn new(resolution: GridResolution) -> CaptureResolutionBox {
        CaptureResolutionBox { resolution }
    }

    pub fn resolution(&self) -> &GridResolution {
        &self.resolution
    }

    /// Vertical capture grid resolution in reference grid points per meter.
    pub fn vertical_resolution_capture(&self) -> f64 {
        self.resolution.vertical_resolution()
    }

    /// Horizontal capture grid resolution in reference grid points per meter.
    pub fn horizontal_resolution_capture(&self) -> f64 {
        self.resolution.horizontal_resolution()
    }
}

impl JBox for CaptureResolutionBox {
    // The type of a Capture Resolution box shall be ‘resc’ (0x7265 7363).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_CAPTURE_RESOLUTION
    }

    fn payload_length(&self) -> u64 {
        GRID_RESOLUTION_LENGTH
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        self.resolution = GridResolution::decode(reader, BOX_TYPE_CAPTURE_RESOLUTION, payload_length)?;
        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.resolution.encode(writer)
    }
}

// I.5.3.7.2
//
// Default Display Resolution box
//
// This box specifies a desired display grid resolution. This value is only a
// default; each application must determine an appropriate display size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultDisplayResolutionBox {
    resolution: GridResolution,
}

impl DefaultDisplayResolutionBox {
    pub fn new(resolution: GridResolution) -> DefaultDisplayResolutionBox {
        DefaultDisplayResolutionBox { resolution }
    }

    pub fn resolution(&self) -> &GridResolution {
        &self.resolution
    }

    pub fn vertical_display_grid_resolution(&self) -> f64 {
        self.resolution.vertical_resolution()
    }

    pub fn horizontal_display_grid_resolution(&self) -> f64 {
        self.resolution.horizontal_resolution()
    }
}

impl JBox for DefaultDisplayResolutionBox {
    // The type of a Default Display Resolution box shall be ‘resd’
    // (0x7265 7364).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION
    }

    fn payload_length(&self) -> u64 {
        GRID_RESOLUTION_LENGTH
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        self.resolution =
            GridResolution::decode(reader, BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION, payload_length)?;
        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.resolution.encode(writer)
    }
}

// I.5.3.7
//
// Resolution box (superbox)
//
// This box specifies the capture and default display grid resolutions of this
// image. If this box exists, it shall contain either a Capture Resolution box,
// or a Default Display Resolution box, or both.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionSuperBox {
    container: ContainerBox,
    validator: ChildValidator,
}

impl Default for ResolutionSuperBox {
    fn default() -> ResolutionSuperBox {
        ResolutionSuperBox {
            container: ContainerBox::new(BOX_TYPE_RESOLUTION),
            validator: ChildValidator::new(&RESOLUTION_RULES),
        }
    }
}

impl ResolutionSuperBox {
    pub fn new() -> ResolutionSuperBox {
        ResolutionSuperBox::default()
    }

    /// Append a child, refusing a second Capture Resolution or Default Display
    /// Resolution box.
    pub fn add(&mut self, child: impl Into<Jp2Box>) -> Result<&mut ResolutionSuperBox> {
        let child = child.into();
        let slot = self.validator.admit(child.kind(), child.identifier())?;

        let index = self.container.len();
        self.container.add(child);
        if let Some(kind) = slot {
            self.validator.occupy(kind, index);
        }
        Ok(self)
    }

    pub fn children(&self) -> &[Jp2Box] {
        self.container.children()
    }

    pub fn capture_resolution_box(&self) -> Option<&CaptureResolutionBox> {
        let index = self.validator.slot(BoxKind::CaptureResolution)?;
        match self.container.get(index) {
            Some(Jp2Box::CaptureResolution(capture_resolution_box)) => Some(capture_resolution_box),
            _ => None,
        }
    }

    pub fn default_display_resolution_box(&self) -> Option<&DefaultDisplayResolutionBox> {
        let index = self.validator.slot(BoxKind::DefaultDisplayResolution)?;
        match self.container.get(index) {
            Some(Jp2Box::DefaultDisplayResolution(default_display_resolution_box)) => {
                Some(default_display_resolution_box)
            }
            _ => None,
        }
    }
}

impl JBox for ResolutionSuperBox {
    // The type of a Resolution box shall be ‘res\040’ (0x7265 7320).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_RESOLUTION
    }

    fn payload_length(&self) -> u64 {
        self.container.payload_length()
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        decode_children(reader, payload_length, Some(&RESOLUTION_RULES), |child| {
            if child.kind() == BoxKind::Other {
                warn!("Unknown box type {} in Resolution box, keeping", child.identifier());
            }
            self.add(child)?;
            Ok(())
        })?;

        // If this box exists, it shall contain either a Capture Resolution box,
        // or a Default Display Resolution box, or both.
        if self.capture_resolution_box().is_none() && self.default_display_resolution_box().is_none()
        {
            warn!("Resolution box has no Capture or Default Display Resolution box");
        }

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.container.encode_payload(writer)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::StructuralViolation;

    fn scanner_resolution() -> GridResolution {
        GridResolution {
            vertical_numerator: 300,
            vertical_denominator: 254,
            horizontal_numerator: 600,
            horizontal_denominator: 254,
            vertical_exponent: 4,
            horizontal_exponent: 4,
        }
    }

    #[test]
    fn decode_capture_resolution() {
        let input: Vec<u8> = vec![0x01, 0x2C, 0x00, 0xFE, 0x02, 0x58, 0x00, 0xFE, 0x04, 0xFE];
        let mut reader = Cursor::new(input.clone());
        let mut capture_resolution_box = CaptureResolutionBox::default();
        capture_resolution_box.decode(&mut reader, 10).unwrap();

        let resolution = capture_resolution_box.resolution();
        assert_eq!(resolution.vertical_numerator, 300);
        assert_eq!(resolution.horizontal_numerator, 600);
        assert_eq!(resolution.vertical_exponent, 4);
        assert_eq!(resolution.horizontal_exponent, -2);
        assert!((capture_resolution_box.horizontal_resolution_capture() - 600.0 / 254.0 / 100.0).abs() < 1e-9);

        let mut output = Vec::new();
        capture_resolution_box.encode_payload(&mut output).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn decode_short_grid_resolution() {
        let mut reader = Cursor::new(vec![0x01, 0x2C, 0x00, 0xFE]);
        let mut default_display_resolution_box = DefaultDisplayResolutionBox::default();
        let result = default_display_resolution_box.decode(&mut reader, 4);
        assert!(matches!(result, Err(JP2Error::BoxMalformed { .. })));
    }

    #[test]
    fn add_refuses_second_capture_resolution() {
        let mut resolution_box = ResolutionSuperBox::new();
        resolution_box
            .add(DefaultDisplayResolutionBox::new(scanner_resolution()))
            .unwrap()
            .add(CaptureResolutionBox::new(scanner_resolution()))
            .unwrap();

        let result = resolution_box.add(CaptureResolutionBox::default());
        assert!(matches!(
            result,
            Err(JP2Error::StructuralViolation(StructuralViolation::Duplicate { .. }))
        ));
        assert_eq!(resolution_box.children().len(), 2);
        assert_eq!(
            resolution_box.capture_resolution_box().map(|b| *b.resolution()),
            Some(scanner_resolution())
        );
        assert_eq!(resolution_box.length(), 8 + 18 + 18);
    }

    #[test]
    fn decode_round_trip() {
        let mut resolution_box = ResolutionSuperBox::new();
        resolution_box
            .add(CaptureResolutionBox::new(scanner_resolution()))
            .unwrap();
        let mut encoded = Vec::new();
        resolution_box.encode(&mut encoded).unwrap();

        let mut reader = Cursor::new(encoded);
        reader.set_position(8);
        let mut decoded = ResolutionSuperBox::default();
        decoded.decode(&mut reader, 18).unwrap();
        assert_eq!(decoded, resolution_box);
        assert!(decoded.default_display_resolution_box().is_none());
    }

    #[test]
    fn decode_empty_resolution_box() {
        let mut encoded = Vec::new();
        ResolutionSuperBox::new().encode(&mut encoded).unwrap();
        assert_eq!(encoded, vec![0x00, 0x00, 0x00, 0x08, b'r', b'e', b's', b' ']);

        let mut reader = Cursor::new(encoded);
        reader.set_position(8);
        let mut resolution_box = ResolutionSuperBox::default();
        resolution_box.decode(&mut reader, 0).unwrap();
        assert!(resolution_box.children().is_empty());
        assert!(resolution_box.capture_resolution_box().is_none());
    }

    #[test]
    fn decode_refuses_nested_resolution_box() {
        // res { res { resc } }: the inner superbox is refused from its header.
        let mut inner = ResolutionSuperBox::new();
        inner.add(CaptureResolutionBox::default()).unwrap();
        let mut payload = Vec::new();
        inner.encode(&mut payload).unwrap();

        let mut reader = Cursor::new(payload.clone());
        let mut resolution_box = ResolutionSuperBox::default();
        let result = resolution_box.decode(&mut reader, payload.len() as u64);
        assert!(matches!(
            result,
            Err(JP2Error::StructuralViolation(StructuralViolation::NotAllowed { .. }))
        ));
        assert_eq!(reader.position(), 8);
    }
}
