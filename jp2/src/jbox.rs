use std::io;

use crate::bits_per_component::BitsPerComponentBox;
use crate::box_header::{BoxHeader, BOX_HEADER_LENGTH};
use crate::box_type::{BoxKind, BoxType};
use crate::channel_definition::ChannelDefinitionBox;
use crate::colour_specification::ColourSpecificationBox;
use crate::component_mapping::ComponentMappingBox;
use crate::error::Result;
use crate::header::HeaderSuperBox;
use crate::image_header::ImageHeaderBox;
use crate::opaque::OpaqueBox;
use crate::palette::PaletteBox;
use crate::resolution::{CaptureResolutionBox, DefaultDisplayResolutionBox, ResolutionSuperBox};

/// JPEG 2000 box trait.
///
/// The building-block of the JP2 file format is called a box.
///
/// All information contained within the JP2 file is encapsulated in boxes.
///
/// ISO/IEC 15444-1 / ITU T-800 defines several types of boxes;
/// the definition of each specific box type defines the kinds of information
/// that may be found within a box of that type. Some boxes will be defined to
/// contain other boxes.
///
/// For more information, see ISO/IEC 15444-1 / ITU T-800 Appendix I.4.
pub trait JBox {
    fn identifier(&self) -> BoxType;

    /// Number of bytes in the DBox field for the current content.
    fn payload_length(&self) -> u64;

    /// Total encoded length, including the 8-byte LBox/TBox header.
    fn length(&self) -> u64 {
        BOX_HEADER_LENGTH + self.payload_length()
    }

    /// Populate the box from its DBox field.
    ///
    /// The header has already been consumed; `payload_length` bytes follow.
    fn decode<R: io::Read + io::Seek>(&mut self, reader: &mut R, payload_length: u64)
        -> Result<()>;

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()>;

    /// Write the box header followed by the payload.
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        BoxHeader::encode(writer, self.identifier(), self.length())?;
        self.encode_payload(writer)
    }
}

/// Any box that may appear in a JP2 box tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Jp2Box {
    Header(HeaderSuperBox),
    ImageHeader(ImageHeaderBox),
    BitsPerComponent(BitsPerComponentBox),
    ColourSpecification(ColourSpecificationBox),
    Palette(PaletteBox),
    ComponentMapping(ComponentMappingBox),
    ChannelDefinition(ChannelDefinitionBox),
    Resolution(ResolutionSuperBox),
    CaptureResolution(CaptureResolutionBox),
    DefaultDisplayResolution(DefaultDisplayResolutionBox),
    Other(OpaqueBox),
}

macro_rules! each_variant {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Jp2Box::Header($inner) => $body,
            Jp2Box::ImageHeader($inner) => $body,
            Jp2Box::BitsPerComponent($inner) => $body,
            Jp2Box::ColourSpecification($inner) => $body,
            Jp2Box::Palette($inner) => $body,
            Jp2Box::ComponentMapping($inner) => $body,
            Jp2Box::ChannelDefinition($inner) => $body,
            Jp2Box::Resolution($inner) => $body,
            Jp2Box::CaptureResolution($inner) => $body,
            Jp2Box::DefaultDisplayResolution($inner) => $body,
            Jp2Box::Other($inner) => $body,
        }
    };
}

impl Jp2Box {
    pub fn kind(&self) -> BoxKind {
        match self {
            Jp2Box::Header(_) => BoxKind::Header,
            Jp2Box::ImageHeader(_) => BoxKind::ImageHeader,
            Jp2Box::BitsPerComponent(_) => BoxKind::BitsPerComponent,
            Jp2Box::ColourSpecification(_) => BoxKind::ColourSpecification,
            Jp2Box::Palette(_) => BoxKind::Palette,
            Jp2Box::ComponentMapping(_) => BoxKind::ComponentMapping,
            Jp2Box::ChannelDefinition(_) => BoxKind::ChannelDefinition,
            Jp2Box::Resolution(_) => BoxKind::Resolution,
            Jp2Box::CaptureResolution(_) => BoxKind::CaptureResolution,
            Jp2Box::DefaultDisplayResolution(_) => BoxKind::DefaultDisplayResolution,
            Jp2Box::Other(_) => BoxKind::Other,
        }
    }
}

impl JBox for Jp2Box {
    fn identifier(&self) -> BoxType {
        each_variant!(self, inner => inner.identifier())
    }

    fn payload_length(&self) -> u64 {
        each_variant!(self, inner => inner.payload_length())
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        each_variant!(self, inner => inner.decode(reader, payload_length))
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        each_variant!(self, inner => inner.encode_payload(writer))
    }
}

macro_rules! impl_from_box {
    ($( $variant:ident => $inner:ty ),*) => {
        $(
            impl From<$inner> for Jp2Box {
                fn from(value: $inner) -> Jp2Box {
                    Jp2Box::$variant(value)
                }
            }
        )*
    };
}

impl_from_box! {
    Header => HeaderSuperBox,
    ImageHeader => ImageHeaderBox,
    BitsPerComponent => BitsPerComponentBox,
    ColourSpecification => ColourSpecificationBox,
    Palette => PaletteBox,
    ComponentMapping => ComponentMappingBox,
    ChannelDefinition => ChannelDefinitionBox,
    Resolution => ResolutionSuperBox,
    CaptureResolution => CaptureResolutionBox,
    DefaultDisplayResolution => DefaultDisplayResolutionBox,
    Other => OpaqueBox
}
