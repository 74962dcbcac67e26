use std::fmt;

/// Box Type (TBox).
///
/// The value of this field is encoded as a 4-byte big endian unsigned
/// integer. However, boxes are generally referred to by an ISO 646 character
/// string translation of the integer value, with a space character shown as
/// "\040".
///
/// All values of TBox not defined are reserved for ISO use.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoxType(pub [u8; 4]);

impl BoxType {
    pub const fn new(value: [u8; 4]) -> BoxType {
        BoxType(value)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BoxType(\"{}\")", self)
    }
}

impl From<[u8; 4]> for BoxType {
    fn from(value: [u8; 4]) -> BoxType {
        BoxType(value)
    }
}

impl From<u32> for BoxType {
    fn from(value: u32) -> BoxType {
        BoxType(value.to_be_bytes())
    }
}

impl From<BoxType> for u32 {
    fn from(value: BoxType) -> u32 {
        u32::from_be_bytes(value.0)
    }
}

// jp2h (0x6A70 3268)
pub const BOX_TYPE_HEADER: BoxType = BoxType(*b"jp2h");
// ihdr (0x6968 6472)
pub const BOX_TYPE_IMAGE_HEADER: BoxType = BoxType(*b"ihdr");
// bpcc (0x6270 6363)
pub const BOX_TYPE_BITS_PER_COMPONENT: BoxType = BoxType(*b"bpcc");
// colr (0x636F 6C72)
pub const BOX_TYPE_COLOUR_SPECIFICATION: BoxType = BoxType(*b"colr");
// pclr (0x7063 6C72)
pub const BOX_TYPE_PALETTE: BoxType = BoxType(*b"pclr");
// cmap (0x636D 6170)
pub const BOX_TYPE_COMPONENT_MAPPING: BoxType = BoxType(*b"cmap");
// cdef (0x6364 6566)
pub const BOX_TYPE_CHANNEL_DEFINITION: BoxType = BoxType(*b"cdef");
// res\040 (0x7265 7320)
pub const BOX_TYPE_RESOLUTION: BoxType = BoxType(*b"res ");
// resc (0x7265 7363)
pub const BOX_TYPE_CAPTURE_RESOLUTION: BoxType = BoxType(*b"resc");
// resd (0x7265 7364)
pub const BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION: BoxType = BoxType(*b"resd");

/// The closed set of box kinds this crate knows how to interpret.
///
/// Anything else is carried as [`BoxKind::Other`] and preserved byte for byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxKind {
    Header,
    ImageHeader,
    BitsPerComponent,
    ColourSpecification,
    Palette,
    ComponentMapping,
    ChannelDefinition,
    Resolution,
    CaptureResolution,
    DefaultDisplayResolution,
    Other,
}

impl fmt::Display for BoxKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl BoxKind {
    pub fn from_box_type(value: BoxType) -> BoxKind {
        match value {
            BOX_TYPE_HEADER => BoxKind::Header,
            BOX_TYPE_IMAGE_HEADER => BoxKind::ImageHeader,
            BOX_TYPE_BITS_PER_COMPONENT => BoxKind::BitsPerComponent,
            BOX_TYPE_COLOUR_SPECIFICATION => BoxKind::ColourSpecification,
            BOX_TYPE_PALETTE => BoxKind::Palette,
            BOX_TYPE_COMPONENT_MAPPING => BoxKind::ComponentMapping,
            BOX_TYPE_CHANNEL_DEFINITION => BoxKind::ChannelDefinition,
            BOX_TYPE_RESOLUTION => BoxKind::Resolution,
            BOX_TYPE_CAPTURE_RESOLUTION => BoxKind::CaptureResolution,
            BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION => BoxKind::DefaultDisplayResolution,
            _ => BoxKind::Other,
        }
    }

    /// The type code of a recognised kind, `None` for [`BoxKind::Other`].
    pub fn box_type(&self) -> Option<BoxType> {
        match self {
            BoxKind::Header => Some(BOX_TYPE_HEADER),
            BoxKind::ImageHeader => Some(BOX_TYPE_IMAGE_HEADER),
            BoxKind::BitsPerComponent => Some(BOX_TYPE_BITS_PER_COMPONENT),
            BoxKind::ColourSpecification => Some(BOX_TYPE_COLOUR_SPECIFICATION),
            BoxKind::Palette => Some(BOX_TYPE_PALETTE),
            BoxKind::ComponentMapping => Some(BOX_TYPE_COMPONENT_MAPPING),
            BoxKind::ChannelDefinition => Some(BOX_TYPE_CHANNEL_DEFINITION),
            BoxKind::Resolution => Some(BOX_TYPE_RESOLUTION),
            BoxKind::CaptureResolution => Some(BOX_TYPE_CAPTURE_RESOLUTION),
            BoxKind::DefaultDisplayResolution => Some(BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION),
            BoxKind::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_escapes_non_printable_bytes() {
        assert_eq!(BOX_TYPE_RESOLUTION.to_string(), "res ");
        assert_eq!(BoxType([106, 80, 32, 32]).to_string(), "jP  ");
        assert_eq!(BoxType([0, b'a', 0x87, b'z']).to_string(), "\\x00a\\x87z");
    }

    #[test]
    fn kinds_map_back_to_their_type_codes() {
        for kind in [
            BoxKind::Header,
            BoxKind::ImageHeader,
            BoxKind::BitsPerComponent,
            BoxKind::ColourSpecification,
            BoxKind::Palette,
            BoxKind::ComponentMapping,
            BoxKind::ChannelDefinition,
            BoxKind::Resolution,
            BoxKind::CaptureResolution,
            BoxKind::DefaultDisplayResolution,
        ] {
            let box_type = kind.box_type().unwrap();
            assert_eq!(BoxKind::from_box_type(box_type), kind);
        }
        assert_eq!(BoxKind::from_box_type(BoxType(*b"xml ")), BoxKind::Other);
        assert_eq!(BoxKind::Other.box_type(), None);
    }

    #[test]
    fn converts_to_and_from_u32() {
        assert_eq!(u32::from(BOX_TYPE_HEADER), 0x6A70_3268);
        assert_eq!(BoxType::from(0x6968_6472), BOX_TYPE_IMAGE_HEADER);
    }
}
