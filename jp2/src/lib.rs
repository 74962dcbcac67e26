//! JP2 box tree.
//!
//! Boxes from ISO/IEC 15444-1 Annex I, centred on the JP2 Header superbox
//! (`jp2h`) and the Image Header box (`ihdr`) it must start with. Every box
//! can be built in memory, measured, encoded and decoded; superboxes check
//! their children as they are added.
//!
//! ```
//! use jp2::{HeaderSuperBox, ImageHeaderBox, JBox};
//!
//! let mut header = HeaderSuperBox::new();
//! header.add(ImageHeaderBox::new(1024, 768, 3, 8, false, false)).unwrap();
//! assert_eq!(header.length(), 30);
//! ```

mod bits_per_component;
mod box_header;
mod box_type;
mod channel_definition;
mod colour_specification;
mod component_mapping;
mod container;
mod error;
mod header;
mod image_header;
mod jbox;
mod opaque;
mod palette;
mod registry;
mod resolution;
mod validation;

pub use bits_per_component::{BitDepth, BitsPerComponentBox};
pub use box_header::{BoxHeader, BOX_HEADER_LENGTH, EXTENDED_BOX_HEADER_LENGTH};
pub use box_type::{
    BoxKind, BoxType, BOX_TYPE_BITS_PER_COMPONENT, BOX_TYPE_CAPTURE_RESOLUTION,
    BOX_TYPE_CHANNEL_DEFINITION, BOX_TYPE_COLOUR_SPECIFICATION, BOX_TYPE_COMPONENT_MAPPING,
    BOX_TYPE_DEFAULT_DISPLAY_RESOLUTION, BOX_TYPE_HEADER, BOX_TYPE_IMAGE_HEADER, BOX_TYPE_PALETTE,
    BOX_TYPE_RESOLUTION,
};
pub use channel_definition::{Channel, ChannelDefinitionBox, ChannelTypes};
pub use colour_specification::{
    ColourSpecificationBox, ColourSpecificationMethods, EnumeratedColourSpaces,
    ENUMERATED_COLOUR_SPACE_GREYSCALE, ENUMERATED_COLOUR_SPACE_SRGB, ENUMERATED_COLOUR_SPACE_SYCC,
};
pub use component_mapping::{ComponentMap, ComponentMapType, ComponentMappingBox};
pub use container::ContainerBox;
pub use error::{JP2Error, Result, StructuralViolation};
pub use header::HeaderSuperBox;
pub use image_header::{ImageHeaderBox, COMPONENTS_BITS_VARY, COMPRESSION_TYPE_WAVELET};
pub use jbox::{JBox, Jp2Box};
pub use opaque::OpaqueBox;
pub use palette::{GeneratedComponent, PaletteBox};
pub use registry::{construct_box, decode_box, decode_box_payload, decode_boxes};
pub use resolution::{
    CaptureResolutionBox, DefaultDisplayResolutionBox, GridResolution, ResolutionSuperBox,
};
pub use validation::{
    Cardinality, ChildRule, ChildRules, ChildValidator, HEADER_RULES, RESOLUTION_RULES,
};
