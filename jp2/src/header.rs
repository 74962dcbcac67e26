use log::{info, warn};
use std::io;

use crate::bits_per_component::BitsPerComponentBox;
use crate::box_type::{BoxKind, BoxType, BOX_TYPE_HEADER};
use crate::channel_definition::ChannelDefinitionBox;
use crate::colour_specification::ColourSpecificationBox;
use crate::component_mapping::ComponentMappingBox;
use crate::container::ContainerBox;
use crate::error::Result;
use crate::image_header::ImageHeaderBox;
use crate::jbox::{JBox, Jp2Box};
use crate::palette::PaletteBox;
use crate::registry::decode_children;
use crate::resolution::ResolutionSuperBox;
use crate::validation::{ChildValidator, HEADER_RULES};

// I.5.3
//
// JP2 Header box
//
// The JP2 Header box contains generic information about the file, such as
// number of components, colourspace, and grid resolution. This box is a
// superbox. Within a JP2 file, there shall be one and only one JP2 Header box.
//
// It starts with the Image Header box. The Bits Per Component, Palette,
// Component Mapping, Channel Definition and Resolution boxes may each appear
// at most once anywhere after it. At least one Colour Specification box is
// expected; a conforming reader only uses the first. Boxes defined by other
// standards may also appear and are kept as they are.
/// JP2 Header superbox (`jp2h`).
///
/// Every child goes through [`HeaderSuperBox::add`], which enforces the
/// ordering and cardinality rules of the JP2 Header box at insertion time, so
/// a header box that breaks them cannot be built, nor decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderSuperBox {
    container: ContainerBox,
    validator: ChildValidator,
}

impl Default for HeaderSuperBox {
    fn default() -> HeaderSuperBox {
        HeaderSuperBox {
            container: ContainerBox::new(BOX_TYPE_HEADER),
            validator: ChildValidator::new(&HEADER_RULES),
        }
    }
}

impl HeaderSuperBox {
    pub fn new() -> HeaderSuperBox {
        HeaderSuperBox::default()
    }

    /// Append a child after checking it against the JP2 Header box rules.
    ///
    /// Fails with [`StructuralViolation`](crate::StructuralViolation) if the
    /// child is not an Image Header box and none has been added yet, or if it
    /// would be a second Image Header, Bits Per Component, Palette, Component
    /// Mapping, Channel Definition or Resolution box. A refused child leaves
    /// the header box unchanged.
    pub fn add(&mut self, child: impl Into<Jp2Box>) -> Result<&mut HeaderSuperBox> {
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

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    fn slot(&self, kind: BoxKind) -> Option<&Jp2Box> {
        self.validator
            .slot(kind)
            .and_then(|index| self.container.get(index))
    }

    /// Image Header box.
    ///
    /// Present if and only if the header box has any children.
    pub fn image_header_box(&self) -> Option<&ImageHeaderBox> {
        match self.slot(BoxKind::ImageHeader) {
            Some(Jp2Box::ImageHeader(image_header_box)) => Some(image_header_box),
            _ => None,
        }
    }

    pub fn bits_per_component_box(&self) -> Option<&BitsPerComponentBox> {
        match self.slot(BoxKind::BitsPerComponent) {
            Some(Jp2Box::BitsPerComponent(bits_per_component_box)) => Some(bits_per_component_box),
            _ => None,
        }
    }

    /// The first Colour Specification box.
    ///
    /// Later Colour Specification boxes are kept in
    /// [`children`](HeaderSuperBox::children) and encoded, but a conforming
    /// JP2 reader ignores them.
    pub fn colour_specification_box(&self) -> Option<&ColourSpecificationBox> {
        match self.slot(BoxKind::ColourSpecification) {
            Some(Jp2Box::ColourSpecification(colour_specification_box)) => {
                Some(colour_specification_box)
            }
            _ => None,
        }
    }

    /// All Colour Specification boxes, in order.
    pub fn colour_specification_boxes(&self) -> impl Iterator<Item = &ColourSpecificationBox> {
        self.children().iter().filter_map(|child| match child {
            Jp2Box::ColourSpecification(colour_specification_box) => Some(colour_specification_box),
            _ => None,
        })
    }

    pub fn palette_box(&self) -> Option<&PaletteBox> {
        match self.slot(BoxKind::Palette) {
            Some(Jp2Box::Palette(palette_box)) => Some(palette_box),
            _ => None,
        }
    }

    pub fn component_mapping_box(&self) -> Option<&ComponentMappingBox> {
        match self.slot(BoxKind::ComponentMapping) {
            Some(Jp2Box::ComponentMapping(component_mapping_box)) => Some(component_mapping_box),
            _ => None,
        }
    }

    pub fn channel_definition_box(&self) -> Option<&ChannelDefinitionBox> {
        match self.slot(BoxKind::ChannelDefinition) {
            Some(Jp2Box::ChannelDefinition(channel_definition_box)) => Some(channel_definition_box),
            _ => None,
        }
    }

    pub fn resolution_box(&self) -> Option<&ResolutionSuperBox> {
        match self.slot(BoxKind::Resolution) {
            Some(Jp2Box::Resolution(resolution_box)) => Some(resolution_box),
            _ => None,
        }
    }
}

impl JBox for HeaderSuperBox {
    // The type of the JP2 Header box shall be ‘jp2h’ (0x6A70 3268)
    fn identifier(&self) -> BoxType {
        BOX_TYPE_HEADER
    }

    fn payload_length(&self) -> u64 {
        self.container.payload_length()
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        decode_children(reader, payload_length, Some(&HEADER_RULES), |child| {
            if child.kind() == BoxKind::Other {
                warn!("Unknown box type {} in JP2 Header box, keeping", child.identifier());
            }
            self.add(child)?;
            Ok(())
        })?;

        if self.image_header_box().is_none() {
            warn!("JP2 Header box has no Image Header box");
        }
        // There shall be at least one Colour Specification box within the JP2
        // Header box.
        if self.colour_specification_box().is_none() {
            warn!("JP2 Header box has no Colour Specification box");
        }
        info!("JP2 Header box decoded with {} children", self.len());

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.container.encode_payload(writer)
    }
}
