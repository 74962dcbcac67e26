use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io;

use crate::box_type::{BoxType, BOX_TYPE_COMPONENT_MAPPING};
use crate::error::{JP2Error, Result};
use crate::jbox::JBox;

const COMPONENT_MAP_TYPE_DIRECT: u8 = 0;
const COMPONENT_MAP_TYPE_PALETTE: u8 = 1;

const COMPONENT_MAP_LENGTH: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentMapType {
    // Direct use.
    //
    // This channel is created directly from an actual component in the
    // codestream.
    Direct,

    // Palette mapping.
    //
    // This channel is created by applying the palette to an actual component
    // in the codestream. The column from the palette to use is specified in
    // the PCOLi field for this channel.
    Palette,

    // Reserved for ISO use
    Reserved { value: u8 },
}

impl ComponentMapType {
    pub fn new(value: u8) -> ComponentMapType {
        match value {
            COMPONENT_MAP_TYPE_DIRECT => ComponentMapType::Direct,
            COMPONENT_MAP_TYPE_PALETTE => ComponentMapType::Palette,
            value => ComponentMapType::Reserved { value },
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            ComponentMapType::Direct => COMPONENT_MAP_TYPE_DIRECT,
            ComponentMapType::Palette => COMPONENT_MAP_TYPE_PALETTE,
            ComponentMapType::Reserved { value } => *value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentMap {
    // This field specifies the index of component from the codestream that is
    // mapped to this channel (either directly or through a palette).
    component: u16,

    // This field specifies how this channel is generated from the actual
    // components in the file.
    mapping_type: ComponentMapType,

    // This field specifies the index component from the palette that is used
    // to map the actual component from the codestream.
    //
    // If the value of the MTYPi field for this channel is 0, then the value of
    // this field shall be 0.
    palette: u8,
}

impl ComponentMap {
    pub fn direct(component: u16) -> ComponentMap {
        ComponentMap {
            component,
            mapping_type: ComponentMapType::Direct,
            palette: 0,
        }
    }

    pub fn palette_mapping(component: u16, palette: u8) -> ComponentMap {
        ComponentMap {
            component,
            mapping_type: ComponentMapType::Palette,
            palette,
        }
    }

    pub fn component(&self) -> u16 {
        self.component
    }

    pub fn mapping_type(&self) -> ComponentMapType {
        self.mapping_type
    }

    pub fn palette(&self) -> u8 {
        self.palette
    }
}

/// Component Mapping Box.
///
/// The Component Mapping box defines how image channels are identified from the
/// actual components decoded from the codestream.
///
/// The channels are numbered in order starting with zero, and the number of
/// channels specified in the Component Mapping box is determined by the length
/// of the box.
///
/// See ISO/IEC 15444-1:2024 Section I.5.3.5.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentMappingBox {
    mapping: Vec<ComponentMap>,
}

impl ComponentMappingBox {
    pub fn new(mapping: Vec<ComponentMap>) -> ComponentMappingBox {
        ComponentMappingBox { mapping }
    }

    pub fn component_map(&self) -> &[ComponentMap] {
        &self.mapping
    }
}

impl JBox for ComponentMappingBox {
    // The type of the Component Mapping box shall be ‘cmap’ (0x636D 6170).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_COMPONENT_MAPPING
    }

    fn payload_length(&self) -> u64 {
        self.mapping.len() as u64 * COMPONENT_MAP_LENGTH
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        if payload_length % COMPONENT_MAP_LENGTH != 0 {
            return Err(JP2Error::BoxMalformed {
                box_type: BOX_TYPE_COMPONENT_MAPPING,
                offset: reader.stream_position()?,
                reason: "length is not a multiple of 4",
            });
        }

        let mut mapping = vec![];
        for _ in 0..payload_length / COMPONENT_MAP_LENGTH {
            let component_map = ComponentMap {
                component: reader.read_u16::<BigEndian>()?,
                mapping_type: ComponentMapType::new(reader.read_u8()?),
                palette: reader.read_u8()?,
            };
            debug!("Component map {:?}", component_map);
            mapping.push(component_map);
        }
        self.mapping = mapping;

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        for component_map in &self.mapping {
            writer.write_u16::<BigEndian>(component_map.component)?;
            writer.write_u8(component_map.mapping_type.value())?;
            writer.write_u8(component_map.palette)?;
        }
        Ok(())
    }
}
