use log::{info, warn};
use std::io;

use crate::bits_per_component::BitsPerComponentBox;
use crate::box_header::BoxHeader;
use crate::box_type::{BoxKind, BoxType};
use crate::channel_definition::ChannelDefinitionBox;
use crate::colour_specification::ColourSpecificationBox;
use crate::component_mapping::ComponentMappingBox;
use crate::error::{JP2Error, Result};
use crate::header::HeaderSuperBox;
use crate::image_header::ImageHeaderBox;
use crate::jbox::{JBox, Jp2Box};
use crate::opaque::OpaqueBox;
use crate::palette::PaletteBox;
use crate::resolution::{CaptureResolutionBox, DefaultDisplayResolutionBox, ResolutionSuperBox};
use crate::validation::ChildRules;

/// Construct an empty box of the variant registered for `box_type`.
///
/// Unrecognised type codes yield an [`OpaqueBox`] that keeps its payload as
/// raw bytes, so future box types pass through untouched.
pub fn construct_box(box_type: BoxType) -> Jp2Box {
    match BoxKind::from_box_type(box_type) {
        BoxKind::Header => HeaderSuperBox::default().into(),
        BoxKind::ImageHeader => ImageHeaderBox::default().into(),
        BoxKind::BitsPerComponent => BitsPerComponentBox::default().into(),
        BoxKind::ColourSpecification => ColourSpecificationBox::default().into(),
        BoxKind::Palette => PaletteBox::default().into(),
        BoxKind::ComponentMapping => ComponentMappingBox::default().into(),
        BoxKind::ChannelDefinition => ChannelDefinitionBox::default().into(),
        BoxKind::Resolution => ResolutionSuperBox::default().into(),
        BoxKind::CaptureResolution => CaptureResolutionBox::default().into(),
        BoxKind::DefaultDisplayResolution => DefaultDisplayResolutionBox::default().into(),
        BoxKind::Other => OpaqueBox::new(box_type, vec![]).into(),
    }
}

/// Construct and decode the box described by an already decoded `header`.
///
/// On return the stream is positioned exactly at the end of the box. Payload
/// bytes the box did not interpret are skipped; a box that reads past its
/// declared end is malformed.
pub fn decode_box_payload<R: io::Read + io::Seek>(
    reader: &mut R,
    header: &BoxHeader,
) -> Result<Jp2Box> {
    let start = reader.stream_position()?;
    let end = start + header.payload_length;

    let mut jbox = construct_box(header.box_type);
    info!("{} start at {:?}", jbox.kind(), start);
    jbox.decode(reader, header.payload_length)?;

    let position = reader.stream_position()?;
    if position > end {
        return Err(JP2Error::BoxMalformed {
            box_type: header.box_type,
            offset: header.offset,
            reason: "contents extend beyond the box length",
        });
    } else if position < end {
        warn!(
            "{} box at offset {} has {} trailing bytes, skipping",
            header.box_type,
            header.offset,
            end - position
        );
        reader.seek(io::SeekFrom::Start(end))?;
    }
    info!("{} finish at {:?}", jbox.kind(), end);

    Ok(jbox)
}

/// Decode every box in the next `payload_length` bytes of the stream.
///
/// Each child is handed to `add` in stream order; an error from `add` stops
/// decoding. With `rules`, a child the superbox may never hold is refused from
/// its header alone, before its contents are decoded, which bounds how deep
/// superboxes can nest.
pub(crate) fn decode_children<R, F>(
    reader: &mut R,
    payload_length: u64,
    rules: Option<&ChildRules>,
    mut add: F,
) -> Result<()>
where
    R: io::Read + io::Seek,
    F: FnMut(Jp2Box) -> Result<()>,
{
    let end = reader.stream_position()? + payload_length;
    loop {
        let position = reader.stream_position()?;
        if position >= end {
            break;
        }
        let header = BoxHeader::decode(reader, end - position)?;
        if let Some(rules) = rules {
            rules.check_nesting(BoxKind::from_box_type(header.box_type), header.box_type)?;
        }
        let child = decode_box_payload(reader, &header)?;
        add(child)?;
    }
    Ok(())
}

/// Decode a single box, header included, from the current stream position.
pub fn decode_box<R: io::Read + io::Seek>(reader: &mut R) -> Result<Jp2Box> {
    let available = remaining_length(reader)?;
    let header = BoxHeader::decode(reader, available)?;
    decode_box_payload(reader, &header)
}

/// Decode every box from the current stream position to the end of the stream.
pub fn decode_boxes<R: io::Read + io::Seek>(reader: &mut R) -> Result<Vec<Jp2Box>> {
    let available = remaining_length(reader)?;
    let mut boxes = vec![];
    decode_children(reader, available, None, |child| {
        boxes.push(child);
        Ok(())
    })?;
    Ok(boxes)
}

fn remaining_length<R: io::Seek>(reader: &mut R) -> Result<u64> {
    let position = reader.stream_position()?;
    let end = reader.seek(io::SeekFrom::End(0))?;
    reader.seek(io::SeekFrom::Start(position))?;
    Ok(end.saturating_sub(position))
}
