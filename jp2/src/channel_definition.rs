use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io;

use crate::box_type::{BoxType, BOX_TYPE_CHANNEL_DEFINITION};
use crate::error::{JP2Error, Result};
use crate::jbox::JBox;

const CHANNEL_TYPE_COLOUR_IMAGE_DATA: u16 = 0;
const CHANNEL_TYPE_OPACITY: u16 = 1;
const CHANNEL_TYPE_PREMULTIPLIED_OPACITY: u16 = 2;
const CHANNEL_TYPE_UNSPECIFIED: u16 = u16::MAX;

const CHANNEL_DESCRIPTION_LENGTH: u64 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelTypes {
    // This channel is the colour image data for the associated colour.
    ColourImageData,

    // Opacity. A sample value of 0 indicates that the sample is 100%
    // transparent.
    Opacity,

    // Premultiplied opacity. The colour channels have been multiplied by the
    // opacity of this channel.
    PremultipliedOpacity,

    // Reserved for ISO use
    Reserved { value: u16 },

    // The type of this channel is not specified.
    Unspecified,
}

impl ChannelTypes {
    pub fn new(value: u16) -> ChannelTypes {
        match value {
            CHANNEL_TYPE_COLOUR_IMAGE_DATA => ChannelTypes::ColourImageData,
            CHANNEL_TYPE_OPACITY => ChannelTypes::Opacity,
            CHANNEL_TYPE_PREMULTIPLIED_OPACITY => ChannelTypes::PremultipliedOpacity,
            CHANNEL_TYPE_UNSPECIFIED => ChannelTypes::Unspecified,
            value => ChannelTypes::Reserved { value },
        }
    }

    pub fn value(&self) -> u16 {
        match self {
            ChannelTypes::ColourImageData => CHANNEL_TYPE_COLOUR_IMAGE_DATA,
            ChannelTypes::Opacity => CHANNEL_TYPE_OPACITY,
            ChannelTypes::PremultipliedOpacity => CHANNEL_TYPE_PREMULTIPLIED_OPACITY,
            ChannelTypes::Reserved { value } => *value,
            ChannelTypes::Unspecified => CHANNEL_TYPE_UNSPECIFIED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    // Channel index
    //
    // The index of the channel as defined within the Component Mapping box, or
    // the actual component from the codestream if the file does not contain a
    // Component Mapping box.
    channel_index: u16,

    // Channel type
    //
    // The meaning of the decompressed samples in this channel.
    channel_type: ChannelTypes,

    // Channel association
    //
    // The index of the colour this channel is directly associated with. 0
    // associates the channel with the whole image, 65535 with no particular
    // colour.
    channel_association: u16,
}

impl Channel {
    pub fn new(channel_index: u16, channel_type: ChannelTypes, channel_association: u16) -> Channel {
        Channel {
            channel_index,
            channel_type,
            channel_association,
        }
    }

    pub fn channel_index(&self) -> u16 {
        self.channel_index
    }

    pub fn channel_type(&self) -> ChannelTypes {
        self.channel_type
    }

    pub fn channel_association(&self) -> u16 {
        self.channel_association
    }
}

// I.5.3.6
//
// Channel Definition box
//
// The Channel Definition box specifies the meaning of the samples in each
// channel in the image. The exact location of this box within the JP2 Header
// box may vary provided that it follows the Image Header box.
//
// If this box does not exist, then the channels are in the order of the
// colourspace, followed by any other channels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelDefinitionBox {
    channels: Vec<Channel>,
}

impl ChannelDefinitionBox {
    pub fn new(channels: Vec<Channel>) -> ChannelDefinitionBox {
        ChannelDefinitionBox { channels }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
}

impl JBox for ChannelDefinitionBox {
    // The type of the Channel Definition box shall be ‘cdef’ (0x6364 6566).
    fn identifier(&self) -> BoxType {
        BOX_TYPE_CHANNEL_DEFINITION
    }

    fn payload_length(&self) -> u64 {
        2 + self.channels.len() as u64 * CHANNEL_DESCRIPTION_LENGTH
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        let offset = reader.stream_position()?;
        if payload_length < 2 {
            return Err(JP2Error::BoxMalformed {
                box_type: BOX_TYPE_CHANNEL_DEFINITION,
                offset,
                reason: "missing number of channel descriptions",
            });
        }

        // Number of channel descriptions, a 2-byte big endian unsigned integer.
        let size = reader.read_u16::<BigEndian>()?;
        if payload_length < 2 + u64::from(size) * CHANNEL_DESCRIPTION_LENGTH {
            return Err(JP2Error::BoxMalformed {
                box_type: BOX_TYPE_CHANNEL_DEFINITION,
                offset,
                reason: "fewer channel descriptions than declared",
            });
        }

        let mut channels = Vec::with_capacity(usize::from(size));
        for _ in 0..size {
            let channel = Channel {
                channel_index: reader.read_u16::<BigEndian>()?,
                channel_type: ChannelTypes::new(reader.read_u16::<BigEndian>()?),
                channel_association: reader.read_u16::<BigEndian>()?,
            };
            debug!(
                "Found channel at index {:?} of type {:?} and association {:?}",
                channel.channel_index, channel.channel_type, channel.channel_association,
            );
            channels.push(channel);
        }
        self.channels = channels;

        Ok(())
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let num_channels =
            u16::try_from(self.channels.len()).map_err(|_| JP2Error::InvalidContent {
                box_type: BOX_TYPE_CHANNEL_DEFINITION,
                reason: "more than 65535 channel descriptions",
            })?;
        writer.write_u16::<BigEndian>(num_channels)?;
        for channel in &self.channels {
            writer.write_u16::<BigEndian>(channel.channel_index)?;
            writer.write_u16::<BigEndian>(channel.channel_type.value())?;
            writer.write_u16::<BigEndian>(channel.channel_association)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn decode_rgba_channels() {
        #[rustfmt::skip]
        let input: Vec<u8> = vec![
            0x00, 0x02,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
            0x00, 0x03, 0x00, 0x01, 0x00, 0x00,
        ];
        let mut reader = Cursor::new(input.clone());
        let mut channel_definition_box = ChannelDefinitionBox::default();
        channel_definition_box.decode(&mut reader, 14).unwrap();

        let channels = channel_definition_box.channels();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].channel_type(), ChannelTypes::ColourImageData);
        assert_eq!(channels[0].channel_association(), 1);
        assert_eq!(channels[1].channel_index(), 3);
        assert_eq!(channels[1].channel_type(), ChannelTypes::Opacity);
        assert_eq!(channel_definition_box.length(), 22);

        let mut output = Vec::new();
        channel_definition_box.encode_payload(&mut output).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn channel_type_values() {
        assert_eq!(ChannelTypes::new(2), ChannelTypes::PremultipliedOpacity);
        assert_eq!(ChannelTypes::new(0xFFFF), ChannelTypes::Unspecified);
        assert_eq!(ChannelTypes::new(7), ChannelTypes::Reserved { value: 7 });
        assert_eq!(ChannelTypes::Unspecified.value(), 0xFFFF);
    }

    #[test]
    fn encode_too_many_channels() {
        let channel = Channel::new(0, ChannelTypes::ColourImageData, 1);
        let channel_definition_box = ChannelDefinitionBox::new(vec![channel; 65536]);

        let mut output = Vec::new();
        let result = channel_definition_box.encode_payload(&mut output);
        assert!(matches!(
            result,
            Err(JP2Error::InvalidContent {
                box_type: BOX_TYPE_CHANNEL_DEFINITION,
                ..
            })
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn decode_short_payload() {
        let mut reader = Cursor::new(vec![0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]);
        let mut channel_definition_box = ChannelDefinitionBox::default();
        let result = channel_definition_box.decode(&mut reader, 8);
        assert!(matches!(result, Err(JP2Error::BoxMalformed { .. })));
    }
}
