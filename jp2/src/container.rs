use std::io;

use crate::box_type::BoxType;
use crate::error::Result;
use crate::jbox::{JBox, Jp2Box};
use crate::registry::decode_children;

/// A superbox: a box whose contents are a sequence of other boxes.
///
/// A container knows nothing about what its children mean. It owns them in
/// insertion order, which is also the order in which they are encoded.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerBox {
    box_type: BoxType,
    children: Vec<Jp2Box>,
}

impl ContainerBox {
    pub fn new(box_type: BoxType) -> ContainerBox {
        ContainerBox {
            box_type,
            children: vec![],
        }
    }

    /// Append a child unconditionally.
    pub fn add(&mut self, child: impl Into<Jp2Box>) -> &mut ContainerBox {
        self.children.push(child.into());
        self
    }

    pub fn children(&self) -> &[Jp2Box] {
        &self.children
    }

    pub fn get(&self, index: usize) -> Option<&Jp2Box> {
        self.children.get(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl JBox for ContainerBox {
    fn identifier(&self) -> BoxType {
        self.box_type
    }

    fn payload_length(&self) -> u64 {
        self.children.iter().map(|child| child.length()).sum()
    }

    fn decode<R: io::Read + io::Seek>(
        &mut self,
        reader: &mut R,
        payload_length: u64,
    ) -> Result<()> {
        decode_children(reader, payload_length, None, |child| {
            self.add(child);
            Ok(())
        })
    }

    fn encode_payload<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        for child in &self.children {
            child.encode(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::box_type::{BoxKind, BOX_TYPE_HEADER, BOX_TYPE_PALETTE};
    use crate::image_header::ImageHeaderBox;
    use crate::opaque::OpaqueBox;
    use crate::palette::PaletteBox;

    #[test]
    fn length_is_header_plus_children() {
        let mut container = ContainerBox::new(BoxType(*b"asoc"));
        assert_eq!(container.length(), 8);

        container
            .add(ImageHeaderBox::default())
            .add(OpaqueBox::new(BoxType(*b"free"), vec![0; 4]));
        assert_eq!(container.len(), 2);
        assert_eq!(container.length(), 8 + 22 + 12);
    }

    #[test]
    fn add_accepts_anything_in_order() {
        let mut container = ContainerBox::new(BOX_TYPE_HEADER);
        container
            .add(PaletteBox::default())
            .add(PaletteBox::default())
            .add(ImageHeaderBox::default());
        let kinds: Vec<BoxKind> = container.children().iter().map(Jp2Box::kind).collect();
        assert_eq!(
            kinds,
            vec![BoxKind::Palette, BoxKind::Palette, BoxKind::ImageHeader]
        );
        assert_eq!(container.get(0).map(|child| child.identifier()), Some(BOX_TYPE_PALETTE));
    }

    #[test]
    fn decode_restores_children_in_order() {
        let mut container = ContainerBox::new(BoxType(*b"asoc"));
        container
            .add(ImageHeaderBox::new(64, 128, 3, 7, false, false))
            .add(OpaqueBox::new(BoxType(*b"xml "), b"<x/>".to_vec()));

        let mut buffer = Vec::new();
        container.encode(&mut buffer).unwrap();
        assert_eq!(buffer.len() as u64, container.length());

        let mut reader = Cursor::new(buffer);
        reader.set_position(8);
        let mut decoded = ContainerBox::new(BoxType(*b"asoc"));
        decoded.decode(&mut reader, container.payload_length()).unwrap();
        assert_eq!(decoded, container);
        assert_eq!(reader.position(), container.length());
    }
}
