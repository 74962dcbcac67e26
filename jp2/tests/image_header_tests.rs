use std::io::Cursor;

use jp2::{
    decode_box, BoxKind, HeaderSuperBox, ImageHeaderBox, JBox as _, JP2Error, Jp2Box,
    BOX_TYPE_IMAGE_HEADER,
};

#[rustfmt::skip]
const IMAGE_HEADER_1024_768: [u8; 22] = [
    0x00, 0x00, 0x00, 0x16,
    b'i', b'h', b'd', b'r',
    0x00, 0x00, 0x03, 0x00,
    0x00, 0x00, 0x04, 0x00,
    0x00, 0x03,
    0x08,
    0x07,
    0x00,
    0x00,
];

#[test]
fn test_encode_image_header() {
    let image_header_box = ImageHeaderBox::new(1024, 768, 3, 8, false, false);
    assert_eq!(image_header_box.identifier(), BOX_TYPE_IMAGE_HEADER);
    assert_eq!(image_header_box.identifier().to_string(), "ihdr");
    assert_eq!(image_header_box.length(), 22);
    assert_eq!(image_header_box.compression_type(), 7);

    let mut encoded = Vec::new();
    image_header_box.encode(&mut encoded).unwrap();
    assert_eq!(encoded, IMAGE_HEADER_1024_768);
}

#[test]
fn test_decode_image_header() {
    let mut reader = Cursor::new(IMAGE_HEADER_1024_768.to_vec());
    let image_header_box = match decode_box(&mut reader).unwrap() {
        Jp2Box::ImageHeader(image_header_box) => image_header_box,
        other => panic!("unexpected box {:?}", other),
    };
    assert_eq!(reader.position(), 22);
    assert_eq!(image_header_box.width(), 1024);
    assert_eq!(image_header_box.height(), 768);
    assert_eq!(image_header_box.components_num(), 3);
    assert_eq!(image_header_box.bit_depth(), 8);
    assert_eq!(image_header_box.colourspace_unknown(), 0);
    assert_eq!(image_header_box.intellectual_property(), 0);
    assert_eq!(
        image_header_box,
        ImageHeaderBox::new(1024, 768, 3, 8, false, false)
    );
}

#[test]
fn test_length_is_independent_of_field_values() {
    let smallest = ImageHeaderBox::new(0, 0, 0, 0, false, false);
    let largest = ImageHeaderBox::new(u32::MAX, u32::MAX, u16::MAX, u8::MAX, true, true);
    assert_eq!(smallest.length(), 22);
    assert_eq!(largest.length(), 22);

    let mut encoded = Vec::new();
    largest.encode(&mut encoded).unwrap();
    assert_eq!(encoded.len(), 22);
    assert_eq!(&encoded[18..], &[0xFF, 0x07, 0x01, 0x01]);
}

#[test]
fn test_image_header_adds_its_length_to_header_box() {
    let mut header_box = HeaderSuperBox::new();
    header_box
        .add(ImageHeaderBox::new(1024, 768, 3, 8, false, false))
        .unwrap();
    assert_eq!(header_box.length(), 30);
    assert_eq!(header_box.children()[0].kind(), BoxKind::ImageHeader);
}

#[test]
fn test_decode_truncated_image_header() {
    // LBox claims 22 bytes but the stream ends inside the payload.
    let mut reader = Cursor::new(IMAGE_HEADER_1024_768[..15].to_vec());
    let result = decode_box(&mut reader);
    assert!(matches!(result, Err(JP2Error::BoxMalformed { .. })));
}

#[test]
fn test_decode_short_image_header() {
    // A well-formed 20 byte box is still too short for an Image Header box.
    let mut input = IMAGE_HEADER_1024_768[..20].to_vec();
    input[3] = 0x14;
    let result = decode_box(&mut Cursor::new(input));
    assert!(matches!(result, Err(JP2Error::BoxMalformed { .. })));
}

#[test]
fn test_image_header_round_trip() {
    let cases = [
        (u32::MAX, u32::MAX, u16::MAX, 0xFF, true, true),
        (1, 1, 1, 0x80, false, true),
        (480, 640, 4, 0x8F, true, false),
        (2048, 1536, 3, 0xA5, false, false),
        (0, 0, 0, 0x00, false, false),
    ];

    for (width, height, components_num, components_bits, unknown_colourspace, ipr) in cases {
        let image_header_box = ImageHeaderBox::new(
            width,
            height,
            components_num,
            components_bits,
            unknown_colourspace,
            ipr,
        );
        let mut encoded = Vec::new();
        image_header_box.encode(&mut encoded).unwrap();
        assert_eq!(encoded.len(), 22);

        let mut reader = Cursor::new(encoded);
        let decoded = match decode_box(&mut reader).unwrap() {
            Jp2Box::ImageHeader(decoded) => decoded,
            other => panic!("unexpected box {:?}", other),
        };
        assert_eq!(reader.position(), 22);
        assert_eq!(decoded.length(), 22);
        assert_eq!(decoded.height(), height);
        assert_eq!(decoded.width(), width);
        assert_eq!(decoded.components_num(), components_num);
        assert_eq!(decoded.bit_depth(), components_bits);
        assert_eq!(decoded.colourspace_unknown(), u8::from(unknown_colourspace));
        assert_eq!(decoded.intellectual_property(), u8::from(ipr));
        assert_eq!(decoded, image_header_box);
    }
}
