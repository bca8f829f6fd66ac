//! Cross-cutting properties from §8: round-trip, size fidelity, classifier
//! coverage, and the literal worked examples.

use bytes::Bytes;
use qframe::frame::io::serialize;
use qframe::frame::{classify, factory, EncodeFrame, Frame, FrameType, GetFrameType};
use qframe::VarInt;

#[test]
fn stream_worked_example() {
    let frame = factory::create_stream_frame(
        Bytes::from_static(b"Hi"),
        VarInt::from_u32(4),
        VarInt::from_u32(0),
        false,
        true,
    );
    let mut buf = vec![0u8; frame.encoding_size()];
    let n = serialize(&frame, &mut buf).unwrap();
    assert_eq!(&buf[..n], &[0x11, 0x04, 0x48, 0x69]);

    let Frame::Stream(stream) = factory::create(Bytes::from(buf)).unwrap() else {
        panic!("expected a STREAM frame");
    };
    assert_eq!(stream.stream_id().unwrap().into_inner(), 4);
    assert_eq!(stream.offset().unwrap().into_inner(), 0);
    assert!(stream.fin().unwrap());
    assert_eq!(stream.data().unwrap(), Bytes::from_static(b"Hi"));
}

#[test]
fn padding_and_ping_worked_examples() {
    let padding = factory::create(Bytes::from_static(&[0x00])).unwrap();
    assert_eq!(padding.frame_type(), FrameType::Padding);
    assert_eq!(padding.encoding_size(), 1);

    let ping = factory::create(Bytes::from_static(&[0x07])).unwrap();
    assert_eq!(ping.frame_type(), FrameType::Ping);
    assert_eq!(ping.encoding_size(), 1);
}

#[test]
fn max_data_worked_example() {
    let frame = factory::create_max_data_frame(VarInt::new(1024).unwrap());
    let mut buf = vec![0u8; frame.encoding_size()];
    serialize(&frame, &mut buf).unwrap();
    assert_eq!(buf, [0x04, 0x44, 0x00]);

    let Frame::MaxData(max_data) = factory::create(Bytes::from(buf)).unwrap() else {
        panic!("expected a MAX_DATA frame");
    };
    assert_eq!(max_data.maximum().unwrap().into_inner(), 1024);
}

#[test]
fn rst_stream_worked_example() {
    let frame = factory::create_rst_stream_frame(VarInt::from_u32(1), 7, VarInt::from_u32(42));
    let mut buf = vec![0u8; frame.encoding_size()];
    serialize(&frame, &mut buf).unwrap();
    assert_eq!(buf, [0x01, 0x01, 0x00, 0x07, 0x2a]);

    let Frame::RstStream(rst) = factory::create(Bytes::from(buf)).unwrap() else {
        panic!("expected an RST_STREAM frame");
    };
    assert_eq!(
        (
            rst.stream_id().unwrap().into_inner(),
            rst.error_code().unwrap(),
            rst.final_offset().unwrap().into_inner()
        ),
        (1, 7, 42)
    );
}

#[test]
fn ack_worked_example() {
    let frame = factory::create_ack_frame(0x42, 0, 0x42);
    let mut buf = vec![0u8; frame.encoding_size()];
    let n = serialize(&frame, &mut buf).unwrap();
    assert_eq!(&buf[..n], &[0xa2, 0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x42]);

    let Frame::Ack(ack) = factory::create(Bytes::from(buf)).unwrap() else {
        panic!("expected an ACK frame");
    };
    assert_eq!(ack.largest_acknowledged().unwrap(), 0x42);
    assert_eq!(ack.ack_delay().unwrap(), 0);
    assert_eq!(ack.num_blocks().unwrap(), 0);
    assert_eq!(
        ack.ack_block_section().unwrap().first_ack_block_length().unwrap(),
        0x42
    );
}

#[test]
fn unknown_byte_yields_the_null_frame() {
    assert_eq!(classify(0xff), FrameType::Unknown);
    assert!(factory::create(Bytes::from_static(&[0xff])).is_none());
}

#[test]
fn truncated_stream_payload_is_reported() {
    // Length field claims 10 bytes of payload but only 5 are present.
    let raw = Bytes::from_static(&[0x12, 0x00, 0x0a, 1, 2, 3, 4, 5]);
    let Frame::Stream(stream) = factory::create(raw).unwrap() else {
        panic!("expected a STREAM frame");
    };
    assert!(stream.data().is_err());
}

#[test]
fn truncated_varint_in_max_data_is_reported() {
    // Claims a 4-byte varint (top bits 10) but only 2 bytes follow.
    let raw = Bytes::from_static(&[0x04, 0x80, 0x01]);
    let Frame::MaxData(max_data) = factory::create(raw).unwrap() else {
        panic!("expected a MAX_DATA frame");
    };
    assert!(max_data.maximum().is_err());
}

#[test]
fn classifier_is_total_over_every_byte() {
    for b in 0u16..=255 {
        let ty = classify(b as u8);
        match b as u8 {
            0x10..=0x17 | 0xa0..=0xbf => assert_ne!(ty, FrameType::Unknown),
            0x00..=0x0c => assert_ne!(ty, FrameType::Unknown),
            _ => assert_eq!(ty, FrameType::Unknown),
        }
    }
}

#[test]
fn fast_create_matches_create_across_a_mixed_sequence() {
    let mut factory_instance = factory::FrameFactory::new();
    let inputs = [
        Bytes::from_static(&[0x00]),
        Bytes::from_static(&[0x07]),
        Bytes::from_static(&[0x08, 0x05]),
        Bytes::from_static(&[0x0a, 0x11]),
        Bytes::from_static(&[0x01, 0x01, 0x00, 0x07, 0x2a]),
    ];
    for raw in inputs {
        let via_create = factory::create(raw.clone()).unwrap();
        let via_fast = factory_instance.fast_create(raw).unwrap().clone();
        assert_eq!(via_create, via_fast);
    }
}

#[test]
fn retransmission_preserves_type_and_bytes() {
    let original = factory::create_stop_sending_frame(VarInt::from_u32(9), 4);
    let mut frozen = vec![0u8; original.encoding_size()];
    serialize(&original, &mut frozen).unwrap();

    let wrapped = factory::create_retransmission_frame(
        &original,
        qframe::frame::PacketClass::Handshake,
    )
    .unwrap();
    assert_eq!(wrapped.frame_type(), FrameType::StopSending);
    assert_eq!(wrapped.encoding_size(), frozen.len());

    let mut rewritten = vec![0u8; wrapped.encoding_size()];
    serialize(&wrapped, &mut rewritten).unwrap();
    assert_eq!(rewritten, frozen);
}
