//! Property-based tests for control-frame encoding and streaming decode.
//!
//! Verifies the framing layer for ALL inputs, not just examples: encode and
//! decode are inverse, and the incremental decoder recovers the exact frame
//! sequence no matter how the byte stream is chunked.

use bytes::Bytes;
use proptest::prelude::*;
use shroud_proto::{ControlFrame, FrameDecoder, ROTATION_IV_SIZE};

/// Strategy for arbitrary frames (bounded payloads).
fn arbitrary_frame() -> impl Strategy<Value = ControlFrame> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..1024)
            .prop_map(|payload| ControlFrame::Data(Bytes::from(payload))),
        any::<[u8; ROTATION_IV_SIZE]>().prop_map(ControlFrame::Rotate),
    ]
}

#[test]
fn prop_frame_encode_decode_roundtrip() {
    proptest!(|(frame in arbitrary_frame())| {
        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("encode should succeed");

        let (decoded, consumed) = ControlFrame::decode(&wire).expect("decode should succeed");

        prop_assert_eq!(decoded, frame);
        prop_assert_eq!(consumed, wire.len());
    });
}

#[test]
fn prop_decoder_recovers_sequence_under_arbitrary_chunking() {
    proptest!(|(
        frames in prop::collection::vec(arbitrary_frame(), 1..6),
        chunk_sizes in prop::collection::vec(1usize..64, 1..32),
    )| {
        let mut wire = Vec::new();
        for frame in &frames {
            frame.encode(&mut wire).expect("encode should succeed");
        }

        // Deliver the stream in chunks of arbitrary, repeating sizes.
        let mut decoder = FrameDecoder::new();
        let mut recovered = Vec::new();
        let mut offset = 0;
        let mut chunks = chunk_sizes.iter().cycle();
        while offset < wire.len() {
            let take = (*chunks.next().expect("cycled iterator")).min(wire.len() - offset);
            decoder.extend(&wire[offset..offset + take]);
            offset += take;

            while let Some(frame) = decoder.poll().expect("stream is well-formed") {
                recovered.push(frame);
            }
        }

        prop_assert_eq!(recovered, frames);
        prop_assert_eq!(decoder.buffered(), 0);
    });
}

#[test]
fn prop_needed_never_overshoots_frame_boundary() {
    proptest!(|(frame in arbitrary_frame())| {
        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("encode should succeed");

        // Feeding exactly `needed()` bytes at a time must land precisely on
        // the frame boundary, never past it.
        let mut decoder = FrameDecoder::new();
        let mut offset = 0;
        loop {
            let needed = decoder.needed();
            if needed == 0 {
                break;
            }
            prop_assert!(offset + needed <= wire.len(), "needed() overshot the frame");
            decoder.extend(&wire[offset..offset + needed]);
            offset += needed;
        }

        prop_assert_eq!(offset, wire.len());
        prop_assert_eq!(decoder.poll().expect("well-formed"), Some(frame));
    });
}
