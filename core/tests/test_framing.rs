// Wire framing: encode layout, incremental decode under fragmentation,
// delimiter handling and size limits.

#[cfg(test)]
mod tests {
    use netkit_core::constants::{DEFAULT_DELIMITER, LENGTH_PREFIX_LEN};
    use netkit_core::framing::{encode_frame, find_subsequence, FrameDecoder, FrameError, FramingMode};
    use proptest::prelude::*;

    const MAX: usize = 1024 * 1024;

    // ✅ 1. Length-prefixed layout is big-endian length + body
    #[test]
    fn length_prefixed_layout() {
        let wire = encode_frame(&FramingMode::LengthPrefixed, b"abc", MAX).unwrap();
        assert_eq!(wire, [0, 0, 0, 3, b'a', b'b', b'c']);
    }

    // ✅ 2. Delimited layout is body + delimiter
    #[test]
    fn delimited_layout() {
        let wire = encode_frame(&FramingMode::legacy(), b"abc", MAX).unwrap();
        assert_eq!(&wire[..3], b"abc");
        assert_eq!(&wire[3..], DEFAULT_DELIMITER);
    }

    // ✅ 3. Remainder after a frame stays buffered
    #[test]
    fn remainder_is_retained() {
        let mut dec = FrameDecoder::new(FramingMode::LengthPrefixed, MAX);
        let mut wire = encode_frame(&FramingMode::LengthPrefixed, b"first", MAX).unwrap();
        wire.extend(encode_frame(&FramingMode::LengthPrefixed, b"second", MAX).unwrap());
        wire.extend_from_slice(&[0, 0]); // start of a third header

        dec.extend(&wire);
        let (a, a_len) = dec.next_frame().unwrap().unwrap();
        let (b, _) = dec.next_frame().unwrap().unwrap();
        assert_eq!(&a[..], b"first");
        assert_eq!(a_len, LENGTH_PREFIX_LEN + 5);
        assert_eq!(&b[..], b"second");
        assert!(dec.next_frame().unwrap().is_none());
        assert_eq!(dec.buffered(), 2);
    }

    // ✅ 4. Delimiter split across reads is still found
    #[test]
    fn delimiter_straddling_reads() {
        let mode = FramingMode::Delimited(b"<END>".to_vec());
        let mut dec = FrameDecoder::new(mode, MAX);

        dec.extend(b"payload<E");
        assert!(dec.next_frame().unwrap().is_none());
        dec.extend(b"N");
        assert!(dec.next_frame().unwrap().is_none());
        dec.extend(b"D>next");

        let (body, wire_len) = dec.next_frame().unwrap().unwrap();
        assert_eq!(&body[..], b"payload");
        assert_eq!(wire_len, 7 + 5);
        assert_eq!(dec.buffered(), 4);
    }

    // ✅ 5. Empty body in delimited mode
    #[test]
    fn empty_delimited_frame() {
        let mut dec = FrameDecoder::new(FramingMode::Delimited(b"|".to_vec()), MAX);
        dec.extend(b"|x|");
        assert!(dec.next_frame().unwrap().unwrap().0.is_empty());
        assert_eq!(&dec.next_frame().unwrap().unwrap().0[..], b"x");
    }

    // ❌ 6. Oversized frames are rejected on both sides
    #[test]
    fn oversized_frames_are_rejected() {
        assert_eq!(
            encode_frame(&FramingMode::LengthPrefixed, &[0u8; 11], 10),
            Err(FrameError::TooLarge { len: 11, max: 10 })
        );

        let mut dec = FrameDecoder::new(FramingMode::LengthPrefixed, 10);
        dec.extend(&[0, 0, 1, 0]);
        assert_eq!(dec.next_frame(), Err(FrameError::TooLarge { len: 256, max: 10 }));
    }

    // ❌ 7. Body containing the delimiter is refused at encode time
    #[test]
    fn delimiter_collision_is_refused() {
        let mode = FramingMode::Delimited(b"<END>".to_vec());
        assert_eq!(
            encode_frame(&mode, b"ab<END>cd", MAX),
            Err(FrameError::DelimiterCollision { offset: 2 })
        );
    }

    // ❌ 8. Empty delimiter is a configuration error
    #[test]
    fn empty_delimiter_is_invalid() {
        let mode = FramingMode::Delimited(Vec::new());
        assert_eq!(mode.validate(), Err(FrameError::EmptyDelimiter));
        assert_eq!(encode_frame(&mode, b"x", MAX), Err(FrameError::EmptyDelimiter));
    }

    #[test]
    fn subsequence_search() {
        assert_eq!(find_subsequence(b"abcabc", b"ca", 0), Some(2));
        assert_eq!(find_subsequence(b"abcabc", b"abc", 1), Some(3));
        assert_eq!(find_subsequence(b"abc", b"abcd", 0), None);
        assert_eq!(find_subsequence(b"abc", b"", 0), None);
        assert_eq!(find_subsequence(b"abc", b"c", 9), None);
    }

    fn modes() -> impl Strategy<Value = FramingMode> {
        prop_oneof![
            Just(FramingMode::LengthPrefixed),
            Just(FramingMode::Delimited(b"<end_of_bytes>".to_vec())),
        ]
    }

    proptest! {
        // Frames survive arbitrary fragmentation of the byte stream.
        #[test]
        fn prop_fragmentation_preserves_frames(
            mode in modes(),
            bodies in proptest::collection::vec(proptest::collection::vec(0u8..=0x3b, 0..64), 1..8),
            cut in 1usize..17,
        ) {
            // Bytes <= 0x3b never contain '<', so no delimiter collisions.
            let mut wire = Vec::new();
            for b in &bodies {
                wire.extend(encode_frame(&mode, b, MAX).unwrap());
            }

            let mut dec = FrameDecoder::new(mode, MAX);
            let mut out = Vec::new();
            for piece in wire.chunks(cut) {
                dec.extend(piece);
                while let Some((body, _)) = dec.next_frame().unwrap() {
                    out.push(body.to_vec());
                }
            }
            prop_assert_eq!(out, bodies);
            prop_assert!(dec.is_empty());
        }
    }
}
