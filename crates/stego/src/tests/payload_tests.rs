use super::*;

fn feed(decoder: &mut PayloadDecoder, bits: &[bool]) -> Option<String> {
    let mut found = None;
    for &bit in bits {
        if let Some(message) = decoder.push_bit(bit) {
            found = Some(message);
            break;
        }
    }
    found
}

#[test]
fn encodes_msb_first_with_delimiter() {
    let bits = encode_bits("A");
    assert_eq!(bits.len(), payload_bits("A"));
    // 'A' = 0x41 = 0100_0001
    assert_eq!(
        &bits[..8],
        &[false, true, false, false, false, false, false, true]
    );
    // first delimiter byte '#' = 0x23 = 0010_0011
    assert_eq!(
        &bits[8..16],
        &[false, false, true, false, false, false, true, true]
    );
}

#[test]
fn decoder_stops_at_delimiter() {
    let mut bits = encode_bits("hello");
    bits.extend(encode_bits("ignored"));
    let mut decoder = PayloadDecoder::new();
    assert_eq!(feed(&mut decoder, &bits).as_deref(), Some("hello"));
    assert_eq!(decoder.bits_read(), payload_bits("hello"));
}

#[test]
fn decoder_skips_non_printable_bytes() {
    let mut bits: Vec<bool> = (0..8).map(|_| false).collect();
    bits.extend(encode_bits("ok"));
    let mut decoder = PayloadDecoder::new();
    assert_eq!(feed(&mut decoder, &bits).as_deref(), Some("ok"));
}

#[test]
fn empty_message_yields_empty_string_on_delimiter() {
    let mut decoder = PayloadDecoder::new();
    assert_eq!(feed(&mut decoder, &encode_bits("")).as_deref(), Some(""));
}

#[test]
fn unterminated_stream_keeps_partial_text() {
    let bits = encode_bits("partial");
    let truncated = &bits[..7 * 8];
    let mut decoder = PayloadDecoder::new();
    assert_eq!(feed(&mut decoder, truncated), None);
    assert_eq!(decoder.into_text(), "partial");
}

#[test]
fn printable_range_matches_ascii_graphic_and_space() {
    assert!(is_printable(b' '));
    assert!(is_printable(b'~'));
    assert!(!is_printable(b'\n'));
    assert!(!is_printable(0x7f));
}
