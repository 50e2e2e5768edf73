//! CR LF frame codec for the TCP side of the bridge.
//!
//! Wire format:
//! ```text
//! [payload bytes][0x0D 0x0A] [payload bytes][0x0D 0x0A] ...
//! ```
//!
//! A frame is the run of bytes between two delimiters. Frames carry no
//! length prefix, sequence number, or identity – ordering is implicit in
//! stream order. Empty frames (back-to-back delimiters) are legal and are
//! preserved by the decoder.
//!
//! # Known limitations
//!
//! The delimiter is never escaped: a payload that itself contains CR LF is
//! mis-framed on the wire. There is also no maximum frame size, so a stream
//! that never contains a delimiter grows the decode buffer without bound.
//! Both behaviours are inherited from the wire protocol and kept as-is.

/// The two-byte frame delimiter on the TCP side.
pub const DELIMITER: &[u8] = b"\r\n";

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes one frame for the wire: the payload followed by the delimiter.
///
/// # Examples
///
/// ```rust
/// use bridge_core::framing::encode_frame;
///
/// assert_eq!(encode_frame(b"Hello"), b"Hello\r\n");
/// ```
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + DELIMITER.len());
    buf.extend_from_slice(payload);
    buf.extend_from_slice(DELIMITER);
    buf
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Splits `buffer` greedily on every delimiter occurrence, left to right.
///
/// Returns the complete frames (delimiters stripped) and the remaining
/// partial tail after the last delimiter. The tail must be retained by the
/// caller and prepended to the next read; [`FrameDecoder`] does exactly that.
///
/// # Examples
///
/// ```rust
/// use bridge_core::framing::decode_frames;
///
/// let (frames, rest) = decode_frames(b"A\r\nB\r\npartial");
/// assert_eq!(frames, vec![b"A".as_slice(), b"B".as_slice()]);
/// assert_eq!(rest, b"partial");
/// ```
pub fn decode_frames(buffer: &[u8]) -> (Vec<&[u8]>, &[u8]) {
    let mut frames = Vec::new();
    let mut rest = buffer;
    while let Some(pos) = find_delimiter(rest) {
        frames.push(&rest[..pos]);
        rest = &rest[pos + DELIMITER.len()..];
    }
    (frames, rest)
}

/// Returns the index of the first delimiter in `buf`, if any.
fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.windows(DELIMITER.len()).position(|w| w == DELIMITER)
}

// ── Streaming decoder ─────────────────────────────────────────────────────────

/// Stateful decoder that accumulates bytes across reads.
///
/// TCP is a stream protocol: a single read may deliver a fraction of a frame
/// or several frames at once, and a delimiter may be split across two reads.
/// `FrameDecoder` buffers everything it has seen and hands back complete
/// frames as soon as they materialise.
///
/// # Examples
///
/// ```rust
/// use bridge_core::framing::FrameDecoder;
///
/// let mut decoder = FrameDecoder::new();
/// assert!(decoder.feed(b"Hel").is_empty());
/// assert_eq!(decoder.feed(b"lo\r\n"), vec![b"Hello".to_vec()]);
/// assert!(decoder.pending().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes received but not yet emitted as part of a complete frame.
    buffer: Vec<u8>,
}

impl FrameDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates an empty decoder with a pre-allocated buffer.
    ///
    /// `capacity` is typically the read buffer size of the transport feeding
    /// the decoder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Appends `bytes` and returns every frame completed by them.
    ///
    /// Zero or more frames may be returned per call; any bytes after the last
    /// delimiter are retained for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(bytes);
        let (borrowed, rest) = decode_frames(&self.buffer);
        let frames: Vec<Vec<u8>> = borrowed.into_iter().map(<[u8]>::to_vec).collect();
        let consumed = self.buffer.len() - rest.len();
        self.buffer.drain(..consumed);
        frames
    }

    /// The retained partial frame, if any.
    ///
    /// At stream end this is an incomplete frame: it is never forwarded, only
    /// discarded with the decoder.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_appends_crlf() {
        assert_eq!(encode_frame(b"Hello"), b"Hello\r\n");
    }

    #[test]
    fn test_encode_empty_payload_is_bare_delimiter() {
        assert_eq!(encode_frame(b""), b"\r\n");
    }

    #[test]
    fn test_roundtrip_yields_payload_with_empty_remainder() {
        let wire = encode_frame(b"payload");
        let (frames, rest) = decode_frames(&wire);
        assert_eq!(frames, vec![b"payload".as_slice()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_decode_without_delimiter_retains_everything() {
        let (frames, rest) = decode_frames(b"no delimiter here");
        assert!(frames.is_empty());
        assert_eq!(rest, b"no delimiter here");
    }

    #[test]
    fn test_decode_splits_greedily_left_to_right() {
        let (frames, rest) = decode_frames(b"A\r\nB\r\nC\r\n");
        assert_eq!(
            frames,
            vec![b"A".as_slice(), b"B".as_slice(), b"C".as_slice()]
        );
        assert!(rest.is_empty());
    }

    #[test]
    fn test_decode_preserves_empty_frames() {
        // Back-to-back delimiters produce empty frames, not nothing.
        let (frames, rest) = decode_frames(b"\r\n\r\nx");
        assert_eq!(frames, vec![b"".as_slice(), b"".as_slice()]);
        assert_eq!(rest, b"x");
    }

    #[test]
    fn test_decode_lone_cr_is_not_a_delimiter() {
        let (frames, rest) = decode_frames(b"A\rB");
        assert!(frames.is_empty());
        assert_eq!(rest, b"A\rB");
    }

    #[test]
    fn test_decode_lone_lf_is_not_a_delimiter() {
        let (frames, rest) = decode_frames(b"A\nB");
        assert!(frames.is_empty());
        assert_eq!(rest, b"A\nB");
    }

    #[test]
    fn test_decoder_retains_partial_then_completes() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"partial").is_empty());
        assert_eq!(decoder.pending(), b"partial");

        // Feeding the missing delimiter yields exactly the concatenation.
        let frames = decoder.feed(b" frame\r\n");
        assert_eq!(frames, vec![b"partial frame".to_vec()]);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_decoder_handles_delimiter_split_across_feeds() {
        // CR at the end of one read, LF at the start of the next.
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"abc\r").is_empty());
        assert_eq!(decoder.pending(), b"abc\r");
        assert_eq!(decoder.feed(b"\ndef"), vec![b"abc".to_vec()]);
        assert_eq!(decoder.pending(), b"def");
    }

    #[test]
    fn test_decoder_emits_multiple_frames_per_feed() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"one\r\ntwo\r\nthr");
        assert_eq!(frames, vec![b"one".to_vec(), b"two".to_vec()]);
        assert_eq!(decoder.pending(), b"thr");
    }

    #[test]
    fn test_decoder_single_byte_feeds() {
        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for &b in b"ab\r\ncd\r\n" {
            frames.extend(decoder.feed(&[b]));
        }
        assert_eq!(frames, vec![b"ab".to_vec(), b"cd".to_vec()]);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_decoder_binary_payload_passes_through() {
        let mut decoder = FrameDecoder::new();
        let payload = [0x00, 0xFF, 0x0D, 0x00, 0x0A, 0x7F];
        let frames = decoder.feed(&encode_frame(&payload));
        assert_eq!(frames, vec![payload.to_vec()]);
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let decoder = FrameDecoder::with_capacity(4096);
        assert!(decoder.pending().is_empty());
    }
}
