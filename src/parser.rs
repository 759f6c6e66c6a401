use crate::{
    checksum::XorDigest, util::BytesReader, Error, Message, RawFrame, HEADER_LEN, SYNC_1, SYNC_2,
};

/// State machine for reading an MSP frame.
///
/// +------------+   +------------+   +----------------+   +-------------+
/// | AwaitSync1 |-->| AwaitSync2 |-->| AwaitDirection |-->| AwaitLength |
/// +------------+   +------------+   +----------------+   +-------------+
///       ^ ^              |                                      |
///       | +--------------+                                      v
///       |  +---------------+    +--------------+    +---------+
///       +--| AwaitChecksum |<---| AwaitPayload |<---| AwaitId |
///          +---------------+    +--------------+    +---------+
///                 ^                                      |
///                 +--------------------------------------+
///                          (zero-length payload)
///
enum State {
    AwaitSync1,
    AwaitSync2,
    AwaitDirection,
    AwaitLength,
    AwaitId,
    AwaitPayload,
    AwaitChecksum,
}

/// Struct for parsing MSP frames out of an arbitrarily chunked byte stream.
pub struct Parser {
    state: State,
    raw: RawFrame,
    digest: XorDigest,
}

impl Parser {
    /// Creates a new `Parser` struct.
    pub const fn new() -> Self {
        Self {
            state: State::AwaitSync1,
            raw: RawFrame::empty(),
            digest: XorDigest::new(),
        }
    }

    /// Resets the parser's state.
    ///
    /// Never needed between frames; useful after a stream (re)connection in
    /// case a partial frame was in flight.
    pub fn reset(&mut self) {
        self.state = State::AwaitSync1;
        self.raw.len = 0; // Soft-reset the buffer
        self.digest.reset();
    }

    /// Consumes a byte and returns a decoded message if this byte closed a
    /// checksum-valid frame.
    pub fn push_byte(&mut self, byte: u8) -> Option<Result<Message, Error>> {
        self.push_byte_raw(byte).map(|res| res.and_then(Message::parse))
    }

    /// Consumes a byte and returns a raw (not decoded) frame if this byte
    /// closed a checksum-valid frame.
    pub fn push_byte_raw(&mut self, byte: u8) -> Option<Result<&RawFrame, Error>> {
        match self.state {
            State::AwaitSync1 => {
                // Noise is discarded here until the sync pair lines up again.
                if byte == SYNC_1 {
                    self.raw.buf[0] = byte;
                    self.state = State::AwaitSync2;
                }
            }
            State::AwaitSync2 => {
                if byte == SYNC_2 {
                    self.raw.buf[1] = byte;
                    self.state = State::AwaitDirection;
                } else {
                    // The failing byte is consumed outright, not retried as a
                    // first sync byte: "$$M" does not open a frame.
                    self.state = State::AwaitSync1;
                }
            }
            State::AwaitDirection => {
                // '<' or '>' on a healthy link, but never validated.
                self.raw.buf[2] = byte;
                self.state = State::AwaitLength;
            }
            State::AwaitLength => {
                self.raw.buf[3] = byte;
                self.digest.reset();
                self.digest.push(byte);
                self.state = State::AwaitId;
            }
            State::AwaitId => {
                self.raw.buf[4] = byte;
                self.digest.push(byte);
                self.raw.len = HEADER_LEN;
                self.state = if self.raw.buf[3] > 0 {
                    State::AwaitPayload
                } else {
                    State::AwaitChecksum
                };
            }
            State::AwaitPayload => {
                self.raw.buf[self.raw.len] = byte;
                self.raw.len += 1;
                self.digest.push(byte);
                if self.raw.len - HEADER_LEN == self.raw.buf[3] as usize {
                    self.state = State::AwaitChecksum;
                }
            }
            State::AwaitChecksum => {
                // Frame boundary either way.
                self.state = State::AwaitSync1;

                self.raw.buf[self.raw.len] = byte;
                self.raw.len += 1;

                let actual = self.digest.get_checksum();
                return if byte == actual {
                    Some(Ok(&self.raw))
                } else {
                    Some(Err(Error::ChecksumMismatch {
                        expected: byte,
                        actual,
                    }))
                };
            }
        }

        None
    }

    /// Consumes a slice of bytes and returns a decoded message if one is
    /// completed within it, along with the unconsumed remainder of the slice.
    /// It's optimized for reading multiple bytes at a time.
    pub fn push_bytes<'b>(&mut self, data: &'b [u8]) -> Option<(Result<Message, Error>, &'b [u8])> {
        self.push_bytes_raw(data)
            .map(|(res, remaining)| (res.and_then(Message::parse), remaining))
    }

    /// Consumes a slice of bytes and returns a raw (not decoded) frame if one
    /// is completed within it, along with the unconsumed remainder of the
    /// slice. It's optimized for reading multiple bytes at a time.
    pub fn push_bytes_raw<'a, 'b>(
        &'a mut self,
        data: &'b [u8],
    ) -> Option<(Result<&'a RawFrame, Error>, &'b [u8])> {
        let mut reader = BytesReader::new(data);

        loop {
            match self.state {
                State::AwaitSync1 => {
                    while let Some(byte) = reader.next() {
                        if byte == SYNC_1 {
                            self.raw.buf[0] = byte;
                            self.state = State::AwaitSync2;
                            break;
                        }
                    }

                    if reader.is_empty() {
                        return None;
                    }
                }
                State::AwaitSync2 => {
                    let byte = reader.next()?;
                    if byte == SYNC_2 {
                        self.raw.buf[1] = byte;
                        self.state = State::AwaitDirection;
                    } else {
                        self.state = State::AwaitSync1;
                    }
                }
                State::AwaitDirection => {
                    self.raw.buf[2] = reader.next()?;
                    self.state = State::AwaitLength;
                }
                State::AwaitLength => {
                    let byte = reader.next()?;
                    self.raw.buf[3] = byte;
                    self.digest.reset();
                    self.digest.push(byte);
                    self.state = State::AwaitId;
                }
                State::AwaitId => {
                    let byte = reader.next()?;
                    self.raw.buf[4] = byte;
                    self.digest.push(byte);
                    self.raw.len = HEADER_LEN;
                    self.state = if self.raw.buf[3] > 0 {
                        State::AwaitPayload
                    } else {
                        State::AwaitChecksum
                    };
                }
                State::AwaitPayload => {
                    if reader.is_empty() {
                        return None;
                    }

                    let final_len = HEADER_LEN + self.raw.buf[3] as usize;
                    let chunk = reader.next_n(final_len - self.raw.len);
                    self.raw.buf[self.raw.len..self.raw.len + chunk.len()].copy_from_slice(chunk);
                    self.raw.len += chunk.len();
                    self.digest.compute(chunk);

                    if self.raw.len == final_len {
                        self.state = State::AwaitChecksum;
                    }
                }
                State::AwaitChecksum => {
                    let byte = reader.next()?;
                    self.state = State::AwaitSync1;

                    self.raw.buf[self.raw.len] = byte;
                    self.raw.len += 1;

                    let actual = self.digest.get_checksum();
                    return if byte == actual {
                        Some((Ok(&self.raw), reader.remaining()))
                    } else {
                        Some((
                            Err(Error::ChecksumMismatch {
                                expected: byte,
                                actual,
                            }),
                            reader.remaining(),
                        ))
                    };
                }
            }
        }
    }

    /// Returns an iterator over all the messages in the provided buffer.
    pub fn iter_messages<'a, 'b>(&'a mut self, data: &'b [u8]) -> MessageIterator<'a, 'b> {
        MessageIterator {
            parser: self,
            remaining_data: data,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator for messages in a given buffer. This struct is created by the
/// `iter_messages` method of a `Parser`.
pub struct MessageIterator<'a, 'b> {
    parser: &'a mut Parser,
    remaining_data: &'b [u8],
}

impl Iterator for MessageIterator<'_, '_> {
    type Item = Result<Message, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((result, remaining_data)) = self.parser.push_bytes(self.remaining_data) {
            self.remaining_data = remaining_data;
            Some(result)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        AttitudeRadians, Direction, Error, Message, MessageType, Parser, PayloadDump, RawFrame,
        Receiver,
    };

    #[rustfmt::skip]
    const ATTITUDE_FRAME: [u8; 18] = [
        // Sync
        0x24, 0x4D,
        // Direction
        0x3C,
        // Length
        12,
        // Id
        122,
        // Payload: (0.0, 1.5, -1.5) little-endian
        0, 0, 0, 0, 0, 0, 0xC0, 0x3F, 0, 0, 0xC0, 0xBF,
        // Checksum
        0xF6,
    ];

    const ATTITUDE: AttitudeRadians = AttitudeRadians {
        roll: 0.0,
        pitch: 1.5,
        yaw: -1.5,
    };

    fn receiver_zero_frame() -> [u8; 30] {
        let mut frame = [0u8; 30];
        frame[..5].copy_from_slice(&[0x24, 0x4D, 0x3C, 24, 121]);
        frame[29] = 97; // 24 ^ 121
        frame
    }

    #[test]
    fn test_parser_push_byte() {
        let mut parser = Parser::new();
        let frame = receiver_zero_frame();

        for _ in 0..2 {
            // Garbage
            assert!(matches!(parser.push_byte(0x39), None));
            assert!(matches!(parser.push_byte(0x21), None));
            assert!(matches!(parser.push_byte(0x89), None));

            // Everything up to the checksum leaves the frame open
            for &byte in &frame[..29] {
                assert!(matches!(parser.push_byte(byte), None));
            }

            // Checksum
            let result = parser.push_byte(frame[29]).expect("result expected");
            let message = result.expect("message expected");

            match message {
                Message::Receiver(rc) => {
                    assert_eq!(rc.c1, 0.0);
                    assert_eq!(rc.c6, 0.0);
                }
                _ => panic!("unexpected message type"),
            }
        }
    }

    #[test]
    fn test_parser_push_byte_raw() {
        let mut parser = Parser::new();

        for _ in 0..2 {
            for &byte in &ATTITUDE_FRAME[..17] {
                assert!(matches!(parser.push_byte_raw(byte), None));
            }

            let result = parser.push_byte_raw(ATTITUDE_FRAME[17]).expect("result expected");
            let raw = result.expect("raw frame expected");

            assert_eq!(raw.as_slice(), ATTITUDE_FRAME.as_slice());
            assert_eq!(raw.message_id(), 122);
            assert_eq!(raw.direction(), 0x3C);
            assert_eq!(raw.payload().expect("payload expected"), &ATTITUDE_FRAME[5..17]);
        }
    }

    #[test]
    fn test_parser_push_bytes() {
        let mut parser = Parser::new();

        // Garbage, including a '$' followed by a non-'M' byte
        assert!(matches!(parser.push_bytes(&[0x13, 0x24, 0x10, 0x4D]), None));

        // Header
        assert!(matches!(parser.push_bytes(&ATTITUDE_FRAME[..5]), None));
        // Payload
        assert!(matches!(parser.push_bytes(&ATTITUDE_FRAME[5..17]), None));

        // Checksum
        let (result, remaining) = parser.push_bytes(&ATTITUDE_FRAME[17..]).expect("result expected");
        assert!(remaining.is_empty());
        assert_eq!(result.expect("message expected"), Message::AttitudeRadians(ATTITUDE));
    }

    #[test]
    fn test_chunking_invariance() {
        for split in 0..=ATTITUDE_FRAME.len() {
            let mut parser = Parser::new();
            let mut decoded = None;
            let mut count = 0;

            for chunk in [&ATTITUDE_FRAME[..split], &ATTITUDE_FRAME[split..]] {
                for result in parser.iter_messages(chunk) {
                    decoded = Some(result.expect("frame should decode"));
                    count += 1;
                }
            }

            assert_eq!(count, 1, "split at {split} must yield exactly one message");
            assert_eq!(decoded, Some(Message::AttitudeRadians(ATTITUDE)));
        }
    }

    #[test]
    fn test_zero_payload_frame() {
        let mut parser = Parser::new();
        let request = RawFrame::request(MessageType::Receiver);

        let mut result = None;
        for &byte in request.as_slice() {
            if let Some(res) = parser.push_byte_raw(byte) {
                result = Some(res.map(|raw| (raw.message_id(), raw.payload().unwrap().len())));
            }
        }

        // The payload state is skipped entirely; the frame closes on its
        // sixth byte.
        assert_eq!(result, Some(Ok((121, 0))));
    }

    #[test]
    fn test_dollar_dollar_m_restarts() {
        let mut parser = Parser::new();

        // The second '$' fails the 'M' check and is consumed outright, and
        // the 'M' after it lands back in the initial state as plain noise,
        // so this frame is lost.
        for &byte in &[0x24, 0x24, 0x4D, 0x3E, 0x00, 0x7A, 0x7A] {
            assert!(matches!(parser.push_byte_raw(byte), None));
        }

        // A clean frame afterwards parses normally.
        let request = RawFrame::request(MessageType::AttitudeRadians);
        let mut closed = false;
        for &byte in request.as_slice() {
            if let Some(res) = parser.push_byte_raw(byte) {
                assert!(res.is_ok());
                closed = true;
            }
        }
        assert!(closed);
    }

    #[test]
    fn test_checksum_mismatch_then_recover() {
        let mut parser = Parser::new();

        let mut corrupted = ATTITUDE_FRAME;
        corrupted[17] = 0x42;

        let (result, _) = parser.push_bytes(&corrupted).expect("result expected");
        assert_eq!(
            result,
            Err(Error::ChecksumMismatch {
                expected: 0x42,
                actual: 0xF6
            })
        );

        // The mismatch is a frame boundary; the next frame decodes normally.
        let (result, _) = parser.push_bytes(&ATTITUDE_FRAME).expect("result expected");
        assert_eq!(result.expect("message expected"), Message::AttitudeRadians(ATTITUDE));
    }

    #[test]
    fn test_single_bit_flip_drops_frame() {
        // Length, id, payload and checksum bytes; sync and direction are not
        // covered by the checksum.
        for idx in 3..ATTITUDE_FRAME.len() {
            for bit in 0..8 {
                let mut corrupted = ATTITUDE_FRAME;
                corrupted[idx] ^= 1 << bit;

                let mut parser = Parser::new();
                let mut decoded = 0;
                for &byte in &corrupted {
                    if let Some(Ok(_)) = parser.push_byte(byte) {
                        decoded += 1;
                    }
                }

                assert_eq!(decoded, 0, "flip of bit {bit} at offset {idx} must not decode");
            }
        }
    }

    #[test]
    fn test_unknown_id_diagnostic() {
        let mut parser = Parser::new();
        let frame = RawFrame::from_parts(Direction::Response, 99, &[1, 2]).unwrap();

        let (result, _) = parser.push_bytes(frame.as_slice()).expect("result expected");
        assert_eq!(result, Err(Error::UnknownId { id: 99 }));

        // The raw layer still hands the frame out.
        let (result, _) = parser.push_bytes_raw(frame.as_slice()).expect("result expected");
        assert_eq!(result.expect("raw frame expected").as_slice(), frame.as_slice());
    }

    #[test]
    fn test_parser_iter_messages() {
        let receiver = Receiver {
            c1: 1090.0,
            c2: -0.25,
            c3: 0.5,
            c4: 1.0,
            c5: 0.0,
            c6: 2000.0,
        };
        let first = receiver.to_raw_frame(Direction::Response).unwrap();
        let second = ATTITUDE.to_raw_frame(Direction::Response).unwrap();

        let mut data = [0u8; 48];
        data[..30].copy_from_slice(first.as_slice());
        data[30..].copy_from_slice(second.as_slice());

        let mut parser = Parser::new();
        let mut iter = parser.iter_messages(data.as_slice());
        assert_eq!(iter.next(), Some(Ok(Message::Receiver(receiver))));
        assert_eq!(iter.next(), Some(Ok(Message::AttitudeRadians(ATTITUDE))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_reset_mid_frame() {
        let mut parser = Parser::new();

        // Park the parser inside a payload, then simulate a reconnection.
        assert!(matches!(parser.push_bytes(&ATTITUDE_FRAME[..9]), None));
        parser.reset();

        let (result, _) = parser.push_bytes(&ATTITUDE_FRAME).expect("result expected");
        assert_eq!(result.expect("message expected"), Message::AttitudeRadians(ATTITUDE));
    }
}
