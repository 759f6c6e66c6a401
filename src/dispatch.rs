use crate::{AttitudeRadians, Message, Parser, RawFrame, Receiver};

/// Routes decoded messages to handlers registered per message id.
///
/// Handlers run only for frames that passed the checksum. Frames with an
/// unknown id or a payload that does not decode are dropped without a trace,
/// as are checksum failures fed through [`Dispatcher::feed`].
///
/// # Example
/// ```rust
/// use msp::{AttitudeRadians, Dispatcher, Parser};
///
/// let mut parser = Parser::new();
/// let mut latest = None;
/// let mut on_attitude = |attitude: AttitudeRadians| latest = Some(attitude);
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.on_attitude_radians(&mut on_attitude);
/// dispatcher.feed_bytes(&mut parser, &[
///     0x24, 0x4D, 0x3C, 12, 122,
///     0, 0, 0, 0, 0, 0, 0xC0, 0x3F, 0, 0, 0xC0, 0xBF,
///     0xF6,
/// ]);
///
/// assert_eq!(latest.map(|attitude| attitude.pitch), Some(1.5));
/// ```
pub struct Dispatcher<'a> {
    receiver: Option<&'a mut dyn FnMut(Receiver)>,
    attitude_radians: Option<&'a mut dyn FnMut(AttitudeRadians)>,
}

impl<'a> Dispatcher<'a> {
    /// Creates a `Dispatcher` with no handlers registered.
    pub const fn new() -> Self {
        Self {
            receiver: None,
            attitude_radians: None,
        }
    }

    /// Registers the handler for `Receiver` messages, replacing any previous
    /// one.
    pub fn on_receiver(&mut self, handler: &'a mut dyn FnMut(Receiver)) {
        self.receiver = Some(handler);
    }

    /// Registers the handler for `AttitudeRadians` messages, replacing any
    /// previous one.
    pub fn on_attitude_radians(&mut self, handler: &'a mut dyn FnMut(AttitudeRadians)) {
        self.attitude_radians = Some(handler);
    }

    /// Decodes a checksum-valid frame and invokes the matching handler.
    pub fn dispatch(&mut self, raw: &RawFrame) {
        match Message::parse(raw) {
            Ok(Message::Receiver(rc)) => {
                if let Some(handler) = self.receiver.as_mut() {
                    handler(rc);
                }
            }
            Ok(Message::AttitudeRadians(attitude)) => {
                if let Some(handler) = self.attitude_radians.as_mut() {
                    handler(attitude);
                }
            }
            Err(_) => {}
        }
    }

    /// Feeds one byte into `parser`, dispatching when it closes a valid frame.
    pub fn feed(&mut self, parser: &mut Parser, byte: u8) {
        if let Some(Ok(raw)) = parser.push_byte_raw(byte) {
            self.dispatch(raw);
        }
    }

    /// Feeds a chunk of bytes, dispatching every completed valid frame in it.
    pub fn feed_bytes(&mut self, parser: &mut Parser, data: &[u8]) {
        for &byte in data {
            self.feed(parser, byte);
        }
    }
}

impl Default for Dispatcher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{AttitudeRadians, Direction, Dispatcher, Parser, PayloadDump, RawFrame, Receiver};

    const ATTITUDE: AttitudeRadians = AttitudeRadians {
        roll: 0.0,
        pitch: 1.5,
        yaw: -1.5,
    };

    #[test]
    fn test_dispatch_known_vector() {
        let mut parser = Parser::new();
        let frame = ATTITUDE.to_raw_frame(Direction::Response).unwrap();

        let mut latest = None;
        let mut on_attitude = |attitude: AttitudeRadians| latest = Some(attitude);

        let mut dispatcher = Dispatcher::new();
        dispatcher.on_attitude_radians(&mut on_attitude);
        dispatcher.feed_bytes(&mut parser, frame.as_slice());

        assert_eq!(latest, Some(ATTITUDE));
    }

    #[test]
    fn test_unknown_id_is_dropped() {
        let mut parser = Parser::new();
        let frame = RawFrame::from_parts(Direction::Response, 99, &[1, 2]).unwrap();

        let invocations = core::cell::Cell::new(0);
        let mut on_receiver = |_: Receiver| invocations.set(invocations.get() + 1);
        let mut on_attitude = |_: AttitudeRadians| invocations.set(invocations.get() + 1);

        let mut dispatcher = Dispatcher::new();
        dispatcher.on_receiver(&mut on_receiver);
        dispatcher.on_attitude_radians(&mut on_attitude);
        dispatcher.feed_bytes(&mut parser, frame.as_slice());

        assert_eq!(invocations.get(), 0);
    }

    #[test]
    fn test_checksum_failure_never_reaches_handler() {
        let mut parser = Parser::new();
        let frame = ATTITUDE.to_raw_frame(Direction::Response).unwrap();

        let mut corrupted = [0u8; 18];
        corrupted.copy_from_slice(frame.as_slice());
        corrupted[7] ^= 0x10;

        let mut invocations = 0;
        let mut on_attitude = |_: AttitudeRadians| invocations += 1;

        let mut dispatcher = Dispatcher::new();
        dispatcher.on_attitude_radians(&mut on_attitude);

        dispatcher.feed_bytes(&mut parser, &corrupted);
        // The parser stays usable through the dispatcher after the drop.
        dispatcher.feed_bytes(&mut parser, frame.as_slice());

        assert_eq!(invocations, 1);
    }

    #[test]
    fn test_dispatch_without_handler() {
        let mut parser = Parser::new();
        let receiver = Receiver {
            c1: 1.0,
            c2: 2.0,
            c3: 3.0,
            c4: 4.0,
            c5: 5.0,
            c6: 6.0,
        };
        let frame = receiver.to_raw_frame(Direction::Response).unwrap();

        let mut dispatcher = Dispatcher::new();
        dispatcher.feed_bytes(&mut parser, frame.as_slice());
    }
}
