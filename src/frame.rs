use crate::{
    checksum::XorDigest, Error, MessageType, HEADER_LEN, MAX_FRAME_LEN, MAX_PAYLOAD_LEN, SYNC_1,
    SYNC_2,
};
use num_enum::TryFromPrimitive;

/// Direction byte of a frame: requests flow from the host to the device,
/// responses flow back.
///
/// The parser carries the wire byte through without validating it; this enum
/// types the encoding side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Request = 0x3E,  // '>'
    Response = 0x3C, // '<'
}

/// Represents a raw frame (not decoded)
#[derive(Clone, Copy, Debug)]
pub struct RawFrame {
    pub(crate) buf: [u8; MAX_FRAME_LEN],
    pub(crate) len: usize,
}

impl RawFrame {
    pub(crate) const fn empty() -> RawFrame {
        RawFrame {
            buf: [0u8; MAX_FRAME_LEN],
            len: 0,
        }
    }

    /// Create a new `RawFrame` from the bytes of a complete frame. The slice
    /// must be at most `MAX_FRAME_LEN` bytes long; its content is not
    /// verified.
    pub fn new(slice: &[u8]) -> Result<RawFrame, Error> {
        let mut frame = RawFrame {
            buf: [0u8; MAX_FRAME_LEN],
            len: slice.len(),
        };

        frame
            .buf
            .get_mut(..slice.len())
            .ok_or(Error::BufferError)?
            .copy_from_slice(slice);

        Ok(frame)
    }

    /// Builds a complete frame around the given message id and payload,
    /// including the trailing checksum.
    pub fn from_parts(direction: Direction, id: u8, payload: &[u8]) -> Result<RawFrame, Error> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidLength { len: payload.len() });
        }

        let mut frame = RawFrame::empty();
        frame.buf[0] = SYNC_1;
        frame.buf[1] = SYNC_2;
        frame.buf[2] = direction as u8;
        frame.buf[3] = payload.len() as u8;
        frame.buf[4] = id;
        frame.buf[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);

        let mut digest = XorDigest::new();
        digest.push(frame.buf[3]);
        digest.push(frame.buf[4]);
        digest.compute(payload);

        frame.len = HEADER_LEN + payload.len() + 1;
        frame.buf[frame.len - 1] = digest.get_checksum();

        Ok(frame)
    }

    /// Builds the zero-payload request that polls a device for the given
    /// message type. With no length or payload bits set, the checksum
    /// degenerates to the id itself.
    pub fn request(typ: MessageType) -> RawFrame {
        let mut frame = RawFrame::empty();
        frame.buf[0] = SYNC_1;
        frame.buf[1] = SYNC_2;
        frame.buf[2] = Direction::Request as u8;
        frame.buf[3] = 0;
        frame.buf[4] = typ as u8;
        frame.buf[5] = typ as u8;
        frame.len = HEADER_LEN + 1;

        frame
    }

    /// Get the slice of the raw frame's buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len.min(MAX_FRAME_LEN)]
    }

    /// Get the payload section of the raw frame
    pub fn payload(&self) -> Result<&[u8], Error> {
        match self.as_slice() {
            // Skip the [sync1], [sync2], [direction], [length], [id] and
            // [checksum] bytes
            [_, _, _, _, _, payload @ .., _] => Ok(payload),
            _ => Err(Error::BufferError),
        }
    }

    /// Get the message id byte of the frame
    pub fn message_id(&self) -> u8 {
        self.buf[4]
    }

    /// Get the direction byte of the frame, as received. `Direction::try_from`
    /// classifies it.
    pub fn direction(&self) -> u8 {
        self.buf[2]
    }
}
