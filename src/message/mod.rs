use crate::{Direction, Error, RawFrame, MAX_PAYLOAD_LEN};

mod typ;
pub use typ::*;

mod receiver;
pub use receiver::*;

mod attitude;
pub use attitude::*;

/// Trait implemented by every payload type in the catalog.
pub trait Payload: Sized {
    /// Exact length of this payload on the wire.
    const LEN: usize;

    /// The message id selecting this layout.
    fn typ(&self) -> MessageType;

    /// Decodes a payload from the start of `buf`.
    fn decode(buf: &[u8]) -> Result<Self, Error>;

    /// Encodes this payload into the start of `buf`.
    fn encode(&self, buf: &mut [u8]) -> Result<(), Error>;
}

/// Trait for dumping a payload as a complete framed message.
pub trait PayloadDump: Payload {
    /// Writes a complete frame around this payload into `buf` and returns the
    /// frame length.
    fn dump(&self, buf: &mut [u8], direction: Direction) -> Result<usize, Error> {
        let raw = self.to_raw_frame(direction)?;
        let data = raw.as_slice();

        buf.get_mut(..data.len())
            .ok_or(Error::BufferError)?
            .copy_from_slice(data);

        Ok(data.len())
    }

    /// Builds a complete frame around this payload.
    fn to_raw_frame(&self, direction: Direction) -> Result<RawFrame, Error> {
        let mut payload = [0u8; MAX_PAYLOAD_LEN];
        let payload = payload.get_mut(..Self::LEN).ok_or(Error::BufferError)?;
        self.encode(payload)?;

        RawFrame::from_parts(direction, self.typ() as u8, payload)
    }
}

/// Represents a decoded message
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    Receiver(Receiver),
    AttitudeRadians(AttitudeRadians),
}

impl Message {
    /// Decodes a checksum-valid frame according to its message id's layout.
    pub fn parse(raw: &RawFrame) -> Result<Message, Error> {
        let payload = raw.payload()?;
        match MessageType::try_from(raw.message_id()) {
            Ok(MessageType::Receiver) => Receiver::decode(payload).map(Message::Receiver),
            Ok(MessageType::AttitudeRadians) => {
                AttitudeRadians::decode(payload).map(Message::AttitudeRadians)
            }
            _ => Err(Error::UnknownId {
                id: raw.message_id(),
            }),
        }
    }
}
