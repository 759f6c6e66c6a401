use crate::{util, Error, MessageType, Payload, PayloadDump};

/// `Receiver` payload type: one snapshot of six receiver channels
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct Receiver {
    pub c1: f32,
    pub c2: f32,
    pub c3: f32,
    pub c4: f32,
    pub c5: f32,
    pub c6: f32,
}

const LEN: usize = 24;

impl Payload for Receiver {
    const LEN: usize = LEN;

    fn typ(&self) -> MessageType {
        MessageType::Receiver
    }

    fn decode(buf: &[u8]) -> Result<Self, Error> {
        let data: &[u8; LEN] = util::ref_array_start(buf).ok_or(Error::BufferError)?;

        Ok(Receiver {
            c1: util::f32_at(data, 0),
            c2: util::f32_at(data, 4),
            c3: util::f32_at(data, 8),
            c4: util::f32_at(data, 12),
            c5: util::f32_at(data, 16),
            c6: util::f32_at(data, 20),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<(), Error> {
        let data: &mut [u8; LEN] = util::mut_array_start(buf).ok_or(Error::BufferError)?;

        util::put_f32_at(data, 0, self.c1);
        util::put_f32_at(data, 4, self.c2);
        util::put_f32_at(data, 8, self.c3);
        util::put_f32_at(data, 12, self.c4);
        util::put_f32_at(data, 16, self.c5);
        util::put_f32_at(data, 20, self.c6);

        Ok(())
    }
}

impl PayloadDump for Receiver {}
