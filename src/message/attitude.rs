use crate::{util, Error, MessageType, Payload, PayloadDump};

/// `AttitudeRadians` payload type: orientation in radians
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttitudeRadians {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

const LEN: usize = 12;

impl Payload for AttitudeRadians {
    const LEN: usize = LEN;

    fn typ(&self) -> MessageType {
        MessageType::AttitudeRadians
    }

    fn decode(buf: &[u8]) -> Result<Self, Error> {
        let data: &[u8; LEN] = util::ref_array_start(buf).ok_or(Error::BufferError)?;

        Ok(AttitudeRadians {
            roll: util::f32_at(data, 0),
            pitch: util::f32_at(data, 4),
            yaw: util::f32_at(data, 8),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<(), Error> {
        let data: &mut [u8; LEN] = util::mut_array_start(buf).ok_or(Error::BufferError)?;

        util::put_f32_at(data, 0, self.roll);
        util::put_f32_at(data, 4, self.pitch);
        util::put_f32_at(data, 8, self.yaw);

        Ok(())
    }
}

impl PayloadDump for AttitudeRadians {}
