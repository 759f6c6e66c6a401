use num_enum::TryFromPrimitive;

/// Represents all message ids with a known payload layout
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageType {
    Receiver = 121,
    AttitudeRadians = 122,
}
