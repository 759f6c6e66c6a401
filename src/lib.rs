//! This crate provides a `no-std` streaming parser and encoder for the
//! MultiWii Serial Protocol (MSP).
//! # Usage
//! ### Message Parsing
//! ```rust
//! use msp::{Message, Parser};
//!
//! let mut parser = Parser::new();
//! let data: &[&[u8]] = &[&[0x24, 0x4D, 0x3C, 24, 121], &[0; 24], &[97]];
//! for (i, input_buf) in data.iter().enumerate() {
//!     for (j, result) in parser.iter_messages(input_buf).enumerate() {
//!         match result {
//!             Ok(Message::Receiver(rc)) => assert_eq!(rc.c3, 0.0),
//!             e => panic!("This data should parse succesfully: {e:?}, {i}, {j}"),
//!         }
//!     }
//! }
//! ```
//! ### Message Serialization
//! ```rust
//! use msp::{AttitudeRadians, Direction, PayloadDump, MAX_FRAME_LEN};
//!
//! let attitude = AttitudeRadians { roll: 0.0, pitch: 1.5, yaw: -1.5 };
//!
//! let mut buf: [u8; MAX_FRAME_LEN] = [0; MAX_FRAME_LEN];
//! let len = attitude.dump(&mut buf, Direction::Response).unwrap();
//! let data = &buf[..len];
//! // ...
//! ```
//! ### Polling a device
//! ```rust
//! use msp::{MessageType, RawFrame};
//!
//! let request = RawFrame::request(MessageType::Receiver);
//! assert_eq!(request.as_slice(), &[0x24, 0x4D, 0x3E, 0x00, 0x79, 0x79]);
//! ```

#![no_std]

mod checksum;

mod dispatch;
pub use dispatch::*;

mod frame;
pub use frame::*;

mod message;
pub use message::*;

mod parser;
pub use parser::*;

mod util;

use snafu::Snafu;

/// First sync byte of every frame (`'$'`).
pub const SYNC_1: u8 = 0x24;
/// Second sync byte of every frame (`'M'`).
pub const SYNC_2: u8 = 0x4D;

/// Sync pair, direction, payload length and message id.
pub const HEADER_LEN: usize = 5;
/// The payload length travels in a single octet.
pub const MAX_PAYLOAD_LEN: usize = 255;
/// Header, maximum payload and trailing checksum.
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_PAYLOAD_LEN + 1;

/// Enum of decode and encode errors.
#[non_exhaustive]
#[derive(Debug, PartialEq, Snafu)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[snafu(display("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}"))]
    ChecksumMismatch { expected: u8, actual: u8 },
    #[snafu(display("Unknown message id {id}, see MessageType enum"))]
    UnknownId { id: u8 },
    #[snafu(display("Invalid payload length {len}, must fit in a single octet"))]
    InvalidLength { len: usize },
    #[snafu(display("Buffer too small for the requested operation"))]
    BufferError,
}
