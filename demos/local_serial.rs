use std::{env, io, time::Duration};

use msp::{Message, MessageType, Parser, RawFrame};

fn main() {
    let path = env::args().nth(1).expect("no serial port supplied");
    let mut port = serialport::new(path, 115_200)
        .timeout(Duration::from_millis(20))
        .open()
        .expect("failed to open serial port");

    // Ask the device to start talking.
    port.write_all(RawFrame::request(MessageType::AttitudeRadians).as_slice())
        .expect("failed to write request");

    let mut buf = [0; 1024];
    let mut parser = Parser::new();
    loop {
        match port.read(buf.as_mut_slice()) {
            Ok(n) => {
                if n > 0 {
                    let mut remaining = &buf[..n];
                    while let Some((result, rest)) = parser.push_bytes(remaining) {
                        match result {
                            Ok(Message::Receiver(rc)) => println!("{rc:?}"),
                            Ok(Message::AttitudeRadians(attitude)) => println!("{attitude:?}"),
                            Ok(_) => {}
                            Err(err) => eprintln!("{err}"),
                        }

                        remaining = rest;
                    }
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => (),
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }
}
