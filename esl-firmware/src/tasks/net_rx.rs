//! Host link receive task
//!
//! Reads raw bytes from the UART, reframes them and dispatches decoded
//! messages. The parser resynchronizes on the start byte, so line noise
//! costs at most the frame it corrupted.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use esl_protocol::{FrameParser, HostMessage, TagMessage};

use crate::channels::{FRAGMENT_CHANNEL, TX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Receive and parse frames from the host
#[embassy_executor::task]
pub async fn net_rx_task(mut rx: BufferedUartRx) {
    info!("Net RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match HostMessage::from_frame(&frame) {
                            Ok(msg) => handle_host_message(msg),
                            Err(e) => warn!("Failed to parse host message: {:?}", e),
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Dispatch a decoded host message
fn handle_host_message(msg: HostMessage) {
    match msg {
        HostMessage::Fragment(fragment) => {
            trace!(
                "Fragment: msg {} offset {} of {}",
                fragment.msg_id,
                fragment.offset,
                fragment.total_len
            );
            // The panel task is slow during refreshes; drop rather than stall
            // the UART and let the host resend
            if FRAGMENT_CHANNEL.try_send(fragment).is_err() {
                warn!("Fragment channel full, dropping fragment");
            }
        }
        HostMessage::Ping => {
            trace!("PING received");
            if TX_CHANNEL.try_send(TagMessage::Pong).is_err() {
                warn!("TX channel full, dropping PONG");
            }
        }
    }
}
