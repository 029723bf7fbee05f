//! Host link transmit task
//!
//! Drains the outbound channel and writes encoded frames to the UART.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use esl_protocol::MAX_FRAME_SIZE;

use crate::channels::TX_CHANNEL;

/// Send acks and heartbeat responses to the host
#[embassy_executor::task]
pub async fn net_tx_task(mut tx: BufferedUartTx) {
    info!("Net TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let msg = TX_CHANNEL.receive().await;

        let frame = match msg.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode message: {:?}", e);
                continue;
            }
        };

        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("UART write error: {:?}", e);
                }
            }
            Err(e) => warn!("Frame encode error: {:?}", e),
        }
    }
}
