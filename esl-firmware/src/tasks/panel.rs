//! Panel worker task
//!
//! Single consumer of the fragment channel and sole owner of the display
//! driver and framebuffer, so panel access needs no locking. Draws the boot
//! screen once, then processes fragments until an update commits, sleeping
//! the panel between updates.
//!
//! Runs on its own executor on core 1: the driver blocks through resets and
//! multi-second refresh waits, and the host link tasks on core 0 must keep
//! draining the UART while that happens.

use defmt::*;
use embassy_time::{with_timeout, Duration, Instant};

use esl_core::gfx::{Color, Framebuffer};
use esl_core::ingest::{Ingest, IngestOutcome};
use esl_core::layout::{
    DEVICE_ID_FONT, DEVICE_ID_POS, PANEL_HEIGHT, PANEL_WIDTH, TAG_ROTATION,
};
use esl_core::traits::{Panel, RefreshMode};
use esl_protocol::TagMessage;
use esl_uc8253::FRAME_BYTES;

use crate::channels::{FRAGMENT_CHANNEL, TX_CHANNEL};
use crate::font::HexFont;
use crate::hal::TagPanel;
use crate::DEVICE_ID;

/// How often the idle loop wakes to housekeep
const HOUSEKEEP_PERIOD: Duration = Duration::from_secs(5);

/// Reassembly slots with no activity this long are reclaimed
const SLOT_MAX_AGE_MS: u64 = 30_000;

/// Drive the e-paper panel from the fragment channel
#[embassy_executor::task]
pub async fn panel_task(mut panel: TagPanel, frame: &'static mut [u8; FRAME_BYTES]) {
    info!("Panel task started");

    let mut fb = Framebuffer::new(
        &mut frame[..],
        PANEL_WIDTH,
        PANEL_HEIGHT,
        TAG_ROTATION,
        Color::White,
    );

    boot_screen(&mut panel, &mut fb);

    let mut ingest = Ingest::new();

    loop {
        match with_timeout(HOUSEKEEP_PERIOD, FRAGMENT_CHANNEL.receive()).await {
            Ok(fragment) => {
                let now = Instant::now().as_millis();
                match ingest.handle_fragment(&fragment, &mut fb, &mut panel, now) {
                    Ok(IngestOutcome::Stored) => {}
                    Ok(IngestOutcome::Rendered { msg_id, asset }) => {
                        debug!("Message {} rendered ({:?})", msg_id, asset);
                        TX_CHANNEL.send(TagMessage::Ack { msg_id }).await;
                    }
                    Ok(IngestOutcome::Committed { msg_id }) => {
                        info!("Panel updated, message {} committed", msg_id);
                        TX_CHANNEL.send(TagMessage::Ack { msg_id }).await;
                    }
                    Ok(outcome) => {
                        warn!("Fragment dropped: {:?}", outcome);
                    }
                    Err(e) => {
                        // Drawn state survives; the commit is retried from
                        // the housekeeping branch
                        error!("Panel error: {:?}", e);
                    }
                }
            }
            Err(_) => {
                let now = Instant::now().as_millis();
                let freed = ingest.reclaim_stale(now, SLOT_MAX_AGE_MS);
                if freed > 0 {
                    warn!("Reclaimed {} stale reassembly slots", freed);
                }

                match ingest.try_commit(&fb, &mut panel) {
                    Ok(Some(msg_id)) => {
                        info!("Deferred panel update committed, message {}", msg_id);
                        TX_CHANNEL.send(TagMessage::Ack { msg_id }).await;
                    }
                    Ok(None) => {}
                    Err(e) => error!("Commit retry failed: {:?}", e),
                }
            }
        }
    }
}

/// Empty label template: border, asset divider, footer rule and pairing dot
fn draw_template(fb: &mut Framebuffer<'_>) {
    let (w, h) = (fb.width(), fb.height());

    fb.clear_region(0, 0, w, 2, Color::Black);
    fb.clear_region(0, h - 2, w, 2, Color::Black);
    fb.clear_region(0, 0, 2, h, Color::Black);
    fb.clear_region(w - 2, 0, 2, h, Color::Black);

    // Divider between the description and price areas
    fb.clear_region(264, 16, 2, 160, Color::Black);

    // Footer rule above the device id line
    fb.clear_region(16, 196, w - 32, 2, Color::Black);
    fb.draw_circle(40, 216, 8, Color::Black, true);
}

/// Show the device id so an unprovisioned tag can be paired
fn boot_screen(panel: &mut TagPanel, fb: &mut Framebuffer<'_>) {
    info!("Drawing boot screen");

    fb.clear(Color::White);
    draw_template(fb);
    fb.draw_string(
        &HexFont,
        DEVICE_ID_POS.0,
        DEVICE_ID_POS.1,
        DEVICE_ID,
        DEVICE_ID_FONT,
        Color::Black,
    );

    if let Err(e) = show_boot_screen(panel, fb) {
        error!("Boot screen failed: {:?}", e);
    }
}

fn show_boot_screen(
    panel: &mut TagPanel,
    fb: &Framebuffer<'_>,
) -> Result<(), <TagPanel as Panel>::Error> {
    panel.init(RefreshMode::Fast)?;
    panel.clear()?;
    panel.push(fb.data())?;
    panel.refresh()?;
    panel.deep_sleep()
}
