//! Fragment ingest pump
//!
//! Drives one fragment at a time through reassembly, rendering and the
//! commit barrier. Pool-level rejections are reported as outcomes, not
//! errors; only panel failures propagate as `Err` so the caller can retry
//! the commit without losing the drawn framebuffer.

use esl_protocol::Fragment;

use crate::commit::{Asset, CommitBarrier};
use crate::gfx::Framebuffer;
use crate::inflight::{AppendOutcome, InflightPool, ReassemblyError};
use crate::traits::{Panel, RefreshMode};

/// What one fragment did to the tag state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestOutcome {
    /// Fragment stored, message still incomplete
    Stored,
    /// Message complete and drawn; `asset` is `None` for unroutable topics
    Rendered { msg_id: u16, asset: Option<Asset> },
    /// Message complete, both assets drawn, panel update done
    Committed { msg_id: u16 },
    /// No free reassembly slot; fragment dropped
    PoolExhausted,
    /// Declared total exceeds slot capacity; fragment dropped
    TooLarge,
    /// Continuation fragment for a message the pool is not tracking
    UnknownMessage,
    /// Fragment would overrun its slot; the reassembly is abandoned
    Overflow,
}

/// Reassembly pool plus commit barrier for one tag
pub struct Ingest {
    pool: InflightPool,
    barrier: CommitBarrier,
    /// Message id whose arrival armed the pending update, so a deferred
    /// retry can still acknowledge it
    pending_msg_id: Option<u16>,
}

impl Default for Ingest {
    fn default() -> Self {
        Self::new()
    }
}

impl Ingest {
    pub fn new() -> Self {
        Self {
            pool: InflightPool::new(),
            barrier: CommitBarrier::new(),
            pending_msg_id: None,
        }
    }

    /// Feed one fragment through reassembly and, on completion, draw and
    /// possibly commit
    ///
    /// A fragment at offset 0 opens a new reassembly; continuations are
    /// matched by message id. When a message completes, its payload is
    /// blitted into `fb` at the rect its topic routes to, and once both
    /// assets have been drawn the frame is pushed to the panel.
    pub fn handle_fragment<P: Panel>(
        &mut self,
        frag: &Fragment,
        fb: &mut Framebuffer<'_>,
        panel: &mut P,
        now: u64,
    ) -> Result<IngestOutcome, P::Error> {
        let id = if frag.offset == 0 {
            match self.pool.begin(
                frag.msg_id,
                frag.topic.as_str(),
                frag.total_len as usize,
                now,
            ) {
                Ok(id) => id,
                Err(ReassemblyError::TotalTooLarge) => return Ok(IngestOutcome::TooLarge),
                Err(_) => return Ok(IngestOutcome::PoolExhausted),
            }
        } else {
            match self.pool.lookup(frag.msg_id) {
                Some(id) => id,
                None => return Ok(IngestOutcome::UnknownMessage),
            }
        };

        match self.pool.append(id, frag.offset as usize, &frag.data, now) {
            Ok(AppendOutcome::More) => Ok(IngestOutcome::Stored),
            Ok(AppendOutcome::Complete) => {
                let asset = self.pool.topic(id).and_then(Asset::from_topic);

                if let (Some(asset), Some(payload)) = (asset, self.pool.payload(id)) {
                    let rect = asset.rect();
                    fb.draw_bin_image(payload, rect.x, rect.y, rect.w, rect.h);
                }
                self.pool.release(id);

                match asset {
                    Some(asset) if self.barrier.mark_ready(asset) => {
                        self.pending_msg_id = Some(frag.msg_id);
                        self.commit(fb, panel)?;
                        self.pending_msg_id = None;
                        Ok(IngestOutcome::Committed {
                            msg_id: frag.msg_id,
                        })
                    }
                    asset => Ok(IngestOutcome::Rendered {
                        msg_id: frag.msg_id,
                        asset,
                    }),
                }
            }
            Err(_) => {
                // Partial bytes are useless once a fragment overruns; free
                // the slot so a resend can start clean
                self.pool.abandon(id);
                Ok(IngestOutcome::Overflow)
            }
        }
    }

    /// Retry a panel update that failed mid-commit
    ///
    /// Returns `Ok(None)` when the barrier is not complete, so this is safe
    /// to call unconditionally. On success, returns the message id that
    /// completed the update so the caller can still acknowledge it.
    pub fn try_commit<P: Panel>(
        &mut self,
        fb: &Framebuffer<'_>,
        panel: &mut P,
    ) -> Result<Option<u16>, P::Error> {
        if !self.barrier.is_complete() {
            return Ok(None);
        }
        self.commit(fb, panel)?;
        Ok(self.pending_msg_id.take())
    }

    fn commit<P: Panel>(&mut self, fb: &Framebuffer<'_>, panel: &mut P) -> Result<(), P::Error> {
        panel.init(RefreshMode::Partial)?;
        panel.push(fb.data())?;
        panel.refresh()?;
        panel.deep_sleep()?;
        // Only a fully successful update consumes the barrier; a failed one
        // stays pending for try_commit
        self.barrier.reset();
        Ok(())
    }

    /// Free reassembly slots that have gone quiet
    pub fn reclaim_stale(&mut self, now: u64, max_age: u64) -> usize {
        self.pool.reclaim_stale(now, max_age)
    }

    /// Number of in-progress reassemblies
    pub fn active_slots(&self) -> usize {
        self.pool.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Color;
    use crate::layout::{FRAME_BYTES, PANEL_HEIGHT, PANEL_WIDTH, PRICE_RECT, TAG_ROTATION};
    use esl_protocol::Fragment;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Init(RefreshMode),
        Push(usize),
        Refresh,
        DeepSleep,
    }

    #[derive(Default)]
    struct MockPanel {
        ops: Vec<Op, 16>,
        fail_refresh: bool,
    }

    impl Panel for MockPanel {
        type Error = ();

        fn init(&mut self, mode: RefreshMode) -> Result<(), ()> {
            self.ops.push(Op::Init(mode)).map_err(|_| ())
        }

        fn push(&mut self, frame: &[u8]) -> Result<(), ()> {
            self.ops.push(Op::Push(frame.len())).map_err(|_| ())
        }

        fn refresh(&mut self) -> Result<(), ()> {
            if self.fail_refresh {
                return Err(());
            }
            self.ops.push(Op::Refresh).map_err(|_| ())
        }

        fn clear(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn deep_sleep(&mut self) -> Result<(), ()> {
            self.ops.push(Op::DeepSleep).map_err(|_| ())
        }
    }

    fn fragment(msg_id: u16, offset: u16, total_len: u16, topic: &str, data: &[u8]) -> Fragment {
        let mut frag = Fragment {
            msg_id,
            offset,
            total_len,
            topic: heapless::String::new(),
            data: Vec::new(),
        };
        frag.topic.push_str(topic).unwrap();
        frag.data.extend_from_slice(data).unwrap();
        frag
    }

    fn price_payload() -> [u8; 1536] {
        [0xAA; 1536]
    }

    fn desc_payload() -> [u8; 2880] {
        [0x55; 2880]
    }

    // Feed a payload as max-size fragments, returning the final outcome
    fn feed_payload<P: Panel>(
        ingest: &mut Ingest,
        fb: &mut Framebuffer<'_>,
        panel: &mut P,
        msg_id: u16,
        topic: &str,
        payload: &[u8],
    ) -> Result<IngestOutcome, P::Error> {
        let mut last = IngestOutcome::Stored;
        for (i, chunk) in payload.chunks(512).enumerate() {
            let offset = (i * 512) as u16;
            let topic = if offset == 0 { topic } else { "" };
            let frag = fragment(msg_id, offset, payload.len() as u16, topic, chunk);
            last = ingest.handle_fragment(&frag, fb, panel, 0)?;
        }
        Ok(last)
    }

    #[test]
    fn test_single_fragment_renders_without_commit() {
        let mut buf = [0u8; FRAME_BYTES];
        let mut fb = Framebuffer::new(
            &mut buf,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        fb.clear(Color::White);
        let mut panel = MockPanel::default();
        let mut ingest = Ingest::new();

        let payload = price_payload();
        let frag = fragment(7, 0, 1536, "esl/price", &payload[..512]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Stored
        );
        let frag = fragment(7, 512, 1536, "", &payload[512..1024]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Stored
        );
        let frag = fragment(7, 1024, 1536, "", &payload[1024..]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Rendered {
                msg_id: 7,
                asset: Some(Asset::Price),
            }
        );

        // Nothing touched the panel yet and the slot is freed
        assert!(panel.ops.is_empty());
        assert_eq!(ingest.active_slots(), 0);

        // 0xAA column bytes: the top pixel of the price rect is black
        assert_eq!(fb.pixel(PRICE_RECT.x, PRICE_RECT.y), Some(Color::Black));
        assert_eq!(fb.pixel(PRICE_RECT.x, PRICE_RECT.y + 1), Some(Color::White));
    }

    #[test]
    fn test_both_assets_commit_in_either_order() {
        for price_first in [true, false] {
            let mut buf = [0u8; FRAME_BYTES];
            let mut fb = Framebuffer::new(
                &mut buf,
                PANEL_WIDTH,
                PANEL_HEIGHT,
                TAG_ROTATION,
                Color::White,
            );
            fb.clear(Color::White);
            let mut panel = MockPanel::default();
            let mut ingest = Ingest::new();

            let price = price_payload();
            let desc = desc_payload();
            let (last, committed_id) = if price_first {
                feed_payload(&mut ingest, &mut fb, &mut panel, 1, "esl/price", &price).unwrap();
                (
                    feed_payload(&mut ingest, &mut fb, &mut panel, 2, "esl/description", &desc)
                        .unwrap(),
                    2,
                )
            } else {
                feed_payload(&mut ingest, &mut fb, &mut panel, 2, "esl/description", &desc)
                    .unwrap();
                (
                    feed_payload(&mut ingest, &mut fb, &mut panel, 1, "esl/price", &price)
                        .unwrap(),
                    1,
                )
            };
            assert_eq!(last, IngestOutcome::Committed { msg_id: committed_id });

            assert_eq!(
                panel.ops.as_slice(),
                &[
                    Op::Init(RefreshMode::Partial),
                    Op::Push(FRAME_BYTES),
                    Op::Refresh,
                    Op::DeepSleep,
                ]
            );

            // A third asset pair starts a fresh cycle
            assert_eq!(
                feed_payload(&mut ingest, &mut fb, &mut panel, 3, "esl/price", &price).unwrap(),
                IngestOutcome::Rendered {
                    msg_id: 3,
                    asset: Some(Asset::Price),
                }
            );
        }
    }

    #[test]
    fn test_chunking_equivalence_in_framebuffer() {
        let payload = price_payload();

        let mut buf_a = [0u8; FRAME_BYTES];
        let mut fb_a = Framebuffer::new(
            &mut buf_a,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        fb_a.clear(Color::White);
        let mut panel = MockPanel::default();
        let mut ingest = Ingest::new();
        feed_payload(&mut ingest, &mut fb_a, &mut panel, 1, "esl/price", &payload).unwrap();

        let mut buf_b = [0u8; FRAME_BYTES];
        let mut fb_b = Framebuffer::new(
            &mut buf_b,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        fb_b.clear(Color::White);
        let mut ingest = Ingest::new();
        for (i, chunk) in payload.chunks(300).enumerate() {
            let frag = fragment(1, (i * 300) as u16, 1536, "esl/price", chunk);
            ingest
                .handle_fragment(&frag, &mut fb_b, &mut panel, 0)
                .unwrap();
        }

        assert_eq!(fb_a.data(), fb_b.data());
    }

    #[test]
    fn test_unroutable_topic_renders_nothing_to_barrier() {
        let mut buf = [0u8; FRAME_BYTES];
        let mut fb = Framebuffer::new(
            &mut buf,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        fb.clear(Color::White);
        let mut panel = MockPanel::default();
        let mut ingest = Ingest::new();

        let frag = fragment(9, 0, 4, "esl/firmware", &[1, 2, 3, 4]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Rendered {
                msg_id: 9,
                asset: None,
            }
        );
        assert!(panel.ops.is_empty());
        // The framebuffer is untouched
        assert!(fb.data().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_pool_rejections_surface_as_outcomes() {
        let mut buf = [0u8; FRAME_BYTES];
        let mut fb = Framebuffer::new(
            &mut buf,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        let mut panel = MockPanel::default();
        let mut ingest = Ingest::new();

        let frag = fragment(1, 0, 8000, "esl/price", &[0; 16]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::TooLarge
        );

        for id in 0..4u16 {
            let frag = fragment(id, 0, 600, "esl/price", &[0; 16]);
            assert_eq!(
                ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
                IngestOutcome::Stored
            );
        }
        let frag = fragment(99, 0, 600, "esl/price", &[0; 16]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::PoolExhausted
        );

        // Continuation for a message the pool never opened
        let frag = fragment(50, 100, 600, "", &[0; 16]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::UnknownMessage
        );
    }

    #[test]
    fn test_overflow_abandons_slot() {
        let mut buf = [0u8; FRAME_BYTES];
        let mut fb = Framebuffer::new(
            &mut buf,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        let mut panel = MockPanel::default();
        let mut ingest = Ingest::new();

        let frag = fragment(1, 0, 16, "esl/price", &[0; 8]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Stored
        );
        let frag = fragment(1, 8, 16, "", &[0; 12]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Overflow
        );
        assert_eq!(ingest.active_slots(), 0);

        // The same message id can start over
        let frag = fragment(1, 0, 16, "esl/price", &[0; 8]);
        assert_eq!(
            ingest.handle_fragment(&frag, &mut fb, &mut panel, 0).unwrap(),
            IngestOutcome::Stored
        );
    }

    #[test]
    fn test_failed_commit_stays_pending() {
        let mut buf = [0u8; FRAME_BYTES];
        let mut fb = Framebuffer::new(
            &mut buf,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        fb.clear(Color::White);
        let mut panel = MockPanel {
            fail_refresh: true,
            ..Default::default()
        };
        let mut ingest = Ingest::new();

        let price = price_payload();
        let desc = desc_payload();
        feed_payload(&mut ingest, &mut fb, &mut panel, 1, "esl/price", &price).unwrap();
        assert!(
            feed_payload(&mut ingest, &mut fb, &mut panel, 2, "esl/description", &desc).is_err()
        );

        // Barrier still armed; a retry on a healthy panel completes and
        // yields the id of the message that finished the pair, so the ack
        // the failed attempt swallowed still goes out
        panel.fail_refresh = false;
        panel.ops.clear();
        assert_eq!(ingest.try_commit(&fb, &mut panel).unwrap(), Some(2));
        assert_eq!(
            panel.ops.as_slice(),
            &[
                Op::Init(RefreshMode::Partial),
                Op::Push(FRAME_BYTES),
                Op::Refresh,
                Op::DeepSleep,
            ]
        );
        // And the barrier is now consumed
        assert_eq!(ingest.try_commit(&fb, &mut panel).unwrap(), None);
    }

    #[test]
    fn test_reclaim_stale_passthrough() {
        let mut buf = [0u8; FRAME_BYTES];
        let mut fb = Framebuffer::new(
            &mut buf,
            PANEL_WIDTH,
            PANEL_HEIGHT,
            TAG_ROTATION,
            Color::White,
        );
        let mut panel = MockPanel::default();
        let mut ingest = Ingest::new();

        let frag = fragment(1, 0, 600, "esl/price", &[0; 16]);
        ingest
            .handle_fragment(&frag, &mut fb, &mut panel, 100)
            .unwrap();
        assert_eq!(ingest.reclaim_stale(200, 500), 0);
        assert_eq!(ingest.reclaim_stale(1000, 500), 1);
        assert_eq!(ingest.active_slots(), 0);
    }
}
