//! Bounded reassembly pool for chunked image payloads
//!
//! The host streams each image as (offset, bytes) fragments under one
//! message id. A fixed arena of slots accumulates them; callers hold a
//! [`SlotId`] from [`InflightPool::begin`] and are responsible for releasing
//! it, on completion or on error. Slots orphaned by a sender that went quiet
//! are reclaimed by [`InflightPool::reclaim_stale`].

use heapless::String;

use esl_protocol::MAX_TOPIC_LEN;

/// Number of concurrently reassembling messages
pub const POOL_SLOTS: usize = 4;

/// Absolute payload capacity of one slot in bytes
pub const MAX_PAYLOAD_LEN: usize = 4096;

/// Handle to one in-progress reassembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotId(u8);

/// Errors from pool operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReassemblyError {
    /// All slots are busy; the new message is rejected outright
    PoolFull,
    /// Declared total length exceeds slot capacity
    TotalTooLarge,
    /// The handle does not refer to a receiving slot
    StaleHandle,
    /// Fragment would exceed the declared total or the slot capacity;
    /// already-received bytes are left intact
    Overflow,
}

/// Result of a successful append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppendOutcome {
    /// More fragments expected
    More,
    /// The final fragment arrived; payload is complete
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Receiving,
}

struct Slot {
    state: SlotState,
    msg_id: u16,
    topic: String<MAX_TOPIC_LEN>,
    total_len: usize,
    received_len: usize,
    last_activity: u64,
    payload: [u8; MAX_PAYLOAD_LEN],
}

impl Slot {
    fn new() -> Self {
        Self {
            state: SlotState::Free,
            msg_id: 0,
            topic: String::new(),
            total_len: 0,
            received_len: 0,
            last_activity: 0,
            payload: [0; MAX_PAYLOAD_LEN],
        }
    }

    fn free(&mut self) {
        self.state = SlotState::Free;
        self.topic.clear();
        self.total_len = 0;
        self.received_len = 0;
    }
}

/// Fixed-capacity arena of reassembly slots
pub struct InflightPool {
    slots: [Slot; POOL_SLOTS],
}

impl Default for InflightPool {
    fn default() -> Self {
        Self::new()
    }
}

impl InflightPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| Slot::new()),
        }
    }

    fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots
            .get(id.0 as usize)
            .filter(|s| s.state == SlotState::Receiving)
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.0 as usize)
            .filter(|s| s.state == SlotState::Receiving)
    }

    /// Start reassembling a new message
    ///
    /// Scans for a free slot; when none is free the message is rejected and
    /// the sender gets no feedback (it is expected to resend).
    pub fn begin(
        &mut self,
        msg_id: u16,
        topic: &str,
        total_len: usize,
        now: u64,
    ) -> Result<SlotId, ReassemblyError> {
        if total_len > MAX_PAYLOAD_LEN {
            return Err(ReassemblyError::TotalTooLarge);
        }

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.state == SlotState::Free {
                slot.state = SlotState::Receiving;
                slot.msg_id = msg_id;
                slot.topic.clear();
                // Truncate over-long topics rather than reject, backing up
                // to a char boundary so the slice cannot panic
                let mut take = topic.len().min(MAX_TOPIC_LEN);
                while !topic.is_char_boundary(take) {
                    take -= 1;
                }
                let _ = slot.topic.push_str(&topic[..take]);
                slot.total_len = total_len;
                slot.received_len = 0;
                slot.last_activity = now;
                return Ok(SlotId(i as u8));
            }
        }
        Err(ReassemblyError::PoolFull)
    }

    /// Find the slot receiving `msg_id`
    ///
    /// Linear scan; the pool is small by design.
    pub fn lookup(&self, msg_id: u16) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|s| s.state == SlotState::Receiving && s.msg_id == msg_id)
            .map(|i| SlotId(i as u8))
    }

    /// Append one fragment at its declared offset
    ///
    /// On overflow the fragment is dropped and the slot keeps its bytes; the
    /// caller decides whether to [`abandon`](Self::abandon) the slot.
    pub fn append(
        &mut self,
        id: SlotId,
        offset: usize,
        data: &[u8],
        now: u64,
    ) -> Result<AppendOutcome, ReassemblyError> {
        let slot = self.slot_mut(id).ok_or(ReassemblyError::StaleHandle)?;

        if slot.received_len + data.len() > slot.total_len
            || offset + data.len() > MAX_PAYLOAD_LEN
        {
            return Err(ReassemblyError::Overflow);
        }

        slot.payload[offset..offset + data.len()].copy_from_slice(data);
        slot.received_len += data.len();
        slot.last_activity = now;

        if offset + data.len() == slot.total_len {
            Ok(AppendOutcome::Complete)
        } else {
            Ok(AppendOutcome::More)
        }
    }

    /// The reassembled payload (full declared length)
    ///
    /// Meaningful once [`append`](Self::append) reported
    /// [`AppendOutcome::Complete`]; before that, unwritten ranges read as
    /// zero.
    pub fn payload(&self, id: SlotId) -> Option<&[u8]> {
        self.slot(id).map(|s| &s.payload[..s.total_len])
    }

    /// Routing topic of a receiving slot
    pub fn topic(&self, id: SlotId) -> Option<&str> {
        self.slot(id).map(|s| s.topic.as_str())
    }

    /// Message id of a receiving slot
    pub fn msg_id(&self, id: SlotId) -> Option<u16> {
        self.slot(id).map(|s| s.msg_id)
    }

    /// Release a slot after its payload has been consumed
    pub fn release(&mut self, id: SlotId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.free();
        }
    }

    /// Drop an in-progress reassembly without completing it
    pub fn abandon(&mut self, id: SlotId) {
        self.release(id);
    }

    /// Reclaim slots with no fragment activity for `max_age` ticks
    ///
    /// Returns the number of slots freed.
    pub fn reclaim_stale(&mut self, now: u64, max_age: u64) -> usize {
        let mut freed = 0;
        for slot in &mut self.slots {
            if slot.state == SlotState::Receiving
                && now.saturating_sub(slot.last_activity) > max_age
            {
                slot.free();
                freed += 1;
            }
        }
        freed
    }

    /// Number of slots currently receiving
    pub fn active(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state == SlotState::Receiving)
            .count()
    }
}
