//! Message types for the host link
//!
//! Message types are divided into two categories:
//! - Host → Tag: image fragments, heartbeat requests
//! - Tag → Host: completion acknowledgements, heartbeat responses

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::{String, Vec};

// Message type IDs: Host → Tag
pub const MSG_FRAGMENT: u8 = 0x01;
pub const MSG_PING: u8 = 0x02;

// Message type IDs: Tag → Host
pub const MSG_ACK: u8 = 0x81;
pub const MSG_PONG: u8 = 0x82;

/// Maximum topic string length in bytes
pub const MAX_TOPIC_LEN: usize = 64;

/// Maximum fragment data chunk in bytes
pub const MAX_CHUNK: usize = 512;

/// Fragment header size on the wire: msg_id + offset + total_len + topic_len
const FRAGMENT_HEADER: usize = 7;

/// One fragment of a chunked image payload
///
/// The topic is carried only on the first fragment of a message
/// (`offset == 0`); continuation fragments leave it empty and are matched to
/// their message by `msg_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fragment {
    /// Message identity, unique among in-flight messages
    pub msg_id: u16,
    /// Byte offset of this chunk within the full payload
    pub offset: u16,
    /// Total payload length declared by the sender
    pub total_len: u16,
    /// Routing topic (empty on continuation fragments)
    pub topic: String<MAX_TOPIC_LEN>,
    /// Chunk data
    pub data: Vec<u8, MAX_CHUNK>,
}

/// Messages from the host to the tag
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// One chunk of an image payload
    Fragment(Fragment),
    /// Heartbeat request
    Ping,
}

impl HostMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_FRAGMENT => {
                // Payload: [msg_id:2][offset:2][total_len:2][topic_len:1][topic][data]
                let p = frame.payload.as_slice();
                if p.len() < FRAGMENT_HEADER {
                    return Err(FrameError::InvalidFrame);
                }
                let msg_id = u16::from_le_bytes([p[0], p[1]]);
                let offset = u16::from_le_bytes([p[2], p[3]]);
                let total_len = u16::from_le_bytes([p[4], p[5]]);
                let topic_len = p[6] as usize;
                if topic_len > MAX_TOPIC_LEN || p.len() < FRAGMENT_HEADER + topic_len {
                    return Err(FrameError::InvalidFrame);
                }

                let topic_bytes = &p[FRAGMENT_HEADER..FRAGMENT_HEADER + topic_len];
                let topic_str =
                    core::str::from_utf8(topic_bytes).map_err(|_| FrameError::InvalidFrame)?;
                let mut topic = String::new();
                topic
                    .push_str(topic_str)
                    .map_err(|_| FrameError::InvalidFrame)?;

                let mut data = Vec::new();
                data.extend_from_slice(&p[FRAGMENT_HEADER + topic_len..])
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Ok(HostMessage::Fragment(Fragment {
                    msg_id,
                    offset,
                    total_len,
                    topic,
                    data,
                }))
            }
            MSG_PING => Ok(HostMessage::Ping),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostMessage::Fragment(fragment) => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&fragment.msg_id.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&fragment.offset.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&fragment.total_len.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .push(fragment.topic.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(fragment.topic.as_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&fragment.data)
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(MSG_FRAGMENT, &payload)
            }
            HostMessage::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }
}

/// Messages from the tag to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagMessage {
    /// A full payload was reassembled and rendered
    Ack { msg_id: u16 },
    /// Heartbeat response
    Pong,
}

impl TagMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_ACK => {
                if frame.payload.len() < 2 {
                    return Err(FrameError::InvalidFrame);
                }
                Ok(TagMessage::Ack {
                    msg_id: u16::from_le_bytes([frame.payload[0], frame.payload[1]]),
                })
            }
            MSG_PONG => Ok(TagMessage::Pong),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            TagMessage::Ack { msg_id } => Frame::new(MSG_ACK, &msg_id.to_le_bytes()),
            TagMessage::Pong => Ok(Frame::empty(MSG_PONG)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameParser;

    fn first_fragment() -> Fragment {
        let mut topic = String::new();
        topic.push_str("esl/3c71bf9d2a10/price").unwrap();
        let mut data = Vec::new();
        data.extend_from_slice(&[0xFF, 0x00, 0xA5, 0x5A]).unwrap();
        Fragment {
            msg_id: 0x0102,
            offset: 0,
            total_len: 1024,
            topic,
            data,
        }
    }

    #[test]
    fn test_fragment_roundtrip_with_topic() {
        let original = HostMessage::Fragment(first_fragment());
        let frame = original.to_frame().unwrap();
        let parsed = HostMessage::from_frame(&frame).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_fragment_roundtrip_continuation() {
        let mut data = Vec::new();
        data.extend_from_slice(&[1, 2, 3]).unwrap();
        let original = HostMessage::Fragment(Fragment {
            msg_id: 7,
            offset: 512,
            total_len: 1024,
            topic: String::new(),
            data,
        });
        let frame = original.to_frame().unwrap();
        let parsed = HostMessage::from_frame(&frame).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_fragment_through_wire_parser() {
        let original = HostMessage::Fragment(first_fragment());
        let encoded = original.to_frame().unwrap().encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let frame = parser.feed_bytes(&encoded).unwrap().unwrap();
        let parsed = HostMessage::from_frame(&frame).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_fragment_truncated_header_rejected() {
        let frame = Frame::new(MSG_FRAGMENT, &[0x01, 0x00, 0x00]).unwrap();
        assert_eq!(HostMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_fragment_topic_len_beyond_payload_rejected() {
        // topic_len claims 10 bytes but none follow
        let frame = Frame::new(MSG_FRAGMENT, &[1, 0, 0, 0, 4, 0, 10]).unwrap();
        assert_eq!(HostMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_ping() {
        let frame = HostMessage::Ping.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_PING);
        assert_eq!(HostMessage::from_frame(&frame), Ok(HostMessage::Ping));
    }

    #[test]
    fn test_ack_roundtrip() {
        let original = TagMessage::Ack { msg_id: 0xBEEF };
        let frame = original.to_frame().unwrap();
        let parsed = TagMessage::from_frame(&frame).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let frame = Frame::empty(0x7F);
        assert_eq!(HostMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
        assert_eq!(TagMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }
}
