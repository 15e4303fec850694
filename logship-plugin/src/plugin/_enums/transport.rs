use strum_macros::{EnumString, VariantNames};

/// Delivery model of a transport.
#[derive(EnumString, VariantNames, Debug, Clone, Copy, Eq, Hash, PartialEq)]
#[strum(serialize_all = "kebab_case", ascii_case_insensitive)]
pub enum TransportKind {
    /// Connection-based, ordered byte stream (e.g. TCP)
    Stream,
    /// Self-contained datagrams (e.g. UDP)
    Datagram,
}

impl TransportKind {
    pub fn is_stream(self) -> bool {
        matches!(self, TransportKind::Stream)
    }
}

impl From<bool> for TransportKind {
    /// `true` selects a stream transport, `false` a datagram one.
    fn from(stream: bool) -> Self {
        if stream {
            TransportKind::Stream
        } else {
            TransportKind::Datagram
        }
    }
}

use std::fmt;

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Stream => write!(f, "stream"),
            TransportKind::Datagram => write!(f, "datagram"),
        }
    }
}
