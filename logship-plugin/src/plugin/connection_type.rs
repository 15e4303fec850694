use crate::plugin::TransportKind;
use std::fmt;

/// A transport a sink declares it can serve.
///
/// Two connection types are the same transport only when both the kind and
/// the name match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionType {
    kind: TransportKind,
    name: String,
}

impl ConnectionType {
    pub fn new(kind: TransportKind, name: &str) -> Self {
        ConnectionType {
            kind,
            name: name.to_owned(),
        }
    }

    pub fn stream(name: &str) -> Self {
        Self::new(TransportKind::Stream, name)
    }

    pub fn datagram(name: &str) -> Self {
        Self::new(TransportKind::Datagram, name)
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_stream(&self) -> bool {
        self.kind.is_stream()
    }

    pub fn matches(&self, other: &ConnectionType) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.kind)
    }
}
