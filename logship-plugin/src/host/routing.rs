/// Transport-to-plugin routing
use crate::plugin::ConnectionType;

/// Maps declared connection types to the index of the plugin serving them.
///
/// Built once at registration time from each plugin's `supported_types()`.
/// When several plugins declare the same type, the first registered wins.
#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    routes: Vec<(ConnectionType, usize)>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the types declared by plugin `index`.
    pub fn declare(&mut self, index: usize, types: &[ConnectionType]) {
        for conn_type in types {
            if let Some(existing) = self.lookup(conn_type) {
                log::warn!(
                    "Connection type {conn_type} already served by plugin #{existing}, ignoring plugin #{index}"
                );
                continue;
            }
            self.routes.push((conn_type.clone(), index));
        }
    }

    /// Scan the declarations for one matching both kind and name.
    pub fn lookup(&self, conn_type: &ConnectionType) -> Option<usize> {
        self.routes
            .iter()
            .find(|(declared, _)| declared.matches(conn_type))
            .map(|(_, index)| *index)
    }

    /// Every declared connection type, in registration order.
    pub fn connection_types(&self) -> impl Iterator<Item = &ConnectionType> {
        self.routes.iter().map(|(conn_type, _)| conn_type)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
