/// Host-side errors
use crate::binding::BindError;
use crate::plugin::ConnectionType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    #[error("host already started")]
    AlreadyStarted,

    #[error("host not started")]
    NotStarted,

    #[error("failed to configure plugin '{plugin}': {reason}")]
    Configure { plugin: String, reason: String },

    #[error("no plugin serves connection type {0}")]
    NoRoute(ConnectionType),

    #[error("failed to load configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_display() {
        assert_eq!(
            HostError::DuplicatePlugin("file".to_string()).to_string(),
            "plugin 'file' is already registered"
        );
        assert_eq!(
            HostError::NoRoute(ConnectionType::stream("syslog")).to_string(),
            "no plugin serves connection type syslog/stream"
        );
        assert_eq!(
            HostError::Configure {
                plugin: "file".to_string(),
                reason: "path is required".to_string()
            }
            .to_string(),
            "failed to configure plugin 'file': path is required"
        );
    }

    #[test]
    fn test_bind_error_converts() {
        let err: HostError = BindError::ModuleNotFound {
            module: "gelf".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "module 'gelf' not found");
    }
}
