/// Errors raised while binding a module's exports
use thiserror::Error;

/// Why a module lookup could not produce a symbol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("symbol not found")]
    NotFound,

    #[error("{0}")]
    Failed(String),
}

/// Why a module could not be bound as a sink plugin.
///
/// Every variant is fatal for that module: nothing partially bound is ever
/// handed to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("module '{module}' not found")]
    ModuleNotFound { module: String },

    #[error("module '{module}' does not export '{symbol}'")]
    MissingExport { module: String, symbol: String },

    #[error("failed to look up '{symbol}' in module '{module}': {reason}")]
    Lookup {
        module: String,
        symbol: String,
        reason: String,
    },

    #[error("export '{symbol}' of module '{module}' is not {expected}")]
    SignatureMismatch {
        module: String,
        symbol: String,
        expected: String,
    },
}

impl BindError {
    /// Name of the module the error refers to.
    pub fn module(&self) -> &str {
        match self {
            BindError::ModuleNotFound { module }
            | BindError::MissingExport { module, .. }
            | BindError::Lookup { module, .. }
            | BindError::SignatureMismatch { module, .. } => module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display() {
        let err = BindError::MissingExport {
            module: "gelf".to_string(),
            symbol: "Chunk".to_string(),
        };
        assert_eq!(err.to_string(), "module 'gelf' does not export 'Chunk'");

        let err = BindError::SignatureMismatch {
            module: "gelf".to_string(),
            symbol: "Configure".to_string(),
            expected: "fn(&PluginConfig) -> Result<(), String>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "export 'Configure' of module 'gelf' is not fn(&PluginConfig) -> Result<(), String>"
        );
    }

    #[test]
    fn test_bind_error_module() {
        let err = BindError::Lookup {
            module: "syslog".to_string(),
            symbol: "Chunk".to_string(),
            reason: "io".to_string(),
        };
        assert_eq!(err.module(), "syslog");
        assert_eq!(
            BindError::ModuleNotFound {
                module: "x".to_string()
            }
            .module(),
            "x"
        );
    }

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(LookupError::NotFound.to_string(), "symbol not found");
        assert_eq!(
            LookupError::Failed("permission denied".to_string()).to_string(),
            "permission denied"
        );
    }
}
