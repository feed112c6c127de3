use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Port `{port}` exposes `{operation}` without a return type")]
    MissingReturnType { port: String, operation: String },

    #[error("Port `{port}` exposes `{operation}` more than once")]
    DuplicateOperation { port: String, operation: String },

    #[error("Backend `{backend}` does not implement `{operation}` required by port `{port}`")]
    MissingBackendOperation {
        port: String,
        backend: String,
        operation: String,
    },

    #[error("Port `{port}` does not expose `{operation}`")]
    UnknownOperation { port: String, operation: String },

    #[error("Operation `{operation}` returns `{declared}`, not `{requested}`")]
    ReturnTypeMismatch {
        operation: String,
        declared: String,
        requested: String,
    },

    #[error("Cannot assign field `{field}` of `{entity}`: {source}")]
    FieldMappingError {
        entity: String,
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Backend `{backend}` failed in `{operation}`: {message}")]
    BackendError {
        backend: String,
        operation: String,
        message: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Contract,
    Mapping,
    Backend,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a failure of this severity. Never zero.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl GatewayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::ConfigError { .. }
            | GatewayError::InvalidConfigValueError { .. }
            | GatewayError::MissingConfigError { .. }
            | GatewayError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            GatewayError::MissingReturnType { .. }
            | GatewayError::DuplicateOperation { .. }
            | GatewayError::MissingBackendOperation { .. }
            | GatewayError::UnknownOperation { .. }
            | GatewayError::ReturnTypeMismatch { .. } => ErrorCategory::Contract,
            GatewayError::FieldMappingError { .. }
            | GatewayError::SerializationError(_)
            | GatewayError::ProcessingError { .. } => ErrorCategory::Mapping,
            GatewayError::BackendError { .. } => ErrorCategory::Backend,
            GatewayError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 契約錯誤代表程式本身組裝錯誤，無法靠重試解決
            ErrorCategory::Contract => ErrorSeverity::Critical,
            ErrorCategory::Configuration | ErrorCategory::Mapping => ErrorSeverity::High,
            ErrorCategory::Backend | ErrorCategory::Io => ErrorSeverity::Medium,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GatewayError::IoError(e) => format!("Could not read or write a file: {}", e),
            GatewayError::MissingBackendOperation {
                backend, operation, ..
            } => format!("The backend `{}` cannot serve `{}`", backend, operation),
            GatewayError::UnknownOperation { operation, .. } => {
                format!("`{}` is not an operation of this gateway", operation)
            }
            GatewayError::FieldMappingError { entity, field, .. } => {
                format!("A record could not be turned into a {} (field `{}`)", entity, field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
            ErrorCategory::Contract => {
                "Make the backend operation table and the port declaration agree"
            }
            ErrorCategory::Mapping => "Check that record values match the domain field types",
            ErrorCategory::Backend => "Check that the record source is bound and reachable",
            ErrorCategory::Io => "Make sure the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
