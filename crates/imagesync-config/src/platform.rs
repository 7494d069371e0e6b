use crate::sources::EnvSource;
use crate::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Running inside the Lambda execution environment
    Lambda,
    /// Operator CLI on a workstation or CI runner
    Local,
}

impl Platform {
    /// Lambda always sets AWS_LAMBDA_FUNCTION_NAME for the function process.
    pub fn detect_from<E: EnvSource>(env: &E) -> Self {
        if env.get_raw("AWS_LAMBDA_FUNCTION_NAME").is_some() {
            Platform::Lambda
        } else {
            Platform::Local
        }
    }

    /// Get platform-specific defaults
    pub fn defaults(&self) -> PlatformDefaults {
        match self {
            // CloudWatch Logs indexes JSON fields
            Platform::Lambda => PlatformDefaults {
                log_level: "info",
                log_format: LogFormat::Json,
            },
            Platform::Local => PlatformDefaults {
                log_level: "info",
                log_format: LogFormat::Text,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformDefaults {
    pub log_level: &'static str,
    pub log_format: LogFormat,
}
