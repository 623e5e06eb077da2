use serde::Serialize;

/// Result of a preflight size check, shaped for direct display by the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeCheck {
    pub valid: bool,
    pub size_mb: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SizeCheck {
    pub fn ok(size_mb: f64) -> Self {
        Self {
            valid: true,
            size_mb,
            message: None,
        }
    }

    pub fn rejected(size_mb: f64, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            size_mb,
            message: Some(message.into()),
        }
    }
}
