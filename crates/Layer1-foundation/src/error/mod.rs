//! Error types for Forge Plugin Host
//!
//! 모든 에러를 중앙에서 관리

use std::any::Any;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Forge Plugin Host 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 플러그인 관련
    // ========================================================================
    #[error("Invalid plugin: {0}")]
    InvalidPlugin(String),

    #[error("Mount failed: {plugin} - {message}")]
    Mount { plugin: String, message: String },

    // ========================================================================
    // 콜백 격리 경계
    // ========================================================================
    #[error("Callback panicked: {0}")]
    Panicked(String),

    #[error("Subscriber failed on {topic}: {message}")]
    Subscriber { topic: String, message: String },

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 플러그인/구독자 코드에서 발생한 에러인지 확인
    ///
    /// 이 에러들은 격리 경계에서 로그만 남기고 호스트로 전파하지 않습니다.
    pub fn is_plugin_fault(&self) -> bool {
        matches!(
            self,
            Error::Mount { .. } | Error::Panicked(_) | Error::Subscriber { .. } | Error::Internal(_)
        )
    }

    /// Mount 에러 생성 헬퍼
    pub fn mount(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Mount {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// 구독자 실패를 토픽 정보와 함께 감싸기
    pub fn subscriber(topic: impl Into<String>, source: Error) -> Self {
        Error::Subscriber {
            topic: topic.into(),
            message: source.to_string(),
        }
    }

    /// `catch_unwind` 패닉 페이로드를 에러로 변환
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Error::Panicked(message)
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
