//! Event Types - 버스에서 사용되는 이벤트/콜백 타입 정의

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// BusEvent - 발행된 이벤트 기록
// ============================================================================

/// 버스를 통해 발행된 이벤트
///
/// 히스토리와 브로드캐스트 스트림에 기록되는 단위입니다. 구독자 콜백은
/// 이 구조체가 아니라 payload만 전달받습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusEvent {
    /// 이벤트 ID
    pub id: EventId,

    /// 토픽 이름 (예: "plugin:mounted")
    pub topic: String,

    /// 페이로드
    pub payload: Value,

    /// 발행 시간
    pub timestamp: DateTime<Utc>,
}

impl BusEvent {
    /// 새 이벤트 생성
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            id: EventId::new(),
            topic: topic.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Callback - 구독자 콜백
// ============================================================================

type CallbackFn = dyn Fn(&Value) -> Result<()> + Send + Sync;

/// 구독자 콜백
///
/// 동일성은 값이 아니라 내부 `Arc`의 주소로 판단합니다. 같은 콜백으로
/// 해제하려면 등록에 사용한 핸들(또는 그 clone)을 보관해야 합니다.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    /// 클로저로 콜백 생성
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// 콜백 호출
    pub fn call(&self, payload: &Value) -> Result<()> {
        (self.0)(payload)
    }

    /// 두 핸들이 같은 콜백을 가리키는지 확인
    pub fn same_as(&self, other: &Callback) -> bool {
        // vtable 포인터는 비교하지 않음
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_identity() {
        let a = Callback::new(|_| Ok(()));
        let b = Callback::new(|_| Ok(()));
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_bus_event_new() {
        let event = BusEvent::new("plugin:mounted", serde_json::json!({"id": "x"}));
        assert_eq!(event.topic, "plugin:mounted");
        assert_eq!(event.payload["id"], "x");
        assert_ne!(event.id, BusEvent::new("t", Value::Null).id);
    }
}
