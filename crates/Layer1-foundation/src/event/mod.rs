//! Event System - 토픽 기반 알림 버스
//!
//! 호스트와 플러그인이 공유하는 best-effort, fire-and-forget 알림 채널입니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        EventBus                              │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │  publish(topic, payload) ─────────────────────────┐ │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │         │  topic → [Callback, Callback, ...] (구독 순서)     │
//! │         ▼                                                   │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │  Callback 1  │  │  Callback 2  │  │  Callback N  │      │
//! │  │  (plugin)    │  │  (host UI)   │  │  (snapshot)  │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! │         ▲ 실패/패닉은 콜백 단위로 격리                         │
//! │                                                             │
//! │  history (최근 N개)      broadcast::Receiver (스트림)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod bus;
pub mod types;

// Re-exports
pub use bus::{EventBus, EventBusConfig};
pub use types::{BusEvent, Callback, EventId};
