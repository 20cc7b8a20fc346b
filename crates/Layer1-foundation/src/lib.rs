//! # forge-foundation
//!
//! Foundation layer for Forge Plugin Host:
//! - Error: 공통 에러 타입 (플러그인/구독자 격리 경계 포함)
//! - Event: 토픽 기반 알림 버스 (EventBus)
//! - Config: 호스트 설정 (HostConfig, 계층형 로더)
//! - Logging: tracing 구독자 초기화
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  forge-core (PluginHost)                                │
//! │  ├── PluginRegistry / PluginManager                     │
//! │  └── CapabilitySurface (toolbar, toast, frame)          │
//! │                     │                                   │
//! │                     ▼                                   │
//! │  forge-foundation                                       │
//! │  ├── EventBus (on / off / emit)                         │
//! │  ├── HostConfig                                         │
//! │  └── Error / Result                                     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod logging;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    ConfigLoader, EventBusSettings, HostConfig, CONFIG_DIR_NAME, HOST_CONFIG_FILE,
    HOST_CONFIG_LOCAL_FILE,
};

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{BusEvent, Callback, EventBus, EventBusConfig, EventId};

// ============================================================================
// Logging
// ============================================================================
pub use logging::{init_tracing, try_init_tracing};
