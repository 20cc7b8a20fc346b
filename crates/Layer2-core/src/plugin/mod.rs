//! # Plugin System
//!
//! 에디터 확장 플러그인의 등록과 라이프사이클
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PluginManager                           │
//! │  ┌───────────────────────────────────────────────────────┐ │
//! │  │                   PluginRegistry                       │ │
//! │  │  id -> PluginDefinition + PluginState (write-once)     │ │
//! │  └───────────────────────────────────────────────────────┘ │
//! │                          │ readiness gate (Document)        │
//! │                          ▼                                  │
//! │  ┌───────────────────────────────────────────────────────┐ │
//! │  │  MountContextBuilder -> MountContext                   │ │
//! │  │  - host / target / frame                              │ │
//! │  │  - editor_document / canvas_document / canvas_window  │ │
//! │  └───────────────────────────────────────────────────────┘ │
//! │                          │ mount(ctx) (catch_unwind)        │
//! │                          ▼                                  │
//! │              EventBus: "plugin:mounted" { id }              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 상태
//!
//! `AwaitingReady → PendingMount → Mounting → Mounted | MountFailed`
//!
//! 종료 상태에서는 다시 전이하지 않으며 실패한 마운트는 재시도하지 않습니다.

mod context;
mod events;
mod manager;
mod registry;
mod traits;

pub use context::{MountContext, MountContextBuilder, MountTarget};
pub use events::{mounted_payload, mounted_plugin_id, PLUGIN_MOUNTED};
pub use manager::{PluginManager, Registration};
pub use registry::{PluginInfo, PluginRegistry, PluginState, PluginSummary};
pub use traits::{MountFn, Plugin, PluginDefinition};
