//! forge-core: Plugin Host Runtime for Forge
//!
//! Layer2 - 에디터 플러그인 호스트 레이어
//!
//! # 주요 모듈
//!
//! - `dom`: 호스트 문서 모델 (readiness, 마운트 지점, 프레임)
//! - `capability`: 플러그인에 노출되는 기능 표면 (툴바, toast, 스냅샷)
//! - `plugin`: 플러그인 레지스트리 + 라이프사이클
//! - `host`: 플러그인 작성자가 사용하는 호스트 API
//!
//! # 사용 예시
//!
//! ```ignore
//! use forge_core::{HeadlessSurface, HostSlot, PluginDefinition, PluginHost, ToolbarButton};
//!
//! static HOST: HostSlot = HostSlot::new();
//!
//! let surface = Arc::new(HeadlessSurface::new(window, &config));
//! let host = PluginHost::install(&HOST, || PluginHost::builder(surface).build());
//!
//! host.register(PluginDefinition::new("hello").on_mount(|ctx| {
//!     ctx.host.add_toolbar_button(
//!         ToolbarButton::new("hello-btn")
//!             .with_label("Hello")
//!             .on_click(|_| println!("clicked")),
//!     );
//!     ctx.host.toast("Hello plugin ready");
//!     Ok(())
//! }));
//! ```

pub mod capability;
pub mod dom;
pub mod host;
pub mod plugin;

// Re-exports: DOM
pub use dom::{
    ClickEvent, ClickHandler, Document, DocumentEvent, Element, Frame, LoadListener, ReadyState,
    Window, DOM_CONTENT_LOADED, LOAD,
};

// Re-exports: Capability
pub use capability::{CapabilitySurface, HeadlessSurface, Toast, ToolbarButton};

// Re-exports: Plugin
pub use plugin::{
    mounted_payload,
    mounted_plugin_id,
    // Context
    MountContext,
    MountContextBuilder,
    MountFn,
    MountTarget,
    // Traits
    Plugin,
    PluginDefinition,
    PluginInfo,
    // Manager
    PluginManager,
    // Registry
    PluginRegistry,
    PluginState,
    PluginSummary,
    Registration,
    // Events
    PLUGIN_MOUNTED,
};

// Re-exports: Host
pub use host::{HostSlot, PluginHost, PluginHostBuilder};

// Layer1 re-exports
pub use forge_foundation::{Callback, Error, EventBus, HostConfig, Result};

/// Layer2 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
