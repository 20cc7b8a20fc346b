//! Plugin Host - 플러그인 작성자에게 제공되는 호스트 API
//!
//! 프로세스당 하나의 인스턴스를 시작 코드가 소유한 `HostSlot`에 설치하고,
//! 필요한 곳에는 참조로 전달합니다.
//!
//! ```ignore
//! static HOST: HostSlot = HostSlot::new();
//!
//! let host = PluginHost::install(&HOST, || PluginHost::builder(surface).build());
//! host.register(PluginDefinition::new("demo").on_mount(|ctx| {
//!     ctx.host.add_toolbar_button(ToolbarButton::new("demo-btn").with_label("Demo"));
//!     Ok(())
//! }));
//! ```

use crate::capability::{CapabilitySurface, ToolbarButton};
use crate::dom::{Document, Element, Frame, Window};
use crate::plugin::{PluginDefinition, PluginManager, PluginRegistry, Registration};
use forge_foundation::{Callback, EventBus, HostConfig};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// 호스트 인스턴스를 담는 슬롯
pub type HostSlot = OnceLock<Arc<PluginHost>>;

/// 플러그인 호스트
pub struct PluginHost {
    /// 이벤트 버스
    bus: Arc<EventBus>,

    /// 레지스트리 + 라이프사이클
    plugins: PluginManager,

    /// 기능 표면 (설정의 단일 출처)
    surface: Arc<dyn CapabilitySurface>,
}

impl PluginHost {
    /// 빌더 생성
    pub fn builder(surface: Arc<dyn CapabilitySurface>) -> PluginHostBuilder {
        PluginHostBuilder { surface, bus: None }
    }

    /// 슬롯에 호스트 설치
    ///
    /// 이미 설치되어 있으면 `init`을 호출하지 않고 기존 인스턴스를 반환합니다.
    pub fn install<F>(slot: &HostSlot, init: F) -> Arc<PluginHost>
    where
        F: FnOnce() -> Arc<PluginHost>,
    {
        if let Some(existing) = slot.get() {
            debug!("Plugin host already installed; keeping existing instance");
            return Arc::clone(existing);
        }
        Arc::clone(slot.get_or_init(init))
    }

    // ========================================================================
    // 플러그인
    // ========================================================================

    /// 플러그인 등록
    pub fn register(&self, definition: PluginDefinition) -> Registration {
        self.plugins.register(definition)
    }

    // ========================================================================
    // 이벤트 (on / off / emit)
    // ========================================================================

    pub fn on(&self, topic: impl Into<String>, callback: &Callback) {
        self.bus.subscribe(topic, callback);
    }

    pub fn off(&self, topic: &str, callback: &Callback) {
        self.bus.unsubscribe(topic, callback);
    }

    pub fn emit(&self, topic: &str, payload: Value) {
        self.bus.publish(topic, payload);
    }

    // ========================================================================
    // 기능 표면 (ui / doc / snapshot)
    // ========================================================================

    /// 툴바 버튼 삽입 (중복 id 또는 마운트 지점 없음 -> `None`)
    pub fn add_toolbar_button(&self, button: ToolbarButton) -> Option<Arc<Element>> {
        self.surface.add_toolbar_button(button)
    }

    pub fn toast(&self, message: &str) {
        self.surface.toast(message);
    }

    pub fn frame(&self) -> Option<Arc<Frame>> {
        self.surface.frame()
    }

    pub fn canvas_window(&self) -> Arc<Window> {
        self.surface.canvas_window()
    }

    pub fn canvas_document(&self) -> Arc<Document> {
        self.surface.canvas_document()
    }

    pub fn editor_window(&self) -> Arc<Window> {
        self.surface.editor_window()
    }

    pub fn editor_document(&self) -> Arc<Document> {
        self.surface.editor_document()
    }

    /// 외부 스냅샷 서브시스템에 요청 신호 전달
    pub fn snapshot(&self) {
        self.surface.snapshot();
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn registry(&self) -> &PluginRegistry {
        self.plugins.registry()
    }

    pub fn surface(&self) -> &Arc<dyn CapabilitySurface> {
        &self.surface
    }

    /// 기능 표면이 사용하는 설정
    pub fn config(&self) -> &HostConfig {
        self.surface.config()
    }
}

impl fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHost")
            .field("plugins", &self.registry().len())
            .field("events_published", &self.bus.event_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PluginHostBuilder
// ============================================================================

/// 호스트 빌더
pub struct PluginHostBuilder {
    surface: Arc<dyn CapabilitySurface>,
    bus: Option<Arc<EventBus>>,
}

impl PluginHostBuilder {
    /// 외부에서 만든 버스 공유 (없으면 설정으로 새로 생성)
    pub fn bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn build(self) -> Arc<PluginHost> {
        let Self { surface, bus } = self;
        let bus = bus.unwrap_or_else(|| {
            Arc::new(EventBus::with_config(
                surface.config().event_bus.to_bus_config(),
            ))
        });

        let host = Arc::new_cyclic(|me| PluginHost {
            plugins: PluginManager::new(me.clone(), Arc::clone(&bus), Arc::clone(&surface)),
            bus,
            surface,
        });

        info!(
            document = %host.editor_document().label(),
            ready_state = %host.editor_document().ready_state(),
            "Plugin host created"
        );
        host
    }
}
