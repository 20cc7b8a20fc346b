//! Plugin Manager - 플러그인 라이프사이클 관리
//!
//! 등록된 정의를 readiness gate를 거쳐 정확히 한 번 마운트하고,
//! 성공 시 `plugin:mounted`를 발행합니다. 플러그인 코드의 실패는
//! 여기서 격리되어 호스트나 다른 플러그인에 영향을 주지 않습니다.

use super::context::MountContextBuilder;
use super::events::{mounted_payload, PLUGIN_MOUNTED};
use super::registry::{PluginRegistry, PluginState, PluginSummary};
use super::traits::PluginDefinition;
use crate::capability::CapabilitySurface;
use crate::dom::{Document, LoadListener};
use crate::host::PluginHost;
use forge_foundation::{Error, EventBus};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// `register` 결과
///
/// 정보 제공용이며 무시해도 됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// 즉시 마운트됨
    Mounted,
    /// 즉시 마운트를 시도했으나 실패
    MountFailed,
    /// 문서 로딩 완료까지 마운트 연기
    Deferred,
    /// 같은 ID가 이미 등록되어 무시됨
    Duplicate,
    /// 유효하지 않은 정의
    Rejected(String),
}

impl Registration {
    /// 정의가 레지스트리에 저장되었는지
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Mounted | Self::MountFailed | Self::Deferred)
    }
}

/// 플러그인 매니저 - 레지스트리 + 라이프사이클 오케스트레이션
pub struct PluginManager {
    /// 마운트 컨텍스트에 넣을 호스트 (순환 참조 방지)
    host: Weak<PluginHost>,

    /// 플러그인 레지스트리
    registry: PluginRegistry,

    /// 이벤트 버스
    bus: Arc<EventBus>,

    /// 컨텍스트 생성기
    contexts: MountContextBuilder,

    /// readiness gate 대상 문서
    document: Arc<Document>,
}

impl PluginManager {
    pub(crate) fn new(
        host: Weak<PluginHost>,
        bus: Arc<EventBus>,
        surface: Arc<dyn CapabilitySurface>,
    ) -> Self {
        let document = surface.editor_document();
        Self {
            host,
            registry: PluginRegistry::new(),
            bus,
            contexts: MountContextBuilder::new(surface),
            document,
        }
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 플러그인 등록
    ///
    /// 문서가 이미 준비되었다면 반환 전에 마운트가 끝납니다.
    pub fn register(&self, definition: PluginDefinition) -> Registration {
        if let Err(e) = definition.validate() {
            warn!(error = %e, "[ForgePlugin] invalid plugin");
            return Registration::Rejected(e.to_string());
        }

        let id = definition.id().to_string();
        if !self.registry.insert(Arc::new(definition)) {
            debug!(plugin_id = %id, "Plugin already registered; ignoring");
            return Registration::Duplicate;
        }

        match self
            .document
            .add_content_loaded_listener(self.deferred_mount(id.clone()))
        {
            None => {
                info!(plugin_id = %id, "Host document still loading; mount deferred");
                Registration::Deferred
            }
            Some(_) => match self.mount_ready(&id) {
                PluginState::Mounted => Registration::Mounted,
                PluginState::MountFailed => Registration::MountFailed,
                // 재진입 등으로 다른 호출자가 이미 마운트 중
                _ => Registration::Deferred,
            },
        }
    }

    /// 문서 로딩 완료 시 한 번 실행되는 리스너
    fn deferred_mount(&self, id: String) -> LoadListener {
        let host = self.host.clone();
        Box::new(move || match host.upgrade() {
            Some(host) => {
                host.plugins().mount_ready(&id);
            }
            None => debug!(plugin_id = %id, "Host dropped before document was ready; mount skipped"),
        })
    }

    // ========================================================================
    // 마운트
    // ========================================================================

    fn mount_ready(&self, id: &str) -> PluginState {
        self.registry.mark_ready(id);
        self.mount_one(id)
    }

    /// 마운트 시퀀스 (ID당 최대 한 번)
    fn mount_one(&self, id: &str) -> PluginState {
        let Some(definition) = self.registry.claim_mount(id) else {
            return self.registry.state(id).unwrap_or(PluginState::Mounting);
        };

        let Some(host) = self.host.upgrade() else {
            warn!(plugin_id = %id, "Plugin host is gone; mount abandoned");
            self.registry.mark_failed(id, "plugin host is no longer available");
            return PluginState::MountFailed;
        };

        let ctx = self.contexts.build(host);
        debug!(plugin_id = %id, target = %ctx.target, "Mounting plugin");

        let outcome = catch_unwind(AssertUnwindSafe(|| definition.mount(&ctx)))
            .unwrap_or_else(|payload| Err(Error::from_panic(payload)));
        drop(ctx);

        match outcome {
            Ok(()) => {
                self.registry.mark_mounted(id);
                info!(plugin_id = %id, "Plugin mounted");
                self.bus.publish(PLUGIN_MOUNTED, mounted_payload(id));
                PluginState::Mounted
            }
            Err(e) => {
                let failure = Error::mount(id, e.to_string());
                error!(plugin_id = %id, error = %failure, "[ForgePlugin] mount error");
                self.registry.mark_failed(id, e.to_string());
                PluginState::MountFailed
            }
        }
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    /// 플러그인 레지스트리 접근
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// 플러그인 요약 정보
    pub fn summary(&self) -> PluginSummary {
        self.registry.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::HeadlessSurface;
    use crate::dom::{ReadyState, Window};
    use forge_foundation::{Callback, HostConfig};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn host_with(state: ReadyState) -> (Arc<PluginHost>, Arc<Document>) {
        let document = Arc::new(Document::new("editor", state));
        let window = Arc::new(Window::new("editor", Arc::clone(&document)));
        let surface = Arc::new(HeadlessSurface::new(window, &HostConfig::default()));
        (PluginHost::builder(surface).build(), document)
    }

    fn counting(id: &str, counter: &Arc<AtomicUsize>) -> PluginDefinition {
        let counter = Arc::clone(counter);
        PluginDefinition::new(id).on_mount(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_mount_immediately_when_ready() {
        let (host, _) = host_with(ReadyState::Interactive);
        let count = Arc::new(AtomicUsize::new(0));

        let result = host.plugins().register(counting("p", &count));

        assert_eq!(result, Registration::Mounted);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(host.registry().state("p"), Some(PluginState::Mounted));
    }

    #[test]
    fn test_deferred_until_content_loaded() {
        let (host, document) = host_with(ReadyState::Loading);
        let count = Arc::new(AtomicUsize::new(0));

        assert_eq!(
            host.plugins().register(counting("p", &count)),
            Registration::Deferred
        );
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(host.registry().state("p"), Some(PluginState::AwaitingReady));

        document.set_ready_state(ReadyState::Interactive);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        document.set_ready_state(ReadyState::Complete);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mount_error_is_recorded() {
        let (host, _) = host_with(ReadyState::Complete);

        let result = host
            .plugins()
            .register(PluginDefinition::new("bad").on_mount(|_| Err("exploded".into())));

        assert_eq!(result, Registration::MountFailed);
        assert_eq!(host.registry().state("bad"), Some(PluginState::MountFailed));
        assert!(host
            .registry()
            .failure("bad")
            .unwrap()
            .contains("exploded"));
    }

    #[test]
    fn test_mount_panic_is_isolated() {
        let (host, _) = host_with(ReadyState::Complete);

        let result = host
            .plugins()
            .register(PluginDefinition::new("panicky").on_mount(|_| panic!("mount panicked")));

        assert_eq!(result, Registration::MountFailed);
        assert!(host
            .registry()
            .failure("panicky")
            .unwrap()
            .contains("mount panicked"));
    }

    #[test]
    fn test_failed_mount_does_not_publish() {
        let (host, _) = host_with(ReadyState::Complete);
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&seen);
        host.on(
            PLUGIN_MOUNTED,
            &Callback::new(move |payload| {
                sink.lock().push(payload["id"].as_str().unwrap_or_default().to_string());
                Ok(())
            }),
        );

        host.register(PluginDefinition::new("bad").on_mount(|_| Err("no".into())));
        host.register(PluginDefinition::new("good").on_mount(|_| Ok(())));

        assert_eq!(*seen.lock(), vec!["good"]);
    }

    #[test]
    fn test_deferred_mount_skipped_after_host_dropped() {
        let (host, document) = host_with(ReadyState::Loading);
        let count = Arc::new(AtomicUsize::new(0));

        host.register(counting("p", &count));
        drop(host);

        document.set_ready_state(ReadyState::Complete);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_summary_counts() {
        let (host, document) = host_with(ReadyState::Loading);
        let count = Arc::new(AtomicUsize::new(0));

        host.register(counting("a", &count));
        host.register(PluginDefinition::new("b").on_mount(|_| Err("x".into())));
        assert_eq!(host.plugins().summary().awaiting_ready, 2);

        document.set_ready_state(ReadyState::Interactive);
        let summary = host.plugins().summary();
        assert_eq!(summary.mounted, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total, 2);
    }
}
