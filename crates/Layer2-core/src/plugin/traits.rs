//! Plugin traits - 플러그인 정의와 인터페이스

use super::context::MountContext;
use forge_foundation::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// 마운트/언마운트 콜백
pub type MountFn = Arc<dyn Fn(&MountContext) -> Result<()> + Send + Sync>;

// ============================================================================
// Plugin Trait
// ============================================================================

/// 타입으로 구현하는 플러그인
///
/// 클로저 대신 구조체로 플러그인을 작성할 때 사용합니다.
/// `PluginDefinition::from_plugin`으로 등록 가능한 정의로 변환됩니다.
pub trait Plugin: Send + Sync {
    /// 플러그인 ID (호스트 내 유일)
    fn id(&self) -> &str;

    /// 문서가 준비된 뒤 한 번 호출
    fn mount(&self, ctx: &MountContext) -> Result<()>;
}

// ============================================================================
// PluginDefinition
// ============================================================================

/// 등록 단위가 되는 플러그인 정의
///
/// ```ignore
/// let def = PluginDefinition::new("demo.hello")
///     .on_mount(|ctx| {
///         ctx.host.toast("hello");
///         Ok(())
///     });
/// host.register(def);
/// ```
#[derive(Clone)]
pub struct PluginDefinition {
    id: String,
    mount: Option<MountFn>,
    /// 저장만 하고 호출하지 않음
    unmount: Option<MountFn>,
}

impl PluginDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mount: None,
            unmount: None,
        }
    }

    /// 마운트 콜백 지정
    pub fn on_mount<F>(mut self, f: F) -> Self
    where
        F: Fn(&MountContext) -> Result<()> + Send + Sync + 'static,
    {
        self.mount = Some(Arc::new(f));
        self
    }

    /// 언마운트 콜백 지정
    pub fn on_unmount<F>(mut self, f: F) -> Self
    where
        F: Fn(&MountContext) -> Result<()> + Send + Sync + 'static,
    {
        self.unmount = Some(Arc::new(f));
        self
    }

    /// `Plugin` 구현체에서 정의 생성
    pub fn from_plugin(plugin: Arc<dyn Plugin>) -> Self {
        let id = plugin.id().to_string();
        Self::new(id).on_mount(move |ctx| plugin.mount(ctx))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_mount(&self) -> bool {
        self.mount.is_some()
    }

    pub fn has_unmount(&self) -> bool {
        self.unmount.is_some()
    }

    /// 등록 가능한 정의인지 검사
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidPlugin("missing plugin id".to_string()));
        }
        if self.mount.is_none() {
            return Err(Error::InvalidPlugin(format!(
                "plugin {} has no mount callback",
                self.id
            )));
        }
        Ok(())
    }

    pub(crate) fn mount(&self, ctx: &MountContext) -> Result<()> {
        match &self.mount {
            Some(mount) => mount(ctx),
            None => Err(Error::InvalidPlugin(format!(
                "plugin {} has no mount callback",
                self.id
            ))),
        }
    }
}

impl fmt::Debug for PluginDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDefinition")
            .field("id", &self.id)
            .field("mount", &self.has_mount())
            .field("unmount", &self.has_unmount())
            .finish()
    }
}
