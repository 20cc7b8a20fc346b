//! Mount Context - 마운트 시점에 플러그인에 전달되는 컨텍스트

use crate::capability::CapabilitySurface;
use crate::dom::{Document, Frame, Window};
use crate::host::PluginHost;
use std::fmt;
use std::sync::Arc;

/// 플러그인이 마운트되는 실행 환경 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountTarget {
    Editor,
}

impl MountTarget {
    /// 현재 기능 표면 상태로부터 분류
    ///
    /// 프레임 유무와 관계없이 항상 `Editor`로 분류됩니다.
    pub fn resolve(_surface: &dyn CapabilitySurface) -> Self {
        MountTarget::Editor
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for MountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 마운트 컨텍스트
///
/// 마운트 한 번마다 새로 만들어지고 마운트가 끝나면 버려집니다.
pub struct MountContext {
    /// 호스트 API
    pub host: Arc<PluginHost>,

    /// 실행 환경 분류
    pub target: MountTarget,

    /// 캔버스 프레임 (없을 수 있음)
    pub frame: Option<Arc<Frame>>,

    /// 호스트 자신의 문서
    pub editor_document: Arc<Document>,

    /// 캔버스 문서 (프레임이 없으면 에디터 문서)
    pub canvas_document: Arc<Document>,

    /// 캔버스 윈도우 (프레임이 없으면 에디터 윈도우)
    pub canvas_window: Arc<Window>,
}

impl fmt::Debug for MountContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountContext")
            .field("target", &self.target)
            .field("frame", &self.frame.as_ref().map(|fr| fr.id().to_string()))
            .field("editor_document", &self.editor_document.label())
            .field("canvas_document", &self.canvas_document.label())
            .field("canvas_window", &self.canvas_window.label())
            .finish_non_exhaustive()
    }
}

/// 마운트 컨텍스트 생성기
pub struct MountContextBuilder {
    surface: Arc<dyn CapabilitySurface>,
}

impl MountContextBuilder {
    pub fn new(surface: Arc<dyn CapabilitySurface>) -> Self {
        Self { surface }
    }

    /// 새 컨텍스트 생성
    ///
    /// 프레임/문서 참조는 호출 시점에 조회하며 캐시하지 않습니다.
    pub fn build(&self, host: Arc<PluginHost>) -> MountContext {
        let surface = self.surface.as_ref();

        MountContext {
            host,
            target: MountTarget::resolve(surface),
            frame: surface.frame(),
            editor_document: surface.editor_document(),
            canvas_document: surface.canvas_document(),
            canvas_window: surface.canvas_window(),
        }
    }
}
