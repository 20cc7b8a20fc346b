//! # Capability Surface
//!
//! 마운트된 플러그인이 사용할 수 있는 호스트 기능 집합입니다.
//!
//! - 툴바 버튼 삽입
//! - 일시적 메시지 (toast)
//! - 프레임/윈도우/문서 접근자
//! - 스냅샷 요청 신호
//!
//! 시각적 효과는 호스트 UI마다 다르므로 코어는 `CapabilitySurface` 트레이트를
//! 통해서만 호출합니다. `HeadlessSurface`는 인메모리 문서 모델 위의 구현입니다.

mod headless;

pub use headless::HeadlessSurface;

use crate::dom::{ClickEvent, ClickHandler, Document, Element, Frame, Window};
use forge_foundation::HostConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// ToolbarButton
// ============================================================================

/// 툴바 버튼 요청
#[derive(Clone)]
pub struct ToolbarButton {
    /// 요소 id (문서 내 유일)
    pub id: String,

    /// 버튼 라벨
    pub label: Option<String>,

    /// 아이콘 마크업 (없으면 호스트 기본값)
    pub icon_html: Option<String>,

    /// 클릭 핸들러
    pub on_click: Option<ClickHandler>,
}

impl ToolbarButton {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            icon_html: None,
            on_click: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon_html: impl Into<String>) -> Self {
        self.icon_html = Some(icon_html.into());
        self
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ClickEvent) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }
}

// ============================================================================
// Toast
// ============================================================================

/// 표시된 일시적 메시지
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Toast {
    /// 주어진 시점에 아직 표시 중인지
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.duration
    }
}

// ============================================================================
// CapabilitySurface Trait
// ============================================================================

/// 호스트가 제공하는 기능 표면
///
/// 캔버스 접근자의 기본 구현은 프레임(또는 그 콘텐츠)이 없을 때 에디터
/// 윈도우/문서로 대체합니다.
pub trait CapabilitySurface: Send + Sync {
    /// 툴바 버튼 삽입
    ///
    /// 같은 id의 요소가 이미 있거나 마운트 지점이 없으면 `None`.
    fn add_toolbar_button(&self, button: ToolbarButton) -> Option<Arc<Element>>;

    /// 고정된 시간 뒤 사라지는 메시지 표시
    fn toast(&self, message: &str);

    /// 임베디드 콘텐츠 프레임
    fn frame(&self) -> Option<Arc<Frame>>;

    /// 호스트 자신의 윈도우
    fn editor_window(&self) -> Arc<Window>;

    /// 스냅샷 서브시스템에 요청 신호 전달
    fn snapshot(&self);

    /// 이 표면이 사용하는 호스트 설정
    fn config(&self) -> &HostConfig;

    /// 호스트 자신의 문서
    fn editor_document(&self) -> Arc<Document> {
        Arc::clone(self.editor_window().document())
    }

    /// 캔버스 윈도우 (프레임 콘텐츠, 없으면 에디터 윈도우)
    fn canvas_window(&self) -> Arc<Window> {
        self.frame()
            .and_then(|frame| frame.content_window())
            .unwrap_or_else(|| self.editor_window())
    }

    /// 캔버스 문서 (프레임 콘텐츠, 없으면 에디터 문서)
    fn canvas_document(&self) -> Arc<Document> {
        self.frame()
            .and_then(|frame| frame.content_document())
            .unwrap_or_else(|| self.editor_document())
    }
}
