//! Element - 문서에 삽입되는 요소

use std::fmt;
use std::sync::Arc;

/// 클릭 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// 클릭된 요소의 id
    pub target_id: Option<String>,
}

/// 클릭 핸들러
pub type ClickHandler = Arc<dyn Fn(&ClickEvent) + Send + Sync>;

/// 문서 요소
pub struct Element {
    id: Option<String>,
    tag: String,
    class_name: String,
    inner_html: String,
    on_click: Option<ClickHandler>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            class_name: String::new(),
            inner_html: String::new(),
            on_click: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn with_click_handler(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// 클릭 시뮬레이션 (핸들러가 없으면 무시)
    pub fn click(&self) {
        if let Some(handler) = &self.on_click {
            handler(&ClickEvent {
                target_id: self.id.clone(),
            });
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("class_name", &self.class_name)
            .field("inner_html", &self.inner_html)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}
