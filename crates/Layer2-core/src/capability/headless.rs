//! Headless Surface - 인메모리 문서 모델 위의 CapabilitySurface 구현

use super::{CapabilitySurface, Toast, ToolbarButton};
use crate::dom::{Element, Frame, Window};
use forge_foundation::HostConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// 인메모리 기능 표면
pub struct HeadlessSurface {
    window: Arc<Window>,
    config: HostConfig,
    toasts: Mutex<Vec<Toast>>,
}

impl HeadlessSurface {
    pub fn new(window: Arc<Window>, config: &HostConfig) -> Self {
        Self {
            window,
            config: config.clone(),
            toasts: Mutex::new(Vec::new()),
        }
    }

    /// 현재 표시 중인 토스트
    pub fn active_toasts(&self) -> Vec<Toast> {
        self.toasts_at(Instant::now())
    }

    /// 주어진 시점에 표시 중인 토스트
    pub fn toasts_at(&self, now: Instant) -> Vec<Toast> {
        self.toasts
            .lock()
            .iter()
            .filter(|t| t.is_visible_at(now))
            .cloned()
            .collect()
    }

    /// 보관 중인 토스트
    ///
    /// 만료된 토스트는 다음 `toast` 호출 때 정리되므로, 마지막 호출 이후 만료된
    /// 것만 남아 있을 수 있습니다.
    pub fn retained_toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    fn toolbar_mount_point(&self) -> Option<&str> {
        let document = self.window.document();
        self.config
            .toolbar_selectors
            .iter()
            .map(String::as_str)
            .find(|selector| document.has_mount_point(selector))
    }
}

impl CapabilitySurface for HeadlessSurface {
    fn add_toolbar_button(&self, button: ToolbarButton) -> Option<Arc<Element>> {
        let document = self.window.document();

        let Some(mount_point) = self.toolbar_mount_point() else {
            debug!(button_id = %button.id, "No toolbar mount point found");
            return None;
        };
        if document.get_element_by_id(&button.id).is_some() {
            debug!(button_id = %button.id, "Toolbar control already exists");
            return None;
        }

        let icon = button
            .icon_html
            .as_deref()
            .unwrap_or(&self.config.default_icon_html);
        let label = button.label.as_deref().unwrap_or_default();
        let inner_html = format!("{} {}", icon, label).trim().to_string();

        let mut element = Element::new("button")
            .with_id(button.id.clone())
            .with_class(self.config.toolbar_button_class.clone())
            .with_inner_html(inner_html);
        if let Some(handler) = button.on_click {
            element = element.with_click_handler(handler);
        }

        let element = Arc::new(element);
        if !document.append_child(mount_point, Arc::clone(&element)) {
            return None;
        }

        debug!(button_id = %button.id, mount_point, "Toolbar control added");
        Some(element)
    }

    fn toast(&self, message: &str) {
        let now = Instant::now();
        let mut toasts = self.toasts.lock();
        toasts.retain(|t| t.is_visible_at(now));
        toasts.push(Toast {
            message: message.to_string(),
            shown_at: now,
            duration: self.config.toast_duration(),
        });
        debug!(toast = %message, "Toast shown");
    }

    fn frame(&self) -> Option<Arc<Frame>> {
        self.window.document().query_frame(&self.config.frame_selector)
    }

    fn editor_window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    fn snapshot(&self) {
        debug!(event = %self.config.snapshot_event, "Snapshot requested");
        self.window
            .document()
            .dispatch_event(&self.config.snapshot_event);
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ReadyState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn surface_with(mount_points: &[&str]) -> HeadlessSurface {
        let document = Arc::new(Document::new("editor", ReadyState::Complete));
        for selector in mount_points {
            document.add_mount_point(*selector);
        }
        let window = Arc::new(Window::new("editor", document));
        HeadlessSurface::new(window, &HostConfig::default())
    }

    #[test]
    fn test_add_toolbar_button() {
        let surface = surface_with(&[".fg-c-toolbar .ml-auto"]);
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);

        let button = surface
            .add_toolbar_button(
                ToolbarButton::new("my-btn")
                    .with_label("Run")
                    .on_click(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .expect("button should be created");

        assert_eq!(button.tag(), "button");
        assert_eq!(button.class_name(), "fg-btn modula-button modula-gray ml-2");
        assert_eq!(button.inner_html(), r#"<i class="far fa-plug"></i> Run"#);

        button.click();
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_button_id_returns_none() {
        let surface = surface_with(&[".fg-c-toolbar .ml-auto"]);

        assert!(surface.add_toolbar_button(ToolbarButton::new("dup")).is_some());
        assert!(surface.add_toolbar_button(ToolbarButton::new("dup")).is_none());

        let document = surface.editor_document();
        assert_eq!(document.children(".fg-c-toolbar .ml-auto").len(), 1);
    }

    #[test]
    fn test_falls_back_to_topbar() {
        let surface = surface_with(&[".fg-topbar .d-flex:last-child"]);

        let button = surface
            .add_toolbar_button(ToolbarButton::new("b").with_icon("<b>*</b>"))
            .unwrap();
        assert_eq!(button.inner_html(), "<b>*</b>");
        assert_eq!(
            surface
                .editor_document()
                .children(".fg-topbar .d-flex:last-child")
                .len(),
            1
        );
    }

    #[test]
    fn test_no_mount_point_returns_none() {
        let surface = surface_with(&[]);
        assert!(surface.add_toolbar_button(ToolbarButton::new("x")).is_none());
    }

    #[test]
    fn test_toast_expires_after_fixed_duration() {
        let surface = surface_with(&[]);
        surface.toast("Saved");

        let toast = surface.active_toasts().pop().unwrap();
        assert_eq!(toast.message, "Saved");
        assert_eq!(toast.duration, Duration::from_millis(1400));

        let later = toast.shown_at + Duration::from_millis(1401);
        assert!(surface.toasts_at(later).is_empty());
        assert_eq!(surface.retained_toasts().len(), 1);
    }

    #[test]
    fn test_expired_toasts_are_pruned_on_next_toast() {
        let mut config = HostConfig::default();
        config.toast_duration_ms = 10;
        let document = Arc::new(Document::new("editor", ReadyState::Complete));
        let surface = HeadlessSurface::new(Arc::new(Window::new("editor", document)), &config);

        surface.toast("a");
        std::thread::sleep(Duration::from_millis(30));
        surface.toast("b");

        let retained: Vec<String> = surface
            .retained_toasts()
            .into_iter()
            .map(|t| t.message)
            .collect();
        assert_eq!(retained, vec!["b"]);
    }

    #[test]
    fn test_canvas_falls_back_without_frame() {
        let surface = surface_with(&[]);

        assert!(surface.frame().is_none());
        assert!(Arc::ptr_eq(
            &surface.canvas_document(),
            &surface.editor_document()
        ));
        assert!(Arc::ptr_eq(&surface.canvas_window(), &surface.editor_window()));
    }

    #[test]
    fn test_canvas_uses_frame_content() {
        let surface = surface_with(&[]);
        let canvas = Arc::new(Document::new("canvas", ReadyState::Complete));
        let canvas_window = Arc::new(Window::new("canvas", Arc::clone(&canvas)));

        surface
            .editor_document()
            .attach_frame("#fg-frame", Arc::new(Frame::with_content("fg-frame", canvas_window)));

        assert_eq!(surface.frame().unwrap().id(), "fg-frame");
        assert!(Arc::ptr_eq(&surface.canvas_document(), &canvas));
        assert_eq!(surface.canvas_window().label(), "canvas");
    }

    #[tokio::test]
    async fn test_snapshot_dispatches_event() {
        let surface = surface_with(&[]);
        let mut events = surface.editor_document().events();

        surface.snapshot();

        assert_eq!(events.recv().await.unwrap().name, "forge:snapshot");
    }
}
