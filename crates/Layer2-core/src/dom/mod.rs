//! Host Document Model - 호스트 문서/윈도우/프레임의 인메모리 모델
//!
//! 플러그인 코어가 의존하는 호스트 측 협력자입니다:
//! - `Document`: ready state, 1회성 content-loaded 신호, 요소 조회, 커스텀 이벤트
//! - `Window`: 문서를 소유하는 실행 환경
//! - `Frame`: 편집 캔버스를 담는 임베디드 프레임 (content window는 없을 수 있음)
//!
//! 실제 DOM 바인딩은 이 크레이트의 범위가 아니며, 같은 계약을 가진
//! 다른 구현으로 교체될 수 있습니다.

mod element;

pub use element::{ClickEvent, ClickHandler, Element};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// `Loading`을 벗어날 때 디스패치되는 이벤트
pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";

/// `Complete`에 도달할 때 디스패치되는 이벤트
pub const LOAD: &str = "load";

const EVENT_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// ReadyState
// ============================================================================

/// 문서 로딩 상태 (순서대로만 진행)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// 플러그인을 즉시 마운트할 수 있는 상태인지
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DocumentEvent
// ============================================================================

/// 문서에서 디스패치된 이벤트
#[derive(Debug, Clone)]
pub struct DocumentEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

impl DocumentEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: Utc::now(),
        }
    }
}

/// content-loaded 신호 리스너 (1회성)
pub type LoadListener = Box<dyn FnOnce() + Send>;

struct Readiness {
    state: ReadyState,
    listeners: Vec<LoadListener>,
}

// ============================================================================
// Document
// ============================================================================

/// 호스트 문서
pub struct Document {
    label: String,
    readiness: Mutex<Readiness>,
    /// 셀렉터 -> 자식 요소 (추가 순서)
    mount_points: Mutex<HashMap<String, Vec<Arc<Element>>>>,
    /// id -> 요소
    elements: Mutex<HashMap<String, Arc<Element>>>,
    /// 셀렉터 -> 프레임
    frames: Mutex<HashMap<String, Arc<Frame>>>,
    events: broadcast::Sender<DocumentEvent>,
}

impl Document {
    pub fn new(label: impl Into<String>, ready_state: ReadyState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            label: label.into(),
            readiness: Mutex::new(Readiness {
                state: ready_state,
                listeners: Vec::new(),
            }),
            mount_points: Mutex::new(HashMap::new()),
            elements: Mutex::new(HashMap::new()),
            frames: Mutex::new(HashMap::new()),
            events,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    // ========================================================================
    // Ready state
    // ========================================================================

    pub fn ready_state(&self) -> ReadyState {
        self.readiness.lock().state
    }

    /// ready state 전환
    ///
    /// 뒤로 가는 전환은 무시합니다. `Loading`을 벗어나는 순간 대기 중인
    /// 리스너를 모두 꺼내 한 번씩 실행합니다 (락 밖에서).
    pub fn set_ready_state(&self, next: ReadyState) {
        let (previous, listeners) = {
            let mut readiness = self.readiness.lock();
            if next <= readiness.state {
                return;
            }
            let previous = readiness.state;
            readiness.state = next;
            let listeners = if previous == ReadyState::Loading {
                std::mem::take(&mut readiness.listeners)
            } else {
                Vec::new()
            };
            (previous, listeners)
        };

        debug!(
            document = %self.label,
            from = %previous,
            to = %next,
            listeners = listeners.len(),
            "Document ready state changed"
        );

        if previous == ReadyState::Loading {
            self.dispatch_event(DOM_CONTENT_LOADED);
            for listener in listeners {
                listener();
            }
        }
        if next == ReadyState::Complete {
            self.dispatch_event(LOAD);
        }
    }

    /// content-loaded 리스너 등록
    ///
    /// 문서가 이미 `Loading`을 벗어났다면 등록하지 않고 리스너를 그대로
    /// 돌려줍니다. 확인과 등록은 하나의 락 안에서 이루어집니다.
    pub fn add_content_loaded_listener(&self, listener: LoadListener) -> Option<LoadListener> {
        let mut readiness = self.readiness.lock();
        if readiness.state.is_ready() {
            return Some(listener);
        }
        readiness.listeners.push(listener);
        None
    }

    /// 대기 중인 content-loaded 리스너 수
    pub fn pending_listeners(&self) -> usize {
        self.readiness.lock().listeners.len()
    }

    // ========================================================================
    // Elements
    // ========================================================================

    /// 자식을 붙일 수 있는 컨테이너 등록
    pub fn add_mount_point(&self, selector: impl Into<String>) {
        self.mount_points.lock().entry(selector.into()).or_default();
    }

    pub fn has_mount_point(&self, selector: &str) -> bool {
        self.mount_points.lock().contains_key(selector)
    }

    /// 컨테이너에 요소 추가
    ///
    /// 컨테이너가 없으면 `false`. id가 있는 요소는 id로 조회할 수 있게 됩니다.
    pub fn append_child(&self, selector: &str, element: Arc<Element>) -> bool {
        let mut mount_points = self.mount_points.lock();
        let Some(children) = mount_points.get_mut(selector) else {
            return false;
        };

        if let Some(id) = element.id() {
            self.elements
                .lock()
                .insert(id.to_string(), Arc::clone(&element));
        }
        children.push(element);
        true
    }

    pub fn children(&self, selector: &str) -> Vec<Arc<Element>> {
        self.mount_points
            .lock()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Arc<Element>> {
        self.elements.lock().get(id).cloned()
    }

    // ========================================================================
    // Frames
    // ========================================================================

    pub fn attach_frame(&self, selector: impl Into<String>, frame: Arc<Frame>) {
        self.frames.lock().insert(selector.into(), frame);
    }

    pub fn detach_frame(&self, selector: &str) -> Option<Arc<Frame>> {
        self.frames.lock().remove(selector)
    }

    pub fn query_frame(&self, selector: &str) -> Option<Arc<Frame>> {
        self.frames.lock().get(selector).cloned()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// 커스텀 이벤트 디스패치 (수신자가 없어도 OK)
    pub fn dispatch_event(&self, name: &str) {
        let _ = self.events.send(DocumentEvent::new(name));
    }

    /// 이 문서의 이벤트 스트림
    pub fn events(&self) -> broadcast::Receiver<DocumentEvent> {
        self.events.subscribe()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("label", &self.label)
            .field("ready_state", &self.ready_state())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Window / Frame
// ============================================================================

/// 문서를 담는 윈도우
#[derive(Debug)]
pub struct Window {
    label: String,
    document: Arc<Document>,
}

impl Window {
    pub fn new(label: impl Into<String>, document: Arc<Document>) -> Self {
        Self {
            label: label.into(),
            document,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }
}

/// 임베디드 콘텐츠 프레임
#[derive(Debug)]
pub struct Frame {
    id: String,
    content: Mutex<Option<Arc<Window>>>,
}

impl Frame {
    /// 아직 콘텐츠가 없는 프레임
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Mutex::new(None),
        }
    }

    pub fn with_content(id: impl Into<String>, window: Arc<Window>) -> Self {
        let frame = Self::new(id);
        frame.load(window);
        frame
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 프레임에 콘텐츠 윈도우 로드 (기존 콘텐츠 교체)
    pub fn load(&self, window: Arc<Window>) {
        *self.content.lock() = Some(window);
    }

    pub fn unload(&self) -> Option<Arc<Window>> {
        self.content.lock().take()
    }

    pub fn content_window(&self) -> Option<Arc<Window>> {
        self.content.lock().clone()
    }

    pub fn content_document(&self) -> Option<Arc<Document>> {
        self.content
            .lock()
            .as_ref()
            .map(|w| Arc::clone(w.document()))
    }
}
