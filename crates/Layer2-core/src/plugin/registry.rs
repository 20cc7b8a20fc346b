//! Plugin Registry - 플러그인 정의 저장소
//!
//! 키당 한 번만 기록되며 항목은 제거되지 않습니다.

use super::traits::PluginDefinition;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 플러그인 라이프사이클 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// 등록됨, 문서 로딩 대기
    AwaitingReady,
    /// 등록됨, 마운트 가능
    PendingMount,
    /// 마운트 진행 중
    Mounting,
    /// 마운트 완료 (종료 상태)
    Mounted,
    /// 마운트 실패 (종료 상태, 재시도 없음)
    MountFailed,
}

impl PluginState {
    /// 마운트 시도가 끝났는지
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Mounted | Self::MountFailed)
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingReady => write!(f, "awaiting_ready"),
            Self::PendingMount => write!(f, "pending_mount"),
            Self::Mounting => write!(f, "mounting"),
            Self::Mounted => write!(f, "mounted"),
            Self::MountFailed => write!(f, "mount_failed"),
        }
    }
}

/// 레지스트리 항목
struct PluginEntry {
    definition: Arc<PluginDefinition>,
    state: PluginState,
    order: usize,
    registered_at: DateTime<Utc>,
    failure: Option<String>,
}

/// 플러그인 정보 스냅샷
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub id: String,
    pub state: PluginState,
    /// 등록 순서 (1부터)
    pub order: usize,
    pub registered_at: DateTime<Utc>,
    pub failure: Option<String>,
    pub has_unmount: bool,
}

/// 상태별 플러그인 수
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub total: usize,
    pub awaiting_ready: usize,
    pub pending: usize,
    pub mounted: usize,
    pub failed: usize,
}

/// 플러그인 레지스트리
pub struct PluginRegistry {
    /// 플러그인 저장소 (ID -> PluginEntry)
    plugins: RwLock<HashMap<String, PluginEntry>>,

    /// 등록 카운터
    counter: AtomicUsize,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
            counter: AtomicUsize::new(0),
        }
    }

    /// 정의 저장
    ///
    /// 같은 ID가 이미 있으면 기존 항목을 건드리지 않고 `false`를 반환합니다.
    pub fn insert(&self, definition: Arc<PluginDefinition>) -> bool {
        let id = definition.id().to_string();
        let mut plugins = self.plugins.write();

        if plugins.contains_key(&id) {
            return false;
        }

        let order = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        plugins.insert(
            id.clone(),
            PluginEntry {
                definition,
                state: PluginState::AwaitingReady,
                order,
                registered_at: Utc::now(),
                failure: None,
            },
        );

        debug!(plugin_id = %id, order, "Registered plugin");
        true
    }

    // ========================================================================
    // 상태 전이
    // ========================================================================

    fn transition(&self, id: &str, from: PluginState, to: PluginState) -> bool {
        let mut plugins = self.plugins.write();
        match plugins.get_mut(id) {
            Some(entry) if entry.state == from => {
                entry.state = to;
                debug!(plugin_id = %id, from = %from, to = %to, "Plugin state changed");
                true
            }
            _ => false,
        }
    }

    /// AwaitingReady -> PendingMount
    pub fn mark_ready(&self, id: &str) -> bool {
        self.transition(id, PluginState::AwaitingReady, PluginState::PendingMount)
    }

    /// PendingMount -> Mounting
    ///
    /// 성공한 호출자만 정의를 받으므로 마운트는 최대 한 번 시도됩니다.
    pub fn claim_mount(&self, id: &str) -> Option<Arc<PluginDefinition>> {
        if !self.transition(id, PluginState::PendingMount, PluginState::Mounting) {
            return None;
        }
        self.get(id)
    }

    /// Mounting -> Mounted
    pub fn mark_mounted(&self, id: &str) -> bool {
        self.transition(id, PluginState::Mounting, PluginState::Mounted)
    }

    /// Mounting -> MountFailed
    pub fn mark_failed(&self, id: &str, message: impl Into<String>) -> bool {
        let mut plugins = self.plugins.write();
        match plugins.get_mut(id) {
            Some(entry) if entry.state == PluginState::Mounting => {
                entry.state = PluginState::MountFailed;
                entry.failure = Some(message.into());
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn get(&self, id: &str) -> Option<Arc<PluginDefinition>> {
        self.plugins
            .read()
            .get(id)
            .map(|entry| Arc::clone(&entry.definition))
    }

    pub fn state(&self, id: &str) -> Option<PluginState> {
        self.plugins.read().get(id).map(|entry| entry.state)
    }

    /// 마운트 실패 메시지
    pub fn failure(&self, id: &str) -> Option<String> {
        self.plugins
            .read()
            .get(id)
            .and_then(|entry| entry.failure.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }

    /// 등록 순서대로 정렬된 ID 목록
    pub fn ids(&self) -> Vec<String> {
        self.list().into_iter().map(|info| info.id).collect()
    }

    /// 등록 순서대로 정렬된 플러그인 정보
    pub fn list(&self) -> Vec<PluginInfo> {
        let plugins = self.plugins.read();
        let mut infos: Vec<PluginInfo> = plugins
            .iter()
            .map(|(id, entry)| PluginInfo {
                id: id.clone(),
                state: entry.state,
                order: entry.order,
                registered_at: entry.registered_at,
                failure: entry.failure.clone(),
                has_unmount: entry.definition.has_unmount(),
            })
            .collect();

        infos.sort_by_key(|info| info.order);
        infos
    }

    pub fn summary(&self) -> PluginSummary {
        let plugins = self.plugins.read();
        let mut summary = PluginSummary {
            total: plugins.len(),
            ..Default::default()
        };

        for entry in plugins.values() {
            match entry.state {
                PluginState::AwaitingReady => summary.awaiting_ready += 1,
                PluginState::PendingMount | PluginState::Mounting => summary.pending += 1,
                PluginState::Mounted => summary.mounted += 1,
                PluginState::MountFailed => summary.failed += 1,
            }
        }

        summary
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
