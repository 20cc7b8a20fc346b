//! Host Configuration - 플러그인 호스트 설정
//!
//! 모든 필드는 기본값을 가지므로 설정 파일에는 바꾸고 싶은 키만 적으면 됩니다.

use crate::event::EventBusConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 설정 파일명
pub const HOST_CONFIG_FILE: &str = "plugin-host.json";

/// 로컬(gitignored) 설정 파일명
pub const HOST_CONFIG_LOCAL_FILE: &str = "plugin-host.local.json";

/// 이벤트 버스 설정 (저장용)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusSettings {
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,
    /// 히스토리 보관 개수
    pub history_size: usize,
    /// 모든 이벤트 trace 로깅
    pub debug_mode: bool,
}

impl Default for EventBusSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            history_size: 100,
            debug_mode: false,
        }
    }
}

impl EventBusSettings {
    pub fn to_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            channel_capacity: self.channel_capacity,
            history_size: self.history_size,
            debug_mode: self.debug_mode,
        }
    }
}

/// 플러그인 호스트 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// 캔버스 프레임 셀렉터
    pub frame_selector: String,

    /// 툴바 버튼 마운트 지점 (앞에서부터 시도)
    pub toolbar_selectors: Vec<String>,

    /// 툴바 버튼 클래스
    pub toolbar_button_class: String,

    /// 아이콘 미지정 시 기본 마크업
    pub default_icon_html: String,

    /// 토스트 자동 해제 시간 (ms)
    pub toast_duration_ms: u64,

    /// 스냅샷 요청 시 디스패치하는 이벤트 이름
    pub snapshot_event: String,

    /// 이벤트 버스
    pub event_bus: EventBusSettings,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frame_selector: "#fg-frame".to_string(),
            toolbar_selectors: vec![
                ".fg-c-toolbar .ml-auto".to_string(),
                ".fg-topbar .d-flex:last-child".to_string(),
            ],
            toolbar_button_class: "fg-btn modula-button modula-gray ml-2".to_string(),
            default_icon_html: r#"<i class="far fa-plug"></i>"#.to_string(),
            toast_duration_ms: 1400,
            snapshot_event: "forge:snapshot".to_string(),
            event_bus: EventBusSettings::default(),
        }
    }
}

impl HostConfig {
    /// JSON 파일에서 로드
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// JSON 파일로 저장
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 토스트 표시 시간
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.frame_selector, "#fg-frame");
        assert_eq!(config.toolbar_selectors.len(), 2);
        assert_eq!(config.toast_duration(), Duration::from_millis(1400));
        assert_eq!(config.event_bus.to_bus_config().history_size, 100);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HOST_CONFIG_FILE);
        std::fs::write(&path, r#"{ "toast_duration_ms": 3000, "event_bus": { "debug_mode": true } }"#)
            .unwrap();

        let config = HostConfig::load_from(&path).unwrap();
        assert_eq!(config.toast_duration_ms, 3000);
        assert!(config.event_bus.debug_mode);
        assert_eq!(config.event_bus.channel_capacity, 1024);
        assert_eq!(config.snapshot_event, "forge:snapshot");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(HOST_CONFIG_FILE);

        let mut config = HostConfig::default();
        config.frame_selector = "#canvas".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(HostConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HOST_CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(HostConfig::load_from(&path), Err(Error::Config(_))));
    }
}
