//! Configuration Loader
//!
//! ## 검색 우선순위
//!
//! 1. User-level: `~/.forgecode/plugin-host.json`
//! 2. Project-level: `.forgecode/plugin-host.json`
//! 3. Local (gitignored): `.forgecode/plugin-host.local.json`
//!
//! 각 레벨의 설정이 이전 레벨을 키 단위로 오버라이드합니다.

use super::host::{HostConfig, HOST_CONFIG_FILE, HOST_CONFIG_LOCAL_FILE};
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 설정 폴더 이름
pub const CONFIG_DIR_NAME: &str = ".forgecode";

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct ConfigPath {
    path: PathBuf,
    description: &'static str,
}

/// 설정 로더
pub struct ConfigLoader {
    search_paths: Vec<ConfigPath>,
}

impl ConfigLoader {
    /// 새 로더 생성 (기본 검색 경로, 낮은 우선순위부터)
    pub fn new(working_dir: &Path) -> Self {
        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(ConfigPath {
                path: home.join(CONFIG_DIR_NAME).join(HOST_CONFIG_FILE),
                description: "User settings",
            });
        }

        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join(HOST_CONFIG_FILE),
            description: "Project settings",
        });

        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join(HOST_CONFIG_LOCAL_FILE),
            description: "Local settings",
        });

        Self { search_paths: paths }
    }

    /// 커스텀 검색 경로로 생성 (뒤쪽이 우선)
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .map(|path| ConfigPath {
                path,
                description: "Custom",
            })
            .collect();

        Self { search_paths }
    }

    /// 모든 경로에서 설정 로드하여 병합
    ///
    /// 읽을 수 없는 파일은 경고 후 건너뜁니다.
    pub fn load_all(&self) -> Result<HostConfig> {
        let mut merged = serde_json::to_value(HostConfig::default())?;

        for config_path in &self.search_paths {
            if !config_path.path.exists() {
                continue;
            }

            match read_json(&config_path.path) {
                Ok(layer) => {
                    info!(
                        "Loaded {} from: {}",
                        config_path.description,
                        config_path.path.display()
                    );
                    merge_values(&mut merged, layer);
                }
                Err(e) => {
                    warn!(
                        "Failed to load settings from {}: {}",
                        config_path.path.display(),
                        e
                    );
                }
            }
        }

        serde_json::from_value(merged)
            .map_err(|e| Error::Config(format!("Invalid merged settings: {}", e)))
    }

    /// 존재하는 설정 파일 목록
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.exists())
            .map(|p| p.path.clone())
            .collect()
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(Error::Config(format!(
            "{} must contain a JSON object",
            path.display()
        )));
    }
    Ok(value)
}

/// 오브젝트는 재귀 병합, 그 외 값은 덮어쓰기
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        debug!(key = %key, "Unknown settings key kept for deserialization");
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
