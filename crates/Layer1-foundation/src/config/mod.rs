//! Config - 호스트 설정 관리
//!
//! - `host.rs` - HostConfig 통합 설정
//! - `loader.rs` - 계층형 설정 파일 로더

mod host;
mod loader;

pub use host::{EventBusSettings, HostConfig, HOST_CONFIG_FILE, HOST_CONFIG_LOCAL_FILE};
pub use loader::{ConfigLoader, CONFIG_DIR_NAME};
