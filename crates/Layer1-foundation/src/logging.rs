//! Logging - tracing 구독자 초기화
//!
//! `RUST_LOG`가 있으면 그대로 사용하고, 없으면 `debug`/`info` 레벨로 시작합니다.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(debug: bool) -> EnvFilter {
    let log_level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 전역 tracing 구독자 설치
///
/// 이미 설치되어 있으면 패닉하므로 프로세스 시작 시 한 번만 호출합니다.
pub fn init_tracing(debug: bool) {
    tracing_subscriber::registry()
        .with(filter(debug))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// 전역 tracing 구독자 설치 (중복 호출 허용)
///
/// 새로 설치했으면 `true`를 반환합니다. 출력은 `init_tracing`과 같은 stdout 포맷입니다.
pub fn try_init_tracing(debug: bool) -> bool {
    tracing_subscriber::registry()
        .with(filter(debug))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
