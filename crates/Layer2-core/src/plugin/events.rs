//! Plugin Events - 라이프사이클 알림 토픽

use serde_json::Value;

/// 플러그인 마운트 성공 시 발행
pub const PLUGIN_MOUNTED: &str = "plugin:mounted";

/// `plugin:mounted` 페이로드 생성
pub fn mounted_payload(plugin_id: &str) -> Value {
    serde_json::json!({ "id": plugin_id })
}

/// `plugin:mounted` 페이로드에서 플러그인 ID 추출
pub fn mounted_plugin_id(payload: &Value) -> Option<&str> {
    payload.get("id").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mounted_payload() {
        let payload = mounted_payload("demo");
        assert_eq!(mounted_plugin_id(&payload), Some("demo"));
        assert_eq!(mounted_plugin_id(&Value::Null), None);
    }
}
