//! Event Bus - 토픽 기반 발행/구독 시스템
//!
//! 호스트 전역 알림을 위한 동기식 pub/sub. 구독자 실패는 격리되며
//! 발행자에게 전파되지 않습니다.

use super::types::{BusEvent, Callback};
use crate::error::{Error, Result};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

// ============================================================================
// EventBusConfig
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,

    /// 이벤트 히스토리 보관 개수
    pub history_size: usize,

    /// 디버그 모드 (모든 이벤트 로깅)
    pub debug_mode: bool,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            history_size: 100,
            debug_mode: false,
        }
    }
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스
///
/// ## 사용법
///
/// ```ignore
/// use forge_foundation::event::{Callback, EventBus};
///
/// let bus = EventBus::new();
///
/// let cb = Callback::new(|payload| {
///     println!("mounted: {}", payload["id"]);
///     Ok(())
/// });
/// bus.subscribe("plugin:mounted", &cb);
///
/// bus.publish("plugin:mounted", serde_json::json!({ "id": "demo" }));
///
/// bus.unsubscribe("plugin:mounted", &cb);
/// ```
pub struct EventBus {
    /// 설정
    config: EventBusConfig,

    /// 브로드캐스트 채널 송신자
    sender: broadcast::Sender<BusEvent>,

    /// 토픽별 구독자 (구독 순서 유지)
    topics: RwLock<HashMap<String, Vec<Callback>>>,

    /// 이벤트 히스토리
    history: Mutex<Vec<BusEvent>>,

    /// 발행된 이벤트 수
    event_count: AtomicU64,
}

impl EventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));

        Self {
            config,
            sender,
            topics: RwLock::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
            event_count: AtomicU64::new(0),
        }
    }

    /// 구독자 등록
    ///
    /// 같은 콜백(동일 핸들)을 두 번 등록해도 한 번만 유지됩니다.
    pub fn subscribe(&self, topic: impl Into<String>, callback: &Callback) {
        let topic = topic.into();
        let mut topics = self.topics.write();
        let subscribers = topics.entry(topic.clone()).or_default();

        if subscribers.iter().any(|cb| cb.same_as(callback)) {
            return;
        }

        subscribers.push(callback.clone());
        debug!(topic = %topic, subscribers = subscribers.len(), "Subscribed to topic");
    }

    /// 구독자 해제
    ///
    /// 토픽이나 콜백이 없으면 아무 일도 하지 않고 `false`를 반환합니다.
    pub fn unsubscribe(&self, topic: &str, callback: &Callback) -> bool {
        let mut topics = self.topics.write();
        let Some(subscribers) = topics.get_mut(topic) else {
            return false;
        };

        let before = subscribers.len();
        subscribers.retain(|cb| !cb.same_as(callback));
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            topics.remove(topic);
        }

        if removed {
            debug!(topic = %topic, "Unsubscribed from topic");
        }

        removed
    }

    /// 이벤트 발행
    ///
    /// 발행 시점의 구독자 목록을 구독 순서대로 호출합니다. 실패하거나
    /// 패닉한 구독자는 건너뛰고, 발행 중 해제된 구독자는 호출하지 않습니다.
    pub fn publish(&self, topic: &str, payload: Value) {
        let event_count = self.event_count.fetch_add(1, Ordering::SeqCst);

        if self.config.debug_mode {
            trace!(topic = %topic, "Publishing event #{}", event_count + 1);
        }

        let event = BusEvent::new(topic, payload);

        // 히스토리에 추가
        {
            let mut history = self.history.lock();
            history.push(event.clone());

            if history.len() > self.config.history_size {
                let overflow = history.len() - self.config.history_size;
                history.drain(..overflow);
            }
        }

        // 브로드캐스트 채널로 전송 (수신자가 없어도 OK)
        let _ = self.sender.send(event.clone());

        let snapshot: Vec<Callback> = self
            .topics
            .read()
            .get(topic)
            .cloned()
            .unwrap_or_default();

        for callback in snapshot {
            if !self.is_subscribed(topic, &callback) {
                continue;
            }

            if self.config.debug_mode {
                trace!(topic = %topic, callback = ?callback, "Delivering event to subscriber");
            }

            if let Err(e) = deliver(topic, &callback, &event.payload) {
                trace!(error = %e, "Subscriber failed; ignored");
            }
        }
    }

    /// 콜백이 현재 토픽에 등록되어 있는지 확인
    pub fn is_subscribed(&self, topic: &str, callback: &Callback) -> bool {
        self.topics
            .read()
            .get(topic)
            .is_some_and(|subs| subs.iter().any(|cb| cb.same_as(callback)))
    }

    /// 브로드캐스트 수신자 생성 (스트림 방식)
    pub fn receiver(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    /// 최근 이벤트 히스토리 조회 (최신순)
    pub fn history(&self, limit: Option<usize>) -> Vec<BusEvent> {
        let history = self.history.lock();
        let limit = limit.unwrap_or(history.len());
        history.iter().rev().take(limit).cloned().collect()
    }

    /// 토픽으로 히스토리 검색 (발행순)
    pub fn search_history(&self, topic: &str) -> Vec<BusEvent> {
        self.history
            .lock()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// 히스토리 클리어
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// 특정 토픽의 구독자 수
    pub fn listener_count(&self, topic: &str) -> usize {
        self.topics.read().get(topic).map_or(0, Vec::len)
    }

    /// 구독자가 한 명 이상 있는 토픽 수
    pub fn topic_count(&self) -> usize {
        self.topics.read().len()
    }

    /// 총 발행된 이벤트 수
    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::SeqCst)
    }
}

/// 구독자 한 명에게 전달 (실패와 패닉은 `Error::Subscriber`로 변환)
fn deliver(topic: &str, callback: &Callback, payload: &Value) -> Result<()> {
    catch_unwind(AssertUnwindSafe(|| callback.call(payload)))
        .unwrap_or_else(|payload| Err(Error::from_panic(payload)))
        .map_err(|e| Error::subscriber(topic, e))
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &str) -> Callback {
        let log = Arc::clone(log);
        let name = name.to_string();
        Callback::new(move |_| {
            log.lock().push(name.clone());
            Ok(())
        })
    }

    #[test]
    fn test_publish_in_subscription_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["a", "b", "c"] {
            bus.subscribe("topic", &recorder(&log, name));
        }

        bus.publish("topic", Value::Null);
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failing_subscriber_is_isolated() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe("topic", &recorder(&log, "first"));
        bus.subscribe("topic", &Callback::new(|_| Err("nope".into())));
        bus.subscribe("topic", &Callback::new(|_| panic!("subscriber blew up")));
        bus.subscribe("topic", &recorder(&log, "last"));

        bus.publish("topic", Value::Null);
        assert_eq!(*log.lock(), vec!["first", "last"]);
    }

    #[test]
    fn test_payload_is_delivered() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Value::Null));
        let sink = Arc::clone(&seen);

        bus.subscribe(
            "plugin:mounted",
            &Callback::new(move |payload| {
                *sink.lock() = payload.clone();
                Ok(())
            }),
        );

        bus.publish("plugin:mounted", json!({ "id": "demo" }));
        assert_eq!(*seen.lock(), json!({ "id": "demo" }));
    }

    #[test]
    fn test_duplicate_subscribe_keeps_one_entry() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let cb = recorder(&log, "once");

        bus.subscribe("topic", &cb);
        bus.subscribe("topic", &cb.clone());
        assert_eq!(bus.listener_count("topic"), 1);

        bus.publish("topic", Value::Null);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_unsubscribe_absent_is_noop() {
        let bus = EventBus::new();
        let cb = Callback::new(|_| Ok(()));

        assert!(!bus.unsubscribe("missing", &cb));

        bus.subscribe("topic", &Callback::new(|_| Ok(())));
        assert!(!bus.unsubscribe("topic", &cb));
        assert_eq!(bus.listener_count("topic"), 1);
    }

    #[test]
    fn test_last_unsubscribe_drops_topic() {
        let bus = EventBus::new();
        let cb = Callback::new(|_| Ok(()));

        for i in 0..50 {
            let topic = format!("topic-{}", i);
            bus.subscribe(topic.clone(), &cb);
            assert!(bus.unsubscribe(&topic, &cb));
        }
        assert_eq!(bus.topic_count(), 0);

        bus.subscribe("topic-0", &cb);
        assert_eq!(bus.topic_count(), 1);
        assert_eq!(bus.listener_count("topic-0"), 1);
    }

    #[test]
    fn test_deliver_wraps_failures() {
        let failing = Callback::new(|_| Err("nope".into()));
        let panicking = Callback::new(|_| panic!("blew up"));

        let err = deliver("topic", &failing, &Value::Null).unwrap_err();
        assert!(matches!(err, Error::Subscriber { ref topic, ref message }
            if topic == "topic" && message.contains("nope")));

        let err = deliver("topic", &panicking, &Value::Null).unwrap_err();
        assert!(matches!(err, Error::Subscriber { ref message, .. } if message.contains("blew up")));
        assert!(err.is_plugin_fault());

        assert!(deliver("topic", &Callback::new(|_| Ok(())), &Value::Null).is_ok());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let cb = recorder(&log, "x");

        bus.subscribe("topic", &cb);
        bus.publish("topic", Value::Null);
        assert!(bus.unsubscribe("topic", &cb));
        bus.publish("topic", Value::Null);

        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_unsubscribe_from_inside_subscriber() {
        let bus = Arc::new(EventBus::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let later = recorder(&log, "later");

        let self_slot: Arc<Mutex<Option<Callback>>> = Arc::new(Mutex::new(None));
        let remover = {
            let bus = Arc::clone(&bus);
            let later = later.clone();
            let log = Arc::clone(&log);
            let self_slot = Arc::clone(&self_slot);
            Callback::new(move |_| {
                log.lock().push("remover".to_string());
                bus.unsubscribe("topic", &later);
                if let Some(me) = self_slot.lock().clone() {
                    bus.unsubscribe("topic", &me);
                }
                Ok(())
            })
        };
        *self_slot.lock() = Some(remover.clone());

        bus.subscribe("topic", &remover);
        bus.subscribe("topic", &later);

        // "later"는 같은 디스패치 중에 해제되었으므로 호출되지 않음
        bus.publish("topic", Value::Null);
        bus.publish("topic", Value::Null);

        assert_eq!(*log.lock(), vec!["remover"]);
        assert_eq!(bus.listener_count("topic"), 0);
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next_publish() {
        let bus = Arc::new(EventBus::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let late = recorder(&log, "late");

        let adder = {
            let bus = Arc::clone(&bus);
            let late = late.clone();
            Callback::new(move |_| {
                bus.subscribe("topic", &late);
                Ok(())
            })
        };
        bus.subscribe("topic", &adder);

        bus.publish("topic", Value::Null);
        assert!(log.lock().is_empty());

        bus.publish("topic", Value::Null);
        assert_eq!(*log.lock(), vec!["late"]);
    }

    #[test]
    fn test_event_history() {
        let config = EventBusConfig {
            history_size: 5,
            ..Default::default()
        };
        let bus = EventBus::with_config(config);

        for i in 0..10 {
            bus.publish(&format!("test.event.{}", i), Value::Null);
        }

        let history = bus.history(None);
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].topic, "test.event.9");
        assert_eq!(bus.event_count(), 10);

        assert_eq!(bus.search_history("test.event.7").len(), 1);
        assert!(bus.search_history("test.event.1").is_empty());

        bus.clear_history();
        assert!(bus.history(None).is_empty());
    }

    #[tokio::test]
    async fn test_receiver_sees_published_events() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        bus.publish("plugin:mounted", json!({ "id": "streamed" }));

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.topic, "plugin:mounted");
        assert_eq!(event.payload["id"], "streamed");
    }
}
