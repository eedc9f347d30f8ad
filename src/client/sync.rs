//! 列表同步控制器
//!
//! 每次筛选、翻页或排序变化都会发起新请求。每个请求带一个递增的代号（generation），
//! 只有代号与最新一次请求一致的响应才会写入状态；旧请求同时被中止。
//! 这样慢的旧响应永远不会覆盖新结果。

use log::{debug, warn};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{ClientError, VideoSource};
use crate::models::{ListParams, PageResult};

/// 同步阶段
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(ClientError),
}

/// 对外发布的状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub phase: SyncPhase,
    /// 最新一次请求的代号
    pub generation: u64,
    /// 最新一次请求的参数
    pub params: Option<ListParams>,
    /// 最近一次成功的结果，失败时仍保留
    pub data: Option<PageResult>,
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        self.phase == SyncPhase::Loading
    }

    pub fn error(&self) -> Option<&ClientError> {
        match &self.phase {
            SyncPhase::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub struct SyncController<S: VideoSource> {
    source: Arc<S>,
    timeout: Duration,
    state: Arc<watch::Sender<SyncState>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl<S: VideoSource> SyncController<S> {
    pub fn new(source: S, timeout: Duration) -> Self {
        Self::with_state(source, timeout, SyncState::default())
    }

    /// 以已有数据（例如服务端渲染的首屏）作为初始状态
    pub fn with_initial(source: S, timeout: Duration, params: ListParams, data: PageResult) -> Self {
        Self::with_state(
            source,
            timeout,
            SyncState {
                phase: SyncPhase::Ready,
                generation: 0,
                params: Some(params),
                data: Some(data),
            },
        )
    }

    fn with_state(source: S, timeout: Duration, initial: SyncState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            source: Arc::new(source),
            timeout,
            state: Arc::new(sender),
            in_flight: Mutex::new(None),
        }
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// 参数变化：中止旧请求，进入 loading 并发起新请求
    ///
    /// 必须在 tokio 运行时中调用。返回本次请求的代号。
    pub fn update(&self, params: ListParams) -> u64 {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.phase = SyncPhase::Loading;
            state.params = Some(params.clone());
        });
        debug!("发起列表请求 #{}: {:?}", generation, params);

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let timeout = self.timeout;
        *in_flight = Some(tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, source.fetch_videos(&params)).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Timeout(timeout)),
            };
            apply_outcome(&state, generation, outcome);
        }));

        generation
    }

    /// 翻页，保留当前筛选条件
    pub fn go_to_page(&self, page: u64) -> u64 {
        let params = self.snapshot().params.unwrap_or_default();
        self.update(params.for_page(page))
    }

    /// 用当前参数重试
    pub fn retry(&self) -> Option<u64> {
        self.snapshot().params.map(|params| self.update(params))
    }

    /// 中止进行中的请求
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
    }
}

impl<S: VideoSource> Drop for SyncController<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 写入请求结果；代号过期的结果直接丢弃
///
/// 返回是否写入。
pub(crate) fn apply_outcome(
    state: &watch::Sender<SyncState>,
    generation: u64,
    outcome: Result<PageResult, ClientError>,
) -> bool {
    state.send_if_modified(|current| {
        if current.generation != generation {
            debug!(
                "丢弃过期响应 #{}（最新 #{}）",
                generation, current.generation
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                current.phase = SyncPhase::Ready;
                current.data = Some(page);
            }
            Err(err) => {
                warn!("列表请求 #{} 失败: {}", generation, err);
                current.phase = SyncPhase::Failed(err);
            }
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    type Outcome = Result<PageResult, ClientError>;

    fn page(number: u64) -> PageResult {
        PageResult {
            items: Vec::new(),
            total: 30,
            page: number,
            per_page: 6,
            total_pages: 5,
            pages: vec![1, 2, 3, 4, 5],
            has_prev: number > 1,
            has_next: number < 5,
            prev_page: (number > 1).then(|| number - 1),
            next_page: (number < 5).then(|| number + 1),
        }
    }

    fn params(page: u64) -> ListParams {
        ListParams::default().for_page(page)
    }

    /// 由测试控制每个请求何时、以什么结果返回
    #[derive(Default)]
    struct ScriptedSource {
        pending: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
    }

    impl ScriptedSource {
        fn script(&self, page: u64) -> oneshot::Sender<Outcome> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().insert(page.to_string(), rx);
            tx
        }
    }

    impl VideoSource for Arc<ScriptedSource> {
        async fn fetch_videos(&self, params: &ListParams) -> Outcome {
            let key = params.page.clone().unwrap_or_default();
            let rx = self.pending.lock().unwrap().remove(&key);
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ClientError::Network("script dropped".into()))),
                None => Err(ClientError::Network(format!("no script for page {}", key))),
            }
        }
    }

    /// 永远不返回
    struct StalledSource;

    impl VideoSource for StalledSource {
        async fn fetch_videos(&self, _params: &ListParams) -> Outcome {
            std::future::pending().await
        }
    }

    async fn wait_until(
        rx: &mut watch::Receiver<SyncState>,
        predicate: impl FnMut(&SyncState) -> bool,
    ) -> SyncState {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
            .await
            .expect("state did not settle")
            .expect("controller dropped")
            .clone()
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let (sender, _rx) = watch::channel(SyncState {
            generation: 2,
            phase: SyncPhase::Loading,
            ..Default::default()
        });

        assert!(!apply_outcome(&sender, 1, Ok(page(1))));
        assert_eq!(sender.borrow().phase, SyncPhase::Loading);
        assert_eq!(sender.borrow().data, None);

        assert!(apply_outcome(&sender, 2, Ok(page(2))));
        assert_eq!(sender.borrow().phase, SyncPhase::Ready);
        assert_eq!(sender.borrow().data.as_ref().map(|p| p.page), Some(2));
    }

    #[test]
    fn test_failure_keeps_last_good_page() {
        let (sender, _rx) = watch::channel(SyncState {
            generation: 3,
            phase: SyncPhase::Loading,
            data: Some(page(1)),
            ..Default::default()
        });

        let err = ClientError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert!(apply_outcome(&sender, 3, Err(err.clone())));
        let state = sender.borrow().clone();
        assert_eq!(state.error(), Some(&err));
        assert_eq!(state.data, Some(page(1)));
    }

    #[tokio::test]
    async fn test_out_of_order_responses_keep_latest() {
        let source = Arc::new(ScriptedSource::default());
        let slow = source.script(1);
        let fast = source.script(2);

        let controller = SyncController::new(Arc::clone(&source), Duration::from_secs(5));
        let mut rx = controller.subscribe();

        let first = controller.update(params(1));
        let second = controller.update(params(2));
        assert!(second > first);
        assert!(controller.snapshot().is_loading());

        fast.send(Ok(page(2))).unwrap();
        let state = wait_until(&mut rx, |s| s.phase == SyncPhase::Ready).await;
        assert_eq!(state.data.as_ref().map(|p| p.page), Some(2));

        // 第一个请求已被中止，迟到的结果没有接收方
        let _ = slow.send(Ok(page(1)));
        tokio::task::yield_now().await;

        let state = controller.snapshot();
        assert_eq!(state.generation, second);
        assert_eq!(state.data.map(|p| p.page), Some(2));
    }

    #[tokio::test]
    async fn test_error_then_retry() {
        let source = Arc::new(ScriptedSource::default());
        let failing = source.script(3);

        let controller = SyncController::with_initial(
            Arc::clone(&source),
            Duration::from_secs(5),
            params(1),
            page(1),
        );
        let mut rx = controller.subscribe();

        controller.go_to_page(3);
        failing
            .send(Err(ClientError::Network("connection reset".into())))
            .unwrap();
        let state = wait_until(&mut rx, |s| matches!(s.phase, SyncPhase::Failed(_))).await;
        assert_eq!(state.data, Some(page(1)));
        assert_eq!(state.params.as_ref().and_then(|p| p.page.as_deref()), Some("3"));

        let recovered = source.script(3);
        controller.retry().unwrap();
        recovered.send(Ok(page(3))).unwrap();
        let state = wait_until(&mut rx, |s| s.phase == SyncPhase::Ready).await;
        assert_eq!(state.data.map(|p| p.page), Some(3));
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_timeout() {
        let controller = SyncController::new(StalledSource, Duration::from_millis(20));
        let mut rx = controller.subscribe();

        controller.update(params(1));
        let state = wait_until(&mut rx, |s| matches!(s.phase, SyncPhase::Failed(_))).await;
        assert!(state.error().map(ClientError::is_timeout).unwrap_or(false));
        assert_eq!(state.data, None);
    }

    #[tokio::test]
    async fn test_retry_without_params_is_noop() {
        let controller = SyncController::new(StalledSource, Duration::from_millis(20));
        assert_eq!(controller.retry(), None);
        assert_eq!(controller.snapshot().phase, SyncPhase::Idle);
    }
}
