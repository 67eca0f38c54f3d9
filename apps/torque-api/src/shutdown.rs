use std::sync::{Arc, OnceLock};
use tokio::sync::Notify;

/// 上送致命错误信号（`fatal` 策略下使用）。
///
/// 只记录第一次触发的原因；等待方只有服务主循环一个。
#[derive(Clone, Default)]
pub struct FatalSignal {
    inner: Arc<FatalInner>,
}

#[derive(Default)]
struct FatalInner {
    reason: OnceLock<String>,
    notify: Notify,
}

impl FatalSignal {
    pub fn trigger(&self, reason: impl Into<String>) {
        if self.inner.reason.set(reason.into()).is_ok() {
            self.inner.notify.notify_one();
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.inner.reason.get().map(String::as_str)
    }

    #[cfg(test)]
    pub fn is_triggered(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    /// 触发前一直挂起。
    pub async fn triggered(&self) {
        if self.inner.reason.get().is_some() {
            return;
        }
        // notify_one 在无等待者时保留许可，先触发后等待也能返回
        self.inner.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn first_reason_is_kept() {
        let signal = FatalSignal::default();
        assert!(signal.reason().is_none());
        signal.trigger("status 500");
        signal.trigger("status 503");
        assert_eq!(signal.reason(), Some("status 500"));
        tokio::time::timeout(Duration::from_secs(1), signal.triggered())
            .await
            .expect("already triggered");
    }

    #[tokio::test]
    async fn waiter_wakes_on_trigger() {
        let signal = FatalSignal::default();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.triggered().await })
        };
        signal.trigger("transport error");
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("woken")
            .expect("join");
    }
}
