use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 지갑별 직렬화 잠금 테이블
///
/// 비활성화 상태(기본값)에서는 아무것도 잠그지 않으므로 동시 전송의
/// lost update가 그대로 재현된다. 활성화하면 같은 지갑에 대한
/// 조회 → 검사 → 쓰기 구간이 하나씩만 실행된다.
///
/// Per-wallet async mutex table; `lock` returns `None` when disabled.
#[derive(Clone, Default)]
pub struct WalletLocks {
    enabled: bool,
    locks: Arc<Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>>,
}

impl WalletLocks {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locks: Arc::default(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 지갑 잠금 획득 (guard drop 시 해제)
    pub async fn lock(&self, wallet_id: u64) -> Option<OwnedMutexGuard<()>> {
        if !self.enabled {
            return None;
        }

        let mutex = {
            let mut locks = self.locks.lock();
            // 보유 / 대기 중인 guard가 없는 항목 정리 (테이블에만 남은 Arc)
            locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            locks.entry(wallet_id).or_default().clone()
        };
        Some(mutex.lock_owned().await)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn disabled_table_never_blocks() {
        let locks = WalletLocks::disabled();
        assert!(locks.lock(1).await.is_none());
        assert!(locks.lock(1).await.is_none());
    }

    #[tokio::test]
    async fn same_wallet_waits_other_wallet_does_not() {
        let locks = WalletLocks::new(true);
        let held = locks.lock(1).await.unwrap();

        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock(2)).await;
        assert!(other.is_ok());

        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock(1)).await;
        assert!(same.is_err());

        drop(held);
        let again = tokio::time::timeout(Duration::from_millis(50), locks.lock(1)).await;
        assert!(again.unwrap().is_some());
    }

    #[tokio::test]
    async fn released_wallet_entries_are_evicted() {
        let locks = WalletLocks::new(true);
        let first = locks.lock(1).await.unwrap();
        let second = locks.lock(2).await.unwrap();
        assert_eq!(locks.tracked(), 2);

        drop(first);
        drop(second);
        // 다음 lock 호출에서 해제된 항목 정리
        let third = locks.lock(3).await.unwrap();
        assert_eq!(locks.tracked(), 1);

        // 보유 중인 항목은 유지
        let _fourth = locks.lock(4).await.unwrap();
        assert_eq!(locks.tracked(), 2);
        drop(third);
    }
}
