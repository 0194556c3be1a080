//! 按 id 加锁
//!
//! 同一进程内对同一个表单或报告的流转串行执行；跨进程的并发由存储层的
//! 比较并设置兜底。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

// 超过该数量时在加锁前清理空闲条目
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某个 id 的锁，持有期间同一 id 的其他调用等待
    pub async fn lock(&self, id: i64) -> OwnedMutexGuard<()> {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.prune();
        }
        let mutex = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// 清理无人持有的锁
    pub fn prune(&self) {
        self.locks.retain(|_, m| Arc::strong_count(m) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
