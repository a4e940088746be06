// ==========================================
// 采购分析系统 - 驾驶舱结果缓存
// ==========================================
// 键: 规范化后的 AnalysisFilter (year, supplier_id)
// 值: 完整计算结果 Arc<ReconciliationOutput>，只发布完整结果
// 过期: moka TTL + 容量上限，过期条目由 moka 统一回收
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::domain::AnalysisFilter;
use crate::engine::ReconciliationOutput;

/// 默认最大缓存条目数（年份 × 供应商组合）
pub const DEFAULT_CACHE_CAPACITY: u64 = 512;

/// 带固定时效的分析结果缓存
///
/// TTL 为 0 时不缓存，每次调用都重新计算
pub struct AnalysisCache {
    ttl: Duration,
    entries: Option<MokaCache<AnalysisFilter, Arc<ReconciliationOutput>>>,
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, max_capacity: u64) -> Self {
        let entries = (!ttl.is_zero()).then(|| {
            MokaCache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build()
        });
        Self { ttl, entries }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 查询未过期结果
    pub fn get(&self, key: &AnalysisFilter) -> Option<Arc<ReconciliationOutput>> {
        self.entries.as_ref()?.get(key)
    }

    /// 发布结果（覆盖同键旧值）
    pub fn insert(&self, key: AnalysisFilter, output: Arc<ReconciliationOutput>) {
        if let Some(entries) = &self.entries {
            entries.insert(key, output);
        }
    }

    /// 清空全部条目，返回清空前的条目数
    pub fn clear(&self) -> usize {
        let Some(entries) = &self.entries else {
            return 0;
        };
        entries.run_pending_tasks();
        let n = entries.entry_count() as usize;
        entries.invalidate_all();
        entries.run_pending_tasks();
        n
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Some(entries) => {
                entries.run_pending_tasks();
                entries.entry_count() as usize
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
