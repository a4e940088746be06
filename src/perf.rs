use std::time::Instant;

/// 性能统计 Guard：Drop 时记录 elapsed_ms 与处理行数
///
/// 使用方式：
/// ```ignore
/// let mut perf = procurement_analytics::perf::PerfGuard::new("load_dataset");
/// // do work...
/// perf.record_rows(n);
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    rows: Option<usize>,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            rows: None,
        }
    }

    /// 记录本次操作处理的行数（可多次调用，累加）
    pub fn record_rows(&mut self, rows: usize) {
        self.rows = Some(self.rows.unwrap_or(0).saturating_add(rows));
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        match self.rows {
            Some(rows) => tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                rows,
                "done"
            ),
            None => tracing::info!(target: "perf", op = self.op, elapsed_ms, "done"),
        }
    }
}
