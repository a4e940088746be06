// ==========================================
// 采购分析系统 - 数据源抽象
// ==========================================
// 职责: 提供四张原始表（订单/物料目录/供应商关系/物料需求）
// 红线: 数据源只负责读取，不做清洗与业务计算
// ==========================================

use crate::domain::{RawArticle, RawDataset, RawMaterialRequest, RawOrder, RawSupplierLink};
use crate::perf::PerfGuard;
use crate::repository::error::RepositoryResult;
use tracing::info;

/// 采购数据源
///
/// 实现方: SqliteProcurementRepository / CsvProcurementSource / RawDataset（内存）
pub trait ProcurementSource: Send + Sync {
    /// 数据源描述（日志用）
    fn describe(&self) -> String;

    fn load_orders(&self) -> RepositoryResult<Vec<RawOrder>>;

    fn load_articles(&self) -> RepositoryResult<Vec<RawArticle>>;

    fn load_supplier_links(&self) -> RepositoryResult<Vec<RawSupplierLink>>;

    fn load_requests(&self) -> RepositoryResult<Vec<RawMaterialRequest>>;

    /// 一次性读取四张表
    ///
    /// 任一表读取失败即整体失败，不返回部分数据
    fn load_dataset(&self) -> RepositoryResult<RawDataset> {
        let mut perf = PerfGuard::new("load_dataset");

        let dataset = RawDataset {
            orders: self.load_orders()?,
            articles: self.load_articles()?,
            supplier_links: self.load_supplier_links()?,
            requests: self.load_requests()?,
        };

        let (orders, articles, links, requests) = dataset.row_counts();
        perf.record_rows(orders + articles + links + requests);
        info!(
            source = %self.describe(),
            orders,
            articles,
            links,
            requests,
            "原始数据读取完成"
        );

        Ok(dataset)
    }
}

// 内存数据源
impl ProcurementSource for RawDataset {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load_orders(&self) -> RepositoryResult<Vec<RawOrder>> {
        Ok(self.orders.clone())
    }

    fn load_articles(&self) -> RepositoryResult<Vec<RawArticle>> {
        Ok(self.articles.clone())
    }

    fn load_supplier_links(&self) -> RepositoryResult<Vec<RawSupplierLink>> {
        Ok(self.supplier_links.clone())
    }

    fn load_requests(&self) -> RepositoryResult<Vec<RawMaterialRequest>> {
        Ok(self.requests.clone())
    }

    fn load_dataset(&self) -> RepositoryResult<RawDataset> {
        Ok(self.clone())
    }
}
