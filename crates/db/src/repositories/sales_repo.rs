//! Data access for book sales.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bookshelf_core::error::CoreError;
use bookshelf_core::types::DbId;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::models::sale::{SaleRecord, TopSeller};

/// Sales data access.
#[async_trait]
pub trait SalesDao: Send + Sync {
    /// Book with the most copies sold between `from` and `to` (inclusive,
    /// either bound optional). Ties go to the lower book key.
    async fn top_seller(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Option<TopSeller>, CoreError>;
}

/// Sales ledger kept in process memory.
#[derive(Debug, Default)]
pub struct InMemorySalesRepo {
    sales: RwLock<Vec<SaleRecord>>,
}

impl InMemorySalesRepo {
    pub fn with_sales(sales: Vec<SaleRecord>) -> Self {
        Self {
            sales: RwLock::new(sales),
        }
    }

    pub fn len(&self) -> usize {
        self.sales.try_read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SalesDao for InMemorySalesRepo {
    async fn top_seller(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Option<TopSeller>, CoreError> {
        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                return Err(CoreError::Validation(format!(
                    "Period end {to} precedes its start {from}"
                )));
            }
        }

        let sales = self.sales.read().await;
        let mut totals: BTreeMap<DbId, i64> = BTreeMap::new();
        for sale in sales.iter().filter(|s| {
            from.map_or(true, |f| s.sold_on >= f) && to.map_or(true, |t| s.sold_on <= t)
        }) {
            *totals.entry(sale.book_key).or_default() += sale.copies;
        }

        // Strictly greater keeps the lowest key on ties.
        let mut best: Option<TopSeller> = None;
        for (book_key, copies_sold) in totals {
            if best.as_ref().map_or(true, |b| copies_sold > b.copies_sold) {
                best = Some(TopSeller {
                    book_key,
                    copies_sold,
                });
            }
        }
        Ok(best)
    }
}
