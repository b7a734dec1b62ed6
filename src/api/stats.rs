use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    front::{
        self,
        errors::{FieldError, ensure_valid},
    },
    models, repo,
};

#[derive(Debug, Serialize)]
pub struct SalesStatsSchema {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sold_count: u32,
    pub returned_count: u32,
    pub revenue: Decimal,
    pub revenue_text: String,
    /// Percentage of sold birds that came back
    pub return_rate: Decimal,
    pub by_breed: Vec<models::stats::BreedCount>,
}

/// Sales summary over `[from, to]`, both dates included.
pub async fn get_sales_stats(
    from: NaiveDate,
    to: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<SalesStatsSchema> {
    if from > to {
        ensure_valid(vec![FieldError::new(
            "from",
            "start date is after the end date",
        )])?;
    }

    let stats = repo.get_sales_stats(from, to).await?;

    Ok(SalesStatsSchema {
        from,
        to,
        return_rate: stats.return_rate(),
        revenue_text: front::utils::fmt_amount(stats.revenue),
        sold_count: stats.sold_count,
        returned_count: stats.returned_count,
        revenue: stats.revenue,
        by_breed: stats.by_breed,
    })
}
