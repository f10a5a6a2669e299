use anyhow::{Result, anyhow};
use chrono::NaiveTime;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;
use tracing::info;

use crate::model::shift::ShiftWindow;
use crate::store;

/// employee_id => resolved shift window. Shift masters change rarely; one
/// hour of staleness is acceptable for attendance organizing.
static SHIFT_CACHE: Lazy<Cache<String, ShiftWindow>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(3600))
        .build()
});

/// Cache-through shift resolution with the unmapped fallback. Negative
/// results are not cached: a mapping can appear at any moment and the
/// fallback costs one indexed query.
pub async fn resolve(pool: &MySqlPool, employee_id: &str) -> Result<ShiftWindow, sqlx::Error> {
    if let Some(hit) = SHIFT_CACHE.get(employee_id).await {
        return Ok(hit);
    }
    match store::shift_for_employee(pool, employee_id).await? {
        Some(window) => {
            SHIFT_CACHE
                .insert(employee_id.to_string(), window.clone())
                .await;
            Ok(window)
        }
        None => Ok(ShiftWindow::unmapped()),
    }
}

/// Drops one employee's cached window, used when a mapping is rewritten.
pub async fn invalidate(employee_id: &str) {
    SHIFT_CACHE.invalidate(employee_id).await;
}

/// Preloads every current shift mapping. Ascending id order means later
/// mappings overwrite earlier ones, matching the most-recent-wins lookup.
pub async fn warmup_shift_cache(pool: &MySqlPool) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, String, NaiveTime, NaiveTime)>(
        r#"
        SELECT m.employee_id, sm.shift_name, sm.start_time, sm.end_time
        FROM shift_mapping m
        JOIN shift_master sm ON m.shift_id = sm.shift_id
        ORDER BY m.id ASC
        "#,
    )
    .fetch(pool);

    let mut count = 0usize;
    while let Some(row) = stream.next().await {
        let (employee_id, name, start, end) =
            row.map_err(|e| anyhow!("shift mapping fetch failed: {}", e))?;
        SHIFT_CACHE
            .insert(employee_id, ShiftWindow::from_times(name, start, end))
            .await;
        count += 1;
    }

    info!("Shift cache warmed with {} mappings", count);
    Ok(())
}
