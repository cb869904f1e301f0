use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::parser::extract::PRODUCT_NAME;
use crate::parser::Listing;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS listings (
            source              TEXT PRIMARY KEY,
            product_name        TEXT,
            attributes          TEXT NOT NULL,
            theme_name          TEXT NOT NULL,
            detection_method    TEXT NOT NULL,
            detected            TEXT,
            primary_color       TEXT NOT NULL,
            complementary_color TEXT NOT NULL,
            header_bg           TEXT NOT NULL,
            row_bg              TEXT NOT NULL,
            run_id              TEXT NOT NULL,
            processed_at        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_listings_method ON listings(detection_method);
        CREATE INDEX IF NOT EXISTS idx_listings_run ON listings(run_id);
        ",
    )?;
    Ok(())
}

pub fn new_run_id(now: DateTime<Utc>) -> String {
    format!("run-{}", now.format("%Y%m%dT%H%M%S"))
}

// ── Listings ──

pub struct ListingRow {
    pub source: String,
    pub product_name: Option<String>,
    pub attributes: String,
    pub theme_name: String,
    pub detection_method: String,
    pub detected: Option<String>,
    pub primary_color: String,
    pub complementary_color: String,
    pub header_bg: String,
    pub row_bg: String,
    pub run_id: String,
    pub processed_at: String,
}

impl ListingRow {
    pub fn new(listing: &Listing, run_id: &str, processed_at: DateTime<Utc>) -> Self {
        let theme = &listing.theme;
        // Only one of these is set for any given method.
        let detected = theme
            .detected_gemstone
            .clone()
            .or_else(|| theme.detected_metal.clone())
            .or_else(|| theme.detected_color.clone());

        Self {
            source: listing.source.clone(),
            product_name: listing.attributes.get_str(PRODUCT_NAME).map(str::to_string),
            attributes: listing.attributes.to_json(),
            theme_name: theme.name.clone(),
            detection_method: theme.detection_method.as_str().to_string(),
            detected,
            primary_color: theme.primary_color.clone(),
            complementary_color: theme.complementary_color.clone(),
            header_bg: theme.header_bg.clone(),
            row_bg: theme.row_bg.clone(),
            run_id: run_id.to_string(),
            processed_at: processed_at.to_rfc3339(),
        }
    }
}

/// Upsert by source, so re-running a directory replaces earlier results.
pub fn save_listings(conn: &Connection, rows: &[ListingRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO listings
                (source, product_name, attributes, theme_name, detection_method, detected,
                 primary_color, complementary_color, header_bg, row_bg, run_id, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;
        for r in rows {
            count += stmt.execute(rusqlite::params![
                r.source,
                r.product_name,
                r.attributes,
                r.theme_name,
                r.detection_method,
                r.detected,
                r.primary_color,
                r.complementary_color,
                r.header_bg,
                r.row_bg,
                r.run_id,
                r.processed_at,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Stored attribute JSON for one source, if present.
pub fn fetch_attributes(conn: &Connection, source: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT attributes FROM listings WHERE source = ?1")?;
    let mut rows = stmt.query_map([source], |row| row.get(0))?;
    Ok(rows.next().transpose()?)
}

// ── Overview ──

pub struct OverviewRow {
    pub source: String,
    pub product_name: String,
    pub theme_name: String,
    pub detection_method: String,
    pub detected: String,
    pub primary_color: String,
    pub processed_at: String,
}

pub fn fetch_overview(
    conn: &Connection,
    method: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(m) = method {
        conditions.push(format!("detection_method = ?{}", params.len() + 1));
        params.push(Box::new(m.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT source, COALESCE(product_name,''), theme_name, detection_method,
                COALESCE(detected,''), primary_color, processed_at
         FROM listings{}
         ORDER BY processed_at DESC, source
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(OverviewRow {
                source: row.get(0)?,
                product_name: row.get(1)?,
                theme_name: row.get(2)?,
                detection_method: row.get(3)?,
                detected: row.get(4)?,
                primary_color: row.get(5)?,
                processed_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub runs: usize,
    pub by_method: Vec<(String, usize)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM listings", [], |r| r.get(0))?;
    let runs: usize =
        conn.query_row("SELECT COUNT(DISTINCT run_id) FROM listings", [], |r| r.get(0))?;

    let mut stmt = conn.prepare(
        "SELECT detection_method, COUNT(*) AS n
         FROM listings
         GROUP BY detection_method
         ORDER BY n DESC, detection_method",
    )?;
    let by_method = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Stats {
        total,
        runs,
        by_method,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Pipeline;
    use crate::snapshot;
    use chrono::TimeZone;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn rows(run_id: &str) -> Vec<ListingRow> {
        let pages = snapshot::load_dir(Path::new("tests/fixtures"), None).unwrap();
        let pipeline = Pipeline::default();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        pages
            .iter()
            .map(|p| ListingRow::new(&pipeline.process_page(p), run_id, at))
            .collect()
    }

    #[test]
    fn run_id_from_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 5).unwrap();
        assert_eq!(new_run_id(at), "run-20260301T120005");
    }

    #[test]
    fn save_and_count() {
        let conn = memory_db();
        assert_eq!(save_listings(&conn, &rows("run-a")).unwrap(), 3);

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.total, 3);
        assert_eq!(s.runs, 1);
        assert_eq!(s.by_method.iter().map(|(_, n)| n).sum::<usize>(), 3);
        assert!(s.by_method.iter().any(|(m, _)| m == "none"));
    }

    #[test]
    fn rerun_replaces_by_source() {
        let conn = memory_db();
        save_listings(&conn, &rows("run-a")).unwrap();
        save_listings(&conn, &rows("run-b")).unwrap();

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.total, 3);
        assert_eq!(s.runs, 1);
    }

    #[test]
    fn overview_filters_by_method() {
        let conn = memory_db();
        save_listings(&conn, &rows("run-a")).unwrap();

        let all = fetch_overview(&conn, None, 50).unwrap();
        assert_eq!(all.len(), 3);

        let none = fetch_overview(&conn, Some("none"), 50).unwrap();
        assert_eq!(none.len(), 1);
        assert_eq!(none[0].theme_name, "Default");
        assert_eq!(none[0].detected, "");

        assert_eq!(fetch_overview(&conn, None, 1).unwrap().len(), 1);
    }

    #[test]
    fn stored_attributes_keep_order() {
        let conn = memory_db();
        save_listings(&conn, &rows("run-a")).unwrap();

        let json = fetch_attributes(&conn, "https://www.ebay.com/itm/295512873301")
            .unwrap()
            .unwrap();
        assert!(json.starts_with("{\"Product Name\""));
        assert!(fetch_attributes(&conn, "missing").unwrap().is_none());
    }
}
