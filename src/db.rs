//! Database layer - connection, table, upsert.

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, Statement};

use crate::error::{PipelineError, Result};
use crate::record::{timestamp, CleanedRecord};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
    }
    Ok(Connection::open(path)?)
}

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS manga (
            manga_id    TEXT PRIMARY KEY,
            title       TEXT,
            description TEXT,
            year        INTEGER,
            rating      REAL,
            has_cover   INTEGER,
            cover_url   TEXT,
            url         TEXT,
            scraped_at  TEXT
        );
        ",
    )?;
    Ok(())
}

const UPSERT_SQL: &str = "INSERT OR REPLACE INTO manga
     (manga_id, title, description, year, rating, has_cover, cover_url, url, scraped_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

fn bool_to_int(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}

fn execute_upsert(stmt: &mut Statement<'_>, rec: &CleanedRecord) -> Result<()> {
    let scraped_at = rec.scraped_at.as_ref().map(timestamp::format);
    stmt.execute(params![
        rec.manga_id,
        rec.title,
        rec.description,
        rec.year,
        rec.rating,
        bool_to_int(rec.has_cover),
        rec.cover_url,
        rec.url,
        scraped_at,
    ])?;
    Ok(())
}

/// Insert or fully replace one row keyed by `manga_id`.
pub fn upsert(conn: &Connection, rec: &CleanedRecord) -> Result<()> {
    let mut stmt = conn.prepare_cached(UPSERT_SQL)?;
    execute_upsert(&mut stmt, rec)
}

/// Upsert every record in one transaction. `on_row` runs after each row.
/// Any failure drops the transaction, so nothing from this call is kept.
pub fn upsert_all<F>(conn: &Connection, records: &[&CleanedRecord], mut on_row: F) -> Result<usize>
where
    F: FnMut(),
{
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(UPSERT_SQL)?;
        for rec in records {
            execute_upsert(&mut stmt, rec)?;
            count += 1;
            on_row();
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn count_rows(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM manga", [], |r| r.get(0))?;
    Ok(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, title: &str, rating: Option<f64>) -> CleanedRecord {
        CleanedRecord {
            manga_id: Some(id.into()),
            title: title.into(),
            description: "Desc.".into(),
            year: Some(2021),
            rating,
            has_cover: true,
            cover_url: "https://img/c.jpg".into(),
            url: format!("https://remanga.org/manga/{id}/"),
            scraped_at: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(8, 15, 0),
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_table(&conn).unwrap();
        conn
    }

    #[test]
    fn create_table_is_idempotent() {
        let conn = memory_db();
        create_table(&conn).unwrap();
        assert_eq!(count_rows(&conn).unwrap(), 0);
    }

    #[test]
    fn stores_flags_and_timestamps_as_sqlite_types() {
        let conn = memory_db();
        upsert(&conn, &record("a", "A", Some(7.5))).unwrap();
        let (has_cover, scraped_at, rating): (i64, String, f64) = conn
            .query_row(
                "SELECT has_cover, scraped_at, rating FROM manga WHERE manga_id = 'a'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(has_cover, 1);
        assert_eq!(scraped_at, "2024-05-02 08:15:00");
        assert_eq!(rating, 7.5);
    }

    #[test]
    fn reload_replaces_whole_row() {
        let conn = memory_db();
        let first = [record("a", "Old", Some(5.0)), record("b", "B", None)];
        let refs: Vec<&CleanedRecord> = first.iter().collect();
        upsert_all(&conn, &refs, || {}).unwrap();

        let mut changed = record("a", "New", None);
        changed.has_cover = false;
        changed.cover_url = String::new();
        let second = [changed, record("b", "B", None)];
        let refs: Vec<&CleanedRecord> = second.iter().collect();
        let mut ticks = 0;
        let n = upsert_all(&conn, &refs, || ticks += 1).unwrap();
        assert_eq!(n, 2);
        assert_eq!(ticks, 2);

        assert_eq!(count_rows(&conn).unwrap(), 2);
        let (title, rating, has_cover): (String, Option<f64>, i64) = conn
            .query_row(
                "SELECT title, rating, has_cover FROM manga WHERE manga_id = 'a'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(title, "New");
        assert_eq!(rating, None);
        assert_eq!(has_cover, 0);
    }

    #[test]
    fn failed_batch_commits_nothing() {
        let conn = memory_db();
        conn.execute_batch(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON manga
             WHEN NEW.title = 'bad' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
        let batch = [record("a", "A", None), record("b", "bad", None)];
        let refs: Vec<&CleanedRecord> = batch.iter().collect();
        assert!(upsert_all(&conn, &refs, || {}).is_err());
        assert_eq!(count_rows(&conn).unwrap(), 0);
    }
}
