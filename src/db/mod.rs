pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use sqlite_vec::sqlite3_vec_init;
use std::path::Path;
use std::sync::Once;

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Open (or create) the gallery database read-write, with the extension
/// loaded and schema initialized. Used by `ingest`.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    load_sqlite_vec();

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL for better concurrent read behavior during long ingests
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;

    tracing::info!(path = %path.display(), "gallery database initialized");
    Ok(conn)
}

/// Open an existing gallery database read-only. The interactive session never
/// writes, and a missing file is a hard error rather than an empty collection.
pub fn open_database_readonly(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    anyhow::ensure!(
        path.exists(),
        "gallery database not found at {}. Run `curio ingest <dir>` first.",
        path.display()
    );

    load_sqlite_vec();

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open database at {}", path.display()))?;

    tracing::info!(path = %path.display(), "gallery database opened read-only");
    Ok(conn)
}

/// Open an in-memory database for testing.
#[allow(dead_code)]
pub fn open_memory_database() -> Result<Connection> {
    load_sqlite_vec();
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    Ok(conn)
}
