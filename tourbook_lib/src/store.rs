//! SQLite-backed local storage for the session token and user preferences.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use tourbook_api::types::Locale;

use crate::error::TourbookError;

const TOKEN_KEY: &str = "token";
const LOCALE_KEY: &str = "locale";

pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Opens (creating if needed) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TourbookError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, TourbookError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<(), TourbookError> {
        let schema = include_str!("../schema/store.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, TourbookError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), TourbookError> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Removes `key`. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool, TourbookError> {
        let removed = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    pub fn token(&self) -> Result<Option<String>, TourbookError> {
        Ok(self.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<(), TourbookError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TourbookError::InvalidInput("token is empty".to_string()));
        }
        self.set(TOKEN_KEY, token)
    }

    /// Forgets the session token, e.g. after the API answered 401.
    pub fn clear_token(&self) -> Result<bool, TourbookError> {
        self.remove(TOKEN_KEY)
    }

    /// Saved language; unknown stored values are ignored.
    pub fn locale(&self) -> Result<Option<Locale>, TourbookError> {
        Ok(self.get(LOCALE_KEY)?.and_then(|code| code.parse().ok()))
    }

    pub fn set_locale(&self, locale: Locale) -> Result<(), TourbookError> {
        self.set(LOCALE_KEY, locale.code())
    }
}
