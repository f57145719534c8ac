//! SQL DDL for the players table.

/// SQLite schema with:
/// - `pid` INTEGER PRIMARY KEY AUTOINCREMENT, so new ids are strictly increasing
/// - `birthdate` stored as TEXT (`YYYY-MM-DD`)
/// - `email` nullable, every other column NOT NULL
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    pid INTEGER PRIMARY KEY AUTOINCREMENT,
    surname TEXT NOT NULL,
    firstname TEXT NOT NULL,
    sex TEXT NOT NULL,
    birthdate TEXT NOT NULL,
    town TEXT NOT NULL,
    country TEXT NOT NULL,
    nickname TEXT NOT NULL DEFAULT '',
    hash TEXT NOT NULL,
    email TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_players_surname ON players(surname);
"#;
