use crate::db::models::{NewPlayer, Player};
use crate::db::schema::SQLITE_INIT;
use crate::error::BossError;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

const PLAYER_COLUMNS: &str =
    "pid, surname, firstname, sex, birthdate, town, country, nickname, hash, email";

/// Open the pool for `dsn`, creating the database file when missing, and
/// apply the bundled schema.
pub async fn connect(dsn: &str) -> Result<PlayersStorage, BossError> {
    let options = SqliteConnectOptions::from_str(dsn)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    let storage = PlayersStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

#[derive(Clone)]
pub struct PlayersStorage {
    pool: SqlitePool,
}

impl PlayersStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), BossError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a player and return the id assigned by storage.
    pub async fn insert(&self, player: &NewPlayer) -> Result<i64, BossError> {
        let result = sqlx::query(
            r#"
            INSERT INTO players (
                surname, firstname, sex, birthdate, town, country, nickname, hash, email
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&player.surname)
        .bind(&player.firstname)
        .bind(&player.sex)
        .bind(player.birthdate)
        .bind(&player.town)
        .bind(&player.country)
        .bind(&player.nickname)
        .bind(&player.hash)
        .bind(&player.email)
        .execute(&self.pool)
        .await?;

        let pid = result.last_insert_rowid();
        debug!(pid, "player inserted");
        Ok(pid)
    }

    /// Fetch one player; zero rows is `BossError::NoRecord`.
    pub async fn get(&self, pid: i64) -> Result<Player, BossError> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE pid = ?");
        sqlx::query_as::<_, Player>(&sql)
            .bind(pid)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => BossError::NoRecord,
                other => BossError::Database(other),
            })
    }

    /// All players ordered by id; an empty table gives an empty vec.
    pub async fn all(&self) -> Result<Vec<Player>, BossError> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY pid");
        let mut rows = sqlx::query_as::<_, Player>(&sql).fetch(&self.pool);

        let mut players = Vec::new();
        // dropping `rows` on any exit path returns the connection to the pool
        while let Some(player) = rows.try_next().await? {
            players.push(player);
        }
        Ok(players)
    }
}
