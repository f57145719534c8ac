use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A fully populated row of the `players` table.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Player {
    pub pid: i64,
    pub surname: String,
    pub firstname: String,
    pub sex: String,
    pub birthdate: NaiveDate,
    pub town: String,
    pub country: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub hash: String,
    pub email: Option<String>,
}

/// Insert payload; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub surname: String,
    pub firstname: String,
    pub sex: String,
    pub birthdate: NaiveDate,
    pub town: String,
    pub country: String,
    pub nickname: String,
    pub hash: String,
    pub email: Option<String>,
}

/// Credential hash stored for players created without one.
pub const PLACEHOLDER_HASH: &str = "abcdef123";

impl NewPlayer {
    /// Fixed payload inserted when `POST /player/create` carries no form.
    pub fn demo() -> Self {
        Self {
            surname: "Testovic".to_string(),
            firstname: "Test".to_string(),
            sex: "M".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1981, 2, 1).unwrap_or(NaiveDate::MIN),
            town: "Mesto".to_string(),
            country: "CZ".to_string(),
            nickname: String::new(),
            hash: PLACEHOLDER_HASH.to_string(),
            email: None,
        }
    }
}

impl PartialEq<NewPlayer> for Player {
    fn eq(&self, other: &NewPlayer) -> bool {
        self.surname == other.surname
            && self.firstname == other.firstname
            && self.sex == other.sex
            && self.birthdate == other.birthdate
            && self.town == other.town
            && self.country == other.country
            && self.nickname == other.nickname
            && self.hash == other.hash
            && self.email == other.email
    }
}
