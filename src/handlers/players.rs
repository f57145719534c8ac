use crate::db::NewPlayer;
use crate::db::models::PLACEHOLDER_HASH;
use crate::error::{BossError, client_error};
use crate::router::BossState;
use crate::templates::TemplateData;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// GET /players
pub async fn players_view(State(state): State<BossState>) -> Result<Response, BossError> {
    let players = state.players.all().await?;

    let mut data = TemplateData::new();
    data.players = players;
    state.templates.render(StatusCode::OK, "players.html", &data)
}

/// GET /player/view/{pid}
pub async fn player_view(
    State(state): State<BossState>,
    raw_pid: Result<Path<String>, PathRejection>,
) -> Result<Response, BossError> {
    // a malformed id never reaches storage
    let Path(raw_pid) =
        raw_pid.map_err(|rejection| BossError::InvalidId(rejection.body_text()))?;
    let pid = parse_player_id(&raw_pid)?;
    let player = state.players.get(pid).await?;

    let mut data = TemplateData::new();
    data.player = Some(player);
    state.templates.render(StatusCode::OK, "player.html", &data)
}

/// GET /player/create
pub async fn player_form(State(state): State<BossState>) -> Result<Response, BossError> {
    let mut data = TemplateData::new();
    data.form = PlayerForm::default().echo();
    state.templates.render(StatusCode::OK, "create.html", &data)
}

/// POST /player/create
///
/// A urlencoded body is validated and inserted; a request without a
/// Content-Type inserts the demo player. Either way the client is sent to the
/// new player's page. Any other content type is a 415.
pub async fn player_create(
    State(state): State<BossState>,
    headers: HeaderMap,
    form: Result<Form<PlayerForm>, FormRejection>,
) -> Result<Response, BossError> {
    let new_player = match form {
        Ok(Form(form)) => match form.validate() {
            Ok(player) => player,
            Err(errors) => {
                let mut data = TemplateData::new();
                data.form = form.echo();
                data.form_errors = errors;
                return state
                    .templates
                    .render(StatusCode::UNPROCESSABLE_ENTITY, "create.html", &data);
            }
        },
        Err(FormRejection::InvalidFormContentType(_))
            if !headers.contains_key(header::CONTENT_TYPE) =>
        {
            NewPlayer::demo()
        }
        Err(rejection) => {
            warn!(error = %rejection, "rejected player form");
            return Ok(client_error(rejection.status()));
        }
    };

    let pid = state.players.insert(&new_player).await?;
    info!(pid, surname = %new_player.surname, "player created");
    Ok(Redirect::to(&format!("/player/view/{pid}")).into_response())
}

/// Ids are positive integers; anything else is reported as not found.
pub fn parse_player_id(raw: &str) -> Result<i64, BossError> {
    raw.parse::<i64>()
        .ok()
        .filter(|pid| *pid >= 1)
        .ok_or_else(|| BossError::InvalidId(raw.to_string()))
}

/// Fields submitted by the create form.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerForm {
    pub surname: String,
    pub firstname: String,
    pub sex: String,
    pub birthdate: String,
    pub town: String,
    pub country: String,
    pub nickname: String,
    pub email: String,
}

impl PlayerForm {
    /// Check every field, collecting one message per invalid field.
    pub fn validate(&self) -> Result<NewPlayer, BTreeMap<String, String>> {
        let mut errors = BTreeMap::new();
        let mut require = |field: &str, value: &str| {
            if value.trim().is_empty() {
                errors.insert(field.to_string(), "This field cannot be blank".to_string());
            }
        };
        require("surname", &self.surname);
        require("firstname", &self.firstname);
        require("town", &self.town);

        let sex = self.sex.trim().to_ascii_uppercase();
        if sex != "M" && sex != "F" {
            errors.insert("sex".to_string(), "Sex must be M or F".to_string());
        }

        let country = self.country.trim().to_ascii_uppercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.insert(
                "country".to_string(),
                "Country must be a two-letter code".to_string(),
            );
        }

        let birthdate = NaiveDate::parse_from_str(self.birthdate.trim(), "%Y-%m-%d");
        if birthdate.is_err() {
            errors.insert(
                "birthdate".to_string(),
                "Birth date must be YYYY-MM-DD".to_string(),
            );
        }

        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.insert("email".to_string(), "Email address is not valid".to_string());
        }

        match birthdate {
            Ok(birthdate) if errors.is_empty() => Ok(NewPlayer {
                surname: self.surname.trim().to_string(),
                firstname: self.firstname.trim().to_string(),
                sex,
                birthdate,
                town: self.town.trim().to_string(),
                country,
                nickname: self.nickname.trim().to_string(),
                hash: PLACEHOLDER_HASH.to_string(),
                email: (!email.is_empty()).then(|| email.to_string()),
            }),
            _ => Err(errors),
        }
    }

    /// Submitted values keyed by field name, for refilling the form.
    pub fn echo(&self) -> BTreeMap<String, String> {
        [
            ("surname", &self.surname),
            ("firstname", &self.firstname),
            ("sex", &self.sex),
            ("birthdate", &self.birthdate),
            ("town", &self.town),
            ("country", &self.country),
            ("nickname", &self.nickname),
            ("email", &self.email),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }
}
