//! # Catalog Models
//!
//! Serde types mirroring the remote movie service's JSON schema. Field names
//! follow the service's PascalCase convention through `#[serde(rename)]`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Registered user as returned by the service.
///
/// The password is write-only: it is sent on registration and edits but is
/// never kept on this type, so it never reaches the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(
        rename = "Birthday",
        default,
        with = "birthday",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "FavoriteMovies", default)]
    pub favorite_movies: Vec<String>,
}

impl User {
    pub fn has_favorite(&self, movie_id: &str) -> bool {
        self.favorite_movies.iter().any(|id| id == movie_id)
    }
}

/// Fields submitted by the registration form
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Birthday", with = "birthday", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

/// Partial user update sent to `PUT users/{username}`.
///
/// Only the fields that are set are serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(rename = "Username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Birthday", with = "birthday", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "FavoriteMovies", skip_serializing_if = "Option::is_none")]
    pub favorite_movies: Option<Vec<String>>,
}

impl UserUpdate {
    pub fn favorites(favorite_movies: Vec<String>) -> Self {
        Self {
            favorite_movies: Some(favorite_movies),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
            && self.favorite_movies.is_none()
    }
}

/// Body of `POST users/{username}/favorites`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesPayload {
    #[serde(rename = "FavoriteMovies")]
    pub favorite_movies: Vec<String>,
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

/// Successful login payload: the user profile plus its bearer token
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Bio", default)]
    pub bio: String,
    // Birth and death dates are display-only and arrive in mixed formats
    #[serde(rename = "Birth", default)]
    pub birth: Option<String>,
    #[serde(rename = "Death", default)]
    pub death: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Genre")]
    pub genre: Genre,
    #[serde(rename = "Director")]
    pub director: Director,
    #[serde(rename = "ImagePath", default)]
    pub image_path: Option<String>,
    #[serde(rename = "Featured", default)]
    pub featured: bool,
}

/// Birthdays are sent as `YYYY-MM-DD`. The service echoes them back as full
/// timestamps (`1990-04-01T00:00:00.000Z`), so both forms are accepted.
mod birthday {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };

        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| Some(ts.date_naive()))
            .map_err(|e| D::Error::custom(format!("invalid birthday {raw:?}: {e}")))
    }
}
