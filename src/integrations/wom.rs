//! Wise Old Man competition API.
//!
//! Competitions created by admins are mirrored to the clan's group so gains
//! are tracked automatically. Creating a group competition needs the group's
//! verification code, which is supplied through `WOM_VERIFICATION_CODE`.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Public API root.
pub const WOM_API: &str = "https://api.wiseoldman.net/v2";

const SERVICE: &str = "Wise Old Man";

/// A competition to create on Wise Old Man.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWomCompetition<'a> {
    pub title: &'a str,
    pub metric: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub group_id: i64,
    pub group_verification_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedCompetition {
    competition: WomCompetition,
}

/// A competition as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct WomCompetition {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub participations: Vec<Participation>,
}

/// One player's standing in a competition.
#[derive(Debug, Clone, Deserialize)]
pub struct Participation {
    pub player: Player,
    pub progress: Progress,
}

/// Player summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub display_name: String,
}

/// Progress in the competition metric.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Progress {
    pub gained: f64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Thin client over the shared HTTP client.
#[derive(Debug, Clone)]
pub struct WomClient {
    http: reqwest::Client,
    base_url: String,
}

impl WomClient {
    /// Client for the public API.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: WOM_API.to_string(),
        }
    }

    async fn read<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(Into::into);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map_or_else(|_| format!("{status}"), |e| e.message);
        Err(Error::ExternalApi {
            service: SERVICE,
            message,
        })
    }

    /// Creates a group competition and returns its id.
    pub async fn create_competition(&self, competition: &NewWomCompetition<'_>) -> Result<i64> {
        let response = self
            .http
            .post(format!("{}/competitions", self.base_url))
            .json(competition)
            .send()
            .await?;
        let created: CreatedCompetition = Self::read(response).await?;
        info!(
            "Created Wise Old Man competition {} ({})",
            created.competition.id, created.competition.title
        );
        Ok(created.competition.id)
    }

    /// Fetches a competition with its participations.
    pub async fn competition(&self, id: i64) -> Result<WomCompetition> {
        let response = self
            .http
            .get(format!("{}/competitions/{id}", self.base_url))
            .send()
            .await?;
        Self::read(response).await
    }

    /// The `n` players with the largest gains, highest first.
    pub async fn top_gains(&self, id: i64, n: usize) -> Result<Vec<(String, f64)>> {
        let competition = self.competition(id).await?;
        Ok(top_participants(competition.participations, n))
    }
}

fn top_participants(mut participations: Vec<Participation>, n: usize) -> Vec<(String, f64)> {
    participations.sort_by(|a, b| b.progress.gained.total_cmp(&a.progress.gained));
    participations
        .into_iter()
        .take(n)
        .map(|p| (p.player.display_name, p.progress.gained))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_body_uses_camel_case() {
        let starts_at = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        let body = NewWomCompetition {
            title: "Slayer week",
            metric: "slayer",
            starts_at,
            ends_at: starts_at + chrono::TimeDelta::days(7),
            group_id: 123,
            group_verification_code: "000-000-000",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["groupId"], 123);
        assert_eq!(json["groupVerificationCode"], "000-000-000");
        assert_eq!(json["startsAt"], "2025-06-01T18:00:00Z");
    }

    #[test]
    fn test_top_participants() {
        let json = r#"{"id":7,"title":"Slayer week","participations":[
            {"player":{"displayName":"Alpha"},"progress":{"gained":1200.0}},
            {"player":{"displayName":"Bravo"},"progress":{"gained":90000}},
            {"player":{"displayName":"Charlie"},"progress":{"gained":500}},
            {"player":{"displayName":"Delta"},"progress":{"gained":0}}]}"#;
        let competition: WomCompetition = serde_json::from_str(json).unwrap();
        let top = top_participants(competition.participations, 3);
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Alpha", "Charlie"]);
    }

    #[test]
    fn test_created_response() {
        let json = r#"{"competition":{"id":42,"title":"Vorkath week"},"verificationCode":"x"}"#;
        let created: CreatedCompetition = serde_json::from_str(json).unwrap();
        assert_eq!(created.competition.id, 42);
    }
}
