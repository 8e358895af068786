use chrono::Utc;
use reqwest::{StatusCode, Url};

use super::{SpotifyClient, SpotifyError};
use crate::types::{TokenRecord, TokenResponse};

impl SpotifyClient {
    /// Builds the consent screen URL for the authorization-code flow.
    ///
    /// `state` is echoed back by Spotify on the callback and checked there
    /// against the value stored in the session.
    pub fn build_authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| SpotifyError::InvalidUrl {
            url: self.config.auth_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for a token record.
    ///
    /// The client authenticates with HTTP Basic using its id and secret.
    /// The code is single-use and short-lived, so this has to run right
    /// after the callback is hit.
    pub async fn request_token(&self, code: &str) -> Result<TokenRecord, SpotifyError> {
        let res = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: TokenResponse = res.json().await?;

        Ok(token_record(json, None))
    }

    /// Refreshes an access token.
    ///
    /// Spotify may or may not rotate the refresh token. When the response
    /// carries none, the one passed in stays valid and is kept.
    pub async fn request_refresh(&self, refresh_token: &str) -> Result<TokenRecord, SpotifyError> {
        let res = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: TokenResponse = res.json().await?;

        Ok(token_record(json, Some(refresh_token)))
    }

    pub async fn request_revoke(&self, access_token: &str) -> Result<(), SpotifyError> {
        let res = self
            .http
            .post(&self.config.revoke_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("token", access_token)])
            .send()
            .await?;

        if res.status() != StatusCode::OK {
            return Err(SpotifyError::Status {
                endpoint: "token/revoke",
                status: res.status(),
            });
        }

        Ok(())
    }
}

fn token_record(json: TokenResponse, previous_refresh: Option<&str>) -> TokenRecord {
    let refresh_token = json
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_string))
        .unwrap_or_default();

    TokenRecord {
        access_token: json.access_token,
        refresh_token,
        expires_at: Utc::now().timestamp() + json.expires_in,
    }
}
