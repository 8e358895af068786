use super::{SpotifyClient, SpotifyError};
use crate::types::{CurrentUser, UserId};

impl SpotifyClient {
    /// Looks up the id of the user `access_token` belongs to.
    pub async fn get_current_user(&self, access_token: &str) -> Result<UserId, SpotifyError> {
        let api_url = format!("{uri}/me", uri = self.config.api_url);

        let user = self
            .http
            .get(&api_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<CurrentUser>()
            .await?;

        Ok(UserId::new(user.id))
    }
}
