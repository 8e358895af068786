use std::collections::HashMap;

use super::{MusicProvider, SpotifyClient, SpotifyError};
use crate::types::{AlbumEntry, SavedAlbumsPage};

/// Number of saved albums requested per page; the API maximum.
pub const PAGE_SIZE: u32 = 50;

impl SpotifyClient {
    /// Fetches one page of the user's saved albums.
    pub async fn get_saved_albums(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SavedAlbumsPage, SpotifyError> {
        let api_url = format!(
            "{uri}/me/albums?limit={limit}&offset={offset}",
            uri = self.config.api_url,
            limit = limit,
            offset = offset
        );

        let page = self
            .http
            .get(&api_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<SavedAlbumsPage>()
            .await?;

        Ok(page)
    }
}

/// Collects the name and first cover URL of every saved album.
///
/// Pages through `/me/albums` with a fixed page size, moving the offset
/// forward by [`PAGE_SIZE`] until a page comes back empty. A library of
/// `n` albums therefore costs `n.div_ceil(PAGE_SIZE) + 1` requests.
///
/// Album names are the key: when a later album has the same name as an
/// earlier one, its cover URL replaces the earlier URL but the entry keeps
/// its original position. Albums without any image are skipped.
///
/// Any provider error aborts the whole listing.
pub async fn list_saved_albums(
    provider: &dyn MusicProvider,
    access_token: &str,
) -> Result<Vec<AlbumEntry>, SpotifyError> {
    let mut entries: Vec<AlbumEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut offset = 0;

    loop {
        let page = provider
            .saved_albums_page(access_token, PAGE_SIZE, offset)
            .await?;

        if page.items.is_empty() {
            break;
        }

        for item in page.items {
            let album = item.album;
            let Some(image) = album.images.into_iter().next() else {
                tracing::warn!(album = %album.name, "Album has no cover image, skipping");
                continue;
            };

            match positions.get(&album.name).copied() {
                Some(idx) => entries[idx].cover_url = image.url,
                None => {
                    positions.insert(album.name.clone(), entries.len());
                    entries.push(AlbumEntry {
                        name: album.name,
                        cover_url: image.url,
                    });
                }
            }
        }

        offset += PAGE_SIZE;
    }

    tracing::debug!(count = entries.len(), "Collected saved albums");
    Ok(entries)
}
