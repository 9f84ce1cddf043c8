use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Deserialize;

use crate::*;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

const FALLBACK_FILES: [&str; 8] = [
    "2.jpg", "3.jpg", "4.jpg", "5.jpg", "6.jpg", "7.jpg", "8.jpg", "9.jpg",
];

/// Location of the card artwork: a directory in a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    pub owner: &'static str,
    pub repo: &'static str,
    pub branch: &'static str,
    pub dir: &'static str,
}

impl Default for ImageSource {
    fn default() -> Self {
        Self {
            owner: "jpjp92",
            repo: "minion-match",
            branch: "main",
            dir: "public/images",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

impl ImageSource {
    /// Contents API listing of the image directory; `cache_bust` is appended as `?t=`.
    pub fn listing_url(&self, cache_bust: u64) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}?t={}",
            self.owner, self.repo, self.dir, cache_bust
        )
    }

    pub fn raw_url(&self, file_name: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}/{}",
            self.owner, self.repo, self.branch, self.dir, file_name
        )
    }

    pub fn fallback_pool(&self) -> Vec<ImageId> {
        FALLBACK_FILES
            .iter()
            .map(|file_name| self.raw_url(file_name))
            .collect()
    }

    /// Image URLs of a contents listing, skipping directories and non-image files.
    pub fn parse_listing(&self, listing: &str) -> Result<Vec<ImageId>> {
        let entries: Vec<ListingEntry> =
            serde_json::from_str(listing).map_err(|_| GameError::MalformedListing)?;

        Ok(entries
            .iter()
            .filter(|entry| entry.kind == "file" && is_image_file(&entry.name))
            .map(|entry| self.raw_url(&entry.name))
            .collect())
    }

    /// Turns the outcome of a listing fetch into the session's image pool, never empty.
    pub fn resolve_pool(&self, listing: Option<&str>) -> Vec<ImageId> {
        let Some(listing) = listing else {
            log::warn!("No image listing, using fallback images");
            return self.fallback_pool();
        };

        match self.parse_listing(listing) {
            Ok(pool) if !pool.is_empty() => {
                log::debug!("Image listing has {} images", pool.len());
                pool
            }
            Ok(_) => {
                log::warn!("Image listing has no usable images, using fallback images");
                self.fallback_pool()
            }
            Err(err) => {
                log::warn!("{}, using fallback images", err);
                self.fallback_pool()
            }
        }
    }
}

fn is_image_file(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, extension)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known))
    })
}
