//! Preview images for catalogue entries.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::figma::DesignSource;

/// Node id to preview URL. Sparse: a missing id just has no preview.
pub type ThumbnailMap = BTreeMap<String, String>;

/// Fetch previews for `ids` in one batched request.
///
/// Never fails: any upstream problem yields an empty map so the catalogue
/// stays usable without previews.
pub async fn fetch_thumbnails(
    source: &dyn DesignSource,
    file_id: &str,
    ids: &[String],
) -> ThumbnailMap {
    if ids.is_empty() {
        return ThumbnailMap::new();
    }

    match source.fetch_images(file_id, ids).await {
        Ok(export) => {
            if let Some(err) = export.err.as_deref() {
                warn!(file_id, error = err, "figma reported an image export error");
            }
            let map: ThumbnailMap = export
                .images
                .into_iter()
                .filter_map(|(id, url)| url.map(|url| (id, url)))
                .collect();
            debug!(file_id, count = map.len(), "thumbnails fetched");
            map
        }
        Err(err) => {
            warn!(file_id, error = %err, "thumbnail fetch failed; continuing without previews");
            ThumbnailMap::new()
        }
    }
}
