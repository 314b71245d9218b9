//! WordPress REST API strategy.
//!
//! The happy path: resolve the configured tag slug to its numeric id via
//! `wp-json/wp/v2/tags`, then list the posts carrying that id with a
//! `_fields` projection so only link, date, title, and excerpt come over
//! the wire.
//!
//! When the site is fronted by a blocker the API often answers with an
//! HTML challenge page instead of JSON; that surfaces here as a
//! [`FetchError::Format`] at decode time and the pipeline falls through to
//! the HTML strategies.

use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::models::{collect_items, Mode, NewsItem, ResultSet};
use crate::text::normalize;
use crate::transport::{Accept, Transport};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct WpTag {
    id: u64,
    #[serde(default)]
    slug: String,
}

/// WordPress wraps rendered fields as `{"rendered": "<p>..</p>"}`.
#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

#[derive(Debug, Deserialize)]
struct WpPost {
    #[serde(default)]
    link: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    excerpt: Rendered,
}

async fn fetch_json<T: Transport, D: DeserializeOwned>(
    transport: &T,
    url: &str,
) -> Result<D, FetchError> {
    let body = transport.fetch_text(url, Accept::Json).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::format(url, e))
}

/// Resolve the tag slug to its id: exact `?slug=` lookup first, then a
/// broader `?search=` accepting an exact slug match or, failing that, the
/// first candidate the search returns.
async fn resolve_tag_id<T: Transport>(
    cfg: &FetchConfig,
    transport: &T,
) -> Result<u64, FetchError> {
    let encoded = urlencoding::encode(&cfg.tag_slug);

    let by_slug = format!(
        "{}/wp-json/wp/v2/tags?slug={}&per_page=50",
        cfg.site, encoded
    );
    let tags: Vec<WpTag> = fetch_json(transport, &by_slug).await?;
    if let Some(tag) = tags.first() {
        debug!(id = tag.id, "Tag resolved by exact slug");
        return Ok(tag.id);
    }

    let by_search = format!(
        "{}/wp-json/wp/v2/tags?search={}&per_page=50",
        cfg.site, encoded
    );
    let tags: Vec<WpTag> = fetch_json(transport, &by_search).await?;
    let wanted = cfg.tag_slug.to_lowercase();
    let exact = tags.iter().find(|t| t.slug.to_lowercase() == wanted);
    match exact.or_else(|| tags.first()) {
        Some(tag) => {
            debug!(id = tag.id, slug = %tag.slug, "Tag resolved by search");
            Ok(tag.id)
        }
        None => Err(FetchError::Resolution {
            slug: cfg.tag_slug.clone(),
        }),
    }
}

/// Query the REST API for posts under the configured tag.
///
/// Zero posts is a valid (empty) result set, not an error; the pipeline
/// decides whether emptiness means trying the next strategy.
#[instrument(level = "info", skip_all, fields(slug = %cfg.tag_slug))]
pub async fn produce<T: Transport>(
    cfg: &FetchConfig,
    transport: &T,
) -> Result<ResultSet, FetchError> {
    let tag_id = resolve_tag_id(cfg, transport).await?;

    let posts_url = format!(
        "{}/wp-json/wp/v2/posts?tags={}&per_page={}&_fields=link,date,title,excerpt",
        cfg.site, tag_id, cfg.limit
    );
    let posts: Vec<WpPost> = fetch_json(transport, &posts_url).await?;

    let items = collect_items(
        posts.into_iter().map(|p| NewsItem {
            title: normalize(&p.title.rendered),
            url: p.link.trim().to_string(),
            date: p.date.trim().to_string(),
            excerpt: normalize(&p.excerpt.rendered),
        }),
        cfg.limit,
    );

    info!(count = items.len(), tag_id, "wp-json produced items");
    Ok(ResultSet::new(cfg.listing_url(), Mode::Api, items))
}
