use crate::client::CommonsClient;
use crate::error::Result;
use serde::Deserialize;
use tracing::{debug, warn};

/// A Commons file page resolved to its direct asset URL.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupHit {
    /// Full page title, e.g. `File:Coat of arms of France.svg`.
    pub title: String,
    /// Human-facing file page URL, when the API reports one.
    pub page_url: Option<String>,
    /// Direct URL of the original asset on the upload servers.
    pub asset_url: String,
}

// Lenient mirrors of the MediaWiki query response (formatversion=2).
// Every field defaults so partial or error-shaped payloads deserialize
// to empty values instead of failing the call.
#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: QueryBody,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<PageInfo>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    canonicalurl: Option<String>,
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageInfo {
    #[serde(default)]
    url: String,
    #[serde(default)]
    mime: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
}

fn exact_title_candidates(country: &str) -> [String; 4] {
    [
        format!("Coat of arms of {}.svg", country),
        format!("Emblem of {}.svg", country),
        format!("State emblem of {}.svg", country),
        format!("National emblem of {}.svg", country),
    ]
}

fn search_variants(country: &str) -> [String; 4] {
    [
        format!("intitle:\"Coat of arms of {}\" filetype:svg", country),
        format!("intitle:\"Emblem of {}\" filetype:svg", country),
        format!("intitle:\"{}\" coat arms filetype:svg", country),
        format!("intitle:\"{}\" emblem filetype:svg", country),
    ]
}

fn is_svg_asset(url: &str, mime: &str) -> bool {
    url.to_lowercase().ends_with(".svg") || mime.contains("svg")
}

/// Look up a single file page by its bare title (without the `File:` prefix)
/// and return it when it exists and is SVG-typed.
pub async fn file_info(client: &CommonsClient, title: &str) -> Result<Option<LookupHit>> {
    let prefixed = format!("File:{}", title);
    let params = [
        ("action", "query"),
        ("format", "json"),
        ("formatversion", "2"),
        ("prop", "imageinfo|info"),
        ("titles", prefixed.as_str()),
        ("inprop", "url"),
        ("iiprop", "url|mediatype|mime"),
        ("origin", "*"),
    ];

    let response: ApiResponse = client.get_json(&params).await?;
    let Some(page) = response.query.pages.into_iter().next() else {
        return Ok(None);
    };
    if page.missing {
        return Ok(None);
    }

    let page_url = page
        .fullurl
        .filter(|u| !u.is_empty())
        .or_else(|| page.canonicalurl.filter(|u| !u.is_empty()));

    let Some(info) = page.imageinfo.into_iter().next() else {
        return Ok(None);
    };
    if !is_svg_asset(&info.url, &info.mime) {
        return Ok(None);
    }

    Ok(Some(LookupHit {
        title: page.title,
        page_url,
        asset_url: info.url,
    }))
}

/// Resolve a country name to its emblem file on Commons.
///
/// Probes a fixed list of conventional exact titles first, then falls back
/// to full-text search in the File namespace. API failures on a single
/// candidate are logged and treated as a miss so one flaky call cannot sink
/// the whole entity. Returns `None` when every strategy comes up empty.
pub async fn resolve_emblem(client: &CommonsClient, country: &str) -> Option<LookupHit> {
    for title in exact_title_candidates(country) {
        match file_info(client, &title).await {
            Ok(Some(hit)) => {
                debug!("exact title match for {}: {}", country, hit.title);
                return Some(hit);
            }
            Ok(None) => {}
            Err(e) => warn!("title lookup {:?} failed: {}", title, e),
        }
        client.nap().await;
    }

    for query in search_variants(country) {
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("list", "search"),
            ("srsearch", query.as_str()),
            ("srnamespace", "6"),
            ("srlimit", "10"),
            ("origin", "*"),
        ];
        let response: ApiResponse = match client.get_json(&params).await {
            Ok(r) => r,
            Err(e) => {
                warn!("search {:?} failed: {}", query, e);
                client.nap().await;
                continue;
            }
        };

        for hit in &response.query.search {
            if !hit.title.starts_with("File:") || !hit.title.to_lowercase().ends_with(".svg") {
                continue;
            }
            let bare = hit.title.strip_prefix("File:").unwrap_or(&hit.title);
            match file_info(client, bare).await {
                Ok(Some(resolved)) => {
                    debug!("search hit for {}: {}", country, resolved.title);
                    return Some(resolved);
                }
                Ok(None) => {}
                Err(e) => warn!("resolving search hit {:?} failed: {}", hit.title, e),
            }
        }
        client.nap().await;
    }

    None
}
