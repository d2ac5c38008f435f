//! Collection headers: totals and `Link` relations to neighbouring pages

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use url::Url;

pub const TOTAL_HEADER: HeaderName = HeaderName::from_static("x-wp-total");
pub const TOTAL_PAGES_HEADER: HeaderName = HeaderName::from_static("x-wp-totalpages");

/// Headers describing one page of a collection
///
/// `pairs` is the request's own query string; links repeat it with `page`
/// replaced. A previous link is emitted past the first page, pointing at the
/// last real page when the request overshot; a next link while pages remain.
pub fn pagination_headers(
    collection_url: &str,
    pairs: &[(String, String)],
    page: u32,
    total: usize,
    total_pages: usize,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_HEADER, HeaderValue::from(total));
    headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from(total_pages));

    let base = match Url::parse(collection_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = collection_url, error = %e, "Cannot build pagination links");
            return headers;
        }
    };

    let page = page as usize;

    if page > 1 {
        let prev = (page - 1).min(total_pages).max(1);
        append_link(&mut headers, &page_url(&base, pairs, prev), "prev");
    }

    if total_pages > page {
        append_link(&mut headers, &page_url(&base, pairs, page + 1), "next");
    }

    headers
}

fn page_url(base: &Url, pairs: &[(String, String)], page: usize) -> String {
    let mut url = base.clone();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in pairs.iter().filter(|(key, _)| key != "page") {
            query.append_pair(key, value);
        }
        query.append_pair("page", &page.to_string());
    }

    url.to_string()
}

fn append_link(headers: &mut HeaderMap, url: &str, rel: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("<{}>; rel=\"{}\"", url, rel)) {
        headers.append(header::LINK, value);
    }
}
