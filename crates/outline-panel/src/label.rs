//! Page label shown at the top of the panel.

use outline_protocols::PageIdentity;
use percent_encoding::percent_decode_str;
use url::Url;

pub const LOCAL_FILE_LABEL: &str = "Local file";
pub const INVALID_PAGE_LABEL: &str = "Invalid page";
pub const UNAVAILABLE_LABEL: &str = "Unable to get page info";

/// Label for a page: the file name of `file://` pages, the host name of
/// other URLs, otherwise the title.
pub fn page_label(page: Option<&PageIdentity>) -> String {
    let Some(page) = page else {
        return LOCAL_FILE_LABEL.to_string();
    };
    let title = page.title.as_deref().filter(|t| !t.is_empty());

    if page.url.is_empty() {
        return title.unwrap_or(LOCAL_FILE_LABEL).to_string();
    }
    if page.is_file_scheme() {
        return file_name_from_url(&page.url);
    }

    match Url::parse(&page.url) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => title.unwrap_or(INVALID_PAGE_LABEL).to_string(),
        },
        Err(_) => title.unwrap_or(INVALID_PAGE_LABEL).to_string(),
    }
}

/// Percent-decoded last path segment of a `file://` URL. Windows paths
/// split on backslashes.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.strip_prefix("file://").unwrap_or(url);
    let segment = if path.contains('\\') {
        path.rsplit('\\').next()
    } else {
        path.rsplit('/').next()
    };

    match segment.filter(|s| !s.is_empty()) {
        Some(segment) => percent_decode_str(segment)
            .decode_utf8()
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| LOCAL_FILE_LABEL.to_string()),
        None => LOCAL_FILE_LABEL.to_string(),
    }
}
