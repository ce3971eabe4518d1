//! The current page as a single `page=<n>` query parameter.

pub const PAGE_PARAM: &str = "page";

/// Absent, non-numeric or non-positive values fall back to page 1.
pub fn parse_page_param(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Finds the page parameter in a raw query string such as `?page=3&tab=tx`.
pub fn page_from_query(query: &str) -> u64 {
    let query = query.strip_prefix('?').unwrap_or(query);
    let value = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == PAGE_PARAM)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
        .map(|v| v.into_owned());
    parse_page_param(value.as_deref())
}

pub fn page_query(page: u64) -> String {
    format!("{PAGE_PARAM}={}", page.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_values_default_to_first_page() {
        assert_eq!(parse_page_param(None), 1);
        assert_eq!(parse_page_param(Some("")), 1);
        assert_eq!(parse_page_param(Some("0")), 1);
        assert_eq!(parse_page_param(Some("-3")), 1);
        assert_eq!(parse_page_param(Some("two")), 1);
        assert_eq!(parse_page_param(Some(" 7 ")), 7);
    }

    #[test]
    fn reads_page_from_query_string() {
        assert_eq!(page_from_query("?tab=tx&page=4"), 4);
        assert_eq!(page_from_query("page=%35"), 5);
        assert_eq!(page_from_query("pages=9"), 1);
        assert_eq!(page_from_query(""), 1);
    }

    #[test]
    fn renders_query() {
        assert_eq!(page_query(3), "page=3");
        assert_eq!(page_query(0), "page=1");
    }
}
