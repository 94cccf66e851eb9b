use serde::Deserialize;

pub const DEFAULT_ITEMS_PER_PAGE: u64 = 10;
pub const MAX_ITEMS_PER_PAGE: u64 = 100;

/// MongoDB takes `skip` as a signed 64-bit value.
const MAX_SKIP: u64 = i64::MAX as u64;

/// `?page=&itemsPerPage=` as sent by the storefront.
#[derive(Debug, Default, Clone, Copy, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub items_per_page: Option<u64>,
}

/// Normalized window over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl From<PageQuery> for Page {
    fn from(q: PageQuery) -> Self {
        let page = q.page.unwrap_or(1).max(1);
        let limit = match q.items_per_page {
            None | Some(0) => DEFAULT_ITEMS_PER_PAGE,
            Some(n) => n.min(MAX_ITEMS_PER_PAGE),
        };

        Page {
            skip: (page - 1).saturating_mul(limit).min(MAX_SKIP),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let page = Page::from(PageQuery::default());
        assert_eq!(page, Page { skip: 0, limit: DEFAULT_ITEMS_PER_PAGE });
    }

    #[test]
    fn page_zero_is_first_page() {
        let page = Page::from(PageQuery { page: Some(0), items_per_page: Some(5) });
        assert_eq!(page, Page { skip: 0, limit: 5 });
    }

    #[test]
    fn skips_previous_pages() {
        let page = Page::from(PageQuery { page: Some(3), items_per_page: Some(4) });
        assert_eq!(page, Page { skip: 8, limit: 4 });
    }

    #[test]
    fn caps_page_size() {
        let page = Page::from(PageQuery { page: Some(1), items_per_page: Some(10_000) });
        assert_eq!(page.limit, MAX_ITEMS_PER_PAGE);
    }

    #[test]
    fn huge_page_stays_within_signed_skip() {
        let page = Page::from(PageQuery {
            page: Some(200_000_000_000_000_000),
            items_per_page: Some(100),
        });
        assert_eq!(page.skip, i64::MAX as u64);
        assert_eq!(page.limit, 100);
        assert!(i64::try_from(page.skip).is_ok());
    }
}
