use serde::Deserialize;

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn resolve(&self) -> (i64, i64) {
        (self.page.unwrap_or(1).max(1), self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}
