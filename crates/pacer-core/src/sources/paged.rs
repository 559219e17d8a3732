/// Offset window of one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub start: u64,
    pub count: u64,
}

impl PageRequest {
    /// Substitute `{start}` and `{count}` in a URL template.
    pub fn apply(&self, template: &str) -> String {
        template
            .replace("{start}", &self.start.to_string())
            .replace("{count}", &self.count.to_string())
    }
}

/// Split `total_items` into `ceil(total_items / page_size)` requests of
/// `page_size` items each. Returns nothing when either argument is zero.
pub fn page_requests(total_items: u64, page_size: u64) -> Vec<PageRequest> {
    if total_items == 0 || page_size == 0 {
        return Vec::new();
    }
    let pages = total_items.div_ceil(page_size);
    (0..pages)
        .map(|i| PageRequest {
            start: i * page_size,
            count: page_size,
        })
        .collect()
}
