//! 分页计算
//!
//! 纯函数，不做任何 I/O。

/// 导航窗口最多显示的页码数
pub const WINDOW_SIZE: u64 = 5;

/// 总页数，至少为 1
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(per_page).max(1)
}

/// 把请求的页码收敛到 [1, total_pages]
pub fn clamp_page(requested: u64, total_pages: u64) -> u64 {
    requested.clamp(1, total_pages.max(1))
}

/// 以当前页为中心的页码窗口
///
/// 靠近末尾时窗口整体左移，保证长度为 `min(WINDOW_SIZE, total_pages)`。
pub fn page_window(current: u64, total_pages: u64) -> Vec<u64> {
    let half = WINDOW_SIZE / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = start + WINDOW_SIZE - 1;
    if end > total_pages {
        end = total_pages;
        start = end.saturating_sub(WINDOW_SIZE - 1).max(1);
    }
    (start..=end).collect()
}

/// 分页导航信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNav {
    pub page: u64,
    pub total_pages: u64,
    pub pages: Vec<u64>,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl PageNav {
    /// `current` 会先被收敛到合法范围
    pub fn new(current: u64, total_pages: u64) -> Self {
        let total_pages = total_pages.max(1);
        let page = clamp_page(current, total_pages);
        let has_prev = page > 1;
        let has_next = page < total_pages;

        Self {
            page,
            total_pages,
            pages: page_window(page, total_pages),
            has_prev,
            has_next,
            prev_page: has_prev.then(|| page - 1),
            next_page: has_next.then(|| page + 1),
        }
    }
}
