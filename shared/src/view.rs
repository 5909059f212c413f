//! 派生视图状态
//!
//! 面板展示所需的纯投影：同样的输入永远得到同样的输出，
//! 不产生副作用，方便按输入做记忆化。

use crate::{GroceryItem, GroceryStats};

/// 集合中出现过的分类，按首次出现顺序去重
pub fn unique_categories(items: &[GroceryItem]) -> Vec<String> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.iter().any(|c| c == &item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

/// 按搜索词与选中分类过滤
///
/// 两个条件取交集：名称大小写不敏感地包含 `query`（空串匹配一切），
/// 且分类等于 `selected`（None 表示不限分类）。
pub fn filter_items(
    items: &[GroceryItem],
    query: &str,
    selected: Option<&str>,
) -> Vec<GroceryItem> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .filter(|item| selected.is_none_or(|c| item.category == c))
        .cloned()
        .collect()
}

/// 单趟扫描出总数与分类计数
///
/// 计数从出现过的商品累加而来，因此不会出现零值条目。
pub fn compute_stats(items: &[GroceryItem]) -> GroceryStats {
    let mut stats = GroceryStats {
        total_items: items.len(),
        ..Default::default()
    };
    for item in items {
        *stats
            .category_breakdown
            .entry(item.category.clone())
            .or_insert(0) += 1;
    }
    stats
}

/// 分类计数按数量降序排列（同数量按名称升序），供统计面板取 Top-N
pub fn sorted_breakdown(stats: &GroceryStats) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = stats
        .category_breakdown
        .iter()
        .map(|(category, count)| (category.clone(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}
