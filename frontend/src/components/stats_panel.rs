use leptos::prelude::*;

use pantry_shared::GroceryStats;
use pantry_shared::view::sorted_breakdown;

/// 统计面板最多展示的分类条数
const TOP_CATEGORIES: usize = 5;

/// 库存概览：总数、分类数与 Top-5 分类占比
#[component]
pub fn StatsPanel(
    /// 派生统计值
    stats: Signal<GroceryStats>,
) -> impl IntoView {
    let top_entries = move || {
        let stats = stats.get();
        let total = stats.total_items.max(1);
        sorted_breakdown(&stats)
            .into_iter()
            .take(TOP_CATEGORIES)
            .map(|(category, count)| {
                let percentage = (count * 100) / total;
                (category, count, percentage)
            })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"库存概览"</h3>

                <div class="flex justify-between items-center mb-4">
                    <div>
                        <p class="text-sm text-base-content/70">"商品总数"</p>
                        <p class="text-2xl font-bold text-primary">
                            {move || stats.get().total_items}
                        </p>
                    </div>
                    <div>
                        <p class="text-sm text-base-content/70">"分类数"</p>
                        <p class="text-2xl font-bold">
                            {move || stats.get().category_breakdown.len()}
                        </p>
                    </div>
                </div>

                <div class="space-y-3">
                    <For
                        each=top_entries
                        key=|(category, count, _)| (category.clone(), *count)
                        children=move |(category, count, percentage)| {
                            view! {
                                <div class="space-y-1">
                                    <div class="flex items-center justify-between">
                                        <p class="text-sm font-medium">{category}</p>
                                        <p class="text-sm text-base-content/70">
                                            {count} " 件 (" {percentage} "%)"
                                        </p>
                                    </div>
                                    <progress
                                        class="progress progress-primary h-2 w-full"
                                        value=percentage
                                        max="100"
                                    ></progress>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </div>
    }
}
