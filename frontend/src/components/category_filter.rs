use leptos::prelude::*;

/// 分类过滤条
///
/// "全部"加上集合中出现过的分类（首次出现顺序），单选；
/// 选中态只存在内存里，不跨刷新保留。
#[component]
pub fn CategoryFilter(
    /// 可选分类，来自当前集合的派生值
    categories: Signal<Vec<String>>,
    /// 选中的分类；None 表示不限
    selected: RwSignal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="flex flex-wrap gap-2">
            <button
                class=move || {
                    if selected.get().is_none() {
                        "btn btn-sm btn-primary"
                    } else {
                        "btn btn-sm btn-ghost"
                    }
                }
                on:click=move |_| selected.set(None)
            >
                "全部"
            </button>
            <For
                each=move || categories.get()
                key=|category| category.clone()
                children=move |category| {
                    let value = category.clone();
                    let is_active = {
                        let value = value.clone();
                        move || selected.get().as_deref() == Some(value.as_str())
                    };
                    view! {
                        <button
                            class=move || {
                                if is_active() {
                                    "btn btn-sm btn-primary"
                                } else {
                                    "btn btn-sm btn-ghost"
                                }
                            }
                            on:click=move |_| selected.set(Some(value.clone()))
                        >
                            {category}
                        </button>
                    }
                }
            />
        </div>
    }
}
