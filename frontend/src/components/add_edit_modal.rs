use leptos::prelude::*;

use pantry_shared::{GroceryDraft, GroceryItem, PREDEFINED_CATEGORIES};

/// 下拉框里"自定义分类"对应的哨兵值
const CUSTOM_CHOICE: &str = "__custom__";

/// 逐字段的校验失败信息
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
}

impl FieldErrors {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.category.is_none()
    }
}

/// 表单校验，失败的提交不会触网
///
/// 规则与服务端一致：名称 2–50 字符、数量 0–10000 的整数、
/// 分类必填且不超过 50 字符。
pub fn validate_form(
    name: &str,
    quantity_raw: &str,
    category: &str,
) -> Result<(String, u32, String), FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = name.trim();
    if name.chars().count() < 2 {
        errors.name = Some("名称至少 2 个字符".to_string());
    } else if name.chars().count() > 50 {
        errors.name = Some("名称不能超过 50 个字符".to_string());
    }

    let quantity = match quantity_raw.trim().parse::<u32>() {
        Ok(q) if q > 10_000 => {
            errors.quantity = Some("数量不能超过 10000".to_string());
            None
        }
        Ok(q) => Some(q),
        Err(_) => {
            errors.quantity = Some("数量必须是不小于 0 的整数".to_string());
            None
        }
    };

    let category = category.trim();
    if category.is_empty() {
        errors.category = Some("请选择分类".to_string());
    } else if category.chars().count() > 50 {
        errors.category = Some("分类不能超过 50 个字符".to_string());
    }

    if errors.is_empty() {
        Ok((
            name.to_string(),
            quantity.expect("无校验错误时数量必已解析"),
            category.to_string(),
        ))
    } else {
        Err(errors)
    }
}

/// 新建/编辑模态
///
/// 开关由面板状态机控制；提交只上抛草稿，成功与否、要不要关闭
/// 都由面板决定（失败时模态留在原地供重试或取消）。
#[component]
pub fn AddEditModal(
    /// 是否打开
    open: Signal<bool>,
    /// 编辑模式下的初始值；None 为新建
    initial: Signal<Option<GroceryItem>>,
    #[prop(into)] on_submit: Callback<GroceryDraft>,
    #[prop(into)] on_close: Callback<()>,
    /// 提交进行中（禁用按钮）
    submitting: Signal<bool>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 表单字段
    let (name, set_name) = signal(String::new());
    let (quantity, set_quantity) = signal(String::new());
    let (category_choice, set_category_choice) = signal(String::new());
    let (custom_category, set_custom_category) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::default());

    // 打开时按初始值预填或重置
    Effect::new(move |_| {
        if open.get() {
            set_errors.set(FieldErrors::default());
            match initial.get_untracked() {
                Some(item) => {
                    set_name.set(item.name.clone());
                    set_quantity.set(item.quantity.to_string());
                    if PREDEFINED_CATEGORIES.contains(&item.category.as_str()) {
                        set_category_choice.set(item.category.clone());
                        set_custom_category.set(String::new());
                    } else {
                        set_category_choice.set(CUSTOM_CHOICE.to_string());
                        set_custom_category.set(item.category);
                    }
                }
                None => {
                    set_name.set(String::new());
                    set_quantity.set("0".to_string());
                    set_category_choice.set(String::new());
                    set_custom_category.set(String::new());
                }
            }
        }
    });

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let effective_category = move || {
        let choice = category_choice.get();
        if choice == CUSTOM_CHOICE {
            custom_category.get()
        } else {
            choice
        }
    };

    let handle_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match validate_form(&name.get(), &quantity.get(), &effective_category()) {
            Ok((name, quantity, category)) => {
                set_errors.set(FieldErrors::default());
                on_submit.run(GroceryDraft {
                    id: initial.get_untracked().map(|item| item.id),
                    name,
                    quantity,
                    category,
                });
            }
            Err(field_errors) => set_errors.set(field_errors),
        }
    };

    let is_edit = move || initial.get().is_some();

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| on_close.run(())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || if is_edit() { "编辑商品" } else { "添加商品" }}
                </h3>
                <p class="py-2 text-base-content/70">
                    {move || if is_edit() {
                        "修改数量后保存。"
                    } else {
                        "填写商品信息加入库存。"
                    }}
                </p>

                <form on:submit=handle_submit class="space-y-4">
                    <div class="form-control">
                        <label for="item_name" class="label">
                            <span class="label-text">"名称"</span>
                        </label>
                        <input id="item_name"
                            type="text"
                            placeholder="Organic Apples"
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                            prop:value=name
                            class="input input-bordered w-full"
                        />
                        <Show when=move || errors.get().name.is_some()>
                            <label class="label">
                                <span class="label-text-alt text-error">
                                    {move || errors.get().name.unwrap()}
                                </span>
                            </label>
                        </Show>
                    </div>

                    <div class="form-control">
                        <label for="item_quantity" class="label">
                            <span class="label-text">"数量"</span>
                        </label>
                        <input id="item_quantity"
                            type="number"
                            min="0"
                            on:input=move |ev| set_quantity.set(event_target_value(&ev))
                            prop:value=quantity
                            class="input input-bordered w-full"
                        />
                        <Show when=move || errors.get().quantity.is_some()>
                            <label class="label">
                                <span class="label-text-alt text-error">
                                    {move || errors.get().quantity.unwrap()}
                                </span>
                            </label>
                        </Show>
                    </div>

                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"分类"</span>
                        </label>
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| set_category_choice.set(event_target_value(&ev))
                        >
                            <option value="" selected=move || category_choice.get().is_empty()>
                                "选择分类"
                            </option>
                            {PREDEFINED_CATEGORIES
                                .iter()
                                .map(|&c| view! {
                                    <option value=c selected=move || category_choice.get() == c>
                                        {c}
                                    </option>
                                })
                                .collect_view()}
                            <option
                                value=CUSTOM_CHOICE
                                selected=move || category_choice.get() == CUSTOM_CHOICE
                            >
                                "自定义..."
                            </option>
                        </select>
                        {move || (category_choice.get() == CUSTOM_CHOICE).then(|| view! {
                            <input
                                type="text"
                                placeholder="自定义分类名称"
                                on:input=move |ev| set_custom_category.set(event_target_value(&ev))
                                prop:value=custom_category
                                class="input input-bordered w-full mt-2"
                            />
                        })}
                        <Show when=move || errors.get().category.is_some()>
                            <label class="label">
                                <span class="label-text-alt text-error">
                                    {move || errors.get().category.unwrap()}
                                </span>
                            </label>
                        </Show>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_close.run(())>
                            "取消"
                        </button>
                        <button type="submit" disabled=move || submitting.get() class="btn btn-primary">
                            {move || if submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "保存中..." }.into_any()
                            } else if is_edit() {
                                "保存".into_any()
                            } else {
                                "添加".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_input_passes_through_trimmed() {
        let (name, quantity, category) = validate_form(" Organic Apples ", "5", "Fruits").unwrap();
        assert_eq!(name, "Organic Apples");
        assert_eq!(quantity, 5);
        assert_eq!(category, "Fruits");
    }

    #[test]
    fn name_bounds_are_enforced() {
        let errors = validate_form("a", "5", "Fruits").unwrap_err();
        assert!(errors.name.is_some());
        assert!(errors.quantity.is_none());

        let long_name = "x".repeat(51);
        assert!(validate_form(&long_name, "5", "Fruits")
            .unwrap_err()
            .name
            .is_some());
        assert!(validate_form(&"x".repeat(50), "5", "Fruits").is_ok());
    }

    #[test]
    fn quantity_rejects_negatives_and_overflow() {
        assert!(validate_form("Milk", "-1", "Dairy").unwrap_err().quantity.is_some());
        assert!(validate_form("Milk", "3.5", "Dairy").unwrap_err().quantity.is_some());
        assert!(validate_form("Milk", "10001", "Dairy").unwrap_err().quantity.is_some());
        assert!(validate_form("Milk", "10000", "Dairy").is_ok());
        assert!(validate_form("Milk", "0", "Dairy").is_ok());
    }

    #[test]
    fn category_is_required() {
        let errors = validate_form("Milk", "5", "  ").unwrap_err();
        assert!(errors.category.is_some());
        assert!(validate_form("Milk", "5", &"c".repeat(51))
            .unwrap_err()
            .category
            .is_some());
    }

    #[test]
    fn multiple_failures_are_reported_together() {
        let errors = validate_form("", "abc", "").unwrap_err();
        assert!(errors.name.is_some());
        assert!(errors.quantity.is_some());
        assert!(errors.category.is_some());
    }
}
