use leptos::prelude::*;

/// 删除确认框
///
/// 点确认即触发回调并由状态机立即关闭，不等待删除请求的结果。
#[component]
pub fn DeleteConfirmDialog(
    /// 是否打开
    open: Signal<bool>,
    /// 待删除商品的展示名
    item_name: Signal<String>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

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

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| on_cancel.run(())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"删除商品"</h3>
                <p class="py-4">
                    "确定要把 " <span class="font-bold">{move || item_name.get()}</span>
                    " 从库存中删除吗？该操作不可撤销。"
                </p>
                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| on_cancel.run(())>
                        "取消"
                    </button>
                    <button class="btn btn-error" on:click=move |_| on_confirm.run(())>
                        "删除"
                    </button>
                </div>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
