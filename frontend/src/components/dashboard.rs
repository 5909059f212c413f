use leptos::prelude::*;
use leptos::task::spawn_local;

use super::icons::*;
use super::{AddEditModal, CategoryFilter, DeleteConfirmDialog, StatsPanel};
use crate::auth::{logout, use_auth};
use crate::cache::CollectionCache;
use crate::dashboard::{DashboardEvent, DashboardState};
use crate::token_store::TokenStore;
use crate::use_api;
use pantry_shared::view::{compute_stats, filter_items, unique_categories};
use pantry_shared::{GroceryDraft, GroceryItem};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let store = use_context::<TokenStore>().expect("TokenStore should be provided");

    let state = RwSignal::new(DashboardState::default());
    // 网关与缓存含 Rc，放进 local slot 让各个处理器保持 Copy
    let api = StoredValue::new_local(use_api());
    let cache = StoredValue::new_local(CollectionCache::<Vec<GroceryItem>>::new());

    // 会话内的过滤状态，不跨刷新保留
    let search_query = RwSignal::new(String::new());
    let selected_category = RwSignal::new(Option::<String>::None);

    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错
    let (submitting, set_submitting) = signal(false);

    // 读取集合：缓存优先，force 时强制重拉
    let load_items = move |force: bool| {
        let api = api.get_value();
        let cache = cache.get_value();
        state.update(|s| s.apply(DashboardEvent::FetchStarted));
        spawn_local(async move {
            let fetch = || {
                let api = api.clone();
                async move { api.list_all().await }
            };
            let result = if force {
                cache.refresh(fetch).await
            } else {
                cache.load(fetch).await
            };
            match result {
                Ok(items) => state.update(|s| s.apply(DashboardEvent::FetchSucceeded(items))),
                // 会话过期由守卫负责跳转，这个请求到此为止
                Err(e) if e.is_session_expired() => {}
                Err(e) => state.update(|s| s.apply(DashboardEvent::FetchFailed(e.message))),
            }
        });
    };

    // 挂载即加载
    Effect::new(move |_| load_items(false));

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 变更提交：带 id 走数量更新，否则新建。
    // 编辑路径只同步数量，名称/分类的改动不会发给服务端（保留既有行为）。
    let handle_submit = move |draft: GroceryDraft| {
        let api = api.get_value();
        let cache = cache.get_value();
        set_submitting.set(true);
        spawn_local(async move {
            let is_edit = draft.id.is_some();
            let result = if is_edit {
                api.update_quantity(&draft.name, draft.quantity)
                    .await
                    .map(|_| ())
            } else {
                api.create(&draft.name, draft.quantity, &draft.category)
                    .await
                    .map(|_| ())
            };
            match result {
                Ok(()) => {
                    state.update(|s| s.apply(DashboardEvent::SubmitAccepted));
                    cache.invalidate();
                    load_items(false);
                    let msg = if is_edit { "商品已更新" } else { "商品已添加" };
                    set_notification.set(Some((msg.to_string(), false)));
                }
                Err(e) if e.is_session_expired() => {}
                // 失败不回滚、不重试，模态留在原地
                Err(e) => set_notification.set(Some((e.message, true))),
            }
            set_submitting.set(false);
        });
    };

    let confirm_delete = move |_: ()| {
        let Some(target) = state.get_untracked().item_to_delete else {
            return;
        };
        // 确认框立即关闭，独立于删除调用的成败
        state.update(|s| s.apply(DashboardEvent::DeleteConfirmed));

        let api = api.get_value();
        let cache = cache.get_value();
        spawn_local(async move {
            match api.delete_by_id(&target.id).await {
                Ok(_) => {
                    cache.invalidate();
                    load_items(false);
                    set_notification.set(Some(("商品已删除".to_string(), false)));
                }
                Err(e) if e.is_session_expired() => {}
                Err(e) => set_notification.set(Some((e.message, true))),
            }
        });
    };

    let on_logout = {
        let store = store.clone();
        move |_| logout(&auth_ctx, &store)
    };

    // 派生视图状态
    let items = Signal::derive(move || state.with(|s| s.items().to_vec()));
    let filtered = Signal::derive(move || {
        filter_items(
            &items.get(),
            &search_query.get(),
            selected_category.get().as_deref(),
        )
    });
    let categories = Signal::derive(move || unique_categories(&items.get()));
    let stats = Signal::derive(move || compute_stats(&items.get()));

    let is_loading = move || state.with(|s| s.is_loading());
    let load_error = move || state.with(|s| s.error().map(str::to_string));
    let has_filter = move || !search_query.get().is_empty() || selected_category.get().is_some();

    let modal_open = Signal::derive(move || state.with(|s| s.add_edit_open));
    let modal_initial = Signal::derive(move || state.with(|s| s.current_item.clone()));
    let dialog_open = Signal::derive(move || state.with(|s| s.delete_confirm_open));
    let dialog_name = Signal::derive(move || {
        state.with(|s| {
            s.item_to_delete
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default()
        })
    });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                // 通知提示框
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let (_, is_err) = notification.get().unwrap();
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().unwrap().0}</span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl gap-2">
                    <div class="flex-1 gap-2">
                        <ShoppingBasket attr:class="text-primary h-6 w-6" />
                        <a class="btn btn-ghost text-xl">"Pantry 库存面板"</a>
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {move || auth_ctx.state.get().username.unwrap_or_default()}
                        </span>
                    </div>
                    <div class="flex-none gap-2">
                        <label class="input input-bordered flex items-center gap-2">
                            <Search attr:class="h-4 w-4 opacity-50" />
                            <input
                                type="text"
                                class="grow"
                                placeholder="搜索商品..."
                                on:input=move |ev| search_query.set(event_target_value(&ev))
                                prop:value=search_query
                            />
                        </label>
                        <button
                            class="btn btn-primary gap-2"
                            on:click=move |_| state.update(|s| s.apply(DashboardEvent::AddRequested))
                        >
                            <Plus attr:class="h-4 w-4" /> "添加商品"
                        </button>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "退出"
                        </button>
                    </div>
                </div>

                <Show
                    when=move || load_error().is_none()
                    fallback=move || view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body items-center text-center">
                                <h2 class="card-title text-error">"商品加载失败"</h2>
                                <p class="text-base-content/70">{move || load_error().unwrap_or_default()}</p>
                                <button on:click=move |_| load_items(true) class="btn btn-primary mt-4">
                                    "重试"
                                </button>
                            </div>
                        </div>
                    }
                >
                    <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
                        <div class="md:col-span-1">
                            <StatsPanel stats=stats />
                        </div>

                        <div class="md:col-span-3 space-y-4">
                            <CategoryFilter categories=categories selected=selected_category />

                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body p-0">
                                    <div class="flex items-center justify-between p-6 pb-2">
                                        <div>
                                            <h3 class="card-title">"库存清单"</h3>
                                            <p class="text-base-content/70 text-sm">"管理你的商品。"</p>
                                        </div>
                                        <button
                                            on:click=move |_| load_items(true)
                                            disabled=is_loading
                                            class="btn btn-ghost btn-circle"
                                        >
                                            <RefreshCw attr:class=move || if is_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                                        </button>
                                    </div>

                                    <div class="overflow-x-auto w-full">
                                        <table class="table table-zebra w-full">
                                            <thead>
                                                <tr>
                                                    <th>"名称"</th>
                                                    <th>"分类"</th>
                                                    <th>"数量"</th>
                                                    <th></th>
                                                </tr>
                                            </thead>
                                            <tbody>
                                                <Show when=move || is_loading() && filtered.get().is_empty()>
                                                    <tr>
                                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                                            <span class="loading loading-spinner loading-md"></span> " 加载中..."
                                                        </td>
                                                    </tr>
                                                </Show>
                                                <Show when=move || !is_loading() && filtered.get().is_empty()>
                                                    <tr>
                                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                                            {move || if has_filter() {
                                                                "没有匹配的商品"
                                                            } else {
                                                                "库存还是空的，添加第一件商品吧"
                                                            }}
                                                        </td>
                                                    </tr>
                                                </Show>
                                                <For
                                                    each=move || filtered.get()
                                                    key=|item| item.id.clone()
                                                    children=move |item| {
                                                        let edit_item = item.clone();
                                                        let delete_id = item.id.clone();
                                                        view! {
                                                            <tr>
                                                                <td class="font-medium">{item.name.clone()}</td>
                                                                <td>
                                                                    <div class="badge badge-accent badge-outline">
                                                                        {item.category.clone()}
                                                                    </div>
                                                                </td>
                                                                <td class="font-mono">{item.quantity}</td>
                                                                <td class="text-right">
                                                                    <button
                                                                        class="btn btn-ghost btn-sm btn-square"
                                                                        on:click=move |_| {
                                                                            state.update(|s| s.apply(
                                                                                DashboardEvent::EditRequested(edit_item.clone()),
                                                                            ))
                                                                        }
                                                                    >
                                                                        <Pencil attr:class="h-4 w-4" />
                                                                    </button>
                                                                    <button
                                                                        class="btn btn-ghost btn-sm btn-square text-error"
                                                                        on:click=move |_| {
                                                                            state.update(|s| s.apply(
                                                                                DashboardEvent::DeleteRequested(delete_id.clone()),
                                                                            ))
                                                                        }
                                                                    >
                                                                        <Trash2 attr:class="h-4 w-4" />
                                                                    </button>
                                                                </td>
                                                            </tr>
                                                        }
                                                    }
                                                />
                                            </tbody>
                                        </table>
                                    </div>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>
            </div>

            <AddEditModal
                open=modal_open
                initial=modal_initial
                on_submit=handle_submit
                on_close=move |_: ()| state.update(|s| s.apply(DashboardEvent::ModalClosed))
                submitting=submitting.into()
            />

            <DeleteConfirmDialog
                open=dialog_open
                item_name=dialog_name
                on_confirm=confirm_delete
                on_cancel=move |_: ()| state.update(|s| s.apply(DashboardEvent::DeleteDialogClosed))
            />
        </div>
    }
}
