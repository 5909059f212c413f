use leptos::prelude::*;
use leptos::task::spawn_local;

use super::icons::ShoppingBasket;
use crate::auth::{login, use_auth};
use crate::token_store::TokenStore;
use crate::use_api;
use crate::web::router::use_router;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let store = use_context::<TokenStore>().expect("TokenStore should be provided");
    let api = use_api();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("请输入用户名和密码".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let store = store.clone();
        let api = api.clone();
        spawn_local(async move {
            match login(&auth_ctx, &store, &api, &username.get(), &password.get()).await {
                Ok(()) => {
                    // 路由服务监听认证信号，这里显式走一次守卫即可回到原始目标
                    router.navigate("/");
                }
                Err(e) => {
                    // 凭据无效或网关失败都行内展示，不跳转
                    set_error_msg.set(Some(e.message));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShoppingBasket attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Pantry"</h1>
                        <p class="text-base-content/70">"登录后管理你的库存"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"用户名"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="admin"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "登录中..." }.into_any()
                                } else {
                                    "登录".into_any()
                                }}
                            </button>
                        </div>

                        <p class="mt-2 text-sm text-base-content/50 text-center">
                            "演示账号: admin / password"
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
