//! Pantry 前端应用
//!
//! Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由定义与带守卫的路由服务
//! - `token_store` / `auth`: 凭据槽位与认证状态
//! - `middleware` / `api`: 认证注入、401 拦截与类型化网关
//! - `cache`: 商品集合的失效式查询缓存
//! - `dashboard`: 面板状态机
//! - `components`: UI 组件层

mod api;
mod auth;
mod cache;
mod config;
mod dashboard;
mod error;
mod middleware;
mod token_store;

mod components {
    mod add_edit_modal;
    mod category_filter;
    pub mod dashboard;
    mod delete_dialog;
    mod icons;
    pub mod login;
    mod stats_panel;

    pub(crate) use add_edit_modal::AddEditModal;
    pub(crate) use category_filter::CategoryFilter;
    pub(crate) use delete_dialog::DeleteConfirmDialog;
    pub(crate) use stats_panel::StatsPanel;
}

// 原生 Web API 封装模块
// 替代 gloo-* 系列 crate 以减小 WASM 二进制体积。
pub(crate) mod web;

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::GroceryApi;
use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::middleware::{AuthInjector, SessionGuard};
use crate::token_store::{TokenStore, browser_token_store};
use crate::web::FetchClient;
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 生产组合下的网关类型：fetch 外面包认证注入，再包 401 守卫
pub(crate) type AppApi = Rc<GroceryApi<SessionGuard<AuthInjector<FetchClient>>>>;

pub(crate) fn use_api() -> AppApi {
    use_context::<StoredValue<AppApi, LocalStorage>>()
        .expect("GroceryApi should be provided")
        .get_value()
}

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 凭据槽位与认证上下文
    let store = browser_token_store();
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context::<TokenStore>(store.clone());

    // 2. 从存量令牌恢复会话
    init_auth(&auth_ctx, &store);

    // 3. 组合请求管线并提供网关
    let transport = SessionGuard::new(
        AuthInjector::new(FetchClient, store.clone()),
        store.clone(),
        Rc::new(auth_ctx.expire_hook()),
    );
    let api: AppApi = Rc::new(GroceryApi::new(config::api_base(), transport));
    provide_context(StoredValue::new_local(api));

    // 4. 守卫信号注入路由服务
    let is_authenticated = auth_ctx.guard_signal(&store);

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
