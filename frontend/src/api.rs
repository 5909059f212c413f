//! 远程库存网关
//!
//! 每个服务端能力对应一个类型化操作。请求的形状（方法、路径、
//! 请求体、响应解码）全部由 `pantry_shared::protocol` 的描述符定义，
//! 本模块只负责拼 URL、走注入的传输层、把失败翻译成用户可读的错误。
//! 服务端按名称查找是大小写不敏感的，客户端不做二次校验。

use crate::error::{ApiError, ApiResult};
use crate::web::{HttpRequest, HttpResponse, HttpTransport};
use pantry_shared::protocol::{
    ApiRequest, CountGroceries, CreateGrocery, DeleteGrocery, GetGroceryByName, ListByCategory,
    ListGroceries, UpdateCategory, UpdateQuantity,
};
use pantry_shared::{ErrorBody, GroceryItem, LoginRequest};

pub struct GroceryApi<C> {
    base_url: String,
    client: C,
}

impl<C: HttpTransport> GroceryApi<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// 统一的发送与解码路径
    async fn dispatch<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let url = format!("{}{}", self.base_url, request.path());
        let mut req = HttpRequest::new(url, R::METHOD).with_auth(R::REQUIRES_AUTH);
        if let Some(body) = request.body() {
            req = req.with_json_body(&body);
        }

        let resp = self.client.send(req).await?;

        if !resp.ok() {
            return Err(self.classify_failure(request, &resp));
        }

        // 成功但没有内容同样算操作失败，带回操作专属的提示
        if resp.body.trim().is_empty() {
            return Err(ApiError::gateway(request.failure_message()));
        }

        R::decode(&resp.body)
            .map_err(|e| ApiError::serialization(format!("{}: {}", request.failure_message(), e)))
    }

    /// 非 2xx 定性：优先用服务端 error 字段里的话
    ///
    /// 401 只会在这里出现于登录请求（其余已被会话守卫拦截），
    /// 映射为凭据无效。
    fn classify_failure<R: ApiRequest>(&self, request: &R, resp: &HttpResponse) -> ApiError {
        if resp.status == 401 {
            return ApiError::auth("用户名或密码错误");
        }
        let server_text = serde_json::from_str::<ErrorBody>(&resp.body)
            .ok()
            .and_then(|b| b.error);
        match server_text {
            Some(text) => ApiError::gateway(text),
            None => ApiError::gateway(format!("{}: HTTP {}", request.failure_message(), resp.status)),
        }
    }

    // --- 库存操作 ---

    /// 获取全部商品
    pub async fn list_all(&self) -> ApiResult<Vec<GroceryItem>> {
        self.dispatch(&ListGroceries).await
    }

    /// 按名称查找单个商品
    #[allow(dead_code)]
    pub async fn get_by_name(&self, name: &str) -> ApiResult<GroceryItem> {
        self.dispatch(&GetGroceryByName {
            name: name.to_string(),
        })
        .await
    }

    /// 获取某个分类下的商品
    #[allow(dead_code)]
    pub async fn list_by_category(&self, category: &str) -> ApiResult<Vec<GroceryItem>> {
        self.dispatch(&ListByCategory {
            category: category.to_string(),
        })
        .await
    }

    /// 新建商品，id 由服务端分配
    pub async fn create(&self, name: &str, quantity: u32, category: &str) -> ApiResult<GroceryItem> {
        self.dispatch(&CreateGrocery {
            name: name.to_string(),
            quantity,
            category: category.to_string(),
        })
        .await
    }

    /// 批量改名分类，返回服务端的文字摘要
    #[allow(dead_code)]
    pub async fn update_category(&self, current: &str, new_category: &str) -> ApiResult<String> {
        self.dispatch(&UpdateCategory {
            current_category: current.to_string(),
            new_category: new_category.to_string(),
        })
        .await
    }

    /// 按名称更新数量
    pub async fn update_quantity(&self, name: &str, new_quantity: u32) -> ApiResult<String> {
        self.dispatch(&UpdateQuantity {
            name: name.to_string(),
            new_quantity,
        })
        .await
    }

    /// 按 id 删除
    pub async fn delete_by_id(&self, id: &str) -> ApiResult<String> {
        self.dispatch(&DeleteGrocery { id: id.to_string() }).await
    }

    /// 商品总数
    #[allow(dead_code)]
    pub async fn count(&self) -> ApiResult<u64> {
        self.dispatch(&CountGroceries).await
    }

    // --- 认证 ---

    /// 交换凭据，返回服务端签发的令牌
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let resp = self
            .dispatch(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        if resp.token.trim().is_empty() {
            return Err(ApiError::gateway("服务端未返回令牌"));
        }
        Ok(resp.token)
    }
}
