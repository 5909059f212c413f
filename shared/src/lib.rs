//! Pantry 共享层
//!
//! 前端与远端 REST 服务之间的协议与纯领域逻辑。
//! 本 crate 不依赖浏览器环境，可在本机直接运行测试。

use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod token;
pub mod view;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 表单里的预置分类，顺序即下拉框顺序
pub const PREDEFINED_CATEGORIES: &[&str] = &[
    "Fruits",
    "Vegetables",
    "Dairy",
    "Bakery",
    "Meat",
    "Frozen",
    "Pantry",
    "Beverages",
    "Snacks",
    "Munchies",
];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 库存商品，id 由服务端分配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub category: String,
}

/// 新建/编辑表单提交的数据；id 为 None 表示新建
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryDraft {
    pub id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub category: String,
}

/// 由商品集合派生的统计值，不落盘、不回传服务端
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroceryStats {
    pub total_items: usize,
    pub category_breakdown: std::collections::HashMap<String, usize>,
}

// =========================================================
// 登录协议
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// 服务端非 2xx 响应的错误包体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
