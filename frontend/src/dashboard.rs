//! 面板状态机
//!
//! 把"集合加载阶段 × 模态开关 × 选中槽位"建模为显式状态与事件转移，
//! 组件层只负责把事件喂进来、把网络调用的结果翻译成事件。
//! 非法组合因此可以在测试里直接断言。

use pantry_shared::GroceryItem;

/// 商品集合的加载阶段
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<GroceryItem>),
    /// 携带展示给用户的错误文案；重试按钮重新走一遍加载
    Error(String),
}

/// 删除确认框携带的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    pub phase: LoadPhase,
    /// 新建/编辑模态是否打开
    pub add_edit_open: bool,
    /// 删除确认框是否打开
    pub delete_confirm_open: bool,
    /// 编辑模式下的当前商品；None 表示新建
    pub current_item: Option<GroceryItem>,
    pub item_to_delete: Option<DeleteTarget>,
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    FetchStarted,
    FetchSucceeded(Vec<GroceryItem>),
    FetchFailed(String),
    /// 打开新建模态（清空选中）
    AddRequested,
    /// 打开编辑模态
    EditRequested(GroceryItem),
    /// 用户关闭模态（取消）
    ModalClosed,
    /// 提交的变更已在服务端成功：关模态、清选中
    SubmitAccepted,
    /// 请求删除某个 id；在已加载集合里找不到时忽略
    DeleteRequested(String),
    DeleteDialogClosed,
    /// 确认删除：无论随后的网络调用成败，确认框立即关闭
    DeleteConfirmed,
}

impl DashboardState {
    /// 已加载的集合；其他阶段视为空集
    pub fn items(&self) -> &[GroceryItem] {
        match &self.phase {
            LoadPhase::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// 状态转移函数；未列出的组合是显式的 no-op
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::FetchStarted => {
                self.phase = LoadPhase::Loading;
            }
            DashboardEvent::FetchSucceeded(items) => {
                self.phase = LoadPhase::Loaded(items);
            }
            DashboardEvent::FetchFailed(message) => {
                self.phase = LoadPhase::Error(message);
            }
            DashboardEvent::AddRequested => {
                self.current_item = None;
                self.add_edit_open = true;
            }
            DashboardEvent::EditRequested(item) => {
                self.current_item = Some(item);
                self.add_edit_open = true;
            }
            DashboardEvent::ModalClosed | DashboardEvent::SubmitAccepted => {
                self.add_edit_open = false;
                self.current_item = None;
            }
            DashboardEvent::DeleteRequested(id) => {
                if let Some(item) = self.items().iter().find(|item| item.id == id) {
                    self.item_to_delete = Some(DeleteTarget {
                        id: item.id.clone(),
                        name: item.name.clone(),
                    });
                    self.delete_confirm_open = true;
                }
            }
            DashboardEvent::DeleteDialogClosed | DashboardEvent::DeleteConfirmed => {
                self.delete_confirm_open = false;
                self.item_to_delete = None;
            }
        }
    }
}

#[cfg(test)]
mod tests;
