use super::*;

fn item(id: &str, name: &str) -> GroceryItem {
    GroceryItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity: 5,
        category: "Fruits".to_string(),
    }
}

fn loaded_state() -> DashboardState {
    let mut state = DashboardState::default();
    state.apply(DashboardEvent::FetchStarted);
    state.apply(DashboardEvent::FetchSucceeded(vec![
        item("1", "Organic Apples"),
        item("2", "Whole Milk"),
    ]));
    state
}

#[test]
fn mount_flow_walks_idle_loading_loaded() {
    let mut state = DashboardState::default();
    assert_eq!(state.phase, LoadPhase::Idle);

    state.apply(DashboardEvent::FetchStarted);
    assert!(state.is_loading());
    assert!(state.items().is_empty());

    state.apply(DashboardEvent::FetchSucceeded(vec![item("1", "Apples")]));
    assert_eq!(state.items().len(), 1);
}

#[test]
fn fetch_failure_carries_the_message_and_retry_reloads() {
    let mut state = DashboardState::default();
    state.apply(DashboardEvent::FetchStarted);
    state.apply(DashboardEvent::FetchFailed("获取商品列表失败".to_string()));
    assert_eq!(state.error(), Some("获取商品列表失败"));

    // 重试按钮重新进入加载
    state.apply(DashboardEvent::FetchStarted);
    assert!(state.is_loading());
    assert_eq!(state.error(), None);
}

#[test]
fn add_opens_the_modal_in_create_mode() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::EditRequested(item("1", "Organic Apples")));
    // 随后点新建应清掉编辑选中
    state.apply(DashboardEvent::AddRequested);
    assert!(state.add_edit_open);
    assert_eq!(state.current_item, None);
}

#[test]
fn edit_selects_the_item() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::EditRequested(item("2", "Whole Milk")));
    assert!(state.add_edit_open);
    assert_eq!(state.current_item.as_ref().unwrap().id, "2");
}

#[test]
fn submit_success_closes_and_clears_selection() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::EditRequested(item("2", "Whole Milk")));
    state.apply(DashboardEvent::SubmitAccepted);
    assert!(!state.add_edit_open);
    assert_eq!(state.current_item, None);
}

#[test]
fn cancel_leaves_the_collection_untouched() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::EditRequested(item("1", "Organic Apples")));
    state.apply(DashboardEvent::ModalClosed);
    assert!(!state.add_edit_open);
    assert_eq!(state.items().len(), 2);
}

#[test]
fn delete_request_resolves_the_display_name() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::DeleteRequested("2".to_string()));
    assert!(state.delete_confirm_open);
    assert_eq!(
        state.item_to_delete,
        Some(DeleteTarget {
            id: "2".to_string(),
            name: "Whole Milk".to_string(),
        })
    );
}

#[test]
fn delete_request_for_unknown_id_is_ignored() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::DeleteRequested("99".to_string()));
    assert!(!state.delete_confirm_open);
    assert_eq!(state.item_to_delete, None);
}

#[test]
fn confirm_closes_the_dialog_unconditionally() {
    let mut state = loaded_state();
    state.apply(DashboardEvent::DeleteRequested("1".to_string()));

    // 确认即关闭；删除调用的成败不再影响确认框
    state.apply(DashboardEvent::DeleteConfirmed);
    assert!(!state.delete_confirm_open);
    assert_eq!(state.item_to_delete, None);

    state.apply(DashboardEvent::FetchFailed("删除商品失败".to_string()));
    assert!(!state.delete_confirm_open);
}

#[test]
fn modal_flags_are_independent_of_the_load_phase() {
    // 加载失败时打开的确认框是可表示的状态——守住这一点，
    // 组件层才能自行决定要不要渲染
    let mut state = loaded_state();
    state.apply(DashboardEvent::DeleteRequested("1".to_string()));
    state.apply(DashboardEvent::FetchFailed("网络错误".to_string()));

    assert!(state.delete_confirm_open);
    assert!(state.error().is_some());
    // 集合回到空视图
    assert!(state.items().is_empty());
}
