//! 查询缓存
//!
//! 以集合为粒度的单槽位缓存：变更成功后整体失效、下次读取重新拉取，
//! 不做乐观局部修补。并发读取会合并——同一时刻最多一个拉取在途，
//! 后来者挂在 oneshot 等待队列上分享同一份结果。
//! 该规则只约束读取；写操作之间的先后由调用方自己保证。

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::error::{ApiError, ApiResult};

enum CacheState<T> {
    /// 没有值，也没有在途拉取
    Empty,
    /// 缓存命中直接返回
    Ready(T),
    /// 拉取在途；挂起的后来者在这里排队
    Fetching(Vec<oneshot::Sender<ApiResult<T>>>),
}

pub struct CollectionCache<T> {
    state: Rc<RefCell<CacheState<T>>>,
}

impl<T> Clone for CollectionCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + 'static> CollectionCache<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(CacheState::Empty)),
        }
    }

    /// 当前缓存值（不触发拉取）
    #[allow(dead_code)]
    pub fn peek(&self) -> Option<T> {
        match &*self.state.borrow() {
            CacheState::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// 丢弃已就绪的缓存值，下次读取将重新拉取
    ///
    /// 在途拉取不受影响：它的结果照常落位（与"不取消被取代的请求"
    /// 的执行模型一致），等待者也照常收到结果。
    pub fn invalidate(&self) {
        let mut state = self.state.borrow_mut();
        if matches!(&*state, CacheState::Ready(_)) {
            *state = CacheState::Empty;
        }
    }

    /// 读取集合：优先缓存，其次合并到在途拉取，最后才自己发起
    pub async fn load<F, Fut>(&self, fetch: F) -> ApiResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        enum Plan<V> {
            Cached(V),
            Wait(oneshot::Receiver<ApiResult<V>>),
            Lead,
        }

        let plan = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                CacheState::Ready(value) => Plan::Cached(value.clone()),
                CacheState::Fetching(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Plan::Wait(rx)
                }
                CacheState::Empty => {
                    *state = CacheState::Fetching(Vec::new());
                    Plan::Lead
                }
            }
        };

        match plan {
            Plan::Cached(value) => Ok(value),
            Plan::Wait(rx) => Self::await_leader(rx).await,
            Plan::Lead => self.lead(fetch).await,
        }
    }

    /// 强制重新拉取：已有缓存也照常发起；与在途拉取仍然合并
    pub async fn refresh<F, Fut>(&self, fetch: F) -> ApiResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        self.invalidate();
        self.load(fetch).await
    }

    async fn await_leader(rx: oneshot::Receiver<ApiResult<T>>) -> ApiResult<T> {
        match rx.await {
            Ok(result) => result,
            // 领头拉取被丢弃（例如组件卸载），当成网络中断处理
            Err(_) => Err(ApiError::network("请求中断")),
        }
    }

    async fn lead<F, Fut>(&self, fetch: F) -> ApiResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let result = fetch().await;

        let next = match &result {
            Ok(value) => CacheState::Ready(value.clone()),
            // 失败不缓存
            Err(_) => CacheState::Empty,
        };
        let waiters = match mem::replace(&mut *self.state.borrow_mut(), next) {
            CacheState::Fetching(waiters) => waiters,
            _ => Vec::new(),
        };
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }

        result
    }
}

impl<T: Clone + 'static> Default for CollectionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;

    fn counted_fetch(
        counter: Rc<RefCell<u32>>,
        value: ApiResult<Vec<u32>>,
    ) -> impl FnOnce() -> futures::future::Ready<ApiResult<Vec<u32>>> {
        move || {
            *counter.borrow_mut() += 1;
            futures::future::ready(value)
        }
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let cache = CollectionCache::<Vec<u32>>::new();
        let calls = Rc::new(RefCell::new(0));

        let first = block_on(cache.load(counted_fetch(calls.clone(), Ok(vec![1, 2])))).unwrap();
        let second = block_on(cache.load(counted_fetch(calls.clone(), Ok(vec![9])))).unwrap();

        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![1, 2]);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(cache.peek(), Some(vec![1, 2]));
    }

    #[test]
    fn invalidate_forces_a_refetch() {
        let cache = CollectionCache::<Vec<u32>>::new();
        let calls = Rc::new(RefCell::new(0));

        block_on(cache.load(counted_fetch(calls.clone(), Ok(vec![1])))).unwrap();
        cache.invalidate();
        assert_eq!(cache.peek(), None);

        let reread = block_on(cache.load(counted_fetch(calls.clone(), Ok(vec![2])))).unwrap();
        assert_eq!(reread, vec![2]);
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn refresh_bypasses_a_ready_value() {
        let cache = CollectionCache::<Vec<u32>>::new();
        let calls = Rc::new(RefCell::new(0));

        block_on(cache.load(counted_fetch(calls.clone(), Ok(vec![1])))).unwrap();
        let refreshed =
            block_on(cache.refresh(counted_fetch(calls.clone(), Ok(vec![7])))).unwrap();

        assert_eq!(refreshed, vec![7]);
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(cache.peek(), Some(vec![7]));
    }

    #[test]
    fn fetch_failure_is_not_cached() {
        let cache = CollectionCache::<Vec<u32>>::new();
        let calls = Rc::new(RefCell::new(0));

        let err = block_on(cache.load(counted_fetch(
            calls.clone(),
            Err(ApiError::network("boom")),
        )))
        .unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(cache.peek(), None);

        block_on(cache.load(counted_fetch(calls.clone(), Ok(vec![3])))).unwrap();
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn concurrent_loads_share_one_fetch() {
        let cache = CollectionCache::<Vec<u32>>::new();
        let calls = Rc::new(RefCell::new(0u32));
        let results = Rc::new(RefCell::new(Vec::new()));

        // 由测试控制完成时机的拉取
        let (tx, rx) = oneshot::channel::<ApiResult<Vec<u32>>>();
        let rx = Rc::new(RefCell::new(Some(rx)));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        for _ in 0..2 {
            let cache = cache.clone();
            let calls = calls.clone();
            let results = results.clone();
            let rx = rx.clone();
            spawner
                .spawn_local(async move {
                    let outcome = cache
                        .load(move || {
                            *calls.borrow_mut() += 1;
                            let rx = rx.borrow_mut().take().expect("只应有一个领头拉取");
                            async move { rx.await.expect("测试会发送结果") }
                        })
                        .await;
                    results.borrow_mut().push(outcome);
                })
                .expect("spawn");
        }

        // 两个读取都已挂起，但只有一个拉取被发起
        pool.run_until_stalled();
        assert_eq!(*calls.borrow(), 1);
        assert!(results.borrow().is_empty());

        tx.send(Ok(vec![5, 6])).expect("send");
        pool.run_until_stalled();

        let results = results.borrow();
        assert_eq!(results.len(), 2);
        for outcome in results.iter() {
            assert_eq!(outcome.as_ref().unwrap(), &vec![5, 6]);
        }
    }
}
