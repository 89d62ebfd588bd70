use crate::error::ApiResult;
use crate::models::{ListPage, StatsSnapshot};
use crate::state::QueryKey;

/// Results of spawned fetches, delivered back to the orchestrator.
#[derive(Debug, Clone)]
pub enum DataMessage {
    /// A list fetch finished. `seq` and `key` identify the request it
    /// answers.
    ListLoaded {
        seq: u64,
        key: QueryKey,
        result: ApiResult<ListPage>,
    },
    /// A stats fetch finished for the session identified by `epoch`.
    StatsLoaded {
        seq: u64,
        epoch: u64,
        result: ApiResult<StatsSnapshot>,
    },
}
