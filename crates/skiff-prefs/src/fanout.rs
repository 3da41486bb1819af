use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, trace};

use crate::error::FanOutError;

/// Deadline applied to a fan-out group unless the caller overrides it.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Run a keyed set of fallible futures concurrently and join them once.
///
/// Each result is attributed to the key it was launched under, so the
/// aggregate is independent of completion order. An empty set resolves
/// immediately. The whole group runs under `deadline`; expiry fails the
/// group with [`FanOutError::DeadlineExceeded`] rather than hanging on a
/// stalled member. If any member fails, the group fails with every failing
/// key and reason collected into [`FanOutError::MemberFailed`].
pub async fn join_keyed<K, T, E, F>(
    tasks: Vec<(K, F)>,
    deadline: Duration,
) -> Result<HashMap<K, T>, FanOutError>
where
    K: Eq + Hash + ToString,
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    if tasks.is_empty() {
        return Ok(HashMap::new());
    }

    let total = tasks.len();
    debug!(members = total, "joining fan-out group");
    let keyed = tasks.into_iter().map(|(key, task)| async move {
        let outcome = task.await;
        (key, outcome)
    });
    let outcomes = tokio::time::timeout(deadline, join_all(keyed))
        .await
        .map_err(|_| FanOutError::DeadlineExceeded(deadline))?;

    let mut results = HashMap::with_capacity(total);
    let mut failures = Vec::new();
    for (key, outcome) in outcomes {
        match outcome {
            Ok(value) => {
                results.insert(key, value);
            }
            Err(reason) => failures.push((key.to_string(), reason.to_string())),
        }
    }
    if !failures.is_empty() {
        return Err(FanOutError::MemberFailed(failures));
    }
    trace!(members = total, "fan-out group complete");
    Ok(results)
}
