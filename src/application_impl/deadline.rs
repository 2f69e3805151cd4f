use std::future::Future;
use std::time::Duration;

/// Runs a dependency call under `limit`; `on_elapsed` builds the error when it
/// does not finish in time.
pub(crate) async fn within<T, E, F>(
    limit: Duration,
    fut: F,
    on_elapsed: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_elapsed(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slow_call_is_cut_off() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(1)
        };
        let res = within(Duration::from_millis(10), slow, |d| format!("{d:?}")).await;
        assert_eq!(res, Err("10ms".to_string()));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let res = within(
            Duration::from_secs(1),
            async { Err::<u8, _>("boom".to_string()) },
            |_| "elapsed".to_string(),
        )
        .await;
        assert_eq!(res, Err("boom".to_string()));
    }
}
