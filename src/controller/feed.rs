use serde::Serialize;

use crate::models::RequestState;

/// Lifecycle of one feed request
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// One independently failing slice of page state
///
/// Every trigger takes a new sequence number. Completions carrying an older
/// number are ignored, so a slow superseded request cannot overwrite the
/// result of a newer one.
#[derive(Debug, Clone, Serialize)]
pub struct Feed<T> {
    phase: FeedPhase,
    #[serde(flatten)]
    state: RequestState<T>,
    #[serde(skip)]
    latest_seq: u64,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self {
            phase: FeedPhase::Idle,
            state: RequestState::default(),
            latest_seq: 0,
        }
    }
}

impl<T> Feed<T> {
    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// Enters Loading and clears the previous error
    pub fn begin(&mut self) -> u64 {
        self.latest_seq += 1;
        self.phase = FeedPhase::Loading;
        self.state.loading = true;
        self.state.error = None;
        self.latest_seq
    }

    /// Stores results unless `seq` was superseded; returns whether applied
    pub fn succeed(&mut self, seq: u64, data: Vec<T>) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        self.phase = FeedPhase::Success;
        self.state.loading = false;
        self.state.error = None;
        self.state.data = data;
        true
    }

    /// Stores the message and clears results unless `seq` was superseded
    pub fn fail(&mut self, seq: u64, message: String) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        self.phase = FeedPhase::Failed;
        self.state.loading = false;
        self.state.error = Some(message);
        self.state.data.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut feed: Feed<u32> = Feed::default();
        assert_eq!(feed.phase(), FeedPhase::Idle);

        let seq = feed.begin();
        assert_eq!(feed.phase(), FeedPhase::Loading);
        assert!(feed.state().loading);

        assert!(feed.succeed(seq, vec![3, 1, 2]));
        assert_eq!(feed.phase(), FeedPhase::Success);
        assert_eq!(feed.state().data, vec![3, 1, 2]);
    }

    #[test]
    fn test_begin_clears_error() {
        let mut feed: Feed<u32> = Feed::default();
        let seq = feed.begin();
        feed.fail(seq, "boom".to_string());

        feed.begin();
        assert_eq!(feed.state().error, None);
        assert!(feed.state().loading);
    }

    #[test]
    fn test_failure_clears_results() {
        let mut feed: Feed<u32> = Feed::default();
        let seq = feed.begin();
        feed.succeed(seq, vec![1]);

        let seq = feed.begin();
        assert!(feed.fail(seq, "boom".to_string()));
        assert_eq!(feed.phase(), FeedPhase::Failed);
        assert!(feed.state().data.is_empty());
        assert_eq!(feed.state().error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut feed: Feed<&str> = Feed::default();
        let older = feed.begin();
        let newer = feed.begin();

        assert!(feed.succeed(newer, vec!["new"]));
        assert!(!feed.succeed(older, vec!["old"]));
        assert!(!feed.fail(older, "late failure".to_string()));

        assert_eq!(feed.phase(), FeedPhase::Success);
        assert_eq!(feed.state().data, vec!["new"]);
    }

    #[test]
    fn test_serializes_flat() {
        let mut feed: Feed<u32> = Feed::default();
        let seq = feed.begin();
        feed.succeed(seq, vec![7]);

        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["phase"], "success");
        assert_eq!(json["loading"], false);
        assert_eq!(json["data"][0], 7);
        assert!(json.get("latest_seq").is_none());
    }
}
