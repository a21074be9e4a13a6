use serde::Serialize;

/// Loading/error/data triple backing one feed on the page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Vec<T>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: Vec::new(),
        }
    }
}

/// What a feed shows, in render priority order
#[derive(Debug, PartialEq)]
pub enum FeedDisplay<'a, T> {
    Loading,
    Error(&'a str),
    Items(&'a [T]),
}

impl<T> RequestState<T> {
    /// Loading wins over error, error wins over data
    pub fn display(&self) -> FeedDisplay<'_, T> {
        if self.loading {
            FeedDisplay::Loading
        } else if let Some(message) = self.error.as_deref() {
            FeedDisplay::Error(message)
        } else {
            FeedDisplay::Items(&self.data)
        }
    }
}
