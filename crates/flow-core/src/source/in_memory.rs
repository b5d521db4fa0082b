use crate::errors::FlowError;
use crate::model::FlowId;

use super::{page_of, QueryResponse, QuerySource};

/// Fuente respaldada por una lista fija.
#[derive(Debug, Clone)]
pub struct InMemoryQuerySource<T> {
    source_id: String,
    flow_id: FlowId,
    items: Vec<T>,
}

impl<T> InMemoryQuerySource<T> {
    pub fn new(source_id: impl Into<String>, flow_id: FlowId, items: Vec<T>) -> Self {
        Self { source_id: source_id.into(),
               flow_id,
               items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone + Send + Sync> QuerySource<T> for InMemoryQuerySource<T> {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn flow_id(&self) -> &FlowId {
        &self.flow_id
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn pull(&self, checkpoint: usize, page_size: usize) -> Result<QueryResponse<T>, FlowError> {
        page_of(&self.flow_id, &self.items, checkpoint, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> InMemoryQuerySource<&'static str> {
        InMemoryQuerySource::new("letters", FlowId::new("letters"), vec!["A", "B", "C"])
    }

    #[test]
    fn pages_through_source_until_exhausted() {
        let src = abc();
        let first = src.pull(0, 2).unwrap();
        assert_eq!(first.package.data, vec!["A", "B"]);
        assert_eq!(first.checkpoint, 2);

        let second = src.pull(first.checkpoint, 2).unwrap();
        assert_eq!(second.package.data, vec!["C"]);
        assert_eq!(second.checkpoint, 3);

        let third = src.pull(second.checkpoint, 2).unwrap();
        assert!(third.is_empty());
        assert_eq!(third.checkpoint, 3);
    }

    #[test]
    fn checkpoint_past_end_is_terminal_not_error() {
        let src = abc();
        for c in [3usize, 4, 100] {
            let r = src.pull(c, 5).unwrap();
            assert!(r.is_empty());
            assert_eq!(r.checkpoint, c);
        }
    }

    #[test]
    fn page_size_bounds_returned_items() {
        let src = InMemoryQuerySource::new("n", FlowId::new("n"), (0..10).collect::<Vec<u32>>());
        for c in 0..12usize {
            for size in 1..6usize {
                let r = src.pull(c, size).unwrap();
                let expected = size.min(10usize.saturating_sub(c));
                assert_eq!(r.returned(), expected, "c={c} size={size}");
                if expected > 0 {
                    assert_eq!(r.package.data[0], c as u32);
                }
            }
        }
    }

    #[test]
    fn pull_is_replayable() {
        let src = abc();
        assert_eq!(src.pull(1, 2).unwrap(), src.pull(1, 2).unwrap());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = abc().pull(0, 0).unwrap_err();
        assert!(matches!(err, FlowError::InvalidArgument(_)));
    }
}
