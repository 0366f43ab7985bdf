use petgraph::graph::NodeIndex;

/// A dense map from the states of one automaton to values, backed by a [Vec]
/// indexed by [NodeIndex].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMap<V> {
    data: Vec<Option<V>>,
}

impl<V> StateMap<V> {
    pub fn new(state_count: usize) -> Self {
        StateMap {
            data: std::iter::repeat_with(|| None).take(state_count).collect(),
        }
    }

    pub fn get(&self, state: NodeIndex) -> Option<&V> {
        self.data.get(state.index()).and_then(Option::as_ref)
    }

    /// Inserts a value, returning `true` if the state had no value before.
    pub fn insert(&mut self, state: NodeIndex, value: V) -> bool {
        let index = state.index();
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }

        self.data[index].replace(value).is_none()
    }

    /// Number of states holding a value.
    pub(crate) fn len(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }
}

/// A set of states of one automaton.
pub type StateSet = StateMap<()>;

#[test]
fn test_state_map_insert() {
    let mut map = StateMap::new(2);
    assert!(map.insert(NodeIndex::new(1), 'x'));
    assert!(!map.insert(NodeIndex::new(1), 'y'));
    assert!(map.insert(NodeIndex::new(4), 'z'));

    assert_eq!(map.get(NodeIndex::new(1)), Some(&'y'));
    assert!(map.get(NodeIndex::new(0)).is_none());
    assert_eq!(map.len(), 2);
}
