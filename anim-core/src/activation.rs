use crate::types::NodeId;

const PREALLOCATED: usize = 64;

/// A decaying "firing" at one network node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Activation {
    /// Creation order within the owning pool; unique per pool.
    pub seq: u64,
    pub node: NodeId,
    pub intensity: f32,
    /// Multiplier applied to `intensity` every tick, in `(0, 1)`.
    pub decay: f32,
}

/// Bounded set of activations kept ordered strongest-first.
///
/// Inserting into a full pool evicts the weakest existing activation, so
/// a new activation is always admitted.
#[derive(Clone, Debug)]
pub struct ActivationPool {
    items: Vec<Activation>,
    capacity: usize,
    next_seq: u64,
}

impl ActivationPool {
    /// A pool holding at most `capacity` activations.
    ///
    /// Storage grows on demand; only a small block is reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(PREALLOCATED)),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Activations, strongest first.
    pub fn iter(&self) -> impl Iterator<Item = &Activation> {
        self.items.iter()
    }

    /// Inserts a new activation, evicting the weakest one when full.
    ///
    /// ### Returns
    /// The evicted activation, if the pool was at capacity.
    pub fn push(&mut self, node: NodeId, intensity: f32, decay: f32) -> Option<Activation> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop()
        } else {
            None
        };

        let activation = Activation {
            seq: self.next_seq,
            node,
            intensity: intensity.clamp(f32::MIN_POSITIVE, 1.0),
            decay,
        };
        self.next_seq += 1;

        let at = self
            .items
            .partition_point(|a| a.intensity >= activation.intensity);
        self.items.insert(at, activation);
        evicted
    }

    /// Applies one tick of decay and drops everything below `floor`.
    ///
    /// ### Returns
    /// The number of activations removed.
    pub fn decay_all(&mut self, floor: f32) -> usize {
        for a in &mut self.items {
            a.intensity *= a.decay;
        }
        let before = self.items.len();
        self.items.retain(|a| a.intensity >= floor);
        // Different decay rates can reorder neighbours.
        self.items.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        before - self.items.len()
    }

    /// Intensity of the strongest activation at `node`.
    pub fn strongest_at(&self, node: NodeId) -> Option<f32> {
        // Strongest-first order means the first hit is the maximum.
        self.items
            .iter()
            .find(|a| a.node == node)
            .map(|a| a.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_strongest_first() {
        let mut pool = ActivationPool::with_capacity(8);
        pool.push(0, 0.3, 0.9);
        pool.push(1, 0.9, 0.9);
        pool.push(2, 0.6, 0.9);

        let order: Vec<NodeId> = pool.iter().map(|a| a.node).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn full_pool_evicts_weakest_existing() {
        let mut pool = ActivationPool::with_capacity(2);
        pool.push(0, 0.5, 0.9);
        pool.push(1, 0.9, 0.9);

        // Even a weaker newcomer is admitted; the weakest resident goes.
        let evicted = pool.push(2, 0.2, 0.9).unwrap();
        assert_eq!(evicted.node, 0);
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().any(|a| a.node == 2));
    }

    #[test]
    fn decay_all_multiplies_and_prunes_below_floor() {
        let mut pool = ActivationPool::with_capacity(4);
        pool.push(0, 1.0, 0.5);
        pool.push(1, 0.15, 0.5);

        let removed = pool.decay_all(0.1);
        assert_eq!(removed, 1);
        assert_eq!(pool.len(), 1);
        let a = pool.iter().next().unwrap();
        assert_eq!(a.node, 0);
        assert!((a.intensity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn decay_all_reorders_by_new_intensity() {
        let mut pool = ActivationPool::with_capacity(4);
        pool.push(0, 0.9, 0.2); // -> 0.18
        pool.push(1, 0.8, 0.9); // -> 0.72
        pool.decay_all(0.1);

        let order: Vec<NodeId> = pool.iter().map(|a| a.node).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn strongest_at_picks_maximum_for_node() {
        let mut pool = ActivationPool::with_capacity(4);
        pool.push(3, 0.4, 0.9);
        pool.push(3, 0.7, 0.9);
        pool.push(1, 0.9, 0.9);

        assert_eq!(pool.strongest_at(3), Some(0.7));
        assert_eq!(pool.strongest_at(2), None);
    }

    #[test]
    fn sequence_numbers_are_unique() {
        let mut pool = ActivationPool::with_capacity(2);
        for i in 0..5 {
            pool.push(i, 0.5, 0.9);
        }
        let seqs: Vec<u64> = pool.iter().map(|a| a.seq).collect();
        assert_eq!(seqs.len(), 2);
        assert_ne!(seqs[0], seqs[1]);
        // The newest activation is always admitted.
        assert!(seqs.contains(&4));
    }

    #[test]
    fn huge_capacity_reserves_lazily() {
        let mut pool = ActivationPool::with_capacity(1 << 60);
        for i in 0..100 {
            pool.push(i, 0.5, 0.9);
        }
        assert_eq!(pool.len(), 100);
    }
}
