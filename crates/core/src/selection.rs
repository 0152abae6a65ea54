use rand::Rng;

/// Picks which of several equally good candidates gets recommended.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`, or `None` when `len` is zero.
    fn pick_index(&self, len: usize) -> Option<usize>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| rand::thread_rng().gen_range(0..len))
    }
}

/// Always picks the same position, clamped to the candidate count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn pick_index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.0.min(len - 1))
    }
}

pub fn choose<'a, T, R>(source: &R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    source.pick_index(items.len()).and_then(|index| items.get(index))
}

#[cfg(test)]
mod tests {
    use super::{choose, FixedIndex, RandomSource, ThreadRandom};

    #[test]
    fn empty_input_yields_nothing() {
        let empty: [u8; 0] = [];
        assert_eq!(choose(&ThreadRandom, &empty), None);
        assert_eq!(choose(&FixedIndex(3), &empty), None);
    }

    #[test]
    fn fixed_index_clamps_to_last_candidate() {
        assert_eq!(choose(&FixedIndex(1), &["a", "b", "c"]), Some(&"b"));
        assert_eq!(choose(&FixedIndex(9), &["a", "b"]), Some(&"b"));
    }

    #[test]
    fn thread_random_stays_in_bounds() {
        for len in 1..20 {
            let index = ThreadRandom.pick_index(len).expect("non-empty");
            assert!(index < len);
        }
    }
}
