use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::Re;
use crate::sample::Sample;

/// Seeded nonparametric bootstrap.
///
/// A master Xoshiro256++ stream seeded with `seed` hands out one `u64`
/// per resample; resample `b` draws its `n` indices uniformly with
/// replacement from its own generator seeded with the `b`-th value. Any
/// resample can therefore be rebuilt from its sub-seed alone, independent
/// of the order in which resamples are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bootstrap {
    seed: u64,
}

impl Bootstrap {
    /// Bootstrap driven by the master `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Per-resample sub-seeds, in resample-index order.
    pub fn sub_seeds(&self) -> impl Iterator<Item = u64> + use<> {
        let mut master = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        std::iter::repeat_with(move || master.next_u64())
    }

    /// The resample of `data` belonging to `sub_seed`.
    pub fn resample<T: Copy>(data: &[T], sub_seed: u64) -> Sample<T> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(sub_seed);
        draw(data, &mut rng)
    }
}

impl<T: Copy> Re<Sample<T>> for Bootstrap {
    type Item = Sample<T>;

    fn re(&self, sample: &Sample<T>) -> impl Iterator<Item = Self::Item> {
        let data = sample.as_slice();
        self.sub_seeds().map(move |sub_seed| Self::resample(data, sub_seed))
    }
}

/// `data.len()` draws with replacement. Empty data gives an empty sample.
fn draw<T: Copy, R: Rng + ?Sized>(data: &[T], rng: &mut R) -> Sample<T> {
    let n = data.len();
    (0..n)
        .filter_map(|_| data.get(rng.gen_range(0..n)).copied())
        .collect()
}
