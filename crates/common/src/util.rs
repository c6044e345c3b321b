use itertools::Itertools;

pub trait CumsumExt {
  fn cumsum(self) -> impl Iterator<Item = usize>;
}
impl<I: IntoIterator<Item = usize>> CumsumExt for I {
  fn cumsum(self) -> impl Iterator<Item = usize> {
    self.into_iter().scan(0, |acc, x| {
      *acc += x;
      Some(*acc)
    })
  }
}

pub trait IterAllEqExt<T> {
  fn all_eq(self) -> Option<T>;
}
impl<T: PartialEq, I: IntoIterator<Item = T>> IterAllEqExt<T> for I {
  fn all_eq(self) -> Option<T> {
    let mut iter = self.into_iter();
    let first = iter.next()?;
    iter.all(|elem| elem == first).then_some(first)
  }
}

/// Order statistics of a sample, as reported for mesh element sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
  pub min: f64,
  pub max: f64,
  pub median: f64,
  pub mean: f64,
}

impl SampleStats {
  /// Returns `None` for an empty sample or one containing NaN.
  pub fn compute(samples: &[f64]) -> Option<Self> {
    if samples.is_empty() || samples.iter().any(|x| x.is_nan()) {
      return None;
    }
    let sorted = samples
      .iter()
      .copied()
      .sorted_by(|a, b| a.total_cmp(b))
      .collect_vec();

    let n = sorted.len();
    let median = if n % 2 == 1 {
      sorted[n / 2]
    } else {
      0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    };
    let mean = sorted.iter().sum::<f64>() / n as f64;

    Some(Self {
      min: sorted[0],
      max: sorted[n - 1],
      median,
      mean,
    })
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn cumsum_is_inclusive_prefix_sum() {
    let sums: Vec<_> = [1, 2, 3, 4].cumsum().collect();
    assert_eq!(sums, vec![1, 3, 6, 10]);
  }

  #[test]
  fn all_eq_detects_mismatch() {
    assert_eq!([3, 3, 3].all_eq(), Some(3));
    assert_eq!([3, 4, 3].all_eq(), None);
    assert_eq!(Vec::<usize>::new().all_eq(), None);
  }

  #[test]
  fn stats_of_even_sample() {
    let stats = SampleStats::compute(&[4.0, 1.0, 3.0, 2.0]).unwrap();
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 4.0);
    assert_eq!(stats.median, 2.5);
    assert_eq!(stats.mean, 2.5);
  }

  #[test]
  fn stats_reject_empty_and_nan() {
    assert!(SampleStats::compute(&[]).is_none());
    assert!(SampleStats::compute(&[1.0, f64::NAN]).is_none());
  }
}
