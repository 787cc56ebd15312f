use crate::core::{DistributedItem, ItemId};
use crate::error::DistributionError;
use crate::measure::{KurboMeasure, PathMeasure, split_into_sub_segments};
use crate::path::Path;

/// Places items evenly along a path's arc length.
///
/// Fairness rules, in order: every sub-segment joint gets one reserved item,
/// the remainder is split proportionally to arc length, and an off-by-one
/// from rounding is reconciled against the first largest/smallest
/// allocation. The path's final point always receives an item unless the
/// path is closed.
pub struct Distributor<M: PathMeasure> {
    measure: M,
}

impl Default for Distributor<KurboMeasure> {
    fn default() -> Self {
        Distributor::new(KurboMeasure::default())
    }
}

impl<M: PathMeasure> Distributor<M> {
    pub fn new(measure: M) -> Self {
        Distributor { measure }
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// Distributes `items` along `path`, in item order, consuming segments in
    /// path order. Zero items is the silent construction pass and returns an
    /// empty result.
    #[tracing::instrument(
        skip(self, path, items),
        fields(items = items.len(), segments = path.segment_count())
    )]
    pub fn distribute(
        &self,
        path: &Path,
        items: &[ItemId],
    ) -> Result<Vec<DistributedItem>, DistributionError> {
        let points = path.point_count();
        if points < 2 {
            return Err(DistributionError::DegeneratePath { points });
        }
        let subs = split_into_sub_segments(path);
        if subs.is_empty() {
            return Err(DistributionError::DegeneratePath { points });
        }

        let lengths: Vec<f64> = subs.iter().map(|s| self.measure.length(s)).collect();

        if !items.is_empty() && items.len() < subs.len() + 1 {
            tracing::warn!(
                items = items.len(),
                segments = subs.len(),
                "fewer items than segment joints; the shape will be distributed unevenly"
            );
        }

        // Reserve one item per sub-segment so every joint is marked, then
        // split the rest proportionally to arc length.
        let total_length: f64 = lengths.iter().sum();
        let mut remaining = items.len();
        let mut per_segment = vec![0usize; subs.len()];
        for alloc in per_segment.iter_mut() {
            if remaining == 0 {
                break;
            }
            *alloc = 1;
            remaining -= 1;
        }
        if total_length > 0.0 {
            for (alloc, len) in per_segment.iter_mut().zip(&lengths) {
                *alloc += ((len / total_length) * remaining as f64).round() as usize;
            }
        }

        // Rounding can leave the total one off from the request; reconcile
        // against the first largest/smallest allocation in segment order.
        let total_allocated: usize = per_segment.iter().sum();
        if total_allocated == items.len() + 1 {
            let max = *per_segment.iter().max().expect("at least one segment");
            let i = per_segment.iter().position(|&a| a == max).expect("max exists");
            per_segment[i] -= 1;
        } else if total_allocated + 1 == items.len() {
            let min = *per_segment.iter().min().expect("at least one segment");
            let i = per_segment.iter().position(|&a| a == min).expect("min exists");
            per_segment[i] += 1;
        } else if total_allocated != items.len() {
            tracing::warn!(
                total_allocated,
                requested = items.len(),
                "item/segment allocation mismatch; proceeding with computed allocation"
            );
        }

        let mut output = Vec::with_capacity(items.len());
        let mut pool = items.iter();
        for (i, sub) in subs.iter().enumerate() {
            let on_segment = per_segment[i];
            if on_segment == 0 {
                continue;
            }

            // The open end of the path gets an item exactly on it, so the
            // spacing denominator shrinks by one there.
            let is_last = i == subs.len() - 1 && !sub.synthesized_close();
            let slots = on_segment - usize::from(is_last);
            let spacing = if slots > 0 {
                lengths[i] / slots as f64
            } else {
                0.0
            };

            // A sub-segment following a Close shares its start with the
            // close's landing point; skip it to avoid a doubled item.
            let skip_start = i > 0 && subs[i - 1].synthesized_close();

            for j in usize::from(skip_start)..on_segment {
                let Some(&id) = pool.next() else { break };
                let position = if is_last && j == on_segment - 1 {
                    sub.end_point()
                } else {
                    self.measure.point_at_length(sub, spacing * j as f64)
                };
                output.push(DistributedItem { id, position });
            }
        }

        Ok(output)
    }
}

/// One-shot distribution with the default kurbo-backed measurement.
pub fn distribute_along_path(
    path: &Path,
    items: &[ItemId],
) -> Result<Vec<DistributedItem>, DistributionError> {
    Distributor::default().distribute(path, items)
}
