//! Local extremum detection
//!
//! Peak finding with a minimum-spacing constraint, used to label turning
//! points in forecast curves. Troughs are found by negating the input.

/// Indices of local maxima in `values`, keeping only peaks at least
/// `min_distance` samples apart.
///
/// Plateaus count as a single peak located at the plateau midpoint. When
/// two peaks violate the spacing constraint the taller one wins; ties go
/// to the earlier peak. Inputs shorter than 3 samples, or strictly
/// monotonic ones, produce an empty list.
pub fn find_peaks(values: &[f64], min_distance: usize) -> Vec<usize> {
    let n = values.len();
    if n < 3 {
        return Vec::new();
    }
    let min_distance = min_distance.max(1);

    // Local maxima with plateau midpoints
    let mut positions: Vec<usize> = Vec::new();
    let mut i = 1;
    while i < n - 1 {
        if values[i] > values[i - 1] {
            let mut ahead = i + 1;
            while ahead < n - 1 && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                positions.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }

    if positions.len() <= 1 {
        return positions;
    }

    // Enforce spacing, tallest peak first
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| {
        values[positions[b]]
            .partial_cmp(&values[positions[a]])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(positions[a].cmp(&positions[b]))
    });

    let mut keep = vec![true; positions.len()];
    for &idx in &order {
        if !keep[idx] {
            continue;
        }
        for other in 0..positions.len() {
            if other != idx && keep[other] {
                let gap = positions[idx].abs_diff(positions[other]);
                if gap < min_distance {
                    keep[other] = false;
                }
            }
        }
    }

    positions
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| if k { Some(p) } else { None })
        .collect()
}
