//! Local-maximum search with a minimum horizontal spacing between peaks.

/// Indices of strict local maxima in `values`.
///
/// A flat-topped maximum is reported once, at the middle of the plateau
/// (rounding down). The first and last samples are never peaks, and NaN
/// compares false so it never starts or ends a peak.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }
    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Finds peaks at least `min_spacing` samples apart.
///
/// Candidates are visited from tallest to shortest; each kept peak removes
/// every remaining candidate closer than `min_spacing` on either side.
/// Returned indices are in ascending order.
pub fn find_peaks(values: &[f64], min_spacing: usize) -> Vec<usize> {
    let peaks = local_maxima(values);
    if min_spacing <= 1 || peaks.len() < 2 {
        return peaks;
    }

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| values[peaks[b]].total_cmp(&values[peaks[a]]));

    let mut keep = vec![true; peaks.len()];
    for &candidate in &order {
        if !keep[candidate] {
            continue;
        }
        let position = peaks[candidate];
        for k in (0..candidate).rev() {
            if position - peaks[k] >= min_spacing {
                break;
            }
            keep[k] = false;
        }
        for k in candidate + 1..peaks.len() {
            if peaks[k] - position >= min_spacing {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .into_iter()
        .zip(keep)
        .filter_map(|(peak, kept)| kept.then_some(peak))
        .collect()
}
