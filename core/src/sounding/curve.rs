use ndarray::Array1;

/// Cross-correlation of a recording against the reference chirp.
///
/// `lags[k] == k - len / 2`, so index `len / 2` is the zero offset.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationCurve {
    pub lags: Array1<i64>,
    /// `20·log10(|r[k]|)` for each lag, in dB.
    pub magnitudes: Array1<f64>,
}

impl CorrelationCurve {
    /// Builds a curve from log magnitudes, deriving the centred lag axis.
    pub fn from_magnitudes(magnitudes: Vec<f64>) -> Self {
        let len = magnitudes.len() as i64;
        let lags = Array1::from_iter((0..len).map(|k| k - len / 2));
        Self {
            lags,
            magnitudes: Array1::from(magnitudes),
        }
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Index of the strongest sample, ignoring NaN.
    pub fn argmax(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
    }

    pub fn peak_at(&self, index: usize) -> Peak {
        Peak {
            index,
            lag: self.lags[index],
            magnitude: self.magnitudes[index],
        }
    }
}

/// A local maximum of a [`CorrelationCurve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub lag: i64,
    pub magnitude: f64,
}

/// Direct/reflected separation and the peak-shape mismatch score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayEstimate {
    /// Seconds from the direct to the reflected arrival; may be negative.
    pub delay_s: f64,
    /// Lower is better. NaN when the peak neighbourhoods could not be compared.
    pub quality: f64,
    pub direct: Option<Peak>,
    pub indirect: Option<Peak>,
}

impl DelayEstimate {
    /// Estimate used when no delay could be measured at all.
    pub fn failed() -> Self {
        Self {
            delay_s: f64::NAN,
            quality: f64::NAN,
            direct: None,
            indirect: None,
        }
    }
}
