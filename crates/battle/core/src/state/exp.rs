/// Experience curve parameters: `[basis, extra, acceleration a, acceleration b]`.
///
/// Total experience needed to reach `level`:
///
/// ```text
/// round(basis * (lv-1)^(0.9 + acc_a/250) * lv * (lv+1) / (6 + lv^2/50/acc_b) + (lv-1) * extra)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpCurve {
    pub basis: f64,
    pub extra: f64,
    pub acc_a: f64,
    pub acc_b: f64,
}

impl ExpCurve {
    pub const DEFAULT: Self = Self {
        basis: 30.0,
        extra: 20.0,
        acc_a: 30.0,
        acc_b: 30.0,
    };

    pub fn exp_for_level(&self, level: u32) -> u32 {
        if level <= 1 {
            return 0;
        }
        let lv = f64::from(level);
        let growth = (lv - 1.0).powf(0.9 + self.acc_a / 250.0);
        let divisor = 6.0 + lv.powi(2) / 50.0 / self.acc_b;
        let total = self.basis * growth * lv * (lv + 1.0) / divisor + (lv - 1.0) * self.extra;
        total.round().max(0.0) as u32
    }
}

impl Default for ExpCurve {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_level_needs_nothing() {
        assert_eq!(ExpCurve::DEFAULT.exp_for_level(1), 0);
    }

    #[test]
    fn default_curve_matches_reference_values() {
        let curve = ExpCurve::DEFAULT;
        assert_eq!(curve.exp_for_level(2), 50);
        assert!(curve.exp_for_level(3) > curve.exp_for_level(2));
        assert!(curve.exp_for_level(10) > curve.exp_for_level(9));
    }
}
