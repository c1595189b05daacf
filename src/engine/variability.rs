// ==========================================
// 车队运营驾驶舱 - 可复现随机扰动
// ==========================================
// 职责: 由 seed 派生延误概率乘数, 为"运行间差异"提供可复现来源
// 红线: 不使用全局随机源, 同 seed 同结果
// ==========================================

use crate::domain::simulation::Variability;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 由扰动参数派生延误概率乘数
///
/// factor = 1 + u * amplitude, u ~ U(-1, 1]
///
/// amplitude ∈ [0, 1] 时 factor ∈ (0, 2], 正乘数保持路况间延误概率的严格次序
pub fn lateness_jitter_factor(variability: &Variability) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(variability.seed);
    let u = 1.0 - 2.0 * rng.gen::<f64>();
    1.0 + u * variability.amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_factor() {
        let v = Variability { seed: 42, amplitude: 0.3 };
        assert_eq!(lateness_jitter_factor(&v), lateness_jitter_factor(&v));
    }

    #[test]
    fn test_factor_bounded_by_amplitude() {
        for seed in 0..200 {
            let factor = lateness_jitter_factor(&Variability { seed, amplitude: 0.25 });
            assert!((0.75..=1.25).contains(&factor), "seed={} factor={}", seed, factor);
        }
    }

    #[test]
    fn test_full_amplitude_factor_stays_positive() {
        for seed in 0..500 {
            let factor = lateness_jitter_factor(&Variability { seed, amplitude: 1.0 });
            assert!(factor > 0.0 && factor <= 2.0, "seed={} factor={}", seed, factor);
        }
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let factor = lateness_jitter_factor(&Variability { seed: 9, amplitude: 0.0 });
        assert_eq!(factor, 1.0);
    }
}
