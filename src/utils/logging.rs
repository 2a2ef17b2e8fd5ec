use log::warn;

use crate::config::{RunConfig, STABLE_STEP_FRACTION};

/// Warns when the step is not small relative to the spring time scale.
/// Returns whether a warning was emitted.
pub fn warn_if_step_unstable(config: &RunConfig) -> bool {
    if config.is_step_stable() {
        return false;
    }
    warn!(
        "time step {:e} exceeds {STABLE_STEP_FRACTION} * sqrt(mass / stiffness) = {:e}; the explicit scheme may diverge",
        config.time_step,
        STABLE_STEP_FRACTION * config.natural_time_scale()
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_needs_no_warning() {
        assert!(!warn_if_step_unstable(&RunConfig::default()));
    }

    #[test]
    fn step_past_half_the_spring_period_scale_warns() {
        // sqrt(m / k) = 1, so the threshold sits at 0.5.
        let config = RunConfig::default().with_mass(1.0).with_stiffness(1.0);
        assert!(!warn_if_step_unstable(&config.clone().with_time_step(0.5)));
        assert!(warn_if_step_unstable(&config.clone().with_time_step(0.51)));
        assert!(!warn_if_step_unstable(&config.with_stiffness(0.0).with_time_step(10.0)));
    }
}
