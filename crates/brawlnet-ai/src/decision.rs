use brawlnet_engine::Decision;

use crate::config::DecisionConfig;

/// Network outputs: move along x, move along y, rotate, fire.
pub const OUTPUT_COUNT: usize = 4;

/// Maps network outputs to a decision.
///
/// Missing outputs read as 0, so a short slice idles rather than panics.
#[must_use]
pub fn decide(outputs: &[f32], config: &DecisionConfig) -> Decision {
    let output = |i: usize| outputs.get(i).copied().unwrap_or(0.0);
    let axis = |value: f32| {
        if value.abs() <= config.dead_zone {
            0.0
        } else {
            value * config.move_speed
        }
    };
    Decision {
        move_x: axis(output(0)),
        move_y: axis(output(1)),
        rotate_delta: output(2) * config.rotation_gain,
        wants_to_fire: output(3) > config.fire_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone_and_scaling() {
        let config = DecisionConfig::default();
        let decision = decide(&[0.1, -0.9, 0.0, 0.0], &config);
        assert!(decision.move_x.abs() < f32::EPSILON);
        assert!((decision.move_y + 2.7).abs() < 1e-5);
        assert!(!decision.wants_to_fire);

        let decision = decide(&[-0.2, 0.2, 0.0, 0.0], &config);
        assert!(!decision.is_moving());
    }

    #[test]
    fn test_rotation_and_fire() {
        let config = DecisionConfig::default();
        let decision = decide(&[0.0, 0.0, -1.0, 0.51], &config);
        assert!((decision.rotate_delta + 0.15).abs() < 1e-6);
        assert!(decision.wants_to_fire);

        let decision = decide(&[0.0, 0.0, 0.0, 0.5], &config);
        assert!(!decision.wants_to_fire);
    }

    #[test]
    fn test_short_outputs_idle() {
        assert_eq!(decide(&[], &DecisionConfig::default()), Decision::IDLE);
    }
}
