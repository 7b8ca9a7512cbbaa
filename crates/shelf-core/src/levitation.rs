use crate::config::LevitationConfig;
use crate::scene::NodeId;
use crate::tween::{Ease, Motion, Property, Timeline, TweenHandle, TweenSpec, TweenTarget};
use glam::Vec3;
use rand::Rng;

/// Per-object bobbing parameters drawn once at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Levitation {
    pub amplitude: f32,
    pub duration: f32,
    pub delay: f32,
}

impl Levitation {
    pub fn sample(config: &LevitationConfig, rng: &mut impl Rng) -> Self {
        let [d_lo, d_hi] = config.duration_sec;
        let [w_lo, w_hi] = config.delay_sec;
        Self {
            amplitude: config.amplitude,
            duration: rng.gen_range(d_lo..=d_hi),
            delay: rng.gen_range(w_lo..=w_hi),
        }
    }

    pub fn spec(&self, node: NodeId) -> TweenSpec {
        TweenSpec::new(
            TweenTarget::Node(node, Property::Position),
            Motion::By(Vec3::Y * self.amplitude),
            self.duration,
        )
        .ease(Ease::SineInOut)
        .delay(self.delay)
        .forever()
        .yoyo(true)
    }
}

/// Start the never-ending bob for `node`. The returned handle is informational;
/// nothing cancels levitation.
pub fn levitate(
    node: NodeId,
    config: &LevitationConfig,
    rng: &mut impl Rng,
    timeline: &mut Timeline,
) -> TweenHandle {
    let lev = Levitation::sample(config, rng);
    log::debug!(
        "[levitate] node {:?} duration {:.2}s delay {:.2}s",
        node,
        lev.duration,
        lev.delay
    );
    timeline.start(lev.spec(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_within_configured_ranges() {
        let cfg = LevitationConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let lev = Levitation::sample(&cfg, &mut rng);
            assert!((1.0..=3.0).contains(&lev.duration), "{lev:?}");
            assert!((0.0..=2.0).contains(&lev.delay), "{lev:?}");
            assert_eq!(lev.amplitude, cfg.amplitude);
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let cfg = LevitationConfig {
            amplitude: 0.2,
            duration_sec: [2.0, 2.0],
            delay_sec: [0.0, 0.0],
        };
        let lev = Levitation::sample(&cfg, &mut StdRng::seed_from_u64(1));
        assert_eq!(lev.duration, 2.0);
        assert_eq!(lev.delay, 0.0);
    }
}
