//! Cooperative tween timeline.
//!
//! Tweens interpolate a `Vec3` property toward a target over time and are
//! advanced by the frame loop through [`Timeline::tick`]. Each `start` returns
//! a [`TweenHandle`]; `kill` removes the tween before its next write.

use glam::Vec3;
use std::time::Duration;

use crate::scene::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
    Position,
    Rotation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenTarget {
    Node(NodeId, Property),
    Camera,
}

/// Something tweens can read from and write to.
pub trait Animatable {
    /// Current value, or `None` if the target no longer resolves.
    fn read(&self, target: TweenTarget) -> Option<Vec3>;
    fn write(&mut self, target: TweenTarget, value: Vec3);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Smooth start and stop (sine).
    SineInOut,
    /// Fast start, gentle stop (quadratic).
    #[default]
    QuadOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) * 0.5,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Relative to the value captured when the tween starts.
    By(Vec3),
    /// Absolute end value.
    To(Vec3),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Once,
    Forever,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub target: TweenTarget,
    pub motion: Motion,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
    pub repeat: Repeat,
    pub yoyo: bool,
}

impl TweenSpec {
    pub fn new(target: TweenTarget, motion: Motion, duration: f32) -> Self {
        Self {
            target,
            motion,
            duration,
            delay: 0.0,
            ease: Ease::default(),
            repeat: Repeat::Once,
            yoyo: false,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn forever(mut self) -> Self {
        self.repeat = Repeat::Forever;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

struct Tween {
    handle: TweenHandle,
    spec: TweenSpec,
    elapsed: f32,
    // Captured on the first tick past the delay.
    span: Option<(Vec3, Vec3)>,
}

impl Tween {
    /// Advance and write; returns `false` once the tween is done.
    fn advance(&mut self, dt: f32, sink: &mut impl Animatable) -> bool {
        self.elapsed += dt;
        self.wrap_elapsed();
        let active = self.elapsed - self.spec.delay;
        if active < 0.0 {
            return true;
        }
        let (from, to) = match self.span {
            Some(span) => span,
            None => {
                let Some(from) = sink.read(self.spec.target) else {
                    return false;
                };
                let to = match self.spec.motion {
                    Motion::By(delta) => from + delta,
                    Motion::To(end) => end,
                };
                self.span = Some((from, to));
                (from, to)
            }
        };
        let (phase, done) = self.phase(active);
        let value = if phase >= 1.0 {
            to
        } else if phase <= 0.0 {
            from
        } else {
            from.lerp(to, self.spec.ease.apply(phase))
        };
        sink.write(self.spec.target, value);
        !done
    }

    // Forever tweens drop whole periods (two cycles when yoyo, keeping the
    // play direction) so the clock stays small enough for f32 frame steps.
    fn wrap_elapsed(&mut self) {
        if self.spec.repeat != Repeat::Forever || self.spec.duration <= 0.0 {
            return;
        }
        let period = if self.spec.yoyo {
            2.0 * self.spec.duration
        } else {
            self.spec.duration
        };
        let active = self.elapsed - self.spec.delay;
        if active >= period {
            self.elapsed -= (active / period).floor() * period;
            self.elapsed = self.elapsed.max(self.spec.delay);
        }
    }

    // Position within the current cycle in [0, 1], and whether the tween ended.
    fn phase(&self, active: f32) -> (f32, bool) {
        let duration = self.spec.duration;
        if duration <= 0.0 {
            return (1.0, self.spec.repeat == Repeat::Once);
        }
        let cycles = active / duration;
        match self.spec.repeat {
            Repeat::Once => (cycles.min(1.0), cycles >= 1.0),
            Repeat::Forever => {
                let n = cycles.floor();
                let frac = cycles - n;
                let reversed = self.spec.yoyo && (n as u64) % 2 == 1;
                (if reversed { 1.0 - frac } else { frac }, false)
            }
        }
    }
}

#[derive(Default)]
pub struct Timeline {
    next: u64,
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, spec: TweenSpec) -> TweenHandle {
        self.next += 1;
        let handle = TweenHandle(self.next);
        self.tweens.push(Tween {
            handle,
            spec,
            elapsed: 0.0,
            span: None,
        });
        handle
    }

    /// Kill `prev` (if any) and start `spec` in its place.
    pub fn replace(&mut self, prev: Option<TweenHandle>, spec: TweenSpec) -> TweenHandle {
        if let Some(prev) = prev {
            self.kill(prev);
        }
        self.start(spec)
    }

    /// Stop a tween where it is. Returns `false` if it had already finished or
    /// been killed.
    pub fn kill(&mut self, handle: TweenHandle) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.handle != handle);
        self.tweens.len() != before
    }

    pub fn is_live(&self, handle: TweenHandle) -> bool {
        self.tweens.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn spec(&self, handle: TweenHandle) -> Option<&TweenSpec> {
        self.tweens
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| &t.spec)
    }

    /// Targets of every live tween, in start order.
    pub fn targets(&self) -> impl Iterator<Item = TweenTarget> + '_ {
        self.tweens.iter().map(|t| t.spec.target)
    }

    /// Advance every live tween by `dt`, in start order, dropping finished ones.
    pub fn tick(&mut self, dt: Duration, sink: &mut impl Animatable) {
        let dt = dt.as_secs_f32();
        self.tweens.retain_mut(|t| t.advance(dt, &mut *sink));
    }
}
