use std::collections::HashMap;

use crate::{EasingFn, Error, InterpolationFn, Offset, TweenBuilder};

/// Receives tweened components by key. See [`Tween::apply`].
pub trait TweenTarget {
    fn write(&mut self, key: &str, value: f32);
}

impl TweenTarget for HashMap<String, f32> {
    fn write(&mut self, key: &str, value: f32) {
        self.insert(key.to_string(), value);
    }
}

/// Keys: `x`, `y`, `rotation`, `scale_x`, `scale_y`.
impl TweenTarget for Offset {
    fn write(&mut self, key: &str, value: f32) {
        match key {
            "x" => self.pos[0] = value,
            "y" => self.pos[1] = value,
            "rotation" => self.rot = value,
            "scale_x" => self.scale[0] = value,
            "scale_y" => self.scale[1] = value,
            other => log::warn!("offset has no tweenable key '{other}'"),
        }
    }
}

/// Engine-agnostic interpolation state: an n-dimensional `from` vector moving by `change`
/// over `duration` milliseconds, sampled at `now`.
///
/// `window` is the normalized slice of that path the tween currently plays, narrowed by
/// [`Tween::crop`].
#[derive(Clone, Debug)]
pub struct Tween {
    from: Vec<f32>,
    change: Vec<f32>,
    duration: f32,
    now: f32,
    window: (f32, f32),
    interpolation: InterpolationFn,
    easing: EasingFn,
    bindings: Vec<String>,
}

impl Tween {
    pub fn new(interpolation: InterpolationFn, easing: EasingFn) -> Self {
        Self {
            from: Vec::new(),
            change: Vec::new(),
            duration: 0.0,
            now: 0.0,
            window: (0.0, 1.0),
            interpolation,
            easing,
            bindings: Vec::new(),
        }
    }

    /// Tween from `start` to `end`. Extra components on the longer side are ignored.
    pub fn to(&mut self, start: &[f32], end: &[f32]) -> &mut Self {
        self.from = start.iter().take(end.len()).copied().collect();
        self.change = start.iter().zip(end).map(|(s, e)| e - s).collect();
        self.window = (0.0, 1.0);
        self
    }

    /// Tween from `start` by `delta`.
    pub fn change(&mut self, start: &[f32], delta: &[f32]) -> &mut Self {
        let n = start.len().min(delta.len());
        self.from = start[..n].to_vec();
        self.change = delta[..n].to_vec();
        self.window = (0.0, 1.0);
        self
    }

    pub fn time(&mut self, now: f32) -> &mut Self {
        self.now = now;
        self
    }

    pub fn duration(&mut self, duration: f32) -> &mut Self {
        self.duration = duration;
        self
    }

    /// Binds output component `i` to `keys[i]` for [`Tween::apply`].
    pub fn bind<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.bindings = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Start of the full path, before any crop.
    pub fn from_values(&self) -> &[f32] {
        &self.from
    }

    pub fn delta(&self) -> &[f32] {
        &self.change
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn total_duration(&self) -> f32 {
        self.duration
    }

    /// Normalized `(start, end)` of the full path played over `duration`.
    pub fn window(&self) -> (f32, f32) {
        self.window
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    pub fn dimensions(&self) -> usize {
        self.from.len()
    }

    pub fn get(&self) -> Vec<f32> {
        self.sample(self.now)
    }

    /// Evaluates like [`Tween::get`] and writes each bound component into `target`.
    /// Components without a binding are only returned.
    pub fn apply(&self, target: &mut dyn TweenTarget) -> Vec<f32> {
        let values = self.get();
        for (key, value) in self.bindings.iter().zip(&values) {
            target.write(key, *value);
        }
        values
    }

    /// Mirrors the evaluation point: `now = duration - now`.
    pub fn reverse(&mut self) -> &mut Self {
        self.now = self.duration - self.now;
        self
    }

    /// Narrows the tween to the part of its path between `start_pct` and `1 - end_pct` of the
    /// duration. The eased curve itself is kept, so `get` returns the same value for the same
    /// moment of the uncropped timeline; `now` is shifted to match and clamped to the new window.
    pub fn crop(&mut self, start_pct: f32, end_pct: f32) -> Result<&mut Self, Error> {
        if !(start_pct.is_finite() && end_pct.is_finite())
            || start_pct < 0.0
            || end_pct < 0.0
            || start_pct + end_pct > 1.0
        {
            return Err(Error::InvalidValue {
                message: format!("crop window ({start_pct}, {end_pct}) is outside [0, 1]"),
            });
        }
        if start_pct == 0.0 && end_pct == 0.0 {
            return Ok(self);
        }

        let (t0, t1) = self.window;
        let span = t1 - t0;
        self.window = (t0 + start_pct * span, t0 + (1.0 - end_pct) * span);

        let start_time = self.duration * start_pct;
        self.duration *= 1.0 - start_pct - end_pct;
        self.now = (self.now - start_time).clamp(0.0, self.duration.max(0.0));
        Ok(self)
    }

    /// Multiplies duration and time by `pct`; the spatial path is unchanged.
    pub fn scale(&mut self, pct: f32) -> &mut Self {
        self.duration *= pct;
        self.now *= pct;
        self
    }

    fn sample(&self, t: f32) -> Vec<f32> {
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            t / self.duration
        };
        let (t0, t1) = self.window;
        let at = t0 + progress * (t1 - t0);
        self.from
            .iter()
            .zip(&self.change)
            .map(|(&from, &change)| (self.interpolation)(at, from, change, 1.0, self.easing))
            .collect()
    }
}

impl Default for Tween {
    fn default() -> Self {
        TweenBuilder::build(TweenBuilder::LINEAR, TweenBuilder::NONE)
    }
}
