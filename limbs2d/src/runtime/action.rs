use std::collections::{HashMap, VecDeque};

use crate::{Easing, Error, LimbId, LimbTree, SkeletonEvent, Tween, TweenBuilder};

/// Offset attribute of a limb that a [`Frame`] drives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimbAttribute {
    OffsetPosition,
    OffsetX,
    OffsetY,
    OffsetRotation,
    OffsetScale,
    OffsetScaleX,
    OffsetScaleY,
}

impl LimbAttribute {
    /// Tween binding keys understood by [`crate::Offset`]'s `TweenTarget` impl.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            LimbAttribute::OffsetPosition => &["x", "y"],
            LimbAttribute::OffsetX => &["x"],
            LimbAttribute::OffsetY => &["y"],
            LimbAttribute::OffsetRotation => &["rotation"],
            LimbAttribute::OffsetScale => &["scale_x", "scale_y"],
            LimbAttribute::OffsetScaleX => &["scale_x"],
            LimbAttribute::OffsetScaleY => &["scale_y"],
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameState {
    #[default]
    Waiting,
    Started,
    Completed,
}

/// One tween-driven segment of a [`SkeletonAction`], active between `start_ms` and `end_ms`
/// of the action's timeline.
#[derive(Clone, Debug)]
pub struct Frame {
    start_ms: f32,
    end_ms: f32,
    state: FrameState,
    tween: Tween,
    target: LimbId,
    attribute: LimbAttribute,
}

impl Frame {
    /// The tween's duration is set to the frame span and its bindings to `attribute`'s keys.
    pub fn new(
        target: LimbId,
        attribute: LimbAttribute,
        start_ms: f32,
        end_ms: f32,
        mut tween: Tween,
    ) -> Result<Self, Error> {
        if !(start_ms.is_finite() && end_ms.is_finite()) || end_ms < start_ms {
            return Err(Error::InvalidValue {
                message: format!("frame window [{start_ms}, {end_ms}] is not a valid interval"),
            });
        }
        tween
            .duration(end_ms - start_ms)
            .bind(attribute.keys().iter().copied());
        Ok(Self {
            start_ms,
            end_ms,
            state: FrameState::Waiting,
            tween,
            target,
            attribute,
        })
    }

    /// Linear tween of `attribute` from `from` to `to`.
    pub fn tween_to(
        target: LimbId,
        attribute: LimbAttribute,
        start_ms: f32,
        end_ms: f32,
        from: &[f32],
        to: &[f32],
        easing: Easing,
    ) -> Result<Self, Error> {
        let mut tween = TweenBuilder::linear(easing);
        tween.to(from, to);
        Self::new(target, attribute, start_ms, end_ms, tween)
    }

    pub fn start_ms(&self) -> f32 {
        self.start_ms
    }

    pub fn end_ms(&self) -> f32 {
        self.end_ms
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    pub fn target(&self) -> LimbId {
        self.target
    }

    pub fn attribute(&self) -> LimbAttribute {
        self.attribute
    }

    fn shift(&mut self, delta_ms: f32) {
        self.start_ms += delta_ms;
        self.end_ms += delta_ms;
    }

    fn advance(&mut self, elapsed_ms: f32, limbs: &mut LimbTree) {
        if self.state == FrameState::Waiting && elapsed_ms >= self.start_ms {
            self.state = FrameState::Started;
            log::trace!("frame [{}, {}] started", self.start_ms, self.end_ms);
        }
        if self.state != FrameState::Started {
            return;
        }
        if elapsed_ms >= self.end_ms {
            self.apply(self.end_ms - self.start_ms, limbs);
            self.state = FrameState::Completed;
            log::trace!("frame [{}, {}] completed", self.start_ms, self.end_ms);
        } else {
            self.apply(elapsed_ms - self.start_ms, limbs);
        }
    }

    fn apply(&mut self, local_ms: f32, limbs: &mut LimbTree) {
        let Some(limb) = limbs.get_mut(self.target) else {
            log::warn!("frame targets missing limb {}", self.target);
            return;
        };
        self.tween.time(local_ms);
        self.tween.apply(&mut limb.offset);
    }
}

/// A named, time-bounded sequence of [`Frame`]s.
#[derive(Clone, Debug)]
pub struct SkeletonAction {
    name: String,
    frames: Vec<Frame>,
    pub duration: f32,
    elapsed_ms: f32,
    start_time: Option<f64>,
    completed: bool,
    complete_requested: bool,
}

impl SkeletonAction {
    pub fn new(name: impl Into<String>, frames: Vec<Frame>, duration: f32) -> Self {
        Self {
            name: name.into(),
            frames,
            duration,
            elapsed_ms: 0.0,
            start_time: None,
            completed: false,
            complete_requested: false,
        }
    }

    /// Builds an action from frames authored on an arbitrary time origin, normalized with
    /// [`SkeletonAction::trim`].
    pub fn from_frames(name: impl Into<String>, mut frames: Vec<Frame>) -> Self {
        let duration = Self::trim(&mut frames);
        Self::new(name, frames, duration)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn start(&mut self, now_ms: f64) {
        self.start_time = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.completed = false;
        self.complete_requested = false;
        self.start_time = None;
        self.elapsed_ms = 0.0;
        for frame in &mut self.frames {
            frame.state = FrameState::Waiting;
        }
    }

    /// Jumps to the end on the next update: every frame lands on its final value and the
    /// completion event fires if it has not already.
    pub fn complete(&mut self) {
        self.complete_requested = true;
    }

    /// Advances the action to `now_ms` and applies active frames to `limbs`.
    ///
    /// Completion is reported by pushing [`SkeletonEvent::ActionComplete`] onto `events`
    /// exactly once per play. Returns whether the action has completed.
    pub fn update(
        &mut self,
        now_ms: f64,
        limbs: &mut LimbTree,
        events: &mut VecDeque<SkeletonEvent>,
    ) -> bool {
        let Some(start_time) = self.start_time else {
            return self.completed;
        };

        self.elapsed_ms = (now_ms - start_time) as f32;
        if self.complete_requested {
            self.elapsed_ms = self
                .elapsed_ms
                .max(self.duration)
                .max(Self::trim_end(&self.frames));
        }

        for frame in &mut self.frames {
            frame.advance(self.elapsed_ms, limbs);
        }

        if self.elapsed_ms >= self.duration && !self.completed {
            self.completed = true;
            log::debug!("action '{}' completed after {} ms", self.name, self.elapsed_ms);
            events.push_back(SkeletonEvent::ActionComplete {
                name: self.name.clone(),
            });
        }
        self.completed
    }

    /// Shifts `frames` so the earliest one starts at 0 and returns `duration` shortened by the
    /// same amount.
    pub fn trim_start(frames: &mut [Frame], duration: f32) -> f32 {
        let Some(earliest) = frames.iter().map(|f| f.start_ms).reduce(f32::min) else {
            return duration;
        };
        for frame in frames.iter_mut() {
            frame.shift(-earliest);
        }
        (duration - earliest).max(0.0)
    }

    /// The latest frame end, which is the duration that exactly covers `frames`.
    pub fn trim_end(frames: &[Frame]) -> f32 {
        frames.iter().map(|f| f.end_ms).fold(0.0, f32::max)
    }

    /// [`SkeletonAction::trim_start`] followed by [`SkeletonAction::trim_end`].
    pub fn trim(frames: &mut [Frame]) -> f32 {
        Self::trim_start(frames, 0.0);
        Self::trim_end(frames)
    }

    /// Reset copy whose frames point at the limbs `map` sends their targets to. Frames whose
    /// target is not in `map` are dropped.
    pub(crate) fn retarget(&self, map: &HashMap<LimbId, LimbId>) -> Self {
        let mut action = self.clone();
        action.reset();
        action.frames.retain_mut(|frame| match map.get(&frame.target) {
            Some(&target) => {
                frame.target = target;
                true
            }
            None => {
                log::warn!(
                    "action '{}' drops a frame targeting limb {} outside the copied body",
                    self.name,
                    frame.target
                );
                false
            }
        });
        action
    }
}
