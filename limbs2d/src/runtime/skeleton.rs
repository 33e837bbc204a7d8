use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::{Clock, Drawable, Error, Limb, LimbId, LimbTree, SkeletonAction, SystemClock};

#[derive(Clone, Debug, PartialEq)]
pub enum SkeletonEvent {
    ActionComplete { name: String },
}

pub trait SkeletonListener {
    fn on_event(&mut self, skeleton: &mut Skeleton, event: &SkeletonEvent);
}

/// Explicit context handed to a skeleton at construction.
#[derive(Clone)]
pub struct SkeletonConfig {
    pub clock: Rc<dyn Clock>,
}

impl SkeletonConfig {
    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            clock: Rc::new(SystemClock::new()),
        }
    }
}

impl fmt::Debug for SkeletonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkeletonConfig")
            .field("now_ms", &self.clock.now_ms())
            .finish()
    }
}

/// A limb tree rooted at `body`, with named parts and playable actions.
pub struct Skeleton {
    limbs: LimbTree,
    body: LimbId,
    parts: HashMap<String, LimbId>,
    actions: HashMap<String, SkeletonAction>,
    playing: Vec<String>,
    event_queue: VecDeque<SkeletonEvent>,
    listener: Option<Box<dyn SkeletonListener>>,
    draining_events: bool,
    clock: Rc<dyn Clock>,
}

impl fmt::Debug for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skeleton")
            .field("body", &self.body)
            .field("limbs", &self.limbs.len())
            .field("parts", &self.parts)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("playing", &self.playing)
            .field("queued_events", &self.event_queue.len())
            .finish()
    }
}

impl Skeleton {
    pub fn new(body: Box<dyn Drawable>, config: SkeletonConfig) -> Self {
        let mut limbs = LimbTree::new();
        let body = limbs.create(body);
        Self::from_tree(limbs, body, config)
    }

    /// Wraps an existing tree; `body` becomes the root the skeleton updates.
    pub fn from_tree(limbs: LimbTree, body: LimbId, config: SkeletonConfig) -> Self {
        Self {
            limbs,
            body,
            parts: HashMap::new(),
            actions: HashMap::new(),
            playing: Vec::new(),
            event_queue: VecDeque::new(),
            listener: None,
            draining_events: false,
            clock: config.clock,
        }
    }

    pub fn body(&self) -> LimbId {
        self.body
    }

    pub fn limbs(&self) -> &LimbTree {
        &self.limbs
    }

    pub fn limbs_mut(&mut self) -> &mut LimbTree {
        &mut self.limbs
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn set_listener<L: SkeletonListener + 'static>(&mut self, listener: L) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Registers `limb` under `name`. Any limb of the arena may be a part.
    pub fn add_part(&mut self, name: impl Into<String>, limb: LimbId) {
        self.parts.insert(name.into(), limb);
    }

    pub fn part(&self, name: &str) -> Result<LimbId, Error> {
        self.parts.get(name).copied().ok_or_else(|| Error::UnknownPart {
            name: name.to_string(),
        })
    }

    pub fn parts(&self) -> &HashMap<String, LimbId> {
        &self.parts
    }

    /// Registers `action` under its name, replacing (and stopping) any previous one.
    pub fn add_action(&mut self, action: SkeletonAction) {
        let name = action.name().to_string();
        self.playing.retain(|p| *p != name);
        self.actions.insert(name, action);
    }

    pub fn action(&self, name: &str) -> Option<&SkeletonAction> {
        self.actions.get(name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut SkeletonAction> {
        self.actions.get_mut(name)
    }

    /// Restarts the named action from its beginning. A completion of its previous play that is
    /// still queued is discarded.
    pub fn act(&mut self, name: &str) -> Result<(), Error> {
        let now = self.clock.now_ms();
        let Some(action) = self.actions.get_mut(name) else {
            return Err(Error::UnknownAction {
                name: name.to_string(),
            });
        };
        action.reset();
        action.start(now);
        self.event_queue.retain(
            |event| !matches!(event, SkeletonEvent::ActionComplete { name: done } if done == name),
        );
        if !self.playing.iter().any(|p| p == name) {
            self.playing.push(name.to_string());
        }
        log::debug!("action '{name}' started at {now} ms");
        Ok(())
    }

    /// Stops advancing the named action without completing it.
    pub fn stop(&mut self, name: &str) -> bool {
        let before = self.playing.len();
        self.playing.retain(|p| p != name);
        before != self.playing.len()
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.playing.iter().any(|p| p == name)
    }

    pub fn playing(&self) -> &[String] {
        &self.playing
    }

    /// Advances playing actions, then resolves and paints the body.
    ///
    /// Events raised while advancing are delivered to the listener once the frame is done; with
    /// no listener they wait for [`Skeleton::drain_events`]. Without either, the queue keeps
    /// growing by one event per completed play.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();

        let mut i = 0;
        while i < self.playing.len() {
            let name = &self.playing[i];
            let completed = match self.actions.get_mut(name) {
                Some(action) => action.update(now, &mut self.limbs, &mut self.event_queue),
                None => true,
            };
            if completed {
                self.playing.remove(i);
            } else {
                i += 1;
            }
        }

        self.limbs.update(self.body);
        self.dispatch_events();
    }

    pub fn drain_events(&mut self) -> Vec<SkeletonEvent> {
        self.event_queue.drain(..).collect()
    }

    fn dispatch_events(&mut self) {
        if self.draining_events {
            return;
        }
        let Some(mut listener) = self.listener.take() else {
            return;
        };
        self.draining_events = true;
        while let Some(event) = self.event_queue.pop_front() {
            listener.on_event(self, &event);
        }
        self.draining_events = false;
        if self.listener.is_none() {
            self.listener = Some(listener);
        }
    }

    /// Visits the body and every descendant, preorder.
    pub fn each<F: FnMut(LimbId, &Limb)>(&self, f: F) {
        self.limbs.all(self.body, f);
    }

    pub fn each_mut<F: FnMut(LimbId, &mut Limb)>(&mut self, f: F) {
        self.limbs.all_mut(self.body, f);
    }

    /// Deep-copies the body into a fresh arena.
    ///
    /// Parts and action frames are re-pointed at the copied limbs; those referring to limbs
    /// outside the body subtree are dropped. The copy shares the clock, has no listener and
    /// plays nothing.
    pub fn copy(&self) -> Skeleton {
        let mut limbs = LimbTree::new();
        let map = self.limbs.deep_copy_into(self.body, &mut limbs);

        let mut parts = HashMap::with_capacity(self.parts.len());
        for (name, limb) in &self.parts {
            match map.get(limb) {
                Some(&copied) => {
                    parts.insert(name.clone(), copied);
                }
                None => log::warn!("part '{name}' is outside the body and is not copied"),
            }
        }

        let actions = self
            .actions
            .iter()
            .map(|(name, action)| (name.clone(), action.retarget(&map)))
            .collect();

        Skeleton {
            limbs,
            body: map[&self.body],
            parts,
            actions,
            playing: Vec::new(),
            event_queue: VecDeque::new(),
            listener: None,
            draining_events: false,
            clock: Rc::clone(&self.clock),
        }
    }
}
