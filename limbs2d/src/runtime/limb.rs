use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::transform::{add, mul, rotate, sub};
use crate::{Axis, AxisFlags, Drawable, Error, Offset, Point};

/// Index of a limb inside its [`LimbTree`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LimbId(usize);

impl LimbId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LimbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct Limb {
    drawable: Option<Box<dyn Drawable>>,
    parent: Option<LimbId>,
    children: Vec<LimbId>,

    /// Transform relative to the parent's frame, or the world when this is a root.
    pub offset: Offset,
    pub default_offset: Offset,
    pub locks: AxisFlags,
    /// Paint above the parent when set, beneath it otherwise.
    pub overlap: bool,
    pub disabled: bool,

    history: Option<Offset>,
    offset_history: Option<Offset>,
    dirty: AxisFlags,
}

impl fmt::Debug for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Limb")
            .field("has_drawable", &self.drawable.is_some())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("offset", &self.offset)
            .field("locks", &self.locks)
            .field("overlap", &self.overlap)
            .field("disabled", &self.disabled)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Limb {
    fn new(drawable: Option<Box<dyn Drawable>>, offset: Offset, disabled: bool) -> Self {
        Self {
            drawable,
            parent: None,
            children: Vec::new(),
            offset,
            default_offset: offset,
            locks: AxisFlags::NONE,
            overlap: false,
            disabled,
            history: None,
            offset_history: None,
            dirty: AxisFlags::NONE,
        }
    }

    pub fn parent(&self) -> Option<LimbId> {
        self.parent
    }

    pub fn children(&self) -> &[LimbId] {
        &self.children
    }

    pub fn drawable(&self) -> Option<&dyn Drawable> {
        self.drawable.as_deref()
    }

    pub fn drawable_mut(&mut self) -> Option<&mut (dyn Drawable + 'static)> {
        self.drawable.as_deref_mut()
    }

    /// Per-channel change flags computed by the last [`LimbTree::update`].
    pub fn dirty(&self) -> AxisFlags {
        self.dirty
    }

    /// Drawable transform observed at the end of the last update.
    pub fn history(&self) -> Option<Offset> {
        self.history
    }

    pub fn offset_history(&self) -> Option<Offset> {
        self.offset_history
    }

    fn live_drawable(&self) -> Option<&dyn Drawable> {
        self.drawable.as_deref().filter(|d| !d.is_gone())
    }

    fn live_drawable_mut(&mut self) -> Option<&mut (dyn Drawable + 'static)> {
        self.drawable.as_deref_mut().filter(|d| !d.is_gone())
    }
}

/// Arena owning every limb of one or more limb trees.
///
/// Limbs refer to each other by [`LimbId`]. Removing a limb from its tree disables it but keeps
/// its slot, so ids stay valid for the lifetime of the arena.
#[derive(Debug, Default)]
pub struct LimbTree {
    limbs: Vec<Limb>,
}

impl Index<LimbId> for LimbTree {
    type Output = Limb;

    fn index(&self, id: LimbId) -> &Limb {
        &self.limbs[id.0]
    }
}

impl IndexMut<LimbId> for LimbTree {
    fn index_mut(&mut self, id: LimbId) -> &mut Limb {
        &mut self.limbs[id.0]
    }
}

impl LimbTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }

    pub fn get(&self, id: LimbId) -> Option<&Limb> {
        self.limbs.get(id.0)
    }

    pub fn get_mut(&mut self, id: LimbId) -> Option<&mut Limb> {
        self.limbs.get_mut(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = LimbId> + '_ {
        (0..self.limbs.len()).map(LimbId)
    }

    /// Creates an enabled root limb bound to `drawable`. Its offset starts at the drawable's
    /// current transform.
    pub fn create(&mut self, mut drawable: Box<dyn Drawable>) -> LimbId {
        drawable.on_bound();
        let offset = drawable.transform();
        self.push(Limb::new(Some(drawable), offset, false))
    }

    /// Creates a reference-only limb. It stays disabled until a drawable is bound or it is given
    /// children through [`LimbTree::attach`].
    pub fn create_empty(&mut self) -> LimbId {
        self.push(Limb::new(None, Offset::IDENTITY, true))
    }

    /// Binds `drawable` to `id`, enabling the limb, and returns the previous drawable.
    pub fn set_drawable(
        &mut self,
        id: LimbId,
        mut drawable: Box<dyn Drawable>,
    ) -> Option<Box<dyn Drawable>> {
        drawable.on_bound();
        let limb = &mut self[id];
        limb.disabled = false;
        limb.history = None;
        limb.drawable.replace(drawable)
    }

    pub fn take_drawable(&mut self, id: LimbId) -> Option<Box<dyn Drawable>> {
        let limb = &mut self[id];
        limb.history = None;
        limb.drawable.take()
    }

    fn push(&mut self, limb: Limb) -> LimbId {
        self.limbs.push(limb);
        LimbId(self.limbs.len() - 1)
    }

    pub fn parent(&self, id: LimbId) -> Option<LimbId> {
        self[id].parent
    }

    pub fn children(&self, id: LimbId) -> &[LimbId] {
        &self[id].children
    }

    pub fn root_of(&self, id: LimbId) -> LimbId {
        let mut current = id;
        while let Some(parent) = self[current].parent {
            current = parent;
        }
        current
    }

    /// Whether `ancestor` is `id` itself or one of its parents.
    pub fn is_ancestor(&self, ancestor: LimbId, id: LimbId) -> bool {
        let mut current = Some(id);
        while let Some(limb) = current {
            if limb == ancestor {
                return true;
            }
            current = self[limb].parent;
        }
        false
    }

    /// Appends each of `children` to `parent`, detaching it from its old parent first.
    ///
    /// Attachments that would create a cycle are skipped and reported. A disabled drawable-less
    /// `parent` is enabled as a joint once it holds a child. Returns `true` when every child was
    /// attached.
    pub fn attach(&mut self, parent: LimbId, children: &[LimbId]) -> bool {
        let mut all_attached = true;
        for &child in children {
            if self.is_ancestor(child, parent) {
                log::warn!("refusing to attach limb {child} under its own descendant {parent}");
                all_attached = false;
                continue;
            }
            self.unlink(child);
            self.link(parent, child);
        }
        let joint = &mut self[parent];
        if joint.disabled && joint.drawable.is_none() && !joint.children.is_empty() {
            joint.disabled = false;
        }
        all_attached
    }

    /// Removes `id` from its parent's children. Detaching a root is reported and ignored.
    pub fn detach(&mut self, id: LimbId) -> bool {
        if self[id].parent.is_none() {
            log::warn!("limb {id} has no parent to detach from");
            return false;
        }
        self.unlink(id);
        true
    }

    /// Puts `other` in the tree position of `id` and hands it `id`'s children.
    ///
    /// Fails when `other` already has children. On success `id` ends up detached, childless and
    /// disabled.
    pub fn replace(&mut self, id: LimbId, other: LimbId) -> bool {
        if id == other {
            log::warn!("cannot replace limb {id} with itself");
            return false;
        }
        if !self[other].children.is_empty() {
            log::warn!("cannot replace limb {id} with limb {other}: it already has children");
            return false;
        }

        self.unlink(other);
        self.forget_history(other);
        if let Some(parent) = self[id].parent {
            let siblings = &mut self[parent].children;
            if let Some(slot) = siblings.iter().position(|&c| c == id) {
                siblings[slot] = other;
            }
            self[other].parent = Some(parent);
            self[id].parent = None;
        }

        let children = std::mem::take(&mut self[id].children);
        for &child in &children {
            self[child].parent = Some(other);
        }
        self[other].children = children;
        self[id].disabled = true;
        true
    }

    /// Detaches (when attached) and disables `id`.
    pub fn remove(&mut self, id: LimbId) {
        self.unlink(id);
        self[id].disabled = true;
    }

    fn link(&mut self, parent: LimbId, child: LimbId) {
        self[child].parent = Some(parent);
        self[parent].children.push(child);
        self.forget_history(child);
    }

    fn unlink(&mut self, id: LimbId) {
        if let Some(parent) = self[id].parent.take() {
            self[parent].children.retain(|&c| c != id);
            self.forget_history(id);
        }
    }

    /// Makes the next resolve treat `id` as changed on every channel.
    fn forget_history(&mut self, id: LimbId) {
        let limb = &mut self[id];
        limb.history = None;
        limb.offset_history = None;
    }

    /// Effective world transform of `id`: its drawable's transform, or for drawable-less limbs
    /// the offset carried through the parent's frame.
    pub fn frame(&self, id: LimbId) -> Offset {
        let limb = &self[id];
        if let Some(drawable) = limb.live_drawable() {
            return drawable.transform();
        }
        if limb.parent.is_none() {
            return limb.offset;
        }
        Offset {
            pos: self.get_world_pt(id, limb.offset.pos),
            rot: self.get_world_ang(id, limb.offset.rot),
            scale: self.get_world_zoom(id, limb.offset.scale),
        }
    }

    pub(crate) fn frame_origin(&self, id: LimbId) -> Point {
        self[id]
            .live_drawable()
            .map(|d| d.origin())
            .unwrap_or([0.0, 0.0])
    }

    /// Converts a point in the parent's frame into `id`'s body frame.
    pub fn get_body_pt(&self, id: LimbId, world_pt: Point) -> Result<Point, Error> {
        let Some(parent) = self[id].parent else {
            return Ok(world_pt);
        };
        let frame = self.frame(parent);
        if frame.scale[0] == 0.0 || frame.scale[1] == 0.0 {
            return Err(Error::DivisionByZero { axis: Axis::Pos });
        }
        let local = rotate(sub(world_pt, frame.pos), -frame.rot);
        Ok(add(
            [local[0] / frame.scale[0], local[1] / frame.scale[1]],
            self.frame_origin(parent),
        ))
    }

    /// Converts a point in `id`'s body frame into the parent's frame.
    pub fn get_world_pt(&self, id: LimbId, body_pt: Point) -> Point {
        let Some(parent) = self[id].parent else {
            return body_pt;
        };
        let frame = self.frame(parent);
        let local = mul(sub(body_pt, self.frame_origin(parent)), frame.scale);
        add(frame.pos, rotate(local, frame.rot))
    }

    pub fn get_body_ang(&self, id: LimbId, world_ang: f32) -> f32 {
        match self[id].parent {
            Some(parent) => world_ang - self.frame(parent).rot,
            None => world_ang,
        }
    }

    pub fn get_world_ang(&self, id: LimbId, body_ang: f32) -> f32 {
        match self[id].parent {
            Some(parent) => body_ang + self.frame(parent).rot,
            None => body_ang,
        }
    }

    pub fn get_body_zoom(&self, id: LimbId, world_scale: Point) -> Result<Point, Error> {
        let Some(parent) = self[id].parent else {
            return Ok(world_scale);
        };
        let scale = self.frame(parent).scale;
        if scale[0] == 0.0 || scale[1] == 0.0 {
            return Err(Error::DivisionByZero { axis: Axis::Scale });
        }
        Ok([world_scale[0] / scale[0], world_scale[1] / scale[1]])
    }

    pub fn get_world_zoom(&self, id: LimbId, body_scale: Point) -> Point {
        match self[id].parent {
            Some(parent) => mul(body_scale, self.frame(parent).scale),
            None => body_scale,
        }
    }

    /// Locks the channels selected by `axis`.
    ///
    /// A channel that was unlocked, or any channel when `force_update` is set, first captures
    /// the drawable's current placement into the offset so the lock holds it in place.
    pub fn lock(&mut self, id: LimbId, axis: Axis, force_update: bool) -> Result<(), Error> {
        let current = self[id].live_drawable().map(|d| d.transform());
        let mut captured = self[id].offset;

        if let Some(current) = current {
            let locks = self[id].locks;
            for &channel in axis.channels() {
                if locks.get(channel) && !force_update {
                    continue;
                }
                match channel {
                    Axis::Pos => captured.pos = self.get_body_pt(id, current.pos)?,
                    Axis::Rot => captured.rot = self.get_body_ang(id, current.rot),
                    Axis::Scale => captured.scale = self.get_body_zoom(id, current.scale)?,
                    Axis::All => {}
                }
            }
        }

        let limb = &mut self[id];
        limb.offset = captured;
        limb.locks.set(axis, true);
        Ok(())
    }

    pub fn unlock(&mut self, id: LimbId, axis: Axis) {
        self[id].locks.set(axis, false);
    }

    /// Restores the offset from its default snapshot.
    pub fn restore_default(&mut self, id: LimbId) {
        let limb = &mut self[id];
        limb.offset = limb.default_offset;
    }

    pub fn set_default(&mut self, id: LimbId) {
        let limb = &mut self[id];
        limb.default_offset = limb.offset;
    }

    /// Resolves transforms for the subtree at `id`, then paints it.
    pub fn update(&mut self, id: LimbId) {
        let parent_dirty = self[id]
            .parent
            .map(|parent| self[parent].dirty)
            .unwrap_or(AxisFlags::NONE);
        self.resolve(id, parent_dirty);
        self.paint(id);
    }

    fn resolve(&mut self, id: LimbId, parent_dirty: AxisFlags) {
        if self[id].disabled {
            // Resolve as fully dirty once re-enabled.
            for limb in self.list(id) {
                self.forget_history(limb);
            }
            return;
        }
        let limb = &self[id];

        let current = limb.live_drawable().map(|d| d.transform());
        let mut changed = match limb.offset_history {
            Some(previous) => limb.offset.changed_from(&previous),
            None => AxisFlags::ALL,
        };
        if let Some(current) = current {
            changed = changed
                | match limb.history {
                    Some(previous) => current.changed_from(&previous),
                    None => AxisFlags::ALL,
                };
        }
        let dirty = changed | parent_dirty;

        if current.is_some() {
            let locks = limb.locks;
            let offset = limb.offset;
            // Positions live in the parent's frame, so any parent change moves them.
            let position = (locks.pos && (dirty.pos || parent_dirty.any()))
                .then(|| self.get_world_pt(id, offset.pos));
            let rotation = (locks.rot && dirty.rot).then(|| self.get_world_ang(id, offset.rot));
            let scale =
                (locks.scale && dirty.scale).then(|| self.get_world_zoom(id, offset.scale));

            if let Some(drawable) = self[id].live_drawable_mut() {
                if let Some(position) = position {
                    drawable.set_position(position);
                }
                if let Some(rotation) = rotation {
                    drawable.set_rotation(rotation);
                }
                if let Some(scale) = scale {
                    drawable.set_scale(scale);
                }
            }
        }

        let limb = &mut self[id];
        limb.dirty = dirty;
        limb.history = limb.live_drawable().map(|d| d.transform());
        limb.offset_history = Some(limb.offset);

        for i in 0..self[id].children.len() {
            let child = self[id].children[i];
            self.resolve(child, dirty);
        }
    }

    fn paint(&mut self, id: LimbId) {
        if self[id].disabled {
            return;
        }
        for i in 0..self[id].children.len() {
            let child = self[id].children[i];
            if !self[child].overlap {
                self.paint(child);
            }
        }
        if let Some(drawable) = self[id].live_drawable_mut() {
            drawable.update();
            drawable.on_post_update();
        }
        for i in 0..self[id].children.len() {
            let child = self[id].children[i];
            if self[child].overlap {
                self.paint(child);
            }
        }
    }

    /// Visits the direct children of `id`.
    pub fn each<F: FnMut(LimbId, &Limb)>(&self, id: LimbId, mut f: F) {
        for &child in &self[id].children {
            f(child, &self[child]);
        }
    }

    pub fn each_mut<F: FnMut(LimbId, &mut Limb)>(&mut self, id: LimbId, mut f: F) {
        for i in 0..self[id].children.len() {
            let child = self[id].children[i];
            f(child, &mut self[child]);
        }
    }

    /// Visits `id` and then every descendant, preorder.
    pub fn all<F: FnMut(LimbId, &Limb)>(&self, id: LimbId, mut f: F) {
        for limb in self.list(id) {
            f(limb, &self[limb]);
        }
    }

    pub fn all_mut<F: FnMut(LimbId, &mut Limb)>(&mut self, id: LimbId, mut f: F) {
        for limb in self.list(id) {
            f(limb, &mut self[limb]);
        }
    }

    /// `id` followed by all of its descendants, preorder.
    pub fn list(&self, id: LimbId) -> Vec<LimbId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(limb) = stack.pop() {
            out.push(limb);
            stack.extend(self[limb].children.iter().rev().copied());
        }
        out
    }

    fn detached_copy(&self, id: LimbId) -> Limb {
        let source = &self[id];
        let mut limb = Limb::new(
            source.drawable.as_ref().map(|d| d.copy_frozen()),
            source.offset,
            source.disabled,
        );
        limb.default_offset = source.default_offset;
        limb.locks = source.locks;
        limb.overlap = source.overlap;
        limb
    }

    /// Copies `id` with a frozen drawable, its offsets and flags, but no parent or children.
    pub fn copy(&mut self, id: LimbId) -> LimbId {
        let limb = self.detached_copy(id);
        self.push(limb)
    }

    /// Copies the whole subtree at `id`. The copy is a new root.
    pub fn deep_copy(&mut self, id: LimbId) -> LimbId {
        let order = self.list(id);
        let mut map = HashMap::with_capacity(order.len());
        for &old in &order {
            let new = self.copy(old);
            map.insert(old, new);
        }
        for &old in &order {
            for i in 0..self[old].children.len() {
                let child = self[old].children[i];
                self.link(map[&old], map[&child]);
            }
        }
        map[&id]
    }

    /// Copies the subtree at `id` into `dest` and returns the old → new id map.
    pub fn deep_copy_into(&self, id: LimbId, dest: &mut LimbTree) -> HashMap<LimbId, LimbId> {
        let order = self.list(id);
        let mut map = HashMap::with_capacity(order.len());
        for &old in &order {
            let new = dest.push(self.detached_copy(old));
            map.insert(old, new);
        }
        for &old in &order {
            for child in &self[old].children {
                dest.link(map[&old], map[child]);
            }
        }
        map
    }
}
