use crate::test_support::{assert_approx, assert_point, sprite};
use crate::{Axis, AxisFlags, Error, FrozenDrawable, LimbTree, Offset};

fn parent_and_child(pos: [f32; 2], rot: f32, scale: [f32; 2]) -> (LimbTree, crate::LimbId) {
    let mut tree = LimbTree::new();
    let parent = tree.create(sprite(pos, rot, scale));
    let child = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    assert!(tree.attach(parent, &[child]));
    (tree, child)
}

#[test]
fn conversions_are_identity_without_parent() {
    let mut tree = LimbTree::new();
    let root = tree.create(sprite([3.0, 4.0], 25.0, [2.0, 3.0]));

    assert_eq!(tree.get_body_pt(root, [7.0, -2.0]).unwrap(), [7.0, -2.0]);
    assert_eq!(tree.get_world_pt(root, [7.0, -2.0]), [7.0, -2.0]);
    assert_eq!(tree.get_body_ang(root, 33.0), 33.0);
    assert_eq!(tree.get_world_ang(root, 33.0), 33.0);
    assert_eq!(tree.get_body_zoom(root, [0.5, 4.0]).unwrap(), [0.5, 4.0]);
    assert_eq!(tree.get_world_zoom(root, [0.5, 4.0]), [0.5, 4.0]);
}

#[test]
fn world_pt_applies_parent_scale_rotation_and_translation() {
    let (tree, child) = parent_and_child([10.0, 20.0], 90.0, [2.0, 2.0]);
    assert_point(tree.get_world_pt(child, [5.0, 0.0]), [10.0, 30.0]);
    assert_point(tree.get_body_pt(child, [10.0, 30.0]).unwrap(), [5.0, 0.0]);
}

#[test]
fn point_conversion_round_trips() {
    let (mut tree, child) = parent_and_child([10.0, 20.0], 30.0, [2.0, 0.5]);
    let points = [[3.0, -7.0], [0.0, 0.0], [-120.5, 44.25]];
    for p in points {
        let body = tree.get_body_pt(child, p).unwrap();
        assert_point(tree.get_world_pt(child, body), p);
    }

    let parent = tree.parent(child).unwrap();
    tree[parent].drawable_mut().unwrap().set_origin([4.0, 1.0]);
    for p in points {
        let body = tree.get_body_pt(child, p).unwrap();
        assert_point(tree.get_world_pt(child, body), p);
    }
}

#[test]
fn origin_shifts_the_parent_frame() {
    let (mut tree, child) = parent_and_child([0.0, 0.0], 0.0, [1.0, 1.0]);
    let parent = tree.parent(child).unwrap();
    tree[parent].drawable_mut().unwrap().set_origin([4.0, 1.0]);
    assert_point(tree.get_world_pt(child, [4.0, 1.0]), [0.0, 0.0]);
    assert_point(tree.get_world_pt(child, [5.0, 1.0]), [1.0, 0.0]);
}

#[test]
fn angle_and_zoom_conversions_round_trip() {
    let (tree, child) = parent_and_child([0.0, 0.0], 30.0, [2.0, 0.5]);
    assert_eq!(tree.get_body_ang(child, tree.get_world_ang(child, 12.5)), 12.5);
    assert_eq!(tree.get_world_ang(child, 12.5), 42.5);

    let zoom = tree.get_world_zoom(child, [3.0, 4.0]);
    assert_eq!(zoom, [6.0, 2.0]);
    assert_eq!(tree.get_body_zoom(child, zoom).unwrap(), [3.0, 4.0]);
}

#[test]
fn zero_parent_scale_fails_body_conversions() {
    let (tree, child) = parent_and_child([0.0, 0.0], 0.0, [0.0, 1.0]);
    assert!(matches!(
        tree.get_body_pt(child, [1.0, 1.0]),
        Err(Error::DivisionByZero { axis: Axis::Pos })
    ));
    assert!(matches!(
        tree.get_body_zoom(child, [1.0, 1.0]),
        Err(Error::DivisionByZero { axis: Axis::Scale })
    ));
    // The forward direction stays total.
    assert_point(tree.get_world_pt(child, [1.0, 1.0]), [0.0, 1.0]);
}

#[test]
fn lock_captures_current_placement() {
    let mut tree = LimbTree::new();
    let parent = tree.create(sprite([100.0, 0.0], 90.0, [1.0, 1.0]));
    let child = tree.create(sprite([100.0, 50.0], 120.0, [2.0, 2.0]));
    tree.attach(parent, &[child]);

    tree.lock(child, Axis::Pos, true).unwrap();
    let expected = tree.get_body_pt(child, [100.0, 50.0]).unwrap();
    assert_eq!(tree[child].offset.pos, expected);
    assert_point(expected, [50.0, 0.0]);
    assert!(tree[child].locks.pos);
    assert!(!tree[child].locks.rot);

    tree.lock(child, Axis::All, false).unwrap();
    assert_approx(tree[child].offset.rot, 30.0);
    assert_eq!(tree[child].offset.scale, [2.0, 2.0]);
    assert_eq!(tree[child].locks, AxisFlags::ALL);

    tree.update(parent);
    let drawable = tree[child].drawable().unwrap();
    assert_point(drawable.position(), [100.0, 50.0]);
    assert_approx(drawable.rotation(), 120.0);
}

#[test]
fn lock_keeps_offset_of_already_locked_channel_unless_forced() {
    let (mut tree, child) = parent_and_child([0.0, 0.0], 0.0, [1.0, 1.0]);
    tree[child].locks.pos = true;
    tree[child].offset.pos = [50.0, 0.0];

    tree.lock(child, Axis::Pos, false).unwrap();
    assert_eq!(tree[child].offset.pos, [50.0, 0.0]);

    tree.lock(child, Axis::Pos, true).unwrap();
    assert_eq!(tree[child].offset.pos, [0.0, 0.0]);

    tree.unlock(child, Axis::Pos);
    assert!(!tree[child].locks.pos);
}

#[test]
fn lock_propagates_division_by_zero() {
    let (mut tree, child) = parent_and_child([0.0, 0.0], 0.0, [1.0, 0.0]);
    assert!(tree.lock(child, Axis::Scale, false).is_err());
    assert!(!tree[child].locks.scale);
}

#[test]
fn attach_reparents_and_rejects_cycles() {
    let mut tree = LimbTree::new();
    let a = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let b = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let c = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));

    assert!(tree.attach(a, &[c]));
    assert!(tree.attach(b, &[c]));
    assert!(tree.children(a).is_empty());
    assert_eq!(tree.children(b), &[c]);
    assert_eq!(tree.parent(c), Some(b));

    assert!(tree.attach(a, &[b]));
    assert!(!tree.attach(c, &[a]));
    assert!(!tree.attach(a, &[a]));
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.root_of(c), a);
}

#[test]
fn detach_root_is_rejected() {
    let mut tree = LimbTree::new();
    let a = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let b = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    tree.attach(a, &[b]);

    assert!(!tree.detach(a));
    assert!(tree.detach(b));
    assert!(tree.children(a).is_empty());
    assert_eq!(tree.parent(b), None);
}

#[test]
fn replace_swaps_position_and_moves_children() {
    let mut tree = LimbTree::new();
    let root = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let a = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let b = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let x = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let n = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    tree.attach(root, &[a, b]);
    tree.attach(a, &[x]);

    assert!(!tree.replace(root, a));
    assert!(tree.replace(a, n));
    assert_eq!(tree.children(root), &[n, b]);
    assert_eq!(tree.children(n), &[x]);
    assert_eq!(tree.parent(x), Some(n));
    assert_eq!(tree.parent(n), Some(root));
    assert_eq!(tree.parent(a), None);
    assert!(tree.children(a).is_empty());
    assert!(tree[a].disabled);
    assert!(!tree[n].disabled);
}

#[test]
fn remove_detaches_and_disables() {
    let mut tree = LimbTree::new();
    let root = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let a = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    tree.attach(root, &[a]);

    tree.remove(a);
    assert!(tree.children(root).is_empty());
    assert!(tree[a].disabled);

    tree.remove(root);
    assert!(tree[root].disabled);
}

#[test]
fn traversal_is_preorder() {
    let mut tree = LimbTree::new();
    let root = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let a = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let b = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let x = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    tree.attach(root, &[a, b]);
    tree.attach(a, &[x]);

    assert_eq!(tree.list(root), vec![root, a, x, b]);

    let mut direct = Vec::new();
    tree.each(root, |id, _| direct.push(id));
    assert_eq!(direct, vec![a, b]);

    let mut visited = Vec::new();
    tree.all(root, |id, _| visited.push(id));
    assert_eq!(visited, vec![root, a, x, b]);

    tree.all_mut(a, |_, limb| limb.overlap = true);
    assert!(tree[a].overlap && tree[x].overlap);
    assert!(!tree[b].overlap);
}

#[test]
fn copy_is_detached_and_frozen() {
    let mut tree = LimbTree::new();
    let root = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let a = tree.create(sprite([5.0, 6.0], 10.0, [1.0, 2.0]));
    let x = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    tree.attach(root, &[a]);
    tree.attach(a, &[x]);
    tree[a].locks.rot = true;
    tree[a].overlap = true;
    tree[a].offset = Offset::at(1.0, 2.0);

    let copy = tree.copy(a);
    assert_ne!(copy, a);
    assert_eq!(tree.parent(copy), None);
    assert!(tree.children(copy).is_empty());
    assert_eq!(tree[copy].offset, Offset::at(1.0, 2.0));
    assert!(tree[copy].locks.rot);
    assert!(tree[copy].overlap);
    let drawable = tree[copy].drawable().unwrap();
    assert_eq!(drawable.position(), [5.0, 6.0]);
    assert_eq!(drawable.rotation(), 10.0);

    tree[copy].drawable_mut().unwrap().set_position([9.0, 9.0]);
    assert_eq!(tree[a].drawable().unwrap().position(), [5.0, 6.0]);
}

#[test]
fn deep_copy_clones_the_subtree() {
    let mut tree = LimbTree::new();
    let root = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let a = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let b = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    let x = tree.create(sprite([0.0, 0.0], 0.0, [1.0, 1.0]));
    tree.attach(root, &[a, b]);
    tree.attach(a, &[x]);

    let copy = tree.deep_copy(root);
    let copied = tree.list(copy);
    assert_eq!(copied.len(), 4);
    assert_eq!(tree.parent(copy), None);
    for id in &copied {
        assert!(!tree.list(root).contains(id));
    }
    let copied_a = tree.children(copy)[0];
    assert_eq!(tree.children(copied_a).len(), 1);
    assert_eq!(tree.list(root), vec![root, a, x, b]);

    let mut other = LimbTree::new();
    let map = tree.deep_copy_into(a, &mut other);
    assert_eq!(map.len(), 2);
    assert_eq!(other.children(map[&a]), &[map[&x]]);
}

#[test]
fn default_offset_snapshot_and_restore() {
    let mut tree = LimbTree::new();
    let limb = tree.create(Box::new(FrozenDrawable::new(Offset::at(3.0, 4.0))));
    assert_eq!(tree[limb].default_offset, Offset::at(3.0, 4.0));

    tree[limb].offset.rot = 45.0;
    tree.restore_default(limb);
    assert_eq!(tree[limb].offset, Offset::at(3.0, 4.0));

    tree[limb].offset.rot = 45.0;
    tree.set_default(limb);
    tree[limb].offset.rot = 0.0;
    tree.restore_default(limb);
    assert_eq!(tree[limb].offset.rot, 45.0);
}

#[test]
fn empty_limb_is_disabled_until_bound() {
    let mut tree = LimbTree::new();
    let empty = tree.create_empty();
    assert!(tree[empty].disabled);
    assert!(tree[empty].drawable().is_none());

    tree.update(empty);

    assert!(tree.set_drawable(empty, sprite([1.0, 1.0], 0.0, [1.0, 1.0])).is_none());
    assert!(!tree[empty].disabled);
    assert!(tree.take_drawable(empty).is_some());
}

#[test]
fn offset_assign_copies_selected_channels() {
    let source = Offset::new([3.0, 4.0], 30.0, [2.0, 2.0]);
    let mut offset = Offset::IDENTITY;
    offset.assign(Axis::Rot, &source);
    assert_eq!(offset, Offset::new([0.0, 0.0], 30.0, [1.0, 1.0]));
    offset.assign(Axis::All, &source);
    assert_eq!(offset, source);
}
