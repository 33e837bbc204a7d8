//! Plays a two-frame "wave" on a small rig and prints every limb's world pose per tick.
//!
//! Usage: `cargo run -p limbs2d --example pose_dump -- [step_ms] [ticks]`
//! Set `RUST_LOG=debug` to see action lifecycle logging.

use std::rc::Rc;

use limbs2d::{
    Clock, Drawable, Easing, Frame, FrozenDrawable, LimbAttribute, ManualClock, Offset, Skeleton,
    SkeletonAction, SkeletonConfig, SkeletonEvent, SkeletonListener,
};

struct PrintEvents;

impl SkeletonListener for PrintEvents {
    fn on_event(&mut self, _skeleton: &mut Skeleton, event: &SkeletonEvent) {
        match event {
            SkeletonEvent::ActionComplete { name } => println!("event: '{name}' complete"),
        }
    }
}

fn sprite(pos: [f32; 2]) -> Box<dyn Drawable> {
    Box::new(FrozenDrawable::new(Offset::new(pos, 0.0, [1.0, 1.0])))
}

fn main() -> Result<(), limbs2d::Error> {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let step_ms: f64 = args.first().and_then(|s| s.parse().ok()).unwrap_or(125.0);
    let ticks: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);

    let clock = Rc::new(ManualClock::new(0.0));
    let mut skeleton = Skeleton::new(
        sprite([200.0, 200.0]),
        SkeletonConfig::with_clock(clock.clone()),
    );
    let body = skeleton.body();

    let limbs = skeleton.limbs_mut();
    let upper = limbs.create(sprite([0.0, 0.0]));
    let lower = limbs.create(sprite([0.0, 0.0]));
    let hand = limbs.create(sprite([0.0, 0.0]));
    limbs.attach(body, &[upper]);
    limbs.attach(upper, &[lower]);
    limbs.attach(lower, &[hand]);
    limbs[upper].offset.pos = [30.0, 0.0];
    limbs[lower].offset.pos = [40.0, 0.0];
    limbs[hand].offset.pos = [25.0, 0.0];
    for id in [upper, lower, hand] {
        limbs[id].locks.pos = true;
        limbs[id].locks.rot = true;
    }
    limbs[hand].overlap = true;

    skeleton.add_part("upper", upper);
    skeleton.add_part("lower", lower);
    skeleton.add_part("hand", hand);

    let frames = vec![
        Frame::tween_to(
            skeleton.part("upper")?,
            LimbAttribute::OffsetRotation,
            0.0,
            600.0,
            &[0.0],
            &[-60.0],
            Easing::QuadraticInOut,
        )?,
        Frame::tween_to(
            skeleton.part("lower")?,
            LimbAttribute::OffsetRotation,
            300.0,
            1000.0,
            &[0.0],
            &[45.0],
            Easing::CubicOut,
        )?,
    ];
    skeleton.add_action(SkeletonAction::from_frames("wave", frames));
    skeleton.set_listener(PrintEvents);
    skeleton.act("wave")?;

    for tick in 0..=ticks {
        clock.set(step_ms * tick as f64);
        skeleton.update();

        println!("t={:>7.1}ms", clock.now_ms());
        for name in ["upper", "lower", "hand"] {
            let id = skeleton.part(name)?;
            let pose = skeleton.limbs().frame(id);
            println!(
                "  {name:<6} pos=({:>8.3}, {:>8.3}) rot={:>8.3}",
                pose.pos[0], pose.pos[1], pose.rot
            );
        }
    }
    Ok(())
}
