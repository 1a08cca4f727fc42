//! Gesture interpreter: turns per-frame hand samples into discrete
//! intents.
//!
//! Runs independently of the scene state machine; it only knows about
//! hands and time. Frames arrive at camera rate with 0, 1 or 2 tracked
//! hands (palm position in normalized -1..1 device coordinates plus a
//! fist flag). Intents come out debounced and cooldown-limited so a
//! single physical motion never fires twice.

use glam::{Vec2, Vec3};

use crate::domain::config::SimConfig;

/// One tracked hand in a camera frame.
#[derive(Clone, Copy, Debug)]
pub struct HandSample {
    /// Palm center, normalized device coordinates (-1..1, y up).
    pub palm: Vec2,
    /// True when the hand is closed into a fist.
    pub fist: bool,
}

/// Discrete intent recognized from the hand stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureIntent {
    /// Fast motion in any hand state: blow the model up.
    Smash,
    /// Directional open-hand flick; carries a scene-space direction.
    Swipe(Vec3),
    /// Both hands held up: rebuild the current model.
    Rebuild,
}

/// Cardinal screen directions mapped into scene space: horizontal
/// swipes push along ±x, vertical ones along ∓z (an upward flick
/// pushes away from the camera).
fn cardinal(delta: Vec2) -> Vec3 {
    if delta.x.abs() >= delta.y.abs() {
        Vec3::new(delta.x.signum(), 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, -delta.y.signum())
    }
}

pub struct GestureInterpreter {
    /// Primary-hand palm from the previous frame, if it had one hand.
    prev_palm: Option<Vec2>,
    /// When both hands first became (and stayed) visible.
    two_hands_since_ms: Option<f64>,
    last_smash_ms: f64,
    last_swipe_ms: f64,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self {
            prev_palm: None,
            two_hands_since_ms: None,
            // Far enough in the past that the first gesture is never
            // swallowed by a cooldown.
            last_smash_ms: f64::MIN,
            last_swipe_ms: f64::MIN,
        }
    }

    /// Consume one camera frame; returns the intents it produced.
    ///
    /// Two visible hands preempt all single-hand processing for the
    /// frame. A rebuild fires only after the hold window has elapsed
    /// with both hands continuously present, then re-arms from zero.
    pub fn frame(
        &mut self,
        hands: &[HandSample],
        now_ms: f64,
        cfg: &SimConfig,
    ) -> Vec<GestureIntent> {
        let mut intents = Vec::new();

        if hands.len() >= 2 {
            self.prev_palm = None;
            let since = *self.two_hands_since_ms.get_or_insert(now_ms);
            if now_ms - since >= cfg.hold_window_ms {
                intents.push(GestureIntent::Rebuild);
                // Re-arm: a fresh hold period is required to fire again.
                self.two_hands_since_ms = Some(now_ms);
            }
            return intents;
        }
        self.two_hands_since_ms = None;

        let Some(hand) = hands.first() else {
            self.prev_palm = None;
            return intents;
        };

        if let Some(prev) = self.prev_palm {
            let delta = hand.palm - prev;
            let speed = delta.length();

            if speed > cfg.smash_speed && now_ms - self.last_smash_ms >= cfg.smash_cooldown_ms {
                intents.push(GestureIntent::Smash);
                self.last_smash_ms = now_ms;
            }

            let dominant = delta.x.abs().max(delta.y.abs());
            if !hand.fist
                && dominant > cfg.swipe_threshold
                && now_ms - self.last_swipe_ms >= cfg.swipe_cooldown_ms
            {
                intents.push(GestureIntent::Swipe(cardinal(delta)));
                self.last_swipe_ms = now_ms;
            }
        }
        self.prev_palm = Some(hand.palm);

        intents
    }
}

/// Fist classification over 2D hand landmarks.
///
/// A hand is a fist when all four non-thumb fingertips sit closer to
/// the wrist than both their middle joint and their base knuckle,
/// i.e. every finger is curled past both reference joints. Exposed so
/// the JS tracking layer shares the engine's definition.
pub fn is_fist(wrist: Vec2, fingers: &[[Vec2; 3]; 4]) -> bool {
    fingers.iter().all(|[tip, middle, base]| {
        let tip_d = tip.distance_squared(wrist);
        tip_d < middle.distance_squared(wrist) && tip_d < base.distance_squared(wrist)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f64 = 33.0;

    fn open(x: f32, y: f32) -> HandSample {
        HandSample {
            palm: Vec2::new(x, y),
            fist: false,
        }
    }

    fn fist(x: f32, y: f32) -> HandSample {
        HandSample {
            palm: Vec2::new(x, y),
            fist: true,
        }
    }

    fn run(
        interp: &mut GestureInterpreter,
        frames: &[Vec<HandSample>],
        cfg: &SimConfig,
    ) -> Vec<GestureIntent> {
        let mut all = Vec::new();
        for (i, hands) in frames.iter().enumerate() {
            all.extend(interp.frame(hands, i as f64 * FRAME_MS, cfg));
        }
        all
    }

    #[test]
    fn sustained_two_hands_fire_exactly_one_rebuild() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        // 25 frames ≈ 825 ms, beyond the 600 ms hold window but short
        // of a second full hold period.
        let frames = vec![vec![open(-0.3, 0.0), open(0.3, 0.0)]; 25];
        let intents = run(&mut interp, &frames, &cfg);
        assert_eq!(intents, vec![GestureIntent::Rebuild]);
    }

    #[test]
    fn rebuild_rearms_after_a_fresh_hold() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        // Two full hold windows plus slack: exactly two rebuilds.
        let frames = vec![vec![open(-0.3, 0.0), open(0.3, 0.0)]; 45];
        let intents = run(&mut interp, &frames, &cfg);
        assert_eq!(intents.len(), 2);
    }

    #[test]
    fn dropping_a_hand_resets_the_hold() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        let two = vec![open(-0.3, 0.0), open(0.3, 0.0)];
        let one = vec![open(0.0, 0.0)];
        // Two stretches of ~495 ms with a one-hand frame between them:
        // each is under the 600 ms window on its own, so the gap must
        // prevent any firing.
        let mut frames = vec![two.clone(); 15];
        frames.push(one);
        frames.extend(vec![two; 15]);
        let intents = run(&mut interp, &frames, &cfg);
        assert!(intents.is_empty());
    }

    #[test]
    fn fast_motion_smashes_once_per_cooldown() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        // Zig-zag fast enough to exceed the smash speed every frame.
        let frames: Vec<Vec<HandSample>> = (0..20)
            .map(|i| vec![fist(if i % 2 == 0 { -0.1 } else { 0.1 }, 0.0)])
            .collect();
        let intents = run(&mut interp, &frames, &cfg);
        // 20 frames ≈ 660 ms < 1200 ms cooldown: exactly one smash,
        // and no swipes because the hand is a fist.
        assert_eq!(intents, vec![GestureIntent::Smash]);
    }

    #[test]
    fn open_hand_flick_swipes_with_cardinal_direction() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        let frames = vec![vec![open(-0.4, 0.0)], vec![open(0.4, 0.05)]];
        let intents = run(&mut interp, &frames, &cfg);
        assert!(intents.contains(&GestureIntent::Swipe(Vec3::new(1.0, 0.0, 0.0))));
    }

    #[test]
    fn vertical_flick_maps_to_depth_axis() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        let frames = vec![vec![open(0.0, -0.4)], vec![open(0.05, 0.4)]];
        let intents = run(&mut interp, &frames, &cfg);
        assert!(intents.contains(&GestureIntent::Swipe(Vec3::new(0.0, 0.0, -1.0))));
    }

    #[test]
    fn fist_flick_does_not_swipe() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        let frames = vec![vec![fist(-0.4, 0.0)], vec![fist(0.4, 0.0)]];
        let intents = run(&mut interp, &frames, &cfg);
        assert!(!intents
            .iter()
            .any(|i| matches!(i, GestureIntent::Swipe(_))));
        // The same motion still reads as a smash.
        assert!(intents.contains(&GestureIntent::Smash));
    }

    #[test]
    fn slow_drift_produces_nothing() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        let frames: Vec<Vec<HandSample>> = (0..30)
            .map(|i| vec![open(i as f32 * 0.01, 0.0)])
            .collect();
        assert!(run(&mut interp, &frames, &cfg).is_empty());
    }

    #[test]
    fn two_hands_preempt_single_hand_motion() {
        let cfg = SimConfig::default();
        let mut interp = GestureInterpreter::new();
        // Large apparent displacement between frames, but both frames
        // show two hands: no smash, no swipe.
        let frames = vec![
            vec![open(-0.4, 0.0), open(0.3, 0.0)],
            vec![open(0.4, 0.0), open(-0.3, 0.0)],
        ];
        let intents = run(&mut interp, &frames, &cfg);
        assert!(intents.is_empty());
    }

    #[test]
    fn curled_fingers_classify_as_fist() {
        let wrist = Vec2::new(0.0, 0.0);
        // Curled: tips pulled back near the wrist.
        let curled: [[Vec2; 3]; 4] = std::array::from_fn(|i| {
            let x = 0.1 + i as f32 * 0.05;
            [
                Vec2::new(x, 0.2),  // tip, close in
                Vec2::new(x, 0.5),  // middle joint
                Vec2::new(x, 0.35), // base knuckle
            ]
        });
        assert!(is_fist(wrist, &curled));

        // Extended: tips furthest out.
        let extended: [[Vec2; 3]; 4] = std::array::from_fn(|i| {
            let x = 0.1 + i as f32 * 0.05;
            [Vec2::new(x, 0.9), Vec2::new(x, 0.6), Vec2::new(x, 0.35)]
        });
        assert!(!is_fist(wrist, &extended));

        // One straight finger breaks the fist.
        let mut partial = curled;
        partial[2] = [Vec2::new(0.2, 0.9), Vec2::new(0.2, 0.6), Vec2::new(0.2, 0.35)];
        assert!(!is_fist(wrist, &partial));
    }
}
