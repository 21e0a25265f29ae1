//! Built-in demo timeline for headless preview

use reel_animation::flow::{wait_for, wait_until};
use reel_animation::threading::{join, spawn, threadable};
use reel_animation::{
    AnimationPreset, Animator, Easing, SpringConfig, SpringTweenProvider, Thread, Value,
};
use reel_core::{Property, SharedProperty, TimeEvents};
use std::rc::Rc;

/// Name of the time event the color change waits for
pub const ACCENT_EVENT: &str = "accent";

/// Properties animated by the demo timeline
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub x: SharedProperty<f64>,
    pub opacity: SharedProperty<f64>,
    pub fill: SharedProperty<Value>,
    pub label: SharedProperty<Value>,
    pub events: Rc<TimeEvents>,
}

impl DemoScene {
    pub fn new(fps: f64) -> Self {
        let events = Rc::new(TimeEvents::new());
        events.load([(ACCENT_EVENT, (1.5 * fps).ceil() as u64)]);
        Self {
            x: SharedProperty::new(0.0),
            opacity: SharedProperty::new(0.0),
            fill: SharedProperty::new(Value::from("#202020")),
            label: SharedProperty::new(Value::from("")),
            events,
        }
    }

    /// Fade in, slide, recolor and type a label in parallel, then spring back
    pub fn timeline(&self, spring: SpringConfig) -> Thread {
        let scene = self.clone();
        threadable("demo", async move {
            let fade = spawn(AnimationPreset::fade_in(scene.opacity.clone(), 0.5).run(1)).await;
            let slide = spawn(
                Animator::new(scene.x.clone())
                    .key(200.0, 1.0, Easing::EaseInOutCubic)
                    .wait_for(0.25)
                    .diff(50.0, 0.5, Easing::EaseOutBack(reel_animation::easing::BACK_OVERSHOOT))
                    .run(1),
            )
            .await;
            let recolor = spawn(
                Animator::new(scene.fill.clone())
                    .wait_until(ACCENT_EVENT)
                    .key("#ff3366", 0.5, Easing::Linear)
                    .back(0.5, Easing::EaseOutCubic)
                    .run(1),
            )
            .await;
            let typing = spawn(
                Animator::new(scene.label.clone())
                    .key("Hello, reel!", 1.0, Easing::Linear)
                    .run(1),
            )
            .await;
            join(true, [fade, slide, recolor, typing]).await;

            wait_for(0.25).await;
            Animator::new(scene.x.clone())
                .with_tween_provider(SpringTweenProvider::new(spring))
                .key(0.0, 0.0, Easing::Linear)
                .run(1)
                .await;
            wait_until(3.5).await;
        })
    }

    /// One-line summary of every property
    pub fn sample(&self) -> String {
        format!(
            "x={:>8.3} opacity={:.3} fill={} label={:?}",
            self.x.get(),
            self.opacity.get(),
            self.fill.get(),
            self.label.get().to_string()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_animation::threading::Scheduler;
    use reel_core::PlaybackClock;

    #[test]
    fn test_demo_runs_to_completion() {
        let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
        let scene = DemoScene::new(30.0);
        let mut scheduler = Scheduler::new(clock.clone()).with_events(scene.events.clone());
        scheduler.spawn(scene.timeline(SpringConfig::smooth()));

        let frames = scheduler
            .run_until_idle(|| {
                clock.advance();
            })
            .unwrap();

        assert!(frames >= 105);
        assert_eq!(scene.x.get(), 0.0);
        assert_eq!(scene.opacity.get(), 1.0);
        assert_eq!(scene.fill.get(), Value::from("#202020"));
        assert_eq!(scene.label.get(), Value::from("Hello, reel!"));
        assert!(scene.sample().contains("opacity=1.000"));
    }
}
