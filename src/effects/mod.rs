//! # Effects Layer
//!
//! Purely cosmetic. Nothing in here touches application state, and nothing
//! the exchange flow does ever waits on it.
//!
//! Every timer is a [`ScheduledTask`] owned by a single [`Effects`] value:
//!
//! ```text
//! Effects
//! ├── tasks: Vec<ScheduledTask>     // repeating (gradient, ambient hearts)
//! │                                 // and one-shot (staggered burst spawns)
//! ├── particles: Vec<Particle>      // what the overlay draws right now
//! ├── entering: Vec<(index, since)> // slide-in for freshly rendered messages
//! └── hue: f32                      // gradient phase
//! ```
//!
//! `start()` arms the repeating tasks, `stop()` cancels everything, and
//! `tick(now)` runs whatever is due. Time is always passed in, so tests
//! drive the layer with synthetic instants and a seeded RNG.

pub mod gradient;
pub mod particles;

use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core::conversation::RenderEvent;
use gradient::Gradient;
use particles::{
    AMBIENT_HEARTS, CELEBRATION, Particle, ParticleKind, REPLY_HEARTS, Region, SPARKLES,
};

const GRADIENT_INTERVAL: Duration = Duration::from_millis(100);
const AMBIENT_INTERVAL: Duration = Duration::from_secs(3);
/// Chance that an ambient tick actually spawns a heart.
const AMBIENT_CHANCE: f64 = 0.3;
const AMBIENT_LIFETIME: Duration = Duration::from_secs(8);

const REPLY_HEART_COUNT: u32 = 3;
const REPLY_HEART_STAGGER: Duration = Duration::from_millis(200);
const REPLY_HEART_LIFETIME: Duration = Duration::from_secs(6);

const SPARKLE_COUNT: u32 = 3;
const SPARKLE_STAGGER: Duration = Duration::from_millis(100);
const SPARKLE_LIFETIME: Duration = Duration::from_secs(1);

const CELEBRATION_COUNT: u32 = 20;
const CELEBRATION_STAGGER: Duration = Duration::from_millis(100);
const CELEBRATION_LIFETIME: Duration = Duration::from_secs(3);

/// How long a new message is drawn as "sliding in".
pub const SLIDE_IN: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq)]
enum Job {
    AdvanceGradient,
    MaybeAmbientHeart,
    Spawn(ParticleKind, Region),
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    id: TaskId,
    due: Instant,
    /// `None` for one-shot tasks.
    every: Option<Duration>,
    job: Job,
}

pub struct Effects {
    enabled: bool,
    running: bool,
    rng: StdRng,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
    particles: Vec<Particle>,
    entering: Vec<(usize, Instant)>,
    hue: f32,
}

impl Effects {
    pub fn new(enabled: bool) -> Self {
        Self::with_rng(enabled, StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn seeded(enabled: bool, seed: u64) -> Self {
        Self::with_rng(enabled, StdRng::seed_from_u64(seed))
    }

    fn with_rng(enabled: bool, rng: StdRng) -> Self {
        Self {
            enabled,
            running: false,
            rng,
            next_id: 0,
            tasks: Vec::new(),
            particles: Vec::new(),
            entering: Vec::new(),
            hue: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arms the background gradient and ambient hearts. No-op when disabled
    /// or already running.
    pub fn start(&mut self, now: Instant) {
        if !self.enabled || self.running {
            return;
        }
        self.running = true;
        self.schedule(now + GRADIENT_INTERVAL, Some(GRADIENT_INTERVAL), Job::AdvanceGradient);
        self.schedule(now + AMBIENT_INTERVAL, Some(AMBIENT_INTERVAL), Job::MaybeAmbientHeart);
        debug!("Effects started");
    }

    /// Cancels every task and clears everything on screen.
    pub fn stop(&mut self) {
        self.running = false;
        self.tasks.clear();
        self.particles.clear();
        self.entering.clear();
        debug!("Effects stopped");
    }

    /// Cancels a single task. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn gradient(&self) -> Gradient {
        gradient::gradient_at(self.hue)
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Runs every due task, then drops expired particles and slide-ins.
    pub fn tick(&mut self, now: Instant) {
        if !self.running {
            return;
        }

        let mut due_jobs = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].due > now {
                i += 1;
                continue;
            }
            due_jobs.push(self.tasks[i].job.clone());
            match self.tasks[i].every {
                Some(every) => {
                    // Run at most once per tick; a long stall doesn't replay missed runs.
                    let task = &mut self.tasks[i];
                    task.due += every;
                    if task.due <= now {
                        task.due = now + every;
                    }
                    i += 1;
                }
                None => {
                    self.tasks.swap_remove(i);
                }
            }
        }

        for job in due_jobs {
            self.run(job, now);
        }

        self.particles.retain(|p| !p.is_expired(now));
        self.entering
            .retain(|(_, since)| now.saturating_duration_since(*since) < SLIDE_IN);
    }

    /// Consumes a render event from the conversation.
    pub fn on_render_event(&mut self, event: RenderEvent, now: Instant) {
        if !self.running {
            return;
        }
        let RenderEvent::MessageAppended { index, .. } = event;
        self.entering.push((index, now));
    }

    /// Slide-in progress for a message (0.0 just appended, 1.0 settled),
    /// or `None` if it isn't animating.
    pub fn slide_in(&self, index: usize, now: Instant) -> Option<f32> {
        self.entering
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, since)| {
                (now.saturating_duration_since(*since).as_secs_f32() / SLIDE_IN.as_secs_f32())
                    .min(1.0)
            })
    }

    /// A few hearts after a reply lands.
    pub fn reply_hearts(&mut self, now: Instant) {
        self.burst(now, ParticleKind::ReplyHeart, REPLY_HEART_COUNT, REPLY_HEART_STAGGER, Region::FULL);
    }

    /// Sparkles over a control the pointer just entered.
    pub fn sparkles(&mut self, now: Instant, region: Region) {
        self.burst(now, ParticleKind::Sparkle, SPARKLE_COUNT, SPARKLE_STAGGER, region);
    }

    pub fn celebrate(&mut self, now: Instant) {
        self.burst(now, ParticleKind::Celebration, CELEBRATION_COUNT, CELEBRATION_STAGGER, Region::FULL);
    }

    /// Schedules `count` one-shot spawns, the first one immediately.
    fn burst(&mut self, now: Instant, kind: ParticleKind, count: u32, stagger: Duration, region: Region) {
        if !self.running {
            return;
        }
        for i in 0..count {
            self.schedule(now + stagger * i, None, Job::Spawn(kind, region));
        }
    }

    fn schedule(&mut self, due: Instant, every: Option<Duration>, job: Job) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask { id, due, every, job });
        id
    }

    fn run(&mut self, job: Job, now: Instant) {
        match job {
            Job::AdvanceGradient => self.hue = gradient::advance(self.hue),
            Job::MaybeAmbientHeart => {
                if self.rng.gen_bool(AMBIENT_CHANCE) {
                    let particle = self.ambient_heart(now);
                    self.particles.push(particle);
                }
            }
            Job::Spawn(kind, region) => {
                let particle = self.spawn(kind, region, now);
                self.particles.push(particle);
            }
        }
    }

    fn ambient_heart(&mut self, now: Instant) -> Particle {
        Particle {
            kind: ParticleKind::AmbientHeart,
            glyph: pick(&mut self.rng, AMBIENT_HEARTS),
            x: self.rng.gen_range(0.0..1.0),
            y: 1.0,
            born: now,
            lifetime: AMBIENT_LIFETIME,
            travel: Duration::from_secs_f32(self.rng.gen_range(4.0..7.0)),
            faint: self.rng.gen_range(0.2..0.6) < 0.4,
        }
    }

    fn spawn(&mut self, kind: ParticleKind, region: Region, now: Instant) -> Particle {
        let (glyphs, lifetime) = match kind {
            ParticleKind::ReplyHeart => (REPLY_HEARTS, REPLY_HEART_LIFETIME),
            ParticleKind::Sparkle => (SPARKLES, SPARKLE_LIFETIME),
            ParticleKind::Celebration => (CELEBRATION, CELEBRATION_LIFETIME),
            ParticleKind::AmbientHeart => (AMBIENT_HEARTS, AMBIENT_LIFETIME),
        };
        let x = region.x + self.rng.gen_range(0.0..1.0) * region.width;
        let y = match kind {
            ParticleKind::Sparkle => region.y + self.rng.gen_range(0.0..1.0) * region.height,
            ParticleKind::Celebration => 0.0,
            ParticleKind::ReplyHeart | ParticleKind::AmbientHeart => 1.0,
        };
        Particle {
            kind,
            glyph: pick(&mut self.rng, glyphs),
            x,
            y,
            born: now,
            lifetime,
            travel: lifetime,
            faint: false,
        }
    }
}

fn pick(rng: &mut StdRng, glyphs: &'static [&'static str]) -> &'static str {
    glyphs.choose(rng).copied().unwrap_or("💖")
}
