use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use ratatui::layout::Rect;
use term_drag::drag::{DragEngine, DragOptions};
use term_drag::drivers::mouse::PointerEvent;
use term_drag::geometry::Position;
use term_drag::scene::{ElementTree, Scene};

const SCREEN: u8 = 0;
const PANEL: u8 = 1;
const HEADER: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "drag-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays synthetic drags through the drag engine and reports time per move"
)]
struct BenchCli {
    /// Number of press/move/release gestures to replay.
    #[arg(
        short = 'g',
        long = "gestures",
        value_name = "COUNT",
        default_value_t = 1_000
    )]
    gestures: u32,

    /// Pointer moves per gesture.
    #[arg(
        short = 'm',
        long = "moves",
        value_name = "COUNT",
        default_value_t = 200
    )]
    moves: u32,

    /// Confine the panel to the screen so every move goes through clamping.
    #[arg(short = 'b', long = "bounded")]
    bounded: bool,

    /// Seed for the pointer walk. Defaults to the clock.
    #[arg(long = "seed", value_name = "SEED")]
    seed: Option<u64>,
}

struct BenchConfig {
    gestures: u32,
    moves: u32,
    bounded: bool,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=1_000_000).contains(&cli.gestures) {
            return Err("gestures must be between 1 and 1000000".to_string());
        }
        if !(1..=100_000).contains(&cli.moves) {
            return Err("moves must be between 1 and 100000".to_string());
        }
        Ok(Self {
            gestures: cli.gestures,
            moves: cli.moves,
            bounded: cli.bounded,
            seed: cli.seed.unwrap_or_else(seed_from_clock),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let mut scene = Scene::new();
    scene.set_layout(SCREEN, Rect::new(0, 0, 200, 60));
    scene.set_layout(PANEL, Rect::new(80, 25, 40, 10));
    scene.set_layout(HEADER, Rect::new(80, 25, 40, 1));
    scene.set_parent(HEADER, Some(PANEL));

    let mut options = DragOptions::new(Some(HEADER), Some(PANEL));
    if config.bounded {
        options = options.with_bounds(SCREEN);
    }
    let mut engine = DragEngine::new(options);
    if !engine.bind(&mut scene) {
        return Err(io::Error::other("drag engine did not bind to the bench scene"));
    }

    let mut walk = PointerWalk::new(config.seed);
    let mut stats = BenchStats::new();
    for _ in 0..config.gestures {
        let Some(header) = scene.bounding_box(HEADER) else {
            return Err(io::Error::other("bench header left the scene"));
        };
        let mut pointer = Position::new(header.left + 1.0, header.top);
        if !engine.handle_event(&mut scene, &PointerEvent::down(pointer.x, pointer.y)) {
            stats.skipped_gestures += 1;
            continue;
        }
        let started = Instant::now();
        for _ in 0..config.moves {
            pointer = walk.step(pointer);
            engine.handle_event(&mut scene, &PointerEvent::moved(pointer.x, pointer.y));
        }
        stats.record_gesture(config.moves, started.elapsed());
        engine.handle_event(&mut scene, &PointerEvent::up(pointer.x, pointer.y));
    }
    stats.final_position = engine.current_position();
    stats.mark_completed();
    engine.unbind();
    Ok(stats)
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    gestures: u64,
    skipped_gestures: u64,
    moves: u64,
    total_move_time: Duration,
    fastest_gesture: Duration,
    slowest_gesture: Duration,
    final_position: Position,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            gestures: 0,
            skipped_gestures: 0,
            moves: 0,
            total_move_time: Duration::ZERO,
            fastest_gesture: Duration::MAX,
            slowest_gesture: Duration::ZERO,
            final_position: Position::ORIGIN,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_gesture(&mut self, moves: u32, time: Duration) {
        self.gestures = self.gestures.saturating_add(1);
        self.moves = self.moves.saturating_add(u64::from(moves));
        self.total_move_time += time;
        self.fastest_gesture = self.fastest_gesture.min(time);
        self.slowest_gesture = self.slowest_gesture.max(time);
    }

    fn ns_per_move(&self) -> f64 {
        if self.moves == 0 {
            return 0.0;
        }
        self.total_move_time.as_nanos() as f64 / self.moves as f64
    }

    fn gesture_ms(&self, time: Duration) -> f64 {
        if self.gestures == 0 {
            return 0.0;
        }
        time.as_secs_f64() * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let mode = if config.bounded {
            "bounded"
        } else {
            "unbounded"
        };
        let moves_per_second = if elapsed > 0.0 {
            self.moves as f64 / elapsed
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Drag bench finished in {elapsed:.2}s ({mode}, seed {seed}).
            Gestures: {gestures} ({skipped} skipped) | Moves: {moves} (~{mps:.0}/s)
            Per move: {per_move:.0} ns | Gesture best: {best:.3} ms | worst: {worst:.3} ms
            Final offset: ({x}, {y})
            "#,
            elapsed = elapsed,
            mode = mode,
            seed = config.seed,
            gestures = self.gestures,
            skipped = self.skipped_gestures,
            moves = self.moves,
            mps = moves_per_second,
            per_move = self.ns_per_move(),
            best = self.gesture_ms(self.fastest_gesture),
            worst = self.gesture_ms(self.slowest_gesture),
            x = self.final_position.x,
            y = self.final_position.y,
        )
    }
}

/// Random pointer walk of up to three cells per step on each axis.
struct PointerWalk {
    state: u64,
}

impl PointerWalk {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn step(&mut self, from: Position) -> Position {
        let dx = (self.next() % 7) as f64 - 3.0;
        let dy = (self.next() % 7) as f64 - 3.0;
        Position::new(from.x + dx, from.y + dy)
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ 0xA5A5_A5A5_1234_5678
}
