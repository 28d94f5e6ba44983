//! Drop Lab entry point
//!
//! Natively this runs a scripted, headless session and logs the readouts.
//! The browser host drives the library directly, so the wasm build has no
//! entry point of its own.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use drop_lab::PhysicsConfig;
    use drop_lab::platform::{ManualTime, TimeSource, init_logging};
    use drop_lab::sim::{SimState, TickInput, set_height, tick};
    use glam::Vec2;

    init_logging();
    log::info!("Drop Lab (native) starting...");

    // Optional JSON config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| PhysicsConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Could not load config from {}: {}, using defaults", path, e);
                PhysicsConfig::default()
            }
        },
        None => PhysicsConfig::default(),
    };

    let time = ManualTime::new(0.0);
    let mut state = SimState::with_config(config, 800.0, 600.0, 0xD809, time.now_secs());
    set_height(&mut state, 4.0);

    const FRAME: f64 = 1.0 / 60.0;
    const FRAMES: usize = 600;

    for frame in 0..FRAMES {
        time.advance(FRAME);

        // Pick the ball up three seconds in and throw it to the right
        let mut input = TickInput::default();
        match frame {
            180 => input.pointer_down = Some(state.body.pos),
            181..=185 => {
                let step = (frame - 180) as f32 * 8.0;
                input.pointer_move = Some(Vec2::new(400.0 + step, 200.0 - step));
                input.pointer_up = frame == 185;
            }
            _ => {}
        }

        tick(&mut state, &input, time.now_secs());

        if frame % 60 == 59 {
            let ball = state.ball_snapshot();
            let particles = state.particle_snapshot();
            match serde_json::to_string(&ball) {
                Ok(json) => log::info!("ball {}", json),
                Err(e) => log::warn!("Could not serialize ball snapshot: {}", e),
            }
            log::info!(
                "particles live={} absorbed={} escaped={}",
                particles.particles.len(),
                particles.absorbed_total,
                particles.escaped_total
            );
        }
    }

    log::info!(
        "Finished {} frames, {} history points recorded",
        FRAMES,
        state.history.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts call into the library, this is just to satisfy the compiler
}
