//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time fed to the simulation clock
//! - Logger and panic hook setup

/// Source of wall-clock time in seconds
///
/// Only differences between readings matter; the epoch is arbitrary.
pub trait TimeSource {
    fn now_secs(&self) -> f64;
}

/// Default time source for the current platform
#[derive(Debug, Clone)]
pub struct SystemTime {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl SystemTime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTime {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    #[cfg(target_arch = "wasm32")]
    fn now_secs(&self) -> f64 {
        let ms = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        ms / 1000.0
    }
}

/// Time source driven by hand, for tests and scripted runs
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: std::cell::Cell<f64>,
}

impl ManualTime {
    pub fn new(start: f64) -> Self {
        Self {
            now: std::cell::Cell::new(start),
        }
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }
}

impl TimeSource for ManualTime {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}

/// Install the logger for this platform (idempotent)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Install the logger for this platform (idempotent)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
