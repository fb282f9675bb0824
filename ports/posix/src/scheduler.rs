//! Superloop driver for POSIX hosts
//!
//! Drives a booted dispatcher pass by pass until Ctrl-C, an iteration limit
//! or a halt request (a simulated reset) ends the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use appfw_dispatch::Dispatcher;
use log::info;

use crate::error::PortError;

/// Global running flag
static RUNNING: AtomicBool = AtomicBool::new(true);

/// Pause between passes when nothing is registered
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Route Ctrl-C to [`stop`]
pub fn install_ctrlc() -> Result<(), PortError> {
    ctrlc::set_handler(|| {
        info!("Ctrl-C received, stopping");
        stop();
    })?;
    Ok(())
}

/// Ask the loop to finish after the current pass
pub fn stop() {
    RUNNING.store(false, Ordering::SeqCst);
}

pub fn is_running() -> bool {
    RUNNING.load(Ordering::SeqCst)
}

/// Run passes until stopped, `limit` passes have been made, or `halt`
/// returns `true`. Returns the number of passes made.
pub fn run<const N: usize, H>(dispatcher: &mut Dispatcher<'_, N>, limit: Option<u64>, halt: H) -> u64
where
    H: Fn() -> bool,
{
    dispatcher.start();

    let mut passes = 0;
    while is_running() && limit.map_or(true, |limit| passes < limit) && !halt() {
        if !dispatcher.step() {
            thread::sleep(IDLE_SLEEP);
        }
        passes += 1;
    }
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use appfw_core::Application;

    struct Count(u32);

    impl Application for Count {
        fn setup(&mut self) {}

        fn tick(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn stops_at_limit_and_on_halt() {
        let mut app = Count(0);
        {
            let mut dispatcher: Dispatcher<'_, 2> = Dispatcher::default();
            let mut console = String::new();
            dispatcher.boot(|ctx| ctx.register_app("Count", &mut app), &mut console);
            assert_eq!(run(&mut dispatcher, Some(5), || false), 5);
            assert_eq!(run(&mut dispatcher, Some(5), || true), 0);
        }
        assert_eq!(app.0, 5);
    }
}
