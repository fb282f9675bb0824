//! Whole demos on the simulated board, with time advanced by the delays

use appfw_apps::i2c::polling::RoundTrip;
use appfw_apps::{Board, Catalog};
use appfw_dispatch::{Dispatcher, DispatcherConfig};
use appfw_hal::gpio::pins;
use appfw_hal::rtc::Rtc;
use appfw_hal::watchdog::Watchdog as _;
use appfw_posix::{scheduler, SimBoard, SimConfig};

fn fast_board() -> SimBoard {
    SimBoard::new(SimConfig {
        fast: true,
        ..SimConfig::default()
    })
}

/// Boot a fresh image on `board`, run it, then let `inspect` look at the
/// demos once the dispatcher is gone
fn run_demo<F>(board: &SimBoard, index: usize, limit: u64, inspect: F) -> u64
where
    F: FnOnce(&Catalog<SimBoard>),
{
    let mut catalog = Catalog::new(board);
    let passes = {
        let config = DispatcherConfig::builder().default_index(index).build();
        let mut dispatcher: Dispatcher<'_> = Dispatcher::new(config);
        let mut console = String::new();
        dispatcher.boot(|ctx| catalog.register_all(ctx), &mut console);

        let sim = board.simulation();
        scheduler::run(&mut dispatcher, Some(limit), || sim.reset_pending())
    };
    inspect(&catalog);
    passes
}

#[test]
fn test_watchdog_resets_board() {
    let board = fast_board();
    let passes = run_demo(&board, 19, 100, |catalog| {
        assert!(catalog.watchdog.is_hanging());
    });

    // Last feed at 9.5 s, expiry once more than 2 s have passed
    assert_eq!(passes, 24);
    assert!(board.simulation().reset_pending());

    board.simulation().reset();
    assert_eq!(board.pin(pins::PC13).mode(), None);
    let mut watchdog = board.watchdog();
    assert!(watchdog.feed().is_err());
}

#[test]
fn test_rtc_survives_reset() {
    let board = fast_board();
    run_demo(&board, 17, 120, |catalog| {
        assert_eq!(catalog.rtc.alarms(), 1);
        assert_eq!(catalog.rtc.rtc().counter(), 12);
    });

    board.simulation().reset();
    run_demo(&board, 17, 20, |catalog| {
        // Warm start keeps counting from where the first run stopped
        assert_eq!(catalog.rtc.rtc().counter(), 14);
        assert_eq!(catalog.rtc.alarms(), 0);
    });
}

#[test]
fn test_i2c_polling_verifies_eeprom() {
    let board = fast_board();
    run_demo(&board, 6, 3, |catalog| {
        assert_eq!(catalog.i2c_polling.last_round(), Some(RoundTrip::Verified));
    });
}

#[test]
fn test_uart_polling_echoes_script() {
    let board = fast_board();
    run_demo(&board, 14, 60, |catalog| {
        assert_eq!(catalog.uart_polling.message_counter(), 60);
    });

    // Messages #0 and #50, then "hello\r" echoed byte by byte and as a line
    let messages = "UART Polling Message #0\r\n".len() * 2 + 1;
    let expected = messages + "hello\r".len() + "Echo: hello\r\n".len();
    assert_eq!(board.uart().transmitted(), expected);
}
