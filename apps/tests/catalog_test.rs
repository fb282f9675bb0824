//! Catalog registration and dispatch through the superloop

mod common;

use appfw_apps::{Catalog, APP_NAMES};
use appfw_core::AppContext;
use appfw_dispatch::{Dispatcher, DispatcherConfig};
use common::MockBoard;

#[test]
fn test_registers_twenty_in_order() {
    let board = MockBoard::default();
    let mut catalog = Catalog::new(&board);
    let mut ctx: AppContext<'_> = AppContext::new();
    catalog.register_all(&mut ctx);

    assert_eq!(ctx.count(), APP_NAMES.len());
    let names: Vec<_> = ctx.registry().iter().map(|app| app.name()).collect();
    assert_eq!(names, APP_NAMES);
    assert_eq!(ctx.current(), 0);
}

#[test]
fn test_small_registry_keeps_first_entries() {
    let board = MockBoard::default();
    let mut catalog = Catalog::new(&board);
    let mut ctx: AppContext<'_, 4> = AppContext::new();
    catalog.register_all(&mut ctx);

    assert_eq!(ctx.count(), 4);
    assert_eq!(ctx.get(3).map(|app| app.name()), Some("ADC DMA"));
}

#[test]
fn test_dispatches_selected_demo() {
    let board = MockBoard::default();
    let mut catalog = Catalog::new(&board);
    let mut console = String::new();
    {
        let config = DispatcherConfig::builder().default_index(19).build();
        let mut dispatcher: Dispatcher<'_> = Dispatcher::new(config);
        dispatcher.boot(|ctx| catalog.register_all(ctx), &mut console);
        dispatcher.start();
        assert_eq!(dispatcher.run_for(3), 3);
    }

    assert!(console.starts_with("Available apps:\n0: Hello World\n"));
    assert!(console.contains("19: Watchdog\n"));
    assert!(console.ends_with("Current app: 19 (Watchdog)\n"));
    assert_eq!(catalog.watchdog.loop_counter(), 3);
    assert_eq!(catalog.hello.step(), 0);
    assert_eq!(*board.delay.calls.borrow(), [500, 500, 500]);
}
