//! RTC demo test

mod common;

use appfw_apps::rtc::{RtcDemo, CONFIGURED_MARKER, MARKER_REGISTER};
use appfw_core::Application;
use common::{MockDelay, MockRtc};

// Cold and warm start share the handler flags, so both run in one test
#[test]
fn test_cold_then_warm_start() {
    let rtc = MockRtc::default();
    let mut demo = RtcDemo::new(rtc.clone(), MockDelay::default());

    demo.setup();
    {
        let state = rtc.state.borrow();
        assert_eq!(state.configured, 1);
        assert_eq!(state.counter, 0);
        assert_eq!(state.alarm, Some(10));
        assert_eq!(state.backup[MARKER_REGISTER as usize], CONFIGURED_MARKER);
    }

    rtc.advance(1);
    demo.tick();
    assert_eq!(demo.alarms(), 0);

    rtc.advance(9);
    demo.tick();
    assert_eq!(demo.alarms(), 1);
    assert_eq!(rtc.state.borrow().alarm, Some(40));

    rtc.advance(30);
    demo.tick();
    assert_eq!(demo.alarms(), 2);
    assert_eq!(rtc.state.borrow().alarm, Some(70));

    // Reset with the backup domain intact
    let warm = MockRtc::default();
    {
        let mut state = warm.state.borrow_mut();
        state.backup[MARKER_REGISTER as usize] = CONFIGURED_MARKER;
        state.counter = 100;
        state.alarm = Some(130);
    }
    let mut demo = RtcDemo::new(warm.clone(), MockDelay::default());
    demo.setup();
    {
        let state = warm.state.borrow();
        assert_eq!(state.configured, 0);
        assert_eq!(state.synced, 1);
        assert_eq!(state.counter, 100);
        assert!(state.second_handler.is_some());
        assert!(state.alarm_handler.is_some());
    }

    warm.advance(30);
    demo.tick();
    assert_eq!(demo.alarms(), 1);
    assert_eq!(warm.state.borrow().alarm, Some(160));
}
