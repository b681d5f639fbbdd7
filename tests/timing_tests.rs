//! Integration tests for the timing constraint trackers.

use dram_scheduler::core::{TfawWindow, TxxdTimer};

/// Tests that a fresh tracker carries no outstanding constraint.
#[test]
fn test_txxd_initially_ready() {
    let timer = TxxdTimer::new(5);
    assert!(timer.ready());
}

/// Tests the basic arm/tick/ready countdown.
#[test]
fn test_txxd_countdown() {
    let mut timer = TxxdTimer::new(3);
    timer.start();
    assert!(!timer.ready());

    timer.tick();
    assert!(!timer.ready());
    timer.tick();
    assert!(!timer.ready());
    timer.tick();
    assert!(timer.ready());
}

/// Tests that re-arming mid-count resets to the full interval
/// (last-write-wins).
#[test]
fn test_txxd_rearm_resets() {
    let mut timer = TxxdTimer::new(3);
    timer.start();
    timer.tick();
    timer.tick();

    timer.start();
    timer.tick();
    timer.tick();
    assert!(!timer.ready());
    timer.tick();
    assert!(timer.ready());
}

/// Tests that a zero interval means the constraint is never enforced.
#[test]
fn test_txxd_zero_interval_always_ready() {
    let mut timer = TxxdTimer::new(0);
    timer.start();
    assert!(timer.ready());
    timer.tick();
    assert!(timer.ready());
}

/// Tests that fewer than four activates never block.
#[test]
fn test_tfaw_under_four_activates() {
    let mut window = TfawWindow::new(8);
    for _ in 0..3 {
        window.tick();
        assert!(window.ready());
        window.record();
    }
    window.tick();
    assert!(window.ready());
}

/// Tests that a fourth activate blocks until the oldest leaves the window.
#[test]
fn test_tfaw_four_in_window_blocks() {
    let mut window = TfawWindow::new(8);
    // Activates on cycles 0..3.
    for _ in 0..4 {
        window.tick();
        window.record();
    }
    assert!(!window.ready());

    // Cycles 4..7: the cycle-0 activate is still inside the window.
    for _ in 4..8 {
        window.tick();
        assert!(!window.ready());
    }

    // Cycle 8: the cycle-0 activate ages out.
    window.tick();
    assert!(window.ready());
}

/// Tests that a zero window disables the constraint entirely.
#[test]
fn test_tfaw_disabled() {
    let mut window = TfawWindow::new(0);
    for _ in 0..10 {
        window.tick();
        window.record();
        assert!(window.ready());
    }
}
