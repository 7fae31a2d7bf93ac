//! End-to-end controller scenarios, driven with an explicit clock so every
//! assertion is deterministic. Wire lines are checked as rendered strings,
//! exactly as a panel would see them.

use latchkey_core::{AuxType, BillingPartner, Config, LockState};
use latchkey_emulator::RelayController;
use std::time::Duration;

fn wire(reports: &[latchkey_protocol::Report]) -> Vec<String> {
    reports.iter().map(ToString::to_string).collect()
}

#[test]
fn badge_access_cycle() {
    // A DFACS panel grants a 10 second unlock; the relay acks, counts
    // down, and relocks on its own.
    let mut ctl = RelayController::new(Config::default());

    // First heartbeat announces the idle state.
    assert_eq!(wire(&ctl.tick(0)), vec!["STATUS,0,0,NA,0,NORMAL"]);

    assert_eq!(wire(&ctl.handle_line("0 10", 100)), vec![
        "STATUS,1,0,NA,10,NORMAL"
    ]);

    // Mid-window heartbeat shows the countdown.
    assert_eq!(wire(&ctl.tick(4100)), vec!["STATUS,1,0,NA,6,NORMAL"]);

    // Timer expiry relocks and reports it at once; the coinciding
    // heartbeat repeats the same record.
    let reports = ctl.tick(10_100);
    assert_eq!(ctl.lock_state(), LockState::Locked);
    assert_eq!(wire(&reports), vec![
        "STATUS,0,0,NA,0,NORMAL",
        "STATUS,0,0,NA,0,NORMAL",
    ]);
}

#[test]
fn relock_is_reported_even_between_heartbeats() {
    // The auto-relock must reach the panel on the expiry tick itself,
    // not ride along on the next 1Hz heartbeat.
    let mut ctl = RelayController::new(Config::default());
    ctl.tick(0);
    ctl.handle_line("0 2", 100);

    // Heartbeat lands at 1900, so nothing periodic is due at 2150.
    ctl.tick(1900);
    let reports = ctl.tick(2150);
    assert_eq!(ctl.lock_state(), LockState::Locked);
    assert_eq!(wire(&reports), vec!["STATUS,0,0,NA,0,NORMAL"]);
}

#[test]
fn exit_request_preempts_the_panel() {
    // Someone hits the exit button while the door is locked. The override
    // window owns the relay for five seconds; the panel is told why its
    // commands bounce.
    let mut ctl = RelayController::new(Config::default());
    ctl.tick(0);

    assert_eq!(wire(&ctl.trigger_rte(500)), vec![
        "STATUS,1,1,NA,5,RTE_ACTIVE",
        "RTE_OVERRIDE,ACTIVATED,5",
    ]);

    // Panel tries to lock the door on the person walking out.
    assert_eq!(wire(&ctl.handle_line("z", 1000)), vec![
        "REJECTED,RTE_OVERRIDE_ACTIVE"
    ]);

    // Status queries still work, and show the override countdown.
    assert_eq!(wire(&ctl.handle_line("status", 3500)), vec![
        "STATUS,1,1,NA,2,RTE_ACTIVE"
    ]);

    // Window elapses: relock, notify, and the simultaneous heartbeat.
    assert_eq!(wire(&ctl.tick(5500)), vec![
        "STATUS,0,1,NA,0,NORMAL",
        "RTE_OVERRIDE,DEACTIVATED",
        "STATUS,0,1,NA,0,NORMAL",
    ]);

    // The count survives until the panel acknowledges it.
    assert_eq!(ctl.rte_count(), 1);
    assert_eq!(wire(&ctl.handle_line("ack", 6000)), vec![
        "STATUS,0,0,NA,0,NORMAL"
    ]);
}

#[test]
fn exit_request_preempts_a_permanent_unlock() {
    // Override only engages from Locked; while permanently unlocked the
    // button is a no-op and nothing is counted.
    let mut ctl = RelayController::new(Config::default());
    ctl.handle_line("a", 0);
    assert_eq!(ctl.lock_state(), LockState::PermanentUnlocked);

    assert!(ctl.trigger_rte(100).is_empty());
    assert_eq!(ctl.rte_count(), 0);
    assert_eq!(ctl.lock_state(), LockState::PermanentUnlocked);
}

#[test]
fn peak_panel_speaks_the_phrase_but_hears_nothing() {
    let mut ctl = RelayController::new(Config {
        billing_partner: BillingPartner::Peak,
        ..Config::default()
    });

    // The phrase unlocks with the default window; no ack comes back.
    assert!(ctl.handle_line("Open Sesame!", 0).is_empty());
    assert_eq!(ctl.lock_state(), LockState::TempUnlocked);

    // No heartbeat either, ever.
    assert!(ctl.tick(0).is_empty());
    assert!(ctl.tick(2000).is_empty());

    // DFACS-only verbs mean nothing to a PEAK panel.
    ctl.tick(5000);
    assert!(ctl.handle_line("ack", 6000).is_empty());
    assert!(ctl.handle_line("status", 6000).is_empty());
    assert_eq!(ctl.lock_state(), LockState::Locked);
}

#[test]
fn abc_panel_has_the_narrow_vocabulary() {
    let mut ctl = RelayController::new(Config {
        billing_partner: BillingPartner::Abc,
        ..Config::default()
    });

    assert!(ctl.handle_line("open sesame!", 0).is_empty());
    assert_eq!(ctl.lock_state(), LockState::Locked);

    ctl.handle_line("0 3", 0);
    assert_eq!(ctl.lock_state(), LockState::TempUnlocked);
    ctl.handle_line("z", 1000);
    assert_eq!(ctl.lock_state(), LockState::Locked);
}

#[test]
fn door_sensor_rides_along_in_status() {
    let mut ctl = RelayController::new(Config {
        aux_type: AuxType::Dps,
        ..Config::default()
    });

    assert_eq!(wire(&ctl.tick(0)), vec!["STATUS,0,0,CLOSED,0,NORMAL"]);

    ctl.toggle_door_state();
    assert_eq!(wire(&ctl.tick(1000)), vec!["STATUS,0,0,OPEN,0,NORMAL"]);

    // A DPS input never fires the override.
    assert!(ctl.trigger_rte(1500).is_empty());
    assert!(!ctl.override_active());
}

#[test]
fn duration_token_edge_cases_on_the_wire() {
    let mut ctl = RelayController::new(Config::default());
    ctl.tick(0);

    // Zero clamps up to one second.
    assert_eq!(wire(&ctl.handle_line("0 0", 0)), vec![
        "STATUS,1,0,NA,1,NORMAL"
    ]);
    ctl.tick(1000);
    assert_eq!(ctl.lock_state(), LockState::Locked);

    // Garbage token falls back to the default five seconds.
    assert_eq!(wire(&ctl.handle_line("0 soon", 2000)), vec![
        "STATUS,1,0,NA,5,NORMAL"
    ]);
    ctl.handle_line("z", 2100);

    // Oversized requests clamp down to an hour.
    assert_eq!(wire(&ctl.handle_line("0 99999", 3000)), vec![
        "STATUS,1,0,NA,3600,NORMAL"
    ]);
}

#[test]
fn disabled_counter_never_moves_across_repeated_overrides() {
    let mut ctl = RelayController::new(Config {
        rte_count_enabled: false,
        ..Config::default()
    });
    ctl.tick(0);

    assert_eq!(wire(&ctl.trigger_rte(100)), vec![
        "STATUS,1,0,NA,5,RTE_ACTIVE",
        "RTE_OVERRIDE,ACTIVATED,5",
    ]);
    ctl.tick(5100);
    assert_eq!(ctl.lock_state(), LockState::Locked);

    // Second press, same story: the override engages, the count stays put.
    assert!(!ctl.trigger_rte(6000).is_empty());
    assert!(ctl.override_active());
    assert_eq!(ctl.rte_count(), 0);
}

#[test]
fn live_config_edit_switches_dialects_mid_session() {
    let mut ctl = RelayController::new(Config {
        billing_partner: BillingPartner::Abc,
        ..Config::default()
    });
    assert!(ctl.tick(0).is_empty());

    ctl.set_config(Config {
        billing_partner: BillingPartner::Dfacs,
        ..*ctl.config()
    });

    // Reporting starts immediately for the new partner.
    assert_eq!(wire(&ctl.tick(10)), vec!["STATUS,0,0,NA,0,NORMAL"]);
    assert!(!ctl.handle_line("status", 20).is_empty());
}

#[test]
fn manual_unlock_matches_wire_semantics() {
    let mut ctl = RelayController::new(Config::default());
    ctl.tick(0);

    assert_eq!(
        wire(&ctl.manual_unlock(Duration::from_secs(30), 100)),
        vec!["STATUS,1,0,NA,30,NORMAL"]
    );
    ctl.tick(30_100);
    assert_eq!(ctl.lock_state(), LockState::Locked);
}

#[test]
fn reset_returns_to_power_on_state() {
    let mut ctl = RelayController::new(Config::default());
    ctl.tick(0);
    ctl.trigger_rte(100);
    ctl.reset();

    assert_eq!(ctl.lock_state(), LockState::Locked);
    assert!(!ctl.override_active());
    assert_eq!(ctl.rte_count(), 0);
    // Heartbeat pacing restarted too.
    assert_eq!(wire(&ctl.tick(200)), vec!["STATUS,0,0,NA,0,NORMAL"]);
}
