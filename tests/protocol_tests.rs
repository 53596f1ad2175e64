//! End-to-end text protocol tests for the accessory station

use trainz_accessories::{
    hal::{MockDisplay, MockSignal, MockStore},
    AccessoryPacket, AccessoryStation, Config, StationConfig, COMMAND_FAILED_RESPONSE,
    COMMAND_SUCCESSFUL_RESPONSE,
};

type Station = AccessoryStation<MockSignal, MockStore>;

fn station() -> Station {
    AccessoryStation::new(MockSignal::new(), MockStore::new(), &Config::default())
}

fn send(station: &mut Station, line: &str) -> Vec<String> {
    let mut responses: Vec<String> = Vec::new();
    station.process_line(line, &mut responses).unwrap();
    responses
}

// ============================================================================
// Turnout Command
// ============================================================================

#[test]
fn define_throw_and_list() {
    let mut station = station();

    assert_eq!(send(&mut station, "<T 5 12 -1>"), vec![COMMAND_SUCCESSFUL_RESPONSE]);
    assert_eq!(send(&mut station, "<T 5 1>"), vec!["<H 5 1>"]);
    assert_eq!(send(&mut station, "<T>"), vec!["<H 5 12 -1 1>"]);

    // Address 12 is board 3, output 3
    assert_eq!(
        station.signal().payloads(),
        vec![AccessoryPacket::new(3, 3, true).as_slice().to_vec()]
    );
}

#[test]
fn unknown_turnout_fails() {
    let mut station = station();
    assert_eq!(send(&mut station, "<T 99>"), vec![COMMAND_FAILED_RESPONSE]);
    assert_eq!(send(&mut station, "<T 99 1>"), vec![COMMAND_FAILED_RESPONSE]);
    assert!(station.signal().packets.is_empty());
}

#[test]
fn delete_then_list() {
    let mut station = station();
    send(&mut station, "<T 1 4 -1>");
    send(&mut station, "<T 2 8 -1>");

    assert_eq!(send(&mut station, "<T 1>"), vec!["<O>"]);
    assert_eq!(send(&mut station, "<T>"), vec!["<H 2 8 -1 0>"]);
    assert_eq!(send(&mut station, "<T 2>"), vec!["<O>"]);
    assert_eq!(send(&mut station, "<T>"), vec![COMMAND_FAILED_RESPONSE]);
}

#[test]
fn empty_listing_configurable() {
    let config = Config::default().with_station(StationConfig::default().with_list_empty_fails(false));
    let mut station = AccessoryStation::new(MockSignal::new(), MockStore::new(), &config);
    assert!(send(&mut station, "<T>").is_empty());
}

#[test]
fn redefine_keeps_state_and_changes_target() {
    let mut station = station();
    send(&mut station, "<T 7 12 -1>");
    send(&mut station, "<T 7 1>");

    // Switch to explicit board 40, output 2
    assert_eq!(send(&mut station, "<T 7 40 2>"), vec!["<O>"]);
    assert_eq!(send(&mut station, "<T>"), vec!["<H 7 40 2 1>"]);

    send(&mut station, "<T 7 0>");
    assert_eq!(
        station.signal().payloads().last().unwrap(),
        &AccessoryPacket::new(40, 2, false).as_slice().to_vec()
    );
}

#[test]
fn thrown_flag_other_than_one_closes() {
    let mut station = station();
    send(&mut station, "<T 3 12 -1>");
    assert_eq!(send(&mut station, "<T 3 2>"), vec!["<H 3 0>"]);
    assert_eq!(send(&mut station, "<T 3 yes>"), vec!["<H 3 0>"]);
}

#[test]
fn listing_order_follows_insertion() {
    let mut station = station();
    send(&mut station, "<T 9 36 -1>");
    send(&mut station, "<T 2 8 1>");
    send(&mut station, "<T 5 12 -1>");
    assert_eq!(
        send(&mut station, "<T>"),
        vec!["<H 9 36 -1 0>", "<H 2 8 1 0>", "<H 5 12 -1 0>"]
    );
}

// ============================================================================
// Accessory Command
// ============================================================================

#[test]
fn raw_accessory_packet() {
    let mut station = station();
    assert!(send(&mut station, "<a 12 0 1>").is_empty());

    let packets = &station.signal().packets;
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].bytes, vec![0x8C, 0xF9]);
    assert_eq!(packets[0].repeats, 1);
}

#[test]
fn raw_accessory_does_not_touch_turnouts() {
    let mut station = station();
    send(&mut station, "<T 5 12 -1>");
    send(&mut station, "<a 3 3 1>");
    assert!(!station.registry().by_id(5).unwrap().is_thrown());
}

#[test]
fn raw_accessory_wrong_arity() {
    let mut station = station();
    assert_eq!(send(&mut station, "<a 12 0>"), vec![COMMAND_FAILED_RESPONSE]);
    assert_eq!(send(&mut station, "<a>"), vec![COMMAND_FAILED_RESPONSE]);
    assert!(station.signal().packets.is_empty());
}

// ============================================================================
// Status and Persistence Frames
// ============================================================================

#[test]
fn status_frame() {
    let mut station = station();
    send(&mut station, "<T 1 4 -1>");
    send(&mut station, "<T 2 40 3>");
    assert_eq!(send(&mut station, "<s>"), vec!["<H 1 4 -1 0>", "<H 2 40 3 0>"]);
}

#[test]
fn store_and_restore_through_frames() {
    let mut station = station();
    send(&mut station, "<T 5 12 -1>");
    send(&mut station, "<T 6 40 2>");
    send(&mut station, "<T 6 1>");
    assert_eq!(send(&mut station, "<E>"), vec!["<O>"]);

    let (_, _, store) = station.into_parts();
    let mut restored = AccessoryStation::new(MockSignal::new(), store, &Config::default());
    let mut display = MockDisplay::new();
    assert_eq!(restored.init(&mut display).unwrap(), 2);

    assert_eq!(send(&mut restored, "<T>"), vec!["<H 5 12 -1 0>", "<H 6 40 2 1>"]);
    // Restoring never moves points
    assert!(restored.signal().packets.is_empty());
    assert_eq!(display.lines, vec![(4, "Found 02 Turnouts".to_string())]);
}

#[test]
fn store_failure_reports_x() {
    let mut station =
        AccessoryStation::new(MockSignal::new(), MockStore::new().failing(), &Config::default());
    send(&mut station, "<T 1 4 -1>");

    let mut responses: Vec<String> = Vec::new();
    assert!(station.process_line("<E>", &mut responses).is_err());
    assert_eq!(responses, vec![COMMAND_FAILED_RESPONSE]);
    // In-memory registry is untouched
    assert_eq!(station.registry().count(), 1);
}
