//! Ticket Set Property Suite
//!
//! Checks the invariants every generated batch must hold:
//! - Unique serial numbers (case-insensitive)
//! - Field count on every ticket
//! - Winner and loser correctness under the win threshold
//! - Ordinal sort by serial number
//! - Ticket count conservation

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tf_core::{EngineConfig, Prize, PrizeList, PrizeListReader, Strategy, TicketSet};
use tf_engine::{EngineError, RetryLimits, TicketSetBuilder};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn prizes(entries: &[(&str, u32)]) -> PrizeList {
    entries
        .iter()
        .map(|(name, count)| Prize::new(*name, *count))
        .collect()
}

fn build(config: EngineConfig, list: &PrizeList, ticket_count: u64, seed: u64) -> TicketSet {
    TicketSetBuilder::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
        .build_multi(list, ticket_count)
        .expect("ticket set should build")
}

fn count(fields: &[String], value: &str) -> usize {
    fields.iter().filter(|f| f.as_str() == value).count()
}

fn assert_invariants(set: &TicketSet, field_count: usize, fields_to_win: usize) {
    let mut serials = HashSet::new();
    for ticket in &set.tickets {
        assert!(
            serials.insert(ticket.serial_number.to_lowercase()),
            "duplicate serial {}",
            ticket.serial_number
        );
        assert_eq!(ticket.fields.len(), field_count);

        match &ticket.designated_winner {
            Some(prize) => {
                assert!(count(&ticket.fields, prize) >= fields_to_win);
                for value in &ticket.fields {
                    if value != prize {
                        assert!(count(&ticket.fields, value) < fields_to_win);
                    }
                }
            }
            None => {
                for value in &ticket.fields {
                    assert!(count(&ticket.fields, value) < fields_to_win);
                }
            }
        }
    }

    let mut sorted = set.tickets.clone();
    sorted.sort_by(|a, b| a.serial_number.cmp(&b.serial_number));
    assert_eq!(sorted, set.tickets, "tickets must be sorted by serial number");
    assert!(set.verify().is_empty(), "{:?}", set.verify());
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn car_and_bikes_losers_cannot_be_filled() {
    // Two prizes cannot fill three fields of a losing ticket without a pair,
    // so the filler phase is reported as degenerate instead of looping.
    let config = EngineConfig::default().with_fields(3).with_fields_to_win(2);
    let result = TicketSetBuilder::with_rng(config, ChaCha8Rng::seed_from_u64(42))
        .build_multi(&prizes(&[("Car", 1), ("Bike", 2)]), 5);

    assert!(matches!(result, Err(EngineError::DegenerateEngine(_))));
}

#[test]
fn car_and_bikes_without_filler() {
    let config = EngineConfig::default().with_fields(3).with_fields_to_win(2);
    let set = build(config, &prizes(&[("Car", 1), ("Bike", 2)]), 3, 42);

    assert_eq!(set.len(), 3);
    assert_eq!(set.losers().count(), 0);
    assert_invariants(&set, 3, 2);
}

#[test]
fn car_bikes_and_boat_scenario() {
    let config = EngineConfig::default().with_fields(3).with_fields_to_win(2);
    let set = build(config, &prizes(&[("Car", 1), ("Bike", 2), ("Boat", 1)]), 6, 42);

    assert_eq!(set.len(), 6);
    assert_eq!(set.strategy, Strategy::Multi);
    assert_eq!(set.fields_to_win, Some(2));

    let cars = set
        .winners()
        .filter(|t| t.designated_winner.as_deref() == Some("Car"))
        .count();
    let bikes = set
        .winners()
        .filter(|t| t.designated_winner.as_deref() == Some("Bike"))
        .count();
    assert_eq!(cars, 1);
    assert_eq!(bikes, 2);
    assert_eq!(set.winners().count(), 4);
    assert_eq!(set.losers().count(), 2);

    for loser in set.losers() {
        let distinct: HashSet<&String> = loser.fields.iter().collect();
        assert_eq!(distinct.len(), 3);
    }
    assert_invariants(&set, 3, 2);
}

#[test]
fn threshold_above_field_count_is_clamped() {
    let config = EngineConfig::default().with_fields(3).with_fields_to_win(4);
    let set = build(config, &prizes(&[("Car", 2), ("Bike", 1), ("Boat", 1)]), 6, 7);

    assert_eq!(set.fields_to_win, Some(3));
    for winner in set.winners() {
        let prize = winner.designated_winner.as_deref().unwrap();
        assert_eq!(count(&winner.fields, prize), 3);
    }
    assert_invariants(&set, 3, 3);
}

#[test]
fn many_fields_many_prizes() {
    let config = EngineConfig::default().with_fields(12).with_fields_to_win(3);
    let list = prizes(&[
        ("Car", 1),
        ("Bike", 3),
        ("Boat", 2),
        ("TV", 5),
        ("Phone", 8),
        ("Voucher", 20),
        ("Mug", 30),
    ]);
    let set = build(config, &list, 500, 1234);

    assert_eq!(set.len(), 500);
    assert_eq!(set.winners().count() as u64, list.total_instances());
    assert_invariants(&set, 12, 3);
}

#[test]
fn count_conservation() {
    let config = EngineConfig::default().with_fields(4).with_fields_to_win(2);
    let list = prizes(&[("A", 3), ("B", 3), ("C", 3), ("D", 3)]);

    for (requested, seed) in [(1u64, 1u64), (12, 2), (13, 3), (100, 4)] {
        let set = build(config.clone(), &list, requested, seed);
        assert!(set.len() as u64 >= requested);
        assert!(set.len() as u64 >= list.total_instances());
        assert_eq!(set.len() as u64, requested.max(list.total_instances()));
        assert_invariants(&set, 4, 2);
    }
}

#[test]
fn full_house_winners_have_no_filler() {
    let config = EngineConfig::default().with_fields(5).with_fields_to_win(5);
    let set = build(config, &prizes(&[("Car", 2), ("Bike", 2)]), 10, 77);

    for winner in set.winners() {
        let prize = winner.designated_winner.as_deref().unwrap();
        assert!(winner.fields.iter().all(|f| f == prize));
    }
    assert_invariants(&set, 5, 5);
}

#[test]
fn prefix_and_case_insensitive_uniqueness() {
    let config = EngineConfig::default()
        .with_fields(3)
        .with_fields_to_win(2)
        .with_serial_alphabet("aAbBcC")
        .with_serial_length(5)
        .with_serial_prefix("X-");
    let set = build(config, &prizes(&[("Car", 5), ("Bike", 5), ("Boat", 5)]), 200, 9);

    assert!(set.tickets.iter().all(|t| t.serial_number.starts_with("X-")));
    assert_invariants(&set, 3, 2);
}

#[test]
fn csv_to_ticket_set() {
    let report = PrizeListReader::default()
        .read_str("# prize,count\nCar,1\nBike,2\nbroken line\nBoat,3\n")
        .unwrap();
    assert_eq!(report.syntax_errors().count(), 1);

    let config = EngineConfig::default().with_fields(5).with_fields_to_win(3);
    let set = build(config, &report.prizes, 20, 5);

    assert_eq!(set.len(), 20);
    assert_eq!(set.winners().count(), 6);
    assert_invariants(&set, 5, 3);
}

#[test]
fn tight_limits_report_instead_of_hanging() {
    let config = EngineConfig::default()
        .with_fields(3)
        .with_fields_to_win(2)
        .with_serial_alphabet("01")
        .with_serial_length(5);
    let limits = RetryLimits {
        max_serial_attempts: 1_000,
        max_field_rejections: 1_000,
    };
    let result = TicketSetBuilder::with_rng(config, ChaCha8Rng::seed_from_u64(3))
        .with_limits(limits)
        .build_multi(&prizes(&[("Car", 1), ("Bike", 1), ("Boat", 1)]), 64);

    assert!(result.is_err());
}

#[test]
fn json_round_trip_keeps_field_order() {
    let config = EngineConfig::default().with_fields(4).with_fields_to_win(2);
    let set = build(
        config,
        &prizes(&[("Čaj", 2), ("Kávovar", 1), ("Žehlička", 1), ("Rádio", 1)]),
        10,
        11,
    );

    let loaded = TicketSet::from_json(&set.to_json().unwrap()).unwrap();
    assert_eq!(loaded.tickets, set.tickets);
    assert_eq!(loaded.fields_to_win, Some(2));
}
