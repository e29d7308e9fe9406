#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use maude_trends::models::{DeviceInfo, EventReport, MdrText, RawSeries, TermCount};
use maude_trends::upstream::{DateField, StaticReportSource, TermField};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Sparse event-date counts spanning 2019-2021.
pub fn event_counts() -> RawSeries {
    RawSeries::from_terms(vec![
        ("20190107", 2),
        ("20190315", 1),
        ("20200106", 4),
        ("20200704", 8),
        ("20201231", 3),
        ("20210101", 5),
    ])
    .unwrap()
}

/// Sparse received-date counts spanning 2019-2021.
pub fn received_counts() -> RawSeries {
    RawSeries::from_terms(vec![
        ("20190201", 5),
        ("20200108", 6),
        ("20200715", 2),
        ("20210104", 1),
        ("20211130", 7),
    ])
    .unwrap()
}

/// Event type histogram, in upstream order.
pub fn event_type_counts() -> Vec<TermCount> {
    vec![
        TermCount::new("Malfunction", 12),
        TermCount::new("Injury", 6),
        TermCount::new("Death", 2),
    ]
}

/// Device class histogram, in upstream order.
pub fn device_class_counts() -> Vec<TermCount> {
    vec![TermCount::new("2", 15), TermCount::new("3", 5)]
}

fn report(date: &str, manufacturer: &str, event_type: &str, narrative: bool) -> EventReport {
    EventReport {
        date_received: Some(date.to_string()),
        event_type: Some(event_type.to_string()),
        event_location: Some("HOSPITAL".to_string()),
        reporter_occupation_code: Some("NURSE".to_string()),
        device: vec![DeviceInfo {
            manufacturer_d_name: Some(manufacturer.to_string()),
            generic_name: Some("INFUSION PUMP".to_string()),
        }],
        mdr_text: if narrative {
            vec![MdrText {
                text_type_code: Some("Description of Event or Problem".to_string()),
                text: Some("PUMP ALARMED DURING INFUSION.".to_string()),
            }]
        } else {
            Vec::new()
        },
    }
}

/// Infusion pump reports from two manufacturers, 2019-2021.
pub fn event_reports() -> Vec<EventReport> {
    vec![
        report("20190514", "ACME MEDICAL", "Malfunction", true),
        report("20200210", "ACME MEDICAL", "Injury", true),
        report("20200802", "ACME MEDICAL", "Malfunction", false),
        report("20200803", "GLOBEX", "Death", true),
        report("20210120", "ACME MEDICAL", "Malfunction", false),
    ]
}

/// A static source serving every fixture.
pub fn fixture_source() -> StaticReportSource {
    StaticReportSource::new()
        .with_series(DateField::DateOfEvent, event_counts())
        .with_series(DateField::DateReceived, received_counts())
        .with_terms(TermField::EventType, event_type_counts())
        .with_terms(TermField::DeviceClass, device_class_counts())
        .with_reports(event_reports())
}
