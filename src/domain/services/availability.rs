use chrono::{NaiveTime, Timelike};
use crate::domain::models::booking::Booking;
use crate::error::AppError;

pub const MINUTES_PER_DAY: i32 = 1440;
pub const SLOT_MINUTES: i32 = 60;

/// A half-open `[start, end)` interval in minutes of day. All conflict
/// arithmetic happens here; the calendar date and court are matched by the
/// caller's query, never inside the interval test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInterval {
    pub start: i32,
    pub end: i32,
}

impl SlotInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: minute_of_day(start),
            end: end_minute(end),
        }
    }

    /// The fixed one-hour slot beginning at `start`.
    pub fn slot_starting(start: NaiveTime) -> Self {
        let s = minute_of_day(start);
        Self { start: s, end: s + SLOT_MINUTES }
    }

    pub fn overlaps(&self, other: &SlotInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

pub fn minute_of_day(t: NaiveTime) -> i32 {
    (t.hour() * 60 + t.minute()) as i32
}

// An end time of 00:00 means the booking runs to midnight.
fn end_minute(t: NaiveTime) -> i32 {
    let m = minute_of_day(t);
    if m == 0 { MINUTES_PER_DAY } else { m }
}

pub fn booking_interval(booking: &Booking) -> SlotInterval {
    SlotInterval::new(booking.start_time, booking.end_time)
}

pub fn parse_hhmm(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time format (HH:mm): {}", value)))
}

/// Returns the indexes of `candidates` that cannot be booked: a candidate
/// conflicts if it overlaps any ACTIVE booking in `existing`, or any other
/// candidate of the same request. Checking within the request rejects
/// duplicate/overlapping selections before they can half-succeed at the
/// storage layer.
pub fn find_conflicts(candidates: &[SlotInterval], existing: &[Booking]) -> Vec<usize> {
    let taken: Vec<SlotInterval> = existing
        .iter()
        .filter(|b| b.is_active())
        .map(booking_interval)
        .collect();

    let mut conflicting = Vec::new();

    for (i, candidate) in candidates.iter().enumerate() {
        let against_existing = taken.iter().any(|t| candidate.overlaps(t));
        let against_request = candidates
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && candidate.overlaps(other));

        if against_existing || against_request {
            conflicting.push(i);
        }
    }

    conflicting
}
