//! Dataset Merging
//!
//! Left-joins messages and payments onto the user-day snapshots by
//! (user, date). Missing counts and amounts fill with 0; a user-day with
//! several matching payment rows fans out into several merged rows, so
//! per-user sums stay intact downstream.

use crate::ingest::{MessageEvent, PaymentEvent, UserDay};
use crate::schema::{EventFrame, EventRow};
use chrono::NaiveDate;
use fxhash::FxHashMap;

type DayKey = (String, NaiveDate);

pub(crate) fn merge_events(
    users: Vec<UserDay>,
    messages: Vec<MessageEvent>,
    payments: Vec<PaymentEvent>,
    experiments: Vec<String>,
) -> EventFrame {
    let mut messages_by_day: FxHashMap<DayKey, Vec<f64>> = FxHashMap::default();
    for message in messages {
        messages_by_day
            .entry((message.user_id, message.date))
            .or_default()
            .push(message.messages_count);
    }

    let mut payments_by_day: FxHashMap<DayKey, Vec<f64>> = FxHashMap::default();
    for payment in payments {
        payments_by_day
            .entry((payment.user_id, payment.date))
            .or_default()
            .push(payment.price_usd);
    }

    let zero = vec![0.0];
    let mut rows = Vec::new();
    for user_day in users {
        let key = (user_day.user_id.clone(), user_day.date);
        let message_counts = messages_by_day.get(&key).unwrap_or(&zero);
        let payment_amounts = payments_by_day.get(&key).unwrap_or(&zero);

        for &messages_count in message_counts {
            for &price_usd in payment_amounts {
                rows.push(EventRow {
                    user_id: user_day.user_id.clone(),
                    date: user_day.date,
                    flags: user_day.flags.clone(),
                    messages_count,
                    price_usd,
                });
            }
        }
    }

    EventFrame { rows, experiments }
}
