// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pickup-time features for NYC taxi trip data.
//!
//! The raw dataset must carry a `pickup_datetime` column, either as
//! timestamps or as strings like `2016-03-14 17:24:55` or RFC 3339. An RFC 3339
//! offset is dropped, not applied: the features read the local wall-clock time
//! the string states.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

use crate::errors::{FrameError, ValidationError};
use crate::frame::Column;
use crate::registry::{FeatureInputs, Registry};

/// Raw dataset column holding the trip start time
pub const PICKUP_DATETIME: &str = "pickup_datetime";

pub const PICKUP_TIME: &str = "pickup_time";
pub const PICKUP_HOUR: &str = "pickup_hour";
pub const PICKUP_WEEKDAY: &str = "pickup_weekday";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Register `pickup_time`, `pickup_hour` and `pickup_weekday`.
///
/// `pickup_hour` is 0..=23 and `pickup_weekday` is 0..=6 with Monday as 0.
/// Rows whose pickup time is missing or unparsable are null in all three.
pub fn register_taxi_features(registry: &mut Registry) -> Result<(), ValidationError> {
    registry.register(PICKUP_TIME, &[], pickup_time)?;
    registry.register(PICKUP_HOUR, &[PICKUP_TIME], pickup_hour)?;
    registry.register(PICKUP_WEEKDAY, &[PICKUP_TIME], pickup_weekday)?;
    Ok(())
}

fn pickup_time(inputs: &FeatureInputs<'_>) -> anyhow::Result<Column> {
    match inputs.raw(PICKUP_DATETIME)? {
        Column::Timestamp(values) => Ok(Column::Timestamp(values.clone())),
        Column::Str(values) => Ok(Column::Timestamp(
            values
                .iter()
                .map(|value| value.as_deref().and_then(parse_datetime))
                .collect(),
        )),
        other => Err(FrameError::TypeMismatch {
            column: PICKUP_DATETIME.to_string(),
            expected: "timestamp or str",
            actual: other.dtype(),
        }
        .into()),
    }
}

fn pickup_hour(inputs: &FeatureInputs<'_>) -> anyhow::Result<Column> {
    let times = inputs.dependency(PICKUP_TIME)?.as_timestamp(PICKUP_TIME)?;
    Ok(Column::Int(
        times.iter().map(|t| t.map(|t| i64::from(t.hour()))).collect(),
    ))
}

fn pickup_weekday(inputs: &FeatureInputs<'_>) -> anyhow::Result<Column> {
    let times = inputs.dependency(PICKUP_TIME)?.as_timestamp(PICKUP_TIME)?;
    Ok(Column::Int(
        times
            .iter()
            .map(|t| t.map(|t| i64::from(t.weekday().num_days_from_monday())))
            .collect(),
    ))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|t| t.naive_local()))
}
