use std::f64::consts::PI;

use crate::sim::series::{Hourly, HOURS_PER_DAY, clamp, positive};
use crate::sim::window::{DAY_MINUTES, split_window, window_length};

use super::types::{EnergyModel, Producer, ProducerModel, rounded_quantity};

/// Computes a producer's precomputed energy for each hour of the day in kWh.
///
/// Only `solar_curve` producers have a precomputed curve. Batteries, unknown
/// kinds and disabled producers return all zeros; battery output is decided
/// later by the balance solver.
pub fn compute_producer_hourly(producer: &Producer) -> Hourly {
    if !producer.enabled {
        return [0.0; HOURS_PER_DAY];
    }

    match &producer.model {
        ProducerModel::SolarCurve {
            peak_kw,
            start_min,
            end_min,
        } => {
            let peak_kw = positive(*peak_kw) * rounded_quantity(producer.quantity);
            solar_curve_hourly(peak_kw, *start_min, *end_min)
        }
        ProducerModel::BatteryDischarge { .. } | ProducerModel::Unsupported => {
            [0.0; HOURS_PER_DAY]
        }
    }
}

/// Half-sine output peaking at `peak_kw` halfway through `[start_min, end_min)`.
///
/// Each whole minute of the window contributes `kw / 60` kWh to the hour it
/// falls in.
pub fn solar_curve_hourly(peak_kw: f64, start_min: f64, end_min: f64) -> Hourly {
    let mut hourly = [0.0; HOURS_PER_DAY];
    let start = clamp(start_min, 0.0, DAY_MINUTES);
    let end = clamp(end_min, 0.0, DAY_MINUTES);
    let length = window_length(start, end);
    if length <= 0.0 || peak_kw <= 0.0 {
        return hourly;
    }

    let mut elapsed = 0.0;
    for span in split_window(start, end) {
        let mut minute = span.start;
        while minute < span.end {
            let progress = elapsed / length;
            let kw = (peak_kw * (PI * progress).sin()).max(0.0);
            let hour = (minute / 60.0).floor() as usize % HOURS_PER_DAY;
            hourly[hour] += kw / 60.0;
            elapsed += 1.0;
            minute += 1.0;
        }
    }
    hourly
}

impl EnergyModel for Producer {
    fn hourly_kwh(&self) -> Hourly {
        compute_producer_hourly(self)
    }

    fn model_kind(&self) -> &'static str {
        self.model.kind()
    }
}
