use crate::sim::series::{Hourly, clamp, compress_to_hourly, positive, total, zero_minutes};
use crate::sim::window::{DAY_MINUTES, HOUR_MINUTES, is_minute_in_window};

use super::types::{BatteryStrategy, Producer, ProducerModel, rounded_quantity};

/// Tolerance applied when comparing a minute's rate against the peak threshold.
pub const PEAK_RATE_EPSILON: f64 = 1e-9;

/// Per-run state of one battery during the energy balance.
///
/// `BatteryState` is created fresh for every simulation and starts empty at
/// minute 0; nothing carries over between days.
///
/// # Charging and discharging
/// - Charging absorbs surplus at any minute, limited only by free capacity.
/// - Discharging covers deficit inside `[start_min, end_min)`, limited by
///   `max_output_per_min_kwh` and the stored charge.
#[derive(Debug, Clone)]
pub struct BatteryState {
    /// Position of the battery in the household's producer list.
    pub producer_index: usize,

    pub strategy: BatteryStrategy,

    /// Usable capacity in kWh, already scaled by quantity.
    pub capacity_kwh: f64,

    /// Maximum energy delivered per minute in kWh, already scaled by quantity.
    pub max_output_per_min_kwh: f64,

    /// Discharge window start (inclusive).
    pub start_min: f64,

    /// Discharge window end (exclusive).
    pub end_min: f64,

    /// Energy currently stored in kWh.
    pub charge_kwh: f64,

    /// Total surplus absorbed over the day in kWh.
    pub captured_kwh: f64,

    per_minute_output: Vec<f64>,
}

impl BatteryState {
    /// Builds the solver state for a producer.
    ///
    /// # Arguments
    ///
    /// * `producer_index` - Position of `producer` in the producer list
    /// * `producer` - The producer record
    ///
    /// # Returns
    ///
    /// `None` unless the producer is an enabled `battery_discharge`.
    pub fn from_producer(producer_index: usize, producer: &Producer) -> Option<Self> {
        if !producer.enabled {
            return None;
        }
        let ProducerModel::BatteryDischarge {
            capacity_kwh,
            max_output_kw,
            start_min,
            end_min,
            strategy,
        } = &producer.model
        else {
            return None;
        };

        let quantity = rounded_quantity(producer.quantity);
        Some(Self {
            producer_index,
            strategy: *strategy,
            capacity_kwh: positive(*capacity_kwh) * quantity,
            max_output_per_min_kwh: positive(*max_output_kw) * quantity / HOUR_MINUTES,
            start_min: clamp(*start_min, 0.0, DAY_MINUTES),
            end_min: clamp(*end_min, 0.0, DAY_MINUTES),
            charge_kwh: 0.0,
            captured_kwh: 0.0,
            per_minute_output: zero_minutes(),
        })
    }

    /// Free capacity in kWh.
    pub fn headroom_kwh(&self) -> f64 {
        (self.capacity_kwh - self.charge_kwh).max(0.0)
    }

    /// Absorbs up to `surplus_kwh` and returns the amount actually stored.
    pub fn charge(&mut self, surplus_kwh: f64) -> f64 {
        let absorbed = self.headroom_kwh().min(surplus_kwh.max(0.0));
        if absorbed > 0.0 {
            self.charge_kwh += absorbed;
            self.captured_kwh += absorbed;
        }
        absorbed
    }

    /// Covers part of a deficit at `minute` and returns the energy delivered.
    ///
    /// # Arguments
    ///
    /// * `minute` - Minute of the day (0..1440)
    /// * `deficit_kwh` - Remaining unmet demand at this minute
    /// * `rate` - Import rate at this minute
    /// * `peak_threshold` - Day-wide peak rate used by `peak_shaving`
    pub fn discharge(&mut self, minute: usize, deficit_kwh: f64, rate: f64, peak_threshold: f64) -> f64 {
        if deficit_kwh <= 0.0 || !is_minute_in_window(minute as f64, self.start_min, self.end_min) {
            return 0.0;
        }
        if self.strategy == BatteryStrategy::PeakShaving && rate + PEAK_RATE_EPSILON < peak_threshold {
            return 0.0;
        }

        let possible = self.max_output_per_min_kwh.min(self.charge_kwh);
        if possible <= 0.0 {
            return 0.0;
        }
        let delivered = possible.min(deficit_kwh);
        self.charge_kwh -= delivered;
        if let Some(slot) = self.per_minute_output.get_mut(minute) {
            *slot += delivered;
        }
        delivered
    }

    pub fn output_at(&self, minute: usize) -> f64 {
        self.per_minute_output.get(minute).copied().unwrap_or(0.0)
    }

    /// Energy delivered over the day in kWh.
    pub fn delivered_kwh(&self) -> f64 {
        total(&self.per_minute_output)
    }

    pub fn hourly_output(&self) -> Hourly {
        compress_to_hourly(&self.per_minute_output)
    }
}
