//! Data-point delivery

use skyfan_protocol::DataPoint;

/// Receiver for data points reported by the MCU
///
/// Called once per decoded entry, in payload order. Implemented for any
/// `FnMut(DataPoint)` closure.
pub trait DataPointHandler {
    fn on_data_point(&mut self, dp: DataPoint);
}

impl<F> DataPointHandler for F
where
    F: FnMut(DataPoint),
{
    fn on_data_point(&mut self, dp: DataPoint) {
        self(dp)
    }
}
