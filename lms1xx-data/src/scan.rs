#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on the number of samples a channel can carry: 270 degree
/// aperture at the finest resolution of 0.25 degree, plus header slack.
pub const MAX_SAMPLES_PER_CHANNEL: usize = 1082;

/// Struct to hold one decoded scan-data telegram.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanData {
    /// Device status reported alongside the scan.
    pub status: u16,
    /// Telegram counter of the device.
    pub telegram_counter: u32,
    /// Scan counter of the device.
    pub scan_counter: u32,
    /// Scan frequency in 1/100 Hz.
    pub scan_frequency: u32,
    /// Measurement frequency in Hz.
    pub measurement_frequency: u32,
    /// First distance channel (in mm).
    pub dist1: Vec<u16>,
    /// Second distance channel (in mm).
    pub dist2: Vec<u16>,
    /// First remission channel (device units).
    pub rssi1: Vec<u16>,
    /// Second remission channel (device units).
    pub rssi2: Vec<u16>,
}

impl ScanData {
    pub fn new() -> ScanData {
        ScanData {
            status: 0,
            telegram_counter: 0,
            scan_counter: 0,
            scan_frequency: 0,
            measurement_frequency: 0,
            dist1: Vec::new(),
            dist2: Vec::new(),
            rssi1: Vec::new(),
            rssi2: Vec::new(),
        }
    }
}

impl Default for ScanData {
    fn default() -> ScanData {
        ScanData::new()
    }
}
