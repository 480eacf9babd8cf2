#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Struct to hold the scan configuration of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanConfig {
    /// Scanning frequency in 1/100 Hz.
    pub scanning_frequency: u32,
    /// Angular resolution in 1/10000 degree.
    pub angle_resolution: u32,
    /// Start angle in 1/10000 degree, device-centered at 0.
    pub start_angle: i32,
    /// Stop angle in 1/10000 degree, device-centered at 0.
    pub stop_angle: i32,
}

/// Selection of the optional fields of the streamed scan-data telegram.
///
/// This configuration is write-only. The device does not echo it back, so
/// the driver keeps the last applied value to know the telegram layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanDataConfig {
    /// Active output channel sets. 1 = first, 2 = second, 3 = both.
    pub output_channel: u8,
    /// Whether remission values are output.
    pub remission: bool,
    /// Remission sample width. 0 = 8 bit, 1 = 16 bit.
    pub resolution: u8,
    /// Active encoder channel. 0 = none.
    pub encoder: u8,
    /// Whether position values are output.
    pub position: bool,
    /// Whether the device name is output.
    pub device_name: bool,
    /// Every Nth scan is output.
    pub output_interval: u16,
}

impl Default for ScanDataConfig {
    /// Factory shape of the telegram: first channel set, 16 bit remission
    /// width, no optional fields, every scan.
    fn default() -> ScanDataConfig {
        ScanDataConfig {
            output_channel: 1,
            remission: false,
            resolution: 1,
            encoder: 0,
            position: false,
            device_name: false,
            output_interval: 1,
        }
    }
}
