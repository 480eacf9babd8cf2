/// Start-of-telegram marker byte.
pub(crate) const TELEGRAM_START: u8 = 0x02;
/// End-of-telegram marker byte.
pub(crate) const TELEGRAM_END: u8 = 0x03;

/// Factory TCP port of the LMS1xx Ethernet interface.
pub const DEFAULT_PORT: u16 = 2111;

pub(crate) const VERB_METHOD: &str = "sMN";
pub(crate) const VERB_METHOD_ACK: &str = "sAN";
pub(crate) const VERB_READ: &str = "sRN";
pub(crate) const VERB_READ_ACK: &str = "sRA";
pub(crate) const VERB_WRITE: &str = "sWN";
pub(crate) const VERB_WRITE_ACK: &str = "sWA";
pub(crate) const VERB_EVENT: &str = "sEN";
pub(crate) const VERB_EVENT_ACK: &str = "sEA";
pub(crate) const VERB_STREAM: &str = "sSN";

pub(crate) const CMD_SET_ACCESS_MODE: &str = "SetAccessMode";
pub(crate) const CMD_START_MEASUREMENT: &str = "LMCstartmeas";
pub(crate) const CMD_STOP_MEASUREMENT: &str = "LMCstopmeas";
pub(crate) const CMD_DEVICE_STATUS: &str = "STlms";
pub(crate) const CMD_SCAN_CONFIG: &str = "LMPscancfg";
pub(crate) const CMD_SET_SCAN_CONFIG: &str = "mLMPsetscancfg";
pub(crate) const CMD_SCAN_DATA_CONFIG: &str = "LMDscandatacfg";
pub(crate) const CMD_SCAN_DATA: &str = "LMDscandata";

/// Authorised-client access level and its firmware password.
pub(crate) const ACCESS_LEVEL_AUTHORIZED_CLIENT: &str = "03";
pub(crate) const ACCESS_PASSWORD: &str = "F4724744";

// Mechanical field of view in 1/10000 degree.
pub(crate) const ANGLE_MIN: i32 = -450_000;
pub(crate) const ANGLE_MAX: i32 = 2_250_000;

pub(crate) const READ_CHUNK_SIZE: usize = 4096;
