mod command;
mod constants;
mod error;
mod numeric;
mod scan;
mod telegram;
mod transport;

pub use crate::constants::DEFAULT_PORT;
pub use crate::error::Lms1xxError;
pub use crate::transport::{TcpTransport, Transport};

use crate::constants::{ANGLE_MAX, ANGLE_MIN, TELEGRAM_END};
use lms1xx_data::{ScanConfig, ScanData, ScanDataConfig};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Disconnected,
    Connected,
    LoggedIn,
}

/// Session handle for one LMS1xx device.
///
/// Operations are strictly synchronous: each performs one blocking
/// request/response exchange on the underlying transport. A transport
/// failure drops the connection and discards the session state; every other
/// failure leaves the last known-good state untouched.
pub struct Lms1xx {
    transport: Option<Box<dyn Transport>>,
    state: SessionState,
    measuring: bool,
    streaming: bool,
    /// Layout of the streamed telegrams, as last applied to the device.
    data_config: ScanDataConfig,
}

impl Lms1xx {
    pub fn new() -> Lms1xx {
        Lms1xx {
            transport: None,
            state: SessionState::Disconnected,
            measuring: false,
            streaming: false,
            data_config: ScanDataConfig::default(),
        }
    }

    /// Wrap an already-open transport. The session starts out connected but
    /// not logged in.
    pub fn from_transport(transport: Box<dyn Transport>) -> Lms1xx {
        Lms1xx {
            transport: Some(transport),
            state: SessionState::Connected,
            measuring: false,
            streaming: false,
            data_config: ScanDataConfig::default(),
        }
    }

    /// Connect to the CoLa-A interface of the device, port 2111 by default.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<(), Lms1xxError> {
        self.connect_with_timeout(host, port, None)
    }

    /// Connect with a bound on how long any later receive may block.
    pub fn connect_with_timeout(
        &mut self,
        host: &str,
        port: u16,
        timeout: Option<Duration>,
    ) -> Result<(), Lms1xxError> {
        if self.transport.is_some() {
            return Err(Lms1xxError::StateError("already connected"));
        }
        let mut transport = TcpTransport::connect((host, port))?;
        transport.set_timeout(timeout)?;
        self.transport = Some(Box::new(transport));
        self.state = SessionState::Connected;
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.reset();
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn is_measuring(&self) -> bool {
        self.measuring
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Raise the access level so that configuration commands are accepted.
    pub fn login(&mut self) -> Result<(), Lms1xxError> {
        self.run(command::login)?;
        self.state = SessionState::LoggedIn;
        Ok(())
    }

    /// Current operating status of the device, as a raw status code.
    pub fn query_status(&mut self) -> Result<u16, Lms1xxError> {
        self.run(command::query_status)
    }

    /// Start the laser and the measurement unit.
    pub fn start_measurement(&mut self) -> Result<(), Lms1xxError> {
        self.require_login()?;
        self.run(command::start_measurement)?;
        self.measuring = true;
        Ok(())
    }

    /// Stop the laser and the measurement unit.
    pub fn stop_measurement(&mut self) -> Result<(), Lms1xxError> {
        self.require_login()?;
        self.run(command::stop_measurement)?;
        self.measuring = false;
        Ok(())
    }

    /// Read the current scan configuration from the device.
    pub fn get_scan_config(&mut self) -> Result<ScanConfig, Lms1xxError> {
        self.run(command::get_scan_config)
    }

    /// Apply a scan configuration. The angle invariants are checked locally
    /// before any exchange; unsupported frequency/resolution combinations
    /// are left for the device to refuse.
    pub fn set_scan_config(&mut self, config: &ScanConfig) -> Result<(), Lms1xxError> {
        validate_scan_config(config)?;
        self.require_login()?;
        self.run(|transport| command::set_scan_config(transport, config))
    }

    /// Select which optional fields the streamed telegrams carry. The
    /// applied configuration is retained, since decoding depends on it.
    pub fn set_scan_data_config(&mut self, config: &ScanDataConfig) -> Result<(), Lms1xxError> {
        self.require_login()?;
        self.run(|transport| command::set_scan_data_config(transport, config))?;
        self.data_config = *config;
        Ok(())
    }

    /// Start or stop the continuous scan-data stream.
    pub fn scan_continuous(&mut self, enable: bool) -> Result<(), Lms1xxError> {
        self.require_login()?;
        self.run(|transport| command::scan_continuous(transport, enable))?;
        self.streaming = enable;
        Ok(())
    }

    /// Block until the next streamed scan telegram arrives and decode it.
    pub fn get_data(&mut self) -> Result<ScanData, Lms1xxError> {
        if !self.streaming {
            return Err(Lms1xxError::StateError("output stream not enabled"));
        }
        let config = self.data_config;
        self.run(|transport| {
            let raw = transport.receive_until(TELEGRAM_END)?;
            let tokens = telegram::decode(&raw)?;
            scan::decode_scan_data(&tokens, &config)
        })
    }

    /// Run one protocol exchange, demoting the session to disconnected if
    /// the transport fails underneath it.
    fn run<R>(
        &mut self,
        operation: impl FnOnce(&mut dyn Transport) -> Result<R, Lms1xxError>,
    ) -> Result<R, Lms1xxError> {
        let transport = self
            .transport
            .as_deref_mut()
            .ok_or(Lms1xxError::StateError("not connected"))?;
        let result = operation(transport);
        if matches!(result, Err(Lms1xxError::ConnectionError(_))) {
            self.reset();
        }
        result
    }

    fn require_login(&self) -> Result<(), Lms1xxError> {
        match self.state {
            SessionState::LoggedIn => Ok(()),
            SessionState::Connected => Err(Lms1xxError::StateError("login required")),
            SessionState::Disconnected => Err(Lms1xxError::StateError("not connected")),
        }
    }

    fn reset(&mut self) {
        self.transport = None;
        self.state = SessionState::Disconnected;
        self.measuring = false;
        self.streaming = false;
    }
}

impl Default for Lms1xx {
    fn default() -> Lms1xx {
        Lms1xx::new()
    }
}

fn validate_scan_config(config: &ScanConfig) -> Result<(), Lms1xxError> {
    if config.start_angle >= config.stop_angle {
        return Err(Lms1xxError::InvalidConfig(format!(
            "start angle {} must lie below stop angle {}",
            config.start_angle, config.stop_angle
        )));
    }
    if config.start_angle < ANGLE_MIN || config.stop_angle > ANGLE_MAX {
        return Err(Lms1xxError::InvalidConfig(format!(
            "angles {}..{} exceed the field of view {}..{}",
            config.start_angle, config.stop_angle, ANGLE_MIN, ANGLE_MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::thread::JoinHandle;

    fn frame(payload: &str) -> Vec<u8> {
        let mut raw = vec![0x02];
        raw.extend_from_slice(payload.as_bytes());
        raw.push(0x03);
        raw
    }

    fn read_request(stream: &mut TcpStream) -> Vec<u8> {
        let mut request = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            stream.read_exact(&mut byte).unwrap();
            request.push(byte[0]);
            if byte[0] == 0x03 {
                return request;
            }
        }
    }

    /// Spawn a fake device that answers each expected request with its
    /// scripted reply, then hands the stream back for further writes.
    fn fake_device(
        exchanges: Vec<(&'static str, &'static str)>,
    ) -> (Lms1xx, JoinHandle<TcpStream>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            for (expected, reply) in exchanges {
                let request = read_request(&mut stream);
                assert_eq!(request, frame(expected));
                stream.write_all(&frame(reply)).unwrap();
            }
            stream
        });
        let mut device = Lms1xx::new();
        device.connect(&addr.ip().to_string(), addr.port()).unwrap();
        (device, handle)
    }

    #[test]
    fn test_login_and_status_query() {
        let (mut device, handle) = fake_device(vec![
            ("sMN SetAccessMode 03 F4724744", "sAN SetAccessMode 1"),
            ("sRN STlms", "sRA STlms 7"),
        ]);
        assert!(device.is_connected());
        device.login().unwrap();
        assert_eq!(device.query_status().unwrap(), 7);
        handle.join().unwrap();
    }

    #[test]
    fn test_login_rejected_keeps_connection() {
        let (mut device, handle) = fake_device(vec![
            ("sMN SetAccessMode 03 F4724744", "sAN SetAccessMode 0"),
            ("sRN STlms", "sRA STlms 3"),
        ]);
        assert!(matches!(
            device.login(),
            Err(Lms1xxError::UnexpectedResponse(_, _))
        ));
        // The session survives a rejected login, but stays locked.
        assert!(device.is_connected());
        assert!(matches!(
            device.start_measurement(),
            Err(Lms1xxError::StateError(_))
        ));
        assert_eq!(device.query_status().unwrap(), 3);
        handle.join().unwrap();
    }

    #[test]
    fn test_operations_while_disconnected() {
        let mut device = Lms1xx::new();
        assert!(!device.is_connected());
        assert!(matches!(
            device.query_status(),
            Err(Lms1xxError::StateError(_))
        ));
        assert!(matches!(
            device.start_measurement(),
            Err(Lms1xxError::StateError(_))
        ));
        assert!(matches!(device.get_data(), Err(Lms1xxError::StateError(_))));
    }

    #[test]
    fn test_get_data_requires_streaming() {
        let (mut device, handle) = fake_device(vec![]);
        assert!(matches!(device.get_data(), Err(Lms1xxError::StateError(_))));
        handle.join().unwrap();
    }

    #[test]
    fn test_connect_while_connected() {
        let (mut device, handle) = fake_device(vec![]);
        assert!(matches!(
            device.connect("127.0.0.1", DEFAULT_PORT),
            Err(Lms1xxError::StateError(_))
        ));
        handle.join().unwrap();
    }

    #[test]
    fn test_invalid_scan_config_rejected_locally() {
        let mut device = Lms1xx::new();
        let inverted = ScanConfig {
            scanning_frequency: 5000,
            angle_resolution: 5000,
            start_angle: 900_000,
            stop_angle: -450_000,
        };
        assert!(matches!(
            device.set_scan_config(&inverted),
            Err(Lms1xxError::InvalidConfig(_))
        ));
        let beyond_fov = ScanConfig {
            scanning_frequency: 5000,
            angle_resolution: 5000,
            start_angle: -500_000,
            stop_angle: 2_250_000,
        };
        assert!(matches!(
            device.set_scan_config(&beyond_fov),
            Err(Lms1xxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_scan_config_exchange() {
        let (mut device, handle) = fake_device(vec![
            ("sMN SetAccessMode 03 F4724744", "sAN SetAccessMode 1"),
            ("sRN LMPscancfg", "sRA LMPscancfg 1388 9C4 FFF92230 225510"),
            (
                "sMN mLMPsetscancfg 9C4 1388 FFFF3CB0 10C8E0",
                "sAN mLMPsetscancfg 0",
            ),
        ]);
        device.login().unwrap();
        let config = device.get_scan_config().unwrap();
        assert_eq!(
            config,
            ScanConfig {
                scanning_frequency: 5000,
                angle_resolution: 2500,
                start_angle: -450_000,
                stop_angle: 2_250_000,
            }
        );
        let narrowed = ScanConfig {
            scanning_frequency: 2500,
            angle_resolution: 5000,
            start_angle: -50_000,
            stop_angle: 1_100_000,
        };
        device.set_scan_config(&narrowed).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_streaming_session() {
        let scan_telegram = "sSN LMDscandata 0 0 1A 1B 1388 A8C 2 DIST1 3 8A1 8A2 8A3 RSSI1 3 1F 20 21";
        let (mut device, handle) = fake_device(vec![
            ("sMN SetAccessMode 03 F4724744", "sAN SetAccessMode 1"),
            ("sWN LMDscandatacfg 01 1 1 00 0 0 1", "sWA LMDscandatacfg"),
            ("sMN LMCstartmeas", "sAN LMCstartmeas 0"),
            ("sEN LMDscandata 1", "sEA LMDscandata 1"),
        ]);
        device.login().unwrap();
        let config = ScanDataConfig {
            remission: true,
            ..ScanDataConfig::default()
        };
        device.set_scan_data_config(&config).unwrap();
        device.start_measurement().unwrap();
        assert!(device.is_measuring());
        device.scan_continuous(true).unwrap();
        assert!(device.is_streaming());

        let mut stream = handle.join().unwrap();
        stream.write_all(&frame(scan_telegram)).unwrap();
        stream.write_all(&frame(scan_telegram)).unwrap();

        let scan = device.get_data().unwrap();
        assert_eq!(scan.dist1, vec![0x8A1, 0x8A2, 0x8A3]);
        assert_eq!(scan.rssi1, vec![0x1F, 0x20, 0x21]);
        assert!(scan.dist2.is_empty());
        assert!(scan.rssi2.is_empty());
        let scan = device.get_data().unwrap();
        assert_eq!(scan.scan_counter, 0x1B);

        // Closing the transport cancels the blocked receive and drops the
        // session back to disconnected.
        drop(stream);
        assert!(matches!(
            device.get_data(),
            Err(Lms1xxError::ConnectionError(_))
        ));
        assert!(!device.is_connected());
        assert!(!device.is_streaming());
        assert!(matches!(
            device.query_status(),
            Err(Lms1xxError::StateError(_))
        ));
    }

    #[test]
    fn test_state_transitions_with_scripted_transport() {
        let transport = ScriptedTransport::replying(&[
            "sAN SetAccessMode 1",
            "sAN LMCstartmeas 0",
            "sAN LMCstopmeas 0",
        ]);
        let mut device = Lms1xx::from_transport(Box::new(transport));
        assert!(device.is_connected());
        assert!(matches!(
            device.start_measurement(),
            Err(Lms1xxError::StateError(_))
        ));
        device.login().unwrap();
        device.start_measurement().unwrap();
        assert!(device.is_measuring());
        device.stop_measurement().unwrap();
        assert!(!device.is_measuring());
        device.disconnect();
        assert!(!device.is_connected());
        assert!(matches!(
            device.query_status(),
            Err(Lms1xxError::StateError(_))
        ));
    }
}
