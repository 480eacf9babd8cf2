use crate::constants::{
    ACCESS_LEVEL_AUTHORIZED_CLIENT, ACCESS_PASSWORD, CMD_DEVICE_STATUS, CMD_SCAN_CONFIG,
    CMD_SCAN_DATA, CMD_SCAN_DATA_CONFIG, CMD_SET_ACCESS_MODE, CMD_SET_SCAN_CONFIG,
    CMD_START_MEASUREMENT, CMD_STOP_MEASUREMENT, TELEGRAM_END, VERB_EVENT, VERB_EVENT_ACK,
    VERB_METHOD, VERB_METHOD_ACK, VERB_READ, VERB_READ_ACK, VERB_WRITE, VERB_WRITE_ACK,
};
use crate::error::Lms1xxError;
use crate::numeric::{hex_i32, hex_u32, parse_dec_u16, parse_hex_i32, parse_hex_u32};
use crate::telegram;
use crate::transport::Transport;
use lms1xx_data::{ScanConfig, ScanDataConfig};

/// One blocking request/response round trip: frame and send the request,
/// receive exactly one telegram, and validate the response keyword pair and
/// arity. Trailing tokens beyond `min_tokens` are firmware-dependent and
/// left to the caller.
fn exchange(
    transport: &mut dyn Transport,
    request: &[&str],
    reply_verb: &str,
    min_tokens: usize,
) -> Result<Vec<String>, Lms1xxError> {
    transport.send(&telegram::encode(request))?;
    let raw = transport.receive_until(TELEGRAM_END)?;
    let reply = telegram::decode(&raw)?;
    if reply.len() < 2 {
        return Err(Lms1xxError::MalformedResponse(format!(
            "response \"{}\" is shorter than a keyword pair",
            reply.join(" ")
        )));
    }
    if reply[0] != reply_verb || reply[1] != request[1] {
        return Err(Lms1xxError::UnexpectedResponse(
            format!("{} {}", reply_verb, request[1]),
            reply.join(" "),
        ));
    }
    if reply.len() < min_tokens {
        return Err(Lms1xxError::MalformedResponse(format!(
            "{} {}: expected at least {} tokens, received {}",
            reply[0],
            reply[1],
            min_tokens,
            reply.len()
        )));
    }
    Ok(reply)
}

fn malformed_field(command: &str, field: &str, token: &str) -> Lms1xxError {
    Lms1xxError::MalformedResponse(format!(
        "{}: unparsable {} token {:?}",
        command, field, token
    ))
}

/// Method commands acknowledge success with status 0.
fn check_status_zero(command: &str, reply: &[String]) -> Result<(), Lms1xxError> {
    if reply[2] != "0" {
        return Err(Lms1xxError::UnexpectedResponse(
            format!("{} {} 0", VERB_METHOD_ACK, command),
            reply.join(" "),
        ));
    }
    Ok(())
}

/// Raise the access level to authorised client.
/// `SetAccessMode` is the one method that acknowledges success with 1.
pub(crate) fn login(transport: &mut dyn Transport) -> Result<(), Lms1xxError> {
    let request = [
        VERB_METHOD,
        CMD_SET_ACCESS_MODE,
        ACCESS_LEVEL_AUTHORIZED_CLIENT,
        ACCESS_PASSWORD,
    ];
    let reply = exchange(transport, &request, VERB_METHOD_ACK, 3)?;
    if reply[2] != "1" {
        return Err(Lms1xxError::UnexpectedResponse(
            format!("{} {} 1", VERB_METHOD_ACK, CMD_SET_ACCESS_MODE),
            reply.join(" "),
        ));
    }
    Ok(())
}

pub(crate) fn query_status(transport: &mut dyn Transport) -> Result<u16, Lms1xxError> {
    let request = [VERB_READ, CMD_DEVICE_STATUS];
    let reply = exchange(transport, &request, VERB_READ_ACK, 3)?;
    parse_dec_u16(&reply[2]).ok_or_else(|| malformed_field(CMD_DEVICE_STATUS, "status", &reply[2]))
}

pub(crate) fn start_measurement(transport: &mut dyn Transport) -> Result<(), Lms1xxError> {
    let request = [VERB_METHOD, CMD_START_MEASUREMENT];
    let reply = exchange(transport, &request, VERB_METHOD_ACK, 3)?;
    check_status_zero(CMD_START_MEASUREMENT, &reply)
}

pub(crate) fn stop_measurement(transport: &mut dyn Transport) -> Result<(), Lms1xxError> {
    let request = [VERB_METHOD, CMD_STOP_MEASUREMENT];
    let reply = exchange(transport, &request, VERB_METHOD_ACK, 3)?;
    check_status_zero(CMD_STOP_MEASUREMENT, &reply)
}

pub(crate) fn get_scan_config(transport: &mut dyn Transport) -> Result<ScanConfig, Lms1xxError> {
    let request = [VERB_READ, CMD_SCAN_CONFIG];
    let reply = exchange(transport, &request, VERB_READ_ACK, 6)?;
    let scanning_frequency = parse_hex_u32(&reply[2])
        .ok_or_else(|| malformed_field(CMD_SCAN_CONFIG, "scanning frequency", &reply[2]))?;
    let angle_resolution = parse_hex_u32(&reply[3])
        .ok_or_else(|| malformed_field(CMD_SCAN_CONFIG, "angle resolution", &reply[3]))?;
    let start_angle = parse_hex_i32(&reply[4])
        .ok_or_else(|| malformed_field(CMD_SCAN_CONFIG, "start angle", &reply[4]))?;
    let stop_angle = parse_hex_i32(&reply[5])
        .ok_or_else(|| malformed_field(CMD_SCAN_CONFIG, "stop angle", &reply[5]))?;
    Ok(ScanConfig {
        scanning_frequency,
        angle_resolution,
        start_angle,
        stop_angle,
    })
}

pub(crate) fn set_scan_config(
    transport: &mut dyn Transport,
    config: &ScanConfig,
) -> Result<(), Lms1xxError> {
    let frequency = hex_u32(config.scanning_frequency);
    let resolution = hex_u32(config.angle_resolution);
    let start = hex_i32(config.start_angle);
    let stop = hex_i32(config.stop_angle);
    let request = [
        VERB_METHOD,
        CMD_SET_SCAN_CONFIG,
        frequency.as_str(),
        resolution.as_str(),
        start.as_str(),
        stop.as_str(),
    ];
    let reply = exchange(transport, &request, VERB_METHOD_ACK, 3)?;
    check_status_zero(CMD_SET_SCAN_CONFIG, &reply)
}

fn bool_token(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub(crate) fn set_scan_data_config(
    transport: &mut dyn Transport,
    config: &ScanDataConfig,
) -> Result<(), Lms1xxError> {
    let output_channel = format!("{:02X}", config.output_channel);
    let resolution = config.resolution.to_string();
    let encoder = format!("{:02X}", config.encoder);
    let output_interval = config.output_interval.to_string();
    let request = [
        VERB_WRITE,
        CMD_SCAN_DATA_CONFIG,
        output_channel.as_str(),
        bool_token(config.remission),
        resolution.as_str(),
        encoder.as_str(),
        bool_token(config.position),
        bool_token(config.device_name),
        output_interval.as_str(),
    ];
    exchange(transport, &request, VERB_WRITE_ACK, 2)?;
    Ok(())
}

/// Start or stop the continuous scan-data stream. The acknowledgement must
/// echo the requested mode.
pub(crate) fn scan_continuous(
    transport: &mut dyn Transport,
    enable: bool,
) -> Result<(), Lms1xxError> {
    let mode = bool_token(enable);
    let request = [VERB_EVENT, CMD_SCAN_DATA, mode];
    let reply = exchange(transport, &request, VERB_EVENT_ACK, 3)?;
    if reply[2] != mode {
        return Err(Lms1xxError::UnexpectedResponse(
            format!("{} {} {}", VERB_EVENT_ACK, CMD_SCAN_DATA, mode),
            reply.join(" "),
        ));
    }
    Ok(())
}
