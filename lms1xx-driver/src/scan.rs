use crate::constants::{CMD_SCAN_DATA, VERB_STREAM};
use crate::error::Lms1xxError;
use crate::numeric::{parse_dec_u16, parse_dec_usize, parse_hex_u16, parse_hex_u32};
use lms1xx_data::{ScanData, ScanDataConfig, MAX_SAMPLES_PER_CHANNEL};

/// Labels of the four sample channels, in the only order they may appear.
const CHANNEL_LABELS: [&str; 4] = ["DIST1", "DIST2", "RSSI1", "RSSI2"];

/// Cursor over the token sequence of one scan-data telegram.
struct Cursor<'a> {
    tokens: &'a [String],
    index: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self, field: &'static str) -> Result<&'a str, Lms1xxError> {
        let token = self.tokens.get(self.index).ok_or_else(|| {
            Lms1xxError::MalformedResponse(format!(
                "{}: telegram ends before the {} field",
                CMD_SCAN_DATA, field
            ))
        })?;
        self.index += 1;
        Ok(token)
    }

    fn next_hex_u32(&mut self, field: &'static str) -> Result<u32, Lms1xxError> {
        let token = self.next(field)?;
        parse_hex_u32(token).ok_or_else(|| {
            Lms1xxError::MalformedResponse(format!(
                "{}: unparsable {} token {:?}",
                CMD_SCAN_DATA, field, token
            ))
        })
    }

    fn next_dec_u16(&mut self, field: &'static str) -> Result<u16, Lms1xxError> {
        let token = self.next(field)?;
        parse_dec_u16(token).ok_or_else(|| {
            Lms1xxError::MalformedResponse(format!(
                "{}: unparsable {} token {:?}",
                CMD_SCAN_DATA, field, token
            ))
        })
    }
}

fn channel_slot(label: &str) -> Option<usize> {
    CHANNEL_LABELS.iter().position(|&known| known == label)
}

fn channel_mut(scan: &mut ScanData, slot: usize) -> &mut Vec<u16> {
    match slot {
        0 => &mut scan.dist1,
        1 => &mut scan.dist2,
        2 => &mut scan.rssi1,
        _ => &mut scan.rssi2,
    }
}

/// Decode the token sequence of one `sSN LMDscandata` telegram into a fresh
/// `ScanData`, using the active scan-data configuration for the parts of the
/// layout the telegram itself does not describe (the device name field).
/// Channels absent from the telegram are left empty. Tokens after the last
/// channel block are firmware-dependent extras and are ignored.
pub(crate) fn decode_scan_data(
    tokens: &[String],
    config: &ScanDataConfig,
) -> Result<ScanData, Lms1xxError> {
    let mut cursor = Cursor { tokens, index: 0 };
    let verb = cursor.next("verb")?;
    let name = cursor.next("command name")?;
    if verb != VERB_STREAM || name != CMD_SCAN_DATA {
        return Err(Lms1xxError::UnexpectedResponse(
            format!("{} {}", VERB_STREAM, CMD_SCAN_DATA),
            format!("{} {}", verb, name),
        ));
    }
    cursor.next_hex_u32("version")?;
    if config.device_name {
        cursor.next("device name")?;
    }

    let mut scan = ScanData::new();
    scan.status = cursor.next_dec_u16("status")?;
    scan.telegram_counter = cursor.next_hex_u32("telegram counter")?;
    scan.scan_counter = cursor.next_hex_u32("scan counter")?;
    scan.scan_frequency = cursor.next_hex_u32("scan frequency")?;
    scan.measurement_frequency = cursor.next_hex_u32("measurement frequency")?;

    let n_blocks = {
        let token = cursor.next("channel block count")?;
        parse_dec_usize(token).ok_or_else(|| {
            Lms1xxError::DecodeError(format!("unparsable channel block count {:?}", token))
        })?
    };

    let mut next_slot = 0;
    for _ in 0..n_blocks {
        let label = cursor.next("channel label")?;
        let slot = channel_slot(label)
            .ok_or_else(|| Lms1xxError::DecodeError(format!("unknown channel label {:?}", label)))?;
        if slot < next_slot {
            return Err(Lms1xxError::DecodeError(format!(
                "channel {} repeated or out of order",
                label
            )));
        }
        next_slot = slot + 1;

        let count = {
            let token = cursor.next("sample count")?;
            parse_dec_usize(token).ok_or_else(|| {
                Lms1xxError::DecodeError(format!("{}: unparsable sample count {:?}", label, token))
            })?
        };
        if count > MAX_SAMPLES_PER_CHANNEL {
            return Err(Lms1xxError::DecodeError(format!(
                "{}: {} samples exceed the channel capacity of {}",
                label, count, MAX_SAMPLES_PER_CHANNEL
            )));
        }
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            let token = cursor.next("sample")?;
            let sample = parse_hex_u16(token).ok_or_else(|| {
                Lms1xxError::DecodeError(format!("{}: non-hex sample token {:?}", label, token))
            })?;
            samples.push(sample);
        }
        *channel_mut(&mut scan, slot) = samples;
    }
    Ok(scan)
}
