use clap::Parser;
use lms1xx_data::{DeviceStatus, ScanDataConfig};
use lms1xx_driver::{Lms1xx, DEFAULT_PORT};
use std::time::Duration;

/// Streams scans from a SICK LMS1xx and prints each one as a JSON object,
/// one per line.
#[derive(Parser)]
#[command(about = "Dumps LMS1xx scan data as JSON lines.")]
struct Args {
    /// Host name or IP address of the device.
    host: String,
    /// TCP port of the CoLa-A interface.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

fn main() {
    let args = Args::parse();

    let mut device = Lms1xx::new();
    device
        .connect(&args.host, args.port)
        .expect("failed to connect");
    device.login().expect("login rejected");
    device
        .set_scan_data_config(&ScanDataConfig {
            remission: true,
            ..ScanDataConfig::default()
        })
        .expect("failed to apply the scan data configuration");
    device
        .start_measurement()
        .expect("failed to start measurement");

    loop {
        let status = device.query_status().expect("status query failed");
        if DeviceStatus::from(status) == DeviceStatus::ReadyForMeasurement {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    device
        .scan_continuous(true)
        .expect("failed to enable the scan stream");
    loop {
        let scan = match device.get_data() {
            Ok(scan) => scan,
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        };
        println!("{}", serde_json::to_string(&scan).unwrap());
    }
}
