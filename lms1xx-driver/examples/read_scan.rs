use clap::Parser;
use lms1xx_data::{DeviceStatus, ScanDataConfig};
use lms1xx_driver::{Lms1xx, DEFAULT_PORT};
use std::time::Duration;

/// Reads scans from a SICK LMS1xx over Ethernet and prints a summary line
/// per scan.
#[derive(Parser)]
#[command(about = "Reads scan data from an LMS1xx device.")]
struct Args {
    /// Host name or IP address of the device.
    host: String,
    /// TCP port of the CoLa-A interface.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Number of scans to read before exiting.
    #[arg(long, default_value_t = 10)]
    count: usize,
}

fn main() {
    let args = Args::parse();

    let mut device = Lms1xx::new();
    device
        .connect_with_timeout(&args.host, args.port, Some(Duration::from_secs(5)))
        .expect("failed to connect");
    device.login().expect("login rejected");

    let config = ScanDataConfig {
        remission: true,
        ..ScanDataConfig::default()
    };
    device
        .set_scan_data_config(&config)
        .expect("failed to apply the scan data configuration");
    device
        .start_measurement()
        .expect("failed to start measurement");

    // The unit takes a moment to spin up after LMCstartmeas.
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
    for _ in 0..args.count {
        let scan = device.get_data().expect("failed to read scan");
        println!(
            "scan {}: {} distance samples, {} remission samples",
            scan.scan_counter,
            scan.dist1.len(),
            scan.rssi1.len()
        );
    }

    let _ = device.scan_continuous(false);
    let _ = device.stop_measurement();
    device.disconnect();
}
