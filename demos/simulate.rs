use std::env;
use std::time::{Duration, Instant};

use heatpump_homekit::{
    Bridge, Characteristic, CharacteristicValue, LoopbackHeatPump, MessageLogMode, Pairing,
};

#[tokio::main]
async fn main() -> heatpump_homekit::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let log_path = args.get(1);

    let mut builder = Bridge::builder(LoopbackHeatPump::new())
        .update_delay(Duration::from_secs(2))
        .on_notify(|n| {
            println!("notify {} = {:?}", n.characteristic, n.value);
        });
    if let Some(path) = log_path {
        builder = builder.message_log(MessageLogMode::Diffed, path.as_str());
    }
    let mut bridge = builder.build()?;

    println!("Connecting to heat pump...");
    bridge.connect()?;

    let script = [
        (1, Characteristic::TargetHeatingCoolingState, CharacteristicValue::UInt8(1)),
        (1, Characteristic::TargetTemperature, CharacteristicValue::Float(22.0)),
        (5, Characteristic::DehumidifierActive, CharacteristicValue::UInt8(1)),
        (9, Characteristic::FanTargetState, CharacteristicValue::UInt8(0)),
        (9, Characteristic::FanRotationSpeed, CharacteristicValue::Float(75.0)),
        (13, Characteristic::FanActive, CharacteristicValue::UInt8(0)),
    ];

    let started = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_millis(250));
    let mut next = 0;

    while started.elapsed() < Duration::from_secs(16) {
        interval.tick().await;
        let now = Instant::now();

        while let Some((at, characteristic, value)) = script.get(next).copied()
            && started.elapsed() >= Duration::from_secs(at)
        {
            println!("write {characteristic} = {value:?}");
            if let Err(e) = bridge.write(characteristic, value, now) {
                eprintln!("Write rejected: {e}");
            }
            next += 1;
        }

        bridge.tick(now);
    }

    let report = bridge.status_report(
        "Simulated heat pump",
        Pairing::Unpaired,
        started.elapsed(),
        env!("CARGO_PKG_VERSION"),
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("Commands sent: {}", bridge.heat_pump().applied().len());
    Ok(())
}
