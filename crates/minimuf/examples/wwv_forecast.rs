extern crate pretty_env_logger as pel;

use minimuf::constants::R2D;
use minimuf::*;

fn main() -> Result<()> {
    pel::init();

    println!("MINIMUF 3.5 - WWV and WWVH from Newark, Delaware");
    println!("================================================");

    let config = CircuitConfig {
        month: 1.0,
        day: 1.0,
        flux: 194.0,
        tx_power_dbw: 20.0,
        ..CircuitConfig::default()
    };

    let newark = Location::from_degrees(39.70000, -75.78194);
    let stations = [
        ("WWV Ft. Collins", Location::from_degrees(40.6803, -105.0408)),
        ("WWVH Kauai", Location::from_degrees(21.9906, -159.7667)),
    ];

    for (name, rx) in stations {
        let circuit = Circuit::new(newark, rx, &config, None)?;
        let path = circuit.path();

        println!(
            "\n10 cm flux: {:.0}   SSN: {:.0}   Month: {:.0}   Day: {:.0}",
            config.flux,
            circuit.ssn(),
            config.month,
            config.day
        );
        println!(
            "Power: {:.0} dBW   Distance: {:.0} km   Delay: {:.1} ms",
            config.tx_power_dbw,
            path.distance_km(),
            circuit.delay_ms()
        );
        println!(
            "{:<20} azimuth {:.0}, return azimuth {:.0}",
            name,
            path.great_circle.bearing_tx * R2D,
            path.great_circle.bearing_rx * R2D
        );

        print!("UT LT  MUF Zen");
        for f in &config.frequencies {
            print!("{:>8.1}", f);
        }
        println!();

        for hour in circuit.predict_day(0, 23)? {
            print!(
                "{:2.0} {:2.0} {:4.1} {:3.0}",
                hour.hour,
                hour.local_time,
                hour.muf,
                hour.midpoint_sun_elevation()
            );
            for eval in &hour.evaluations {
                match eval.best_budget() {
                    // dB over the receiver sensitivity
                    Some(best) => print!(
                        "{:>4.0}{}{}{}",
                        config.link.receiver.margin_over_sensitivity(best.received_power),
                        best.hops,
                        best.flags.day_night_code().unwrap_or(' '),
                        best.flags.quality_code()
                    ),
                    None => print!("{:>8}", ""),
                }
            }
            match hour.optimum_frequency() {
                Some(f) => println!("  best {:.1} MHz", f),
                None => println!(),
            }
        }
    }

    Ok(())
}
