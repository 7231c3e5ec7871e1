use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Daily cycle in [-1, 1], peaking mid-afternoon.
fn diurnal(hour: f64) -> f64 {
    ((hour - 9.0) / 24.0 * 2.0 * std::f64::consts::PI).sin()
}

/// Per-greenhouse baseline: (ambient °C, humidity %, soil °C, soil moisture %).
const DEVICES: [(&str, [f64; 4]); 3] = [
    ("greenhouse-north", [22.0, 70.0, 19.0, 45.0]),
    ("greenhouse-south", [26.0, 60.0, 23.0, 35.0]),
    ("nursery-shed", [20.0, 85.0, 17.0, 65.0]),
];

const HEADER: [&str; 9] = [
    "_index",
    "_id",
    "_source.time",
    "_source.dev_id",
    "_source.temperature_2",
    "_source.relative_humidity_3",
    "_source.analog_in_1",
    "_source.analog_in_4",
    "_source.analog_in_5",
];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "2018-09-30-Data.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2018, 9, 11)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let step = Duration::minutes(30);
    let samples_per_device = 12 * 48;

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut row_id: u64 = 0;
    // Rows are grouped by device, as the export writes them, not sorted by time.
    for (dev_id, [ambient, humidity, soil_temp, moisture]) in DEVICES {
        for i in 0..samples_per_device {
            let jitter = Duration::seconds((rng.next_f64() * 60.0) as i64);
            let time = start + step * i + jitter;
            let hour = i as f64 * 0.5 % 24.0;
            let cycle = diurnal(hour);

            let t_air = ambient + 6.0 * cycle + rng.gauss(0.0, 0.8);
            let rh = (humidity - 15.0 * cycle + rng.gauss(0.0, 3.0)).clamp(0.0, 100.0);
            let t_soil = soil_temp + 2.0 * cycle + rng.gauss(0.0, 0.3);
            let vwc = (moisture - i as f64 * 0.02 + rng.gauss(0.0, 1.0)).clamp(0.0, 100.0);
            let battery = 3.3 + rng.gauss(0.0, 0.02);

            writer.write_record([
                "farm-monitor".to_string(),
                format!("{row_id:08x}"),
                time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
                dev_id.to_string(),
                format!("{t_air:.1}"),
                format!("{rh:.1}"),
                format!("{battery:.2}"),
                format!("{t_soil:.1}"),
                format!("{vwc:.1}"),
            ])?;
            row_id += 1;
        }
    }
    writer.flush()?;

    println!(
        "Wrote {row_id} measurements from {} devices to {output_path}",
        DEVICES.len()
    );
    Ok(())
}
