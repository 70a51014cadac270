use std::fs::File;

use flate2::write::GzEncoder;
use flate2::Compression;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const OCEAN_PROXIMITY: [&str; 5] = ["<1H OCEAN", "INLAND", "NEAR OCEAN", "NEAR BAY", "ISLAND"];

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn main() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n_rows = 2000;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "longitude",
            "latitude",
            "housing_median_age",
            "total_rooms",
            "total_bedrooms",
            "population",
            "households",
            "median_income",
            "median_house_value",
            "ocean_proximity",
        ])
        .expect("Failed to write header");

    for _ in 0..n_rows {
        let longitude = rng.gen_range(-124.35..-114.31);
        let latitude = rng.gen_range(32.54..41.95);
        let age = rng.gen_range(1..=52) as f64;
        let households = gauss(&mut rng, 500.0, 200.0).max(10.0).round();
        let rooms = (households * gauss(&mut rng, 5.4, 1.2).max(1.0)).round();
        let population = (households * gauss(&mut rng, 3.0, 0.8).max(1.0)).round();
        // Right-skewed like the real income column, clipped to its range.
        let income = gauss(&mut rng, 1.2, 0.45).exp().clamp(0.4999, 15.0001);
        let value = (income * 40_000.0 + gauss(&mut rng, 20_000.0, 30_000.0)).clamp(14_999.0, 500_001.0);
        let proximity = OCEAN_PROXIMITY[rng.gen_range(0..OCEAN_PROXIMITY.len())];

        // Roughly 1% of total_bedrooms is missing in the real data.
        let bedrooms = if rng.gen_bool(0.01) {
            String::new()
        } else {
            format!("{:.1}", (rooms * 0.2).round())
        };

        writer
            .write_record([
                format!("{longitude:.2}"),
                format!("{latitude:.2}"),
                format!("{age:.1}"),
                format!("{rooms:.1}"),
                bedrooms,
                format!("{population:.1}"),
                format!("{households:.1}"),
                format!("{income:.4}"),
                format!("{value:.1}"),
                proximity.to_string(),
            ])
            .expect("Failed to write row");
    }
    let csv_bytes = writer.into_inner().expect("Failed to finish CSV");

    // Pack housing.csv into housing.tgz
    let output_path = "housing.tgz";
    let file = File::create(output_path).expect("Failed to create output file");
    let mut archive = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let mut header = tar::Header::new_gnu();
    header.set_size(csv_bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    archive
        .append_data(&mut header, "housing.csv", csv_bytes.as_slice())
        .expect("Failed to append housing.csv");
    archive
        .into_inner()
        .expect("Failed to finish archive")
        .finish()
        .expect("Failed to finish gzip stream");

    println!("Wrote {n_rows} housing rows to {output_path}");
}
