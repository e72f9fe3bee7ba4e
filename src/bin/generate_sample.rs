use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use wf_reader::{Feature, WfWriter, Window};

/// Samples per window of the synthetic accelerometer trace.
const TRACE_LEN: usize = 8;

fn sine_trace(frequency: f64, amplitude: f64, noise_level: f64, rng: &mut TraceRng) -> Vec<f64> {
    let phase = rng.uniform() * std::f64::consts::TAU;
    (0..TRACE_LEN)
        .map(|i| {
            let t = i as f64 / TRACE_LEN as f64;
            amplitude * (std::f64::consts::TAU * frequency * t + phase).sin()
                + rng.noise(noise_level)
        })
        .collect()
}

/// Summary scalars followed by the raw trace as one vector feature.
fn generate_window(frequency: f64, amplitude: f64, noise_level: f64, rng: &mut TraceRng) -> Window {
    let trace = sine_trace(frequency, amplitude, noise_level, rng);
    let n = trace.len() as f64;
    let mean = trace.iter().sum::<f64>() / n;
    let stdev = (trace.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let peak = trace.iter().fold(f64::MIN, |a, &b| a.max(b));
    Window::new(vec![
        Feature::Scalar(round4(mean)),
        Feature::Scalar(round4(stdev)),
        Feature::Scalar(round4(peak)),
        Feature::Vector(trace.into_iter().map(round4).collect()),
    ])
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

/// Deterministic noise source so every run writes the same file.
///
/// SplitMix64 for uniforms; normals come in pairs from the polar method and
/// the second one is kept for the next call.
struct TraceRng {
    state: u64,
    spare_normal: Option<f64>,
}

impl TraceRng {
    fn seeded(seed: u64) -> Self {
        Self {
            state: seed,
            spare_normal: None,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Zero-mean normal sample with the given standard deviation.
    fn noise(&mut self, std_dev: f64) -> f64 {
        if let Some(z) = self.spare_normal.take() {
            return z * std_dev;
        }
        loop {
            let u = 2.0 * self.uniform() - 1.0;
            let v = 2.0 * self.uniform() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                self.spare_normal = Some(v * scale);
                return u * scale * std_dev;
            }
        }
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.wf"));

    let mut rng = TraceRng::seeded(42);

    // (label, frequency, amplitude, windows per block)
    let activities = [
        ("idle", 0.0, 0.02, 4),
        ("walk", 2.0, 0.6, 5),
        ("run", 3.5, 1.4, 5),
    ];

    let mut blocks: Vec<(String, Vec<Window>)> = Vec::new();
    // Two recording sessions; the second repeats every label.
    for session in 0..2 {
        for &(label, frequency, amplitude, count) in &activities {
            let noise = 0.01 + 0.02 * session as f64;
            let windows = (0..count)
                .map(|_| generate_window(frequency, amplitude, noise, &mut rng))
                .collect();
            blocks.push((label.to_string(), windows));
        }
    }

    // A saturated sensor reading, as upstream tools emit it.
    if let Some(Feature::Vector(trace)) = blocks
        .first_mut()
        .and_then(|(_, windows)| windows.first_mut())
        .and_then(|window| window.features.last_mut())
    {
        if let Some(first) = trace.first_mut() {
            *first = f64::NAN;
        }
    }

    let attribute_names: Vec<String> = ["mean", "stdev", "peak", "trace"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let writer = WfWriter::default();
    let file = File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let mut out = BufWriter::new(file);
    writer.write_header(&attribute_names, &mut out)?;
    for (label, windows) in &blocks {
        writer.write_block(label, windows, &mut out)?;
    }
    out.flush()?;

    let num_windows: usize = blocks.iter().map(|(_, w)| w.len()).sum();
    println!(
        "Wrote {num_windows} windows in {} blocks to {}",
        blocks.len(),
        output_path.display()
    );
    Ok(())
}
