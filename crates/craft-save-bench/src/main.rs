//! Benchmark for craft-save formats.
//!
//! Encodes one graph in every writable format, reports sizes and timings, and
//! checks that each encoding decodes back to the same graph.
//!
//! ```text
//! bench-formats              # synthetic graph, 20000 elements
//! bench-formats 5000         # synthetic graph, 5000 elements
//! bench-formats save.bin     # any savefile on disk
//! ```
//!
//! Progress events go through `tracing`; set `RUST_LOG=info` to see them, or
//! `RUST_LOG=craft_save=debug` for codec events as well.

use std::fs;
use std::time::{Duration, Instant};

use craft_save::{decode, Format, SaveOptions, Savefile};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ELEMENTS: usize = 20_000;
const RECIPES_PER_ELEMENT: usize = 3;
const DECODE_ITERS: u32 = 10;

const EMOJIS: [&str; 12] = [
    "💧", "🔥", "🌬️", "🌍", "💨", "🌊", "⛰️", "🌋", "🌱", "🌳", "⚡", "🧱",
];

/// Small xorshift generator so runs are reproducible without a seed file.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

/// Builds a graph shaped like a real run: four starters, then every new
/// element is crafted from two elements that already exist.
fn synthetic_savefile(count: usize) -> Savefile {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut save = Savefile::new();
    save.set_name("Synthetic");

    for (text, emoji) in [("Water", "💧"), ("Fire", "🔥"), ("Wind", "🌬️"), ("Earth", "🌍")] {
        save.add_element(text, emoji, false);
    }

    for i in save.len()..count {
        // Skew emoji choice so the dictionary ranking matters.
        let emoji = EMOJIS[rng.below(EMOJIS.len()).min(rng.below(EMOJIS.len()))];
        let id = save.add_element(&format!("Element {i}"), emoji, rng.below(50) == 0);
        for _ in 0..=rng.below(RECIPES_PER_ELEMENT) {
            save.add_recipe(rng.below(id), rng.below(id), id);
        }
    }
    save
}

fn load_savefile(arg: Option<String>) -> Savefile {
    match arg {
        Some(arg) if arg.parse::<usize>().is_err() => {
            let data = fs::read(&arg).expect("Failed to read savefile");
            info!(path = %arg, len = data.len(), "loaded savefile");
            decode(&data, SaveOptions::default())
                .expect("Failed to decode savefile")
                .expect("Unrecognized savefile format")
        }
        arg => {
            let count = arg.and_then(|a| a.parse().ok()).unwrap_or(DEFAULT_ELEMENTS);
            let start = Instant::now();
            let save = synthetic_savefile(count);
            info!(count, elapsed = ?start.elapsed(), "built synthetic graph");
            save
        }
    }
}

fn throughput(bytes: usize, time: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / time.as_secs_f64()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let save = load_savefile(std::env::args().nth(1));
    println!("{}", save.summary());

    let mut baseline = None;
    for format in [Format::Legacy, Format::Official, Format::BinaryV1] {
        let encode_start = Instant::now();
        let encoded = save.encode(format).expect("Failed to encode");
        let encode_time = encode_start.elapsed();

        let baseline_len = *baseline.get_or_insert(encoded.len());
        println!(
            "\n{}: {} bytes ({:.1}% of legacy) in {:?}",
            format,
            encoded.len(),
            100.0 * encoded.len() as f64 / baseline_len as f64,
            encode_time
        );
        println!("  Encode throughput: {:.2} MB/s", throughput(encoded.len(), encode_time));

        // Warmup
        for _ in 0..3 {
            let _ = decode(&encoded, SaveOptions::default()).expect("Failed to decode");
        }

        let decode_start = Instant::now();
        let mut decoded = None;
        for _ in 0..DECODE_ITERS {
            decoded = decode(&encoded, SaveOptions::default()).expect("Failed to decode");
        }
        let decode_time = decode_start.elapsed() / DECODE_ITERS;
        let decoded = decoded.expect("Unrecognized encoding");

        println!(
            "  Decode: {:?} (avg of {} iterations), {:.2} MB/s",
            decode_time,
            DECODE_ITERS,
            throughput(encoded.len(), decode_time)
        );

        assert_eq!(decoded.format(), Some(format));
        assert_eq!(decoded.stats(), save.stats());
        assert_eq!(decoded.len(), save.len());
        info!(%format, stats = %decoded.stats(), "round trip verified");
    }
}
