use std::env;
use std::process;

use seed_recovery::{CipherSeed, ENTROPY_SIZE, MAINNET, recover};

// Stands in for the upstream aezeed decryption step: takes the already
// recovered entropy (hex), wallet birthday (days since genesis) and
// internal seed version, and prints the recovery report.
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("usage: recover <entropy-hex> [birthday-days] [internal-version]");
        process::exit(2);
    }

    let entropy_bytes = match hex::decode(&args[1]) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("invalid entropy hex: {}", e);
            process::exit(1);
        }
    };
    if entropy_bytes.len() != ENTROPY_SIZE {
        eprintln!(
            "entropy must be {} bytes, got {}",
            ENTROPY_SIZE,
            entropy_bytes.len()
        );
        process::exit(1);
    }
    let mut entropy = [0u8; ENTROPY_SIZE];
    entropy.copy_from_slice(&entropy_bytes);

    let birthday = match args.get(2).map(|s| s.parse::<u16>()).transpose() {
        Ok(days) => days.unwrap_or(0),
        Err(e) => {
            eprintln!("invalid birthday: {}", e);
            process::exit(1);
        }
    };
    let internal_version = match args.get(3).map(|s| s.parse::<u8>()).transpose() {
        Ok(version) => version.unwrap_or(0),
        Err(e) => {
            eprintln!("invalid internal version: {}", e);
            process::exit(1);
        }
    };

    let seed = CipherSeed::new(internal_version, birthday, entropy);
    match recover(&seed, &MAINNET) {
        Ok(report) => println!("{}", report),
        Err(e) => {
            eprintln!("recovery failed: {}", e);
            process::exit(1);
        }
    }
}
