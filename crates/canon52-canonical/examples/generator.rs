use canon52_canonical::{canon_then_hash, Canonicalizer};

fn main() {
    let raw = r#"{"route": "FAST", "planes": ["TX", "BRIDGE", null, 7], "note": "café"}"#;

    match Canonicalizer::default().canonicalize_str(raw) {
        Ok(result) => {
            println!("{}", result.as_str());
            println!("{:?}", result.report.status);
        }
        Err(err) => {
            eprintln!("canonicalization failed: {} ({})", err, err.code());
            std::process::exit(1);
        }
    }

    match canon_then_hash("json", raw) {
        Ok(digest) => println!("sha-256 {}", digest),
        Err(err) => {
            eprintln!("hashing failed: {}", err.code());
            std::process::exit(1);
        }
    }
}
