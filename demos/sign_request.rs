//! Request Signing Demo
//!
//! Prints the `X-Signature` a client must send for a set of header values,
//! plus a curl command against the gateway's protected scope. Run with:
//!
//! ```text
//! cargo run --example sign_request -- 2024-01-01 "Bearer t" 42
//! ```
//!
//! Values are positional and must follow the gateway's `SIGNATURE_HEADERS`
//! order. The secret is read from `SIGNATURE_SECRET`.

use signature_gateway::{DEFAULT_SIGNED_HEADERS, SignatureConfig, sign_headers};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match SignatureConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let secret = if config.secret_key.is_empty() {
        "s3cr3t".to_string()
    } else {
        config.secret_key.clone()
    };

    let values: Vec<String> = std::env::args().skip(1).collect();
    let values = if values.is_empty() {
        vec![
            "2024-01-01".to_string(),
            "Bearer t".to_string(),
            "42".to_string(),
        ]
    } else {
        values
    };

    if values.len() != config.headers.len() {
        eprintln!(
            "Expected {} values for headers {:?}, got {}",
            config.headers.len(),
            config.headers,
            values.len()
        );
        return ExitCode::FAILURE;
    }

    println!("Signature Gateway Request Signing Demo");
    println!("======================================\n");
    println!("Scheme: {}", config.scheme);
    if config.headers == DEFAULT_SIGNED_HEADERS {
        println!("Headers: default {:?}", config.headers);
    } else {
        println!("Headers: {:?}", config.headers);
    }
    println!("Message: '{}'", values.concat());

    let signature = match sign_headers(&values, secret.as_bytes(), config.scheme) {
        Ok(signature) => signature,
        Err(e) => {
            eprintln!("Error generating signature: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("\nX-Signature: {signature}\n");
    println!("curl \\");
    for (name, value) in config.headers.iter().zip(&values) {
        println!("     -H '{name}: {value}' \\");
    }
    println!("     -H 'X-Signature: {signature}' \\");
    println!("     http://localhost:8080/api/protected/ping");

    ExitCode::SUCCESS
}
