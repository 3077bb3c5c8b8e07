//! Performance benchmarks for the protocol engine

use protocol::{handle_one, parse, validate, PlayerRecord, Request, Response};
use std::time::Instant;

/// Benchmarks a full successful exchange
#[test]
fn benchmark_handle_one_success() {
    let player = PlayerRecord::default();
    let request = Request::new("GetPlayerInfo", "123456789", "1234").to_bytes();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let response = handle_one(&request, &player);
        assert!(!response.is_empty());
    }

    let duration = start.elapsed();
    println!(
        "handle_one (success): {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 5 seconds even in debug builds
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks rejection of malformed input
#[test]
fn benchmark_handle_one_malformed() {
    let player = PlayerRecord::default();
    let inputs: Vec<Vec<u8>> = vec![
        b"<Request><Command>GetPlayerInfo</Command>".to_vec(),
        b"\xff\xfe garbage".to_vec(),
        vec![b'<'; 1024],
    ];

    let iterations = 10_000;
    let start = Instant::now();

    for i in 0..iterations {
        let response = handle_one(&inputs[i % inputs.len()], &player);
        assert!(!response.is_empty());
    }

    let duration = start.elapsed();
    println!(
        "handle_one (malformed): {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks parsing and validation separately
#[test]
fn benchmark_parse_and_validate() {
    let request = Request::new("GetPlayerInfo", "123456789", "1234").to_bytes();
    let document = parse(&request).unwrap();

    let iterations = 50_000;

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = parse(&request);
    }
    let parse_duration = start.elapsed();

    let start = Instant::now();
    for _ in 0..iterations {
        assert!(validate(&document));
    }
    let validate_duration = start.elapsed();

    println!(
        "parse: {:.2} μs/iter, validate: {:.2} ns/iter",
        parse_duration.as_micros() as f64 / iterations as f64,
        validate_duration.as_nanos() as f64 / iterations as f64
    );

    assert!(parse_duration.as_millis() < 10_000);
    assert!(validate_duration.as_millis() < 1000);
}

/// Benchmarks building and serializing the largest response
#[test]
fn benchmark_response_serialization() {
    let player = PlayerRecord::default();

    let iterations = 50_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let xml = Response::player_info(&player).to_document().to_xml_string();
        assert!(xml.len() > 100);
    }

    let duration = start.elapsed();
    println!(
        "Response serialization: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}
