use crate::cli::Args;
use clap::Parser;
use std::{net::SocketAddr, str::FromStr};

pub fn fake_args() -> Args {
    Args {
        listen_address: SocketAddr::from_str("0.0.0.0:3030")
            .expect("Failed to construct fake listen address."),
        allowed_origins: vec![String::from("http://localhost:3000")],
        max_upload_bytes: 10 * 1024 * 1024,
        max_output_dimension: 8192,
        jpeg_quality: 90,
        transform_timeout_secs: 30,
        quickwit_url: None,
    }
}

#[test]
fn test_defaults_without_flags() {
    let args = Args::try_parse_from(["resize-server"]).expect("Failed to parse empty args.");

    assert_eq!(args.listen_address, SocketAddr::from_str("0.0.0.0:3030").unwrap());
    assert_eq!(
        args.allowed_origins,
        vec!["http://127.0.0.1:3000", "http://localhost:3000"]
    );
    assert_eq!(args.max_upload_bytes, 10_485_760);
    assert_eq!(args.max_output_dimension, 8192);
    assert_eq!(args.jpeg_quality, 90);
    assert_eq!(args.transform_timeout_secs, 30);
    assert!(args.quickwit_url.is_none());
}

#[test]
fn test_origins_are_comma_separated() {
    let args = Args::try_parse_from([
        "resize-server",
        "--allowed-origins",
        "https://a.example,https://b.example",
        "--max-upload-bytes",
        "1024",
    ])
    .expect("Failed to parse args.");

    assert_eq!(
        args.allowed_origins,
        vec!["https://a.example", "https://b.example"]
    );
    assert_eq!(args.max_upload_bytes, 1024);
}
