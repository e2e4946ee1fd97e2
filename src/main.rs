use std::env;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(String::as_str) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            let store_path = raw_args
                .get(3)
                .cloned()
                .unwrap_or_else(|| "nestegg-inputs.json".to_string());
            if let Err(e) = nestegg::api::run_http_server(port, store_path).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("project") => {
            // Re-anchor the argument list so clap reports the right program name.
            let mut args = vec!["nestegg".to_string()];
            args.extend(raw_args.iter().skip(2).cloned());
            if let Err(e) = nestegg::api::run_projection_export(&args) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port] [store-path]");
            eprintln!("       cargo run -- project [--help for flags]");
            std::process::exit(1);
        }
    }
}
