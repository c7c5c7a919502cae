fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match rex_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[rex] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = rex_core::runtime::run_with_options(options) {
        eprintln!("[rex] runtime failed: {error}");
        std::process::exit(1);
    }
}
