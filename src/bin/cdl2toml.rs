use cdl_core::analyze;
use std::io::Read;

/// Reads a CDL document from stdin and writes its TOML rendering to stdout.
/// Any error is reported on stderr and exits with a non-zero status.
fn main() {
    let mut source = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut source) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    let result = match analyze(&source, "<stdin>") {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(1);
        }
    };

    match result.to_toml() {
        Ok(toml_text) => print!("{toml_text}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
