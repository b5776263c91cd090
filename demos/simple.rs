use cdl_core::analyze;

fn main() {
    let cdl_data = r#"
        (define HOST "localhost")
        begin
            server := begin
                host := [HOST];
                port := 8080;
            end;
        end
    "#;

    match analyze(cdl_data, "example.cdl") {
        Ok(result) => {
            let toml_output = result.to_toml().unwrap();
            println!("Successfully resolved CDL to TOML:\n{toml_output}");
        }
        Err(e) => {
            eprintln!("Failed to analyze CDL: {e:?}");
        }
    }
}
