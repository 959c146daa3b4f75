// Small dev utility: write the CSV import template to a file (or stdout).
//
// Usage:
//   cargo run --bin generate_template -- [output_path]

use scim_provision::importer::generate_csv_template;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let template = generate_csv_template();

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, &template)?;
            println!("模板已写入: {}", path);
        }
        None => print!("{}", template),
    }

    Ok(())
}
