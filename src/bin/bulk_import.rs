// Small dev utility: run a bulk CSV import against a local database.
//
// Usage:
//   cargo run --bin bulk_import -- <db_path> <realm_id> <csv_path> [--dry-run] [--skip-duplicates] [--continue-on-error]
//
// The database schema is bootstrapped if missing. The realm must already
// exist (create one with RealmApi or directly in the realms table).

use scim_provision::api::ImportApi;
use scim_provision::db::open_and_initialize;
use scim_provision::domain::import::ImportPolicy;
use scim_provision::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));
    let (Some(db_path), Some(realm_id), Some(csv_path)) =
        (positional.next(), positional.next(), positional.next())
    else {
        eprintln!("用法: bulk_import <db_path> <realm_id> <csv_path> [--dry-run] [--skip-duplicates] [--continue-on-error]");
        std::process::exit(2);
    };

    let policy = ImportPolicy {
        dry_run: args.iter().any(|a| a == "--dry-run"),
        skip_duplicates: args.iter().any(|a| a == "--skip-duplicates"),
        continue_on_error: args.iter().any(|a| a == "--continue-on-error"),
    };

    // 确保 Schema 就绪
    open_and_initialize(db_path)?;

    let api = ImportApi::new(db_path.clone());
    let report = api
        .import_users_from_file(realm_id, csv_path, policy)
        .await?;

    println!(
        "status={} total={} success={} failed={} skipped={} elapsed={:.3}s",
        report.status,
        report.total_rows,
        report.successful_imports,
        report.failed_imports,
        report.skipped_imports,
        report.processing_time_seconds
    );

    if let Some(errors) = &report.file_errors {
        for e in errors {
            println!("file-error: {}", e);
        }
    }
    if let Some(errors) = &report.structural_errors {
        for e in errors {
            println!("structural-error: {}", e);
        }
    }
    for result in &report.results {
        println!(
            "row {} [{}] {} {}",
            result.row_number,
            result.status,
            result.user_name.as_deref().unwrap_or("-"),
            result.message
        );
        for e in &result.errors {
            println!("    {}", e);
        }
    }

    Ok(())
}
