//! Interaction log export command handlers
use anyhow::Result;
use kibun_core::config;
use kibun_storage::FeedbackLog;

pub fn handle_export_command(format: &str, output: Option<String>) -> Result<()> {
    let data_dir = config::get_data_dir()?;
    let log = FeedbackLog::open(Some(data_dir))?;

    let contents = match format {
        "csv" => log.export_csv()?,
        "json" => log.export_json()?,
        _ => {
            println!("Unknown format: {format}. Use 'csv' or 'json'");
            return Ok(());
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &contents)?;
            println!("Exported {} entries to {path}", log.len());
        }
        None => print!("{contents}"),
    }

    Ok(())
}
