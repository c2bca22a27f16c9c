use clap::Parser as _;
use reportr::{error::RenderError, report::ReportRequest};
use std::path::PathBuf;

/// The command line arguments are the path of the JSON report request and the
/// path of the output PDF file, feel free to add more depending on the need.
#[derive(clap::Parser)]
struct CliArguments {
    /// The path of the JSON report request.
    #[arg(short = 'r', long = "request", value_name = "request_file")]
    request_path: PathBuf,
    /// The path of the output PDF file. Defaults to the filename the report
    /// would be served under.
    #[arg(short = 'o', long = "output", value_name = "output_file")]
    output_pdf_path: Option<PathBuf>,
}

fn main() -> Result<(), RenderError> {
    env_logger::init();

    // Parse the command line arguments
    let cli_arguments = CliArguments::parse();
    // Read the JSON report request and parse it into a `ReportRequest`
    let request_content = std::fs::read(cli_arguments.request_path.clone()).map_err(|error| {
        RenderError::with_error(
            format!(
                "Failed to read JSON report request {:?}",
                cli_arguments.request_path
            ),
            &error,
        )
    })?;
    let request: ReportRequest = serde_json::from_slice(&request_content).map_err(|error| {
        RenderError::with_error(
            format!(
                "Failed to parse JSON report request {:?}",
                cli_arguments.request_path
            ),
            &error,
        )
    })?;

    // Render the requested document and write the bytes out
    let output_pdf_path = cli_arguments
        .output_pdf_path
        .unwrap_or_else(|| PathBuf::from(request.suggested_filename()));
    let pdf_bytes = request.render()?;
    std::fs::write(&output_pdf_path, &pdf_bytes).map_err(|error| {
        RenderError::with_error(
            format!("Failed to write the PDF document {:?}", output_pdf_path),
            &error,
        )
    })?;
    log::info!(
        "Rendered {} bytes into {:?}",
        pdf_bytes.len(),
        output_pdf_path
    );

    Ok(())
}
