use indicatif::MultiProgress;
use rangefetch::config::Settings;
use rangefetch::utils;
use rangefetch::{ConsoleProgress, RangeEnd, Resource, assembler, downloader};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let url = "https://proof.ovh.net/files/10Mb.dat";
    let parts = 4;
    let output_dir = ".";

    println!("Starting example download...");
    println!("URL: {}", url);

    // 1. Setup the HTTP Client (no request timeout unless configured)
    let settings = Settings {
        user_agent: Some("rangefetch-example/0.1".into()),
        ..Settings::default()
    };
    let client = settings.http_client()?;

    // 2. Prepare Paths and Filename
    let filename = utils::filename_from_url(url)?;
    let mut output_path = PathBuf::from(output_dir);
    output_path.push(&filename);

    // 3. Get File Size (The Recon Phase)
    let size = utils::get_file_size(url, &client).await?;
    println!("File Size: {} bytes", size);

    // 4. Plan the byte ranges
    let parts = utils::effective_part_count(size, parts, 1);
    let segments = utils::plan_segments(size, parts, RangeEnd::Exact);
    for s in &segments {
        println!("  Part {}: {}", s.index + 1, s.range_header());
    }

    // 5. Fetch every range concurrently, one progress bar each
    let resource = Resource {
        url: url.to_string(),
        total_size: size,
    };
    let progress = ConsoleProgress::new(MultiProgress::new());
    let buffers = downloader::fetch_all(
        &client,
        &resource,
        segments,
        &filename,
        &progress,
        &CancellationToken::new(),
    )
    .await?;

    // 6. Stitch them together in order
    let written = assembler::assemble(buffers, &output_path).await?;

    println!("✅ Download completed successfully: {} ({} bytes)", output_path.display(), written);
    Ok(())
}
