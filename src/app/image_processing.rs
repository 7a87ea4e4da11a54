// image_processing.rs
use crate::app::{ConversionProgress, ConversionUpdate};
use crate::conversion::{convert_selection, is_convertible};
use crate::utils::{Logger, measure_time, get_memory_usage};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

/// Runs one conversion batch on the calling thread, reporting through `sender`.
///
/// `input_files` is a snapshot of the selection; later selection changes do not
/// affect a running batch.
pub fn convert_images(
    input_files: Vec<PathBuf>,
    output_directory: PathBuf,
    progress: Arc<Mutex<ConversionProgress>>,
    logger: Logger,
    sender: Sender<ConversionUpdate>,
) {
    logger.log("Starting conversion");
    logger.log(get_memory_usage());

    let total_files = input_files.iter().filter(|path| is_convertible(path)).count();
    logger.log(format!("WebP files to convert: {}", total_files));

    {
        let mut progress = progress.lock();
        progress.total = total_files;
        progress.completed = 0;
        progress.status = "Starting conversion...".to_string();
    }
    let _ = sender.send(ConversionUpdate::Progress(0, total_files));

    let mut completed = 0;
    let mut file_started = Instant::now();
    let (outcome, total_duration) = measure_time(|| {
        convert_selection(&input_files, &output_directory, |result| {
            match &result.output {
                Some(output) => logger.log(format!(
                    "Converted {} to {} in {:?}",
                    result.source.display(),
                    output.display(),
                    file_started.elapsed()
                )),
                None => logger.log(format!(
                    "No frames decoded from {}, nothing written",
                    result.source.display()
                )),
            }
            file_started = Instant::now();

            completed += 1;
            {
                let mut progress = progress.lock();
                progress.completed = completed;
                progress.status = format!("Converted {} of {}", completed, total_files);
            }
            let _ = sender.send(ConversionUpdate::Converted(result.clone()));
            let _ = sender.send(ConversionUpdate::Progress(completed, total_files));
        })
    });

    let status = match outcome {
        Ok(results) => {
            let written = results.iter().filter(|result| result.is_success()).count();
            logger.log(format!(
                "Conversion process completed in {:?}: {} of {} written",
                total_duration,
                written,
                results.len()
            ));
            "Conversion complete!".to_string()
        }
        Err(error) => {
            logger.log(format!("Conversion failed: {}", error));
            let _ = sender.send(ConversionUpdate::Failed(error.to_string()));
            "Conversion failed".to_string()
        }
    };
    progress.lock().status = status;

    let _ = sender.send(ConversionUpdate::Completed);
}
