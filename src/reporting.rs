use crate::errors::AggregationError;

/// Size in KB with one decimal, as shown in status messages.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

pub fn copied_file_message(name: &str, size: u64, destination: &str) -> String {
    format!(
        "Copied \"{}\" ({} KB) to {}",
        name,
        format_kb(size),
        destination
    )
}

pub fn copied_folder_message(
    file_count: usize,
    total_size: u64,
    folder: &str,
    destination: &str,
) -> String {
    format!(
        "Copied {} files ({} KB) from \"{}\" to {}",
        file_count,
        format_kb(total_size),
        folder,
        destination
    )
}

pub fn exported_file_message(name: &str, size: u64, path: &str) -> String {
    format!(
        "Exported \"{}\" ({} KB) to {}",
        name,
        format_kb(size),
        path
    )
}

pub fn exported_folder_message(
    file_count: usize,
    total_size: u64,
    folder: &str,
    path: &str,
) -> String {
    format!(
        "Exported {} files ({} KB) from \"{}\" to {}",
        file_count,
        format_kb(total_size),
        folder,
        path
    )
}

/// User-facing text for a failed operation. `action` reads like
/// "copy folder contents".
pub fn failure_message(action: &str, err: &AggregationError) -> String {
    match err {
        AggregationError::FileTooLarge { max_kb, .. } => {
            format!("File too large (>{}KB). Skipping.", max_kb)
        }
        AggregationError::UnsupportedExtension(ext) => format!("File type .{} not supported", ext),
        AggregationError::NoValidFiles(_) => "No valid files found in folder".to_owned(),
        AggregationError::NoFilesSelected => "No files selected".to_owned(),
        other => format!("Failed to {}: {}", action, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_kilobytes_with_one_decimal() {
        assert_eq!(format_kb(0), "0.0");
        assert_eq!(format_kb(1536), "1.5");
        assert_eq!(format_kb(1024 * 1000), "1000.0");
    }

    #[test]
    fn rejection_messages_match_notices() {
        let too_large = AggregationError::FileTooLarge {
            size: 2048,
            max_kb: 1,
        };
        assert_eq!(
            failure_message("copy file contents", &too_large),
            "File too large (>1KB). Skipping."
        );
        assert_eq!(
            failure_message(
                "copy file contents",
                &AggregationError::UnsupportedExtension("png".into())
            ),
            "File type .png not supported"
        );
        assert_eq!(
            failure_message("copy file contents", &AggregationError::IoError("boom".into())),
            "Failed to copy file contents: IO Error: boom"
        );
    }

    #[test]
    fn folder_messages_include_counts() {
        assert_eq!(
            copied_folder_message(3, 2048, "Notes", "clipboard"),
            "Copied 3 files (2.0 KB) from \"Notes\" to clipboard"
        );
        assert_eq!(
            exported_folder_message(2, 512, "Notes", "Exports/Notes-contents.md"),
            "Exported 2 files (0.5 KB) from \"Notes\" to Exports/Notes-contents.md"
        );
    }
}
