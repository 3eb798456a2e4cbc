use std::path::Path;

use arrayflat::{Mode, tree::BASE_DIR};

/// Parse a mode name, listing the supported ones on failure.
pub fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| {
        let supported: Vec<&str> = Mode::ALL.iter().map(|m| m.as_str()).collect();
        format!("{}. Supported modes: {}", e, supported.join(", "))
    })
}

/// Validate the input root exists, is a directory and has a base `values/`.
pub fn validate_input_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Input directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Input path is not a directory: {}", path.display()));
    }

    if !path.join(BASE_DIR).is_dir() {
        return Err(format!(
            "Input directory has no {}/ subdirectory: {}",
            BASE_DIR,
            path.display()
        ));
    }

    Ok(())
}

/// Validate a document name is a bare file name, not a path.
pub fn validate_file_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Document name cannot be empty".to_string());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Ok(()),
        _ => Err(format!(
            "Document name must be a plain file name, got: {}",
            name
        )),
    }
}
