use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::to_string;

use crate::errors::{RecResult, RecorderError};
use crate::export::codegen::CodegenLine;

pub fn serialize_lines(lines: &[CodegenLine]) -> RecResult<Vec<String>> {
    let mut serialized = Vec::with_capacity(lines.len());
    for line in lines {
        let json = to_string(line).map_err(|source| RecorderError::Serialize {
            what: "codegen line",
            source,
        })?;
        serialized.push(json);
    }
    Ok(serialized)
}

pub fn write_lines(path: &Path, lines: &[String]) -> RecResult<PathBuf> {
    let write_err = |source| RecorderError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(write_err)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    for line in lines {
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    Ok(path.components().collect())
}
