//! Viewing and editing objects with external programs
//!
//! Objects are downloaded into a private temporary directory, handed to the
//! viewer or editor while the UI is suspended, and uploaded again only when
//! the content changed. The temporary directory is removed on every path.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use sha2::{Digest, Sha256};
use tempfile::TempDir;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::object::DELIMITER;

/// Editor and viewer commands, each a program with optional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    editor: Vec<String>,
    viewer: Vec<String>,
}

impl Editor {
    pub fn new(editor: &str, viewer: &str) -> Self {
        Self {
            editor: split_command(editor),
            viewer: split_command(viewer),
        }
    }

    /// Show the object named by the context in the viewer
    pub fn view_object(&self, ctx: &Context) -> Result<()> {
        let (_dir, path) = download_to_temp(ctx)?;
        self.run(ctx, &self.viewer, &path)
    }

    /// Edit the object named by the context; returns whether it was uploaded
    pub fn edit_object(&self, ctx: &Context) -> Result<bool> {
        let (_dir, path) = download_to_temp(ctx)?;
        let before = file_hash(&path)?;

        self.run(ctx, &self.editor, &path)?;

        if !path.exists() {
            return Err(Error::General("file does not exist after editing".to_string()));
        }
        if file_hash(&path)? == before {
            tracing::debug!(key = ctx.object_key(), "object unchanged, skipping upload");
            return Ok(false);
        }

        ctx.client()?
            .upload_file(ctx.bucket(), ctx.object_key(), &path)?;
        tracing::info!(
            bucket = ctx.bucket(),
            key = ctx.object_key(),
            "uploaded edited object"
        );
        Ok(true)
    }

    /// Create `name` below the context's prefix from a new empty file
    ///
    /// Nothing is uploaded when the user deletes the file in the editor.
    pub fn create_object(&self, ctx: &Context, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("object name cannot be empty".to_string()));
        }
        let file_name = new_file_name(name)?;
        let key = format!("{}{}", ctx.object_key(), name);

        let dir = temp_dir()?;
        let path = dir.path().join(file_name);
        File::create_new(&path)?;

        self.run(ctx, &self.editor, &path)?;

        if !path.is_file() {
            tracing::debug!(key = %key, "new object discarded");
            return Ok(false);
        }

        ctx.client()?.upload_file(ctx.bucket(), &key, &path)?;
        tracing::info!(bucket = ctx.bucket(), key = %key, "created object");
        Ok(true)
    }

    fn run(&self, ctx: &Context, command: &[String], path: &Path) -> Result<()> {
        let Some((program, args)) = command.split_first() else {
            return Err(Error::Config("editor or viewer command is empty".to_string()));
        };
        ctx.suspend_app(&mut || run_program(program, args, path))
    }
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

fn run_program(program: &str, args: &[String], path: &Path) -> Result<()> {
    tracing::debug!(program, path = %path.display(), "running external program");
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| Error::Process(format!("failed to run {program}: {e}")))?;

    if !status.success() {
        return Err(Error::Process(format!("{program} exited with {status}")));
    }
    Ok(())
}

/// Last segment of a new object name; relative segments are rejected
fn new_file_name(name: &str) -> Result<&str> {
    if name
        .split(DELIMITER)
        .any(|segment| segment == "." || segment == "..")
    {
        return Err(Error::InvalidPath(format!(
            "object name cannot contain '.' or '..' segments: '{name}'"
        )));
    }
    name.rsplit(DELIMITER)
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| Error::Validation(format!("object name must not end with '{DELIMITER}'")))
}

fn temp_dir() -> Result<TempDir> {
    Ok(tempfile::Builder::new().prefix("s3nav").tempdir()?)
}

/// Download the context's object, keeping its file name for the editor
fn download_to_temp(ctx: &Context) -> Result<(TempDir, PathBuf)> {
    let key = ctx.object_key();
    let file_name = key
        .trim_end_matches(DELIMITER)
        .rsplit(DELIMITER)
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidPath(format!("not an object key: '{key}'")))?;

    let dir = temp_dir()?;
    let path = dir.path().join(file_name);
    ctx.client()?.download_file(ctx.bucket(), key, &path)?;
    Ok((dir, path))
}

fn file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
