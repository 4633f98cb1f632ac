//! Media CLI commands
//!
//! Implements CLI commands for attaching, detaching and extracting media.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{LuminaError, LuminaResult};
use crate::models::{JournalMedia, MediaKind};
use crate::services::JournalService;
use crate::storage::Storage;

use super::{match_id, resolve_entry};

/// Media subcommands
#[derive(Subcommand)]
pub enum MediaCommands {
    /// Attach a file to an entry
    Attach {
        /// Entry ID or ID prefix
        entry: String,
        /// File to attach
        file: PathBuf,
        /// Media kind (drawing, image, video, audio); guessed from the extension
        #[arg(short, long)]
        kind: Option<String>,
        /// MIME type; guessed from the extension
        #[arg(short, long)]
        mime: Option<String>,
    },
    /// Attach content hosted at a URL
    Link {
        /// Entry ID or ID prefix
        entry: String,
        /// URL of the content
        url: String,
        /// Media kind (drawing, image, video, audio)
        #[arg(short, long, default_value = "image")]
        kind: String,
        /// MIME type
        #[arg(short, long, default_value = "application/octet-stream")]
        mime: String,
    },
    /// Remove an attachment from an entry
    Detach {
        /// Entry ID or ID prefix
        entry: String,
        /// Media ID or ID prefix
        media: String,
    },
    /// Write an attachment's bytes to a file
    Extract {
        /// Entry ID or ID prefix
        entry: String,
        /// Media ID or ID prefix
        media: String,
        /// Output file
        output: PathBuf,
    },
}

/// Guess kind and MIME type from a file extension
fn guess_type(path: &Path) -> Option<(MediaKind, &'static str)> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let guess = match ext.as_str() {
        "png" => (MediaKind::Image, "image/png"),
        "jpg" | "jpeg" => (MediaKind::Image, "image/jpeg"),
        "gif" => (MediaKind::Image, "image/gif"),
        "webp" => (MediaKind::Image, "image/webp"),
        "svg" => (MediaKind::Drawing, "image/svg+xml"),
        "mp4" => (MediaKind::Video, "video/mp4"),
        "webm" => (MediaKind::Video, "video/webm"),
        "mov" => (MediaKind::Video, "video/quicktime"),
        "mp3" => (MediaKind::Audio, "audio/mpeg"),
        "m4a" => (MediaKind::Audio, "audio/mp4"),
        "ogg" => (MediaKind::Audio, "audio/ogg"),
        "wav" => (MediaKind::Audio, "audio/wav"),
        _ => return None,
    };
    Some(guess)
}

fn parse_kind(kind: &str) -> LuminaResult<MediaKind> {
    MediaKind::parse(kind).ok_or_else(|| {
        LuminaError::Validation(format!(
            "Invalid media kind: '{}'. Valid kinds: drawing, image, video, audio",
            kind
        ))
    })
}

/// Handle a media command
pub fn handle_media_command(storage: &Storage, cmd: MediaCommands) -> LuminaResult<()> {
    let journal = JournalService::new(storage);

    match cmd {
        MediaCommands::Attach {
            entry,
            file,
            kind,
            mime,
        } => {
            let entry = resolve_entry(&journal, &entry)?;
            let guessed = guess_type(&file);

            let kind = match kind {
                Some(k) => parse_kind(&k)?,
                None => guessed.map(|(k, _)| k).ok_or_else(|| {
                    LuminaError::Validation(format!(
                        "Cannot tell what kind of media {} is; pass --kind",
                        file.display()
                    ))
                })?,
            };
            let mime = mime
                .or_else(|| guessed.map(|(_, m)| m.to_string()))
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let content = fs::read(&file).map_err(|e| {
                LuminaError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;

            let media = journal.attach_media(&entry.id, kind, &mime, &content)?;
            println!(
                "Attached {} ({}, {} bytes) as {}",
                file.display(),
                kind,
                content.len(),
                media.id.short()
            );
        }

        MediaCommands::Link {
            entry,
            url,
            kind,
            mime,
        } => {
            let entry = resolve_entry(&journal, &entry)?;
            let media = journal.attach_external_media(&entry.id, parse_kind(&kind)?, &mime, &url)?;
            println!("Linked {} as {}", url, media.id.short());
        }

        MediaCommands::Detach { entry, media } => {
            let entry = resolve_entry(&journal, &entry)?;
            let target = find_media(&entry.media, &media)?;
            journal.detach_media(&entry.id, &target.id)?;
            println!("Detached {}", target.id.short());
        }

        MediaCommands::Extract {
            entry,
            media,
            output,
        } => {
            let entry = resolve_entry(&journal, &entry)?;
            let target = find_media(&entry.media, &media)?;

            match journal.media_content(&entry.id, &target.id)? {
                Some((_, bytes)) => {
                    fs::write(&output, &bytes).map_err(|e| {
                        LuminaError::Io(format!("Failed to write {}: {}", output.display(), e))
                    })?;
                    println!("Wrote {} bytes to {}", bytes.len(), output.display());
                }
                None if target.blob_ref().is_none() => {
                    println!("{} is an external link; nothing stored locally.", target.id.short());
                }
                None => {
                    return Err(LuminaError::BlobStore(format!(
                        "Media {} is missing from the blob store",
                        target.id
                    )));
                }
            }
        }
    }

    Ok(())
}

fn find_media<'a>(media: &'a [JournalMedia], identifier: &str) -> LuminaResult<&'a JournalMedia> {
    match_id(media, |m| m.id.as_str(), identifier, LuminaError::media_not_found)
}
