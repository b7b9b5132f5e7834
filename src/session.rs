//! The per-user working state and the events that drive it.
//!
//! A [`Session`] is created with empty defaults, mutated only through its
//! methods, and reset after a cancel or a successful export. It moves between
//! two phases: [`Phase::Editing`] while the form is filled in and
//! [`Phase::Generated`] once a valid record has been submitted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::document::{compose, Degradation, Footer};
use crate::error::{ActionError, ExportError, LogoError, RecordError, SessionError};
use crate::logo::{read_logo_file, Logo};
use crate::qr::{render_raster, render_vector, CodeStyle, Overlay, VectorCode};
use crate::record::{build_record, ContactForm, EncodedPayload, Escaping, Field};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Editing,
    Generated,
}

/// Identifies one logo read. Only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Where a finished document goes.
pub trait Delivery {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes documents into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(filename), bytes)
    }
}

/// What the export handed to the delivery sink.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub degraded: Vec<Degradation>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    form: ContactForm,
    logo_preview: Option<Logo>,
    phase: Phase,
    upload_seq: u64,
    style: CodeStyle,
    escaping: Escaping,
    footer: Footer,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            style: config.code.clone(),
            escaping: config.record.escaping,
            footer: config.footer.clone(),
            ..Self::default()
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn logo_preview(&self) -> Option<&Logo> {
        self.logo_preview.as_ref()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Start a logo read. Any read started earlier becomes stale.
    pub fn begin_logo_upload(&mut self) -> UploadTicket {
        self.upload_seq += 1;
        UploadTicket(self.upload_seq)
    }

    /// Complete a logo read. Returns `Ok(false)` when the ticket was
    /// superseded by a newer upload and the result was dropped.
    pub fn finish_logo_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<Logo, LogoError>,
    ) -> Result<bool, LogoError> {
        if ticket.0 != self.upload_seq {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.upload_seq,
                "dropping stale logo read"
            );
            return Ok(false);
        }
        let logo = result?;
        self.form.logo = logo.data_uri().to_string();
        self.logo_preview = Some(logo);
        Ok(true)
    }

    /// Read a logo file and attach it to the draft.
    pub async fn upload_logo(&mut self, path: &Path) -> Result<bool, LogoError> {
        let ticket = self.begin_logo_upload();
        let result = read_logo_file(path).await;
        self.finish_logo_upload(ticket, result)
    }

    pub fn remove_logo(&mut self) {
        self.form.logo.clear();
        self.logo_preview = None;
    }

    fn payload(&self) -> Result<EncodedPayload, RecordError> {
        Ok(build_record(&self.form)?.to_payload(self.escaping))
    }

    /// Validate the draft and switch to the generated view.
    pub fn submit(&mut self) -> Result<EncodedPayload, RecordError> {
        let payload = self.payload()?;
        self.phase = Phase::Generated;
        tracing::info!(bytes = payload.as_str().len(), "contact record generated");
        Ok(payload)
    }

    /// The payload of the generated record.
    pub fn generated_payload(&self) -> Result<EncodedPayload, ActionError> {
        if self.phase != Phase::Generated {
            return Err(SessionError::NotGenerated.into());
        }
        Ok(self.payload()?)
    }

    /// The live SVG preview of the generated record.
    pub fn preview(&self) -> Result<VectorCode, ActionError> {
        let payload = self.generated_payload()?;
        let overlay = self.logo_preview.clone().map(Overlay::Embed);
        Ok(render_vector(&payload, overlay.as_ref(), &self.style)?)
    }

    /// Discard the draft and return to an empty form.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.form = ContactForm::default();
        self.logo_preview = None;
        self.phase = Phase::Editing;
        self.upload_seq += 1;
    }

    /// Render, lay out and deliver the PDF, then reset the session.
    ///
    /// A failed raster or logo yields a degraded document rather than an
    /// error. Serialization and delivery failures are returned and leave the
    /// session untouched so the user can retry.
    pub async fn export<D: Delivery>(
        &mut self,
        delivery: &mut D,
    ) -> Result<ExportArtifact, ActionError> {
        if self.phase != Phase::Generated {
            return Err(SessionError::NotGenerated.into());
        }
        let record = build_record(&self.form)?;
        let payload = record.to_payload(self.escaping);
        let has_logo = !self.form.logo.is_empty();
        let overlay = has_logo.then_some(Overlay::Reserve);

        let raster = render_raster(&payload, overlay.as_ref(), &self.style).await;
        let logo_uri = has_logo.then_some(self.form.logo.as_str());
        let page = compose(raster.as_ref(), logo_uri, &self.footer);

        let bytes = page.to_pdf().inspect_err(|e| {
            tracing::error!(error = %e, "PDF export failed");
        })?;

        let filename = record.export_filename();
        delivery
            .deliver(&filename, &bytes)
            .map_err(|source| ExportError::Delivery {
                filename: filename.clone(),
                source,
            })?;

        tracing::info!(
            file = %filename,
            bytes = bytes.len(),
            degraded = page.degraded.len(),
            "contact PDF delivered"
        );
        self.reset();

        Ok(ExportArtifact {
            filename,
            bytes,
            degraded: page.degraded,
        })
    }
}
